// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

use std::{collections::HashMap, time::Duration};

use super::*;
use crate::{
    ControlSubscriptions, ControlSurface, DeckControl, DeckId, MidiOutputConnection, OutputError,
    OutputResult, ScratchEngine, ScratchParams, TimerQueue,
};

mod codec;

/// Records all interactions and stores written values.
#[derive(Debug, Default)]
struct FakeEngine {
    values: HashMap<(String, String), f64>,
    writes: Vec<(String, String, f64)>,
    subscriptions: Vec<(String, String)>,
    scratching: [bool; DeckId::COUNT],
    scratch_enabled: Vec<(DeckId, ScratchParams, bool)>,
    scratch_disabled: Vec<(DeckId, bool)>,
    scratch_ticks: Vec<(DeckId, i32)>,
}

impl FakeEngine {
    /// Preset a value without recording a write.
    fn preset(&mut self, deck: DeckId, control: impl Into<DeckControl>, value: f64) {
        self.values
            .insert((deck.group(), control.into().to_string()), value);
    }

    fn value(&self, deck: DeckId, control: impl Into<DeckControl>) -> f64 {
        self.get_value(&deck.group(), &control.into().to_string())
    }

    fn writes_of(&self, deck: DeckId, control: impl Into<DeckControl>) -> Vec<f64> {
        let group = deck.group();
        let control = control.into().to_string();
        self.writes
            .iter()
            .filter(|(g, c, _)| *g == group && *c == control)
            .map(|(_, _, value)| *value)
            .collect()
    }

    fn is_subscribed(&self, deck: DeckId, control: impl Into<DeckControl>) -> bool {
        let key = (deck.group(), control.into().to_string());
        self.subscriptions.contains(&key)
    }
}

impl ControlSurface for FakeEngine {
    fn get_value(&self, group: &str, control: &str) -> f64 {
        self.values
            .get(&(group.to_owned(), control.to_owned()))
            .copied()
            .unwrap_or(f64::NAN)
    }

    fn set_value(&mut self, group: &str, control: &str, value: f64) {
        self.values
            .insert((group.to_owned(), control.to_owned()), value);
        self.writes
            .push((group.to_owned(), control.to_owned(), value));
    }
}

impl ControlSubscriptions for FakeEngine {
    fn subscribe(&mut self, group: &str, control: &str) {
        self.subscriptions
            .push((group.to_owned(), control.to_owned()));
    }
}

impl ScratchEngine for FakeEngine {
    fn scratch_enable(&mut self, deck: DeckId, params: &ScratchParams, ramp: bool) {
        self.scratching[deck.index()] = true;
        self.scratch_enabled.push((deck, *params, ramp));
    }

    fn scratch_tick(&mut self, deck: DeckId, delta: i32) {
        self.scratch_ticks.push((deck, delta));
    }

    fn scratch_disable(&mut self, deck: DeckId, ramp: bool) {
        self.scratching[deck.index()] = false;
        self.scratch_disabled.push((deck, ramp));
    }

    fn is_scratching(&self, deck: DeckId) -> bool {
        self.scratching[deck.index()]
    }
}

#[derive(Debug, Default)]
struct RecordingOutput {
    sent: Vec<Vec<u8>>,
    disconnected: bool,
}

impl MidiOutputConnection for RecordingOutput {
    fn send_midi_output(&mut self, output: &[u8]) -> OutputResult<()> {
        if self.disconnected {
            return Err(OutputError::Disconnected);
        }
        self.sent.push(output.to_vec());
        Ok(())
    }
}

type TestController = Controller<FakeEngine, TimerQueue<TimerEvent>, RecordingOutput>;

fn new_controller(config: Config, engine: FakeEngine) -> TestController {
    Controller::new(config, engine, TimerQueue::new(), RecordingOutput::default())
}

/// Initialized controller without any recorded output or writes.
fn started_controller(config: Config, engine: FakeEngine) -> TestController {
    let mut controller = new_controller(config, engine);
    assert_eq!(Ok(()), controller.init());
    take_sent(&mut controller);
    controller.engine_mut().writes.clear();
    controller
}

fn take_sent(controller: &mut TestController) -> Vec<Vec<u8>> {
    std::mem::take(&mut controller.output_connection_mut().sent)
}

const fn millis(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
