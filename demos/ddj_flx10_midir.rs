// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

use std::{collections::HashMap, time::Duration};

use tokio::sync::mpsc;

use ddj_flx10::{
    devices::{
        pioneer_ddj_flx10::{Config, Controller, TimerEvent},
        MIDI_DJ_CONTROLLER_DESCRIPTORS,
    },
    midi::midir::MidirDeviceManager,
    ControlSubscriptions, ControlSurface, DeckId, MidiInputHandler, ScratchEngine, ScratchParams,
    TokioTimers,
};

const DEFAULT_RUN_SECS: u64 = 60;

/// Forwards MIDI input from the backend thread.
struct ForwardInput {
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl MidiInputHandler for ForwardInput {
    fn handle_midi_input(&mut self, input: &[u8]) -> bool {
        self.tx.send(input.to_vec()).is_ok()
    }
}

/// Stands in for the mixing software.
#[derive(Debug, Default)]
struct LoggingEngine {
    values: HashMap<(String, String), f64>,
    scratching: [bool; DeckId::COUNT],
}

impl ControlSurface for LoggingEngine {
    fn get_value(&self, group: &str, control: &str) -> f64 {
        self.values
            .get(&(group.to_owned(), control.to_owned()))
            .copied()
            .unwrap_or(f64::NAN)
    }

    fn set_value(&mut self, group: &str, control: &str, value: f64) {
        log::info!("{group} {control} = {value}");
        self.values
            .insert((group.to_owned(), control.to_owned()), value);
    }
}

impl ControlSubscriptions for LoggingEngine {
    fn subscribe(&mut self, group: &str, control: &str) {
        log::debug!("Subscribed to {group} {control}");
    }
}

impl ScratchEngine for LoggingEngine {
    fn scratch_enable(&mut self, deck: DeckId, params: &ScratchParams, ramp: bool) {
        log::info!("Scratching on deck {deck} enabled: {params:?}, ramp = {ramp}");
        self.scratching[deck.index()] = true;
    }

    fn scratch_tick(&mut self, deck: DeckId, delta: i32) {
        log::info!("Scratching on deck {deck}: {delta:+}");
    }

    fn scratch_disable(&mut self, deck: DeckId, ramp: bool) {
        log::info!("Scratching on deck {deck} disabled: ramp = {ramp}");
        self.scratching[deck.index()] = false;
    }

    fn is_scratching(&self, deck: DeckId) -> bool {
        self.scratching[deck.index()]
    }
}

fn main() {
    pretty_env_logger::init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("Failed to create Tokio runtime: {err}");
            return;
        }
    };
    match runtime.block_on(run()) {
        Ok(()) => (),
        Err(err) => log::error!("{err}"),
    }
}

async fn run() -> anyhow::Result<()> {
    let run_duration = Duration::from_secs(
        std::env::args()
            .nth(1)
            .map(|arg| arg.parse())
            .transpose()?
            .unwrap_or(DEFAULT_RUN_SECS),
    );

    let device_manager = MidirDeviceManager::new()?;
    let mut devices = device_manager.detect_dj_controllers(MIDI_DJ_CONTROLLER_DESCRIPTORS);
    if devices.is_empty() {
        anyhow::bail!("no DJ controller found");
    }
    let mut device = devices.remove(0);

    let (tx, mut midi_input) = mpsc::unbounded_channel();
    let output_connection = device.connect(ForwardInput { tx })?;

    let (timers, mut timer_events) =
        TokioTimers::<TimerEvent>::new(tokio::runtime::Handle::current());
    let mut controller = Controller::new(
        Config::default(),
        LoggingEngine::default(),
        timers,
        output_connection,
    );
    controller.init()?;

    log::info!("Running for {run_duration:?}");
    let deadline = tokio::time::Instant::now() + run_duration;
    loop {
        tokio::select! {
            () = tokio::time::sleep_until(deadline) => break,
            Some(input) = midi_input.recv() => {
                if !controller.handle_midi_input(&input) {
                    log::debug!("Unhandled MIDI input {input:x?}");
                }
            }
            Some((handle, event)) = timer_events.recv() => {
                controller.handle_timer(handle, event);
            }
            else => break,
        }
    }

    controller.shutdown()?;
    device.disconnect();
    Ok(())
}
