// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

use std::time::Duration;

use thiserror::Error;

use super::{
    bpm_tenths, degrees, display_seconds, encode_deck_led_off, encode_jog_display_hidden,
    encode_jog_info_visible, encode_jog_ring_off, minutes_seconds, rate_tenths, split_u14,
    BeatJumpDirection, Config, DeckInput, DisplayValue, Input, JogDisplayField, JogDisplays,
    JogMotionController, JogState, OutputGateway, OutputScheduler, PadEvent, PadMode,
    PadModePage, PadTarget, PulseTimers, RingMode, RingState, TimeMode, TimerEvent,
    DEVICE_DESCRIPTOR, HOT_CUE_COUNT, PADS_PER_PAGE, PAD_PAGE_INDEX_COUNT,
};
use crate::{
    engine::{DeckControlSubscriptions as _, DeckControlSurface as _},
    DeckControl, DeckId, DeckParam, Engine, HotCueControl, LedOutput, MidiInputHandler,
    MidiOutputConnection, OutputResult, TimerHandle, TimerQueue, Timers,
};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has already been started")]
    AlreadyStarted,
    #[error("session has not been started")]
    NotStarted,
    #[error("session has already been shut down")]
    AlreadyShutDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Lifecycle {
    #[default]
    Created,
    Running,
    ShutDown,
}

/// What a pad press does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadAction {
    HotCue { number: u8, control: HotCueControl },

    /// Pads of this mode and page are not mapped to any control
    Unmapped(PadModePage),
}

/// Map a pad event onto its action.
///
/// Only presses on known pages have an action.
#[must_use]
pub fn pad_action(event: &PadEvent) -> Option<PadAction> {
    if !event.is_pressed() {
        return None;
    }
    let PadTarget::ModePage(mode_page) = event.target else {
        return None;
    };
    let action = match mode_page.mode {
        PadMode::HotCue => {
            let number = hot_cue_number(mode_page.page, event.address.pad);
            let control = if event.address.shifted {
                HotCueControl::Clear
            } else {
                HotCueControl::Activate
            };
            PadAction::HotCue { number, control }
        }
        PadMode::PadEffect | PadMode::BeatLoop | PadMode::BeatJump | PadMode::Sampler => {
            PadAction::Unmapped(mode_page)
        }
    };
    Some(action)
}

const fn hot_cue_number(page: u8, pad: u8) -> u8 {
    (page - 1) * PADS_PER_PAGE + pad
}

/// Page and pad of a hot cue.
const fn hot_cue_pad(number: u8) -> (u8, u8) {
    let index = number - 1;
    (index / PADS_PER_PAGE + 1, index % PADS_PER_PAGE + 1)
}

/// Per deck state of the controller.
#[derive(Debug, Clone, Default)]
pub struct DeckState {
    jog: JogState,
    pad_mode: PadModePage,
    shift: bool,
    time_mode: TimeMode,
    ring: RingState,
    pulses: PulseTimers,
    displays: JogDisplays,
}

impl DeckState {
    #[must_use]
    pub const fn jog(&self) -> &JogState {
        &self.jog
    }

    #[must_use]
    pub const fn pad_mode(&self) -> PadModePage {
        self.pad_mode
    }

    #[must_use]
    pub const fn is_shifted(&self) -> bool {
        self.shift
    }

    #[must_use]
    pub const fn time_mode(&self) -> TimeMode {
        self.time_mode
    }

    #[must_use]
    pub const fn ring(&self) -> &RingState {
        &self.ring
    }

    #[must_use]
    pub const fn pulses(&self) -> &PulseTimers {
        &self.pulses
    }

    #[must_use]
    pub const fn displays(&self) -> &JogDisplays {
        &self.displays
    }
}

/// Connects the DDJ-FLX10 with the mixing software.
///
/// The controller is driven from the outside by MIDI input messages,
/// control change notifications of the engine, and timer events. It
/// must be initialized once before and shut down once after use.
#[allow(missing_debug_implementations)]
pub struct Controller<E, T, C> {
    config: Config,
    engine: E,
    timers: T,
    output: OutputGateway<C>,
    jog: JogMotionController,
    scheduler: OutputScheduler,
    decks: [DeckState; DeckId::COUNT],
    lifecycle: Lifecycle,
}

impl<E, T, C> Controller<E, T, C> {
    #[must_use]
    pub fn new(config: Config, engine: E, timers: T, connection: C) -> Self {
        let jog = JogMotionController::new(config.jog.clone(), config.vinyl_mode);
        let scheduler = OutputScheduler::new(
            config.pulse_duration,
            config.enable_jog_ring_flash,
            config.jog_ring_flash_interval,
        );
        Self {
            config,
            engine,
            timers,
            output: OutputGateway::new(connection),
            jog,
            scheduler,
            decks: Default::default(),
            lifecycle: Lifecycle::Created,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    #[must_use]
    pub const fn timers(&self) -> &T {
        &self.timers
    }

    #[must_use]
    pub const fn output_connection(&self) -> &C {
        self.output.connection()
    }

    pub fn output_connection_mut(&mut self) -> &mut C {
        self.output.connection_mut()
    }

    #[must_use]
    pub const fn deck(&self, deck: DeckId) -> &DeckState {
        &self.decks[deck.index()]
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Running)
    }

    #[must_use]
    pub fn into_parts(self) -> (E, T, C) {
        let Self {
            engine,
            timers,
            output,
            ..
        } = self;
        (engine, timers, output.into_connection())
    }
}

impl<E, T, C> Controller<E, T, C>
where
    E: Engine,
    T: Timers<TimerEvent>,
    C: MidiOutputConnection,
{
    /// Subscribe to the engine and synchronize the device.
    pub fn init(&mut self) -> Result<(), SessionError> {
        match self.lifecycle {
            Lifecycle::Created => (),
            Lifecycle::Running => {
                log::warn!("Ignoring repeated initialization");
                return Err(SessionError::AlreadyStarted);
            }
            Lifecycle::ShutDown => {
                log::warn!("Cannot initialize after shutdown");
                return Err(SessionError::AlreadyShutDown);
            }
        }
        log::info!("Initializing {device}", device = DEVICE_DESCRIPTOR.name());
        for deck in DeckId::all() {
            self.subscribe_deck(deck);
            if self.config.enable_jog_display {
                self.emit(&encode_jog_info_visible(deck));
            }
            self.refresh_jog_displays(deck, true);
            self.refresh_pad_leds(deck);
        }
        self.lifecycle = Lifecycle::Running;
        Ok(())
    }

    /// Cancel all timers and switch off the device.
    pub fn shutdown(&mut self) -> Result<(), SessionError> {
        match self.lifecycle {
            Lifecycle::Running => (),
            Lifecycle::Created => {
                log::warn!("Cannot shut down before initialization");
                return Err(SessionError::NotStarted);
            }
            Lifecycle::ShutDown => {
                log::warn!("Ignoring repeated shutdown");
                return Err(SessionError::AlreadyShutDown);
            }
        }
        log::info!("Shutting down {device}", device = DEVICE_DESCRIPTOR.name());
        for deck in DeckId::all() {
            self.quiesce_deck(deck);
        }
        for deck in DeckId::all() {
            self.switch_off_deck(deck);
        }
        self.lifecycle = Lifecycle::ShutDown;
        Ok(())
    }

    fn subscribe_deck(&mut self, deck: DeckId) {
        for number in 1..=HOT_CUE_COUNT {
            self.engine
                .subscribe_deck(deck, DeckControl::HotCue(number, HotCueControl::Status));
            self.engine
                .subscribe_deck(deck, DeckControl::HotCue(number, HotCueControl::Color));
        }
        for param in [
            DeckParam::PlayPosition,
            DeckParam::Duration,
            DeckParam::Bpm,
            DeckParam::Rate,
            DeckParam::Play,
        ] {
            self.engine.subscribe_deck(deck, param);
        }
        if self.config.enable_vu_meters {
            self.engine.subscribe_deck(deck, DeckParam::VuMeter);
        }
    }

    /// Cancel all timers of a deck and restore the controls
    /// that have been touched by them.
    fn quiesce_deck(&mut self, deck: DeckId) {
        let Self {
            engine,
            timers,
            jog,
            scheduler,
            decks,
            ..
        } = self;
        let state = &mut decks[deck.index()];
        scheduler.stop_ring_flash(&mut state.ring, timers);
        jog.cancel_bend(deck, &mut state.jog, engine, timers);
        jog.release(deck, &mut state.jog, engine);
        for control in scheduler.cancel_pulses(&mut state.pulses, timers) {
            engine.set_deck_value(deck, control, 0.0);
        }
    }

    fn switch_off_deck(&mut self, deck: DeckId) {
        for page_index in 0..PAD_PAGE_INDEX_COUNT {
            for pad in 1..=PADS_PER_PAGE {
                let result = self.output.send_pad_led(deck, pad, page_index, LedOutput::Off);
                warn_on_send_error(result);
            }
        }
        for data1 in 0..=0x7f {
            self.emit(&encode_deck_led_off(deck, data1));
        }
        self.emit(&encode_jog_ring_off(deck));
        self.emit(&encode_jog_display_hidden(deck));
    }

    pub fn handle_input(&mut self, input: Input) {
        if !self.is_running() {
            log::debug!("Ignoring {input:?} while not running");
            return;
        }
        log::debug!("Received {input:?}");
        match input {
            Input::Pad(event) => self.handle_pad(&event),
            Input::Deck(deck, input) => self.handle_deck_input(deck, input),
            Input::TimeMode(deck, time_mode) => {
                self.decks[deck.index()].time_mode = time_mode;
                self.refresh_time(deck, true);
            }
        }
    }

    fn handle_deck_input(&mut self, deck: DeckId, input: DeckInput) {
        let state = &mut self.decks[deck.index()];
        match input {
            DeckInput::JogTouch(input) => {
                self.jog.touch(deck, &mut state.jog, input, &mut self.engine);
            }
            DeckInput::JogMotion { wheel: _, input } => {
                self.jog.motion(
                    deck,
                    &mut state.jog,
                    input,
                    &mut self.engine,
                    &mut self.timers,
                );
            }
            DeckInput::QuickJump(input) => {
                if let Some(direction) = JogMotionController::quick_jump_direction(input) {
                    self.beat_jump(deck, direction, self.config.quick_jump_size);
                }
            }
            DeckInput::Shift(input) => {
                state.shift = input.is_pressed();
            }
            DeckInput::PadModeSelect { mode, input } => {
                if input.is_pressed() {
                    let page = if state.shift { 2 } else { 1 };
                    self.select_pad_mode(deck, PadModePage::new(mode, page));
                }
            }
            DeckInput::BeatJump {
                direction,
                beats,
                input,
            } => {
                if input.is_pressed() {
                    self.beat_jump(deck, direction, beats);
                }
            }
        }
    }

    fn handle_pad(&mut self, event: &PadEvent) {
        let deck = event.address.deck;
        if let (true, PadTarget::ModePage(mode_page)) = (event.is_pressed(), event.target) {
            let active = &mut self.decks[deck.index()].pad_mode;
            if active.mode == mode_page.mode {
                active.page = mode_page.page;
            }
        }
        match pad_action(event) {
            Some(PadAction::HotCue { number, control }) => {
                self.pulse(deck, DeckControl::HotCue(number, control));
            }
            Some(PadAction::Unmapped(mode_page)) => {
                log::debug!(
                    "Unmapped pad {pad} of {mode_page:?} pressed on deck {deck}",
                    pad = event.address.pad
                );
            }
            None => {
                if event.is_pressed() {
                    log::debug!("Ignoring pad press on unknown page: {event:?}");
                }
            }
        }
    }

    fn beat_jump(&mut self, deck: DeckId, direction: BeatJumpDirection, beats: u16) {
        self.engine
            .set_deck_value(deck, DeckParam::BeatJumpSize, f64::from(beats));
        let control = match direction {
            BeatJumpDirection::Backward => DeckParam::BeatJumpBackward,
            BeatJumpDirection::Forward => DeckParam::BeatJumpForward,
        };
        self.pulse(deck, control.into());
    }

    fn pulse(&mut self, deck: DeckId, control: DeckControl) {
        self.scheduler.pulse(
            deck,
            &mut self.decks[deck.index()].pulses,
            control,
            &mut self.engine,
            &mut self.timers,
        );
    }

    /// Activate a pad mode and update all pad LEDs of the deck.
    pub fn select_pad_mode(&mut self, deck: DeckId, mode_page: PadModePage) {
        log::debug!("Selecting {mode_page:?} on deck {deck}");
        self.decks[deck.index()].pad_mode = mode_page;
        self.refresh_pad_leds(deck);
    }

    fn refresh_pad_leds(&mut self, deck: DeckId) {
        let hot_cues_active = self.decks[deck.index()].pad_mode.mode == PadMode::HotCue;
        for page_index in 0..PAD_PAGE_INDEX_COUNT {
            let Some(mode_page) = PadModePage::from_page_index(page_index) else {
                continue;
            };
            for pad in 1..=PADS_PER_PAGE {
                let on = hot_cues_active
                    && mode_page.mode == PadMode::HotCue
                    && self.is_hot_cue_set(deck, hot_cue_number(mode_page.page, pad));
                warn_on_send_error(self.output.send_pad_led(deck, pad, page_index, on.into()));
            }
        }
    }

    fn is_hot_cue_set(&self, deck: DeckId, number: u8) -> bool {
        let status = self
            .engine
            .get_deck_value(deck, DeckControl::HotCue(number, HotCueControl::Status));
        status.is_finite() && status != 0.0
    }

    fn update_hot_cue_led(&mut self, deck: DeckId, number: u8) {
        if !(1..=HOT_CUE_COUNT).contains(&number) {
            return;
        }
        if self.decks[deck.index()].pad_mode.mode != PadMode::HotCue {
            return;
        }
        let (page, pad) = hot_cue_pad(number);
        let Some(page_index) = PadModePage::new(PadMode::HotCue, page).page_index() else {
            return;
        };
        let on = self.is_hot_cue_set(deck, number);
        warn_on_send_error(self.output.send_pad_led(deck, pad, page_index, on.into()));
    }

    /// Change notification from the engine.
    pub fn handle_control_change(&mut self, group: &str, control: &str, value: f64) {
        if !self.is_running() {
            log::debug!("Ignoring change of {group} {control} while not running");
            return;
        }
        let Some(deck) = DeckId::from_group(group) else {
            log::debug!("Ignoring change of {control} in unknown group {group}");
            return;
        };
        let Ok(control) = control.parse::<DeckControl>() else {
            log::debug!("Ignoring change of unknown control {control} on deck {deck}");
            return;
        };
        match control {
            DeckControl::HotCue(number, HotCueControl::Status | HotCueControl::Color) => {
                self.update_hot_cue_led(deck, number);
            }
            DeckControl::Param(DeckParam::PlayPosition) => {
                self.refresh_marker(deck, false);
                self.refresh_time(deck, false);
            }
            DeckControl::Param(DeckParam::Duration) => {
                self.refresh_time(deck, false);
            }
            DeckControl::Param(DeckParam::Bpm) => {
                self.refresh_bpm(deck, false);
            }
            DeckControl::Param(DeckParam::Rate) => {
                self.refresh_speed(deck, false);
            }
            DeckControl::Param(DeckParam::Play) => {
                let mode = if value > 0.0 {
                    RingMode::On
                } else {
                    RingMode::Off
                };
                self.set_jog_ring(deck, mode);
            }
            DeckControl::Param(DeckParam::VuMeter) => {
                self.update_vu_meter(deck, value);
            }
            control => {
                log::debug!("Ignoring change of {control} on deck {deck}");
            }
        }
    }

    pub fn set_jog_ring(&mut self, deck: DeckId, mode: RingMode) {
        let lit = self.scheduler.set_ring_mode(
            deck,
            &mut self.decks[deck.index()].ring,
            mode,
            &mut self.timers,
        );
        if let Some(lit) = lit {
            warn_on_send_error(self.output.send_jog_ring(deck, lit));
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn update_vu_meter(&mut self, deck: DeckId, value: f64) {
        if !self.config.enable_vu_meters || !value.is_finite() {
            return;
        }
        let level = (value * 127.0).round().clamp(0.0, 127.0) as u8;
        warn_on_send_error(self.output.send_vu_meter(deck, level));
    }

    fn refresh_jog_displays(&mut self, deck: DeckId, force: bool) {
        self.refresh_marker(deck, force);
        self.refresh_bpm(deck, force);
        self.refresh_speed(deck, force);
        self.refresh_time(deck, force);
    }

    fn refresh_u14(
        &mut self,
        deck: DeckId,
        field: JogDisplayField,
        param: DeckParam,
        encode: fn(f64) -> Option<u16>,
        force: bool,
    ) {
        if !self.config.enable_jog_display {
            return;
        }
        let reading = self.engine.get_deck_value(deck, param);
        let Some(value) = encode(reading) else {
            log::debug!("Cannot display {param:?} = {reading} on deck {deck}");
            return;
        };
        let encoded = split_u14(value.into());
        let displays = &mut self.decks[deck.index()].displays;
        let display = match field {
            JogDisplayField::Marker => &mut displays.marker,
            JogDisplayField::Bpm => &mut displays.bpm,
            JogDisplayField::Speed => &mut displays.speed,
        };
        if update_display(display, reading, encoded, force) {
            warn_on_send_error(self.output.send_jog_display_u14(deck, field, encoded));
        }
    }

    fn refresh_marker(&mut self, deck: DeckId, force: bool) {
        self.refresh_u14(
            deck,
            JogDisplayField::Marker,
            DeckParam::PlayPosition,
            degrees,
            force,
        );
    }

    fn refresh_bpm(&mut self, deck: DeckId, force: bool) {
        self.refresh_u14(deck, JogDisplayField::Bpm, DeckParam::Bpm, bpm_tenths, force);
    }

    fn refresh_speed(&mut self, deck: DeckId, force: bool) {
        self.refresh_u14(
            deck,
            JogDisplayField::Speed,
            DeckParam::Rate,
            rate_tenths,
            force,
        );
    }

    fn refresh_time(&mut self, deck: DeckId, force: bool) {
        if !self.config.enable_jog_display || !self.config.enable_jog_time {
            return;
        }
        let position = self.engine.get_deck_value(deck, DeckParam::PlayPosition);
        let duration = self.engine.get_deck_value(deck, DeckParam::Duration);
        let state = &mut self.decks[deck.index()];
        let Some(seconds) = display_seconds(position, duration, state.time_mode) else {
            log::debug!("Cannot display time of {position} x {duration} s on deck {deck}");
            return;
        };
        let Some(encoded) = minutes_seconds(seconds) else {
            return;
        };
        if update_display(&mut state.displays.time, seconds, encoded, force) {
            warn_on_send_error(self.output.send_jog_time(deck, encoded));
        }
    }

    /// Dispatch a timer event that has been scheduled by this controller.
    ///
    /// Stale events of canceled or replaced timers are ignored.
    pub fn handle_timer(&mut self, handle: TimerHandle, event: TimerEvent) {
        if !self.is_running() {
            log::debug!("Ignoring {event:?} while not running");
            return;
        }
        match event {
            TimerEvent::BendReset(deck) => {
                self.jog.bend_reset(
                    deck,
                    &mut self.decks[deck.index()].jog,
                    handle,
                    &mut self.engine,
                );
            }
            TimerEvent::RingFlash(deck) => {
                if let Some(lit) = self
                    .scheduler
                    .ring_flash_tick(&mut self.decks[deck.index()].ring, handle)
                {
                    warn_on_send_error(self.output.send_jog_ring(deck, lit));
                }
            }
            TimerEvent::PulseReset(deck, control) => {
                self.scheduler.pulse_reset(
                    deck,
                    &mut self.decks[deck.index()].pulses,
                    control,
                    handle,
                    &mut self.engine,
                );
            }
        }
    }

    fn emit(&mut self, message: &[u8]) {
        warn_on_send_error(self.output.send(message));
    }
}

fn warn_on_send_error(result: OutputResult<()>) {
    if let Err(err) = result {
        log::warn!("Failed to send MIDI output: {err}");
    }
}

fn update_display(
    display: &mut DisplayValue,
    reading: f64,
    encoded: (u8, u8),
    force: bool,
) -> bool {
    if force {
        display.invalidate();
    }
    display.update(reading, encoded)
}

impl<E, C> Controller<E, TimerQueue<TimerEvent>, C>
where
    E: Engine,
    C: MidiOutputConnection,
{
    /// Fire all timers that are due at `now`.
    pub fn run_due_timers(&mut self, now: Duration) {
        while let Some((handle, event)) = self.timers.pop_due(now) {
            self.handle_timer(handle, event);
        }
        self.timers.advance(now);
    }
}

impl<E, T, C> MidiInputHandler for Controller<E, T, C>
where
    E: Engine,
    T: Timers<TimerEvent>,
    C: MidiOutputConnection,
{
    fn handle_midi_input(&mut self, input: &[u8]) -> bool {
        if !self.is_running() {
            log::debug!("Ignoring MIDI input {input:x?} while not running");
            return false;
        }
        let Some(input) = Input::try_from_midi_message(input) else {
            log::trace!("Unrecognized MIDI input {input:x?}");
            return false;
        };
        self.handle_input(input);
        true
    }
}
