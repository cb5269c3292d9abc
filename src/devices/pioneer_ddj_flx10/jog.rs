// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

//! Scratching and pitch bending with the jog wheel.
//!
//! Touching the platter starts scratching. Turning the wheel without
//! touching it bends the pitch temporarily. The bend is reset shortly
//! after the last motion.

use super::{BeatJumpDirection, JogConfig, TimerEvent};
use crate::{
    engine::DeckControlSurface,
    timer::replace_timer,
    ButtonInput, ControlSurface, DeckId, DeckParam, ScratchEngine, StepEncoderInput, TimerHandle,
    TimerRepeat, Timers,
};

/// Both enabling and disabling of scratching are ramped.
const SCRATCH_RAMP: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JogMode {
    Idle,
    /// Pitch bend is active until the reset timer fires
    Bending,
    Scratching,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JogState {
    touched: bool,
    scratching: bool,
    bend_value: f64,
    bend_reset_timer: Option<TimerHandle>,
}

impl JogState {
    #[must_use]
    pub const fn is_touched(&self) -> bool {
        self.touched
    }

    #[must_use]
    pub const fn is_scratching(&self) -> bool {
        self.scratching
    }

    #[must_use]
    pub const fn bend_value(&self) -> f64 {
        self.bend_value
    }

    #[must_use]
    pub const fn bend_reset_timer(&self) -> Option<TimerHandle> {
        self.bend_reset_timer
    }

    #[must_use]
    pub const fn mode(&self) -> JogMode {
        if self.scratching {
            JogMode::Scratching
        } else if self.bend_reset_timer.is_some() {
            JogMode::Bending
        } else {
            JogMode::Idle
        }
    }
}

#[derive(Debug, Clone)]
pub struct JogMotionController {
    config: JogConfig,
    vinyl_mode: bool,
}

#[allow(clippy::unused_self)]
impl JogMotionController {
    #[must_use]
    pub const fn new(config: JogConfig, vinyl_mode: bool) -> Self {
        Self { config, vinyl_mode }
    }

    #[must_use]
    pub const fn config(&self) -> &JogConfig {
        &self.config
    }

    pub fn touch<S>(&self, deck: DeckId, state: &mut JogState, input: ButtonInput, scratch: &mut S)
    where
        S: ScratchEngine + ?Sized,
    {
        match input {
            ButtonInput::Pressed => {
                state.touched = true;
                if !self.vinyl_mode {
                    log::debug!("Not scratching on deck {deck} without vinyl mode");
                    return;
                }
                log::debug!("Start scratching on deck {deck}");
                scratch.scratch_enable(deck, &self.config.scratch, SCRATCH_RAMP);
                state.scratching = true;
            }
            ButtonInput::Released => {
                state.touched = false;
                if !self.vinyl_mode {
                    return;
                }
                log::debug!("Stop scratching on deck {deck}");
                scratch.scratch_disable(deck, SCRATCH_RAMP);
                state.scratching = false;
            }
        }
    }

    /// Rotation of the platter or the outer ring.
    ///
    /// Ticks are forwarded to the scratch emulation while it is active,
    /// which includes the ramp after releasing the platter. Otherwise
    /// the pitch is bent.
    pub fn motion<E, T>(
        &self,
        deck: DeckId,
        state: &mut JogState,
        input: StepEncoderInput,
        engine: &mut E,
        timers: &mut T,
    ) where
        E: ControlSurface + ScratchEngine + ?Sized,
        T: Timers<TimerEvent> + ?Sized,
    {
        let StepEncoderInput { delta } = input;
        if engine.is_scratching(deck) {
            engine.scratch_tick(deck, delta);
            return;
        }
        let bend_value = f64::from(delta) * self.config.bend_scale;
        state.bend_value = bend_value;
        engine.set_deck_value(deck, DeckParam::Wheel, bend_value);
        replace_timer(
            timers,
            &mut state.bend_reset_timer,
            self.config.bend_reset,
            TimerEvent::BendReset(deck),
            TimerRepeat::Once,
        );
    }

    /// Zero the pitch bend after the last motion.
    ///
    /// Returns `false` if the timer is stale.
    pub fn bend_reset<S>(
        &self,
        deck: DeckId,
        state: &mut JogState,
        handle: TimerHandle,
        surface: &mut S,
    ) -> bool
    where
        S: ControlSurface + ?Sized,
    {
        if state.bend_reset_timer != Some(handle) {
            log::debug!("Ignoring stale bend reset {handle:?} on deck {deck}");
            return false;
        }
        state.bend_reset_timer = None;
        state.bend_value = 0.0;
        surface.set_deck_value(deck, DeckParam::Wheel, 0.0);
        true
    }

    /// Cancel a pending bend reset and zero the bend immediately.
    ///
    /// Returns `false` if no bend was pending.
    pub fn cancel_bend<S, T>(
        &self,
        deck: DeckId,
        state: &mut JogState,
        surface: &mut S,
        timers: &mut T,
    ) -> bool
    where
        S: ControlSurface + ?Sized,
        T: Timers<TimerEvent> + ?Sized,
    {
        let Some(handle) = state.bend_reset_timer.take() else {
            return false;
        };
        timers.cancel(handle);
        state.bend_value = 0.0;
        surface.set_deck_value(deck, DeckParam::Wheel, 0.0);
        true
    }

    /// Stop scratching immediately.
    pub fn release<S>(&self, deck: DeckId, state: &mut JogState, scratch: &mut S)
    where
        S: ScratchEngine + ?Sized,
    {
        state.touched = false;
        if state.scratching {
            scratch.scratch_disable(deck, false);
            state.scratching = false;
        }
    }

    /// Direction of the quick jump control.
    ///
    /// Returns `None` if the control has not been moved.
    #[must_use]
    pub const fn quick_jump_direction(input: StepEncoderInput) -> Option<BeatJumpDirection> {
        if input.delta < 0 {
            Some(BeatJumpDirection::Backward)
        } else if input.delta > 0 {
            Some(BeatJumpDirection::Forward)
        } else {
            None
        }
    }
}
