// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

//! Time-based output: emulated button presses and the flashing jog ring.

use std::{collections::HashMap, time::Duration};

use crate::{
    engine::DeckControlSurface,
    timer::{cancel_timer, replace_timer},
    ControlSurface, DeckControl, DeckId, TimerHandle, TimerRepeat, Timers,
};

/// Events scheduled by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Zero the pitch bend of the jog wheel
    BendReset(DeckId),
    /// Toggle the jog ring
    RingFlash(DeckId),
    /// Release an emulated button press
    PulseReset(DeckId, DeckControl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RingMode {
    #[default]
    Off,
    On,
    Flash,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingState {
    mode: RingMode,
    lit: bool,
    flash_timer: Option<TimerHandle>,
}

impl RingState {
    #[must_use]
    pub const fn mode(&self) -> RingMode {
        self.mode
    }

    /// The last state that has been sent
    #[must_use]
    pub const fn is_lit(&self) -> bool {
        self.lit
    }

    #[must_use]
    pub const fn flash_timer(&self) -> Option<TimerHandle> {
        self.flash_timer
    }
}

/// Pending pulse resets of a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PulseTimers {
    pending: HashMap<DeckControl, TimerHandle>,
}

impl PulseTimers {
    #[must_use]
    pub fn is_pending(&self, control: DeckControl) -> bool {
        self.pending.contains_key(&control)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[derive(Debug, Clone)]
pub struct OutputScheduler {
    pulse_duration: Duration,
    ring_flash_enabled: bool,
    ring_flash_interval: Duration,
}

#[allow(clippy::unused_self)]
impl OutputScheduler {
    #[must_use]
    pub const fn new(
        pulse_duration: Duration,
        ring_flash_enabled: bool,
        ring_flash_interval: Duration,
    ) -> Self {
        Self {
            pulse_duration,
            ring_flash_enabled,
            ring_flash_interval,
        }
    }

    /// Emulate a short button press.
    ///
    /// Sets `control` to 1 and resets it to 0 after the pulse duration.
    /// Pulsing a control again before the reset restarts the duration.
    pub fn pulse<S, T>(
        &self,
        deck: DeckId,
        pulses: &mut PulseTimers,
        control: DeckControl,
        surface: &mut S,
        timers: &mut T,
    ) where
        S: ControlSurface + ?Sized,
        T: Timers<TimerEvent> + ?Sized,
    {
        surface.set_deck_value(deck, control, 1.0);
        let mut slot = pulses.pending.remove(&control);
        let handle = replace_timer(
            timers,
            &mut slot,
            self.pulse_duration,
            TimerEvent::PulseReset(deck, control),
            TimerRepeat::Once,
        );
        pulses.pending.insert(control, handle);
    }

    /// Complete a pulse.
    ///
    /// Returns `false` if the timer is stale.
    pub fn pulse_reset<S>(
        &self,
        deck: DeckId,
        pulses: &mut PulseTimers,
        control: DeckControl,
        handle: TimerHandle,
        surface: &mut S,
    ) -> bool
    where
        S: ControlSurface + ?Sized,
    {
        if pulses.pending.get(&control) != Some(&handle) {
            log::debug!("Ignoring stale pulse reset {handle:?} of {control} on deck {deck}");
            return false;
        }
        pulses.pending.remove(&control);
        surface.set_deck_value(deck, control, 0.0);
        true
    }

    /// Cancel all pending pulses.
    ///
    /// Returns the controls that still need to be reset.
    pub fn cancel_pulses<T>(&self, pulses: &mut PulseTimers, timers: &mut T) -> Vec<DeckControl>
    where
        T: Timers<TimerEvent> + ?Sized,
    {
        pulses
            .pending
            .drain()
            .map(|(control, handle)| {
                timers.cancel(handle);
                control
            })
            .collect()
    }

    /// Switch the jog ring mode.
    ///
    /// Returns the state that needs to be sent immediately, if any.
    pub fn set_ring_mode<T>(
        &self,
        deck: DeckId,
        ring: &mut RingState,
        mode: RingMode,
        timers: &mut T,
    ) -> Option<bool>
    where
        T: Timers<TimerEvent> + ?Sized,
    {
        match mode {
            RingMode::Off | RingMode::On => {
                self.stop_ring_flash(ring, timers);
                let lit = mode == RingMode::On;
                ring.mode = mode;
                ring.lit = lit;
                Some(lit)
            }
            RingMode::Flash => {
                if !self.ring_flash_enabled {
                    log::debug!("Flashing of the jog ring on deck {deck} is disabled");
                    return None;
                }
                self.flash_ring(deck, ring, self.ring_flash_interval, timers);
                None
            }
        }
    }

    /// Start toggling the jog ring periodically.
    ///
    /// A flash that is already running is restarted. Every flash
    /// starts dark, i.e. the first tick lights the ring.
    pub fn flash_ring<T>(
        &self,
        deck: DeckId,
        ring: &mut RingState,
        interval: Duration,
        timers: &mut T,
    ) -> TimerHandle
    where
        T: Timers<TimerEvent> + ?Sized,
    {
        ring.mode = RingMode::Flash;
        ring.lit = false;
        replace_timer(
            timers,
            &mut ring.flash_timer,
            interval,
            TimerEvent::RingFlash(deck),
            TimerRepeat::Periodic,
        )
    }

    /// Toggle a flashing jog ring.
    ///
    /// Returns the new state or `None` if the timer is stale.
    pub fn ring_flash_tick(&self, ring: &mut RingState, handle: TimerHandle) -> Option<bool> {
        if ring.flash_timer != Some(handle) {
            log::debug!("Ignoring stale jog ring flash {handle:?}");
            return None;
        }
        ring.lit = !ring.lit;
        Some(ring.lit)
    }

    pub fn stop_ring_flash<T>(&self, ring: &mut RingState, timers: &mut T) -> bool
    where
        T: Timers<TimerEvent> + ?Sized,
    {
        cancel_timer::<TimerEvent, _>(timers, &mut ring.flash_timer)
    }
}
