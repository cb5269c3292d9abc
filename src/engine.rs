// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

//! Collaborators provided by the hosting mixing software.
//!
//! Controls are addressed by a group label (e.g. `[Channel1]`) and a
//! control name at this boundary. Internally the deck-scoped
//! [`DeckControl`] is used and only formatted into a name when talking
//! to the host.

use std::{fmt, str::FromStr};

use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::DeckId;

/// Read and write named control values.
pub trait ControlSurface {
    /// Read the current value.
    ///
    /// Unknown or unavailable controls should be reported as `f64::NAN`.
    #[must_use]
    fn get_value(&self, group: &str, control: &str) -> f64;

    fn set_value(&mut self, group: &str, control: &str, value: f64);
}

/// Register for change notifications.
///
/// After subscribing, the host is expected to report every change of
/// the control by invoking the corresponding handler of the controller,
/// e.g. [`crate::devices::pioneer_ddj_flx10::Controller::handle_control_change()`].
pub trait ControlSubscriptions {
    fn subscribe(&mut self, group: &str, control: &str);
}

/// Parameters of the scratch emulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScratchParams {
    /// Intervals per revolution of the jog wheel
    pub resolution: u32,

    /// Rotational speed of the virtual record
    pub rpm: f64,

    /// Filter coefficient
    pub alpha: f64,

    /// Filter coefficient for acceleration
    pub beta: f64,
}

/// Scratch emulation of the host.
pub trait ScratchEngine {
    fn scratch_enable(&mut self, deck: DeckId, params: &ScratchParams, ramp: bool);

    fn scratch_tick(&mut self, deck: DeckId, delta: i32);

    fn scratch_disable(&mut self, deck: DeckId, ramp: bool);

    /// Scratching might continue for a short while after
    /// being disabled with ramping enabled.
    #[must_use]
    fn is_scratching(&self, deck: DeckId) -> bool;
}

/// All host collaborators except timers and MIDI output.
pub trait Engine: ControlSurface + ControlSubscriptions + ScratchEngine {}

impl<T> Engine for T where T: ControlSurface + ControlSubscriptions + ScratchEngine {}

/// Access controls of a [`DeckId`] through their typed representation.
pub trait DeckControlSurface: ControlSurface {
    #[must_use]
    fn get_deck_value(&self, deck: DeckId, control: impl Into<DeckControl>) -> f64 {
        self.get_value(&deck.group(), &control.into().to_string())
    }

    fn set_deck_value(&mut self, deck: DeckId, control: impl Into<DeckControl>, value: f64) {
        let control = control.into();
        log::trace!("Setting {control} of deck {deck} to {value}");
        self.set_value(&deck.group(), &control.to_string(), value);
    }
}

impl<T> DeckControlSurface for T where T: ControlSurface + ?Sized {}

pub trait DeckControlSubscriptions: ControlSubscriptions {
    fn subscribe_deck(&mut self, deck: DeckId, control: impl Into<DeckControl>) {
        self.subscribe(&deck.group(), &control.into().to_string());
    }
}

impl<T> DeckControlSubscriptions for T where T: ControlSubscriptions + ?Sized {}

/// Deck controls with a fixed name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
pub enum DeckParam {
    /// Relative position in the track, 0.0 (start) to 1.0 (end)
    #[strum(serialize = "playposition")]
    PlayPosition,
    /// Track duration in seconds
    #[strum(serialize = "duration")]
    Duration,
    #[strum(serialize = "bpm")]
    Bpm,
    /// Relative tempo, -1.0 to 1.0
    #[strum(serialize = "rate")]
    Rate,
    /// Temporary pitch bend
    #[strum(serialize = "wheel")]
    Wheel,
    #[strum(serialize = "play")]
    Play,
    #[strum(serialize = "vu_meter")]
    VuMeter,
    #[strum(serialize = "beatjump_size")]
    BeatJumpSize,
    #[strum(serialize = "beatjump_forward")]
    BeatJumpForward,
    #[strum(serialize = "beatjump_backward")]
    BeatJumpBackward,
}

/// Per hot cue controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum HotCueControl {
    Activate,
    Clear,
    Status,
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeckControl {
    Param(DeckParam),
    /// Hot cue number, starting at 1
    HotCue(u8, HotCueControl),
}

impl From<DeckParam> for DeckControl {
    fn from(from: DeckParam) -> Self {
        Self::Param(from)
    }
}

const HOT_CUE_PREFIX: &str = "hotcue_";

impl fmt::Display for DeckControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Param(param) => {
                let param: &'static str = param.into();
                f.write_str(param)
            }
            Self::HotCue(number, control) => {
                let control: &'static str = control.into();
                write!(f, "{HOT_CUE_PREFIX}{number}_{control}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownControlError;

impl FromStr for DeckControl {
    type Err = UnknownControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(param) = s.parse() {
            return Ok(Self::Param(param));
        }
        let (number, control) = s
            .strip_prefix(HOT_CUE_PREFIX)
            .and_then(|suffix| suffix.split_once('_'))
            .ok_or(UnknownControlError)?;
        if !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UnknownControlError);
        }
        let number = number
            .parse()
            .ok()
            .filter(|number| *number > 0)
            .ok_or(UnknownControlError)?;
        let control = control.parse().map_err(|_| UnknownControlError)?;
        Ok(Self::HotCue(number, control))
    }
}
