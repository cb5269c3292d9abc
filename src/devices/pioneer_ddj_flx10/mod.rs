// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

//! # Pioneer DDJ-FLX10
//!
//! 4-deck controller with jog wheel displays and two pages of
//! performance pads per pad mode.
//!
//! Deck *n* sends its buttons and encoders on MIDI channel *n*,
//! the performance pads on dedicated channels (one for the normal
//! and one for the shifted layer of each deck), and the jog wheel
//! displays are addressed on channel 16.
//!
//! The [`Controller`] connects the device with the hosting mixing
//! software.

use std::{borrow::Cow, time::Duration};

use strum::{EnumCount, EnumIter};

use crate::{DeviceDescriptor, MidiDeviceDescriptor, ScratchParams};

mod controller;
pub use self::controller::{pad_action, Controller, DeckState, PadAction, SessionError};

mod display;
pub use self::display::{
    bpm_tenths, degrees, display_seconds, minutes_seconds, rate_tenths, split_u14, DisplayValue,
    JogDisplays, TimeMode, BPM_TENTHS_MAX, DEGREES_MAX, RATE_TENTHS_CENTER, RATE_TENTHS_MAX,
    U14_MAX,
};

mod input;
pub use self::input::{
    decode_pad, BeatJumpDirection, DeckInput, Input, JogWheel, PadAddress, PadEvent, PadTarget,
};

mod jog;
pub use self::jog::{JogMode, JogMotionController, JogState};

mod output;
pub use self::output::{
    encode_deck_led_off, encode_jog_display_hidden, encode_jog_display_u14,
    encode_jog_info_visible, encode_jog_ring, encode_jog_ring_off, encode_jog_time, encode_pad,
    encode_pad_led, encode_vu_meter, JogDisplayField, OutputGateway,
};

mod scheduler;
pub use self::scheduler::{OutputScheduler, PulseTimers, RingMode, RingState, TimerEvent};

pub const MIDI_DEVICE_DESCRIPTOR: &MidiDeviceDescriptor = &MidiDeviceDescriptor {
    device: DeviceDescriptor {
        vendor_name: Cow::Borrowed("Pioneer DJ"),
        product_name: Cow::Borrowed("DDJ-FLX10"),
    },
    port_name_prefix: "DDJ-FLX10",
};

pub const DEVICE_DESCRIPTOR: &DeviceDescriptor = &MIDI_DEVICE_DESCRIPTOR.device;

const MIDI_STATUS_NOTE_OFF: u8 = 0x80;
const MIDI_STATUS_NOTE_ON: u8 = 0x90;
const MIDI_STATUS_CC: u8 = 0xb0;

// Normal and shifted pad layers of deck 1, followed by deck 2..4.
const MIDI_STATUS_PAD_FIRST: u8 = 0x97;
const MIDI_STATUS_PAD_LAST: u8 = 0x9e;

// Channel 16
const MIDI_STATUS_JOG_DISPLAY_NOTE: u8 = 0x9f;
const MIDI_STATUS_JOG_DISPLAY_CC: u8 = 0xbf;

const LED_OFF: u8 = 0x00;
const LED_ON: u8 = 0x7f;

// Deck buttons (note)
const MIDI_DECK_HOT_CUE_MODE_BUTTON: u8 = 0x1b;
const MIDI_DECK_PAD_FX_MODE_BUTTON: u8 = 0x1e;
const MIDI_DECK_BEAT_JUMP_MODE_BUTTON: u8 = 0x20;
const MIDI_DECK_SAMPLER_MODE_BUTTON: u8 = 0x22;
const MIDI_DECK_JOG_TOUCH: u8 = 0x36;
const MIDI_DECK_SHIFT_BUTTON: u8 = 0x3f;
const MIDI_DECK_BEAT_JUMP_BACKWARD_16_BUTTON: u8 = 0x61;
const MIDI_DECK_BEAT_JUMP_FORWARD_16_BUTTON: u8 = 0x62;
const MIDI_DECK_JOG_TOUCH_SHIFTED: u8 = 0x67;
const MIDI_DECK_BEAT_LOOP_MODE_BUTTON: u8 = 0x6d;
const MIDI_DECK_BEAT_JUMP_BACKWARD_32_BUTTON: u8 = 0x70;
const MIDI_DECK_BEAT_JUMP_FORWARD_32_BUTTON: u8 = 0x71;

// Deck encoders and meters (CC)
const MIDI_DECK_VU_METER: u8 = 0x02;
const MIDI_DECK_JOG_WHEEL_SIDE: u8 = 0x21;
const MIDI_DECK_JOG_WHEEL_TOP: u8 = 0x22;
const MIDI_DECK_QUICK_JUMP: u8 = 0x29;

// Jog display controls. The zero-based deck index is added.
const MIDI_JOG_RING: u8 = 0x09; // note
const MIDI_JOG_MARKER_MSB: u8 = 0x10;
const MIDI_JOG_BPM_MSB: u8 = 0x14;
const MIDI_JOG_TIME_MODE: u8 = 0x14; // note
const MIDI_JOG_SPEED_MSB: u8 = 0x18;
const MIDI_JOG_MARKER_LSB: u8 = 0x30;
const MIDI_JOG_BPM_LSB: u8 = 0x34;
const MIDI_JOG_SPEED_LSB: u8 = 0x38;
const MIDI_JOG_RING_OFF: u8 = 0x50;
const MIDI_JOG_DISPLAY_HIDE: u8 = 0x54; // note
const MIDI_JOG_INFO_SHOW: u8 = 0x5d; // note

// Minutes and seconds are interleaved, i.e. the deck index is doubled.
const MIDI_JOG_TIME_MINUTES: u8 = 0x42;
const MIDI_JOG_TIME_SECONDS: u8 = 0x43;

pub const PADS_PER_PAGE: u8 = 8;

pub const PAGES_PER_MODE: u8 = 2;

/// Number of hot cues that are accessible from the pads
pub const HOT_CUE_COUNT: u8 = PADS_PER_PAGE * PAGES_PER_MODE;

/// Software control family of the performance pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumCount)]
pub enum PadMode {
    #[default]
    HotCue,
    PadEffect,
    BeatLoop,
    BeatJump,
    Sampler,
}

/// A pad mode with one of its pages, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PadModePage {
    pub mode: PadMode,
    pub page: u8,
}

/// Mode and page of the pads, indexed by the page index of the
/// MIDI message. Other modes are not addressable.
const PAD_MODE_PAGES: [PadModePage; 4] = [
    PadModePage::new(PadMode::HotCue, 1),
    PadModePage::new(PadMode::HotCue, 2),
    PadModePage::new(PadMode::PadEffect, 1),
    PadModePage::new(PadMode::PadEffect, 2),
];

#[allow(clippy::cast_possible_truncation)]
pub const PAD_PAGE_INDEX_COUNT: u8 = PAD_MODE_PAGES.len() as u8;

impl PadModePage {
    #[must_use]
    pub const fn new(mode: PadMode, page: u8) -> Self {
        Self { mode, page }
    }

    #[must_use]
    pub fn from_page_index(page_index: u8) -> Option<Self> {
        PAD_MODE_PAGES.get(usize::from(page_index)).copied()
    }

    /// The page index for addressing pads of this mode and page.
    ///
    /// Returns `None` if pads in this mode are not addressable.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn page_index(self) -> Option<u8> {
        PAD_MODE_PAGES
            .iter()
            .position(|mode_page| *mode_page == self)
            .map(|index| index as u8)
    }
}

impl Default for PadModePage {
    fn default() -> Self {
        Self::new(PadMode::default(), 1)
    }
}

/// Jog wheel settings
#[derive(Debug, Clone, PartialEq)]
pub struct JogConfig {
    pub scratch: ScratchParams,

    /// Pitch bend per step of the jog wheel
    pub bend_scale: f64,

    /// Delay for resetting the pitch bend after the last motion
    pub bend_reset: Duration,
}

impl JogConfig {
    pub const SCRATCH_PARAMS_DEFAULT: ScratchParams = ScratchParams {
        resolution: 5760,
        rpm: 33.0 + 1.0 / 3.0,
        alpha: 1.0 / 32.0,
        beta: 1.0 / 32.0 / 64.0,
    };
    pub const BEND_SCALE_DEFAULT: f64 = 0.025;
    pub const BEND_RESET_DEFAULT: Duration = Duration::from_millis(40);
}

impl Default for JogConfig {
    fn default() -> Self {
        Self {
            scratch: Self::SCRATCH_PARAMS_DEFAULT,
            bend_scale: Self::BEND_SCALE_DEFAULT,
            bend_reset: Self::BEND_RESET_DEFAULT,
        }
    }
}

/// Static configuration of the [`Controller`]
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Touching the jog wheel enables scratching
    pub vinyl_mode: bool,

    pub enable_vu_meters: bool,

    /// Jog wheel displays, i.e. marker, BPM, playing speed, and time
    pub enable_jog_display: bool,

    /// Elapsed/remaining time on the jog wheel displays
    pub enable_jog_time: bool,

    pub enable_jog_ring_flash: bool,

    /// Beats to jump when using the quick jump control
    pub quick_jump_size: u16,

    pub jog_ring_flash_interval: Duration,

    /// Duration of emulated button presses
    pub pulse_duration: Duration,

    pub jog: JogConfig,
}

impl Config {
    pub const QUICK_JUMP_SIZE_DEFAULT: u16 = 16;
    pub const JOG_RING_FLASH_INTERVAL_DEFAULT: Duration = Duration::from_millis(300);
    pub const PULSE_DURATION_DEFAULT: Duration = Duration::from_millis(20);
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vinyl_mode: true,
            enable_vu_meters: true,
            enable_jog_display: true,
            enable_jog_time: true,
            enable_jog_ring_flash: true,
            quick_jump_size: Self::QUICK_JUMP_SIZE_DEFAULT,
            jog_ring_flash_interval: Self::JOG_RING_FLASH_INTERVAL_DEFAULT,
            pulse_duration: Self::PULSE_DURATION_DEFAULT,
            jog: JogConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests;
