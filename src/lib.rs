// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

#![allow(rustdoc::invalid_rust_codeblocks)]
#![doc = include_str!("../README.md")]

use std::borrow::Cow;

mod deck;
pub use self::deck::DeckId;

pub mod devices;

pub mod engine;
pub use self::engine::{
    ControlSubscriptions, ControlSurface, DeckControl, DeckControlSubscriptions,
    DeckControlSurface, DeckParam, Engine, HotCueControl, ScratchEngine, ScratchParams,
    UnknownControlError,
};

mod input;
pub use self::input::{ButtonInput, StepEncoderInput};

pub mod midi;
pub use self::midi::{
    BoxedMidiOutputConnection, MidiDeviceDescriptor, MidiInputHandler, MidiOutputConnection,
    MidiPortDescriptor,
};

mod output;
pub use self::output::{Error as OutputError, LedOutput, Result as OutputResult};

pub mod timer;
pub use self::timer::{TimerHandle, TimerQueue, TimerRepeat, Timers};
#[cfg(feature = "tokio")]
pub use self::timer::{TimerEventReceiver, TokioTimers};

/// Identifies a hardware device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub vendor_name: Cow<'static, str>,
    pub product_name: Cow<'static, str>,
}

impl DeviceDescriptor {
    #[must_use]
    pub fn name(&self) -> Cow<'static, str> {
        let Self {
            vendor_name,
            product_name,
        } = self;
        if vendor_name.is_empty() {
            product_name.clone()
        } else {
            format!("{vendor_name} {product_name}").into()
        }
    }
}

/// Combine two 7-bit bytes (most significant first) into a 14-bit value.
#[must_use]
pub const fn u7_be_to_u14(hi: u8, lo: u8) -> u16 {
    ((hi as u16) & 0x7f) << 7 | ((lo as u16) & 0x7f)
}

/// Split a 14-bit value into two 7-bit bytes (most significant first).
///
/// Bits beyond the 14th are discarded.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn u14_to_u7_be(value: u16) -> (u8, u8) {
    (((value >> 7) & 0x7f) as u8, (value & 0x7f) as u8)
}
