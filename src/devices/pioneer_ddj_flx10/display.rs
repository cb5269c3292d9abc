// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

//! Conversion of deck readings into the encodings of the jog wheel
//! displays.
//!
//! Readings that are not finite cannot be displayed and are rejected
//! by returning `None`.

use crate::u14_to_u7_be;

pub const U14_MAX: u16 = 0x3fff;

pub const DEGREES_MAX: u16 = 359;

pub const BPM_TENTHS_MAX: u16 = 9999;

pub const RATE_TENTHS_MAX: u16 = 2000;

/// Encoded playing speed of 100%
pub const RATE_TENTHS_CENTER: u16 = 1000;

const MINUTES_MAX: f64 = 127.0;

/// Split a 14-bit value into MSB and LSB.
///
/// Values outside of the 14-bit range are clamped.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn split_u14(value: i32) -> (u8, u8) {
    let clamped = value.clamp(0, i32::from(U14_MAX));
    u14_to_u7_be(clamped as u16)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_clamped(value: f64, max: u16) -> Option<u16> {
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(0.0, f64::from(max)) as u16)
}

/// Angle of the position marker for a relative play position.
#[must_use]
pub fn degrees(position: f64) -> Option<u16> {
    round_clamped(position * f64::from(DEGREES_MAX), DEGREES_MAX)
}

#[must_use]
pub fn bpm_tenths(bpm: f64) -> Option<u16> {
    round_clamped(bpm * 10.0, BPM_TENTHS_MAX)
}

/// Playing speed in tenths of a percent for a relative tempo
/// between -1.0 and 1.0.
#[must_use]
pub fn rate_tenths(rate: f64) -> Option<u16> {
    round_clamped((rate * 100.0 + 100.0) * 10.0, RATE_TENTHS_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeMode {
    #[default]
    Elapsed,
    Remaining,
}

impl TimeMode {
    const REMAINING_U7: u8 = 0x7f;

    #[must_use]
    pub const fn from_u7(input: u8) -> Self {
        if input == Self::REMAINING_U7 {
            Self::Remaining
        } else {
            Self::Elapsed
        }
    }
}

/// Seconds to display for the given play position and track duration.
#[must_use]
pub fn display_seconds(position: f64, duration: f64, mode: TimeMode) -> Option<f64> {
    if !position.is_finite() || !duration.is_finite() {
        return None;
    }
    let seconds = match mode {
        TimeMode::Elapsed => position * duration,
        TimeMode::Remaining => (1.0 - position) * duration,
    };
    Some(seconds)
}

/// Whole minutes and seconds.
///
/// Negative durations are displayed as zero, minutes saturate at 127.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn minutes_seconds(seconds: f64) -> Option<(u8, u8)> {
    if !seconds.is_finite() {
        return None;
    }
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor().min(MINUTES_MAX);
    let seconds = (seconds % 60.0).floor();
    Some((minutes as u8, seconds as u8))
}

/// Last reading and encoding of a display value.
///
/// Only changes of the encoding need to be sent to the device.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplayValue {
    reading: Option<f64>,
    encoded: Option<(u8, u8)>,
}

impl DisplayValue {
    #[must_use]
    pub const fn reading(&self) -> Option<f64> {
        self.reading
    }

    #[must_use]
    pub const fn encoded(&self) -> Option<(u8, u8)> {
        self.encoded
    }

    /// Store a new reading with its encoding.
    ///
    /// Returns `true` if the encoding has changed.
    pub fn update(&mut self, reading: f64, encoded: (u8, u8)) -> bool {
        self.reading = Some(reading);
        let changed = self.encoded != Some(encoded);
        self.encoded = Some(encoded);
        changed
    }

    /// Forget what has been sent.
    pub fn invalidate(&mut self) {
        self.encoded = None;
    }
}

/// Display values of one jog wheel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JogDisplays {
    pub marker: DisplayValue,
    pub bpm: DisplayValue,
    pub speed: DisplayValue,
    pub time: DisplayValue,
}

impl JogDisplays {
    pub fn invalidate(&mut self) {
        let Self {
            marker,
            bpm,
            speed,
            time,
        } = self;
        marker.invalidate();
        bpm.invalidate();
        speed.invalidate();
        time.invalidate();
    }
}
