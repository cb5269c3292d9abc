// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

/// A simple two-state button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonInput {
    Pressed,
    Released,
}

impl ButtonInput {
    /// Full velocity, i.e. the only value that is considered as pressed.
    pub const PRESSED_U7: u8 = 0x7f;

    /// Decode a 7-bit MIDI value.
    ///
    /// Everything except [`Self::PRESSED_U7`] is treated as released.
    #[must_use]
    pub const fn from_u7(input: u8) -> Self {
        if input == Self::PRESSED_U7 {
            Self::Pressed
        } else {
            Self::Released
        }
    }

    /// Decode a 7-bit velocity where any nonzero value is pressed.
    #[must_use]
    pub const fn from_velocity(input: u8) -> Self {
        if input > 0 {
            Self::Pressed
        } else {
            Self::Released
        }
    }

    #[must_use]
    pub const fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

/// An endless encoder that sends discrete delta values when rotated
/// in CW (positive) or CCW (negative) direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEncoderInput {
    pub delta: i32,
}

impl StepEncoderInput {
    /// The 7-bit value that encodes no motion.
    pub const CENTER_U7: u8 = 0x40;

    /// Decode a 7-bit value with an offset of 64.
    ///
    /// Values below the center are CCW, values above are CW.
    #[must_use]
    pub fn from_u7_offset(input: u8) -> Self {
        let delta = i32::from(input) - i32::from(Self::CENTER_U7);
        Self { delta }
    }
}

#[cfg(test)]
mod tests;
