// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

pub mod pioneer_ddj_flx10;

// Descriptors of supported MIDI DJ controllers for auto-detection.
pub const MIDI_DJ_CONTROLLER_DESCRIPTORS: &[&crate::MidiDeviceDescriptor] =
    &[crate::devices::pioneer_ddj_flx10::MIDI_DEVICE_DESCRIPTOR];
