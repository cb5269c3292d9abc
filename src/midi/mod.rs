// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

use std::{
    borrow::Cow,
    ops::{Deref, DerefMut},
};

use crate::{DeviceDescriptor, OutputResult};

#[cfg(feature = "midir")]
pub mod midir;

/// MIDI-related, extended [`DeviceDescriptor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiDeviceDescriptor {
    pub device: DeviceDescriptor,
    pub port_name_prefix: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiPortDescriptor {
    pub name: Cow<'static, str>,
}

/// Passive callback for sinking MIDI input messages
pub trait MidiInputHandler {
    /// Invoked for each incoming message.
    ///
    /// Returns `true` if the message has been accepted and handled
    /// or `false` otherwise.
    #[must_use]
    fn handle_midi_input(&mut self, input: &[u8]) -> bool;
}

impl<D> MidiInputHandler for D
where
    D: DerefMut,
    <D as Deref>::Target: MidiInputHandler,
{
    fn handle_midi_input(&mut self, input: &[u8]) -> bool {
        self.deref_mut().handle_midi_input(input)
    }
}

pub trait MidiOutputConnection {
    fn send_midi_output(&mut self, output: &[u8]) -> OutputResult<()>;
}

pub type BoxedMidiOutputConnection = Box<dyn MidiOutputConnection + Send + 'static>;

impl MidiOutputConnection for BoxedMidiOutputConnection {
    fn send_midi_output(&mut self, output: &[u8]) -> OutputResult<()> {
        self.as_mut().send_midi_output(output)
    }
}
