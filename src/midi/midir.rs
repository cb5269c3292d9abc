// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

use std::collections::HashMap;

use midir::{
    ConnectError, Ignore, InitError, MidiInput, MidiInputConnection, MidiInputPort, MidiOutput,
    MidiOutputConnection, MidiOutputPort, SendError,
};
use thiserror::Error;

use super::{MidiDeviceDescriptor, MidiPortDescriptor};
use crate::{MidiInputHandler, OutputError};

#[derive(Debug, Error)]
pub enum MidiPortError {
    #[error("disconnected")]
    Disconnected,
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    ConnectInput(#[from] ConnectError<MidiInput>),
    #[error(transparent)]
    ConnectOutput(#[from] ConnectError<MidiOutput>),
}

impl From<SendError> for OutputError {
    fn from(err: SendError) -> Self {
        OutputError::Send {
            msg: err.to_string().into(),
        }
    }
}

#[allow(missing_debug_implementations)]
pub struct MidirInputPort {
    pub descriptor: MidiPortDescriptor,
    pub port: MidiInputPort,
}

#[allow(missing_debug_implementations)]
pub struct MidirOutputPort {
    pub descriptor: MidiPortDescriptor,
    pub port: MidiOutputPort,
}

/// MIDI device driven by [`midir`].
#[allow(missing_debug_implementations)]
pub struct MidirDevice<I>
where
    I: MidiInputHandler + Send + 'static,
{
    descriptor: MidiDeviceDescriptor,
    input_port: MidirInputPort,
    output_port: MidirOutputPort,
    input_connection: Option<MidiInputConnection<I>>,
}

// Adapter for the midir callback closure
fn handle_input<I>(_micros: u64, input: &[u8], input_handler: &mut I)
where
    I: MidiInputHandler,
{
    log::trace!("Received MIDI input: {input:0x?}");
    if !input_handler.handle_midi_input(input) {
        log::debug!("Unhandled MIDI input {input:x?}");
    }
}

impl<I> MidirDevice<I>
where
    I: MidiInputHandler + Send + 'static,
{
    #[must_use]
    const fn new(
        descriptor: MidiDeviceDescriptor,
        input_port: MidirInputPort,
        output_port: MidirOutputPort,
    ) -> Self {
        Self {
            descriptor,
            input_port,
            output_port,
            input_connection: None,
        }
    }

    #[must_use]
    pub const fn descriptor(&self) -> &MidiDeviceDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub const fn input_port(&self) -> &MidirInputPort {
        &self.input_port
    }

    #[must_use]
    pub const fn output_port(&self) -> &MidirOutputPort {
        &self.output_port
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.input_connection.is_some()
    }

    /// Connect both ports.
    ///
    /// Incoming messages are forwarded to `input_handler` on the
    /// thread of the MIDI backend. Returns the output connection.
    pub fn connect(&mut self, input_handler: I) -> Result<MidiOutputConnection, MidiPortError> {
        self.disconnect();
        let input_port_name = &self.input_port.descriptor.name;
        let mut input = MidiInput::new(input_port_name)?;
        input.ignore(Ignore::None);
        let input_connection = input.connect(
            &self.input_port.port,
            input_port_name,
            |micros, input, input_handler| {
                handle_input(micros, input, input_handler);
            },
            input_handler,
        )?;
        let output_port_name = &self.output_port.descriptor.name;
        let output = MidiOutput::new(output_port_name)?;
        let output_connection = output.connect(&self.output_port.port, output_port_name)?;
        self.input_connection = Some(input_connection);
        debug_assert!(self.is_connected());
        Ok(output_connection)
    }

    /// Close the input connection and hand back the input handler.
    pub fn disconnect(&mut self) -> Option<I> {
        let input_connection = self.input_connection.take()?;
        let (_input, input_handler) = input_connection.close();
        debug_assert!(!self.is_connected());
        Some(input_handler)
    }
}

/// Identifies and connects [`MidirDevice`]s.
#[allow(missing_debug_implementations)]
pub struct MidirDeviceManager {
    input: MidiInput,
    output: MidiOutput,
}

impl MidirDeviceManager {
    pub fn new() -> Result<Self, InitError> {
        let mut input = MidiInput::new("input port watcher")?;
        input.ignore(Ignore::None);
        let output = MidiOutput::new("output port watcher")?;
        Ok(MidirDeviceManager { input, output })
    }

    /// Find all connected devices that match one of the given descriptors.
    ///
    /// A device is only reported if both an input and an output port
    /// with a matching name prefix are available.
    #[must_use]
    pub fn detect_dj_controllers<I>(
        &self,
        device_descriptors: &[&MidiDeviceDescriptor],
    ) -> Vec<MidirDevice<I>>
    where
        I: MidiInputHandler + Send + 'static,
    {
        let mut input_ports = self
            .input
            .ports()
            .into_iter()
            .filter_map(|port| {
                let port_name = self.input.port_name(&port).ok()?;
                let Some(device_descriptor) = device_descriptors.iter().copied().find(
                    |device_descriptor| port_name.starts_with(device_descriptor.port_name_prefix),
                ) else {
                    log::debug!("Input port \"{port_name}\" does not belong to a DJ controller");
                    return None;
                };
                log::debug!("Detected input port \"{port_name}\" for {device_descriptor:?}");
                Some((
                    device_descriptor.port_name_prefix,
                    (device_descriptor, port_name, port),
                ))
            })
            .collect::<HashMap<_, _>>();
        let mut output_ports = self
            .output
            .ports()
            .into_iter()
            .filter_map(|port| {
                let port_name = self.output.port_name(&port).ok()?;
                let Some(port_name_prefix) = input_ports
                    .keys()
                    .copied()
                    .find(|port_name_prefix| port_name.starts_with(port_name_prefix))
                else {
                    log::debug!("Output port \"{port_name}\" does not belong to a DJ controller");
                    return None;
                };
                Some((port_name_prefix, (port_name, port)))
            })
            .collect::<HashMap<_, _>>();
        input_ports.retain(|key, _| output_ports.contains_key(key));
        input_ports
            .into_iter()
            .filter_map(
                |(port_name_prefix, (descriptor, input_port_name, input_port))| {
                    let (output_port_name, output_port) = output_ports.remove(port_name_prefix)?;
                    log::info!(
                        "Found DJ controller device \"{device_name}\" (input port: \
                         \"{input_port_name}\", output port: \"{output_port_name}\")",
                        device_name = descriptor.device.name()
                    );
                    let input_port = MidirInputPort {
                        descriptor: MidiPortDescriptor {
                            name: input_port_name.into(),
                        },
                        port: input_port,
                    };
                    let output_port = MidirOutputPort {
                        descriptor: MidiPortDescriptor {
                            name: output_port_name.into(),
                        },
                        port: output_port,
                    };
                    Some(MidirDevice::new(
                        descriptor.clone(),
                        input_port,
                        output_port,
                    ))
                },
            )
            .collect()
    }
}

impl super::MidiOutputConnection for MidiOutputConnection {
    fn send_midi_output(&mut self, output: &[u8]) -> crate::OutputResult<()> {
        self.send(output).map_err(Into::into)
    }
}
