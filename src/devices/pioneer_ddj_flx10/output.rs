// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

//! Encoding of outgoing MIDI messages.

use strum::{EnumCount, EnumIter};

use super::{
    LED_OFF, LED_ON, MIDI_DECK_VU_METER, MIDI_JOG_BPM_LSB, MIDI_JOG_BPM_MSB,
    MIDI_JOG_DISPLAY_HIDE, MIDI_JOG_INFO_SHOW, MIDI_JOG_MARKER_LSB, MIDI_JOG_MARKER_MSB,
    MIDI_JOG_RING, MIDI_JOG_RING_OFF, MIDI_JOG_SPEED_LSB, MIDI_JOG_SPEED_MSB,
    MIDI_JOG_TIME_MINUTES, MIDI_JOG_TIME_SECONDS, MIDI_STATUS_CC, MIDI_STATUS_JOG_DISPLAY_CC,
    MIDI_STATUS_JOG_DISPLAY_NOTE, MIDI_STATUS_NOTE_ON, MIDI_STATUS_PAD_FIRST, PADS_PER_PAGE,
};
use crate::{DeckId, LedOutput, MidiOutputConnection, OutputResult};

#[allow(clippy::cast_possible_truncation)]
const fn deck_offset(deck: DeckId) -> u8 {
    deck.index() as u8
}

/// Pad LED message, the inverse of [`super::decode_pad()`] for
/// unshifted pads.
///
/// `pad` is expected in the range 1 to 8.
#[must_use]
pub fn encode_pad_led(deck: DeckId, pad: u8, page_index: u8, led: LedOutput) -> [u8; 3] {
    debug_assert!((1..=PADS_PER_PAGE).contains(&pad));
    let status = MIDI_STATUS_PAD_FIRST + 2 * deck_offset(deck);
    let data1 = page_index
        .wrapping_mul(PADS_PER_PAGE)
        .wrapping_add(pad.saturating_sub(1) % PADS_PER_PAGE)
        & 0x7f;
    let data2 = match led {
        LedOutput::Off => LED_OFF,
        LedOutput::On => LED_ON,
    };
    [status, data1, data2]
}

#[must_use]
pub fn encode_pad(deck: DeckId, pad: u8, page_index: u8, on: bool) -> [u8; 3] {
    encode_pad_led(deck, pad, page_index, on.into())
}

/// 14-bit values on the jog wheel display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCount)]
pub enum JogDisplayField {
    /// Position marker in degrees
    Marker,
    /// Tempo in tenths of BPM
    Bpm,
    /// Playing speed in tenths of a percent
    Speed,
}

impl JogDisplayField {
    const fn msb_lsb(self) -> (u8, u8) {
        match self {
            Self::Marker => (MIDI_JOG_MARKER_MSB, MIDI_JOG_MARKER_LSB),
            Self::Bpm => (MIDI_JOG_BPM_MSB, MIDI_JOG_BPM_LSB),
            Self::Speed => (MIDI_JOG_SPEED_MSB, MIDI_JOG_SPEED_LSB),
        }
    }
}

/// MSB and LSB messages of a jog display value.
#[must_use]
pub const fn encode_jog_display_u14(
    deck: DeckId,
    field: JogDisplayField,
    (msb, lsb): (u8, u8),
) -> [[u8; 3]; 2] {
    let offset = deck_offset(deck);
    let (msb_control, lsb_control) = field.msb_lsb();
    [
        [MIDI_STATUS_JOG_DISPLAY_CC, msb_control + offset, msb],
        [MIDI_STATUS_JOG_DISPLAY_CC, lsb_control + offset, lsb],
    ]
}

#[must_use]
pub const fn encode_jog_time(deck: DeckId, (minutes, seconds): (u8, u8)) -> [[u8; 3]; 2] {
    let offset = 2 * deck_offset(deck);
    [
        [MIDI_STATUS_JOG_DISPLAY_CC, MIDI_JOG_TIME_MINUTES + offset, minutes],
        [MIDI_STATUS_JOG_DISPLAY_CC, MIDI_JOG_TIME_SECONDS + offset, seconds],
    ]
}

#[must_use]
pub const fn encode_jog_ring(deck: DeckId, on: bool) -> [u8; 3] {
    let data2 = if on { 0x01 } else { 0x00 };
    [
        MIDI_STATUS_JOG_DISPLAY_NOTE,
        MIDI_JOG_RING + deck_offset(deck),
        data2,
    ]
}

#[must_use]
pub const fn encode_jog_ring_off(deck: DeckId) -> [u8; 3] {
    [
        MIDI_STATUS_JOG_DISPLAY_CC,
        MIDI_JOG_RING_OFF + deck_offset(deck),
        0x00,
    ]
}

#[must_use]
pub const fn encode_jog_info_visible(deck: DeckId) -> [u8; 3] {
    [
        MIDI_STATUS_JOG_DISPLAY_NOTE,
        MIDI_JOG_INFO_SHOW + deck_offset(deck),
        0x00,
    ]
}

#[must_use]
pub const fn encode_jog_display_hidden(deck: DeckId) -> [u8; 3] {
    [
        MIDI_STATUS_JOG_DISPLAY_NOTE,
        MIDI_JOG_DISPLAY_HIDE + deck_offset(deck),
        0x7f,
    ]
}

/// Level meter with a 7-bit `level`.
#[must_use]
pub const fn encode_vu_meter(deck: DeckId, level: u8) -> [u8; 3] {
    [
        MIDI_STATUS_CC + deck_offset(deck),
        MIDI_DECK_VU_METER,
        level & 0x7f,
    ]
}

/// Switch off the LED of a deck button.
#[must_use]
pub const fn encode_deck_led_off(deck: DeckId, data1: u8) -> [u8; 3] {
    [MIDI_STATUS_NOTE_ON + deck_offset(deck), data1 & 0x7f, LED_OFF]
}

/// Sends encoded messages through a [`MidiOutputConnection`].
#[derive(Debug)]
pub struct OutputGateway<C> {
    connection: C,
}

impl<C> OutputGateway<C> {
    #[must_use]
    pub const fn new(connection: C) -> Self {
        Self { connection }
    }

    #[must_use]
    pub const fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    #[must_use]
    pub fn into_connection(self) -> C {
        let Self { connection } = self;
        connection
    }
}

impl<C> OutputGateway<C>
where
    C: MidiOutputConnection,
{
    pub fn send(&mut self, message: &[u8]) -> OutputResult<()> {
        log::trace!("Sending MIDI output: {message:0x?}");
        self.connection.send_midi_output(message)
    }

    /// Send all messages, stopping at the first failure.
    pub fn send_all<'a>(
        &mut self,
        messages: impl IntoIterator<Item = &'a [u8; 3]>,
    ) -> OutputResult<()> {
        for message in messages {
            self.send(message)?;
        }
        Ok(())
    }

    pub fn send_pad_led(
        &mut self,
        deck: DeckId,
        pad: u8,
        page_index: u8,
        led: LedOutput,
    ) -> OutputResult<()> {
        self.send(&encode_pad_led(deck, pad, page_index, led))
    }

    pub fn send_jog_display_u14(
        &mut self,
        deck: DeckId,
        field: JogDisplayField,
        msb_lsb: (u8, u8),
    ) -> OutputResult<()> {
        self.send_all(&encode_jog_display_u14(deck, field, msb_lsb))
    }

    pub fn send_jog_time(&mut self, deck: DeckId, minutes_seconds: (u8, u8)) -> OutputResult<()> {
        self.send_all(&encode_jog_time(deck, minutes_seconds))
    }

    pub fn send_jog_ring(&mut self, deck: DeckId, on: bool) -> OutputResult<()> {
        self.send(&encode_jog_ring(deck, on))
    }

    pub fn send_vu_meter(&mut self, deck: DeckId, level: u8) -> OutputResult<()> {
        self.send(&encode_vu_meter(deck, level))
    }
}
