// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

//! Decoding of incoming MIDI messages.
//!
//! All decoding functions are total: messages that do not belong to a
//! known control are reported as `None` instead of failing.

use derive_more::From;

use super::{
    PadMode, PadModePage, TimeMode, MIDI_DECK_BEAT_JUMP_BACKWARD_16_BUTTON,
    MIDI_DECK_BEAT_JUMP_BACKWARD_32_BUTTON, MIDI_DECK_BEAT_JUMP_FORWARD_16_BUTTON,
    MIDI_DECK_BEAT_JUMP_FORWARD_32_BUTTON, MIDI_DECK_BEAT_JUMP_MODE_BUTTON,
    MIDI_DECK_BEAT_LOOP_MODE_BUTTON, MIDI_DECK_HOT_CUE_MODE_BUTTON, MIDI_DECK_JOG_TOUCH,
    MIDI_DECK_JOG_TOUCH_SHIFTED, MIDI_DECK_JOG_WHEEL_SIDE, MIDI_DECK_JOG_WHEEL_TOP,
    MIDI_DECK_PAD_FX_MODE_BUTTON, MIDI_DECK_QUICK_JUMP, MIDI_DECK_SAMPLER_MODE_BUTTON,
    MIDI_DECK_SHIFT_BUTTON, MIDI_JOG_TIME_MODE, MIDI_STATUS_CC, MIDI_STATUS_JOG_DISPLAY_NOTE,
    MIDI_STATUS_NOTE_OFF, MIDI_STATUS_NOTE_ON, MIDI_STATUS_PAD_FIRST, MIDI_STATUS_PAD_LAST,
    PADS_PER_PAGE,
};
use crate::{ButtonInput, DeckId, StepEncoderInput};

/// Physical location of a performance pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PadAddress {
    pub deck: DeckId,

    /// Pad number, 1 to 8
    pub pad: u8,

    pub page_index: u8,

    /// Pressed while holding shift
    pub shifted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadTarget {
    ModePage(PadModePage),

    /// The page index is not assigned to any pad mode
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadEvent {
    pub address: PadAddress,
    pub target: PadTarget,
    pub input: ButtonInput,
}

impl PadEvent {
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.input.is_pressed()
    }
}

/// Decode a performance pad message.
///
/// Returns `None` if the status byte does not belong to a pad channel.
#[must_use]
pub fn decode_pad(status: u8, data1: u8, data2: u8) -> Option<PadEvent> {
    if !(MIDI_STATUS_PAD_FIRST..=MIDI_STATUS_PAD_LAST).contains(&status) {
        return None;
    }
    let offset = status - MIDI_STATUS_PAD_FIRST;
    let deck = DeckId::from_index(usize::from(offset / 2))?;
    let shifted = offset % 2 == 1;
    let pad = data1 % PADS_PER_PAGE + 1;
    let page_index = data1 / PADS_PER_PAGE;
    let target =
        PadModePage::from_page_index(page_index).map_or(PadTarget::Unknown, PadTarget::ModePage);
    Some(PadEvent {
        address: PadAddress {
            deck,
            pad,
            page_index,
            shifted,
        },
        target,
        input: ButtonInput::from_u7(data2),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JogWheel {
    /// Outer ring
    Side,
    /// Platter
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatJumpDirection {
    Backward,
    Forward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckInput {
    JogTouch(ButtonInput),
    JogMotion {
        wheel: JogWheel,
        input: StepEncoderInput,
    },
    QuickJump(StepEncoderInput),
    Shift(ButtonInput),
    PadModeSelect {
        mode: PadMode,
        input: ButtonInput,
    },
    BeatJump {
        direction: BeatJumpDirection,
        beats: u16,
        input: ButtonInput,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, From)]
pub enum Input {
    Pad(PadEvent),
    Deck(DeckId, DeckInput),
    /// Elapsed/remaining selection on the device
    TimeMode(DeckId, TimeMode),
}

impl Input {
    /// Decode a raw MIDI message.
    ///
    /// Returns `None` for unknown or malformed messages.
    #[must_use]
    pub fn try_from_midi_message(input: &[u8]) -> Option<Self> {
        let [status, data1, data2] = *input else {
            return None;
        };
        if let Some(pad_event) = decode_pad(status, data1, data2) {
            return Some(pad_event.into());
        }
        if status == MIDI_STATUS_JOG_DISPLAY_NOTE {
            return decode_time_mode(data1, data2).map(Into::into);
        }
        decode_deck_input(status, data1, data2).map(Into::into)
    }
}

fn decode_time_mode(data1: u8, data2: u8) -> Option<(DeckId, TimeMode)> {
    let index = data1.checked_sub(MIDI_JOG_TIME_MODE)?;
    let deck = DeckId::from_index(usize::from(index))?;
    Some((deck, TimeMode::from_u7(data2)))
}

fn decode_deck_input(status: u8, data1: u8, data2: u8) -> Option<(DeckId, DeckInput)> {
    let deck = DeckId::from_index(usize::from(status & 0x0f))?;
    let input = match status & 0xf0 {
        MIDI_STATUS_NOTE_OFF => decode_deck_button(data1, ButtonInput::Released)?,
        MIDI_STATUS_NOTE_ON => {
            let input = match data1 {
                // The touch sensor reports any nonzero velocity
                MIDI_DECK_JOG_TOUCH | MIDI_DECK_JOG_TOUCH_SHIFTED => {
                    ButtonInput::from_velocity(data2)
                }
                _ => ButtonInput::from_u7(data2),
            };
            decode_deck_button(data1, input)?
        }
        MIDI_STATUS_CC => {
            let input = StepEncoderInput::from_u7_offset(data2);
            match data1 {
                MIDI_DECK_JOG_WHEEL_SIDE => DeckInput::JogMotion {
                    wheel: JogWheel::Side,
                    input,
                },
                MIDI_DECK_JOG_WHEEL_TOP => DeckInput::JogMotion {
                    wheel: JogWheel::Top,
                    input,
                },
                MIDI_DECK_QUICK_JUMP => DeckInput::QuickJump(input),
                _ => return None,
            }
        }
        _ => return None,
    };
    Some((deck, input))
}

fn decode_deck_button(data1: u8, input: ButtonInput) -> Option<DeckInput> {
    let mode_select = |mode| DeckInput::PadModeSelect { mode, input };
    let beat_jump = |direction, beats| DeckInput::BeatJump {
        direction,
        beats,
        input,
    };
    let deck_input = match data1 {
        MIDI_DECK_JOG_TOUCH | MIDI_DECK_JOG_TOUCH_SHIFTED => DeckInput::JogTouch(input),
        MIDI_DECK_SHIFT_BUTTON => DeckInput::Shift(input),
        MIDI_DECK_HOT_CUE_MODE_BUTTON => mode_select(PadMode::HotCue),
        MIDI_DECK_PAD_FX_MODE_BUTTON => mode_select(PadMode::PadEffect),
        MIDI_DECK_BEAT_LOOP_MODE_BUTTON => mode_select(PadMode::BeatLoop),
        MIDI_DECK_BEAT_JUMP_MODE_BUTTON => mode_select(PadMode::BeatJump),
        MIDI_DECK_SAMPLER_MODE_BUTTON => mode_select(PadMode::Sampler),
        MIDI_DECK_BEAT_JUMP_BACKWARD_16_BUTTON => beat_jump(BeatJumpDirection::Backward, 16),
        MIDI_DECK_BEAT_JUMP_FORWARD_16_BUTTON => beat_jump(BeatJumpDirection::Forward, 16),
        MIDI_DECK_BEAT_JUMP_BACKWARD_32_BUTTON => beat_jump(BeatJumpDirection::Backward, 32),
        MIDI_DECK_BEAT_JUMP_FORWARD_32_BUTTON => beat_jump(BeatJumpDirection::Forward, 32),
        _ => return None,
    };
    Some(deck_input)
}
