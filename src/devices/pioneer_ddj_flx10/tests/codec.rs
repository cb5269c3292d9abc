// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

use super::*;
use crate::{ButtonInput, StepEncoderInput};

#[test]
fn decode_pad_hot_cue_page_two() {
    let event = decode_pad(0x97, 0x09, 0x7f).unwrap();
    assert_eq!(
        PadAddress {
            deck: DeckId::ONE,
            pad: 2,
            page_index: 1,
            shifted: false,
        },
        event.address
    );
    assert_eq!(
        PadTarget::ModePage(PadModePage::new(PadMode::HotCue, 2)),
        event.target
    );
    assert!(event.is_pressed());
}

#[test]
fn decode_pad_shifted_pad_effect() {
    let event = decode_pad(0x9a, 0x12, 0x7f).unwrap();
    assert_eq!(DeckId::TWO, event.address.deck);
    assert!(event.address.shifted);
    assert_eq!(3, event.address.pad);
    assert_eq!(
        PadTarget::ModePage(PadModePage::new(PadMode::PadEffect, 1)),
        event.target
    );
}

#[test]
fn decode_pad_decks_and_layers() {
    let expected = [
        (DeckId::ONE, false),
        (DeckId::ONE, true),
        (DeckId::TWO, false),
        (DeckId::TWO, true),
        (DeckId::THREE, false),
        (DeckId::THREE, true),
        (DeckId::FOUR, false),
        (DeckId::FOUR, true),
    ];
    for (status, (deck, shifted)) in (0x97..=0x9e).zip(expected) {
        let address = decode_pad(status, 0x00, 0x7f).unwrap().address;
        assert_eq!(deck, address.deck, "{status:#x}");
        assert_eq!(shifted, address.shifted, "{status:#x}");
    }
}

#[test]
fn decode_pad_unknown_page_index() {
    let event = decode_pad(0x97, 0x20, 0x7f).unwrap();
    assert_eq!(4, event.address.page_index);
    assert_eq!(1, event.address.pad);
    assert_eq!(PadTarget::Unknown, event.target);
}

#[test]
fn decode_pad_only_full_velocity_is_pressed() {
    assert_eq!(
        ButtonInput::Released,
        decode_pad(0x97, 0x00, 0x00).unwrap().input
    );
    assert_eq!(
        ButtonInput::Released,
        decode_pad(0x97, 0x00, 0x40).unwrap().input
    );
    assert_eq!(
        ButtonInput::Pressed,
        decode_pad(0x97, 0x00, 0x7f).unwrap().input
    );
}

#[test]
fn decode_pad_ignores_other_statuses() {
    for status in [0x00, 0x80, 0x90, 0x96, 0x9f, 0xb7, 0xff] {
        assert!(decode_pad(status, 0x00, 0x7f).is_none(), "{status:#x}");
    }
}

#[test]
fn decode_pad_is_total() {
    for status in 0..=u8::MAX {
        for data1 in 0..=u8::MAX {
            for data2 in [0x00, 0x7f, 0xff] {
                if let Some(event) = decode_pad(status, data1, data2) {
                    assert!((1..=PADS_PER_PAGE).contains(&event.address.pad));
                }
            }
        }
    }
}

#[test]
fn encode_pad_examples() {
    assert_eq!([0x97, 0x00, 0x7f], encode_pad(DeckId::ONE, 1, 0, true));
    assert_eq!([0x99, 0x12, 0x7f], encode_pad(DeckId::TWO, 3, 2, true));
    assert_eq!([0x9d, 0x1f, 0x00], encode_pad(DeckId::FOUR, 8, 3, false));
}

#[test]
fn encode_pad_is_inverse_of_decode_pad() {
    for deck in DeckId::all() {
        for page_index in 0..PAD_PAGE_INDEX_COUNT {
            for pad in 1..=PADS_PER_PAGE {
                let [status, data1, data2] = encode_pad(deck, pad, page_index, true);
                let event = decode_pad(status, data1, data2).unwrap();
                assert_eq!(
                    PadAddress {
                        deck,
                        pad,
                        page_index,
                        shifted: false,
                    },
                    event.address
                );
                assert!(event.is_pressed());
            }
        }
    }
}

#[test]
fn decode_deck_inputs() {
    assert_eq!(
        Some(Input::Deck(
            DeckId::TWO,
            DeckInput::JogTouch(ButtonInput::Pressed)
        )),
        Input::try_from_midi_message(&[0x91, 0x36, 0x7f])
    );
    assert_eq!(
        Some(Input::Deck(
            DeckId::TWO,
            DeckInput::JogTouch(ButtonInput::Released)
        )),
        Input::try_from_midi_message(&[0x81, 0x36, 0x00])
    );
    assert_eq!(
        Some(Input::Deck(
            DeckId::ONE,
            DeckInput::JogTouch(ButtonInput::Pressed)
        )),
        Input::try_from_midi_message(&[0x90, 0x67, 0x7f])
    );
    assert_eq!(
        Some(Input::Deck(
            DeckId::ONE,
            DeckInput::JogMotion {
                wheel: JogWheel::Top,
                input: StepEncoderInput { delta: 1 },
            }
        )),
        Input::try_from_midi_message(&[0xb0, 0x22, 0x41])
    );
    assert_eq!(
        Some(Input::Deck(
            DeckId::FOUR,
            DeckInput::JogMotion {
                wheel: JogWheel::Side,
                input: StepEncoderInput { delta: -1 },
            }
        )),
        Input::try_from_midi_message(&[0xb3, 0x21, 0x3f])
    );
    assert_eq!(
        Some(Input::Deck(
            DeckId::THREE,
            DeckInput::QuickJump(StepEncoderInput { delta: 2 })
        )),
        Input::try_from_midi_message(&[0xb2, 0x29, 0x42])
    );
    assert_eq!(
        Some(Input::Deck(
            DeckId::ONE,
            DeckInput::Shift(ButtonInput::Pressed)
        )),
        Input::try_from_midi_message(&[0x90, 0x3f, 0x7f])
    );
}

#[test]
fn decode_jog_touch_with_any_velocity() {
    for data2 in 1..=0x7f {
        assert_eq!(
            Some(Input::Deck(
                DeckId::ONE,
                DeckInput::JogTouch(ButtonInput::Pressed)
            )),
            Input::try_from_midi_message(&[0x90, 0x36, data2])
        );
    }
    assert_eq!(
        Some(Input::Deck(
            DeckId::ONE,
            DeckInput::JogTouch(ButtonInput::Released)
        )),
        Input::try_from_midi_message(&[0x90, 0x36, 0x00])
    );
    // Other deck buttons still require full velocity
    assert_eq!(
        Some(Input::Deck(
            DeckId::ONE,
            DeckInput::Shift(ButtonInput::Released)
        )),
        Input::try_from_midi_message(&[0x90, 0x3f, 0x40])
    );
}

#[test]
fn decode_pad_mode_select_buttons() {
    for (data1, mode) in [
        (0x1b, PadMode::HotCue),
        (0x1e, PadMode::PadEffect),
        (0x6d, PadMode::BeatLoop),
        (0x20, PadMode::BeatJump),
        (0x22, PadMode::Sampler),
    ] {
        assert_eq!(
            Some(Input::Deck(
                DeckId::ONE,
                DeckInput::PadModeSelect {
                    mode,
                    input: ButtonInput::Pressed,
                }
            )),
            Input::try_from_midi_message(&[0x90, data1, 0x7f]),
            "{data1:#x}"
        );
    }
}

#[test]
fn decode_beat_jump_buttons() {
    for (data1, direction, beats) in [
        (0x61, BeatJumpDirection::Backward, 16),
        (0x62, BeatJumpDirection::Forward, 16),
        (0x70, BeatJumpDirection::Backward, 32),
        (0x71, BeatJumpDirection::Forward, 32),
    ] {
        assert_eq!(
            Some(Input::Deck(
                DeckId::TWO,
                DeckInput::BeatJump {
                    direction,
                    beats,
                    input: ButtonInput::Pressed,
                }
            )),
            Input::try_from_midi_message(&[0x91, data1, 0x7f]),
            "{data1:#x}"
        );
    }
}

#[test]
fn decode_time_mode() {
    assert_eq!(
        Some(Input::TimeMode(DeckId::ONE, TimeMode::Elapsed)),
        Input::try_from_midi_message(&[0x9f, 0x14, 0x00])
    );
    assert_eq!(
        Some(Input::TimeMode(DeckId::TWO, TimeMode::Remaining)),
        Input::try_from_midi_message(&[0x9f, 0x15, 0x7f])
    );
    assert_eq!(
        Some(Input::TimeMode(DeckId::FOUR, TimeMode::Elapsed)),
        Input::try_from_midi_message(&[0x9f, 0x17, 0x01])
    );
    assert_eq!(None, Input::try_from_midi_message(&[0x9f, 0x18, 0x7f]));
    assert_eq!(None, Input::try_from_midi_message(&[0x9f, 0x13, 0x7f]));
}

#[test]
fn decode_pad_input() {
    let Some(Input::Pad(event)) = Input::try_from_midi_message(&[0x9c, 0x0f, 0x7f]) else {
        panic!("not a pad");
    };
    assert_eq!(DeckId::THREE, event.address.deck);
    assert!(event.address.shifted);
    assert_eq!(8, event.address.pad);
}

#[test]
fn reject_malformed_and_unknown_messages() {
    let inputs: [&[u8]; 9] = [
        &[],
        &[0x90],
        &[0x90, 0x36],
        &[0x90, 0x36, 0x7f, 0x00],
        // Channel 5
        &[0x94, 0x36, 0x7f],
        // Unassigned note and CC
        &[0x90, 0x00, 0x7f],
        &[0xb0, 0x00, 0x40],
        // Pitch bend
        &[0xe0, 0x00, 0x40],
        &[0xf0, 0x7e, 0xf7],
    ];
    for input in inputs {
        assert_eq!(None, Input::try_from_midi_message(input), "{input:x?}");
    }
}

#[test]
fn decoding_is_total() {
    for status in 0..=u8::MAX {
        for data1 in 0..=u8::MAX {
            for data2 in [0x00, 0x3f, 0x40, 0x41, 0x7f, 0x80, 0xff] {
                let _ = Input::try_from_midi_message(&[status, data1, data2]);
            }
        }
        let _ = Input::try_from_midi_message(&[status]);
        let _ = Input::try_from_midi_message(&[status, 0x00]);
    }
}

#[test]
fn encode_jog_display_messages() {
    assert_eq!(
        [[0xbf, 0x11, 0x01], [0xbf, 0x31, 0x34]],
        encode_jog_display_u14(DeckId::TWO, JogDisplayField::Marker, (0x01, 0x34))
    );
    assert_eq!(
        [[0xbf, 0x14, 0x0a], [0xbf, 0x34, 0x00]],
        encode_jog_display_u14(DeckId::ONE, JogDisplayField::Bpm, (0x0a, 0x00))
    );
    assert_eq!(
        [[0xbf, 0x1b, 0x07], [0xbf, 0x3b, 0x68]],
        encode_jog_display_u14(DeckId::FOUR, JogDisplayField::Speed, (0x07, 0x68))
    );
    assert_eq!(
        [[0xbf, 0x44, 2], [0xbf, 0x45, 30]],
        encode_jog_time(DeckId::TWO, (2, 30))
    );
    assert_eq!([0x9f, 0x0b, 0x01], encode_jog_ring(DeckId::THREE, true));
    assert_eq!([0x9f, 0x0b, 0x00], encode_jog_ring(DeckId::THREE, false));
    assert_eq!([0xbf, 0x53, 0x00], encode_jog_ring_off(DeckId::FOUR));
    assert_eq!([0x9f, 0x5d, 0x00], encode_jog_info_visible(DeckId::ONE));
    assert_eq!([0x9f, 0x55, 0x7f], encode_jog_display_hidden(DeckId::TWO));
    assert_eq!([0xb1, 0x02, 0x40], encode_vu_meter(DeckId::TWO, 0x40));
    assert_eq!([0x93, 0x7f, 0x00], encode_deck_led_off(DeckId::FOUR, 0x7f));
}
