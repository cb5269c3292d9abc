// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

use super::*;

#[test]
fn button_from_u7() {
    assert_eq!(ButtonInput::Released, ButtonInput::from_u7(0x00));
    assert_eq!(ButtonInput::Released, ButtonInput::from_u7(0x01));
    assert_eq!(ButtonInput::Released, ButtonInput::from_u7(0x7e));
    assert_eq!(ButtonInput::Pressed, ButtonInput::from_u7(0x7f));
    // Out of range, but still total
    assert_eq!(ButtonInput::Released, ButtonInput::from_u7(0xff));
}

#[test]
fn button_from_velocity() {
    assert_eq!(ButtonInput::Released, ButtonInput::from_velocity(0x00));
    assert_eq!(ButtonInput::Pressed, ButtonInput::from_velocity(0x01));
    assert_eq!(ButtonInput::Pressed, ButtonInput::from_velocity(0x40));
    assert_eq!(ButtonInput::Pressed, ButtonInput::from_velocity(0x7f));
}

#[test]
fn step_encoder_from_u7_offset() {
    assert_eq!(-64, StepEncoderInput::from_u7_offset(0).delta);
    assert_eq!(-1, StepEncoderInput::from_u7_offset(63).delta);
    assert_eq!(0, StepEncoderInput::from_u7_offset(64).delta);
    assert_eq!(1, StepEncoderInput::from_u7_offset(65).delta);
    assert_eq!(63, StepEncoderInput::from_u7_offset(127).delta);
}
