// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

use std::borrow::Cow;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("disconnected")]
    Disconnected,
    #[error("Send: {msg}")]
    Send { msg: Cow<'static, str> },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Simple LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedOutput {
    Off,
    On,
}

impl From<bool> for LedOutput {
    fn from(on: bool) -> Self {
        if on {
            Self::On
        } else {
            Self::Off
        }
    }
}
