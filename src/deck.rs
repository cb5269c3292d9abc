// SPDX-FileCopyrightText: The ddj-flx10 authors
// SPDX-License-Identifier: MPL-2.0

//! Virtual DJ deck identity.

use derive_more::Display;

const GROUP_PREFIX: &str = "[Channel";
const GROUP_SUFFIX: &str = "]";

/// One of the independent playback channels of the mixing software.
///
/// Numbered from 1 up to and including [`DeckId::COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct DeckId(u8);

impl DeckId {
    pub const COUNT: usize = 4;

    pub const ONE: Self = Self(1);
    pub const TWO: Self = Self(2);
    pub const THREE: Self = Self(3);
    pub const FOUR: Self = Self(4);

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(number: u8) -> Option<Self> {
        if number >= 1 && number as usize <= Self::COUNT {
            Some(Self(number))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Zero-based index for per-deck tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index as u8 + 1))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).filter_map(Self::from_index)
    }

    /// The control group label used by the mixing software, e.g. `[Channel1]`.
    #[must_use]
    pub fn group(self) -> String {
        format!("{GROUP_PREFIX}{number}{GROUP_SUFFIX}", number = self.0)
    }

    /// Parse the deck from a control group label.
    ///
    /// Returns `None` for malformed labels and for deck numbers
    /// outside the supported range.
    #[must_use]
    pub fn from_group(group: &str) -> Option<Self> {
        let number = group
            .strip_prefix(GROUP_PREFIX)?
            .strip_suffix(GROUP_SUFFIX)?;
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        number.parse().ok().and_then(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::DeckId;

    #[test]
    fn new_accepts_only_supported_decks() {
        assert_eq!(None, DeckId::new(0));
        assert_eq!(Some(DeckId::ONE), DeckId::new(1));
        assert_eq!(Some(DeckId::FOUR), DeckId::new(4));
        assert_eq!(None, DeckId::new(5));
    }

    #[test]
    fn group_round_trip() {
        for deck in DeckId::all() {
            assert_eq!(Some(deck), DeckId::from_group(&deck.group()));
        }
        assert_eq!("[Channel3]", DeckId::THREE.group());
    }

    #[test]
    fn from_malformed_group() {
        assert_eq!(None, DeckId::from_group(""));
        assert_eq!(None, DeckId::from_group("[Channel]"));
        assert_eq!(None, DeckId::from_group("[Channel5]"));
        assert_eq!(None, DeckId::from_group("[Channel+1]"));
        assert_eq!(None, DeckId::from_group("[Channel1"));
        assert_eq!(None, DeckId::from_group("Channel1]"));
        assert_eq!(None, DeckId::from_group("[Sampler1]"));
        assert_eq!(None, DeckId::from_group("[Channel999999999999]"));
    }

    #[test]
    fn all_decks_in_order() {
        let numbers = DeckId::all().map(DeckId::number).collect::<Vec<_>>();
        assert_eq!(vec![1, 2, 3, 4], numbers);
    }
}
