//! Rounds and their display policy.
//!
//! A round never changes how matching works. It only decides which memory
//! hints (rank, suit) appear on face-up cards, taking one away at a time:
//!
//! | round | rank | suit |
//! |---|---|---|
//! | 1 | yes | yes |
//! | 2 | yes | no |
//! | 3 | no | yes |
//! | 4 | no | no |

use serde::{Deserialize, Serialize};

/// A round number, always in `1..=4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Round(u8);

/// Raised when a round number falls outside `1..=4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("round {0} is outside 1..=4")]
pub struct InvalidRound(pub u8);

impl Round {
    pub const FIRST: Round = Round(1);
    pub const LAST: Round = Round(4);

    /// Create a round, or `None` outside `1..=4`.
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        if number >= Self::FIRST.0 && number <= Self::LAST.0 {
            Some(Self(number))
        } else {
            None
        }
    }

    /// The round number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// The following round, or `None` after the last.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// The preceding round, or `None` before the first.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self.0.checked_sub(1) {
            Some(n) => Self::new(n),
            None => None,
        }
    }

    /// Which hints are visible this round.
    #[must_use]
    pub const fn display_policy(self) -> DisplayPolicy {
        DisplayPolicy {
            show_rank: self.0 <= 2,
            show_suit: self.0 % 2 == 1,
        }
    }
}

impl Default for Round {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for Round {
    type Error = InvalidRound;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::new(number).ok_or(InvalidRound(number))
    }
}

impl From<Round> for u8 {
    fn from(round: Round) -> Self {
        round.0
    }
}

impl std::fmt::Display for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Round {}", self.0)
    }
}

/// Which decorations a renderer should draw on face-up cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPolicy {
    pub show_rank: bool,
    pub show_suit: bool,
}
