//! Match evaluation and scoring.
//!
//! Deciding whether two face-up cards match, and what that is worth, is a
//! pure function of the two cards and whether focus mode is on. The session
//! applies the returned delta and updates the card flags itself.

use serde::{Deserialize, Serialize};

use crate::cards::GameCard;

/// Result of evaluating two face-up cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Same entry, different faces.
    pub is_match: bool,

    /// Points to add to the score (negative for a miss).
    pub score_delta: i64,
}

/// Points per evaluated pair, split by focus mode.
///
/// All four amounts are magnitudes; misses are deducted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTable {
    pub match_reward: u32,
    pub restricted_match_reward: u32,
    pub mismatch_penalty: u32,
    pub restricted_mismatch_penalty: u32,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self {
            match_reward: 100,
            restricted_match_reward: 50,
            mismatch_penalty: 20,
            restricted_mismatch_penalty: 10,
        }
    }
}

impl ScoringTable {
    /// Evaluate two cards against this table.
    #[must_use]
    pub fn evaluate(&self, a: &GameCard, b: &GameCard, restricted: bool) -> MatchOutcome {
        let is_match = is_pair(a, b);
        let score_delta = match (is_match, restricted) {
            (true, false) => i64::from(self.match_reward),
            (true, true) => i64::from(self.restricted_match_reward),
            (false, false) => -i64::from(self.mismatch_penalty),
            (false, true) => -i64::from(self.restricted_mismatch_penalty),
        };
        MatchOutcome { is_match, score_delta }
    }
}

/// A kanji face only matches the romaji face of the same entry.
#[must_use]
pub fn is_pair(a: &GameCard, b: &GameCard) -> bool {
    a.pair_id == b.pair_id && a.face != b.face
}

/// Evaluate two cards with the standard scoring table.
#[must_use]
pub fn evaluate(a: &GameCard, b: &GameCard, restricted: bool) -> MatchOutcome {
    ScoringTable::default().evaluate(a, b, restricted)
}
