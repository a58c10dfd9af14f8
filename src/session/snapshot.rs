//! Read-only session views and saved sessions.
//!
//! A `SessionSnapshot` is everything a renderer needs to draw the table and
//! everything needed to resume play later. Cards and the matched set use
//! `im` persistent collections, so taking a snapshot per frame is O(1).

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};

use super::state::FlipBuffer;
use crate::cards::{GameCard, PairId};
use crate::core::{GameRngState, SnapshotError};
use crate::rules::{ActiveSet, DisplayPolicy, Round};

/// Point-in-time copy of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub round: Round,
    pub attempts: u32,
    pub score: i64,
    pub cards: Vector<GameCard>,
    pub matched_pair_ids: OrdSet<PairId>,
    pub flipped_indices: FlipBuffer,
    pub is_restricted: bool,
    pub active_indices: ActiveSet,
    pub is_active: bool,
    pub generation: u64,
    pub rng: GameRngState,
}

impl SessionSnapshot {
    /// Number of matched pairs.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched_pair_ids.len()
    }

    /// Hints visible this round.
    #[must_use]
    pub fn display_policy(&self) -> DisplayPolicy {
        self.round.display_policy()
    }

    /// Every dealt card is matched.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|card| card.is_matched)
    }

    /// Is this table index currently playable under focus mode?
    #[must_use]
    pub fn is_in_focus(&self, index: usize) -> bool {
        !self.is_restricted || self.active_indices.contains(&index)
    }

    /// Encode for local storage.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a stored snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
