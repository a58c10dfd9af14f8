//! Game cards - the play pieces dealt each round.
//!
//! Every `CardDefinition` yields exactly two `GameCard`s: a kanji face and a
//! romaji face sharing one `PairId`. The session owns these, flips them and
//! marks them matched; a new round deals a fresh set.

use serde::{Deserialize, Serialize};

use super::catalog::CardCatalog;
use super::definition::{CardDefinition, CardId};

/// Identifies the definition a game card was dealt from.
///
/// Two cards match only if they share a pair ID and show different faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairId(pub u32);

impl PairId {
    /// The catalog entry this pair came from.
    #[must_use]
    pub const fn card_id(self) -> CardId {
        CardId::new(self.0)
    }
}

impl From<CardId> for PairId {
    fn from(id: CardId) -> Self {
        Self(id.raw())
    }
}

impl std::fmt::Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pair({})", self.0)
    }
}

/// Which side of the vocabulary entry a card shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardFace {
    Kanji,
    Romaji,
}

/// A single play piece on the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameCard {
    /// Deal-order identifier, stable across the shuffle.
    pub id: u32,

    /// Definition this card belongs to.
    pub pair_id: PairId,

    /// Face shown when flipped.
    pub face: CardFace,

    /// Is this card currently face-up?
    pub is_flipped: bool,

    /// Has this card been matched with its partner?
    pub is_matched: bool,
}

impl GameCard {
    /// Create a face-down, unmatched card.
    #[must_use]
    pub fn new(id: u32, pair_id: PairId, face: CardFace) -> Self {
        Self {
            id,
            pair_id,
            face,
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Deal the kanji and romaji faces for one definition.
    #[must_use]
    pub fn pair_for(definition: &CardDefinition, first_id: u32) -> [Self; 2] {
        let pair_id = PairId::from(definition.id);
        [
            Self::new(first_id, pair_id, CardFace::Kanji),
            Self::new(first_id + 1, pair_id, CardFace::Romaji),
        ]
    }

    /// Can this card still be turned over?
    #[must_use]
    pub fn is_face_down(&self) -> bool {
        !self.is_flipped && !self.is_matched
    }

    /// Text shown on this card's face.
    #[must_use]
    pub fn face_text<'a>(&self, definition: &'a CardDefinition) -> &'a str {
        match self.face {
            CardFace::Kanji => &definition.kanji,
            CardFace::Romaji => &definition.romaji,
        }
    }
}

/// Deal two cards per catalog entry, in catalog order, unshuffled.
#[must_use]
pub fn deal(catalog: &CardCatalog) -> Vec<GameCard> {
    let mut cards = Vec::with_capacity(catalog.len() * 2);
    let mut next_id = 0u32;
    for definition in catalog.iter() {
        cards.extend(GameCard::pair_for(definition, next_id));
        next_id += 2;
    }
    cards
}
