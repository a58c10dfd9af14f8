//! Card definitions - static vocabulary data.
//!
//! `CardDefinition` holds one vocabulary entry: the kanji, its readings, the
//! English gloss and the playing-card decorations (rank, suit) shown as memory
//! hints in early rounds. Definitions are created once when the catalog loads
//! and are never changed by a session.
//!
//! The per-round play pieces dealt from a definition live in `GameCard`.

use serde::{Deserialize, Serialize};

/// Unique identifier for a vocabulary entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Static vocabulary entry.
///
/// Only `id`, `kanji` and `romaji` are required; the rest default to empty
/// strings when missing from imported data.
///
/// ## Example
///
/// ```
/// use kanji_concentration::cards::{CardDefinition, CardId};
///
/// let water = CardDefinition::new(CardId::new(1), "水", "mizu")
///     .with_hiragana("みず")
///     .with_english("water")
///     .with_rank("A")
///     .with_suit("♠");
///
/// assert_eq!(water.romaji, "mizu");
/// assert_eq!(water.rank, "A");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this entry.
    pub id: CardId,

    /// Kanji face text.
    pub kanji: String,

    /// Kana reading.
    #[serde(default)]
    pub hiragana: String,

    /// Romaji face text.
    pub romaji: String,

    /// English meaning.
    #[serde(default)]
    pub english: String,

    /// Playing-card rank used as a memory hint.
    #[serde(default)]
    pub rank: String,

    /// Playing-card suit used as a memory hint.
    #[serde(default)]
    pub suit: String,

    /// Mnemonic rhyme.
    #[serde(default)]
    pub rhyme: String,
}

impl CardDefinition {
    /// Create a definition with its two matchable faces.
    #[must_use]
    pub fn new(id: CardId, kanji: impl Into<String>, romaji: impl Into<String>) -> Self {
        Self {
            id,
            kanji: kanji.into(),
            hiragana: String::new(),
            romaji: romaji.into(),
            english: String::new(),
            rank: String::new(),
            suit: String::new(),
            rhyme: String::new(),
        }
    }

    /// Set the kana reading (builder pattern).
    #[must_use]
    pub fn with_hiragana(mut self, hiragana: impl Into<String>) -> Self {
        self.hiragana = hiragana.into();
        self
    }

    /// Set the English meaning (builder pattern).
    #[must_use]
    pub fn with_english(mut self, english: impl Into<String>) -> Self {
        self.english = english.into();
        self
    }

    /// Set the rank decoration (builder pattern).
    #[must_use]
    pub fn with_rank(mut self, rank: impl Into<String>) -> Self {
        self.rank = rank.into();
        self
    }

    /// Set the suit decoration (builder pattern).
    #[must_use]
    pub fn with_suit(mut self, suit: impl Into<String>) -> Self {
        self.suit = suit.into();
        self
    }

    /// Set the mnemonic rhyme (builder pattern).
    #[must_use]
    pub fn with_rhyme(mut self, rhyme: impl Into<String>) -> Self {
        self.rhyme = rhyme.into();
        self
    }
}
