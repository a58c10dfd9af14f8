//! Card system: vocabulary definitions, the catalog, and dealt game cards.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for vocabulary entries
//! - `CardDefinition`: Static entry (kanji, readings, meaning, hints)
//! - `CardCatalog`: Ordered definition lookup supplied by the loader
//! - `PairId` / `CardFace`: Which entry and which side a dealt card shows
//! - `GameCard`: Per-round play piece (flipped, matched)

pub mod catalog;
pub mod definition;
pub mod game_card;

pub use catalog::CardCatalog;
pub use definition::{CardDefinition, CardId};
pub use game_card::{deal, CardFace, GameCard, PairId};
