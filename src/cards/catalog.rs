//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores the vocabulary entries a session deals from. It
//! keeps insertion order (deals are generated in catalog order before the
//! shuffle) and provides fast lookup by `CardId`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardId};
use crate::core::CatalogError;

/// Ordered collection of card definitions.
///
/// ## Example
///
/// ```
/// use kanji_concentration::cards::{CardCatalog, CardDefinition, CardId};
///
/// let mut catalog = CardCatalog::new();
/// catalog.push(CardDefinition::new(CardId::new(1), "日", "hi")).unwrap();
///
/// let found = catalog.get(CardId::new(1)).unwrap();
/// assert_eq!(found.kanji, "日");
/// assert!(catalog.push(CardDefinition::new(CardId::new(1), "月", "tsuki")).is_err());
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CardDefinition>", into = "Vec<CardDefinition>")]
pub struct CardCatalog {
    cards: Vec<CardDefinition>,
    index: FxHashMap<CardId, usize>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, rejecting duplicate IDs.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = CardDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.push(definition)?;
        }
        Ok(catalog)
    }

    /// Append a definition.
    pub fn push(&mut self, card: CardDefinition) -> Result<(), CatalogError> {
        if self.index.contains_key(&card.id) {
            return Err(CatalogError::DuplicateId(card.id));
        }
        self.index.insert(card.id, self.cards.len());
        self.cards.push(card);
        Ok(())
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.index.get(&id).and_then(|&i| self.cards.get(i))
    }

    /// Check if a card ID is present.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.index.contains_key(&id)
    }

    /// Get the number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over definitions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.iter()
    }
}

impl TryFrom<Vec<CardDefinition>> for CardCatalog {
    type Error = CatalogError;

    fn try_from(definitions: Vec<CardDefinition>) -> Result<Self, Self::Error> {
        Self::from_definitions(definitions)
    }
}

impl From<CardCatalog> for Vec<CardDefinition> {
    fn from(catalog: CardCatalog) -> Self {
        catalog.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<CardDefinition> {
        vec![
            CardDefinition::new(CardId::new(10), "水", "mizu"),
            CardDefinition::new(CardId::new(2), "火", "hi"),
            CardDefinition::new(CardId::new(7), "木", "ki"),
        ]
    }

    #[test]
    fn test_push_and_get() {
        let catalog = CardCatalog::from_definitions(sample()).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(CardId::new(2)).unwrap().romaji, "hi");
        assert!(catalog.get(CardId::new(99)).is_none());
        assert!(catalog.contains(CardId::new(7)));
        assert!(!catalog.contains(CardId::new(8)));
    }

    #[test]
    fn test_keeps_insertion_order() {
        let catalog = CardCatalog::from_definitions(sample()).unwrap();
        let ids: Vec<_> = catalog.iter().map(|c| c.id.raw()).collect();
        assert_eq!(ids, vec![10, 2, 7]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut defs = sample();
        defs.push(CardDefinition::new(CardId::new(2), "土", "tsuchi"));

        let err = CardCatalog::from_definitions(defs).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == CardId::new(2)));
    }

    #[test]
    fn test_failed_push_leaves_catalog_untouched() {
        let mut catalog = CardCatalog::from_definitions(sample()).unwrap();
        assert!(catalog.push(CardDefinition::new(CardId::new(10), "金", "kin")).is_err());
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(CardId::new(10)).unwrap().kanji, "水");
    }

    #[test]
    fn test_empty() {
        let catalog = CardCatalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_json_array_roundtrip() {
        let catalog = CardCatalog::from_definitions(sample()).unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.starts_with('['));

        let restored: CardCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.get(CardId::new(7)).unwrap().kanji, "木");
    }

    #[test]
    fn test_json_with_duplicates_fails() {
        let json = r#"[
            {"id": 1, "kanji": "一", "romaji": "ichi"},
            {"id": 1, "kanji": "二", "romaji": "ni"}
        ]"#;
        assert!(serde_json::from_str::<CardCatalog>(json).is_err());
    }
}
