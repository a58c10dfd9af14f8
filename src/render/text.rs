//! Plain-text table renderer.

use std::fmt::Write;

use super::Renderer;
use crate::cards::{CardCatalog, GameCard};
use crate::rules::DisplayPolicy;
use crate::session::SessionSnapshot;

/// Renders the table as a text grid.
///
/// ```text
/// Round 1 | score 1000 | attempts 0 | matched 0/2
/// [ ? ] [水 A♠] [ ? ] [ ? ]
/// ```
///
/// Face-down cards show `?`, or `·` when focus mode excludes them. Matched
/// cards are prefixed with `*`. Rank and suit hints follow the round's
/// display policy.
#[derive(Clone, Debug)]
pub struct TextRenderer {
    columns: usize,
    output: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TextRenderer {
    /// Create a renderer laying out `columns` cards per row.
    #[must_use]
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
            output: String::new(),
        }
    }

    /// Text produced by the last `draw`.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    fn cell(card: &GameCard, in_focus: bool, catalog: &CardCatalog, policy: DisplayPolicy) -> String {
        if !card.is_flipped && !card.is_matched {
            return if in_focus { "[ ? ]".into() } else { "[ · ]".into() };
        }

        let Some(definition) = catalog.get(card.pair_id.card_id()) else {
            return "[ ! ]".into();
        };

        let mut cell = String::from("[");
        if card.is_matched {
            cell.push('*');
        }
        cell.push_str(card.face_text(definition));

        let mut hint = String::new();
        if policy.show_rank {
            hint.push_str(&definition.rank);
        }
        if policy.show_suit {
            hint.push_str(&definition.suit);
        }
        if !hint.is_empty() {
            cell.push(' ');
            cell.push_str(&hint);
        }
        cell.push(']');
        cell
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, snapshot: &SessionSnapshot, catalog: &CardCatalog) {
        self.output.clear();

        // Writing to a String cannot fail
        let _ = write!(
            self.output,
            "{} | score {} | attempts {} | matched {}/{}",
            snapshot.round,
            snapshot.score,
            snapshot.attempts,
            snapshot.matched_count(),
            catalog.len()
        );
        if snapshot.is_restricted {
            self.output.push_str(" | focus");
        }
        self.output.push('\n');

        let policy = snapshot.display_policy();
        let cells: Vec<String> = snapshot
            .cards
            .iter()
            .enumerate()
            .map(|(index, card)| Self::cell(card, snapshot.is_in_focus(index), catalog, policy))
            .collect();

        for row in cells.chunks(self.columns) {
            self.output.push_str(&row.join(" "));
            self.output.push('\n');
        }
    }
}
