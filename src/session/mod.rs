//! Game session: the concentration state machine and its plumbing.
//!
//! ## Key Types
//!
//! - [`GameSession`]: Authoritative state for one table
//! - [`Scheduler`]: Generation-keyed deferred tasks on a logical clock
//! - [`SessionListener`] / [`SessionEvent`]: Change notifications
//! - [`SessionSnapshot`]: Read-only copy for renderers and saved games
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use kanji_concentration::cards::{CardCatalog, CardDefinition, CardId};
//! use kanji_concentration::core::SessionConfig;
//! use kanji_concentration::session::{FlipOutcome, GameSession};
//!
//! let catalog = CardCatalog::from_definitions([
//!     CardDefinition::new(CardId::new(1), "猫", "neko"),
//!     CardDefinition::new(CardId::new(2), "犬", "inu"),
//! ])
//! .unwrap();
//!
//! let mut session = GameSession::start(Arc::new(catalog), SessionConfig::default()).unwrap();
//! assert_eq!(session.cards().len(), 4);
//!
//! assert_eq!(session.flip(0), FlipOutcome::Flipped);
//! assert_eq!(session.flip(1), FlipOutcome::PairRevealed);
//!
//! // Evaluation happens once the reveal delay has passed
//! session.advance(1000);
//! assert_eq!(session.attempts(), 1);
//! assert!(session.flipped_indices().is_empty());
//! ```

mod events;
mod scheduler;
mod snapshot;
mod state;

pub use events::{EventLog, SessionEvent, SessionListener};
pub use scheduler::{DeferredTask, Scheduler, TaskKind};
pub use snapshot::SessionSnapshot;
pub use state::{FlipBuffer, GameSession};

use serde::{Deserialize, Serialize};

/// Result of a flip command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipOutcome {
    /// First card of a pair is face-up.
    Flipped,
    /// Second card is face-up; evaluation is queued.
    PairRevealed,
    /// Nothing changed.
    Rejected(FlipRejection),
}

/// Why a flip was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipRejection {
    /// No round is in play.
    Inactive,
    /// No card at that index.
    OutOfRange,
    /// The card's pair is already solved.
    AlreadyMatched,
    /// The card is already face-up.
    AlreadyFlipped,
    /// Two cards are already face-up awaiting evaluation.
    PairPending,
    /// Focus mode is on and the card is not one of the four.
    OutsideFocus,
}

/// Why focus mode could not start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RestrictError {
    #[error("no round is in play")]
    Inactive,
    #[error("focus mode is already on")]
    AlreadyRestricted,
    #[error("only {remaining} unmatched cards remain, focus needs 4")]
    NotEnoughCards { remaining: usize },
}
