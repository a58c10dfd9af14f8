//! # kanji-concentration
//!
//! The match, scoring and round state machine behind a kanji/romaji
//! "Concentration" study game, including the 4-card focus mode.
//!
//! ## Design Principles
//!
//! 1. **State, not widgets**: A session is a plain struct. Renderers read
//!    snapshots and listen for events; nothing in here touches a UI.
//!
//! 2. **Deterministic**: Every shuffle and selection draws from a seeded
//!    `GameRng`, and delays run on a logical clock the host advances.
//!
//! 3. **Invalid commands are no-ops**: Flipping a matched card or focusing
//!    with too few cards left changes nothing and says why. Only an empty
//!    catalog is an error.
//!
//! ## Modules
//!
//! - `core`: RNG, configuration, error types
//! - `cards`: Vocabulary definitions, the catalog, dealt game cards
//! - `rules`: Match evaluation, focus selection, rounds
//! - `session`: The session state machine, scheduler, events, snapshots
//! - `render`: Renderer trait and a plain-text renderer

pub mod cards;
pub mod core;
pub mod render;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    CatalogError, ConfigError, GameRng, GameRngState, SessionConfig, SessionError, SnapshotError,
};

pub use crate::cards::{CardCatalog, CardDefinition, CardFace, CardId, GameCard, PairId};

pub use crate::rules::{
    evaluate, select_four, ActiveSet, DisplayPolicy, MatchOutcome, Round, ScoringTable, FOCUS_SIZE,
};

pub use crate::session::{
    EventLog, FlipOutcome, FlipRejection, GameSession, RestrictError, SessionEvent,
    SessionListener, SessionSnapshot,
};

pub use crate::render::{Renderer, TextRenderer};
