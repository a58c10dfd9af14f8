//! Core building blocks: deterministic RNG, session configuration, errors.
//!
//! Nothing in here knows about rounds or matching. The `session` and `rules`
//! modules build on these types.

pub mod config;
pub mod error;
pub mod rng;

pub use config::SessionConfig;
pub use error::{CatalogError, ConfigError, SessionError, SnapshotError};
pub use rng::{GameRng, GameRngState};
