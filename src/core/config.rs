//! Session configuration.
//!
//! Every field has a default matching the classic game, so an empty TOML file
//! (or no file at all) yields the standard scoring and timings.
//!
//! ```toml
//! starting_score = 1000
//! restriction_penalty = 50
//! reveal_delay_ms = 1000
//!
//! [scoring]
//! match_reward = 100
//! restricted_mismatch_penalty = 10
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::ConfigError;
use crate::rules::ScoringTable;

/// Longest delay accepted for either deferred step.
pub const MAX_DELAY_MS: u64 = 60_000;

/// Configuration for a concentration session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Score every round starts from.
    pub starting_score: i64,

    /// Points awarded or deducted per evaluated pair.
    pub scoring: ScoringTable,

    /// Flat cost of entering the 4-card focus mode.
    pub restriction_penalty: u32,

    /// Delay between the second flip and evaluation, so both faces show.
    pub reveal_delay_ms: u64,

    /// Delay between a mismatch and the two cards turning back over.
    pub revert_delay_ms: u64,

    /// Leave focus mode on its own once every active card is matched.
    pub auto_exit_restriction: bool,

    /// Seed for deals and focus selection.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_score: 1000,
            scoring: ScoringTable::default(),
            restriction_penalty: 50,
            reveal_delay_ms: 1000,
            revert_delay_ms: 500,
            auto_exit_restriction: true,
            seed: 42,
        }
    }
}

impl SessionConfig {
    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the starting score.
    #[must_use]
    pub fn with_starting_score(mut self, score: i64) -> Self {
        self.starting_score = score;
        self
    }

    /// Set both deferred-step delays.
    #[must_use]
    pub fn with_delays(mut self, reveal_ms: u64, revert_ms: u64) -> Self {
        self.reveal_delay_ms = reveal_ms;
        self.revert_delay_ms = revert_ms;
        self
    }

    /// Enable or disable leaving focus mode automatically.
    #[must_use]
    pub fn with_auto_exit(mut self, enabled: bool) -> Self {
        self.auto_exit_restriction = enabled;
        self
    }

    /// Check value ranges serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reveal_delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "reveal_delay_ms {} exceeds {MAX_DELAY_MS}",
                self.reveal_delay_ms
            )));
        }
        if self.revert_delay_ms > MAX_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "revert_delay_ms {} exceeds {MAX_DELAY_MS}",
                self.revert_delay_ms
            )));
        }
        Ok(())
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        debug!(?config, "parsed session config");
        Ok(config)
    }

    /// Load a config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loading session config from {}", path.display());
        Self::from_toml_str(&text)
    }
}
