//! Game rules: pure functions the session delegates to.
//!
//! - `evaluator`: match decision and score deltas
//! - `restriction`: focus-mode card selection
//! - `round`: round bounds and the hints each round shows

pub mod evaluator;
pub mod restriction;
pub mod round;

pub use evaluator::{evaluate, is_pair, MatchOutcome, ScoringTable};
pub use restriction::{select_four, ActiveSet, FOCUS_SIZE};
pub use round::{DisplayPolicy, InvalidRound, Round};
