//! Round engine: deal, play out a round via the state machine, price the
//! result.

pub mod scoring;
pub mod state;
pub mod step;

pub use state::{RoundOutcome, RoundState};
pub use step::run_round;
