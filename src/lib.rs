pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod experiments;
pub mod fan;
pub mod hand;
pub mod meld;
pub mod policy;
pub mod seat;
pub mod tile;
pub mod trial;
pub mod wall;

pub mod prelude {
    //! Convenient re-exports of commonly imported items.
    pub use super::config::Config;
    pub use super::engine::{RoundOutcome, RoundState};
    pub use super::hand::Hand;
    pub use super::meld::Meld;
    pub use super::policy::{Bucketed, Policy, TempoDefender, ValueChaser};
    pub use super::seat::Seat;
    pub use super::tile::{Suit, Tile};
    pub use super::wall::Wall;
}

/// Version of this crate (as a string).
pub const VERSION_STR: &str = env!("CARGO_PKG_VERSION");
