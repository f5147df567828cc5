//! Decision-making interface implemented by each strategy.
//!
//! Grounded on `original_source/mahjong_sim/strategies.py`'s `BaseStrategy`
//! (`should_hu`, `decide_claim`, `choose_discard`) and `TableState`. The
//! engine never peeks at a policy's internals; it only ever calls through
//! this trait, mirroring the source's strategy-object-per-seat design.

mod bucketed;
mod heuristics;
mod tempo_defender;
mod value_chaser;

pub use bucketed::Bucketed;
pub use tempo_defender::TempoDefender;
pub use value_chaser::ValueChaser;

use crate::hand::Hand;
use crate::meld::Meld;
use crate::seat::Seat;
use crate::tile::Tile;

/// Everything a policy is allowed to see when making a decision: its own
/// hand, the shared discard piles, wall/turn progress, and the engine's own
/// computed risk/fan-gating context. No policy ever sees another seat's
/// hand, matching the source's strategies only ever touching
/// `table_state.hand` for `self`.
pub struct TableState<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub discards: &'a [Vec<Tile>; 4],
    pub wall_remaining: usize,
    pub turn: u32,
    pub max_turns: u32,
    pub last_discard: Option<(Seat, Tile)>,
    /// Table danger in `[0, 1]`, computed by the engine as
    /// `|discard_pile| / max(risk_floor, wall_remaining + |discard_pile|)`.
    /// Policies read this rather than each reimplementing their own proxy.
    pub risk: f64,
    /// The round's configured minimum fan to declare any win (`fan_min`).
    pub fan_min: u8,
    /// The round's configured fan target above which a win is never
    /// considered risky to decline (`t_fan_threshold`).
    pub t_fan_threshold: u8,
}

impl<'a> TableState<'a> {
    pub fn discards_of(&self, seat: Seat) -> &[Tile] {
        &self.discards[seat.to_usize()]
    }

    /// All tiles any seat has discarded so far, used by safety heuristics
    /// that check whether a tile is "genbutsu" (already safely discarded).
    pub fn all_discarded(&self) -> impl Iterator<Item = &Tile> {
        self.discards.iter().flatten()
    }
}

/// What a seat could claim a just-discarded tile for. `sequences` is empty
/// unless the claimant is the next seat clockwise from the discarder,
/// enforcing that only the next seat may ever call chi.
#[derive(Clone, Debug, Default)]
pub struct ClaimOptions {
    pub can_win: bool,
    pub can_quad: bool,
    pub can_pong: bool,
    pub sequences: Vec<Meld>,
}

impl ClaimOptions {
    pub fn is_empty(&self) -> bool {
        !self.can_win && !self.can_quad && !self.can_pong && self.sequences.is_empty()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ClaimChoice {
    Win,
    Quad,
    Pong,
    Chi(Meld),
}

/// A strategy: what a seat plays like. Implementations hold their own
/// threshold/weight configuration (see `crate::config`) so the engine can
/// stay strategy-agnostic.
pub trait Policy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Declare a win, now that one is available? `fan` is the value the
    /// engine has already priced this win at, so a strategy can weigh it
    /// against chasing a bigger hand. Strategies can decline (`false`);
    /// the engine records this as a "missed hu" against the seat regardless
    /// of the reason.
    fn should_hu(&self, state: &TableState, fan: u8) -> bool;

    /// Which, if any, of the available claims on the just-discarded tile to
    /// take. `None` passes. The engine has already filtered `options` down
    /// to what is legally available to this seat at this priority level.
    fn decide_claim(&self, state: &TableState, options: &ClaimOptions) -> Option<ClaimChoice>;

    /// Which tile to discard from the closed hand after drawing/claiming.
    fn choose_discard(&self, state: &TableState) -> Tile;
}
