//! Mutable state for one round in progress.

use crate::hand::Hand;
use crate::seat::Seat;
use crate::tile::Tile;
use crate::wall::Wall;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RoundOutcome {
    Win {
        winner: Seat,
        is_self_draw: bool,
        fan: u8,
        /// The seat whose discard was claimed, if this was not a self-draw.
        deal_in_seat: Option<Seat>,
    },
    /// Wall exhausted with no winner.
    Draw,
}

pub struct RoundState {
    pub hands: [Hand; 4],
    pub wall: Wall,
    pub dealer: Seat,
    pub current_seat: Seat,
    pub turn: u32,
    pub max_turns: u32,
    pub discards: [Vec<Tile>; 4],
    pub outcome: Option<RoundOutcome>,
    /// Count per seat of declining an available win (`Policy::should_hu`
    /// returning `false`), tracked so the trial layer can apply the
    /// missed-hu utility penalty regardless of why a seat passed.
    pub missed_hu: [u32; 4],
    /// Config-rooted context handed to policies via `TableState`: the risk
    /// formula's floor, the minimum fan to ever declare a win, and the fan
    /// target a chasing policy measures itself against.
    pub risk_floor: f64,
    pub fan_min: u8,
    pub t_fan_threshold: u8,
}

impl RoundState {
    pub fn new(wall: Wall, dealer: Seat, max_turns: u32, risk_floor: f64, fan_min: u8, t_fan_threshold: u8) -> Self {
        RoundState {
            hands: [Hand::new(), Hand::new(), Hand::new(), Hand::new()],
            wall,
            dealer,
            current_seat: dealer,
            turn: 0,
            max_turns,
            discards: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            outcome: None,
            missed_hu: [0; 4],
            risk_floor,
            fan_min,
            t_fan_threshold,
        }
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.to_usize()]
    }

    pub fn hand_mut(&mut self, seat: Seat) -> &mut Hand {
        &mut self.hands[seat.to_usize()]
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Deal the opening hands: 13 tiles to every seat, a 14th to the dealer,
    /// matching `RealMCSimulation.initialize_round`'s repeated-draw deal.
    pub fn deal_opening_hands(&mut self) {
        for _ in 0..3 {
            for seat in crate::seat::all_seats() {
                for _ in 0..4 {
                    if let Some(tile) = self.wall.draw() {
                        self.hand_mut(seat).add_tile(tile);
                    }
                }
            }
        }
        for seat in crate::seat::all_seats() {
            if let Some(tile) = self.wall.draw() {
                self.hand_mut(seat).add_tile(tile);
            }
        }
        if let Some(tile) = self.wall.draw() {
            self.hand_mut(self.dealer).add_tile(tile);
        }
    }
}
