//! Generic three-tier bucketed-risk baseline policy.
//!
//! Resolves spec §9 Open Question #4: the source's `players.py::NeutralPolicy`
//! only ever compared one `risk_threshold` against a single flat gate before
//! calling pong. This policy generalizes that into three risk bands, each
//! gating win declaration behind a different fan floor: the lowest floor
//! when risk is high (take whatever win is on offer before the wall runs
//! out), the highest floor when risk is low (hold out for a better hand).

use crate::config::BucketedThresholds;
use crate::policy::heuristics::evaluate_post_discard_hand;
use crate::policy::{ClaimChoice, ClaimOptions, Policy, TableState};
use crate::tile::Tile;

pub struct Bucketed {
    thresholds: BucketedThresholds,
}

impl Bucketed {
    pub fn new(thresholds: BucketedThresholds) -> Self {
        Bucketed { thresholds }
    }

    fn risk_bucket_floor(&self, risk: f64) -> u8 {
        if risk >= self.thresholds.risk_high {
            self.thresholds.fan_floor_high_risk
        } else if risk >= self.thresholds.risk_low {
            self.thresholds.fan_floor_mid_risk
        } else {
            self.thresholds.fan_floor_low_risk
        }
    }
}

impl Policy for Bucketed {
    fn name(&self) -> &'static str {
        "BASE_BUCKETED"
    }

    fn should_hu(&self, state: &TableState, fan: u8) -> bool {
        fan >= self.risk_bucket_floor(state.risk).max(state.fan_min)
    }

    fn decide_claim(&self, state: &TableState, options: &ClaimOptions) -> Option<ClaimChoice> {
        if options.can_quad {
            return Some(ClaimChoice::Quad);
        }
        if options.can_pong && state.risk < self.thresholds.risk_high {
            return Some(ClaimChoice::Pong);
        }
        if !options.sequences.is_empty() && state.risk < self.thresholds.risk_low {
            return Some(ClaimChoice::Chi(options.sequences[0]));
        }
        None
    }

    fn choose_discard(&self, state: &TableState) -> Tile {
        let weights = crate::config::ScoringWeights::default();
        let mut candidates: Vec<Tile> = state.hand.closed_tiles().to_vec();
        candidates.sort();
        candidates.dedup();

        candidates
            .into_iter()
            .max_by(|&a, &b| {
                let score_a = evaluate_post_discard_hand(state.hand, a, &weights);
                let score_b = evaluate_post_discard_hand(state.hand, b, &weights);
                score_a.partial_cmp(&score_b).unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("a discard candidate exists whenever choose_discard is called")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::Hand;
    use crate::seat::SEAT_0;

    fn thresholds() -> BucketedThresholds {
        BucketedThresholds {
            risk_high: 0.4,
            risk_low: 0.15,
            fan_floor_high_risk: 1,
            fan_floor_mid_risk: 2,
            fan_floor_low_risk: 3,
        }
    }

    fn base_state<'a>(hand: &'a Hand, discards: &'a [Vec<Tile>; 4]) -> TableState<'a> {
        TableState {
            seat: SEAT_0,
            hand,
            discards,
            wall_remaining: 5,
            turn: 80,
            max_turns: 100,
            last_discard: None,
            risk: 0.5,
            fan_min: 1,
            t_fan_threshold: 3,
        }
    }

    #[test]
    fn low_risk_bucket_demands_a_higher_fan_floor() {
        let policy = Bucketed::new(thresholds());
        let hand = Hand::new();
        let discards = [vec![], vec![], vec![], vec![]];
        let low_risk = TableState { risk: 0.05, ..base_state(&hand, &discards) };
        assert!(!policy.should_hu(&low_risk, 2));
        assert!(policy.should_hu(&low_risk, 3));

        let high_risk = TableState { risk: 0.9, ..base_state(&hand, &discards) };
        assert!(policy.should_hu(&high_risk, 1));
    }

    #[test]
    fn high_risk_bucket_declines_opening_the_hand_via_pong() {
        let policy = Bucketed::new(thresholds());
        let hand = Hand::new();
        let discards = [vec![], vec![], vec![], vec![]];
        let state = TableState { risk: 0.9, ..base_state(&hand, &discards) };
        let options = ClaimOptions { can_pong: true, ..Default::default() };
        assert_eq!(policy.decide_claim(&state, &options), None);
    }

    #[test]
    fn low_risk_bucket_takes_a_safe_pong() {
        let policy = Bucketed::new(thresholds());
        let hand = Hand::new();
        let discards = [vec![], vec![], vec![], vec![]];
        let state = TableState { risk: 0.05, ..base_state(&hand, &discards) };
        let options = ClaimOptions { can_pong: true, ..Default::default() };
        assert_eq!(policy.decide_claim(&state, &options), Some(ClaimChoice::Pong));
    }
}
