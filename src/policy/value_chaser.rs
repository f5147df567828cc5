//! Value-oriented policy: chases a bigger hand instead of settling for the
//! first win on offer.
//!
//! Grounded on `original_source/mahjong_sim/strategies.py::ValueChaser`:
//! declines a low-value win unless the wall is nearly empty (a bailout), is
//! willing to pong/upgrade aggressively for fan, but skips chi once the
//! wall has thinned past `chi_wall_threshold` since a newly opened hand has
//! little time left to pay off.

use crate::config::ValueChaserThresholds;
use crate::policy::heuristics::evaluate_post_discard_hand;
use crate::policy::{ClaimChoice, ClaimOptions, Policy, TableState};
use crate::tile::Tile;

pub struct ValueChaser {
    thresholds: ValueChaserThresholds,
}

impl ValueChaser {
    pub fn new(thresholds: ValueChaserThresholds) -> Self {
        ValueChaser { thresholds }
    }
}

impl Policy for ValueChaser {
    fn name(&self) -> &'static str {
        "VAL_CHASER"
    }

    fn should_hu(&self, state: &TableState, fan: u8) -> bool {
        let threshold = self.thresholds.target_threshold.max(state.t_fan_threshold);
        if state.risk > self.thresholds.bailout_risk_threshold {
            return fan >= state.fan_min;
        }
        fan >= threshold
    }

    fn decide_claim(&self, state: &TableState, options: &ClaimOptions) -> Option<ClaimChoice> {
        if options.can_quad {
            return Some(ClaimChoice::Quad);
        }
        if options.can_pong {
            return Some(ClaimChoice::Pong);
        }
        if !options.sequences.is_empty()
            && state.wall_remaining > self.thresholds.chi_wall_threshold as usize
            && state.risk < self.thresholds.chi_risk_threshold
        {
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
