//! Defensive, tempo-oriented policy.
//!
//! Grounded on `original_source/mahjong_sim/strategies.py::TempoDefender`:
//! takes any win on offer, is reluctant to open the hand via pong/quad/chi
//! once the wall is running down, and discards toward whichever tile is
//! safest among the candidates that keep the hand progressing.

use crate::config::TempoDefenderThresholds;
use crate::policy::heuristics::{dynamic_weights, evaluate_post_discard_hand, hand_completion_score, safety_score};
use crate::policy::{ClaimChoice, ClaimOptions, Policy, TableState};
use crate::tile::Tile;

pub struct TempoDefender {
    thresholds: TempoDefenderThresholds,
}

impl TempoDefender {
    pub fn new(thresholds: TempoDefenderThresholds) -> Self {
        TempoDefender { thresholds }
    }
}

impl Policy for TempoDefender {
    fn name(&self) -> &'static str {
        "DEF_TEMPO"
    }

    fn should_hu(&self, state: &TableState, fan: u8) -> bool {
        if fan >= state.fan_min {
            return true;
        }
        state.risk >= self.thresholds.high_risk_threshold
            && fan as f64 >= state.fan_min as f64 - self.thresholds.risk_fan_adjustment
    }

    fn decide_claim(&self, state: &TableState, options: &ClaimOptions) -> Option<ClaimChoice> {
        let risk = state.risk;

        if options.can_quad && risk < self.thresholds.gong_risk_threshold {
            return Some(ClaimChoice::Quad);
        }
        if options.can_pong && risk < self.thresholds.pong_risk_threshold {
            return Some(ClaimChoice::Pong);
        }
        if !options.sequences.is_empty() && risk < self.thresholds.chi_risk_threshold {
            return Some(ClaimChoice::Chi(options.sequences[0]));
        }
        None
    }

    fn choose_discard(&self, state: &TableState) -> Tile {
        let completion = hand_completion_score(state.hand);
        let base_weights = crate::config::ScoringWeights::default();
        let weights = dynamic_weights(state.wall_remaining, state.turn, state.max_turns, completion, &base_weights);
        let risk = state.risk;
        let structure_multiplier = if risk > self.thresholds.high_risk_threshold {
            self.thresholds.risk_fan_adjustment
        } else {
            1.0
        };

        let mut candidates: Vec<Tile> = state.hand.closed_tiles().to_vec();
        candidates.sort();
        candidates.dedup();

        candidates
            .into_iter()
            .max_by(|&a, &b| {
                let score_a = safety_score(a, state) * weights.safety_weight * 2.0
                    + evaluate_post_discard_hand(state.hand, a, &weights) * structure_multiplier;
                let score_b = safety_score(b, state) * weights.safety_weight * 2.0
                    + evaluate_post_discard_hand(state.hand, b, &weights) * structure_multiplier;
                score_a.partial_cmp(&score_b).unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("a discard candidate exists whenever choose_discard is called")
    }
}
