//! Shared scoring helpers used by more than one policy.
//!
//! Grounded on the free functions at the top of
//! `original_source/mahjong_sim/strategies.py`: `_suit_majority`,
//! `_meld_potential_score`, `_safety_score`, `_hand_completion_score`,
//! `_opponent_suit_availability`, `_evaluate_post_discard_hand` and
//! `_get_dynamic_weights`. `_tile_key` has no Rust counterpart here since
//! `Tile` already implements `Ord` the same way that key sorted by.

use crate::config::ScoringWeights;
use crate::hand::Hand;
use crate::policy::TableState;
use crate::tile::{Suit, Tile};

/// The numeral suit (if any) this hand holds the most tiles of. Ties break
/// toward the first suit checked (Wan, Tiao, Tong), matching a `max` over a
/// dict built in that iteration order in the source.
pub fn suit_majority(hand: &Hand) -> Option<Suit> {
    let suits = [Suit::Wan, Suit::Tiao, Suit::Tong];
    let mut best: Option<(Suit, usize)> = None;
    for &suit in &suits {
        let count = hand.closed_tiles().iter().filter(|t| t.suit() == suit).count();
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((suit, count)),
        }
    }
    best.map(|(suit, _)| suit)
}

/// How many of a suit's tiles are still plausibly live, approximated as "34
/// minus however many of that suit have already hit a discard pile"
/// (the hand-held copies are not subtracted, matching the source's
/// approximation which also does not consult other hands).
pub fn opponent_suit_availability(state: &TableState, suit: Suit) -> u32 {
    let seen = state.all_discarded().filter(|t| t.suit() == suit).count() as u32;
    let total_of_suit = if suit.is_numeral() { 36 } else { 0 };
    total_of_suit.saturating_sub(seen)
}

/// Score contribution of the hand's completed/near-complete groups:
/// existing melds count heavily, a concealed pair counts next, then partial
/// runs (tatsu) and pairs-in-progress, with isolated tiles penalized and the
/// penalty softened once a few melds already exist (the source's
/// `isolated_reduction` branch, since a near-complete hand can afford a
/// stray tile the way an early one cannot).
pub fn meld_potential_score(hand: &Hand, weights: &ScoringWeights) -> f64 {
    let mut score = hand.melds().len() as f64 * weights.completed_meld;
    let mut counts = std::collections::HashMap::new();
    for &t in hand.closed_tiles() {
        *counts.entry(t).or_insert(0u32) += 1;
    }

    let mut remaining: Vec<Tile> = hand.closed_tiles().to_vec();
    remaining.sort();

    let mut pairs = 0u32;
    let mut isolated = 0u32;
    let mut tatsu = 0u32;

    let mut consumed = vec![false; remaining.len()];
    for i in 0..remaining.len() {
        if consumed[i] {
            continue;
        }
        let t = remaining[i];
        if let Some(j) = remaining.iter().enumerate().skip(i + 1).find(|(j, &u)| !consumed[*j] && u == t).map(|(j, _)| j) {
            consumed[i] = true;
            consumed[j] = true;
            pairs += 1;
            continue;
        }
        if t.is_numeral() {
            if let Some(next) = t.succ() {
                if let Some(j) = remaining.iter().position(|&u| u == next) {
                    if !consumed[j] {
                        consumed[i] = true;
                        consumed[j] = true;
                        tatsu += 1;
                        continue;
                    }
                }
            }
            if let Some(gap) = t.succ().and_then(|m| m.succ()) {
                if let Some(j) = remaining.iter().position(|&u| u == gap) {
                    if !consumed[j] {
                        consumed[i] = true;
                        consumed[j] = true;
                        tatsu += 1;
                        continue;
                    }
                }
            }
        }
        isolated += 1;
    }

    score += pairs as f64 * weights.pair;
    score += tatsu as f64 * weights.tatsu;

    let reduction = if hand.melds().len() >= 2 { weights.isolated_reduction } else { 1.0 };
    score += isolated as f64 * weights.isolated_penalty / reduction;

    for (_, &count) in counts.iter() {
        if count >= 2 {
            score += weights.pair_potential * 0.1 * count as f64;
        }
    }

    score
}

/// How dangerous it would be to discard `tile` right now: 1.0 is fully
/// safe (already discarded by someone, so no one can still need it for a
/// pair or triplet), scaling down toward 0 for a live middle tile nobody has
/// shown.
pub fn safety_score(tile: Tile, state: &TableState) -> f64 {
    if state.all_discarded().any(|&d| d == tile) {
        return 1.0;
    }
    if tile.is_honor() {
        return 0.6;
    }
    if tile.is_terminal() {
        return 0.55;
    }
    let distance_from_edge = (tile.rank() as i32 - 5).unsigned_abs().min(4) as f64;
    0.25 + distance_from_edge * 0.05
}

/// Normalized progress toward a complete hand (0 = nothing, roughly 15 =
/// a complete 14-tile hand counted meld-by-meld), feeding both
/// `_get_dynamic_weights` and a policy's own completion checks.
pub fn hand_completion_score(hand: &Hand) -> f64 {
    let mut score = hand.melds().len() as f64 * 3.0;
    let mut counts = std::collections::HashMap::new();
    for &t in hand.closed_tiles() {
        *counts.entry(t).or_insert(0u32) += 1;
    }
    for (_, count) in counts {
        score += match count {
            2 => 1.5,
            3 => 3.0,
            _ => 0.0,
        };
    }
    score
}

/// Re-evaluate the hand's potential as if `discarded` had already left it,
/// used to rank candidate discards by what they leave behind.
pub fn evaluate_post_discard_hand(hand: &Hand, discarded: Tile, weights: &ScoringWeights) -> f64 {
    let mut remainder = hand.clone();
    if remainder.remove_tile(discarded).is_err() {
        return f64::NEG_INFINITY;
    }
    meld_potential_score(&remainder, weights) + hand_completion_score(&remainder) * weights.completion_improvement
}

/// Weights scaled by how far along the round is: later in the wall/turn,
/// safety matters more and raw meld potential matters less, and a hand
/// that's already close to tenpai gets less benefit from chasing further
/// structure. Mirrors `_get_dynamic_weights`'s three blended progress
/// terms exactly.
pub fn dynamic_weights(
    wall_remaining: usize,
    turn: u32,
    max_turns: u32,
    hand_completion: f64,
    base: &ScoringWeights,
) -> ScoringWeights {
    let wall_progress = (83.0 - wall_remaining as f64).max(0.0).min(83.0) / 83.0;
    let turn_progress = (turn as f64 / max_turns.max(1) as f64).min(1.0);
    let combined_progress = 0.7 * wall_progress + 0.3 * turn_progress;
    let completion_normalized = (hand_completion / 15.0).max(0.0).min(1.0);
    let safety_multiplier = 0.3 + combined_progress * 0.7;
    let potential_multiplier = 1.0 - completion_normalized * 0.3;

    ScoringWeights {
        safety_weight: base.safety_weight * safety_multiplier,
        pair_potential: base.pair_potential * potential_multiplier,
        sequence_potential: base.sequence_potential * potential_multiplier,
        completed_meld: base.completed_meld,
        pair: base.pair * potential_multiplier,
        tatsu: base.tatsu * potential_multiplier,
        honor_value: base.honor_value,
        suit_penalty: base.suit_penalty,
        isolated_penalty: base.isolated_penalty,
        isolated_reduction: base.isolated_reduction,
        structure_clarity: base.structure_clarity,
        completion_improvement: base.completion_improvement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringWeights;
    use std::str::FromStr;

    fn t(s: &str) -> Tile {
        Tile::from_str(s).unwrap()
    }

    #[test]
    fn already_discarded_tile_is_fully_safe() {
        let discards = [vec![t("5m")], vec![], vec![], vec![]];
        let hand = Hand::new();
        let state = TableState {
            seat: crate::seat::SEAT_0,
            hand: &hand,
            discards: &discards,
            wall_remaining: 50,
            turn: 3,
            max_turns: 100,
            last_discard: None,
            risk: 0.1,
            fan_min: 1,
            t_fan_threshold: 3,
        };
        assert_eq!(safety_score(t("5m"), &state), 1.0);
    }

    #[test]
    fn dynamic_weights_raise_safety_as_wall_empties() {
        let weights = ScoringWeights::default();
        let early = dynamic_weights(80, 1, 100, 0.0, &weights);
        let late = dynamic_weights(5, 50, 100, 5.0, &weights);
        assert!(late.safety_weight > early.safety_weight);
    }

    #[test]
    fn suit_majority_picks_most_common_numeral_suit() {
        let mut hand = Hand::new();
        for s in ["1m", "2m", "3m", "1s", "1s"] {
            hand.add_tile(t(s));
        }
        assert_eq!(suit_majority(&hand), Some(Suit::Wan));
    }
}
