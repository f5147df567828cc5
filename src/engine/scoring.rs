//! Settlement arithmetic: fan -> score -> profit/loss per seat.

/// Base score `base_points * 2^fan`.
pub fn compute_score(fan: u8, base_points: i64) -> i64 {
    base_points * (1i64 << fan as u32)
}

/// Winner's profit. Self-draw collects one share of `score` from each of
/// the three opponents (`3 * score` total); a claimed win collects
/// `score * penalty_multiplier` from the discarder alone.
pub fn winner_profit(score: i64, is_self_draw: bool, penalty_multiplier: f64) -> f64 {
    if is_self_draw {
        score as f64 * 3.0
    } else {
        score as f64 * penalty_multiplier
    }
}

/// Cost paid by a losing seat. A seat that dealt in pays
/// `score * penalty_multiplier`; a seat that merely watched another
/// opponent self-draw pays one flat share of `score`.
pub fn loser_cost(score: i64, penalty_multiplier: f64, is_deal_in_loser: bool) -> f64 {
    if is_deal_in_loser {
        -(score as f64) * penalty_multiplier
    } else {
        -(score as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_doubles_per_fan() {
        assert_eq!(compute_score(1, 1), 2);
        assert_eq!(compute_score(4, 1), 16);
    }

    #[test]
    fn self_draw_profit_is_three_shares() {
        let score = compute_score(2, 1);
        assert_eq!(winner_profit(score, true, 1.0), 12.0);
    }

    #[test]
    fn deal_in_profit_uses_penalty_multiplier() {
        let score = compute_score(2, 1);
        assert_eq!(winner_profit(score, false, 3.0), 12.0);
        assert_eq!(loser_cost(score, 3.0, true), -12.0);
    }

    #[test]
    fn non_deal_in_loser_pays_flat_score() {
        let score = compute_score(1, 1);
        assert_eq!(loser_cost(score, 3.0, false), -2.0);
    }
}
