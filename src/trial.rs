//! One trial: many rounds played back-to-back with a fixed seat/policy
//! assignment, dealer rotating between rounds, stats aggregated per seat.
//!
//! Grounded on `original_source/mahjong_sim/real_mc.py::run_real_mc_trial`
//! (dealer rotation: the winning dealer repeats, any other winner or a draw
//! advances the dealer one seat) and `mahjong_sim/simulation.py::run_simulation`
//! (per-seat profit/utility/fan accumulation, with incremental utility
//! floored at zero before being added to a starting `baseline_utility`).

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::engine::scoring::{compute_score, loser_cost, winner_profit};
use crate::engine::{RoundOutcome, RoundState};
use crate::policy::Policy;
use crate::seat::{all_seats, Seat};
use crate::wall::Wall;

#[derive(Clone, Debug, Default)]
pub struct SeatAggregate {
    pub rounds: u32,
    pub total_profit: f64,
    pub wins: u32,
    pub self_draw_wins: u32,
    pub claim_wins: u32,
    pub deal_in_as_loser: u32,
    pub missed_hu: u32,
    fan_sum: u32,
    fan_count: u32,
    incremental_utility: f64,
}

impl SeatAggregate {
    /// Average fan over winning hands only (fan is meaningless for a round
    /// this seat did not win), matching the source's `mean_fan` which is
    /// computed only over entries where `fan > 0`.
    pub fn mean_fan(&self) -> Option<f64> {
        if self.fan_count == 0 {
            None
        } else {
            Some(self.fan_sum as f64 / self.fan_count as f64)
        }
    }

    pub fn win_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.wins as f64 / self.rounds as f64
        }
    }

    pub fn deal_in_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.deal_in_as_loser as f64 / self.rounds as f64
        }
    }

    /// The starting `baseline_utility` plus this seat's running incremental
    /// utility, floored at zero so a string of bad rounds cannot drive a
    /// trial's running utility below its floor.
    pub fn total_utility(&self, baseline_utility: f64) -> f64 {
        baseline_utility + self.incremental_utility.max(0.0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct TrialResult {
    pub seats: [SeatAggregate; 4],
    /// Rounds that hit an internal consistency check failure (a policy
    /// returning a tile it doesn't hold, a hand invariant violation) and
    /// were recovered as a draw rather than corrupting the whole trial.
    /// Always zero in debug builds, where such a violation is fatal instead.
    pub abandoned_rounds: u32,
}

/// Runs one round, converting an invariant-violation panic into a `Draw` so
/// a single bad policy/state bug does not take down an entire trial run.
/// Debug builds let the panic through so the bug surfaces immediately during
/// development; only release builds recover at this boundary.
fn run_round_guarded(state: &mut RoundState, policies: &[&dyn Policy; 4]) -> (RoundOutcome, bool) {
    #[cfg(debug_assertions)]
    {
        (crate::engine::run_round(state, policies), false)
    }
    #[cfg(not(debug_assertions))]
    {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| crate::engine::run_round(state, policies))) {
            Ok(outcome) => (outcome, false),
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                log::warn!("round abandoned after an invariant violation: {message}");
                (RoundOutcome::Draw, true)
            }
        }
    }
}

fn compute_utility(profit: f64, missed_hu: bool, deal_in_as_loser: bool) -> f64 {
    let mut utility = if profit > 0.0 {
        profit.sqrt()
    } else if profit < 0.0 {
        -(-profit).sqrt()
    } else {
        0.0
    };
    if missed_hu {
        utility -= 0.2;
    }
    if deal_in_as_loser {
        utility -= 0.5;
    }
    utility
}

/// Play `rounds_per_trial` rounds with `policies` fixed to seats, rotating
/// the dealer per round. `seed` drives every round's wall shuffle,
/// deterministically and without any global random state.
pub fn run_trial(config: &Config, policies: &[&dyn Policy; 4], seed: u64) -> TrialResult {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut result = TrialResult::default();
    let mut dealer = Seat::new(0);

    for _ in 0..config.rounds_per_trial {
        let wall = Wall::shuffled(&mut rng);
        let mut state = RoundState::new(wall, dealer, 100, config.risk_floor, config.fan_min, config.t_fan_threshold);
        let (outcome, abandoned) = run_round_guarded(&mut state, policies);
        if abandoned {
            result.abandoned_rounds += 1;
        }

        let missed_hu_by_seat = if abandoned { [0; 4] } else { state.missed_hu };

        match outcome {
            RoundOutcome::Win { winner, is_self_draw, fan, deal_in_seat } => {
                let score = compute_score(fan, config.base_points);
                let profit = winner_profit(score, is_self_draw, config.penalty_deal_in);

                for seat in all_seats() {
                    let agg = &mut result.seats[seat.to_usize()];
                    agg.rounds += 1;
                    agg.missed_hu += missed_hu_by_seat[seat.to_usize()];

                    let (seat_profit, dealt_in) = if seat == winner {
                        (profit, false)
                    } else if !is_self_draw && Some(seat) == deal_in_seat {
                        (loser_cost(score, config.penalty_deal_in, true), true)
                    } else if !is_self_draw {
                        (0.0, false)
                    } else {
                        (loser_cost(score, config.penalty_deal_in, false), false)
                    };

                    agg.total_profit += seat_profit;
                    let utility = compute_utility(seat_profit, missed_hu_by_seat[seat.to_usize()] > 0, dealt_in);
                    agg.incremental_utility += utility;

                    if seat == winner {
                        agg.wins += 1;
                        if is_self_draw {
                            agg.self_draw_wins += 1;
                        } else {
                            agg.claim_wins += 1;
                        }
                        agg.fan_sum += fan as u32;
                        agg.fan_count += 1;
                    }
                    if dealt_in {
                        agg.deal_in_as_loser += 1;
                    }
                }

                dealer = if winner == dealer { dealer } else { dealer.wrapping_add(1) };
            }
            RoundOutcome::Draw => {
                for seat in all_seats() {
                    let agg = &mut result.seats[seat.to_usize()];
                    agg.rounds += 1;
                    agg.missed_hu += missed_hu_by_seat[seat.to_usize()];
                    let utility = compute_utility(0.0, missed_hu_by_seat[seat.to_usize()] > 0, false);
                    agg.incremental_utility += utility;
                }
                dealer = dealer.wrapping_add(1);
            }
        }
    }

    result
}

/// Run `config.trials` independent trials in parallel, one worker seed per
/// trial derived from `base_seed` so repeated runs with the same
/// `base_seed` reproduce identical results regardless of thread scheduling.
pub fn run_many_trials(config: &Config, policies: &[&dyn Policy; 4], base_seed: u64) -> Vec<TrialResult> {
    use rayon::prelude::*;

    (0..config.trials)
        .into_par_iter()
        .map(|i| run_trial(config, policies, base_seed.wrapping_add(i as u64)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Bucketed, Policy};

    #[test]
    fn a_trial_accumulates_one_round_per_seat_per_round_played() {
        let mut config_yaml = "trials: 1\nrounds_per_trial: 5\n".to_string();
        config_yaml.push_str("");
        let config: Config = serde_yaml::from_str(&config_yaml).unwrap();
        let policy = Bucketed::new(Default::default());
        let policies: [&dyn Policy; 4] = [&policy, &policy, &policy, &policy];
        let result = run_trial(&config, &policies, 7);
        for seat in result.seats.iter() {
            assert_eq!(seat.rounds, 5);
        }
    }
}
