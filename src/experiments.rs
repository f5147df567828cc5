//! Composition-effect sweep: vary how many seats play `ValueChaser` versus
//! `TempoDefender` (theta = 0..=4 chasers) and compare aggregate outcomes.
//!
//! Grounded on `original_source/mahjong_sim/table.py::run_composition_experiments`
//! (sweep theta, rerun trials, group by role rather than literal seat) and
//! `mahjong_sim/plotting.py` (line chart of mean outcome vs theta) — ported
//! onto `plotters` rather than `matplotlib` since that's the charting crate
//! the pack's other repos reach for.

use plotters::prelude::*;

use crate::config::Config;
use crate::policy::{Policy, TempoDefender, ValueChaser};
use crate::trial::{run_many_trials, TrialResult};

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Role {
    Chaser,
    Defender,
}

#[derive(Clone, Debug, Default)]
pub struct RoleSummary {
    pub mean_profit: f64,
    pub mean_win_rate: f64,
    pub mean_deal_in_rate: f64,
    pub seat_count: u32,
}

#[derive(Clone, Debug)]
pub struct CompositionPoint {
    pub theta: u8,
    pub chaser: RoleSummary,
    pub defender: RoleSummary,
}

/// Run the full theta sweep. `theta` is how many of the 4 seats play
/// `ValueChaser`; the rest play `TempoDefender`. Seats 0..theta are
/// chasers, matching the source's simple prefix assignment rather than a
/// randomized seat draw (composition effect, not seat-position effect, is
/// what this experiment isolates).
pub fn run_composition_sweep(config: &Config, base_seed: u64) -> Vec<CompositionPoint> {
    let value_chaser = ValueChaser::new(config.strategy_thresholds.value_chaser.clone());
    let tempo_defender = TempoDefender::new(config.strategy_thresholds.tempo_defender.clone());

    (0..=4u8)
        .map(|theta| {
            let mut refs: [&dyn Policy; 4] = [&tempo_defender; 4];
            for (i, slot) in refs.iter_mut().enumerate() {
                if (i as u8) < theta {
                    *slot = &value_chaser;
                }
            }
            let trials = run_many_trials(config, &refs, base_seed.wrapping_add(theta as u64 * 10_000));
            summarize(theta, &trials)
        })
        .collect()
}

fn summarize(theta: u8, trials: &[TrialResult]) -> CompositionPoint {
    let mut chaser = RoleSummary::default();
    let mut defender = RoleSummary::default();

    for trial in trials {
        for (seat_idx, agg) in trial.seats.iter().enumerate() {
            let role = if (seat_idx as u8) < theta { &mut chaser } else { &mut defender };
            role.mean_profit += agg.total_profit;
            role.mean_win_rate += agg.win_rate();
            role.mean_deal_in_rate += agg.deal_in_rate();
            role.seat_count += 1;
        }
    }

    for role in [&mut chaser, &mut defender] {
        if role.seat_count > 0 {
            role.mean_profit /= role.seat_count as f64;
            role.mean_win_rate /= role.seat_count as f64;
            role.mean_deal_in_rate /= role.seat_count as f64;
        }
    }

    CompositionPoint { theta, chaser, defender }
}

/// Render mean profit per role against theta as a PNG line chart.
pub fn plot_composition_effect(points: &[CompositionPoint], out_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(out_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let min_profit = points
        .iter()
        .flat_map(|p| [p.chaser.mean_profit, p.defender.mean_profit])
        .fold(f64::INFINITY, f64::min);
    let max_profit = points
        .iter()
        .flat_map(|p| [p.chaser.mean_profit, p.defender.mean_profit])
        .fold(f64::NEG_INFINITY, f64::max);

    let mut chart = ChartBuilder::on(&root)
        .caption("Mean profit by seat composition", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0u8..4u8, (min_profit - 1.0)..(max_profit + 1.0))?;

    chart.configure_mesh().x_desc("chasers (theta)").y_desc("mean profit").draw()?;

    chart
        .draw_series(LineSeries::new(points.iter().map(|p| (p.theta, p.chaser.mean_profit)), &RED))?
        .label("ValueChaser")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .draw_series(LineSeries::new(points.iter().map(|p| (p.theta, p.defender.mean_profit)), &BLUE))?
        .label("TempoDefender")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart.configure_series_labels().background_style(WHITE.mix(0.8)).draw()?;
    root.present()?;
    Ok(())
}
