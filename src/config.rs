//! Configuration document, loaded from YAML.
//!
//! Grounded on `configs/base.yaml` as loaded by the original driver's
//! `main.py` (`yaml.safe_load`). Required keys (`trials`,
//! `rounds_per_trial`) are plain non-`Option` fields so a missing key is a
//! hard `serde_yaml` parse error surfaced as [`crate::error::ConfigError`];
//! everything else defaults to the values the source strategies used when
//! their own `thresholds`/`weights` dicts were left unset.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub trials: usize,
    pub rounds_per_trial: usize,

    #[serde(default = "default_fan_min")]
    pub fan_min: u8,
    #[serde(default = "default_fan_threshold")]
    pub t_fan_threshold: u8,
    #[serde(default = "default_base_points")]
    pub base_points: i64,
    #[serde(default = "default_penalty_deal_in")]
    pub penalty_deal_in: f64,
    #[serde(default = "default_risk_floor")]
    pub risk_floor: f64,
    #[serde(default = "default_baseline_utility")]
    pub baseline_utility: f64,

    #[serde(default)]
    pub strategy_thresholds: StrategyThresholds,
    #[serde(default)]
    pub scoring_weights: ScoringWeights,
}

fn default_fan_min() -> u8 {
    1
}
fn default_fan_threshold() -> u8 {
    3
}
fn default_base_points() -> i64 {
    1
}
fn default_penalty_deal_in() -> f64 {
    3.0
}
fn default_risk_floor() -> f64 {
    100.0
}
fn default_baseline_utility() -> f64 {
    200.0
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let cfg: Config = serde_yaml::from_str(&text)?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategyThresholds {
    #[serde(default)]
    pub tempo_defender: TempoDefenderThresholds,
    #[serde(default)]
    pub value_chaser: ValueChaserThresholds,
    #[serde(default)]
    pub bucketed: BucketedThresholds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TempoDefenderThresholds {
    #[serde(default = "td_high_risk")]
    pub high_risk_threshold: f64,
    #[serde(default = "td_gong_risk")]
    pub gong_risk_threshold: f64,
    #[serde(default = "td_pong_risk")]
    pub pong_risk_threshold: f64,
    #[serde(default = "td_chi_risk")]
    pub chi_risk_threshold: f64,
    #[serde(default = "td_risk_fan_adj")]
    pub risk_fan_adjustment: f64,
}

fn td_high_risk() -> f64 {
    0.5
}
fn td_gong_risk() -> f64 {
    0.35
}
fn td_pong_risk() -> f64 {
    0.5
}
fn td_chi_risk() -> f64 {
    0.35
}
fn td_risk_fan_adj() -> f64 {
    0.5
}

impl Default for TempoDefenderThresholds {
    fn default() -> Self {
        TempoDefenderThresholds {
            high_risk_threshold: td_high_risk(),
            gong_risk_threshold: td_gong_risk(),
            pong_risk_threshold: td_pong_risk(),
            chi_risk_threshold: td_chi_risk(),
            risk_fan_adjustment: td_risk_fan_adj(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValueChaserThresholds {
    #[serde(default = "vc_target")]
    pub target_threshold: u8,
    #[serde(default = "vc_bailout_risk")]
    pub bailout_risk_threshold: f64,
    #[serde(default = "vc_chi_risk")]
    pub chi_risk_threshold: f64,
    #[serde(default = "vc_chi_wall")]
    pub chi_wall_threshold: u32,
}

fn vc_target() -> u8 {
    3
}
fn vc_bailout_risk() -> f64 {
    0.65
}
fn vc_chi_risk() -> f64 {
    0.7
}
fn vc_chi_wall() -> u32 {
    25
}

impl Default for ValueChaserThresholds {
    fn default() -> Self {
        ValueChaserThresholds {
            target_threshold: vc_target(),
            bailout_risk_threshold: vc_bailout_risk(),
            chi_risk_threshold: vc_chi_risk(),
            chi_wall_threshold: vc_chi_wall(),
        }
    }
}

/// Thresholds for the generic three-tier bucketed-risk baseline policy
/// (spec §9 Open Question #4). `players.py::NeutralPolicy`'s single
/// `risk_threshold: 0.4` becomes the boundary between the mid and high
/// buckets here; the low-risk boundary and per-bucket fan floors are new,
/// since the source only ever drew this single line.
#[derive(Debug, Clone, Deserialize)]
pub struct BucketedThresholds {
    #[serde(default = "bk_risk_high")]
    pub risk_high: f64,
    #[serde(default = "bk_risk_low")]
    pub risk_low: f64,
    #[serde(default = "bk_fan_high")]
    pub fan_floor_high_risk: u8,
    #[serde(default = "bk_fan_mid")]
    pub fan_floor_mid_risk: u8,
    #[serde(default = "bk_fan_low")]
    pub fan_floor_low_risk: u8,
}

fn bk_risk_high() -> f64 {
    0.4
}
fn bk_risk_low() -> f64 {
    0.15
}
fn bk_fan_high() -> u8 {
    1
}
fn bk_fan_mid() -> u8 {
    2
}
fn bk_fan_low() -> u8 {
    3
}

impl Default for BucketedThresholds {
    fn default() -> Self {
        BucketedThresholds {
            risk_high: bk_risk_high(),
            risk_low: bk_risk_low(),
            fan_floor_high_risk: bk_fan_high(),
            fan_floor_mid_risk: bk_fan_mid(),
            fan_floor_low_risk: bk_fan_low(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "w_pair_potential")]
    pub pair_potential: f64,
    #[serde(default = "w_sequence_potential")]
    pub sequence_potential: f64,
    #[serde(default = "w_honor_value")]
    pub honor_value: f64,
    #[serde(default = "w_suit_penalty")]
    pub suit_penalty: f64,
    #[serde(default = "w_safety_weight")]
    pub safety_weight: f64,
    #[serde(default = "w_completed_meld")]
    pub completed_meld: f64,
    #[serde(default = "w_pair")]
    pub pair: f64,
    #[serde(default = "w_tatsu")]
    pub tatsu: f64,
    #[serde(default = "w_isolated_penalty")]
    pub isolated_penalty: f64,
    #[serde(default = "w_isolated_reduction")]
    pub isolated_reduction: f64,
    #[serde(default = "w_structure_clarity")]
    pub structure_clarity: f64,
    #[serde(default = "w_completion_improvement")]
    pub completion_improvement: f64,
}

fn w_pair_potential() -> f64 {
    3.0
}
fn w_sequence_potential() -> f64 {
    0.5
}
fn w_honor_value() -> f64 {
    0.8
}
fn w_suit_penalty() -> f64 {
    2.0
}
fn w_safety_weight() -> f64 {
    0.3
}
fn w_completed_meld() -> f64 {
    3.0
}
fn w_pair() -> f64 {
    1.5
}
fn w_tatsu() -> f64 {
    0.8
}
fn w_isolated_penalty() -> f64 {
    -0.5
}
fn w_isolated_reduction() -> f64 {
    2.0
}
fn w_structure_clarity() -> f64 {
    1.5
}
fn w_completion_improvement() -> f64 {
    1.0
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            pair_potential: w_pair_potential(),
            sequence_potential: w_sequence_potential(),
            honor_value: w_honor_value(),
            suit_penalty: w_suit_penalty(),
            safety_weight: w_safety_weight(),
            completed_meld: w_completed_meld(),
            pair: w_pair(),
            tatsu: w_tatsu(),
            isolated_penalty: w_isolated_penalty(),
            isolated_reduction: w_isolated_reduction(),
            structure_clarity: w_structure_clarity(),
            completion_improvement: w_completion_improvement(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_fills_in_defaults() {
        let yaml = "trials: 10\nrounds_per_trial: 5\n";
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.trials, 10);
        assert_eq!(cfg.fan_min, 1);
        assert_eq!(cfg.strategy_thresholds.tempo_defender.high_risk_threshold, 0.5);
    }

    #[test]
    fn missing_required_key_is_a_parse_error() {
        let yaml = "rounds_per_trial: 5\n";
        let result: Result<Config, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }
}
