//! Per-region resource history for the charts.
//!
//! The series are built from fixed per-region base values, fixed shocks and
//! step drops, plus a little jitter for visual texture. The jitter comes
//! from a ChaCha8 stream seeded from `(seed, region)`, so a given seed
//! always reproduces the same chart. Nothing here feeds back into the
//! resolver.

use crate::model::Cycle;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Number of samples in a history.
pub const HISTORY_LEN: usize = 60;

/// Sample index at which the monsoon failure hits.
pub const MONSOON_FAILURE_INDEX: usize = 42;

/// Jitter amplitude: samples move by at most half of this either way.
const JITTER_SPAN: f64 = 10.0;

/// One resource sample. All fields are percentages in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub cycle: Cycle,
    pub groundwater: f64,
    pub reservoir: f64,
    pub crop_yield: f64,
    pub power_deficit: f64,
    pub debt_ratio: f64,
}

#[derive(Debug, Clone, Copy)]
struct BaseLevels {
    groundwater: f64,
    reservoir: f64,
    crop_yield: f64,
    power_deficit: f64,
    debt_ratio: f64,
}

const DEFAULT_BASE: BaseLevels = BaseLevels {
    groundwater: 55.0,
    reservoir: 50.0,
    crop_yield: 65.0,
    power_deficit: 25.0,
    debt_ratio: 30.0,
};

fn base_levels(state_id: &str) -> BaseLevels {
    let (groundwater, reservoir, crop_yield, power_deficit, debt_ratio) = match state_id {
        "RJ" => (45.0, 35.0, 55.0, 25.0, 32.0),
        "KA" => (40.0, 30.0, 60.0, 30.0, 28.0),
        "TN" => (35.0, 25.0, 65.0, 35.0, 35.0),
        "MH" => (50.0, 40.0, 70.0, 28.0, 38.0),
        "PB" => (75.0, 80.0, 90.0, 15.0, 42.0),
        _ => return DEFAULT_BASE,
    };
    BaseLevels {
        groundwater,
        reservoir,
        crop_yield,
        power_deficit,
        debt_ratio,
    }
}

/// One-off reservoir shock at a sample index.
fn reservoir_shock(index: usize) -> f64 {
    match index {
        35 => -10.0,
        MONSOON_FAILURE_INDEX => -20.0,
        50 => -15.0,
        _ => 0.0,
    }
}

/// Derives the jitter stream seed for a region.
fn stream_seed(seed: u64, state_id: &str) -> u64 {
    state_id
        .bytes()
        .fold(seed.wrapping_mul(0x9e3779b97f4a7c15), |acc, b| {
            (acc ^ b as u64).wrapping_mul(0x100000001b3)
        })
}

fn percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Builds the history for `state_id`. Unknown regions use default base levels.
pub fn resource_history(state_id: &str, seed: u64) -> Vec<ResourceSample> {
    let base = base_levels(state_id);
    let mut rng = ChaCha8Rng::seed_from_u64(stream_seed(seed, state_id));
    let mut jitter = move || (rng.gen::<f64>() - 0.5) * JITTER_SPAN;

    (0..HISTORY_LEN)
        .map(|i| {
            let step = |after: usize, delta: f64| if i > after { delta } else { 0.0 };

            ResourceSample {
                cycle: (i + 1) as Cycle,
                groundwater: percent(base.groundwater + jitter() + step(42, -15.0)),
                reservoir: percent(base.reservoir + jitter() + reservoir_shock(i) + step(42, -20.0)),
                crop_yield: percent(base.crop_yield + jitter() + step(44, -25.0)),
                power_deficit: percent(base.power_deficit + jitter() + step(45, 20.0)),
                debt_ratio: percent(base.debt_ratio + jitter() * 0.5 + step(48, 10.0)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_series() {
        assert_eq!(resource_history("RJ", 7), resource_history("RJ", 7));
    }

    #[test]
    fn test_seed_and_region_change_jitter() {
        assert_ne!(resource_history("RJ", 7), resource_history("RJ", 8));
        assert_ne!(resource_history("RJ", 7), resource_history("KA", 7));
    }

    #[test]
    fn test_length_and_cycles() {
        let history = resource_history("TN", 1);
        assert_eq!(history.len(), HISTORY_LEN);
        assert_eq!(history[0].cycle, 1);
        assert_eq!(history[HISTORY_LEN - 1].cycle, 60);
    }

    #[test]
    fn test_values_are_percentages() {
        for state in ["RJ", "KA", "TN", "MH", "PB", "GA"] {
            for sample in resource_history(state, 99) {
                for v in [
                    sample.groundwater,
                    sample.reservoir,
                    sample.crop_yield,
                    sample.power_deficit,
                    sample.debt_ratio,
                ] {
                    assert!((0.0..=100.0).contains(&v));
                }
            }
        }
    }

    #[test]
    fn test_monsoon_failure_drops_reservoir() {
        // Jitter is at most ±5 around the base of 80
        let history = resource_history("PB", 3);
        let before = history[40].reservoir;
        assert!(history[MONSOON_FAILURE_INDEX].reservoir <= before - 10.0);
        assert!(history[43].reservoir <= before - 10.0);
    }
}
