//! What-if simulator.
//!
//! A linear placeholder model: extra budget, extra time, and extra people each
//! add a fixed number of health points. Inputs are not bounded here; the caller
//! keeps them within its own slider ranges.

use serde::{Deserialize, Serialize};

use crate::engine::{clamp_percent, round_half_up};

pub const BUDGET_FACTOR: f64 = 0.2;
pub const TIME_FACTOR: f64 = 0.15;
pub const PEOPLE_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    /// Extra budget, percent of the current budget.
    pub extra_budget_pct: f64,
    /// Extra time, percent of the current timeline.
    pub extra_time_pct: f64,
    pub extra_people: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub current_health: f64,
    pub simulated_health: f64,
    pub delta: f64,
}

pub fn improvement(input: &SimulationInput) -> f64 {
    input.extra_budget_pct * BUDGET_FACTOR
        + input.extra_time_pct * TIME_FACTOR
        + input.extra_people * PEOPLE_FACTOR
}

/// `simulated = min(100, round(baseline + improvement))`,
/// `delta = simulated - baseline`. The baseline is clamped to `[0, 100]` first.
pub fn simulate(baseline: f64, input: &SimulationInput) -> SimulationResult {
    let baseline = clamp_percent(baseline);
    let simulated_health = round_half_up(baseline + improvement(input)).min(100.0);
    SimulationResult {
        current_health: baseline,
        simulated_health,
        delta: simulated_health - baseline,
    }
}
