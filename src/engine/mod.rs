//! Portfolio scoring and ranking engine.
//!
//! Every function in this module tree is pure: it takes validated
//! [`Project`](crate::models::Project) / [`Risk`](crate::models::Risk) records
//! and returns freshly derived values. Out-of-range numeric inputs are clamped,
//! never rejected.
//!
//! - [`status`] — GREEN/YELLOW/RED classification and detail-view health tiers.
//! - [`heatmap`] — 4×4 probability/impact bucketing and cell severity.
//! - [`scoring`] — per-project risk score, strategic value score, risk bands.
//! - [`ranking`] — composite score, deterministic ranking, sort keys.
//! - [`portfolio`] — portfolio-wide aggregation and per-project usage metrics.
//! - [`simulation`] — the linear what-if health simulator.
//! - [`trend`] — health history summaries.

pub mod heatmap;
pub mod portfolio;
pub mod ranking;
pub mod scoring;
pub mod simulation;
pub mod status;
pub mod trend;

/// Round to the nearest integer with halves going up (`2.5 → 3`, `-2.5 → -2`).
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Clamp a score-like value into `[0, 100]`. `NaN` is treated as `0`.
pub(crate) fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4), 2.0);
        assert_eq!(round_half_up(100.5), 101.0);
        assert_eq!(round_half_up(-2.5), -2.0);
    }

    #[test]
    fn test_clamp_percent() {
        assert_eq!(clamp_percent(-5.0), 0.0);
        assert_eq!(clamp_percent(140.0), 100.0);
        assert_eq!(clamp_percent(f64::NAN), 0.0);
        assert_eq!(clamp_percent(42.0), 42.0);
    }
}
