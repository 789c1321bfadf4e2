use serde::Serialize;

use crate::models::HealthTrendPoint;

/// Minimum health change, in points, before a trend counts as moving.
pub const TREND_TOLERANCE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Improving => write!(f, "improving"),
            TrendDirection::Stable => write!(f, "stable"),
            TrendDirection::Declining => write!(f, "declining"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub periods: usize,
    pub first: f64,
    pub last: f64,
    pub change: f64,
    pub direction: TrendDirection,
    pub max_budget_variance: f64,
}

/// Summarize a health history given oldest first. `None` for an empty history.
pub fn summarize_trend(points: &[HealthTrendPoint]) -> Option<TrendSummary> {
    let first = points.first()?.health_score;
    let last = points.last()?.health_score;
    let change = last - first;

    let direction = if change >= TREND_TOLERANCE {
        TrendDirection::Improving
    } else if change <= -TREND_TOLERANCE {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    let max_budget_variance = points
        .iter()
        .map(|p| p.budget_variance)
        .fold(f64::NEG_INFINITY, f64::max);

    Some(TrendSummary {
        periods: points.len(),
        first,
        last,
        change,
        direction,
        max_budget_variance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(scores: &[(f64, f64)]) -> Vec<HealthTrendPoint> {
        scores
            .iter()
            .enumerate()
            .map(|(i, (health, variance))| HealthTrendPoint {
                label: format!("M{}", i + 1),
                health_score: *health,
                budget_variance: *variance,
            })
            .collect()
    }

    #[test]
    fn test_declining_trend() {
        let points = series(&[(82.0, 2.0), (78.0, 3.0), (74.0, 5.0), (72.0, 6.0), (70.0, 7.0), (68.0, 7.0)]);
        let summary = summarize_trend(&points).unwrap();
        assert_eq!(summary.direction, TrendDirection::Declining);
        assert_eq!(summary.change, -14.0);
        assert_eq!(summary.periods, 6);
        assert_eq!(summary.max_budget_variance, 7.0);
    }

    #[test]
    fn test_stable_and_improving() {
        let stable = summarize_trend(&series(&[(70.0, 0.0), (72.0, 0.0)])).unwrap();
        assert_eq!(stable.direction, TrendDirection::Stable);

        let improving = summarize_trend(&series(&[(60.0, 0.0), (63.0, 0.0)])).unwrap();
        assert_eq!(improving.direction, TrendDirection::Improving);
    }

    #[test]
    fn test_empty_trend() {
        assert!(summarize_trend(&[]).is_none());
    }
}
