use crate::engine::{clamp_percent, round_half_up};
use crate::models::{Risk, Severity, StrategicPriority};

/// Weight contributed by a strategic priority to the value score.
pub fn priority_weight(priority: StrategicPriority) -> f64 {
    match priority {
        StrategicPriority::Critical => 100.0,
        StrategicPriority::High => 75.0,
        StrategicPriority::Medium => 50.0,
        StrategicPriority::Low => 25.0,
    }
}

/// Risk exposure of a single risk: `probability * impact / 100`, both axes
/// clamped to `[0, 100]` first.
pub fn exposure(probability: f64, impact: f64) -> f64 {
    clamp_percent(probability) * clamp_percent(impact) / 100.0
}

/// Per-project risk score in `[0, 100]`.
///
/// Mean [`exposure`] over the *open* risks in `risks`, rounded to the nearest
/// integer. Mitigated and closed risks are ignored; no open risks scores `0`.
pub fn risk_score(risks: &[Risk]) -> u32 {
    let exposures: Vec<f64> = risks
        .iter()
        .filter(|r| r.is_open())
        .map(|r| exposure(r.probability, r.impact))
        .collect();

    if exposures.is_empty() {
        return 0;
    }

    let mean = exposures.iter().sum::<f64>() / exposures.len() as f64;
    round_half_up(clamp_percent(mean)) as u32
}

/// Strategic value in `[0, 100]`: `health * 0.6 + priority_weight * 0.4`.
pub fn value_score(health_score: f64, priority: StrategicPriority) -> u32 {
    let value = clamp_percent(health_score) * 0.6 + priority_weight(priority) * 0.4;
    clamp_percent(round_half_up(value)) as u32
}

/// Badge band for a risk score: `> 60` HIGH, `> 35` MEDIUM, otherwise LOW.
pub fn risk_band(score: u32) -> Severity {
    match score {
        s if s > 60 => Severity::High,
        s if s > 35 => Severity::Medium,
        _ => Severity::Low,
    }
}

/// Band shown on the project detail view: `> 50` HIGH, `> 30` MEDIUM,
/// otherwise LOW. Stricter than [`risk_band`], which badges ranking rows.
pub fn detail_risk_band(score: u32) -> Severity {
    match score {
        s if s > 50 => Severity::High,
        s if s > 30 => Severity::Medium,
        _ => Severity::Low,
    }
}

/// Severity for a risk record that arrived without one, from its exposure:
/// `< 15` LOW, `< 40` MEDIUM, `< 70` HIGH, otherwise CRITICAL.
pub fn derive_severity(probability: f64, impact: f64) -> Severity {
    match exposure(probability, impact) {
        e if e < 15.0 => Severity::Low,
        e if e < 40.0 => Severity::Medium,
        e if e < 70.0 => Severity::High,
        _ => Severity::Critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskStatus;

    fn risk(probability: f64, impact: f64, status: RiskStatus) -> Risk {
        Risk {
            id: "R".to_string(),
            project_id: "P001".to_string(),
            title: String::new(),
            severity: Severity::Medium,
            probability,
            impact,
            status,
            mitigation_plan: String::new(),
        }
    }

    #[test]
    fn test_risk_score_empty() {
        assert_eq!(risk_score(&[]), 0);
    }

    #[test]
    fn test_risk_score_max() {
        assert_eq!(risk_score(&[risk(100.0, 100.0, RiskStatus::Open)]), 100);
    }

    #[test]
    fn test_risk_score_mean_of_open_risks() {
        let risks = vec![
            risk(70.0, 60.0, RiskStatus::Open),      // 42
            risk(50.0, 40.0, RiskStatus::Open),      // 20
            risk(45.0, 35.0, RiskStatus::Open),      // 15.75
            risk(100.0, 100.0, RiskStatus::Closed),  // ignored
            risk(90.0, 90.0, RiskStatus::Mitigated), // ignored
        ];
        // (42 + 20 + 15.75) / 3 = 25.9
        assert_eq!(risk_score(&risks), 26);
    }

    #[test]
    fn test_risk_score_only_closed_is_zero() {
        assert_eq!(risk_score(&[risk(80.0, 80.0, RiskStatus::Closed)]), 0);
    }

    #[test]
    fn test_risk_score_clamps_axes() {
        assert_eq!(risk_score(&[risk(250.0, 100.0, RiskStatus::Open)]), 100);
        assert_eq!(risk_score(&[risk(-40.0, 100.0, RiskStatus::Open)]), 0);
    }

    #[test]
    fn test_value_score() {
        assert_eq!(value_score(100.0, StrategicPriority::Critical), 100);
        assert_eq!(value_score(0.0, StrategicPriority::Low), 10);
        // 68 * 0.6 + 100 * 0.4 = 80.8
        assert_eq!(value_score(68.0, StrategicPriority::Critical), 81);
        assert_eq!(value_score(140.0, StrategicPriority::Critical), 100);
    }

    #[test]
    fn test_risk_band() {
        assert_eq!(risk_band(75), Severity::High);
        assert_eq!(risk_band(60), Severity::Medium);
        assert_eq!(risk_band(36), Severity::Medium);
        assert_eq!(risk_band(35), Severity::Low);
    }

    #[test]
    fn test_detail_risk_band() {
        assert_eq!(detail_risk_band(51), Severity::High);
        assert_eq!(detail_risk_band(50), Severity::Medium);
        assert_eq!(detail_risk_band(31), Severity::Medium);
        assert_eq!(detail_risk_band(30), Severity::Low);
        // 55 badges MEDIUM in the ranking but HIGH on the detail view
        assert_eq!(risk_band(55), Severity::Medium);
        assert_eq!(detail_risk_band(55), Severity::High);
    }

    #[test]
    fn test_derive_severity_matches_dashboard_samples() {
        assert_eq!(derive_severity(20.0, 15.0), Severity::Low);
        assert_eq!(derive_severity(45.0, 50.0), Severity::Medium);
        assert_eq!(derive_severity(45.0, 35.0), Severity::Medium);
        assert_eq!(derive_severity(70.0, 60.0), Severity::High);
        assert_eq!(derive_severity(90.0, 90.0), Severity::Critical);
    }
}
