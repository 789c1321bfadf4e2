//! Composite scoring and deterministic portfolio ranking.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::engine::clamp_percent;
use crate::engine::scoring::{risk_score, value_score};
use crate::models::{Project, ProjectStatus, Risk, StrategicPriority};

/// Coefficients of the composite score:
///
/// ```text
/// composite = value_weight * value - risk_weight * risk + health_weight * health
/// ```
///
/// All three must be non-negative so that higher value, higher health, and
/// lower risk never lower a project's rank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    #[serde(default = "default_value_weight")]
    pub value_weight: f64,
    #[serde(default = "default_risk_weight")]
    pub risk_weight: f64,
    #[serde(default = "default_health_weight")]
    pub health_weight: f64,
}

fn default_value_weight() -> f64 {
    1.0
}

fn default_risk_weight() -> f64 {
    1.0
}

fn default_health_weight() -> f64 {
    0.2
}

impl Default for RankingWeights {
    fn default() -> Self {
        RankingWeights {
            value_weight: default_value_weight(),
            risk_weight: default_risk_weight(),
            health_weight: default_health_weight(),
        }
    }
}

impl RankingWeights {
    /// Names of any weights that are negative or not finite.
    pub fn invalid_weights(&self) -> Vec<&'static str> {
        [
            ("value_weight", self.value_weight),
            ("risk_weight", self.risk_weight),
            ("health_weight", self.health_weight),
        ]
        .into_iter()
        .filter(|(_, w)| !w.is_finite() || *w < 0.0)
        .map(|(name, _)| name)
        .collect()
    }

    pub fn composite(&self, health_score: f64, risk_score: u32, value_score: u32) -> f64 {
        self.value_weight * value_score as f64 - self.risk_weight * risk_score as f64
            + self.health_weight * clamp_percent(health_score)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedProject {
    pub rank: usize,
    pub project_id: String,
    pub project_name: String,
    pub status: ProjectStatus,
    pub strategic_priority: StrategicPriority,
    pub health_score: f64,
    pub risk_score: u32,
    pub value_score: u32,
    pub composite_score: f64,
    pub recommendation: String,
}

impl RankedProject {
    /// Rank 1 gets a distinguishing marker in reports.
    pub fn is_leader(&self) -> bool {
        self.rank == 1
    }
}

/// Output ordering of a ranking. Re-sorting never changes any row's scores
/// or rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Rank,
    Health,
    Risk,
    Value,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Rank => write!(f, "rank"),
            SortKey::Health => write!(f, "health"),
            SortKey::Risk => write!(f, "risk"),
            SortKey::Value => write!(f, "value"),
        }
    }
}

/// Rank every project by composite score.
///
/// Each project's risk score is computed from the entries of `risks` whose
/// `project_id` matches. The result is ordered by rank: composite score
/// descending, ties broken by ascending project id.
pub fn rank(projects: &[Project], risks: &[Risk], weights: &RankingWeights) -> Vec<RankedProject> {
    let mut rows: Vec<RankedProject> = projects
        .iter()
        .map(|project| {
            let own_risks: Vec<Risk> = risks
                .iter()
                .filter(|r| r.project_id == project.id)
                .cloned()
                .collect();
            let risk = risk_score(&own_risks);
            let value = value_score(project.health_score, project.strategic_priority);

            RankedProject {
                rank: 0,
                project_id: project.id.clone(),
                project_name: project.name.clone(),
                status: project.status(),
                strategic_priority: project.strategic_priority,
                health_score: project.health_score,
                risk_score: risk,
                value_score: value,
                composite_score: weights.composite(project.health_score, risk, value),
                recommendation: project.recommendation.clone(),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        composite_key(b.composite_score)
            .cmp(&composite_key(a.composite_score))
            .then_with(|| a.project_id.cmp(&b.project_id))
    });

    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i + 1;
    }

    rows
}

/// Composite score quantized to millionths, so scores that are equal in
/// exact arithmetic compare equal despite float rounding.
fn composite_key(score: f64) -> i64 {
    (score * 1e6).round() as i64
}

/// Reorder ranked rows by `key`. The sort is stable, so rows that tie on the
/// key keep their relative rank order.
pub fn sort_ranked(rows: &mut [RankedProject], key: SortKey) {
    rows.sort_by(|a, b| compare(a, b, key));
}

fn compare(a: &RankedProject, b: &RankedProject, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Rank => a.rank.cmp(&b.rank),
        SortKey::Health => b.health_score.total_cmp(&a.health_score),
        SortKey::Risk => a.risk_score.cmp(&b.risk_score),
        SortKey::Value => b.value_score.cmp(&a.value_score),
    };
    primary.then_with(|| a.rank.cmp(&b.rank))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskStatus, Severity};

    fn project(id: &str, health: f64, priority: StrategicPriority) -> Project {
        Project {
            id: id.to_string(),
            name: format!("Project {}", id),
            description: String::new(),
            health_score: health,
            strategic_priority: priority,
            budget: 100_000.0,
            budget_used: 50_000.0,
            timeline: 100.0,
            timeline_used: 50.0,
            delay_days: 0.0,
            cost_overrun: 0.0,
            recommendation: String::new(),
        }
    }

    fn risk(project_id: &str, probability: f64, impact: f64) -> Risk {
        Risk {
            id: format!("R-{}", project_id),
            project_id: project_id.to_string(),
            title: String::new(),
            severity: Severity::Medium,
            probability,
            impact,
            status: RiskStatus::Open,
            mitigation_plan: String::new(),
        }
    }

    fn sample() -> (Vec<Project>, Vec<Risk>) {
        let projects = vec![
            project("P001", 92.0, StrategicPriority::Critical),
            project("P002", 88.0, StrategicPriority::High),
            project("P003", 85.0, StrategicPriority::High),
            project("P004", 68.0, StrategicPriority::Critical),
            project("P005", 72.0, StrategicPriority::Medium),
            project("P006", 45.0, StrategicPriority::Low),
        ];
        let risks = vec![
            risk("P001", 20.0, 15.0),
            risk("P002", 30.0, 25.0),
            risk("P003", 50.0, 40.0),
            risk("P004", 45.0, 50.0),
            risk("P006", 70.0, 80.0),
        ];
        (projects, risks)
    }

    #[test]
    fn test_rank_order() {
        let (projects, risks) = sample();
        let ranked = rank(&projects, &risks, &RankingWeights::default());
        let ids: Vec<&str> = ranked.iter().map(|r| r.project_id.as_str()).collect();
        // P001: 95 - 3 + 18.4; P002: 83 - 8 + 17.6; P003: 81 - 20 + 17;
        // P005: 63 - 0 + 14.4; P004: 81 - 23 + 13.6; P006: 37 - 56 + 9
        assert_eq!(ids, vec!["P001", "P002", "P003", "P005", "P004", "P006"]);
        assert_eq!(ranked[0].rank, 1);
        assert!(ranked[0].is_leader());
        assert!(!ranked[1].is_leader());
        assert_eq!(ranked[5].rank, 6);
    }

    #[test]
    fn test_rank_is_deterministic() {
        let (projects, risks) = sample();
        let weights = RankingWeights::default();
        let first: Vec<String> = rank(&projects, &risks, &weights)
            .into_iter()
            .map(|r| r.project_id)
            .collect();
        let second: Vec<String> = rank(&projects, &risks, &weights)
            .into_iter()
            .map(|r| r.project_id)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ties_break_by_id() {
        let projects = vec![
            project("B", 70.0, StrategicPriority::High),
            project("A", 70.0, StrategicPriority::High),
            project("C", 70.0, StrategicPriority::High),
        ];
        let ranked = rank(&projects, &[], &RankingWeights::default());
        let ids: Vec<&str> = ranked.iter().map(|r| r.project_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_equal_composites_with_float_noise_break_by_id() {
        // A: 77 - 26 + 12.4, B: 79 - 32 + 16.4; both 63.4 exactly, but B's
        // f64 sum lands one ulp above A's.
        let projects = vec![
            project("B", 82.0, StrategicPriority::High),
            project("A", 62.0, StrategicPriority::Critical),
        ];
        let risks = vec![risk("A", 26.0, 100.0), risk("B", 32.0, 100.0)];
        let ranked = rank(&projects, &risks, &RankingWeights::default());

        let ids: Vec<&str> = ranked.iter().map(|r| r.project_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(ranked[0].value_score, 77);
        assert_eq!(ranked[1].value_score, 79);
        assert!((ranked[0].composite_score - ranked[1].composite_score).abs() < 1e-9);
    }

    #[test]
    fn test_rank_is_monotonic_in_health_and_risk() {
        let projects = vec![
            project("LOW", 60.0, StrategicPriority::Medium),
            project("HIGH", 61.0, StrategicPriority::Medium),
        ];
        let ranked = rank(&projects, &[], &RankingWeights::default());
        assert_eq!(ranked[0].project_id, "HIGH");

        let projects = vec![
            project("RISKY", 70.0, StrategicPriority::Medium),
            project("SAFE", 70.0, StrategicPriority::Medium),
        ];
        let risks = vec![risk("RISKY", 50.0, 50.0)];
        let ranked = rank(&projects, &risks, &RankingWeights::default());
        assert_eq!(ranked[0].project_id, "SAFE");
    }

    #[test]
    fn test_sort_keys_preserve_scores() {
        let (projects, risks) = sample();
        let ranked = rank(&projects, &risks, &RankingWeights::default());

        for key in [SortKey::Health, SortKey::Risk, SortKey::Value, SortKey::Rank] {
            let mut sorted = ranked.clone();
            sort_ranked(&mut sorted, key);
            assert_eq!(sorted.len(), ranked.len());
            for row in &sorted {
                let original = ranked.iter().find(|r| r.project_id == row.project_id).unwrap();
                assert_eq!(row.rank, original.rank);
                assert_eq!(row.risk_score, original.risk_score);
                assert_eq!(row.value_score, original.value_score);
            }
        }
    }

    #[test]
    fn test_sort_by_each_key() {
        let (projects, risks) = sample();
        let ranked = rank(&projects, &risks, &RankingWeights::default());

        let mut by_health = ranked.clone();
        sort_ranked(&mut by_health, SortKey::Health);
        assert_eq!(by_health[0].project_id, "P001");
        assert_eq!(by_health[5].project_id, "P006");

        let mut by_risk = ranked.clone();
        sort_ranked(&mut by_risk, SortKey::Risk);
        assert_eq!(by_risk[0].project_id, "P005");
        assert_eq!(by_risk[5].project_id, "P006");

        let mut by_value = ranked.clone();
        sort_ranked(&mut by_value, SortKey::Value);
        assert_eq!(by_value[0].project_id, "P001");
        // P003 and P004 tie on value 81; rank order decides
        assert_eq!(by_value[2].project_id, "P003");
        assert_eq!(by_value[3].project_id, "P004");

        let mut back = by_value.clone();
        sort_ranked(&mut back, SortKey::Rank);
        let ids: Vec<&str> = back.iter().map(|r| r.project_id.as_str()).collect();
        let expected: Vec<&str> = ranked.iter().map(|r| r.project_id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_invalid_weights() {
        let weights = RankingWeights {
            value_weight: 1.0,
            risk_weight: -0.5,
            health_weight: f64::NAN,
        };
        assert_eq!(weights.invalid_weights(), vec!["risk_weight", "health_weight"]);
        assert!(RankingWeights::default().invalid_weights().is_empty());
    }
}
