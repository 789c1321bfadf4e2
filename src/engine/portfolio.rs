//! Portfolio-wide aggregation and per-project detail metrics.

use serde::Serialize;

use crate::engine::scoring::{detail_risk_band, risk_score, value_score};
use crate::engine::status::{health_tier, HealthTier};
use crate::engine::trend::{summarize_trend, TrendSummary};
use crate::engine::{clamp_percent, round_half_up};
use crate::models::{HealthTrendPoint, Project, ProjectStatus, Risk, Severity, StrategicPriority};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioOverview {
    pub total_projects: usize,
    pub green_count: usize,
    pub yellow_count: usize,
    pub red_count: usize,
    pub average_health: u32,
    pub budget_at_risk: f64,
    /// RED projects only; YELLOW projects are not counted as at risk.
    pub projects_at_risk: usize,
    pub health_distribution: HealthDistribution,
}

/// Share of projects per status band, as whole percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HealthDistribution {
    pub green: u32,
    pub yellow: u32,
    pub red: u32,
}

/// Fold every project into a [`PortfolioOverview`]. An empty slice yields all
/// zeros.
pub fn aggregate(projects: &[Project]) -> PortfolioOverview {
    let total = projects.len();
    let count = |status: ProjectStatus| projects.iter().filter(|p| p.status() == status).count();

    let green_count = count(ProjectStatus::Green);
    let yellow_count = count(ProjectStatus::Yellow);
    let red_count = count(ProjectStatus::Red);

    let average_health = if total == 0 {
        0
    } else {
        let sum: f64 = projects.iter().map(|p| clamp_percent(p.health_score)).sum();
        round_half_up(sum / total as f64) as u32
    };

    let budget_at_risk = projects
        .iter()
        .filter(|p| p.status() == ProjectStatus::Red)
        .map(|p| p.budget)
        .sum();

    PortfolioOverview {
        total_projects: total,
        green_count,
        yellow_count,
        red_count,
        average_health,
        budget_at_risk,
        projects_at_risk: red_count,
        health_distribution: HealthDistribution {
            green: share(green_count, total),
            yellow: share(yellow_count, total),
            red: share(red_count, total),
        },
    }
}

fn share(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    round_half_up(count as f64 / total as f64 * 100.0) as u32
}

/// `round(part / whole * 100)`, or `0` when `whole` is zero. Not capped at
/// 100 so overruns stay visible.
pub fn usage_percent(part: f64, whole: f64) -> u32 {
    if whole <= 0.0 || !whole.is_finite() || !part.is_finite() {
        return 0;
    }
    round_half_up((part / whole * 100.0).max(0.0)) as u32
}

/// One line of the project list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRow {
    pub project_id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub strategic_priority: StrategicPriority,
    pub health_score: f64,
    pub budget_usage_pct: u32,
    pub timeline_usage_pct: u32,
}

/// Case-insensitive substring match on id or name. A blank term matches
/// every project.
pub fn matches_search(project: &Project, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty()
        || project.id.to_lowercase().contains(&term)
        || project.name.to_lowercase().contains(&term)
}

/// Project list rows in input order, optionally filtered by [`matches_search`].
pub fn project_rows(projects: &[Project], search: Option<&str>) -> Vec<ProjectRow> {
    projects
        .iter()
        .filter(|p| search.map_or(true, |term| matches_search(p, term)))
        .map(|p| ProjectRow {
            project_id: p.id.clone(),
            name: p.name.clone(),
            status: p.status(),
            strategic_priority: p.strategic_priority,
            health_score: p.health_score,
            budget_usage_pct: usage_percent(p.budget_used, p.budget),
            timeline_usage_pct: usage_percent(p.timeline_used, p.timeline),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub project: Project,
    pub status: ProjectStatus,
    pub health_tier: HealthTier,
    pub risk_score: u32,
    pub risk_band: Severity,
    pub value_score: u32,
    pub budget_usage_pct: u32,
    pub timeline_usage_pct: u32,
    pub delay_pct: u32,
    pub cost_overrun_pct: u32,
    pub open_risks: usize,
    pub risks: Vec<Risk>,
    pub trend: Option<TrendSummary>,
}

/// Everything the detail view shows for one project. `risks` should be the
/// project's own risks; `trend` its health history, oldest first.
pub fn project_detail(project: &Project, risks: &[Risk], trend: &[HealthTrendPoint]) -> ProjectDetail {
    let risk = risk_score(risks);

    ProjectDetail {
        status: project.status(),
        health_tier: health_tier(project.health_score),
        risk_score: risk,
        risk_band: detail_risk_band(risk),
        value_score: value_score(project.health_score, project.strategic_priority),
        budget_usage_pct: usage_percent(project.budget_used, project.budget),
        timeline_usage_pct: usage_percent(project.timeline_used, project.timeline),
        delay_pct: usage_percent(project.delay_days, project.timeline),
        cost_overrun_pct: usage_percent(project.cost_overrun, project.budget),
        open_risks: risks.iter().filter(|r| r.is_open()).count(),
        risks: risks.to_vec(),
        trend: summarize_trend(trend),
        project: project.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskStatus;

    fn project(id: &str, health: f64, budget: f64) -> Project {
        Project {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            health_score: health,
            strategic_priority: StrategicPriority::Medium,
            budget,
            budget_used: 0.0,
            timeline: 0.0,
            timeline_used: 0.0,
            delay_days: 0.0,
            cost_overrun: 0.0,
            recommendation: String::new(),
        }
    }

    #[test]
    fn test_aggregate_empty() {
        let overview = aggregate(&[]);
        assert_eq!(overview.total_projects, 0);
        assert_eq!(overview.average_health, 0);
        assert_eq!(overview.green_count, 0);
        assert_eq!(overview.yellow_count, 0);
        assert_eq!(overview.red_count, 0);
        assert_eq!(overview.budget_at_risk, 0.0);
        assert_eq!(overview.projects_at_risk, 0);
        assert_eq!(overview.health_distribution, HealthDistribution::default());
    }

    #[test]
    fn test_aggregate_six_projects() {
        let projects: Vec<Project> = [92.0, 88.0, 85.0, 68.0, 72.0, 45.0]
            .iter()
            .enumerate()
            .map(|(i, h)| project(&format!("P00{}", i + 1), *h, 100_000.0 * (i + 1) as f64))
            .collect();

        let overview = aggregate(&projects);
        assert_eq!(overview.total_projects, 6);
        assert_eq!(overview.green_count, 3);
        assert_eq!(overview.yellow_count, 2);
        assert_eq!(overview.red_count, 1);
        assert_eq!(overview.average_health, 75);
        assert_eq!(overview.projects_at_risk, 1);
        // Only P006 is RED
        assert_eq!(overview.budget_at_risk, 600_000.0);
        assert_eq!(
            overview.health_distribution,
            HealthDistribution { green: 50, yellow: 33, red: 17 }
        );
    }

    #[test]
    fn test_aggregate_clamps_health_for_average() {
        let projects = vec![project("A", 150.0, 0.0), project("B", -50.0, 10.0)];
        let overview = aggregate(&projects);
        assert_eq!(overview.average_health, 50);
        assert_eq!(overview.budget_at_risk, 10.0);
    }

    #[test]
    fn test_usage_percent() {
        assert_eq!(usage_percent(280_000.0, 350_000.0), 80);
        assert_eq!(usage_percent(25_000.0, 350_000.0), 7);
        assert_eq!(usage_percent(15.0, 120.0), 13);
        assert_eq!(usage_percent(110.0, 100.0), 110);
        assert_eq!(usage_percent(10.0, 0.0), 0);
    }

    #[test]
    fn test_project_detail() {
        let mut p = project("P004", 68.0, 350_000.0);
        p.strategic_priority = StrategicPriority::Critical;
        p.budget_used = 280_000.0;
        p.timeline = 120.0;
        p.timeline_used = 100.0;
        p.delay_days = 15.0;
        p.cost_overrun = 25_000.0;

        let risk = |id: &str, probability, impact, status| Risk {
            id: id.to_string(),
            project_id: "P004".to_string(),
            title: String::new(),
            severity: Severity::Medium,
            probability,
            impact,
            status,
            mitigation_plan: String::new(),
        };
        let risks = vec![
            risk("R1", 70.0, 60.0, RiskStatus::Open),
            risk("R2", 50.0, 40.0, RiskStatus::Open),
            risk("R3", 45.0, 35.0, RiskStatus::Open),
            risk("R4", 90.0, 90.0, RiskStatus::Closed),
        ];

        let detail = project_detail(&p, &risks, &[]);
        assert_eq!(detail.status, ProjectStatus::Yellow);
        assert_eq!(detail.health_tier, HealthTier::Good);
        assert_eq!(detail.risk_score, 26);
        assert_eq!(detail.risk_band, Severity::Low);
        assert_eq!(detail.value_score, 81);
        assert_eq!(detail.budget_usage_pct, 80);
        assert_eq!(detail.timeline_usage_pct, 83);
        assert_eq!(detail.delay_pct, 13);
        assert_eq!(detail.cost_overrun_pct, 7);
        assert_eq!(detail.open_risks, 3);
        assert_eq!(detail.risks.len(), 4);
        assert!(detail.trend.is_none());
    }

    #[test]
    fn test_project_detail_uses_stricter_band() {
        let p = project("P002", 88.0, 0.0);
        let risks = vec![Risk {
            id: "R1".to_string(),
            project_id: "P002".to_string(),
            title: String::new(),
            severity: Severity::High,
            probability: 55.0,
            impact: 100.0,
            status: RiskStatus::Open,
            mitigation_plan: String::new(),
        }];

        let detail = project_detail(&p, &risks, &[]);
        assert_eq!(detail.risk_score, 55);
        assert_eq!(detail.risk_band, Severity::High);
    }

    #[test]
    fn test_project_rows_search_is_case_insensitive() {
        let mut erp = project("P001", 92.0, 500_000.0);
        erp.name = "ERP Migration".to_string();
        erp.budget_used = 450_000.0;
        erp.timeline = 180.0;
        erp.timeline_used = 165.0;
        let mut crm = project("P002", 45.0, 200_000.0);
        crm.name = "CRM Rollout".to_string();
        let projects = vec![erp, crm];

        let rows = project_rows(&projects, Some("erp"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].project_id, "P001");
        assert_eq!(rows[0].status, ProjectStatus::Green);
        assert_eq!(rows[0].budget_usage_pct, 90);
        assert_eq!(rows[0].timeline_usage_pct, 92);

        let ids: Vec<_> = project_rows(&projects, Some("p002"))
            .into_iter()
            .map(|r| r.project_id)
            .collect();
        assert_eq!(ids, ["P002"]);

        assert_eq!(project_rows(&projects, Some("  ")).len(), 2);
        assert_eq!(project_rows(&projects, None).len(), 2);
        assert!(project_rows(&projects, Some("billing")).is_empty());
    }
}
