use std::collections::HashMap;

use anyhow::Result;

use crate::engine::status::classify_status;
use crate::models::{
    Decision, DecisionKind, HealthTrendPoint, RiskStatus, Severity, StrategicPriority,
};
use crate::source::DataSource;
use crate::validation::{ProjectRecord, RiskRecord};

/// Built-in six-project sample portfolio, used when no other source is
/// configured.
pub struct DemoSource {
    projects: Vec<ProjectRecord>,
    risks: Vec<RiskRecord>,
    decisions: Vec<Decision>,
    trends: HashMap<String, Vec<HealthTrendPoint>>,
}

impl DemoSource {
    pub fn new() -> Self {
        DemoSource {
            projects: sample_projects(),
            risks: sample_risks(),
            decisions: sample_decisions(),
            trends: sample_trends(),
        }
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        DemoSource::new()
    }
}

impl DataSource for DemoSource {
    fn describe(&self) -> String {
        "built-in demo portfolio".to_string()
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>> {
        Ok(self.projects.clone())
    }

    async fn list_risks(&self, project_id: &str) -> Result<Vec<RiskRecord>> {
        Ok(self
            .risks
            .iter()
            .filter(|r| r.project_id.as_deref() == Some(project_id))
            .cloned()
            .collect())
    }

    async fn list_decisions(&self) -> Result<Vec<Decision>> {
        Ok(self.decisions.clone())
    }

    async fn health_trend(&self, project_id: &str) -> Result<Vec<HealthTrendPoint>> {
        Ok(self.trends.get(project_id).cloned().unwrap_or_default())
    }
}

#[allow(clippy::too_many_arguments)]
fn project(
    id: &str,
    name: &str,
    description: &str,
    health: f64,
    priority: StrategicPriority,
    (budget, budget_used): (f64, f64),
    (timeline, timeline_used): (f64, f64),
    (delay_days, cost_overrun): (f64, f64),
    recommendation: &str,
) -> ProjectRecord {
    ProjectRecord {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        description: Some(description.to_string()),
        health_score: Some(health),
        status: Some(classify_status(health)),
        strategic_priority: Some(priority),
        budget: Some(budget),
        budget_used: Some(budget_used),
        timeline: Some(timeline),
        timeline_used: Some(timeline_used),
        delay_days: Some(delay_days),
        cost_overrun: Some(cost_overrun),
        recommendation: Some(recommendation.to_string()),
    }
}

fn sample_projects() -> Vec<ProjectRecord> {
    use StrategicPriority::*;
    vec![
        project(
            "P001", "Cloud Migration Initiative",
            "Migrate legacy systems to cloud infrastructure",
            92.0, Critical, (500_000.0, 320_000.0), (180.0, 90.0), (0.0, 0.0),
            "Accelerate delivery",
        ),
        project(
            "P002", "Mobile App Development",
            "Build customer-facing mobile application",
            88.0, High, (450_000.0, 380_000.0), (150.0, 120.0), (5.0, 15_000.0),
            "Monitor budget closely",
        ),
        project(
            "P003", "Data Analytics Platform",
            "Build comprehensive analytics solution",
            85.0, High, (600_000.0, 450_000.0), (200.0, 140.0), (0.0, 0.0),
            "Continue as planned",
        ),
        project(
            "P004", "Security Enhancement",
            "Upgrade security infrastructure across all systems",
            68.0, Critical, (350_000.0, 280_000.0), (120.0, 100.0), (15.0, 25_000.0),
            "Increase resources and tighten scope control",
        ),
        project(
            "P005", "Customer Portal Redesign",
            "Modernize customer portal interface",
            72.0, Medium, (400_000.0, 350_000.0), (160.0, 135.0), (10.0, 20_000.0),
            "Monitor timeline",
        ),
        project(
            "P006", "Legacy System Decommission",
            "Retire old mainframe systems",
            45.0, Low, (300_000.0, 280_000.0), (100.0, 95.0), (30.0, 50_000.0),
            "Consider stopping",
        ),
    ]
}

fn risk(
    id: &str,
    project_id: &str,
    title: &str,
    severity: Severity,
    probability: f64,
    impact: f64,
) -> RiskRecord {
    RiskRecord {
        id: Some(id.to_string()),
        project_id: Some(project_id.to_string()),
        title: Some(title.to_string()),
        severity: Some(severity),
        probability: Some(probability),
        impact: Some(impact),
        status: Some(RiskStatus::Open),
        mitigation_plan: None,
    }
}

fn sample_risks() -> Vec<RiskRecord> {
    vec![
        risk("1", "P001", "Vendor delay", Severity::Low, 20.0, 15.0),
        risk("3", "P006", "System failure", Severity::High, 70.0, 80.0),
        risk("4", "P003", "Skill shortage", Severity::Medium, 50.0, 40.0),
        risk("5", "P002", "Scope creep", Severity::Low, 30.0, 25.0),
        risk("R1", "P004", "Vendor delay", Severity::High, 70.0, 60.0),
        risk("R2", "P004", "Skill shortage", Severity::Medium, 50.0, 40.0),
        risk("R3", "P004", "Scope creep", Severity::Medium, 45.0, 35.0),
    ]
}

fn decision(
    id: &str,
    project_id: &str,
    project_name: &str,
    kind: DecisionKind,
    reason: &str,
    decided_by: &str,
    date: &str,
) -> Decision {
    Decision {
        id: id.to_string(),
        project_id: project_id.to_string(),
        project_name: project_name.to_string(),
        decision: kind,
        reason: reason.to_string(),
        decided_by: decided_by.to_string(),
        date: date.to_string(),
    }
}

fn sample_decisions() -> Vec<Decision> {
    vec![
        decision(
            "D001", "P006", "Legacy System Decommission", DecisionKind::Stop,
            "Low strategic value and critical health score (45%).",
            "Portfolio Board", "2024-06-10",
        ),
        decision(
            "D002", "P004", "Security Enhancement", DecisionKind::Replan,
            "High strategic priority but rising risk and declining health trend.",
            "CTO Office", "2024-06-12",
        ),
        decision(
            "D003", "P002", "Mobile App Development", DecisionKind::Pause,
            "Budget overrun detected, waiting for revised cost baseline.",
            "Finance Committee", "2024-06-14",
        ),
        decision(
            "D004", "P001", "Cloud Migration Initiative", DecisionKind::Continue,
            "High strategic value and excellent health score (92%).",
            "Executive Board", "2024-06-15",
        ),
    ]
}

fn sample_trends() -> HashMap<String, Vec<HealthTrendPoint>> {
    let points: Vec<HealthTrendPoint> = [
        ("Jan", 82.0, 2.0),
        ("Feb", 78.0, 3.0),
        ("Mar", 74.0, 5.0),
        ("Apr", 72.0, 6.0),
        ("May", 70.0, 7.0),
        ("Jun", 68.0, 7.0),
    ]
    .iter()
    .map(|(label, health, variance)| HealthTrendPoint {
        label: label.to_string(),
        health_score: *health,
        budget_variance: *variance,
    })
    .collect();

    HashMap::from([("P004".to_string(), points)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::portfolio::aggregate;
    use crate::engine::trend::TrendDirection;
    use crate::source::load_portfolio;

    #[tokio::test]
    async fn test_demo_portfolio_loads() {
        let portfolio = load_portfolio(&DemoSource::new(), true).await.unwrap();
        assert_eq!(portfolio.projects.len(), 6);
        assert_eq!(portfolio.risks.len(), 7);
        assert_eq!(portfolio.decisions.len(), 4);
        assert_eq!(portfolio.risks_for("P004").count(), 3);

        let overview = aggregate(&portfolio.projects);
        assert_eq!(overview.green_count, 3);
        assert_eq!(overview.yellow_count, 2);
        assert_eq!(overview.red_count, 1);
        assert_eq!(overview.average_health, 75);
        assert_eq!(overview.budget_at_risk, 300_000.0);
    }

    #[tokio::test]
    async fn test_demo_trend() {
        let source = DemoSource::new();
        let trend = source.health_trend("P004").await.unwrap();
        let summary = crate::engine::trend::summarize_trend(&trend).unwrap();
        assert_eq!(summary.direction, TrendDirection::Declining);
        assert!(source.health_trend("P001").await.unwrap().is_empty());
    }
}
