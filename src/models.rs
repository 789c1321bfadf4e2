use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A validated project snapshot as delivered by a data source.
///
/// `status` is not stored: it is always derived from `health_score` via
/// [`crate::engine::status::classify_status`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub health_score: f64,
    pub strategic_priority: StrategicPriority,
    pub budget: f64,
    pub budget_used: f64,
    pub timeline: f64,
    pub timeline_used: f64,
    pub delay_days: f64,
    pub cost_overrun: f64,
    pub recommendation: String,
}

impl Project {
    pub fn status(&self) -> ProjectStatus {
        crate::engine::status::classify_status(self.health_score)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub severity: Severity,
    pub probability: f64,
    pub impact: f64,
    pub status: RiskStatus,
    pub mitigation_plan: String,
}

impl Risk {
    pub fn is_open(&self) -> bool {
        self.status == RiskStatus::Open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Green,
    Yellow,
    Red,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Green => write!(f, "GREEN"),
            ProjectStatus::Yellow => write!(f, "YELLOW"),
            ProjectStatus::Red => write!(f, "RED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategicPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for StrategicPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategicPriority::Critical => write!(f, "CRITICAL"),
            StrategicPriority::High => write!(f, "HIGH"),
            StrategicPriority::Medium => write!(f, "MEDIUM"),
            StrategicPriority::Low => write!(f, "LOW"),
        }
    }
}

/// Ordinal risk classification. Variant order is the severity order, so
/// `Severity::Low < Severity::Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskStatus {
    #[default]
    Open,
    Mitigated,
    Closed,
}

impl std::fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskStatus::Open => write!(f, "open"),
            RiskStatus::Mitigated => write!(f, "mitigated"),
            RiskStatus::Closed => write!(f, "closed"),
        }
    }
}

/// A portfolio board decision recorded against a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub project_name: String,
    pub decision: DecisionKind,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub decided_by: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionKind {
    Continue,
    Pause,
    Stop,
    Replan,
}

impl std::fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionKind::Continue => write!(f, "CONTINUE"),
            DecisionKind::Pause => write!(f, "PAUSE"),
            DecisionKind::Stop => write!(f, "STOP"),
            DecisionKind::Replan => write!(f, "REPLAN"),
        }
    }
}

/// One period of a project's health history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthTrendPoint {
    #[serde(alias = "date")]
    pub label: String,
    pub health_score: f64,
    #[serde(default)]
    pub budget_variance: f64,
}

/// Validated snapshot of everything a data source returned.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub projects: Vec<Project>,
    pub risks: Vec<Risk>,
    pub decisions: Vec<Decision>,
    pub trends: HashMap<String, Vec<HealthTrendPoint>>,
}

impl Portfolio {
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn risks_for<'a>(&'a self, project_id: &'a str) -> impl Iterator<Item = &'a Risk> + 'a {
        self.risks.iter().filter(move |r| r.project_id == project_id)
    }

    pub fn open_risks(&self) -> Vec<Risk> {
        self.risks.iter().filter(|r| r.is_open()).cloned().collect()
    }

    pub fn decisions_for<'a>(&'a self, project_id: &'a str) -> impl Iterator<Item = &'a Decision> + 'a {
        self.decisions.iter().filter(move |d| d.project_id == project_id)
    }
}
