//! Boundary validation for records arriving from a data source.
//!
//! Sources hand back loosely-typed [`ProjectRecord`]s and [`RiskRecord`]s in
//! which every field may be absent. Converting them into [`Project`] / [`Risk`]
//! is where missing required fields are reported. Out-of-range numbers are
//! never rejected here; the engine clamps them where it uses them.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::scoring::derive_severity;
use crate::models::{Project, ProjectStatus, Risk, RiskStatus, Severity, StrategicPriority};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{kind} record{} is missing required field `{field}`", id_suffix(.id))]
    MissingField {
        kind: RecordKind,
        id: Option<String>,
        field: &'static str,
    },
}

fn id_suffix(id: &Option<String>) -> String {
    match id {
        Some(id) => format!(" '{}'", id),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Project,
    Risk,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Project => write!(f, "project"),
            RecordKind::Risk => write!(f, "risk"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub health_score: Option<f64>,
    pub status: Option<ProjectStatus>,
    pub strategic_priority: Option<StrategicPriority>,
    pub budget: Option<f64>,
    pub budget_used: Option<f64>,
    pub timeline: Option<f64>,
    pub timeline_used: Option<f64>,
    pub delay_days: Option<f64>,
    pub cost_overrun: Option<f64>,
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRecord {
    pub id: Option<String>,
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub severity: Option<Severity>,
    pub probability: Option<f64>,
    pub impact: Option<f64>,
    pub status: Option<RiskStatus>,
    pub mitigation_plan: Option<String>,
}

impl TryFrom<ProjectRecord> for Project {
    type Error = ValidationError;

    fn try_from(record: ProjectRecord) -> Result<Self, Self::Error> {
        let id = non_empty(record.id).ok_or(ValidationError::MissingField {
            kind: RecordKind::Project,
            id: None,
            field: "id",
        })?;
        let health_score = record.health_score.ok_or_else(|| ValidationError::MissingField {
            kind: RecordKind::Project,
            id: Some(id.clone()),
            field: "healthScore",
        })?;

        let strategic_priority = record.strategic_priority.unwrap_or_else(|| {
            warn!(project = %id, "no strategic priority supplied, assuming MEDIUM");
            StrategicPriority::Medium
        });

        let project = Project {
            name: record.name.unwrap_or_else(|| id.clone()),
            description: record.description.unwrap_or_default(),
            health_score,
            strategic_priority,
            budget: non_negative(record.budget),
            budget_used: non_negative(record.budget_used),
            timeline: non_negative(record.timeline),
            timeline_used: non_negative(record.timeline_used),
            delay_days: non_negative(record.delay_days),
            cost_overrun: non_negative(record.cost_overrun),
            recommendation: record.recommendation.unwrap_or_default(),
            id,
        };

        if let Some(supplied) = record.status {
            let derived = project.status();
            if supplied != derived {
                debug!(
                    project = %project.id,
                    %supplied,
                    %derived,
                    "supplied status disagrees with health score; using derived status"
                );
            }
        }

        Ok(project)
    }
}

impl TryFrom<RiskRecord> for Risk {
    type Error = ValidationError;

    fn try_from(record: RiskRecord) -> Result<Self, Self::Error> {
        let id = non_empty(record.id).ok_or(ValidationError::MissingField {
            kind: RecordKind::Risk,
            id: None,
            field: "id",
        })?;
        let missing = |field: &'static str| ValidationError::MissingField {
            kind: RecordKind::Risk,
            id: Some(id.clone()),
            field,
        };

        let project_id = non_empty(record.project_id).ok_or_else(|| missing("projectId"))?;
        let probability = record.probability.ok_or_else(|| missing("probability"))?;
        let impact = record.impact.ok_or_else(|| missing("impact"))?;

        // Supplied severity wins; it is only derived when absent.
        let severity = record
            .severity
            .unwrap_or_else(|| derive_severity(probability, impact));

        Ok(Risk {
            title: record.title.unwrap_or_default(),
            project_id,
            severity,
            probability,
            impact,
            status: record.status.unwrap_or_default(),
            mitigation_plan: record.mitigation_plan.unwrap_or_default(),
            id,
        })
    }
}

/// Validate a batch of project records, failing on the first bad one.
pub fn validate_projects(records: Vec<ProjectRecord>) -> Result<Vec<Project>, ValidationError> {
    records.into_iter().map(Project::try_from).collect()
}

/// Validate a batch of risk records, failing on the first bad one.
pub fn validate_risks(records: Vec<RiskRecord>) -> Result<Vec<Risk>, ValidationError> {
    records.into_iter().map(Risk::try_from).collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn non_negative(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0).max(0.0)
}
