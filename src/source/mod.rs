//! Data sources that supply raw project, risk, decision, and trend records.
//!
//! - [`file`] — a JSON or TOML dataset on disk.
//! - [`http`] — the dashboard REST API, authenticated with a [`Session`](crate::session::Session).
//! - [`demo`] — the built-in sample portfolio.
//!
//! [`load_portfolio`] drives any source, validates what it returns, and hands
//! back a [`Portfolio`] snapshot for the engine.

use std::collections::HashMap;

use anyhow::{Context, Result};
use futures::future::{join, join_all};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::models::{Decision, HealthTrendPoint, Portfolio};
use crate::validation::{validate_projects, validate_risks, ProjectRecord, RiskRecord};

pub mod demo;
pub mod file;
pub mod http;

/// Number of projects whose risks and trends are fetched concurrently.
const BATCH_SIZE: usize = 25;

#[allow(async_fn_in_trait)]
pub trait DataSource {
    /// Short human-readable description, used in logs and report headers.
    fn describe(&self) -> String;

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>>;

    async fn list_risks(&self, project_id: &str) -> Result<Vec<RiskRecord>>;

    async fn list_decisions(&self) -> Result<Vec<Decision>> {
        Ok(Vec::new())
    }

    async fn health_trend(&self, _project_id: &str) -> Result<Vec<HealthTrendPoint>> {
        Ok(Vec::new())
    }
}

/// Fetch everything from `source` and validate it.
///
/// Projects and risks are required: a fetch failure or a record missing a
/// required field aborts the load. Decisions and trends are optional and only
/// logged when they fail.
pub async fn load_portfolio<S: DataSource>(source: &S, quiet: bool) -> Result<Portfolio> {
    info!(source = %source.describe(), "loading portfolio");

    let project_records = source
        .list_projects()
        .await
        .with_context(|| format!("Failed to list projects from {}", source.describe()))?;
    let projects = validate_projects(project_records)?;
    debug!(count = projects.len(), "projects validated");

    let pb = if !quiet && !projects.is_empty() {
        let pb = ProgressBar::new(projects.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut risk_records: Vec<RiskRecord> = Vec::new();
    let mut trends: HashMap<String, Vec<HealthTrendPoint>> = HashMap::new();

    for batch in projects.chunks(BATCH_SIZE) {
        let futures: Vec<_> = batch
            .iter()
            .map(|project| join(source.list_risks(&project.id), source.health_trend(&project.id)))
            .collect();

        let results = join_all(futures).await;

        for (project, (risks, trend)) in batch.iter().zip(results) {
            let risks = risks
                .with_context(|| format!("Failed to list risks for project {}", project.id))?;
            risk_records.extend(risks);

            match trend {
                Ok(points) if !points.is_empty() => {
                    trends.insert(project.id.clone(), points);
                }
                Ok(_) => {}
                Err(err) => warn!(project = %project.id, error = %err, "health trend unavailable"),
            }

            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    let risks = validate_risks(risk_records)?;
    debug!(count = risks.len(), "risks validated");

    let decisions = match source.list_decisions().await {
        Ok(decisions) => decisions,
        Err(err) => {
            warn!(error = %err, "decision log unavailable");
            Vec::new()
        }
    };

    Ok(Portfolio {
        projects,
        risks,
        decisions,
        trends,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    struct StubSource {
        projects: Vec<ProjectRecord>,
        risks: Vec<RiskRecord>,
        fail_trends: bool,
    }

    impl DataSource for StubSource {
        fn describe(&self) -> String {
            "stub".to_string()
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

        async fn health_trend(&self, _project_id: &str) -> Result<Vec<HealthTrendPoint>> {
            if self.fail_trends {
                anyhow::bail!("no trend endpoint");
            }
            Ok(Vec::new())
        }
    }

    fn project(id: &str, health: Option<f64>) -> ProjectRecord {
        ProjectRecord {
            id: Some(id.to_string()),
            health_score: health,
            ..Default::default()
        }
    }

    fn risk(id: &str, project_id: &str, impact: Option<f64>) -> RiskRecord {
        RiskRecord {
            id: Some(id.to_string()),
            project_id: Some(project_id.to_string()),
            probability: Some(50.0),
            impact,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_load_portfolio() {
        let source = StubSource {
            projects: vec![project("P001", Some(90.0)), project("P002", Some(55.0))],
            risks: vec![
                risk("R1", "P001", Some(20.0)),
                risk("R2", "P002", Some(80.0)),
                risk("R3", "P404", Some(80.0)),
            ],
            fail_trends: true,
        };
        let portfolio = load_portfolio(&source, true).await.unwrap();
        assert_eq!(portfolio.projects.len(), 2);
        // Risks of unknown projects are never requested
        assert_eq!(portfolio.risks.len(), 2);
        assert!(portfolio.trends.is_empty());
        assert!(portfolio.decisions.is_empty());
    }

    #[tokio::test]
    async fn test_load_portfolio_rejects_invalid_project() {
        let source = StubSource {
            projects: vec![project("P001", None)],
            risks: Vec::new(),
            fail_trends: false,
        };
        let err = load_portfolio(&source, true).await.unwrap_err();
        let validation = err.downcast_ref::<ValidationError>().unwrap();
        assert!(matches!(
            validation,
            ValidationError::MissingField { field: "healthScore", .. }
        ));
    }

    #[tokio::test]
    async fn test_load_portfolio_rejects_invalid_risk() {
        let source = StubSource {
            projects: vec![project("P001", Some(70.0))],
            risks: vec![risk("R1", "P001", None)],
            fail_trends: false,
        };
        assert!(load_portfolio(&source, true).await.is_err());
    }
}
