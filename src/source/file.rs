use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{Decision, HealthTrendPoint, Risk};
use crate::source::DataSource;
use crate::validation::{ProjectRecord, RiskRecord};

/// On-disk dataset layout, shared by the JSON and TOML formats.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatasetFile {
    pub projects: Vec<ProjectRecord>,
    pub risks: Vec<RiskRecord>,
    pub decisions: Vec<Decision>,
    /// Health history keyed by project id, oldest first.
    pub trends: HashMap<String, Vec<HealthTrendPoint>>,
}

/// Dataset read from a `.json` or `.toml` file. Any other extension is parsed
/// as JSON.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    dataset: DatasetFile,
}

impl FileSource {
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;

        let dataset = parse_dataset(&content, path)?;

        // Surface risk records that no project lookup would ever reach.
        for record in &dataset.risks {
            if record.project_id.is_none() {
                Risk::try_from(record.clone())?;
            }
        }
        let orphans = dataset
            .risks
            .iter()
            .filter(|r| {
                !dataset
                    .projects
                    .iter()
                    .any(|p| p.id.is_some() && p.id == r.project_id)
            })
            .count();
        if orphans > 0 {
            warn!(count = orphans, "risks reference unknown projects and will be ignored");
        }

        debug!(
            path = %path.display(),
            projects = dataset.projects.len(),
            risks = dataset.risks.len(),
            "dataset loaded"
        );

        Ok(FileSource {
            path: path.to_path_buf(),
            dataset,
        })
    }
}

fn parse_dataset(content: &str, path: &Path) -> Result<DatasetFile> {
    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    if is_toml {
        toml::from_str(content).with_context(|| format!("Invalid TOML dataset {}", path.display()))
    } else {
        serde_json::from_str(content)
            .with_context(|| format!("Invalid JSON dataset {}", path.display()))
    }
}

impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>> {
        Ok(self.dataset.projects.clone())
    }

    async fn list_risks(&self, project_id: &str) -> Result<Vec<RiskRecord>> {
        Ok(self
            .dataset
            .risks
            .iter()
            .filter(|r| r.project_id.as_deref() == Some(project_id))
            .cloned()
            .collect())
    }

    async fn list_decisions(&self) -> Result<Vec<Decision>> {
        Ok(self.dataset.decisions.clone())
    }

    async fn health_trend(&self, project_id: &str) -> Result<Vec<HealthTrendPoint>> {
        Ok(self.dataset.trends.get(project_id).cloned().unwrap_or_default())
    }
}
