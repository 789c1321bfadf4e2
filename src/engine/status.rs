use serde::Serialize;

use crate::engine::clamp_percent;
use crate::models::ProjectStatus;

/// Classify a health score into a status band.
///
/// - `>= 80` → GREEN
/// - `60..80` → YELLOW
/// - `< 60` → RED
///
/// Scores outside `[0, 100]` are clamped first, so bad upstream data never
/// panics or errors.
pub fn classify_status(health_score: f64) -> ProjectStatus {
    match clamp_percent(health_score) {
        h if h >= 80.0 => ProjectStatus::Green,
        h if h >= 60.0 => ProjectStatus::Yellow,
        _ => ProjectStatus::Red,
    }
}

/// Wording used on the project detail view. Finer-grained than
/// [`ProjectStatus`] and with its own boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthTier {
    Excellent,
    Good,
    Warning,
    Critical,
}

impl std::fmt::Display for HealthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthTier::Excellent => write!(f, "excellent"),
            HealthTier::Good => write!(f, "good"),
            HealthTier::Warning => write!(f, "warning"),
            HealthTier::Critical => write!(f, "critical"),
        }
    }
}

pub fn health_tier(health_score: f64) -> HealthTier {
    match clamp_percent(health_score) {
        h if h >= 80.0 => HealthTier::Excellent,
        h if h >= 65.0 => HealthTier::Good,
        h if h >= 50.0 => HealthTier::Warning,
        _ => HealthTier::Critical,
    }
}
