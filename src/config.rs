use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::engine::ranking::RankingWeights;

/// Root configuration structure, deserialized from `.portsight/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Where portfolio data comes from when no CLI flag overrides it.
    #[serde(default)]
    pub source: SourceConfig,
    /// Composite score coefficients.
    #[serde(default)]
    pub ranking: RankingWeights,
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    /// Dataset file (`.json` or `.toml`). Relative paths resolve against the
    /// directory holding the config file.
    pub file: Option<PathBuf>,
    /// Base URL of the dashboard API, e.g. `http://localhost:3000/api`.
    pub api_url: Option<String>,
    /// Environment variable holding the API bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Per-request timeout for the API source.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_token_env() -> String {
    "PORTSIGHT_TOKEN".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            file: None,
            api_url: None,
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<working_dir>/.portsight/config.toml`
/// 3. `~/.config/portsight/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(working_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = working_dir.join(".portsight").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("portsight").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    debug!("no config file found, using defaults");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;

    let invalid = config.ranking.invalid_weights();
    if !invalid.is_empty() {
        bail!(
            "Invalid config {}: ranking weights must be non-negative ({})",
            path.display(),
            invalid.join(", ")
        );
    }

    if let (Some(file), Some(dir)) = (config.source.file.as_ref(), path.parent()) {
        if file.is_relative() {
            config.source.file = Some(dir.join(file));
        }
    }

    debug!(path = %path.display(), "config loaded");
    Ok(config)
}
