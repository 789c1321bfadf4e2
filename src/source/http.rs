use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{Decision, HealthTrendPoint};
use crate::session::Session;
use crate::source::DataSource;
use crate::validation::{ProjectRecord, RiskRecord};

/// Client for the dashboard REST API.
///
/// - `GET {base}/projects`
/// - `GET {base}/projects/{id}/risks`
/// - `GET {base}/projects/{id}/health-trend`
/// - `GET {base}/portfolio/decisions`
pub struct HttpSource {
    client: Client,
    base_url: String,
    session: Session,
}

impl HttpSource {
    pub fn new(base_url: &str, session: Session, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpSource {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(%url, authenticated = self.session.is_authenticated(), "GET");

        let mut request = self
            .client
            .get(&url)
            .header("User-Agent", concat!("portsight/", env!("CARGO_PKG_VERSION")))
            .header("Accept", "application/json");
        if let Some(token) = self.session.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            bail!("Session rejected by {} (401); log in again and retry", url);
        }
        if !status.is_success() {
            bail!("{} returned {}", url, status);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Unexpected response body from {}", url))
    }
}

impl DataSource for HttpSource {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>> {
        self.get_json("projects").await
    }

    async fn list_risks(&self, project_id: &str) -> Result<Vec<RiskRecord>> {
        self.get_json(&format!("projects/{}/risks", encode_segment(project_id)))
            .await
    }

    async fn list_decisions(&self) -> Result<Vec<Decision>> {
        self.get_json("portfolio/decisions").await
    }

    async fn health_trend(&self, project_id: &str) -> Result<Vec<HealthTrendPoint>> {
        self.get_json(&format!("projects/{}/health-trend", encode_segment(project_id)))
            .await
    }
}

/// Percent-encode characters that would change the meaning of a path segment.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => out.push(c),
            _ => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{:02X}", b));
                }
            }
        }
    }
    out
}
