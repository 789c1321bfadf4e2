//! Explicit authentication state for remote data sources.
//!
//! A [`Session`] is created by the caller and handed to whatever needs it;
//! nothing reads credentials from global state. The scoring engine never sees
//! a session.

use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Session::default()
    }

    /// Session holding the bearer token found in the environment variable
    /// `var`, or an anonymous session when it is unset or empty.
    pub fn from_env(var: &str) -> Self {
        let mut session = Session::anonymous();
        if let Ok(token) = std::env::var(var) {
            debug!(var, "bearer token found in environment");
            session.login(token);
        }
        session
    }

    /// Start an authenticated session. Blank tokens leave it anonymous.
    pub fn login(&mut self, token: impl Into<String>) {
        let token = token.into();
        self.token = if token.trim().is_empty() {
            None
        } else {
            Some(token.trim().to_string())
        };
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
