/// Match client — the single point of entry for calls to the external
/// matching service. Scoring, skill extraction and feedback all live
/// upstream; this module only speaks the wire contract.
///
/// No retries: every failure is terminal and surfaced to the user.
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::MatchError;
use crate::models::matching::{MatchResult, Submission};

const MATCH_PATH: &str = "/api/match";
const HEALTH_PATH: &str = "/api/health";
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// The matching backend as seen by the form. `AppState` holds an
/// `Arc<dyn MatchService>` so handlers and form logic can run against a fake.
#[async_trait]
pub trait MatchService: Send + Sync {
    async fn match_resume(&self, submission: &Submission) -> Result<MatchResult, MatchError>;

    /// True when the upstream health endpoint answers 2xx.
    async fn is_healthy(&self) -> bool;
}

/// reqwest-backed client for `POST {base_url}/api/match`.
#[derive(Clone)]
pub struct MatchClient {
    client: Client,
    base_url: String,
}

impl MatchClient {
    /// `timeout: None` leaves requests unbounded.
    pub fn new(base_url: String, timeout: Option<Duration>) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            client: builder.build().expect("Failed to build HTTP client"),
            base_url,
        }
    }

    /// Plain concatenation; the base URL is used exactly as configured.
    pub fn match_url(&self) -> String {
        format!("{}{}", self.base_url, MATCH_PATH)
    }

    fn health_url(&self) -> String {
        format!("{}{}", self.base_url, HEALTH_PATH)
    }
}

#[async_trait]
impl MatchService for MatchClient {
    async fn match_resume(&self, submission: &Submission) -> Result<MatchResult, MatchError> {
        let response = self
            .client
            .post(self.match_url())
            .header("content-type", "application/json")
            .json(submission)
            .send()
            .await
            .map_err(|e| {
                warn!("Match request failed to send: {e}");
                MatchError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            // Body is deliberately not read.
            warn!("Match API returned {status}");
            return Err(MatchError::Request {
                status: status.as_u16(),
            });
        }

        let result: MatchResult = response.json().await.map_err(|e| {
            warn!("Match API response did not parse: {e}");
            MatchError::from(e)
        })?;

        debug!(
            "Match succeeded: score={}, matched={}, missing={}",
            result.match_score,
            result.matched_skills.len(),
            result.missing_skills.len()
        );

        Ok(result)
    }

    async fn is_healthy(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(r) => r.status().is_success(),
            Err(e) => {
                debug!("Upstream health probe failed: {e}");
                false
            }
        }
    }
}
