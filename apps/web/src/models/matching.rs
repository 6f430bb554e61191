use serde::{Deserialize, Serialize};

use crate::errors::MatchError;

/// Body of `POST {base}/api/match`. Built at submit time, dropped once the
/// request settles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub resume_text: String,
    pub jd_text: String,
}

impl Submission {
    /// Both fields must be non-empty after trimming. The texts are sent as
    /// entered, untrimmed.
    pub fn new(resume_text: &str, jd_text: &str) -> Result<Self, MatchError> {
        if resume_text.trim().is_empty() || jd_text.trim().is_empty() {
            return Err(MatchError::Validation);
        }
        Ok(Self {
            resume_text: resume_text.to_string(),
            jd_text: jd_text.to_string(),
        })
    }
}

/// Successful upstream response. Skill lists are taken as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub match_score: f64, // 0 – 100, may carry decimals
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub feedback: String,
}
