//! Page view model. Pure projection of a `MatchForm` plus the configured
//! style variant; the renderer only formats what is here.

use crate::form::state::MatchForm;
use crate::form::tier::{ScoreTier, StyleVariant, TierStyle};
use crate::models::matching::MatchResult;

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub resume_text: String,
    pub jd_text: String,
    pub resume_chars: usize,
    pub jd_chars: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<ResultView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    /// e.g. "85%"
    pub score_text: String,
    pub tier: ScoreTier,
    pub style: TierStyle,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub feedback: String,
}

impl FormView {
    pub fn from_form(form: &MatchForm, variant: StyleVariant) -> Self {
        Self {
            resume_text: form.resume_text().to_string(),
            jd_text: form.jd_text().to_string(),
            resume_chars: form.resume_text().chars().count(),
            jd_chars: form.jd_text().chars().count(),
            loading: form.is_loading(),
            error: form.error().map(|e| e.to_string()),
            result: form.result().map(|r| ResultView::new(r, variant)),
        }
    }
}

impl ResultView {
    pub fn new(result: &MatchResult, variant: StyleVariant) -> Self {
        let tier = ScoreTier::for_score(result.match_score);
        Self {
            score_text: format!("{}%", format_score(result.match_score)),
            tier,
            style: variant.tier_style(tier),
            matched_skills: result.matched_skills.clone(),
            missing_skills: result.missing_skills.clone(),
            feedback: result.feedback.clone(),
        }
    }
}

/// Integral scores print without decimals; fractional scores as received.
pub fn format_score(score: f64) -> String {
    if score.is_finite() && score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score}")
    }
}
