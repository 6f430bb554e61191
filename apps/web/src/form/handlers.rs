//! Axum route handlers for the match page and its JSON twin.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::form::state::{submit_shared, FormPhase, MatchForm};
use crate::form::tier::ScoreTier;
use crate::form::view::FormView;
use crate::models::matching::MatchResult;
use crate::render::render_page;
use crate::sessions::{session_cookie, session_id_from_headers, Session};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Fields posted by the page form. Missing fields count as empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFormInput {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchApiResponse {
    #[serde(flatten)]
    pub result: MatchResult,
    pub tier: ScoreTier,
    pub label: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
///
/// Renders the visitor's form in whatever phase it is in. Visitors without a
/// live session get the empty form; no session is created here.
pub async fn handle_index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let page = match state.sessions.get(session_id_from_headers(&headers)).await {
        Some(form) => {
            let form = form.lock().await;
            render_for(&state, &form)
        }
        None => render_for(&state, &MatchForm::new()),
    };
    Ok(Html(page))
}

/// POST /match
///
/// Validates and submits the two texts, then renders the settled page.
pub async fn handle_match(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(input): Form<MatchFormInput>,
) -> Result<Response, AppError> {
    let session = state
        .sessions
        .get_or_create(session_id_from_headers(&headers))
        .await;

    submit_shared(
        &session.form,
        state.matcher.as_ref(),
        &input.resume_text,
        &input.jd_text,
    )
    .await;

    let page = {
        let form = session.form.lock().await;
        render_for(&state, &form)
    };
    page_response(&session, page)
}

/// POST /reset
///
/// Clears the visitor's form and sends them back to the empty page.
pub async fn handle_reset(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    if let Some(form) = state.sessions.get(session_id_from_headers(&headers)).await {
        form.lock().await.reset();
    }
    Redirect::to("/")
}

/// POST /api/v1/match
///
/// Same validation and upstream call as the page, without a session.
/// Returns the upstream result plus its tier and label.
pub async fn handle_api_match(
    State(state): State<AppState>,
    input: Result<Json<MatchFormInput>, JsonRejection>,
) -> Result<Json<MatchApiResponse>, AppError> {
    let Json(input) = input.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let mut form = MatchForm::new();
    let phase = form
        .submit(state.matcher.as_ref(), &input.resume_text, &input.jd_text)
        .await
        .clone();

    match phase {
        FormPhase::Success(result) => {
            let tier = ScoreTier::for_score(result.match_score);
            Ok(Json(MatchApiResponse {
                label: state.config.form_style.tier_style(tier).label,
                tier,
                result,
            }))
        }
        FormPhase::Error(e) => Err(e.into()),
        FormPhase::Idle | FormPhase::Loading => Err(AppError::Internal(anyhow::anyhow!(
            "match form did not settle"
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn render_for(state: &AppState, form: &MatchForm) -> String {
    render_page(&FormView::from_form(form, state.config.form_style))
}

fn page_response(session: &Session, page: String) -> Result<Response, AppError> {
    let mut response = Html(page).into_response();
    if session.created {
        let value = HeaderValue::from_str(&session_cookie(session.id))
            .map_err(|e| AppError::Internal(e.into()))?;
        response.headers_mut().insert(SET_COOKIE, value);
    }
    Ok(response)
}
