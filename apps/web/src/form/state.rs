//! Match form state machine.
//!
//! Idle → Loading on a valid submit, Loading → Success / Error when the
//! upstream call settles, any state → Idle on reset. Every submit takes a
//! ticket; only the most recently issued ticket may complete the form, so an
//! older request that settles late cannot overwrite a newer outcome.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::errors::MatchError;
use crate::match_client::MatchService;
use crate::models::matching::{MatchResult, Submission};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Loading,
    Success(MatchResult),
    Error(MatchError),
}

/// Identifies one submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket(u64);

#[derive(Debug, Default)]
pub struct MatchForm {
    resume_text: String,
    jd_text: String,
    phase: FormPhase,
    latest_ticket: u64,
}

impl MatchForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn jd_text(&self) -> &str {
        &self.jd_text
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, FormPhase::Loading)
    }

    pub fn result(&self) -> Option<&MatchResult> {
        match &self.phase {
            FormPhase::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&MatchError> {
        match &self.phase {
            FormPhase::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Stores the entered texts and validates them. On success the form is
    /// Loading and the caller must send the returned submission, then hand
    /// the outcome to [`MatchForm::complete`] with the same ticket.
    ///
    /// A validation failure also supersedes any request still in flight.
    pub fn begin_submit(
        &mut self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<(SubmitTicket, Submission), MatchError> {
        self.resume_text = resume_text.to_string();
        self.jd_text = jd_text.to_string();
        self.latest_ticket += 1;

        match Submission::new(resume_text, jd_text) {
            Ok(submission) => {
                self.phase = FormPhase::Loading;
                Ok((SubmitTicket(self.latest_ticket), submission))
            }
            Err(e) => {
                self.phase = FormPhase::Error(e.clone());
                Err(e)
            }
        }
    }

    /// Applies a settled request. Returns false, leaving the form untouched,
    /// when the ticket is no longer the latest one issued.
    pub fn complete(
        &mut self,
        ticket: SubmitTicket,
        outcome: Result<MatchResult, MatchError>,
    ) -> bool {
        if ticket.0 != self.latest_ticket {
            warn!(
                "Discarding stale match outcome (ticket {}, latest {})",
                ticket.0, self.latest_ticket
            );
            return false;
        }

        self.phase = match outcome {
            Ok(result) => FormPhase::Success(result),
            Err(e) => FormPhase::Error(e),
        };
        true
    }

    /// Settles a request whose outcome will never arrive. Only the latest
    /// ticket still Loading is affected; it ends in the generic transport error.
    pub fn abandon(&mut self, ticket: SubmitTicket) -> bool {
        if ticket.0 != self.latest_ticket || !self.is_loading() {
            return false;
        }
        warn!("Match request {} abandoned before it settled", ticket.0);
        self.phase = FormPhase::Error(MatchError::transport(""));
        true
    }

    /// Back to the initial state. Requests still in flight are ignored when
    /// they settle.
    pub fn reset(&mut self) {
        self.resume_text.clear();
        self.jd_text.clear();
        self.phase = FormPhase::Idle;
        self.latest_ticket += 1;
    }

    /// Full submit for a form the caller owns exclusively.
    pub async fn submit(
        &mut self,
        service: &dyn MatchService,
        resume_text: &str,
        jd_text: &str,
    ) -> &FormPhase {
        if let Ok((ticket, submission)) = self.begin_submit(resume_text, jd_text) {
            let outcome = service.match_resume(&submission).await;
            self.complete(ticket, outcome);
        }
        &self.phase
    }
}

/// Submit against a form shared between requests. The lock is released while
/// the upstream call is in flight so overlapping submits genuinely race; the
/// ticket decides which outcome sticks. Returns the phase after this attempt.
///
/// If the returned future is dropped mid-request (client gone, task aborted)
/// the form is moved out of Loading instead of staying there.
pub async fn submit_shared(
    form: &Arc<Mutex<MatchForm>>,
    service: &dyn MatchService,
    resume_text: &str,
    jd_text: &str,
) -> FormPhase {
    let begun = form.lock().await.begin_submit(resume_text, jd_text);

    let (ticket, submission) = match begun {
        Ok(begun) => begun,
        Err(e) => {
            debug!("Submission rejected: {e}");
            return form.lock().await.phase().clone();
        }
    };

    let mut in_flight = InFlight {
        form: form.clone(),
        ticket,
        settled: false,
    };

    let outcome = service.match_resume(&submission).await;

    let mut guard = form.lock().await;
    guard.complete(ticket, outcome);
    in_flight.settled = true;
    guard.phase().clone()
}

/// Abandons its ticket on drop unless the request settled.
struct InFlight {
    form: Arc<Mutex<MatchForm>>,
    ticket: SubmitTicket,
    settled: bool,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let ticket = self.ticket;
        match self.form.try_lock() {
            Ok(mut form) => {
                form.abandon(ticket);
            }
            Err(_) => {
                let form = self.form.clone();
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn(async move {
                            form.lock().await.abandon(ticket);
                        });
                    }
                    Err(_) => warn!("No runtime to abandon match request {}", ticket.0),
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Scripted `MatchService` that counts calls and replays queued outcomes.
    #[derive(Default)]
    pub struct FakeMatchService {
        pub calls: AtomicUsize,
        pub outcomes: std::sync::Mutex<VecDeque<Result<MatchResult, MatchError>>>,
    }

    impl FakeMatchService {
        pub fn with(outcomes: Vec<Result<MatchResult, MatchError>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcomes: std::sync::Mutex::new(outcomes.into()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MatchService for FakeMatchService {
        async fn match_resume(&self, _submission: &Submission) -> Result<MatchResult, MatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(MatchError::transport("")))
        }

        async fn is_healthy(&self) -> bool {
            true
        }
    }

    pub fn sample_result(score: f64) -> MatchResult {
        MatchResult {
            match_score: score,
            matched_skills: vec!["Python".to_string()],
            missing_skills: vec!["Go".to_string()],
            feedback: "Great fit".to_string(),
        }
    }

    #[tokio::test]
    async fn test_blank_input_never_calls_service() {
        let service = FakeMatchService::with(vec![Ok(sample_result(85.0))]);
        let mut form = MatchForm::new();

        for (resume, jd) in [("", "jd"), ("resume", ""), ("  ", "\n\t"), ("", "")] {
            let phase = form.submit(&service, resume, jd).await.clone();
            assert_eq!(phase, FormPhase::Error(MatchError::Validation));
            assert!(!form.is_loading());
        }
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_success_stores_result() {
        let service = FakeMatchService::with(vec![Ok(sample_result(85.0))]);
        let mut form = MatchForm::new();

        form.submit(&service, "Python dev", "Need Python").await;

        assert_eq!(form.result(), Some(&sample_result(85.0)));
        assert!(form.error().is_none());
        assert!(!form.is_loading());
        assert_eq!(form.resume_text(), "Python dev");
    }

    #[tokio::test]
    async fn test_error_clears_previous_result() {
        let service = FakeMatchService::with(vec![
            Ok(sample_result(85.0)),
            Err(MatchError::Request { status: 500 }),
        ]);
        let mut form = MatchForm::new();

        form.submit(&service, "r", "j").await;
        assert!(form.result().is_some());

        form.submit(&service, "r", "j").await;
        assert!(form.result().is_none());
        assert_eq!(form.error(), Some(&MatchError::Request { status: 500 }));
    }

    #[tokio::test]
    async fn test_validation_error_clears_previous_result() {
        let service = FakeMatchService::with(vec![Ok(sample_result(50.0))]);
        let mut form = MatchForm::new();

        form.submit(&service, "r", "j").await;
        form.submit(&service, "r", " ").await;

        assert!(form.result().is_none());
        assert_eq!(form.error(), Some(&MatchError::Validation));
    }

    #[test]
    fn test_begin_submit_enters_loading() {
        let mut form = MatchForm::new();
        let (_, submission) = form.begin_submit("r", "j").unwrap();
        assert!(form.is_loading());
        assert!(form.result().is_none());
        assert!(form.error().is_none());
        assert_eq!(submission.resume_text, "r");
    }

    #[test]
    fn test_reset_from_every_phase() {
        let phases = [
            FormPhase::Idle,
            FormPhase::Loading,
            FormPhase::Success(sample_result(90.0)),
            FormPhase::Error(MatchError::transport("boom")),
        ];
        for phase in phases {
            let mut form = MatchForm {
                resume_text: "resume".to_string(),
                jd_text: "jd".to_string(),
                phase,
                latest_ticket: 3,
            };
            form.reset();
            assert_eq!(form.resume_text(), "");
            assert_eq!(form.jd_text(), "");
            assert_eq!(form.phase(), &FormPhase::Idle);
        }
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut form = MatchForm::new();
        let (first, _) = form.begin_submit("r", "j").unwrap();
        let (second, _) = form.begin_submit("r2", "j2").unwrap();

        assert!(form.complete(second, Ok(sample_result(20.0))));
        assert!(!form.complete(first, Ok(sample_result(95.0))));
        assert_eq!(form.result().map(|r| r.match_score), Some(20.0));
    }

    #[test]
    fn test_reset_invalidates_in_flight_request() {
        let mut form = MatchForm::new();
        let (ticket, _) = form.begin_submit("r", "j").unwrap();
        form.reset();

        assert!(!form.complete(ticket, Ok(sample_result(80.0))));
        assert_eq!(form.phase(), &FormPhase::Idle);
    }

    /// Holds the first call until released so a second submit can overtake it.
    struct GatedService {
        gate: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MatchService for GatedService {
        async fn match_resume(&self, _submission: &Submission) -> Result<MatchResult, MatchError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                self.gate.notified().await;
                Ok(sample_result(99.0))
            } else {
                Ok(sample_result(10.0))
            }
        }

        async fn is_healthy(&self) -> bool {
            true
        }
    }

    /// Never answers.
    struct HangingService;

    #[async_trait]
    impl MatchService for HangingService {
        async fn match_resume(&self, _submission: &Submission) -> Result<MatchResult, MatchError> {
            std::future::pending().await
        }

        async fn is_healthy(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_aborted_submit_leaves_loading() {
        let form = Arc::new(Mutex::new(MatchForm::new()));

        let task = {
            let form = form.clone();
            tokio::spawn(async move { submit_shared(&form, &HangingService, "r", "j").await })
        };

        while !form.lock().await.is_loading() {
            tokio::task::yield_now().await;
        }

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        let form = form.lock().await;
        assert!(!form.is_loading(), "form must not stay Loading after the request is dropped");
        assert_eq!(form.error(), Some(&MatchError::transport("")));
        assert_eq!(form.resume_text(), "r");
    }

    #[test]
    fn test_abandon_ignores_superseded_ticket() {
        let mut form = MatchForm::new();
        let (first, _) = form.begin_submit("r", "j").unwrap();
        let (second, _) = form.begin_submit("r", "j").unwrap();

        assert!(!form.abandon(first));
        assert!(form.is_loading());

        assert!(form.complete(second, Ok(sample_result(75.0))));
        assert!(!form.abandon(second));
        assert!(form.result().is_some());
    }

    #[tokio::test]
    async fn test_overlapping_submits_keep_latest_outcome() {
        let form = Arc::new(Mutex::new(MatchForm::new()));
        let service = Arc::new(GatedService {
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        });

        let slow = {
            let form = form.clone();
            let service = service.clone();
            tokio::spawn(async move { submit_shared(&form, service.as_ref(), "old", "jd").await })
        };

        while service.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let fast = submit_shared(&form, service.as_ref(), "new", "jd").await;
        assert_eq!(fast, FormPhase::Success(sample_result(10.0)));

        service.gate.notify_one();
        let slow_phase = slow.await.unwrap();

        // The late response was discarded.
        assert_eq!(slow_phase, FormPhase::Success(sample_result(10.0)));
        assert_eq!(form.lock().await.resume_text(), "new");
    }
}
