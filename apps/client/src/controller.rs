//! Analysis Request Controller — owns the document slots, the workflow state and the
//! single outstanding request.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ Succeeded(result) ──reset──▶ Idle (slots cleared)
//!                            └─err──▶ Failed(message)  ──reset──▶ Idle (slots cleared)
//!                                                       └dismiss─▶ Idle (slots kept)
//! ```
//!
//! Slots can only change in `Idle` or `Failed`; uploads in the other states are refused.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::{AnalysisResult, ResultsView};
use crate::errors::AnalysisError;
use crate::intake::{
    AnalysisRequest, DocumentIntake, InputSource, IntakeOutcome, SlotKind, UploadedFile,
};
use crate::service::AnalysisService;

/// A successful analysis and when it arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedAnalysis {
    pub result: AnalysisResult,
    pub analyzed_at: DateTime<Utc>,
}

impl CompletedAnalysis {
    pub fn view(&self) -> ResultsView {
        ResultsView::derive(&self.result).with_timestamp(self.analyzed_at)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Idle,
    Submitting { attempt_id: Uuid },
    Succeeded(CompletedAnalysis),
    Failed(String),
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Submitting { .. } => "submitting",
            WorkflowState::Succeeded(_) => "succeeded",
            WorkflowState::Failed(_) => "failed",
        }
    }
}

/// What a `submit` call did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Guard did not hold (not idle, or a slot is empty). State untouched.
    Ignored,
    Succeeded,
    Failed(String),
}

/// A request that has passed the submit guard and is now in flight.
#[derive(Debug)]
pub struct PendingSubmission {
    pub attempt_id: Uuid,
    pub request: AnalysisRequest,
}

pub struct AnalysisController {
    intake: DocumentIntake,
    state: WorkflowState,
    show_details: bool,
    strict_consistency: bool,
    service: Arc<dyn AnalysisService>,
}

impl AnalysisController {
    pub fn new(service: Arc<dyn AnalysisService>, strict_consistency: bool) -> Self {
        Self {
            intake: DocumentIntake::new(),
            state: WorkflowState::Idle,
            show_details: false,
            strict_consistency,
            service,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn intake(&self) -> &DocumentIntake {
        &self.intake
    }

    pub fn show_details(&self) -> bool {
        self.show_details
    }

    /// Submit is enabled only when idle with both slots filled.
    pub fn can_submit(&self) -> bool {
        matches!(self.state, WorkflowState::Idle) && self.intake.is_ready()
    }

    /// Documents can only change before a submission or after a failure.
    pub fn slots_editable(&self) -> bool {
        matches!(self.state, WorkflowState::Idle | WorkflowState::Failed(_))
    }

    pub fn submit_file(
        &mut self,
        kind: SlotKind,
        file: UploadedFile,
        source: InputSource,
    ) -> IntakeOutcome {
        if !self.slots_editable() {
            debug!(slot = %kind, state = self.state.name(), "Upload refused, slots are locked");
            return IntakeOutcome::Locked;
        }
        self.intake.submit_file(kind, file, source)
    }

    /// Empties `kind`. Returns `false` (and changes nothing) while slots are locked.
    pub fn clear_slot(&mut self, kind: SlotKind) -> bool {
        if !self.slots_editable() {
            return false;
        }
        self.intake.clear_slot(kind);
        true
    }

    /// Runs the submit guard and moves to `Submitting`.
    /// Returns `None` (and changes nothing) when submission is not allowed.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        if !matches!(self.state, WorkflowState::Idle) {
            return None;
        }
        let request = self.intake.build_request()?;
        let attempt_id = Uuid::new_v4();

        info!(
            %attempt_id,
            resume = %request.resume.file_name,
            job_description = %request.job_description.file_name,
            "Submitting documents for analysis"
        );
        self.state = WorkflowState::Submitting { attempt_id };
        Some(PendingSubmission {
            attempt_id,
            request,
        })
    }

    /// Records the outcome of the in-flight request. Ignored unless it belongs to the
    /// current `Submitting` attempt.
    pub fn complete(
        &mut self,
        attempt_id: Uuid,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> SubmitOutcome {
        match self.state {
            WorkflowState::Submitting { attempt_id: current } if current == attempt_id => {}
            _ => return SubmitOutcome::Ignored,
        }

        match outcome.and_then(|result| self.check_consistency(attempt_id, result)) {
            Ok(result) => {
                info!(%attempt_id, score = result.score, "Analysis succeeded");
                self.state = WorkflowState::Succeeded(CompletedAnalysis {
                    result,
                    analyzed_at: Utc::now(),
                });
                SubmitOutcome::Succeeded
            }
            Err(e) => {
                warn!(%attempt_id, error = %e, "Analysis failed");
                let message = e.user_message();
                self.state = WorkflowState::Failed(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    fn check_consistency(
        &self,
        attempt_id: Uuid,
        result: AnalysisResult,
    ) -> Result<AnalysisResult, AnalysisError> {
        let violations = result.consistency_violations();
        if violations.is_empty() {
            return Ok(result);
        }
        if self.strict_consistency {
            return Err(AnalysisError::Inconsistent(violations.join("; ")));
        }
        for violation in &violations {
            warn!(%attempt_id, violation = %violation, "Analysis result breaks service contract");
        }
        Ok(result)
    }

    /// Sends both documents and waits for the single response.
    /// A no-op unless `can_submit()` holds.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(pending) = self.begin_submit() else {
            return SubmitOutcome::Ignored;
        };
        let outcome = self
            .service
            .analyze(pending.attempt_id, pending.request)
            .await;
        self.complete(pending.attempt_id, outcome)
    }

    /// `Failed` → `Idle`, keeping both documents so the user can retry.
    pub fn dismiss_error(&mut self) -> bool {
        if matches!(self.state, WorkflowState::Failed(_)) {
            self.state = WorkflowState::Idle;
            true
        } else {
            false
        }
    }

    /// Dismisses the current error and submits the same documents again.
    pub async fn retry(&mut self) -> SubmitOutcome {
        if !self.dismiss_error() {
            return SubmitOutcome::Ignored;
        }
        self.submit().await
    }

    /// Back to a blank `Idle`: result or error dropped, both slots emptied.
    /// Not available while a request is in flight.
    pub fn reset(&mut self) -> bool {
        if matches!(self.state, WorkflowState::Submitting { .. }) {
            return false;
        }
        self.intake.clear_all();
        self.state = WorkflowState::Idle;
        self.show_details = false;
        true
    }

    pub fn toggle_details(&mut self) -> bool {
        self.show_details = !self.show_details;
        self.show_details
    }
}
