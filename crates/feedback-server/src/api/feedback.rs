//! `POST /api/feedback`: record one survey submission.

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use feedback_core::FeedbackSubmission;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

const CONFIRMATION_MESSAGE: &str = "Thank you! Your feedback has been recorded.";
const DUPLICATE_MESSAGE: &str =
    "This client has already rated this project. Please choose a different project.";

#[derive(Debug, Serialize)]
pub(super) struct SubmitFeedbackResponse {
    pub ok: bool,
    pub message: &'static str,
}

pub(super) async fn submit_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<FeedbackSubmission>, JsonRejection>,
) -> Result<Json<SubmitFeedbackResponse>, ApiError> {
    let Json(submission) = payload.map_err(|rejection| {
        tracing::debug!(request_id = %req_id.0, error = %rejection, "rejected feedback body");
        ApiError::validation(rejection.body_text())
    })?;

    let record = submission.validate().map_err(|e| {
        tracing::debug!(request_id = %req_id.0, error = %e, "feedback failed validation");
        ApiError::validation(e.to_string())
    })?;

    match feedback_db::insert_feedback(&state.pool, &record).await {
        Ok(id) => {
            tracing::info!(id, project = %record.project, "feedback recorded");
            Ok(Json(SubmitFeedbackResponse {
                ok: true,
                message: CONFIRMATION_MESSAGE,
            }))
        }
        Err(e) if e.is_unique_violation() => {
            tracing::warn!(
                request_id = %req_id.0,
                client_name = %record.client_name,
                project = %record.project,
                "duplicate feedback submission"
            );
            Err(ApiError::conflict(DUPLICATE_MESSAGE))
        }
        Err(e) => Err(map_db_error(&req_id.0, "failed to save feedback", &e)),
    }
}
