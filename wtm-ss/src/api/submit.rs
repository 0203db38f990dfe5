//! Submission endpoint
//!
//! Runs the validation pipeline against a terminal snapshot of the
//! working copy and, on success, hands the payload to the external
//! creation endpoint. The working copy survives every failure path and
//! is cleared only after the endpoint confirms success.

use axum::extract::{Path, State};
use axum::Json;
use tracing::{info, warn};
use uuid::Uuid;
use wtm_common::api::SubmissionResult;
use wtm_common::validate::validate;

use super::ApiError;
use crate::AppState;

/// POST /splitsheet/:id/submit
///
/// At most one submission may be in flight per working copy; a concurrent
/// attempt is rejected with a conflict.
pub async fn submit_sheet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionResult>, ApiError> {
    // Marks the session in-flight and snapshots it
    let (sheet, audio) = state.sessions.begin_submit(id).await?;

    // First failing gate blocks the submission; the snapshot guard is
    // released so the user can correct and retry
    if let Err(gate) = validate(&sheet, &state.issuer, state.options) {
        state.sessions.finish_submit(id, false).await;
        return Err(ApiError::Engine(gate.into()));
    }

    match state.client.submit(&sheet, audio).await {
        Ok(result) => {
            info!("Splitsheet {id} created");
            state.sessions.finish_submit(id, true).await;
            Ok(Json(result))
        }
        Err(e) => {
            // Working copy stays intact for retry without re-entering data
            warn!("Splitsheet {id} submission failed: {e}");
            state.sessions.finish_submit(id, false).await;
            Err(e.into())
        }
    }
}
