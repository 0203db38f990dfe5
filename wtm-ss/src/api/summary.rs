//! Split summary endpoint
//!
//! Recomputes sums, weighted shares and the full validation report on
//! every call; nothing is cached across edits.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;
use wtm_common::aggregate::CategorySums;
use wtm_common::isrc;
use wtm_common::validate::validate_all;
use wtm_common::weights::WorkShares;

use super::ApiError;
use crate::AppState;

/// Summary of the current working copy
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub sums: CategorySums,
    pub shares: WorkShares,
    /// "Manual entries" or "Wai'tuMusic default"
    pub executive_label: String,
    /// True when the work total is within tolerance of 100%
    pub balanced: bool,
    /// Document reference number preview for today
    pub reference_number: String,
    /// Every failing submission gate, in check order
    pub issues: Vec<String>,
}

/// GET /splitsheet/:id/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let sheet = state.sessions.sheet(id).await?;
    let report = validate_all(&sheet, &state.issuer, state.options);

    Ok(Json(SummaryResponse {
        sums: report.sums,
        shares: report.shares,
        executive_label: report.shares.executive_source.to_string(),
        balanced: report.shares.is_balanced(),
        reference_number: isrc::reference_number_today(sheet.release_id.as_deref()),
        issues: report.errors.iter().map(|e| e.to_string()).collect(),
    }))
}
