//! HTTP API handlers for wtm-ss

pub mod health;
pub mod sheet;
pub mod submit;
pub mod summary;

pub use health::{get_build_info, health_routes};
pub use sheet::{
    add_participant, add_role, attach_audio, create_sheet, detach_audio, discard_sheet,
    get_sheet, remove_participant, remove_role, update_participant, update_role, update_sheet,
};
pub use submit::submit_sheet;
pub use summary::get_summary;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use wtm_common::api::ErrorResponse;
use wtm_common::Error;

use crate::submit::SubmitError;

/// Handler-level error with its HTTP mapping
#[derive(Debug)]
pub enum ApiError {
    Engine(Error),
    Submit(SubmitError),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError::Engine(e)
    }
}

impl From<SubmitError> for ApiError {
    fn from(e: SubmitError) -> Self {
        ApiError::Submit(e)
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Engine(e) => match e {
                Error::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                Error::DuplicateRole { .. } => (StatusCode::CONFLICT, "duplicate_role"),
                Error::SubmissionInFlight => (StatusCode::CONFLICT, "submission_in_flight"),
                Error::FixedZeroCategory(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "fixed_zero_category")
                }
                Error::Format(_) | Error::Validation(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "validation_failed")
                }
                Error::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
                Error::Io(_) | Error::Config(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal")
                }
            },
            ApiError::Submit(e) => match e {
                SubmitError::Transport(_) => (StatusCode::BAD_GATEWAY, "submission_transport"),
                SubmitError::Rejected { .. } => (StatusCode::BAD_GATEWAY, "submission_rejected"),
                SubmitError::MalformedResponse => {
                    (StatusCode::BAD_GATEWAY, "submission_malformed_response")
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let message = match &self {
            ApiError::Engine(e) => e.to_string(),
            ApiError::Submit(e) => e.to_string(),
        };
        (
            status,
            Json(ErrorResponse {
                error: kind.to_string(),
                message,
            }),
        )
            .into_response()
    }
}
