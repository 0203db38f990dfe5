//! Submission client for the external creation/notification endpoint
//!
//! Sends the terminal splitsheet snapshot (plus the optional audio
//! attachment) as a multipart request and interprets the response. The
//! endpoint notifies participants, creates platform accounts where
//! needed, and reports both counts back. Any non-success response is
//! surfaced with the server's message verbatim when one is present.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use wtm_common::api::{AudioAttachment, ErrorResponse, SubmissionResult};
use wtm_common::model::Splitsheet;

/// Submission transport/contract failures.
///
/// None of these mutate the working copy; the caller keeps it intact so
/// the user can retry without re-entering data.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Endpoint unreachable, timed out, or connection dropped
    #[error("submission failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Endpoint answered non-2xx with a server-provided message
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Endpoint answered 2xx with a body we could not interpret
    #[error("submission endpoint returned a malformed response")]
    MalformedResponse,
}

/// Client for the external creation endpoint
pub struct SubmissionClient {
    http: Client,
    endpoint: String,
}

impl SubmissionClient {
    pub fn new(endpoint: String, timeout_secs: u64) -> Self {
        SubmissionClient {
            http: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint,
        }
    }

    /// Submit a splitsheet snapshot.
    ///
    /// The sheet travels as a JSON part named `document`; the audio
    /// artifact, when present, as a binary part named `audio`.
    pub async fn submit(
        &self,
        sheet: &Splitsheet,
        audio: Option<AudioAttachment>,
    ) -> Result<SubmissionResult, SubmitError> {
        let document = serde_json::to_string(sheet).expect("splitsheet serializes to JSON");
        let mut form = Form::new().part(
            "document",
            Part::text(document).mime_str("application/json")?,
        );
        if let Some(attachment) = audio {
            debug!(
                "Attaching audio {} ({}, {} bytes)",
                attachment.file_name,
                attachment.content_type,
                attachment.data.len()
            );
            form = form.part(
                "audio",
                Part::bytes(attachment.data)
                    .file_name(attachment.file_name)
                    .mime_str(&attachment.content_type)?,
            );
        }

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            // Prefer the server's own message, fall back to a generic one
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.message,
                Err(_) => format!("submission endpoint answered {status}"),
            };
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let result = response
            .json::<SubmissionResult>()
            .await
            .map_err(|_| SubmitError::MalformedResponse)?;
        info!(
            "Splitsheet submitted: {} notifications, {} accounts created{}",
            result.notifications_sent,
            result.accounts_created,
            if result.isrc_auto_generated {
                ", release identifier auto-generated"
            } else {
                ""
            }
        );
        Ok(result)
    }
}
