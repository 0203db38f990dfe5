//! Shared API request/response types
//!
//! Types exchanged with the external creation/notification endpoint and
//! returned by the splitsheet service itself.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Maximum accepted audio attachment size (50 MiB)
pub const MAX_AUDIO_BYTES: usize = 50 * 1024 * 1024;

/// Success result from the external creation endpoint.
///
/// The endpoint notifies every participant, creates platform accounts for
/// participants without one, and may auto-generate a release identifier
/// when the sheet was submitted without one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResult {
    /// Participant notifications sent
    pub notifications_sent: u32,
    /// New platform accounts created for unlinked participants
    pub accounts_created: u32,
    /// True when the server assigned a release identifier itself
    pub isrc_auto_generated: bool,
    /// Optional human-readable status message
    #[serde(default)]
    pub message: Option<String>,
}

/// Error payload returned by service endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable message, surfaced verbatim to the user
    pub message: String,
}

/// An audio artifact attached to a submission.
///
/// Guarded client-side before any submission is attempted: audio MIME
/// types only, at most 50 MiB.
#[derive(Debug, Clone)]
pub struct AudioAttachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl AudioAttachment {
    /// Accept an attachment, rejecting non-audio types and oversized data
    pub fn new(file_name: String, content_type: String, data: Vec<u8>) -> Result<Self> {
        if !content_type.starts_with("audio/") {
            return Err(Error::InvalidInput(format!(
                "attachment must be an audio type (got {content_type})"
            )));
        }
        if data.len() > MAX_AUDIO_BYTES {
            return Err(Error::InvalidInput(format!(
                "audio attachment is {} bytes; the maximum is {} (50 MiB)",
                data.len(),
                MAX_AUDIO_BYTES
            )));
        }
        Ok(AudioAttachment {
            file_name,
            content_type,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_attachment_accepts_audio_types() {
        let attachment = AudioAttachment::new(
            "demo.mp3".to_string(),
            "audio/mpeg".to_string(),
            vec![0u8; 1024],
        )
        .unwrap();
        assert_eq!(attachment.file_name, "demo.mp3");
    }

    #[test]
    fn test_audio_attachment_rejects_non_audio() {
        let err = AudioAttachment::new(
            "cover.png".to_string(),
            "image/png".to_string(),
            vec![0u8; 16],
        )
        .unwrap_err();
        assert!(err.to_string().contains("audio"));
    }

    #[test]
    fn test_audio_attachment_rejects_oversize() {
        let err = AudioAttachment::new(
            "huge.wav".to_string(),
            "audio/wav".to_string(),
            vec![0u8; MAX_AUDIO_BYTES + 1],
        )
        .unwrap_err();
        assert!(err.to_string().contains("maximum"));
    }

    #[test]
    fn test_audio_attachment_accepts_exact_limit() {
        assert!(AudioAttachment::new(
            "edge.flac".to_string(),
            "audio/flac".to_string(),
            vec![0u8; MAX_AUDIO_BYTES],
        )
        .is_ok());
    }

    #[test]
    fn test_submission_result_deserializes_without_message() {
        let result: SubmissionResult = serde_json::from_str(
            r#"{"notifications_sent":3,"accounts_created":1,"isrc_auto_generated":false}"#,
        )
        .unwrap();
        assert_eq!(result.notifications_sent, 3);
        assert!(result.message.is_none());
    }
}
