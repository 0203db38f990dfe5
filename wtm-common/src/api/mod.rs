//! Shared API types for the splitsheet services

pub mod types;

pub use types::{AudioAttachment, ErrorResponse, SubmissionResult, MAX_AUDIO_BYTES};
