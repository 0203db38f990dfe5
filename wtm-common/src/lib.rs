//! # Wai'tuMusic Common Library
//!
//! Shared code for the Wai'tuMusic splitsheet services including:
//! - Splitsheet data model (working copy, participants, roles)
//! - Release identifier codec and document reference numbers
//! - Role entry identifier generation
//! - Percentage aggregation and weighted work-share calculation
//! - Submission validation pipeline
//! - Shared API request/response types
//! - Configuration loading

pub mod aggregate;
pub mod api;
pub mod config;
pub mod entry_id;
pub mod error;
pub mod isrc;
pub mod model;
pub mod validate;
pub mod weights;

pub use error::{Error, Result};
pub use model::{Participant, Role, RoleCategory, Splitsheet};
