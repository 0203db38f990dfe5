//! Role entry identifier generation
//!
//! Every role on a splitsheet carries a derived, human-auditable entry
//! identifier used for legal traceability on the document:
//!
//! `WM-SSA-<ROLECODE>-<RELEASE-ID>-<SEQ>`
//!
//! The release identifier keeps its hyphens (or reads `PENDING` before one
//! is assigned) and the sequence is 1 + the count of same-category roles
//! already on the sheet, zero-padded to 3 digits. The count comes from the
//! in-memory working copy, not a persisted sequence, so identifiers are
//! only stable within one editing session until saved.

use crate::model::RoleCategory;

/// Release-identifier placeholder used before one is assigned
pub const PENDING_ID: &str = "PENDING";

/// Derive the entry identifier for the next role of `category`.
///
/// `existing_count` is the number of roles of the same category already on
/// the sheet (excluding the role being re-categorized, when changing an
/// existing role).
pub fn entry_id(
    category: RoleCategory,
    release_id: Option<&str>,
    existing_count: usize,
) -> String {
    let id = match release_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => PENDING_ID,
    };
    format!("WM-SSA-{}-{}-{:03}", category.code(), id, existing_count + 1)
}
