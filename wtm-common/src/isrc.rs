//! Release identifier codec
//!
//! Validates and normalizes the ISRC-like release identifier and derives
//! the human-readable document reference number shown on the splitsheet.
//!
//! The identifier has the hyphenated shape `CC-XXX-YY-NN-NNN`: a 2-letter
//! country code, a 3-character registrant code, 2-digit year, 2-digit
//! designation block and 3-digit designation. Which `CC-XXX` pairs are
//! accepted comes from `IssuerConfig`, not a hardcoded constant, so the
//! codec generalizes beyond one issuer.

use crate::config::IssuerConfig;
use chrono::NaiveDate;
use thiserror::Error;

/// Length of the identifier once hyphens are stripped (2+3+2+2+3)
pub const STRIPPED_LEN: usize = 12;

/// Reference number shown before a release identifier exists
pub const PENDING_REFERENCE: &str = "WM-SS-PENDING";

/// Format validation failure for a release identifier.
///
/// The two checks are reported independently: a wrong stripped length
/// produces `Length`, a well-sized identifier that does not fit the
/// hyphenated pattern produces `Pattern`. Validation always terminates
/// with exactly one of these or success.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("release identifier must contain exactly {STRIPPED_LEN} characters without hyphens (found {0})")]
    Length(usize),

    #[error("release identifier must match the CC-XXX-YY-NN-NNN pattern for an accepted issuer")]
    Pattern,
}

/// Normalize a raw identifier: uppercase, nothing else.
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    raw.to_uppercase()
}

/// Identifier with hyphens removed
pub fn strip_hyphens(id: &str) -> String {
    id.chars().filter(|c| *c != '-').collect()
}

/// Length check: the hyphen-stripped identifier must be exactly
/// `STRIPPED_LEN` characters
pub fn check_length(id: &str) -> Result<(), FormatError> {
    let stripped = strip_hyphens(id);
    let len = stripped.chars().count();
    if len != STRIPPED_LEN {
        return Err(FormatError::Length(len));
    }
    Ok(())
}

/// Pattern check: hyphenated form is `CC-XXX-YY-NN-NNN` with an accepted
/// `CC-XXX` issuer prefix, and all-digit year/designation blocks
pub fn check_pattern(id: &str, issuer: &IssuerConfig) -> Result<(), FormatError> {
    let segments: Vec<&str> = id.split('-').collect();
    if segments.len() != 5 {
        return Err(FormatError::Pattern);
    }

    let [country, registrant, year, block, designation] =
        [segments[0], segments[1], segments[2], segments[3], segments[4]];

    let shape_ok = country.len() == 2
        && country.chars().all(|c| c.is_ascii_alphabetic())
        && registrant.len() == 3
        && registrant.chars().all(|c| c.is_ascii_alphanumeric())
        && year.len() == 2
        && year.chars().all(|c| c.is_ascii_digit())
        && block.len() == 2
        && block.chars().all(|c| c.is_ascii_digit())
        && designation.len() == 3
        && designation.chars().all(|c| c.is_ascii_digit());
    if !shape_ok {
        return Err(FormatError::Pattern);
    }

    let prefix = format!("{country}-{registrant}");
    if !issuer.accepts(&prefix) {
        return Err(FormatError::Pattern);
    }
    Ok(())
}

/// Validate a raw identifier and return its normalized form.
///
/// Runs the length check, then the pattern check, and stops at the first
/// failure so the user gets one actionable message at a time.
pub fn validate(raw: &str, issuer: &IssuerConfig) -> Result<String, FormatError> {
    let id = normalize(raw);
    check_length(&id)?;
    check_pattern(&id, issuer)?;
    Ok(id)
}

/// Allocates the per-(identifier, date) sequence for reference numbers.
///
/// A real multi-document deployment backs this with a persisted counter;
/// the engine only sees the allocated value.
pub trait SequenceAllocator {
    fn next_sequence(&self, identifier: &str, date: NaiveDate) -> u32;
}

/// Default allocator: always sequence 1.
///
/// Reproduces the platform's observed `-001` reference numbers. Replace
/// with a persisted counter before issuing multiple documents per
/// identifier per day.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSequence;

impl SequenceAllocator for StaticSequence {
    fn next_sequence(&self, _identifier: &str, _date: NaiveDate) -> u32 {
        1
    }
}

/// Derive the document reference number for a given date.
///
/// `WM-SS-<first 5 stripped chars>-<YYYYMMDD>-<seq>` when an identifier is
/// present, otherwise the fixed pending placeholder.
pub fn reference_number(
    release_id: Option<&str>,
    date: NaiveDate,
    allocator: &dyn SequenceAllocator,
) -> String {
    let id = match release_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => return PENDING_REFERENCE.to_string(),
    };

    let stripped = strip_hyphens(&normalize(id));
    let prefix: String = stripped.chars().take(5).collect();
    let seq = allocator.next_sequence(id, date);
    format!("WM-SS-{}-{}-{:03}", prefix, date.format("%Y%m%d"), seq)
}

/// Reference number for today, with the static default sequence
pub fn reference_number_today(release_id: Option<&str>) -> String {
    reference_number(
        release_id,
        chrono::Local::now().date_naive(),
        &StaticSequence,
    )
}
