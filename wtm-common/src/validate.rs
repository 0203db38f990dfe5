//! Submission validation pipeline
//!
//! Gates splitsheet submission. Checks run in a fixed order; `validate`
//! stops at the first failure (one actionable message at a time, matching
//! the form UX) while `validate_all` collects every failure for a combined
//! report. Both are read-only passes over the working copy.
//!
//! Order: title, release identifier presence, identifier format (length
//! then pattern), participant presence, participant completeness, the
//! three composition-side caps, and finally the 100%-total gate. The
//! total gate is enforced by default and can be relaxed to advisory via
//! `ValidationOptions`.

use crate::aggregate::{category_sums, CategorySums};
use crate::config::IssuerConfig;
use crate::isrc::{self, FormatError};
use crate::model::Splitsheet;
use crate::weights::{work_shares, WorkShares};
use thiserror::Error;

/// Cap on each composition-side category sum, in percent
pub const SONGWRITING_CAP: f64 = 50.0;
pub const MELODY_CAP: f64 = 25.0;
pub const BEAT_CAP: f64 = 25.0;

/// A single submission gate failure, with its user-facing message
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("song title is required")]
    EmptyTitle,

    #[error("release identifier is required")]
    MissingReleaseId,

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("at least one participant is required")]
    NoParticipants,

    #[error("{participant} is missing a {field}")]
    IncompleteParticipant {
        participant: String,
        field: &'static str,
    },

    #[error("songwriting shares total {sum}% but may not exceed {SONGWRITING_CAP}%")]
    SongwritingCap { sum: f64 },

    #[error("melody creation shares total {sum}% but may not exceed {MELODY_CAP}%")]
    MelodyCap { sum: f64 },

    #[error("beat/music composition shares total {sum}% but may not exceed {BEAT_CAP}%")]
    BeatCap { sum: f64 },

    #[error("shares total {total}% of the work; a splitsheet must total 100%")]
    Unbalanced { total: f64 },
}

/// Pipeline policy knobs
#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions {
    /// Treat the 100%-total check as a hard gate (default) rather than
    /// an advisory indicator
    pub enforce_balance: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions {
            enforce_balance: true,
        }
    }
}

/// Everything the pipeline derives in one pass: the category sums, the
/// weighted shares, and the ordered list of failures
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub sums: CategorySums,
    pub shares: WorkShares,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run the full pipeline, collecting every failure in check order
pub fn validate_all(
    sheet: &Splitsheet,
    issuer: &IssuerConfig,
    options: ValidationOptions,
) -> ValidationReport {
    let sums = category_sums(&sheet.participants);
    let shares = work_shares(&sums);
    let mut errors = Vec::new();

    if sheet.title.trim().is_empty() {
        errors.push(ValidationError::EmptyTitle);
    }

    match sheet.release_id.as_deref() {
        None => errors.push(ValidationError::MissingReleaseId),
        Some(id) if id.trim().is_empty() => errors.push(ValidationError::MissingReleaseId),
        Some(id) => {
            if let Err(e) = isrc::validate(id, issuer) {
                errors.push(ValidationError::Format(e));
            }
        }
    }

    if sheet.participants.is_empty() {
        errors.push(ValidationError::NoParticipants);
    }

    for participant in &sheet.participants {
        let missing = if participant.name.trim().is_empty() {
            Some("name")
        } else if participant.email.trim().is_empty() {
            Some("email")
        } else if participant.address.trim().is_empty() {
            Some("address")
        } else {
            None
        };
        if let Some(field) = missing {
            errors.push(ValidationError::IncompleteParticipant {
                participant: participant.display_name(),
                field,
            });
        }
    }

    if sums.songwriting > SONGWRITING_CAP {
        errors.push(ValidationError::SongwritingCap {
            sum: sums.songwriting,
        });
    }
    if sums.melody > MELODY_CAP {
        errors.push(ValidationError::MelodyCap { sum: sums.melody });
    }
    if sums.beat > BEAT_CAP {
        errors.push(ValidationError::BeatCap { sum: sums.beat });
    }

    if options.enforce_balance && !shares.is_balanced() {
        errors.push(ValidationError::Unbalanced {
            total: shares.total_work_percent,
        });
    }

    ValidationReport {
        sums,
        shares,
        errors,
    }
}

/// Run the pipeline and stop at the first failure
pub fn validate(
    sheet: &Splitsheet,
    issuer: &IssuerConfig,
    options: ValidationOptions,
) -> Result<(), ValidationError> {
    match validate_all(sheet, issuer, options).errors.into_iter().next() {
        None => Ok(()),
        Some(first) => Err(first),
    }
}
