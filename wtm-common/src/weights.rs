//! Weighted work-share calculation
//!
//! Converts the per-category sums into "percentage of the whole work"
//! values. Each category sum is a share of its own pool (0-100) and is
//! rescaled by the pool's fixed contribution to total work value:
//!
//! - composition side: songwriting 50%, melody creation 25%,
//!   beat/music composition 25%
//! - publishing side: publishing 50%
//!
//! Executive production is informational only. When no executive-production
//! role exists anywhere the share is attributed entirely to the platform
//! default owner (reported as 100%), and it is never folded into the work
//! total either way.

use crate::aggregate::CategorySums;
use serde::Serialize;
use std::fmt;

/// Fixed contribution of each pool to total work value, in percent
pub const SONGWRITING_WEIGHT: f64 = 50.0;
pub const MELODY_WEIGHT: f64 = 25.0;
pub const BEAT_WEIGHT: f64 = 25.0;
pub const PUBLISHING_WEIGHT: f64 = 50.0;

/// Target for the combined work total
pub const BALANCED_TOTAL: f64 = 100.0;

/// Absolute tolerance on the 100% total check
pub const BALANCE_EPSILON: f64 = 0.1;

/// Where the reported executive-production share comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutiveSource {
    /// At least one executive-production role exists on the sheet
    Manual,
    /// No executive-production role; the share defaults to the platform
    PlatformDefault,
}

impl fmt::Display for ExecutiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutiveSource::Manual => f.write_str("Manual entries"),
            ExecutiveSource::PlatformDefault => f.write_str("Wai'tuMusic default"),
        }
    }
}

/// Weighted shares of the whole work
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkShares {
    pub songwriting_weighted: f64,
    pub melody_weighted: f64,
    pub beat_weighted: f64,
    /// Sum of the three composition-side weighted shares
    pub composition_total: f64,
    pub publishing_weighted: f64,
    /// Informational executive-production share (not part of the total)
    pub executive_production: f64,
    pub executive_source: ExecutiveSource,
    /// composition_total + publishing_weighted, checked against 100
    pub total_work_percent: f64,
}

/// Apply the fixed side-weights to the category sums
pub fn work_shares(sums: &CategorySums) -> WorkShares {
    let songwriting_weighted = sums.songwriting / 100.0 * SONGWRITING_WEIGHT;
    let melody_weighted = sums.melody / 100.0 * MELODY_WEIGHT;
    let beat_weighted = sums.beat / 100.0 * BEAT_WEIGHT;
    let composition_total = songwriting_weighted + melody_weighted + beat_weighted;
    let publishing_weighted = sums.publishing / 100.0 * PUBLISHING_WEIGHT;

    let (executive_production, executive_source) = if sums.has_executive_producers {
        (sums.executive_production, ExecutiveSource::Manual)
    } else {
        (100.0, ExecutiveSource::PlatformDefault)
    };

    WorkShares {
        songwriting_weighted,
        melody_weighted,
        beat_weighted,
        composition_total,
        publishing_weighted,
        executive_production,
        executive_source,
        total_work_percent: composition_total + publishing_weighted,
    }
}

impl WorkShares {
    /// True when the work total is within tolerance of 100%
    pub fn is_balanced(&self) -> bool {
        (self.total_work_percent - BALANCED_TOTAL).abs() < BALANCE_EPSILON
    }
}
