//! Per-category percentage aggregation
//!
//! Sums role percentages by category across all participants of a
//! splitsheet. A pure fold over the participant list: no caching, no
//! side effects, recomputed on every role mutation.

use crate::model::{Participant, RoleCategory};
use serde::Serialize;

/// Category sums across one splitsheet.
///
/// Only the five economically weighted categories are summed; the
/// zero-weight categories (recording performance, label representation,
/// studio representation) are excluded by definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategorySums {
    pub songwriting: f64,
    pub melody: f64,
    pub beat: f64,
    pub publishing: f64,
    pub executive_production: f64,
    /// True when at least one executive-production role exists,
    /// regardless of its percentage
    pub has_executive_producers: bool,
}

/// Sum role percentages by category across all participants.
///
/// Non-finite percentages (never produced by the form, but possible in a
/// hand-built payload) count as 0.
pub fn category_sums(participants: &[Participant]) -> CategorySums {
    let mut sums = CategorySums::default();
    for participant in participants {
        for role in &participant.roles {
            let percent = if role.percent.is_finite() {
                role.percent
            } else {
                0.0
            };
            match role.category {
                RoleCategory::Songwriting => sums.songwriting += percent,
                RoleCategory::MelodyCreation => sums.melody += percent,
                RoleCategory::BeatComposition => sums.beat += percent,
                RoleCategory::Publishing => sums.publishing += percent,
                RoleCategory::ExecutiveProduction => {
                    sums.executive_production += percent;
                    sums.has_executive_producers = true;
                }
                RoleCategory::RecordingPerformance
                | RoleCategory::LabelRepresentation
                | RoleCategory::StudioRepresentation => {}
            }
        }
    }
    sums
}
