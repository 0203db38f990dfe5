//! Splitsheet working-copy data model
//!
//! A `Splitsheet` is the aggregate root under construction in one editing
//! session. It owns an ordered list of `Participant`s, each of which owns an
//! ordered list of `Role`s. All mutation goes through methods on
//! `Splitsheet` so the role invariants hold at every edit:
//!
//! - a participant holds at most one role per category (checked against the
//!   participant's category set, and the offending edit is rejected)
//! - recording-performance, label-representation and studio-representation
//!   roles carry a fixed 0% share
//! - a role's entry identifier is recomputed whenever its category changes

use crate::entry_id;
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Economic role categories a participant can hold on a work.
///
/// Serialized in kebab-case to match the form payloads
/// (e.g. `"beat-composition"`, `"executive-production"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleCategory {
    Songwriting,
    MelodyCreation,
    BeatComposition,
    RecordingPerformance,
    LabelRepresentation,
    Publishing,
    StudioRepresentation,
    ExecutiveProduction,
}

impl RoleCategory {
    /// All categories, in form display order
    pub const ALL: [RoleCategory; 8] = [
        RoleCategory::Songwriting,
        RoleCategory::MelodyCreation,
        RoleCategory::BeatComposition,
        RoleCategory::RecordingPerformance,
        RoleCategory::LabelRepresentation,
        RoleCategory::Publishing,
        RoleCategory::StudioRepresentation,
        RoleCategory::ExecutiveProduction,
    ];

    /// Fixed 2-letter role code used in entry identifiers
    pub fn code(&self) -> &'static str {
        match self {
            RoleCategory::Songwriting => "WC",
            RoleCategory::MelodyCreation => "MC",
            RoleCategory::BeatComposition => "BC",
            RoleCategory::RecordingPerformance => "RA",
            RoleCategory::LabelRepresentation => "LD",
            RoleCategory::Publishing => "PD",
            RoleCategory::StudioRepresentation => "SD",
            RoleCategory::ExecutiveProduction => "EP",
        }
    }

    /// Categories that carry no composition/publishing economic weight.
    /// Their percentage is fixed at 0 and excluded from all category sums.
    pub fn is_zero_weight(&self) -> bool {
        matches!(
            self,
            RoleCategory::RecordingPerformance
                | RoleCategory::LabelRepresentation
                | RoleCategory::StudioRepresentation
        )
    }
}

impl Default for RoleCategory {
    /// New roles default to songwriting
    fn default() -> Self {
        RoleCategory::Songwriting
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RoleCategory::Songwriting => "songwriting",
            RoleCategory::MelodyCreation => "melody creation",
            RoleCategory::BeatComposition => "beat/music composition",
            RoleCategory::RecordingPerformance => "recording performance",
            RoleCategory::LabelRepresentation => "label representation",
            RoleCategory::Publishing => "publishing",
            RoleCategory::StudioRepresentation => "studio representation",
            RoleCategory::ExecutiveProduction => "executive production",
        };
        f.write_str(label)
    }
}

/// A single economic claim of a participant in one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub category: RoleCategory,
    /// Share of the category's own pool, 0-100
    pub percent: f64,
    /// Free-text notes shown on the document
    #[serde(default)]
    pub notes: String,
    /// Derived entry identifier (WM-SSA-<code>-<id>-<seq>)
    pub entry_id: String,
}

/// Signature metadata recorded when a participant signs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureInfo {
    pub signed_at: DateTime<Utc>,
    #[serde(default)]
    pub signature_text: String,
}

/// A natural person or entity entitled to some share of the work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    /// Platform account linked to this participant, if any
    pub linked_account: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: Option<String>,
    /// Royalty collection society member identifier (e.g. IPI number)
    pub society_id: Option<String>,
    /// Society affiliation (e.g. ASCAP, BMI, PRS)
    pub society_affiliation: Option<String>,
    pub national_id: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub roles: Vec<Role>,
    pub signed: bool,
    pub signature: Option<SignatureInfo>,
}

impl Participant {
    /// Create an empty participant, as the form does when a row is added
    pub fn new() -> Self {
        Participant {
            id: Uuid::new_v4(),
            linked_account: None,
            name: String::new(),
            email: String::new(),
            address: String::new(),
            phone: None,
            society_id: None,
            society_affiliation: None,
            national_id: None,
            date_of_birth: None,
            roles: Vec::new(),
            signed: false,
            signature: None,
        }
    }

    /// Categories this participant already holds a role in
    pub fn role_categories(&self) -> HashSet<RoleCategory> {
        self.roles.iter().map(|r| r.category).collect()
    }

    /// True when name, email and address are all non-empty
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.address.trim().is_empty()
    }

    /// Display name for messages: the name if present, else the id
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("participant {}", self.id)
        } else {
            self.name.clone()
        }
    }
}

impl Default for Participant {
    fn default() -> Self {
        Participant::new()
    }
}

/// Payment status of the splitsheet order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Free,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

/// Pricing fields supplied by the pricing collaborator.
/// Opaque numeric inputs here, never computed by the engine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Pricing {
    pub base_price: f64,
    pub final_price: f64,
    pub discount: f64,
}

/// The work-level splitsheet document under construction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Splitsheet {
    pub title: String,
    /// Release identifier (ISRC-like code), normalized to uppercase
    pub release_id: Option<String>,
    /// Registered-work identifier (e.g. ISWC), if known
    pub work_id: Option<String>,
    /// Product code (e.g. UPC), if known
    pub product_code: Option<String>,
    pub agreement_date: Option<NaiveDate>,
    pub participants: Vec<Participant>,
    pub pricing: Pricing,
    pub payment_status: PaymentStatus,
}

impl Splitsheet {
    /// Create an empty working copy
    pub fn new() -> Self {
        Splitsheet::default()
    }

    /// Store a release identifier, normalized to uppercase.
    /// An empty or whitespace-only value clears the identifier.
    pub fn set_release_id(&mut self, raw: &str) {
        if raw.trim().is_empty() {
            self.release_id = None;
        } else {
            self.release_id = Some(crate::isrc::normalize(raw));
        }
    }

    /// Add an empty participant row and return its id
    pub fn add_participant(&mut self) -> Uuid {
        let participant = Participant::new();
        let id = participant.id;
        self.participants.push(participant);
        id
    }

    pub fn participant(&self, id: Uuid) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: Uuid) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    /// Remove a participant and all of their roles
    pub fn remove_participant(&mut self, id: Uuid) -> Result<()> {
        let before = self.participants.len();
        self.participants.retain(|p| p.id != id);
        if self.participants.len() == before {
            return Err(Error::NotFound(format!("participant {id}")));
        }
        Ok(())
    }

    /// Count roles of a category across all participants, optionally
    /// excluding one role (the one being re-categorized)
    pub fn category_count(
        &self,
        category: RoleCategory,
        exclude: Option<(Uuid, usize)>,
    ) -> usize {
        self.participants
            .iter()
            .flat_map(|p| {
                p.roles
                    .iter()
                    .enumerate()
                    .filter(move |(idx, _)| exclude != Some((p.id, *idx)))
            })
            .filter(|(_, r)| r.category == category)
            .count()
    }

    /// Add a role to a participant.
    ///
    /// Rejects the edit when the participant already holds a role of the
    /// same category. The new role starts at 0% with a freshly derived
    /// entry identifier.
    pub fn add_role(&mut self, participant_id: Uuid, category: RoleCategory) -> Result<&Role> {
        let existing = self.category_count(category, None);
        let release_id = self.release_id.clone();

        let participant = self
            .participant_mut(participant_id)
            .ok_or_else(|| Error::NotFound(format!("participant {participant_id}")))?;

        if participant.role_categories().contains(&category) {
            return Err(Error::DuplicateRole {
                participant: participant.display_name(),
                category,
            });
        }

        participant.roles.push(Role {
            category,
            percent: 0.0,
            notes: String::new(),
            entry_id: entry_id::entry_id(category, release_id.as_deref(), existing),
        });
        Ok(participant.roles.last().unwrap())
    }

    /// Change a role's category, recomputing its entry identifier.
    ///
    /// The sequence is derived from the count of same-category roles in the
    /// sheet excluding the role being changed, matching add-role semantics.
    pub fn set_role_category(
        &mut self,
        participant_id: Uuid,
        role_index: usize,
        category: RoleCategory,
    ) -> Result<()> {
        let existing = self.category_count(category, Some((participant_id, role_index)));
        let release_id = self.release_id.clone();

        let participant = self
            .participant_mut(participant_id)
            .ok_or_else(|| Error::NotFound(format!("participant {participant_id}")))?;
        let display_name = participant.display_name();

        let holds_elsewhere = participant
            .roles
            .iter()
            .enumerate()
            .any(|(idx, r)| idx != role_index && r.category == category);
        if holds_elsewhere {
            return Err(Error::DuplicateRole {
                participant: display_name,
                category,
            });
        }

        let role = participant
            .roles
            .get_mut(role_index)
            .ok_or_else(|| Error::NotFound(format!("role #{role_index}")))?;

        role.category = category;
        role.entry_id = entry_id::entry_id(category, release_id.as_deref(), existing);
        if category.is_zero_weight() {
            role.percent = 0.0;
        }
        Ok(())
    }

    /// Set a role's percentage.
    ///
    /// Zero-weight categories keep their fixed 0% and reject the edit;
    /// values outside 0-100 are rejected.
    pub fn set_role_percent(
        &mut self,
        participant_id: Uuid,
        role_index: usize,
        percent: f64,
    ) -> Result<()> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(Error::InvalidInput(format!(
                "percentage must be between 0 and 100 (got {percent})"
            )));
        }

        let role = self
            .participant_mut(participant_id)
            .ok_or_else(|| Error::NotFound(format!("participant {participant_id}")))?
            .roles
            .get_mut(role_index)
            .ok_or_else(|| Error::NotFound(format!("role #{role_index}")))?;

        if role.category.is_zero_weight() {
            return Err(Error::FixedZeroCategory(role.category));
        }
        role.percent = percent;
        Ok(())
    }

    /// Set a role's free-text notes
    pub fn set_role_notes(
        &mut self,
        participant_id: Uuid,
        role_index: usize,
        notes: String,
    ) -> Result<()> {
        let role = self
            .participant_mut(participant_id)
            .ok_or_else(|| Error::NotFound(format!("participant {participant_id}")))?
            .roles
            .get_mut(role_index)
            .ok_or_else(|| Error::NotFound(format!("role #{role_index}")))?;
        role.notes = notes;
        Ok(())
    }

    /// Remove a role by position
    pub fn remove_role(&mut self, participant_id: Uuid, role_index: usize) -> Result<()> {
        let participant = self
            .participant_mut(participant_id)
            .ok_or_else(|| Error::NotFound(format!("participant {participant_id}")))?;
        if role_index >= participant.roles.len() {
            return Err(Error::NotFound(format!("role #{role_index}")));
        }
        participant.roles.remove(role_index);
        Ok(())
    }
}
