//! Working-copy editing API
//!
//! Form interactions mutate the in-memory working copy through these
//! handlers. Every role edit goes through the `Splitsheet` methods so the
//! duplicate-category and fixed-zero invariants are enforced at the edit,
//! not at submission time.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wtm_common::api::AudioAttachment;
use wtm_common::model::{
    Participant, PaymentStatus, Pricing, Role, RoleCategory, SignatureInfo, Splitsheet,
};
use wtm_common::Error;

use super::ApiError;
use crate::AppState;

/// Response to POST /splitsheet
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

/// POST /splitsheet
///
/// Open a new editing session with an empty working copy.
pub async fn create_sheet(State(state): State<AppState>) -> Json<CreatedResponse> {
    let id = state.sessions.create().await;
    Json(CreatedResponse { id })
}

/// GET /splitsheet/:id
pub async fn get_sheet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Splitsheet>, ApiError> {
    Ok(Json(state.sessions.sheet(id).await?))
}

/// Sheet-level field updates; absent fields are left untouched
#[derive(Debug, Deserialize)]
pub struct UpdateSheetRequest {
    pub title: Option<String>,
    /// Normalized on write; an empty string clears the identifier
    pub release_id: Option<String>,
    pub work_id: Option<String>,
    pub product_code: Option<String>,
    pub agreement_date: Option<NaiveDate>,
    pub payment_status: Option<PaymentStatus>,
    pub pricing: Option<Pricing>,
}

/// PUT /splitsheet/:id
pub async fn update_sheet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSheetRequest>,
) -> Result<Json<Splitsheet>, ApiError> {
    let sheet = state
        .sessions
        .with_session(id, |session| {
            let sheet = &mut session.sheet;
            if let Some(title) = request.title {
                sheet.title = title;
            }
            if let Some(release_id) = request.release_id {
                sheet.set_release_id(&release_id);
            }
            if let Some(work_id) = request.work_id {
                sheet.work_id = Some(work_id).filter(|s| !s.trim().is_empty());
            }
            if let Some(product_code) = request.product_code {
                sheet.product_code = Some(product_code).filter(|s| !s.trim().is_empty());
            }
            if let Some(date) = request.agreement_date {
                sheet.agreement_date = Some(date);
            }
            if let Some(status) = request.payment_status {
                sheet.payment_status = status;
            }
            if let Some(pricing) = request.pricing {
                sheet.pricing = pricing;
            }
            Ok(sheet.clone())
        })
        .await?;
    Ok(Json(sheet))
}

/// DELETE /splitsheet/:id
///
/// Abandon the form: the working copy is discarded, nothing was persisted.
pub async fn discard_sheet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sessions.discard(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /splitsheet/:id/participants
///
/// Add an empty participant row, as the form does.
pub async fn add_participant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Participant>, ApiError> {
    let participant = state
        .sessions
        .with_session(id, |session| {
            let pid = session.sheet.add_participant();
            Ok(session.sheet.participant(pid).unwrap().clone())
        })
        .await?;
    Ok(Json(participant))
}

/// Participant field updates; absent fields are left untouched
#[derive(Debug, Deserialize)]
pub struct UpdateParticipantRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub society_id: Option<String>,
    pub society_affiliation: Option<String>,
    pub national_id: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub linked_account: Option<Uuid>,
    pub signed: Option<bool>,
    pub signature_text: Option<String>,
}

/// PUT /splitsheet/:id/participants/:pid
pub async fn update_participant(
    State(state): State<AppState>,
    Path((id, pid)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateParticipantRequest>,
) -> Result<Json<Participant>, ApiError> {
    let participant = state
        .sessions
        .with_session(id, |session| {
            let participant = session
                .sheet
                .participant_mut(pid)
                .ok_or_else(|| Error::NotFound(format!("participant {pid}")))?;
            if let Some(name) = request.name {
                participant.name = name;
            }
            if let Some(email) = request.email {
                participant.email = email;
            }
            if let Some(address) = request.address {
                participant.address = address;
            }
            if let Some(phone) = request.phone {
                participant.phone = Some(phone).filter(|s| !s.trim().is_empty());
            }
            if let Some(society_id) = request.society_id {
                participant.society_id = Some(society_id).filter(|s| !s.trim().is_empty());
            }
            if let Some(affiliation) = request.society_affiliation {
                participant.society_affiliation =
                    Some(affiliation).filter(|s| !s.trim().is_empty());
            }
            if let Some(national_id) = request.national_id {
                participant.national_id = Some(national_id).filter(|s| !s.trim().is_empty());
            }
            if let Some(date_of_birth) = request.date_of_birth {
                participant.date_of_birth = Some(date_of_birth);
            }
            if let Some(account) = request.linked_account {
                participant.linked_account = Some(account);
            }
            if let Some(signed) = request.signed {
                participant.signed = signed;
                participant.signature = signed.then(|| SignatureInfo {
                    signed_at: Utc::now(),
                    signature_text: request.signature_text.clone().unwrap_or_default(),
                });
            }
            Ok(participant.clone())
        })
        .await?;
    Ok(Json(participant))
}

/// DELETE /splitsheet/:id/participants/:pid
pub async fn remove_participant(
    State(state): State<AppState>,
    Path((id, pid)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .with_session(id, |session| session.sheet.remove_participant(pid))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Role creation request. The category defaults to songwriting, as the
/// form does when a role row is added.
#[derive(Debug, Default, Deserialize)]
pub struct AddRoleRequest {
    #[serde(default)]
    pub category: RoleCategory,
    pub notes: Option<String>,
}

/// POST /splitsheet/:id/participants/:pid/roles
pub async fn add_role(
    State(state): State<AppState>,
    Path((id, pid)): Path<(Uuid, Uuid)>,
    Json(request): Json<AddRoleRequest>,
) -> Result<Json<Role>, ApiError> {
    let role = state
        .sessions
        .with_session(id, |session| {
            session.sheet.add_role(pid, request.category)?;
            let participant = session.sheet.participant_mut(pid).unwrap();
            let role = participant.roles.last_mut().unwrap();
            if let Some(notes) = request.notes {
                role.notes = notes;
            }
            Ok(role.clone())
        })
        .await?;
    Ok(Json(role))
}

/// Role field updates; absent fields are left untouched
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// Changing the category recomputes the entry identifier
    pub category: Option<RoleCategory>,
    pub percent: Option<f64>,
    pub notes: Option<String>,
}

/// PUT /splitsheet/:id/participants/:pid/roles/:index
///
/// All-or-nothing: the steps run against a scratch copy and are committed
/// only when every one succeeds, so a rejected edit is never applied.
pub async fn update_role(
    State(state): State<AppState>,
    Path((id, pid, index)): Path<(Uuid, Uuid, usize)>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<Role>, ApiError> {
    let role = state
        .sessions
        .with_session(id, |session| {
            let mut sheet = session.sheet.clone();
            if let Some(category) = request.category {
                sheet.set_role_category(pid, index, category)?;
            }
            if let Some(percent) = request.percent {
                sheet.set_role_percent(pid, index, percent)?;
            }
            if let Some(notes) = request.notes {
                sheet.set_role_notes(pid, index, notes)?;
            }
            let role = sheet
                .participant(pid)
                .and_then(|p| p.roles.get(index))
                .ok_or_else(|| Error::NotFound(format!("role #{index}")))?
                .clone();
            session.sheet = sheet;
            Ok(role)
        })
        .await?;
    Ok(Json(role))
}

/// DELETE /splitsheet/:id/participants/:pid/roles/:index
pub async fn remove_role(
    State(state): State<AppState>,
    Path((id, pid, index)): Path<(Uuid, Uuid, usize)>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .with_session(id, |session| session.sheet.remove_role(pid, index))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /splitsheet/:id/audio
///
/// Attach the audio artifact for this sheet. Pure client-side guard:
/// audio MIME types only, at most 50 MiB, rejected before any submission
/// is attempted.
pub async fn attach_audio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let file_name = headers
        .get("x-file-name")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("attachment")
        .to_string();

    let attachment = AudioAttachment::new(file_name, content_type, body.to_vec())?;
    state
        .sessions
        .with_session(id, |session| {
            session.audio = Some(attachment);
            Ok(())
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /splitsheet/:id/audio
pub async fn detach_audio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .with_session(id, |session| {
            session.audio = None;
            Ok(())
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
