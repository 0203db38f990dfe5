//! In-memory working-copy sessions
//!
//! Each splitsheet under construction is owned by exactly one editing
//! session; there is no shared mutable state across sessions, so a single
//! map behind one async mutex is sufficient. A session also tracks its
//! optional audio attachment and whether a submission is in flight
//! (at most one per working copy).

use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;
use wtm_common::api::AudioAttachment;
use wtm_common::model::Splitsheet;
use wtm_common::{Error, Result};

/// One editing session's state
#[derive(Debug, Default)]
pub struct Session {
    pub sheet: Splitsheet,
    pub audio: Option<AudioAttachment>,
    /// True while a submission request is outstanding
    pub submitting: bool,
}

/// All live working-copy sessions
pub struct SessionStore {
    inner: Mutex<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Create an empty working copy and return its session id
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.lock().await.insert(id, Session::default());
        id
    }

    /// Run a closure against a session's mutable state
    pub async fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<R>,
    ) -> Result<R> {
        let mut sessions = self.inner.lock().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("splitsheet session {id}")))?;
        f(session)
    }

    /// Snapshot a session's sheet
    pub async fn sheet(&self, id: Uuid) -> Result<Splitsheet> {
        self.with_session(id, |s| Ok(s.sheet.clone())).await
    }

    /// Discard a working copy (user abandoned the form).
    /// Nothing was persisted, so no compensating action is needed.
    pub async fn discard(&self, id: Uuid) -> Result<()> {
        match self.inner.lock().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound(format!("splitsheet session {id}"))),
        }
    }

    /// Begin a submission: marks the session in-flight and returns a
    /// terminal snapshot of the sheet and attachment.
    ///
    /// Fails when a submission is already outstanding for this session.
    pub async fn begin_submit(&self, id: Uuid) -> Result<(Splitsheet, Option<AudioAttachment>)> {
        let mut sessions = self.inner.lock().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("splitsheet session {id}")))?;
        if session.submitting {
            return Err(Error::SubmissionInFlight);
        }
        session.submitting = true;
        Ok((session.sheet.clone(), session.audio.clone()))
    }

    /// Finish a submission. Success clears the working copy; failure
    /// leaves it intact (and editable) for retry.
    pub async fn finish_submit(&self, id: Uuid, success: bool) {
        let mut sessions = self.inner.lock().await;
        if success {
            sessions.remove(&id);
        } else if let Some(session) = sessions.get_mut(&id) {
            session.submitting = false;
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore::new()
    }
}
