//! wtm-ss library - Splitsheet Service module
//!
//! Owns in-memory splitsheet working copies (one editing session per
//! working copy), exposes the form-edit operations over HTTP, computes
//! split summaries on demand, and hands validated sheets to the external
//! creation endpoint.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use wtm_common::config::{IssuerConfig, ServiceConfig};
use wtm_common::validate::ValidationOptions;

pub mod api;
pub mod sessions;
pub mod submit;

use sessions::SessionStore;
use submit::SubmissionClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Working-copy sessions, keyed by session id
    pub sessions: Arc<SessionStore>,
    /// Client for the external creation/notification endpoint
    pub client: Arc<SubmissionClient>,
    /// Accepted release-identifier issuers
    pub issuer: IssuerConfig,
    /// Submission gate policy
    pub options: ValidationOptions,
}

impl AppState {
    /// Create application state from resolved configuration
    pub fn new(config: &ServiceConfig) -> Self {
        AppState {
            sessions: Arc::new(SessionStore::new()),
            client: Arc::new(SubmissionClient::new(
                config.submission_url.clone(),
                config.submission_timeout_secs,
            )),
            issuer: config.issuer.clone(),
            options: ValidationOptions {
                enforce_balance: config.enforce_balance,
            },
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::extract::DefaultBodyLimit;
    use axum::routing::{get, post, put};
    use wtm_common::api::MAX_AUDIO_BYTES;

    let sheets = Router::new()
        .route("/splitsheet", post(api::create_sheet))
        .route(
            "/splitsheet/:id",
            get(api::get_sheet).put(api::update_sheet).delete(api::discard_sheet),
        )
        .route("/splitsheet/:id/participants", post(api::add_participant))
        .route(
            "/splitsheet/:id/participants/:pid",
            put(api::update_participant).delete(api::remove_participant),
        )
        .route(
            "/splitsheet/:id/participants/:pid/roles",
            post(api::add_role),
        )
        .route(
            "/splitsheet/:id/participants/:pid/roles/:index",
            put(api::update_role).delete(api::remove_role),
        )
        .route(
            "/splitsheet/:id/audio",
            put(api::attach_audio)
                .delete(api::detach_audio)
                // Allow the full attachment plus headroom for framing
                .layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES + 1024)),
        )
        .route("/splitsheet/:id/summary", get(api::get_summary))
        .route("/splitsheet/:id/submit", post(api::submit_sheet));

    Router::new()
        .merge(sheets)
        .merge(api::health_routes())
        .route("/build-info", get(api::get_build_info))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
