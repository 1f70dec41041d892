//! Server-rendered pages.
//!
//! - `GET  /`: promoter roster
//! - `GET  /promotor/{email}`: one promoter's visits (`?expanded=<id>`)
//! - `GET  /login`, `POST /login`: password sign-in
//! - `POST /logout`: end the session
//! - `GET  /admin/...`: admin dashboard and CRUD screens
//! - `GET  /health`: liveness probe (JSON)

mod admin;
mod auth;
mod visits;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chispa_backend::{BackendClient, BackendError};
use chispa_core::{session::SESSION_REQUIRED, ViewError};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::html;
use crate::middleware::{request_id, require_admin, resolve_session, RequestId};
use crate::notice::Notice;
use crate::sessions::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
    pub sessions: SessionStore,
    /// Adds `Secure` to the session cookie.
    pub secure_cookies: bool,
}

impl AppState {
    #[must_use]
    pub fn new(backend: BackendClient, session_ttl: Duration, secure_cookies: bool) -> Self {
        Self {
            backend,
            sessions: SessionStore::new(session_ttl),
            secure_cookies,
        }
    }
}

/// Query parameter carrying a [`Notice`] across a redirect.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NoticeQuery {
    pub aviso: Option<String>,
}

impl NoticeQuery {
    pub(crate) fn notice(&self) -> Option<Notice> {
        self.aviso.as_deref().and_then(Notice::from_code)
    }
}

/// Turns a [`ViewError`] into a response: auth failures redirect with a
/// notice, everything else renders an error page.
#[derive(Debug)]
pub(crate) struct PageError {
    error: ViewError,
    context: &'static str,
}

impl PageError {
    /// Sentence appended after the error message, naming what failed to load.
    pub(crate) fn context(mut self, context: &'static str) -> Self {
        self.context = context;
        self
    }
}

impl From<ViewError> for PageError {
    fn from(error: ViewError) -> Self {
        Self {
            error,
            context: "Por favor, inténtalo de nuevo.",
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = match &self.error {
            ViewError::Unauthenticated(_) => {
                return Notice::SessionRequired.redirect("/login").into_response()
            }
            ViewError::Forbidden(_) => return Notice::AccessDenied.redirect("/").into_response(),
            ViewError::NotFound(_) => StatusCode::NOT_FOUND,
            ViewError::Fetch(_) => StatusCode::BAD_GATEWAY,
        };
        let body = html::error_banner(&format!("Error: {}. {}", self.error, self.context));
        (status, Html(html::layout("Error", None, &body))).into_response()
    }
}

/// Maps a backend failure onto the view error taxonomy.
///
/// A rejected token means the backend session is gone, so the user must sign
/// in again; anything else is shown verbatim.
pub(crate) fn view_error(error: &BackendError) -> ViewError {
    match error.status() {
        Some(401) => ViewError::Unauthenticated(SESSION_REQUIRED.to_string()),
        _ => {
            tracing::error!(error = %error, "backend call failed");
            ViewError::fetch(error)
        }
    }
}

/// Response for a view load whose session ended while it was fetching.
pub(crate) fn stale_load(view: &'static str) -> Response {
    tracing::debug!(view, "dropping load of abandoned view");
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    request_id: String,
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        request_id: req_id.0,
    })
}

pub fn build_app(state: AppState) -> Router {
    let admin_routes = admin::router().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        require_admin,
    ));

    Router::new()
        .route("/", get(visits::roster))
        .route("/promotor/{email}", get(visits::promoter_detail))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/health", get(health))
        .merge(admin_routes)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                ))
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    resolve_session,
                )),
        )
        .with_state(state)
}
