use axum::{
    extract::{Request, State},
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use chispa_core::{Clearance, SessionContext};
use uuid::Uuid;

use crate::notice::Notice;
use crate::pages::AppState;
use crate::sessions::{clear_session_cookie, SESSION_COOKIE};

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Axum middleware that extracts or generates a request ID.
///
/// An incoming `x-request-id` header is reused; otherwise a new `UUIDv4` is
/// generated. The ID is inserted into request extensions as [`RequestId`] and
/// echoed on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Resolves the session cookie into a [`SessionContext`] extension.
///
/// Every request gets a context; unknown or expired ids yield an anonymous
/// one. Nothing is rejected here.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = match session_id(req.headers()) {
        Some(id) => match state.sessions.get(id).await {
            Some(session) => SessionContext::signed_in(session),
            None => SessionContext::anonymous(),
        },
        None => SessionContext::anonymous(),
    };
    req.extensions_mut().insert(ctx);
    next.run(req).await
}

/// Gate in front of every admin route.
///
/// Runs the backend role check on each request. A failed check ends the
/// session and sends the user to log in again; a negative answer sends them
/// back to the visit list.
pub async fn require_admin(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let ctx = req
        .extensions()
        .get::<SessionContext>()
        .cloned()
        .unwrap_or_default();

    let Some(session) = ctx.session() else {
        return Notice::SessionRequired.redirect("/login").into_response();
    };

    match state.backend.is_app_admin(&session.access_token).await {
        Ok(true) => {
            req.extensions_mut()
                .insert(ctx.clone().with_clearance(Clearance::Admin));
            next.run(req).await
        }
        Ok(false) => {
            tracing::warn!(user_id = %session.user_id, path = %req.uri().path(), "admin access denied");
            Notice::AccessDenied.redirect("/").into_response()
        }
        Err(e) => {
            tracing::warn!(user_id = %session.user_id, error = %e, "admin role check failed");
            session.loads.abandon();
            state.sessions.remove(&session.id).await;
            let mut res = Notice::RoleCheckFailed.redirect("/login").into_response();
            if let Ok(val) = HeaderValue::from_str(&clear_session_cookie(state.secure_cookies)) {
                res.headers_mut().insert(SET_COOKIE, val);
            }
            res
        }
    }
}

/// The session id from the `Cookie` header(s), if present.
pub(crate) fn session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
