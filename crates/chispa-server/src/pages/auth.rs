use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use chispa_core::SessionContext;
use serde::Deserialize;

use crate::html::{self, Input};
use crate::notice::Notice;
use crate::sessions::{clear_session_cookie, session_cookie};

use super::{AppState, NoticeQuery};

#[derive(Deserialize)]
pub(super) struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

fn login_page(email: &str, error: Option<&str>, notice: Option<Notice>) -> String {
    let mut body = String::from("<h1 class=\"main-title\">Iniciar Sesión</h1>");
    if let Some(error) = error {
        body.push_str(&html::error_banner(error));
    }
    body.push_str("<form method=\"post\" action=\"/login\" class=\"login-form\">");
    body.push_str(&Input::text("email", "Email", email).kind("email").required().render());
    body.push_str(&Input::text("password", "Contraseña", "").kind("password").required().render());
    body.push_str("<button type=\"submit\" class=\"button primary\">Iniciar Sesión</button></form>");
    html::layout("Iniciar Sesión", notice, &body)
}

pub(super) async fn login_form(Query(query): Query<NoticeQuery>) -> Html<String> {
    Html(login_page("", None, query.notice()))
}

/// Signs in against the backend and starts a server-side session.
///
/// Any session the browser already had is ended first.
pub(super) async fn login(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.trim();

    let auth = match state
        .backend
        .sign_in_with_password(email, &form.password)
        .await
    {
        Ok(auth) => auth,
        Err(e) => {
            tracing::warn!(error = %e, "sign-in rejected");
            let message = format!("Error al iniciar sesión: {e}");
            return (
                StatusCode::UNAUTHORIZED,
                Html(login_page(email, Some(&message), None)),
            )
                .into_response();
        }
    };

    if let Some(previous) = ctx.session() {
        previous.loads.abandon();
        state.sessions.remove(&previous.id).await;
    }

    let user_email = auth.user.email.as_deref().unwrap_or(email);
    let session = state
        .sessions
        .create(&auth.user.id, user_email, &auth.access_token)
        .await;
    tracing::info!(user_id = %session.user_id, "session started");

    let cookie = session_cookie(&session.id, state.sessions.ttl(), state.secure_cookies);
    let mut res = Redirect::to("/admin").into_response();
    match HeaderValue::from_str(&cookie) {
        Ok(val) => {
            res.headers_mut().insert(SET_COOKIE, val);
        }
        Err(e) => tracing::error!(error = %e, "session cookie is not a valid header"),
    }
    res
}

/// Ends the session locally and on the backend.
///
/// The local session is gone even when the backend sign-out fails.
pub(super) async fn logout(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> Response {
    if let Some(session) = ctx.session() {
        session.loads.abandon();
        state.sessions.remove(&session.id).await;
        if let Err(e) = state.backend.sign_out(&session.access_token).await {
            tracing::warn!(user_id = %session.user_id, error = %e, "backend sign-out failed");
        } else {
            tracing::info!(user_id = %session.user_id, "signed out");
        }
    }

    let mut res = Notice::SignedOut.redirect("/login").into_response();
    if let Ok(val) = HeaderValue::from_str(&clear_session_cookie(state.secure_cookies)) {
        res.headers_mut().insert(SET_COOKIE, val);
    }
    res
}
