//! Explicit session context threaded into every view.
//!
//! A request either carries a signed-in [`Session`] or nothing, and either has
//! a resolved [`Clearance`] or not yet. Views ask the context for what they
//! need instead of consulting any process-wide auth state.

use serde::Serialize;

use crate::view::{LoadGeneration, ViewError};

pub const SESSION_REQUIRED: &str = "Inicia sesión para continuar.";
pub const ACCESS_DENIED: &str = "Acceso denegado. No tienes permisos de administrador.";
pub const ROLE_CHECK_FAILED: &str =
    "Error al verificar permisos de administrador. Por favor, inicia sesión de nuevo.";

/// What the role check granted the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Clearance {
    Admin,
    Viewer,
}

impl Clearance {
    /// Maps the boolean returned by the backend's `is_app_admin` check.
    #[must_use]
    pub fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin {
            Clearance::Admin
        } else {
            Clearance::Viewer
        }
    }
}

impl std::fmt::Display for Clearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Clearance::Admin => write!(f, "admin"),
            Clearance::Viewer => write!(f, "viewer"),
        }
    }
}

/// A signed-in user as seen by this service.
#[derive(Clone)]
pub struct Session {
    /// Opaque id stored in the browser cookie.
    pub id: String,
    pub user_id: String,
    pub email: String,
    /// Backend access token, sent as the bearer on every backend call.
    pub access_token: String,
    /// Guards the views this session loads against stale results.
    pub loads: LoadGeneration,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &"[redacted]")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"[redacted]")
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    session: Option<Session>,
    clearance: Option<Clearance>,
}

impl SessionContext {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn signed_in(session: Session) -> Self {
        Self {
            session: Some(session),
            clearance: None,
        }
    }

    #[must_use]
    pub fn with_clearance(mut self, clearance: Clearance) -> Self {
        self.clearance = Some(clearance);
        self
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn clearance(&self) -> Option<Clearance> {
        self.clearance
    }

    /// # Errors
    ///
    /// Returns [`ViewError::Unauthenticated`] when nobody is signed in.
    pub fn require_session(&self) -> Result<&Session, ViewError> {
        self.session
            .as_ref()
            .ok_or_else(|| ViewError::Unauthenticated(SESSION_REQUIRED.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`ViewError::Unauthenticated`] when nobody is signed in and
    /// [`ViewError::Forbidden`] when the role check did not grant admin.
    pub fn require_admin(&self) -> Result<&Session, ViewError> {
        let session = self.require_session()?;
        match self.clearance {
            Some(Clearance::Admin) => Ok(session),
            _ => Err(ViewError::Forbidden(ACCESS_DENIED.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            id: "sid".to_string(),
            user_id: "user-1".to_string(),
            email: "admin@chispa.test".to_string(),
            access_token: "secret-token".to_string(),
            loads: LoadGeneration::new(),
        }
    }

    #[test]
    fn anonymous_context_requires_login() {
        let ctx = SessionContext::anonymous();
        assert!(matches!(
            ctx.require_session(),
            Err(ViewError::Unauthenticated(_))
        ));
        assert!(matches!(
            ctx.require_admin(),
            Err(ViewError::Unauthenticated(_))
        ));
    }

    #[test]
    fn signed_in_without_clearance_is_not_admin() {
        let ctx = SessionContext::signed_in(session());
        assert!(ctx.require_session().is_ok());
        assert_eq!(
            ctx.require_admin().unwrap_err(),
            ViewError::Forbidden(ACCESS_DENIED.to_string())
        );
    }

    #[test]
    fn viewer_clearance_is_forbidden_from_admin() {
        let ctx = SessionContext::signed_in(session())
            .with_clearance(Clearance::from_admin_flag(false));
        assert!(matches!(ctx.require_admin(), Err(ViewError::Forbidden(_))));
    }

    #[test]
    fn admin_clearance_passes_gate() {
        let ctx = SessionContext::signed_in(session())
            .with_clearance(Clearance::from_admin_flag(true));
        assert_eq!(ctx.require_admin().expect("admin").user_id, "user-1");
    }

    #[test]
    fn debug_redacts_tokens() {
        let rendered = format!("{:?}", session());
        assert!(!rendered.contains("secret-token"));
        assert!(!rendered.contains("sid"));
    }
}
