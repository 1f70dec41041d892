//! One-shot notices carried across redirects in the `aviso` query parameter.

use axum::response::Redirect;
use chispa_core::session::{ACCESS_DENIED, ROLE_CHECK_FAILED, SESSION_REQUIRED};

pub const NOTICE_PARAM: &str = "aviso";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    AccessDenied,
    SessionRequired,
    RoleCheckFailed,
    SignedOut,
    Created,
    Updated,
    Deleted,
}

const ALL: [Notice; 7] = [
    Notice::AccessDenied,
    Notice::SessionRequired,
    Notice::RoleCheckFailed,
    Notice::SignedOut,
    Notice::Created,
    Notice::Updated,
    Notice::Deleted,
];

impl Notice {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Notice::AccessDenied => "acceso-denegado",
            Notice::SessionRequired => "sesion-requerida",
            Notice::RoleCheckFailed => "verificacion-fallida",
            Notice::SignedOut => "sesion-cerrada",
            Notice::Created => "creado",
            Notice::Updated => "actualizado",
            Notice::Deleted => "eliminado",
        }
    }

    /// Unknown codes are ignored rather than shown.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        ALL.into_iter().find(|n| n.code() == code)
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Notice::AccessDenied => ACCESS_DENIED,
            Notice::SessionRequired => SESSION_REQUIRED,
            Notice::RoleCheckFailed => ROLE_CHECK_FAILED,
            Notice::SignedOut => "Sesión cerrada correctamente.",
            Notice::Created => "Registro añadido con éxito.",
            Notice::Updated => "Registro actualizado con éxito.",
            Notice::Deleted => "Registro eliminado con éxito.",
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Notice::AccessDenied | Notice::SessionRequired | Notice::RoleCheckFailed
        )
    }

    /// `303 See Other` to `path` with this notice attached.
    #[must_use]
    pub fn redirect(self, path: &str) -> Redirect {
        Redirect::to(&format!("{path}?{NOTICE_PARAM}={}", self.code()))
    }
}
