//! HTTP client for the managed backend that owns all Chispa data.
//!
//! The backend exposes a PostgREST data API (tables and RPC procedures under
//! `/rest/v1`) and a GoTrue auth API under `/auth/v1`. Every call sends the
//! project's anon key as `apikey` and the caller's access token as bearer.

mod auth;
mod client;
mod error;
mod tables;
mod visits;

pub use auth::{AuthSession, AuthUser, SignUpMetadata};
pub use client::BackendClient;
pub use error::BackendError;
