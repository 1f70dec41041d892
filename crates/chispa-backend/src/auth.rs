//! Password authentication against the backend's auth API.

use serde::{Deserialize, Serialize};

use crate::client::BackendClient;
use crate::error::BackendError;

/// The authenticated user as reported by the auth API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens issued by a successful password grant.
#[derive(Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"[redacted]")
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// User metadata attached at sign-up; the backend copies it into the
/// `user_profiles` row it creates for the account.
#[derive(Debug, Clone, Serialize)]
pub struct SignUpMetadata<'a> {
    pub name: &'a str,
    pub role: &'a str,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

/// Sign-up answers with the user itself when confirmation is pending and with
/// a full session (user nested) when auto-confirm is on.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session { user: AuthUser },
    User(AuthUser),
}

impl BackendClient {
    /// Exchanges email and password for an access token.
    ///
    /// # Errors
    ///
    /// [`BackendError::Api`] carries the backend's message for bad
    /// credentials; transport and decoding errors as usual.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        let url = self.build_url("auth/v1/token", &[("grant_type", "password")])?;
        let request = self
            .http_post(url, None)
            .json(&Credentials { email, password });
        let session: AuthSession = Self::send_json(request, "token?grant_type=password").await?;
        tracing::info!(user_id = %session.user.id, "signed in");
        Ok(session)
    }

    /// The user owning `token`.
    ///
    /// # Errors
    ///
    /// [`BackendError::Api`] with status 401 or 403 for an expired or revoked
    /// token.
    pub async fn get_user(&self, token: &str) -> Result<AuthUser, BackendError> {
        let url = self.build_url("auth/v1/user", &[])?;
        Self::send_json(self.http_get(url, Some(token)), "auth/v1/user").await
    }

    /// Revokes `token` on the backend.
    ///
    /// # Errors
    ///
    /// Returns any transport or API error.
    pub async fn sign_out(&self, token: &str) -> Result<(), BackendError> {
        let url = self.build_url("auth/v1/logout", &[])?;
        Self::send(self.http_post(url, Some(token))).await?;
        Ok(())
    }

    /// Registers a new account and returns its user.
    ///
    /// Called with the admin's token so the backend can attribute the
    /// registration; the new user's own session, if any, is discarded.
    ///
    /// # Errors
    ///
    /// [`BackendError::Api`] for rejected sign-ups (duplicate email, weak
    /// password); [`BackendError::Unexpected`] if no user id comes back.
    pub async fn sign_up(
        &self,
        token: &str,
        email: &str,
        password: &str,
        metadata: SignUpMetadata<'_>,
    ) -> Result<AuthUser, BackendError> {
        let url = self.build_url("auth/v1/signup", &[])?;
        let request = self.http_post(url, Some(token)).json(&SignUpRequest {
            email,
            password,
            data: metadata,
        });
        let response: SignUpResponse = Self::send_json(request, "auth/v1/signup").await?;
        let user = match response {
            SignUpResponse::Session { user } | SignUpResponse::User(user) => user,
        };
        if user.id.is_empty() {
            return Err(BackendError::Unexpected(
                "sign-up returned no user id".to_string(),
            ));
        }
        tracing::info!(user_id = %user.id, "registered new user");
        Ok(user)
    }
}
