//! RPC procedures: the visit aggregation and the admin role check.

use chispa_core::Visit;

use crate::client::BackendClient;
use crate::error::BackendError;

const VISITS_RPC: &str = "rest/v1/rpc/get_full_visit_details";
const IS_ADMIN_RPC: &str = "rest/v1/rpc/is_app_admin";

impl BackendClient {
    /// Every visit visible to the caller, nested product arrays included.
    ///
    /// The procedure takes no arguments and returns the whole table; rows come
    /// back in backend order and are not deduplicated.
    ///
    /// # Errors
    ///
    /// - [`BackendError::Api`] if the backend rejects the call.
    /// - [`BackendError::Http`] on network failure.
    /// - [`BackendError::Deserialize`] if a row does not match [`Visit`].
    pub async fn fetch_visits(&self, token: &str) -> Result<Vec<Visit>, BackendError> {
        let url = self.build_url(VISITS_RPC, &[])?;
        let request = self.http_post(url, Some(token)).json(&serde_json::json!({}));
        let visits: Vec<Visit> = Self::send_json(request, "get_full_visit_details").await?;
        tracing::debug!(rows = visits.len(), "fetched full visit list");
        Ok(visits)
    }

    /// Whether the caller holds the admin role.
    ///
    /// # Errors
    ///
    /// Returns any transport or API error; callers treat a failed check as
    /// "not verified", never as "not admin".
    pub async fn is_app_admin(&self, token: &str) -> Result<bool, BackendError> {
        let url = self.build_url(IS_ADMIN_RPC, &[])?;
        let request = self.http_post(url, Some(token)).json(&serde_json::json!({}));
        let flag: Option<bool> = Self::send_json(request, "is_app_admin").await?;
        Ok(flag.unwrap_or(false))
    }
}
