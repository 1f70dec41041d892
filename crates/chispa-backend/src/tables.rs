//! Generic CRUD over the catalog tables.
//!
//! Tables are addressed through [`chispa_core::Table`], so one set of
//! PostgREST calls serves every admin screen.

use chispa_core::catalog::{UserProfile, UserProfilePayload};
use chispa_core::Table;
use serde::Serialize;

use crate::client::BackendClient;
use crate::error::BackendError;

fn table_path<T: Table>() -> String {
    format!("rest/v1/{}", T::NAME)
}

fn eq_filter(id: &str) -> String {
    format!("eq.{id}")
}

/// A profile row keyed by the auth user it belongs to.
#[derive(Serialize)]
struct ProfileRow<'a> {
    id: &'a str,
    #[serde(flatten)]
    profile: &'a UserProfilePayload,
}

impl BackendClient {
    /// All rows of `T`, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns any transport, API or decoding error.
    pub async fn list<T: Table>(&self, token: &str) -> Result<Vec<T>, BackendError> {
        let url = self.build_url(
            &table_path::<T>(),
            &[("select", "*"), ("order", "name.asc")],
        )?;
        let rows: Vec<T> = Self::send_json(self.http_get(url, Some(token)), T::NAME).await?;
        tracing::debug!(table = T::NAME, rows = rows.len(), "listed table");
        Ok(rows)
    }

    /// One row of `T` by id, or `None` if it does not exist (or is hidden
    /// from the caller).
    ///
    /// # Errors
    ///
    /// Returns any transport, API or decoding error.
    pub async fn get<T: Table>(&self, token: &str, id: &str) -> Result<Option<T>, BackendError> {
        let filter = eq_filter(id);
        let url = self.build_url(
            &table_path::<T>(),
            &[("select", "*"), ("id", filter.as_str())],
        )?;
        let rows: Vec<T> = Self::send_json(self.http_get(url, Some(token)), T::NAME).await?;
        Ok(rows.into_iter().next())
    }

    /// # Errors
    ///
    /// Returns any transport or API error (constraint violations included).
    pub async fn insert<T: Table>(
        &self,
        token: &str,
        payload: &T::Payload,
    ) -> Result<(), BackendError> {
        let url = self.build_url(&table_path::<T>(), &[])?;
        let request = self
            .http_post(url, Some(token))
            .header("Prefer", "return=minimal")
            .json(payload);
        Self::send(request).await?;
        tracing::info!(table = T::NAME, "inserted row");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns any transport or API error.
    pub async fn update<T: Table>(
        &self,
        token: &str,
        id: &str,
        payload: &T::Payload,
    ) -> Result<(), BackendError> {
        let filter = eq_filter(id);
        let url = self.build_url(&table_path::<T>(), &[("id", filter.as_str())])?;
        let request = self
            .http_patch(url, Some(token))
            .header("Prefer", "return=minimal")
            .json(payload);
        Self::send(request).await?;
        tracing::info!(table = T::NAME, id, "updated row");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns any transport or API error, e.g. a foreign-key violation when
    /// other rows still reference this one.
    pub async fn delete<T: Table>(&self, token: &str, id: &str) -> Result<(), BackendError> {
        let filter = eq_filter(id);
        let url = self.build_url(&table_path::<T>(), &[("id", filter.as_str())])?;
        Self::send(self.http_delete(url, Some(token))).await?;
        tracing::info!(table = T::NAME, id, "deleted row");
        Ok(())
    }

    /// Rows of `T` whose `column` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns any transport, API or decoding error.
    pub async fn find_by<T: Table>(
        &self,
        token: &str,
        column: &str,
        value: &str,
    ) -> Result<Vec<T>, BackendError> {
        let filter = eq_filter(value);
        let url = self.build_url(
            &table_path::<T>(),
            &[("select", "*"), (column, filter.as_str())],
        )?;
        Self::send_json(self.http_get(url, Some(token)), T::NAME).await
    }

    /// Creates the profile row for a freshly registered auth user.
    ///
    /// # Errors
    ///
    /// Returns any transport or API error.
    pub async fn insert_profile(
        &self,
        token: &str,
        user_id: &str,
        profile: &UserProfilePayload,
    ) -> Result<(), BackendError> {
        let url = self.build_url(&table_path::<UserProfile>(), &[])?;
        let request = self
            .http_post(url, Some(token))
            .header("Prefer", "return=minimal")
            .json(&ProfileRow {
                id: user_id,
                profile,
            });
        Self::send(request).await?;
        tracing::info!(table = UserProfile::NAME, user_id, "inserted profile");
        Ok(())
    }
}
