//! Reference data managed from the admin screens.
//!
//! Every record lives in one backend table, is listed by name, and is edited
//! through a draft: the raw form input, validated into the payload sent to the
//! backend.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::visits::{id_as_text, opt_id_as_text, present};

/// Shown when a record has no route or its route no longer exists.
pub const NO_ROUTE: &str = "Sin Ruta Asignada";

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("El campo «{0}» es obligatorio.")]
    Required(&'static str),

    #[error("El precio «{0}» no es un número válido.")]
    InvalidPrice(String),

    #[error("Moneda no soportada: «{0}».")]
    InvalidCurrency(String),

    #[error("Rol no válido: «{0}».")]
    InvalidRole(String),

    #[error("La contraseña debe tener al menos 6 caracteres.")]
    PasswordTooShort,
}

/// A backend table holding one kind of record.
pub trait Table: DeserializeOwned + Send + Sync + 'static {
    /// Table name in the backend's REST API.
    const NAME: &'static str;
    /// Body sent on insert and update.
    type Payload: Serialize + Send + Sync;

    fn id(&self) -> &str;

    fn name(&self) -> &str;

    /// Case-insensitive search; `needle` is already lowercased.
    fn matches(&self, needle: &str) -> bool {
        self.name().to_lowercase().contains(needle)
    }
}

/// Form input for one table, validated before any backend call.
pub trait Draft: DeserializeOwned + Default + Send + 'static {
    type Record: Table;

    /// Pre-fills the edit form from an existing record.
    fn from_record(record: &Self::Record) -> Self;

    /// # Errors
    ///
    /// Returns a [`CatalogError`] naming the first invalid field.
    fn validate(&self) -> Result<<Self::Record as Table>::Payload, CatalogError>;
}

/// Records whose name contains `query`, ignoring case. A blank query keeps all.
#[must_use]
pub fn search<'a, T: Table>(records: &'a [T], query: Option<&str>) -> Vec<&'a T> {
    let needle = query.map(str::trim).unwrap_or_default().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records.iter().filter(|r| r.matches(&needle)).collect()
}

/// Name of the route with `route_id`, or [`NO_ROUTE`].
#[must_use]
pub fn route_name<'a>(routes: &'a [Route], route_id: Option<&str>) -> &'a str {
    route_id
        .and_then(|id| routes.iter().find(|r| r.id == id))
        .map_or(NO_ROUTE, |r| r.name.as_str())
}

fn required(value: &str, field: &'static str) -> Result<String, CatalogError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CatalogError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Foreign-key value as JSON: integers stay numeric, anything else is text.
fn foreign_key(value: &str) -> Option<serde_json::Value> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(match trimmed.parse::<i64>() {
        Ok(n) => serde_json::Value::from(n),
        Err(_) => serde_json::Value::from(trimmed),
    })
}

fn text(value: Option<&String>) -> String {
    present(value).unwrap_or_default().to_string()
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    #[serde(deserialize_with = "id_as_text")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePayload {
    pub name: String,
}

impl Table for Route {
    const NAME: &'static str = "routes";
    type Payload = RoutePayload;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RouteDraft {
    #[serde(default)]
    pub name: String,
}

impl Draft for RouteDraft {
    type Record = Route;

    fn from_record(record: &Route) -> Self {
        Self {
            name: record.name.clone(),
        }
    }

    fn validate(&self) -> Result<RoutePayload, CatalogError> {
        Ok(RoutePayload {
            name: required(&self.name, "Nombre")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Commerces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commerce {
    #[serde(deserialize_with = "id_as_text")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default, deserialize_with = "opt_id_as_text")]
    pub route_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommercePayload {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub contact_person: Option<String>,
    pub route_id: Option<serde_json::Value>,
}

impl Table for Commerce {
    const NAME: &'static str = "commerces";
    type Payload = CommercePayload;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommerceDraft {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub contact_person: String,
    pub route_id: String,
}

impl Draft for CommerceDraft {
    type Record = Commerce;

    fn from_record(record: &Commerce) -> Self {
        Self {
            name: record.name.clone(),
            address: text(record.address.as_ref()),
            phone: text(record.phone.as_ref()),
            contact_person: text(record.contact_person.as_ref()),
            route_id: record.route_id.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<CommercePayload, CatalogError> {
        Ok(CommercePayload {
            name: required(&self.name, "Nombre")?,
            address: required(&self.address, "Dirección")?,
            phone: optional(&self.phone),
            contact_person: optional(&self.contact_person),
            route_id: foreign_key(&self.route_id),
        })
    }
}

// ---------------------------------------------------------------------------
// User profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Promoter,
}

impl Role {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Promoter => "Promotor",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Promoter => "promoter",
        }
    }
}

impl FromStr for Role {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Role::Admin),
            "promoter" => Ok(Role::Promoter),
            "" => Err(CatalogError::Required("Rol")),
            other => Err(CatalogError::InvalidRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "id_as_text")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Kept as text so a profile with an unexpected role still lists.
    #[serde(default)]
    pub role: String,
    #[serde(default, deserialize_with = "opt_id_as_text")]
    pub route_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfilePayload {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub route_id: Option<serde_json::Value>,
}

impl Table for UserProfile {
    const NAME: &'static str = "user_profiles";
    type Payload = UserProfilePayload;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.email, &self.role]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: String,
    pub route_id: String,
}

impl Draft for UserDraft {
    type Record = UserProfile;

    fn from_record(record: &UserProfile) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            role: record.role.clone(),
            route_id: record.route_id.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<UserProfilePayload, CatalogError> {
        Ok(UserProfilePayload {
            name: required(&self.name, "Nombre")?,
            email: required(&self.email, "Email")?,
            role: self.role.parse()?,
            route_id: foreign_key(&self.route_id),
        })
    }
}

/// Form input for registering a new user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewUserDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub route_id: String,
}

/// A validated sign-up: credentials for the auth service plus the profile
/// fields written once the account exists.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub profile: UserProfilePayload,
}

impl NewUserDraft {
    /// # Errors
    ///
    /// Returns a [`CatalogError`] naming the first invalid field.
    pub fn validate(&self) -> Result<NewUser, CatalogError> {
        let email = required(&self.email, "Email")?;
        if self.password.is_empty() {
            return Err(CatalogError::Required("Contraseña"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CatalogError::PasswordTooShort);
        }
        Ok(NewUser {
            email: email.clone(),
            password: self.password.clone(),
            profile: UserProfilePayload {
                name: required(&self.name, "Nombre")?,
                email,
                role: self.role.parse()?,
                route_id: foreign_key(&self.route_id),
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Chispa presentations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "VES")]
    Ves,
    #[serde(rename = "USD")]
    Usd,
}

impl Currency {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Currency::Ves => "VES",
            Currency::Usd => "USD",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Currency::Ves => "VES (Bolívares)",
            Currency::Usd => "USD (Dólares)",
        }
    }
}

impl FromStr for Currency {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "VES" => Ok(Currency::Ves),
            "USD" => Ok(Currency::Usd),
            other => Err(CatalogError::InvalidCurrency(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChispaPresentation {
    #[serde(deserialize_with = "id_as_text")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub precio_sugerido: Option<Decimal>,
    #[serde(default)]
    pub moneda: Option<String>,
    #[serde(default)]
    pub activo: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChispaPresentationPayload {
    pub name: String,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,
    pub precio_sugerido: Decimal,
    pub moneda: Currency,
    pub activo: bool,
}

impl Table for ChispaPresentation {
    const NAME: &'static str = "chispa_presentations";
    type Payload = ChispaPresentationPayload;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Checkbox inputs are absent from a form post when unchecked, so `activo`
/// is `Some` exactly when the box was ticked.
///
/// Fields default one by one rather than from [`Default`], which pre-ticks
/// `activo` for the blank create form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChispaPresentationDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub categoria: String,
    #[serde(default)]
    pub precio_sugerido: String,
    #[serde(default)]
    pub moneda: String,
    #[serde(default)]
    pub activo: Option<String>,
}

impl Default for ChispaPresentationDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            descripcion: String::new(),
            categoria: String::new(),
            precio_sugerido: String::new(),
            moneda: Currency::Ves.code().to_string(),
            activo: Some("on".to_string()),
        }
    }
}

impl Draft for ChispaPresentationDraft {
    type Record = ChispaPresentation;

    fn from_record(record: &ChispaPresentation) -> Self {
        Self {
            name: record.name.clone(),
            descripcion: text(record.descripcion.as_ref()),
            categoria: text(record.categoria.as_ref()),
            precio_sugerido: record
                .precio_sugerido
                .map(|p| p.to_string())
                .unwrap_or_default(),
            moneda: present(record.moneda.as_ref())
                .unwrap_or(Currency::Ves.code())
                .to_string(),
            activo: record.activo.unwrap_or(true).then(|| "on".to_string()),
        }
    }

    fn validate(&self) -> Result<ChispaPresentationPayload, CatalogError> {
        let raw_price = required(&self.precio_sugerido, "Precio Sugerido")?;
        let precio_sugerido = Decimal::from_str(&raw_price)
            .map_err(|_| CatalogError::InvalidPrice(raw_price.clone()))?;
        Ok(ChispaPresentationPayload {
            name: required(&self.name, "Nombre del Producto")?,
            descripcion: optional(&self.descripcion),
            categoria: optional(&self.categoria),
            precio_sugerido,
            moneda: self.moneda.parse()?,
            activo: self.activo.is_some(),
        })
    }
}

// ---------------------------------------------------------------------------
// Competitor products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorProduct {
    #[serde(deserialize_with = "id_as_text")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompetitorProductPayload {
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

impl Table for CompetitorProduct {
    const NAME: &'static str = "competitor_products";
    type Payload = CompetitorProductPayload;

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompetitorProductDraft {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub notes: String,
}

impl Draft for CompetitorProductDraft {
    type Record = CompetitorProduct;

    fn from_record(record: &CompetitorProduct) -> Self {
        Self {
            name: record.name.clone(),
            brand: text(record.brand.as_ref()),
            category: text(record.category.as_ref()),
            notes: text(record.notes.as_ref()),
        }
    }

    fn validate(&self) -> Result<CompetitorProductPayload, CatalogError> {
        Ok(CompetitorProductPayload {
            name: required(&self.name, "Nombre")?,
            brand: optional(&self.brand),
            category: optional(&self.category),
            notes: optional(&self.notes),
        })
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
