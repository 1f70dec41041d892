//! Rows returned by the `get_full_visit_details` aggregation.
//!
//! The backend joins each visit with its promoter, the visited commerce and
//! the two product-observation arrays, so one [`Visit`] is self-contained.
//! Field names on the wire are the Spanish column names the procedure emits;
//! any of them may be null or missing.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// One visit of a promoter to a commerce, denormalized by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Backend visit id. Numeric ids are kept as their decimal text.
    #[serde(rename = "id_visita", deserialize_with = "id_as_text")]
    pub id: String,
    #[serde(rename = "email_promotor", default)]
    pub promoter_email: Option<String>,
    #[serde(rename = "nombre_promotor", default)]
    pub promoter_name: Option<String>,
    #[serde(rename = "nombre_comercio_visitado", default)]
    pub commerce_name: Option<String>,
    #[serde(rename = "direccion_comercio", default)]
    pub commerce_address: Option<String>,
    /// Raw timestamp text as stored by the backend.
    #[serde(rename = "fecha_hora_visita", default)]
    pub visited_at: Option<String>,
    #[serde(rename = "observaciones_visita", default)]
    pub observations: Option<String>,
    #[serde(rename = "lugar_visita_ciudad", default)]
    pub city: Option<String>,
    #[serde(rename = "Estado", default)]
    pub state: Option<String>,
    #[serde(
        rename = "coordenada_latitud",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub latitude: Option<f64>,
    #[serde(
        rename = "coordenada_longitud",
        default,
        deserialize_with = "lenient_f64"
    )]
    pub longitude: Option<f64>,
    #[serde(rename = "foto_url_antes", default)]
    pub photo_before_url: Option<String>,
    #[serde(rename = "foto_url_despues", default)]
    pub photo_after_url: Option<String>,
    #[serde(
        rename = "productos_chispa",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub chispa_products: Vec<ChispaProductObservation>,
    #[serde(
        rename = "productos_competencia",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub competitor_products: Vec<CompetitorProductObservation>,
}

/// A first-party product seen on the shelf during a visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChispaProductObservation {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub shelf_stock: Option<i64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub general_stock: Option<i64>,
}

/// A rival product and its shelf price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorProductObservation {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Returns the text when it is present and non-empty.
///
/// The backend sends empty strings for some blank columns; they are treated
/// exactly like null.
#[must_use]
pub fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl Visit {
    /// Promoter email used as the grouping key, if any.
    #[must_use]
    pub fn promoter_email(&self) -> Option<&str> {
        present(self.promoter_email.as_ref())
    }

    #[must_use]
    pub fn promoter_name(&self) -> Option<&str> {
        present(self.promoter_name.as_ref())
    }

    /// Both coordinates, or `None` when either one is missing.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Parses the visit timestamp.
    ///
    /// Accepts RFC 3339 (`timestamptz`) and the naive `timestamp` forms
    /// PostgREST emits. Offsets are kept as sent; the wall-clock time of the
    /// original offset is returned.
    #[must_use]
    pub fn visited_at_parsed(&self) -> Option<NaiveDateTime> {
        let raw = present(self.visited_at.as_ref())?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

/// Backend ids may be integers or UUID text; both are kept as text.
pub(crate) fn id_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

pub(crate) fn opt_id_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

/// A numeric column as it may arrive: integer, float or text.
///
/// Anything else (booleans, objects, unparsable text) is kept as
/// [`RawNumber::Other`] and read as absent.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
    Other(#[allow(dead_code)] serde::de::IgnoredAny),
}

impl RawNumber {
    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            RawNumber::Int(n) => *n as f64,
            RawNumber::Float(x) => *x,
            RawNumber::Text(s) => s.trim().parse::<f64>().ok()?,
            RawNumber::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn as_count(&self) -> Option<i64> {
        match self {
            RawNumber::Int(n) => return Some(*n),
            RawNumber::Text(s) => {
                if let Ok(n) = s.trim().parse::<i64>() {
                    return Some(n);
                }
            }
            RawNumber::Float(_) | RawNumber::Other(_) => {}
        }
        let value = self.as_f64()?;
        (value.fract() == 0.0 && value.abs() < 9.0e15).then_some(value as i64)
    }
}

/// Numbers may come as `numeric` text or floats; empty or odd values are absent.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawNumber>::deserialize(deserializer)?.and_then(|raw| raw.as_f64()))
}

/// Stock counts; Postgres `numeric` columns serialize them as `12.0`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawNumber>::deserialize(deserializer)?.and_then(|raw| raw.as_count()))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
