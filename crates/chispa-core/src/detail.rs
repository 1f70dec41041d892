//! Promoter detail view model.
//!
//! [`PromoterDetail::build`] filters the full visit list down to one promoter
//! and resolves every displayed cell, placeholders included, so renderers
//! only have to lay strings out.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::visits::{present, ChispaProductObservation, CompetitorProductObservation, Visit};

/// Placeholder for any absent text cell.
pub const NOT_AVAILABLE: &str = "N/A";
/// Placeholder for a visit without observations.
pub const NO_OBSERVATIONS: &str = "Sin observaciones";

const MAP_SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Characters left unescaped by `encodeURIComponent`, so links built here
/// match links produced by browsers.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a promoter email for use as one URL path segment.
#[must_use]
pub fn encode_promoter_param(email: &str) -> String {
    utf8_percent_encode(email, PATH_SEGMENT).to_string()
}

/// Decodes the promoter email from its percent-encoded path segment.
///
/// `+` is left alone (it is not a space in a path). Invalid UTF-8 sequences
/// are replaced rather than rejected; such an email simply matches no visit.
#[must_use]
pub fn decode_promoter_param(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// External map search URL built from the raw coordinate values.
#[must_use]
pub fn map_search_url(latitude: f64, longitude: f64) -> String {
    format!("{MAP_SEARCH_BASE}{latitude},{longitude}")
}

/// Coordinates cell: a map link when both values exist, otherwise `N/A`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoordinatesCell {
    MapLink { href: String, label: String },
    Placeholder,
}

impl CoordinatesCell {
    #[must_use]
    pub fn from_visit(visit: &Visit) -> Self {
        match visit.coordinates() {
            Some((lat, lon)) => CoordinatesCell::MapLink {
                href: map_search_url(lat, lon),
                label: format!("{lat}, {lon}"),
            },
            None => CoordinatesCell::Placeholder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChispaProductRow {
    pub product_name: String,
    pub price: String,
    pub currency: String,
    pub shelf_stock: String,
    pub general_stock: String,
}

impl From<&ChispaProductObservation> for ChispaProductRow {
    fn from(p: &ChispaProductObservation) -> Self {
        Self {
            product_name: text_or_na(p.product_name.as_ref()),
            price: price_cell(p.price),
            currency: text_or_na(p.currency.as_ref()),
            shelf_stock: p.shelf_stock.unwrap_or(0).to_string(),
            general_stock: p.general_stock.unwrap_or(0).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompetitorProductRow {
    pub product_name: String,
    pub price: String,
    pub currency: String,
}

impl From<&CompetitorProductObservation> for CompetitorProductRow {
    fn from(p: &CompetitorProductObservation) -> Self {
        Self {
            product_name: text_or_na(p.product_name.as_ref()),
            price: price_cell(p.price),
            currency: text_or_na(p.currency.as_ref()),
        }
    }
}

/// Every displayed cell of one visit, placeholders resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitRow {
    pub id: String,
    pub commerce: String,
    pub visited_at: String,
    pub city: String,
    pub state: String,
    pub observations: String,
    pub address: String,
    pub coordinates: CoordinatesCell,
    /// Photo URLs, only `http(s)`; `None` renders as `N/A`.
    pub photo_before: Option<String>,
    pub photo_after: Option<String>,
    /// Empty means the section is not rendered at all.
    pub chispa_products: Vec<ChispaProductRow>,
    pub competitor_products: Vec<CompetitorProductRow>,
}

impl VisitRow {
    /// `"<city>, <state>"` with each half falling back on its own.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

impl From<&Visit> for VisitRow {
    fn from(v: &Visit) -> Self {
        let visited_at = match (v.visited_at_parsed(), present(v.visited_at.as_ref())) {
            (Some(ts), _) => ts.format("%d/%m/%Y %H:%M:%S").to_string(),
            (None, Some(raw)) => raw.to_string(),
            (None, None) => NOT_AVAILABLE.to_string(),
        };

        Self {
            id: v.id.clone(),
            commerce: text_or_na(v.commerce_name.as_ref()),
            visited_at,
            city: text_or_na(v.city.as_ref()),
            state: text_or_na(v.state.as_ref()),
            observations: present(v.observations.as_ref())
                .unwrap_or(NO_OBSERVATIONS)
                .to_string(),
            address: text_or_na(v.commerce_address.as_ref()),
            coordinates: CoordinatesCell::from_visit(v),
            photo_before: web_url(v.photo_before_url.as_ref()),
            photo_after: web_url(v.photo_after_url.as_ref()),
            chispa_products: v.chispa_products.iter().map(Into::into).collect(),
            competitor_products: v.competitor_products.iter().map(Into::into).collect(),
        }
    }
}

/// One promoter's visits, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromoterDetail {
    pub email: String,
    pub display_name: String,
    pub visits: Vec<VisitRow>,
}

impl PromoterDetail {
    /// Filters `visits` to those whose promoter email equals `target_email`
    /// exactly (case-sensitive).
    ///
    /// The display name comes from the first matching visit; when it has no
    /// name, or nothing matched, the target email itself is shown.
    #[must_use]
    pub fn build(visits: &[Visit], target_email: &str) -> Self {
        let matching: Vec<&Visit> = visits
            .iter()
            .filter(|v| v.promoter_email() == Some(target_email))
            .collect();

        let display_name = matching
            .first()
            .and_then(|v| v.promoter_name())
            .unwrap_or(target_email)
            .to_string();

        Self {
            email: target_email.to_string(),
            display_name,
            visits: matching.into_iter().map(VisitRow::from).collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }
}

/// Which visit, if any, has its detail pane open.
///
/// Opening one visit closes any other; toggling the open one closes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandState {
    expanded: Option<String>,
}

impl ExpandState {
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        Self {
            expanded: param.filter(|s| !s.is_empty()).map(ToOwned::to_owned),
        }
    }

    #[must_use]
    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    #[must_use]
    pub fn is_expanded(&self, visit_id: &str) -> bool {
        self.expanded.as_deref() == Some(visit_id)
    }

    pub fn toggle(&mut self, visit_id: &str) {
        if self.is_expanded(visit_id) {
            self.expanded = None;
        } else {
            self.expanded = Some(visit_id.to_string());
        }
    }

    /// The state the toggle control for `visit_id` leads to.
    #[must_use]
    pub fn toggled(&self, visit_id: &str) -> Self {
        let mut next = self.clone();
        next.toggle(visit_id);
        next
    }
}

fn text_or_na(value: Option<&String>) -> String {
    present(value).unwrap_or(NOT_AVAILABLE).to_string()
}

/// Keeps a link target only when it is an absolute `http` or `https` URL.
fn web_url(value: Option<&String>) -> Option<String> {
    let url = present(value)?.trim();
    let scheme = url.split_once("://")?.0;
    (scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https"))
        .then(|| url.to_string())
}

fn price_cell(price: Option<f64>) -> String {
    format!("${}", price.unwrap_or(0.0))
}

#[cfg(test)]
#[path = "detail_test.rs"]
mod tests;
