//! Domain types and pure view derivations for the Chispa field-visit service.
//!
//! Nothing in this crate performs I/O apart from reading environment
//! variables in [`load_app_config`]. Everything the web views show is derived
//! here from the rows the backend returns, so it can be tested without a
//! server or a backend.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod roster;
pub mod session;
pub mod view;
pub mod visits;

pub use app_config::{AppConfig, Environment};
pub use catalog::{route_name, search, CatalogError, Draft, Table, NO_ROUTE};
pub use config::{load_app_config, load_app_config_from_env};
pub use detail::{decode_promoter_param, map_search_url, ExpandState, PromoterDetail};
pub use roster::{derive_roster, RosterEntry};
pub use session::{Clearance, Session, SessionContext};
pub use view::{LoadGeneration, LoadTicket, ViewError};
pub use visits::{ChispaProductObservation, CompetitorProductObservation, Visit};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
