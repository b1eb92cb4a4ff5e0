//! Shared domain types and configuration for `localbirds`.
//!
//! Holds the pieces every other crate agrees on: the [`QueryPoint`] origin
//! type, the canonical [`ObservationResult`] record and its sort order, the
//! great-circle [`geo`] helpers, and the environment-driven [`AppConfig`].

pub mod app_config;
pub mod config;
pub mod geo;
pub mod location;
pub mod observation;

use thiserror::Error;

pub use app_config::{
    AppConfig, EmailSettings, EmailTransport, FailurePolicy, FilterMode, SmtpSettings,
    TelegramSettings,
};
pub use config::{load_app_config, load_app_config_from_env, MAX_DISTANCE_KM};
pub use geo::{distance_miles, GeoError};
pub use location::{parse_locations, QueryPoint, CURRENT_LOCATION_LABEL};
pub use observation::{sort_results, ObservationResult};

/// Errors raised while reading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
