use localbirds_core::GeoError;
use localbirds_ebird::{EbirdError, NormalizeError};
use thiserror::Error;

use crate::plan::PlannedQuery;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("query '{query}' failed: {source}")]
    SourceFetch {
        query: PlannedQuery,
        #[source]
        source: EbirdError,
    },

    #[error("checklist {sub_id} could not be fetched: {source}")]
    Checklist {
        sub_id: String,
        #[source]
        source: EbirdError,
    },

    #[error("malformed observation: {0}")]
    MalformedObservation(#[from] NormalizeError),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no email recipients configured")]
    NoRecipients,

    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("sendmail delivery failed: {0}")]
    Sendmail(#[from] lettre::transport::sendmail::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram rejected the message (HTTP {status}): {description}")]
    Telegram { status: u16, description: String },
}

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geolocation response has no 'loc' field")]
    MissingLoc,

    #[error("geolocation 'loc' value '{0}' is not \"lat,lng\"")]
    InvalidLoc(String),

    #[error(transparent)]
    Geo(#[from] GeoError),
}
