//! Client and record mapping for the eBird v2 API.
//!
//! [`EbirdClient`] issues the three observation queries and the checklist
//! lookup; [`checklist`] pulls per-species comments and photo flags out of a
//! checklist; [`normalize`] turns one raw observation into the canonical
//! [`localbirds_core::ObservationResult`].

pub mod checklist;
pub mod client;
pub mod error;
pub mod normalize;
pub mod species;
pub mod types;

mod observations;

pub use checklist::{extract_comment, has_photo, photo_status, PhotoStatus};
pub use client::EbirdClient;
pub use error::EbirdError;
pub use normalize::{normalize, parse_observation_date, NormalizeError, CHECKLIST_URL_PREFIX};
pub use species::{SpeciesTable, SpeciesTableError};
pub use types::{
    ChecklistDetail, ChecklistEntry, ObservationBatch, RawObservation, SourcedObservations,
};
