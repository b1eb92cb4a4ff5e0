//! Current-location lookup via IP geolocation.

use std::time::Duration;

use localbirds_core::{QueryPoint, CURRENT_LOCATION_LABEL};
use reqwest::Client;
use serde::Deserialize;

use crate::error::LocateError;

const DEFAULT_URL: &str = "https://ipinfo.io/json";

#[derive(Deserialize)]
struct IpInfo {
    #[serde(default)]
    loc: Option<String>,
}

/// Resolves the host's approximate position from its public IP address.
pub struct IpLocator {
    client: Client,
    url: String,
}

impl IpLocator {
    /// # Errors
    ///
    /// Returns [`LocateError::Http`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, LocateError> {
        Self::with_url(timeout_secs, user_agent, DEFAULT_URL)
    }

    /// # Errors
    ///
    /// Returns [`LocateError::Http`] if the HTTP client cannot be built.
    pub fn with_url(timeout_secs: u64, user_agent: &str, url: &str) -> Result<Self, LocateError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }

    /// Looks up the current location, labelled [`CURRENT_LOCATION_LABEL`].
    ///
    /// # Errors
    ///
    /// - [`LocateError::Http`] on network failure or a non-2xx status.
    /// - [`LocateError::MissingLoc`] / [`LocateError::InvalidLoc`] if the
    ///   response has no usable `loc` field.
    /// - [`LocateError::Geo`] if the coordinates are out of range.
    pub async fn resolve(&self) -> Result<QueryPoint, LocateError> {
        let info: IpInfo = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let loc = info.loc.ok_or(LocateError::MissingLoc)?;
        let point = parse_loc(&loc)?;
        tracing::info!(location = %point, "resolved current location");
        Ok(point)
    }
}

fn parse_loc(loc: &str) -> Result<QueryPoint, LocateError> {
    let invalid = || LocateError::InvalidLoc(loc.to_string());
    let (lat, lng) = loc.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
    Ok(QueryPoint::new(lat, lng, CURRENT_LOCATION_LABEL)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ipinfo_loc() {
        let point = parse_loc("37.7749,-122.4194").unwrap();
        assert_eq!(point.latitude, 37.7749);
        assert_eq!(point.longitude, -122.4194);
        assert_eq!(point.label, "Current Location");
    }

    #[test]
    fn rejects_malformed_loc() {
        assert!(matches!(parse_loc("37.7"), Err(LocateError::InvalidLoc(_))));
        assert!(matches!(parse_loc("north,west"), Err(LocateError::InvalidLoc(_))));
    }

    #[test]
    fn rejects_out_of_range_loc() {
        assert!(matches!(parse_loc("137.0,10.0"), Err(LocateError::Geo(_))));
    }
}
