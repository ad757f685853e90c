//! Device location sources for a terminal host.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{error::WeatherError, model::Coordinates};

use super::{DeviceLocator, LocateOptions};

/// Coordinates pinned in configuration.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator {
    coords: Coordinates,
}

impl FixedLocator {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl DeviceLocator for FixedLocator {
    async fn locate(&self, _options: &LocateOptions) -> Result<Coordinates, WeatherError> {
        Ok(self.coords)
    }
}

/// Approximate position of the host from its public IP address.
///
/// Expects an ip-api.com style body: `{"status": "success", "lat": .., "lon": ..}`
/// or `{"status": "fail", "message": ".."}`. IP lookups are always low accuracy,
/// so `high_accuracy` has no effect.
#[derive(Debug, Clone)]
pub struct IpLocator {
    url: String,
    http: Client,
}

impl IpLocator {
    pub fn new(url: String) -> Self {
        Self { url, http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

#[async_trait]
impl DeviceLocator for IpLocator {
    #[instrument(skip(self))]
    async fn locate(&self, options: &LocateOptions) -> Result<Coordinates, WeatherError> {
        let res = self
            .http
            .get(&self.url)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| WeatherError::location_unavailable(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(WeatherError::location_unavailable(format!("HTTP {status}")));
        }

        let body: IpLookupResponse = res
            .json()
            .await
            .map_err(|e| WeatherError::location_unavailable(format!("invalid response: {e}")))?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => {
                let coords = Coordinates::new(lat, lon);
                debug!(lat, lon, "host located by IP");
                Ok(coords)
            }
            _ => Err(WeatherError::location_unavailable(
                body.message.unwrap_or_else(|| format!("lookup status '{}'", body.status)),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_locator_returns_pinned_coordinates() {
        let locator = FixedLocator::new(Coordinates::new(17.0, 78.0));
        let coords = locator.locate(&LocateOptions::default()).await.expect("pinned");
        assert_eq!(coords, Coordinates::new(17.0, 78.0));
    }
}
