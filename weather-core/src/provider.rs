use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, Observation, Place},
    provider::{
        locator::{FixedLocator, IpLocator},
        openmeteo::OpenMeteoClient,
    },
};

pub mod locator;
pub mod openmeteo;

/// Name <-> coordinates lookups.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Best match for a free-text place name, or `None` when there is no result.
    async fn search(&self, name: &str) -> Result<Option<Place>, WeatherError>;

    /// Nearest named place for a coordinate pair, or `None` when there is no result.
    async fn reverse(&self, coords: Coordinates) -> Result<Option<Place>, WeatherError>;
}

/// Current conditions at a coordinate pair.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, coords: Coordinates) -> Result<Observation, WeatherError>;
}

/// Options passed to the device locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self { high_accuracy: false, timeout: Duration::from_secs(10) }
    }
}

/// The host's own position.
#[async_trait]
pub trait DeviceLocator: Send + Sync + Debug {
    async fn locate(&self, options: &LocateOptions) -> Result<Coordinates, WeatherError>;
}

/// The collaborators the resolver and controller work with.
#[derive(Debug, Clone)]
pub struct Services {
    pub geocoder: Arc<dyn Geocoder>,
    pub weather: Arc<dyn WeatherProvider>,
    pub locator: Arc<dyn DeviceLocator>,
}

impl Services {
    /// Open-Meteo for geocoding and weather; the pinned device location if
    /// configured, IP geolocation otherwise.
    pub fn from_config(config: &Config) -> Self {
        let open_meteo = Arc::new(OpenMeteoClient::new(
            config.endpoints.geocoding_url.clone(),
            config.endpoints.forecast_url.clone(),
            config.language.clone(),
        ));

        let locator: Arc<dyn DeviceLocator> = match config.device_location {
            Some(coords) => Arc::new(FixedLocator::new(coords)),
            None => Arc::new(IpLocator::new(config.endpoints.ip_locate_url.clone())),
        };

        Self { geocoder: open_meteo.clone(), weather: open_meteo, locator }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_options_default_to_low_accuracy_ten_seconds() {
        let opts = LocateOptions::default();
        assert!(!opts.high_accuracy);
        assert_eq!(opts.timeout, Duration::from_secs(10));
    }

    #[test]
    fn pinned_device_location_selects_fixed_locator() {
        let cfg = Config {
            device_location: Some(Coordinates::new(17.0, 78.0)),
            ..Config::default()
        };
        let services = Services::from_config(&cfg);
        assert!(format!("{:?}", services.locator).contains("FixedLocator"));
    }

    #[test]
    fn default_config_selects_ip_locator() {
        let services = Services::from_config(&Config::default());
        assert!(format!("{:?}", services.locator).contains("IpLocator"));
    }
}
