//! Turns a city name or the device position into coordinates plus a label.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    error::WeatherError,
    model::{Coordinates, ResolvedLocation},
    provider::{DeviceLocator, Geocoder, LocateOptions},
};

#[derive(Debug, Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
    locator: Arc<dyn DeviceLocator>,
    options: LocateOptions,
}

impl LocationResolver {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        locator: Arc<dyn DeviceLocator>,
        options: LocateOptions,
    ) -> Self {
        Self { geocoder, locator, options }
    }

    /// Geocode `city` and take the first candidate.
    ///
    /// Blank input is rejected as [`WeatherError::NotFound`] without contacting
    /// the geocoder.
    pub async fn by_name(&self, city: &str) -> Result<ResolvedLocation, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::NotFound { query: String::new() });
        }

        let place = self
            .geocoder
            .search(city)
            .await?
            .ok_or_else(|| WeatherError::NotFound { query: city.to_string() })?;

        let resolved = ResolvedLocation { coordinates: place.coordinates(), label: place.display_name() };
        info!(query = city, label = %resolved.label, "city resolved");
        Ok(resolved)
    }

    /// Ask the device locator, bounded by the configured timeout, then name the
    /// spot by reverse geocoding. A failed reverse lookup degrades to the
    /// coordinate label.
    pub async fn by_device(&self) -> Result<ResolvedLocation, WeatherError> {
        let coordinates = tokio::time::timeout(self.options.timeout, self.locator.locate(&self.options))
            .await
            .map_err(|_| {
                WeatherError::location_unavailable(format!(
                    "timed out after {}s",
                    self.options.timeout.as_secs()
                ))
            })?
            .inspect_err(|e| warn!(error = ?e, "device location unavailable"))?;

        let label = self.reverse_label(coordinates).await;
        info!(lat = coordinates.latitude, lon = coordinates.longitude, %label, "device located");
        Ok(ResolvedLocation { coordinates, label })
    }

    async fn reverse_label(&self, coords: Coordinates) -> String {
        match self.geocoder.reverse(coords).await {
            Ok(Some(place)) => place.display_name(),
            Ok(None) => {
                debug!("reverse lookup returned no result, using coordinates");
                coords.label()
            }
            Err(e) => {
                debug!(error = %e, "reverse lookup failed, using coordinates");
                coords.label()
            }
        }
    }
}
