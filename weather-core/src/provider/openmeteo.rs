use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    error::WeatherError,
    model::{Coordinates, CurrentConditions, Observation, Place},
    units::round_half_up,
};

use super::{Geocoder, WeatherProvider};

/// Open-Meteo geocoding and forecast client. No API key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    geocoding_url: String,
    forecast_url: String,
    language: String,
    http: Client,
}

impl OpenMeteoClient {
    pub fn new(geocoding_url: String, forecast_url: String, language: String) -> Self {
        Self {
            geocoding_url: geocoding_url.trim_end_matches('/').to_string(),
            forecast_url: forecast_url.trim_end_matches('/').to_string(),
            language,
            http: Client::new(),
        }
    }

    async fn get_text(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<String, WeatherError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| WeatherError::fetch(format!("{what} failed: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::fetch(format!("{what} failed: unreadable body: {e}")))?;

        if !status.is_success() {
            return Err(WeatherError::fetch(format!(
                "{what} failed with status {status}: {}",
                truncate_body(&body)
            )));
        }

        Ok(body)
    }

    async fn first_place(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<Option<Place>, WeatherError> {
        let body = self.get_text(url, query, what).await?;
        let parsed: GeoResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::fetch(format!("{what} failed: invalid JSON: {e}")))?;

        Ok(parsed.results.unwrap_or_default().into_iter().next().map(Place::from))
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: String,
    admin1: Option<String>,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl From<GeoResult> for Place {
    fn from(r: GeoResult) -> Self {
        Place {
            name: r.name,
            admin1: r.admin1,
            country: r.country,
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeatherPayload>,
    hourly: Option<HourlySeries>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherPayload {
    temperature: f64,
    windspeed: Option<f64>,
    weathercode: i32,
    time: String,
}

/// Parallel hourly arrays; either may be missing from the response.
#[derive(Debug, Default, Deserialize)]
pub struct HourlySeries {
    pub time: Option<Vec<String>>,
    #[serde(rename = "relativehumidity_2m")]
    pub humidity: Option<Vec<Option<f64>>>,
}

/// Humidity for `observation_time`: the exactly matching hourly slot, else the
/// last value of the series, else `None`.
pub fn align_humidity(observation_time: &str, hourly: Option<&HourlySeries>) -> Option<u8> {
    let hourly = hourly?;
    let (times, values) = (hourly.time.as_ref()?, hourly.humidity.as_ref()?);

    let value = match times.iter().position(|t| t == observation_time) {
        Some(idx) => values.get(idx).copied().flatten(),
        None => values.last().copied().flatten(),
    }?;

    Some(round_half_up(value.clamp(0.0, 100.0)) as u8)
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn search(&self, name: &str) -> Result<Option<Place>, WeatherError> {
        let url = format!("{}/search", self.geocoding_url);
        let place = self
            .first_place(
                &url,
                &[
                    ("name", name.to_string()),
                    ("count", "1".to_string()),
                    ("language", self.language.clone()),
                    ("format", "json".to_string()),
                ],
                "Geocoding",
            )
            .await?;

        debug!(found = place.is_some(), "geocoding search finished");
        Ok(place)
    }

    #[instrument(skip(self), fields(lat = coords.latitude, lon = coords.longitude))]
    async fn reverse(&self, coords: Coordinates) -> Result<Option<Place>, WeatherError> {
        let url = format!("{}/reverse", self.geocoding_url);
        self.first_place(
            &url,
            &[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("count", "1".to_string()),
            ],
            "Reverse geocoding",
        )
        .await
        .map_err(|e| WeatherError::ReverseLookup(e.to_string()))
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = coords.latitude, lon = coords.longitude))]
    async fn current(&self, coords: Coordinates) -> Result<Observation, WeatherError> {
        let url = format!("{}/forecast", self.forecast_url);
        let body = self
            .get_text(
                &url,
                &[
                    ("latitude", coords.latitude.to_string()),
                    ("longitude", coords.longitude.to_string()),
                    ("current_weather", "true".to_string()),
                    ("hourly", "relativehumidity_2m".to_string()),
                    ("timezone", "auto".to_string()),
                ],
                "Weather fetch",
            )
            .await?;

        let parsed: ForecastResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::fetch(format!("Weather fetch failed: invalid JSON: {e}")))?;

        let current = parsed
            .current_weather
            .ok_or_else(|| WeatherError::fetch("No current weather data"))?;

        let humidity_pct = align_humidity(&current.time, parsed.hourly.as_ref());
        debug!(time = %current.time, ?humidity_pct, "current weather received");

        Ok(Observation {
            conditions: CurrentConditions {
                temperature_c: round_half_up(current.temperature) as i32,
                wind_speed_ms: current.windspeed,
                condition_code: current.weathercode,
                observation_time: current.time,
            },
            humidity_pct,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
