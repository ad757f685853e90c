use thiserror::Error;

/// Failures of the resolve-then-fetch pipeline.
///
/// The `Display` text is what the location field shows in the error view.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Geocoding returned no candidate for the query.
    #[error("City not found")]
    NotFound { query: String },

    /// The device locator was denied, failed, or timed out.
    #[error("Location denied or unavailable, try searching a city.")]
    LocationUnavailable { reason: String },

    /// Transport failure, bad status, unparsable body or missing payload.
    #[error("{0}")]
    Fetch(String),

    /// Reverse geocoding failed. Never shown; callers fall back to a coordinate label.
    #[error("Reverse lookup failed: {0}")]
    ReverseLookup(String),
}

impl WeatherError {
    pub fn location_unavailable(reason: impl Into<String>) -> Self {
        WeatherError::LocationUnavailable { reason: reason.into() }
    }

    pub fn fetch(message: impl Into<String>) -> Self {
        WeatherError::Fetch(message.into())
    }
}
