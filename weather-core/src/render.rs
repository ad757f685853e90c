//! Display model and the pure transformations that fill it.

use chrono::{DateTime, Local};

use crate::{
    catalog,
    model::{Coordinates, Observation, UnitSystem},
    units::{c_to_f, ms_to_mph},
};

pub const PLACEHOLDER: &str = "--";
pub const WARNING_ICON: &str = "❗";

/// Every field of the weather display, as text.
///
/// Each render replaces the whole value; there are no partial updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherView {
    pub temperature: String,
    pub description: String,
    pub icon: String,
    pub humidity: String,
    pub wind: String,
    pub location: String,
    pub updated: String,
    pub loading: bool,
    /// Label of the unit toggle control.
    pub unit_label: String,
}

impl WeatherView {
    /// The display before anything has been fetched.
    pub fn initial(units: UnitSystem) -> Self {
        Self {
            temperature: format!("{PLACEHOLDER}°"),
            description: PLACEHOLDER.to_string(),
            icon: String::new(),
            humidity: PLACEHOLDER.to_string(),
            wind: PLACEHOLDER.to_string(),
            location: "Unknown".to_string(),
            updated: PLACEHOLDER.to_string(),
            loading: false,
            unit_label: units.toggle_label().to_string(),
        }
    }
}

pub fn temperature_text(celsius: i32, units: UnitSystem) -> String {
    let value = match units {
        UnitSystem::Metric => celsius,
        UnitSystem::Imperial => c_to_f(celsius),
    };
    format!("{value}°")
}

pub fn wind_text(speed_ms: Option<f64>, units: UnitSystem) -> String {
    match (speed_ms, units) {
        (Some(ms), UnitSystem::Metric) => format!("{ms} m/s"),
        (Some(ms), UnitSystem::Imperial) => format!("{} mph", ms_to_mph(ms)),
        (None, UnitSystem::Metric) => format!("{PLACEHOLDER} m/s"),
        (None, UnitSystem::Imperial) => format!("{PLACEHOLDER} mph"),
    }
}

pub fn humidity_text(humidity_pct: Option<u8>) -> String {
    match humidity_pct {
        Some(pct) => format!("{pct}%"),
        None => PLACEHOLDER.to_string(),
    }
}

/// The resolved label if there is one, else the coordinate label.
pub fn location_text(label: Option<&str>, coords: Option<Coordinates>) -> String {
    match (label.filter(|l| !l.trim().is_empty()), coords) {
        (Some(label), _) => label.to_string(),
        (None, Some(coords)) => coords.label(),
        (None, None) => format!("Lat {PLACEHOLDER}, Lon {PLACEHOLDER}"),
    }
}

pub fn updated_text(now: DateTime<Local>) -> String {
    format!("Last updated: {}", now.format("%Y-%m-%d %H:%M:%S"))
}

/// Render a successful observation.
pub fn render(
    observation: &Observation,
    units: UnitSystem,
    label: Option<&str>,
    coords: Option<Coordinates>,
    now: DateTime<Local>,
) -> WeatherView {
    let conditions = &observation.conditions;
    let entry = catalog::lookup(conditions.condition_code);

    WeatherView {
        temperature: temperature_text(conditions.temperature_c, units),
        description: entry.description.to_string(),
        icon: entry.icon.to_string(),
        humidity: humidity_text(observation.humidity_pct),
        wind: wind_text(conditions.wind_speed_ms, units),
        location: location_text(label, coords),
        updated: updated_text(now),
        loading: false,
        unit_label: units.toggle_label().to_string(),
    }
}

/// The uniform error display: placeholders everywhere, the message in the location field.
pub fn error_view(message: &str, units: UnitSystem) -> WeatherView {
    WeatherView {
        temperature: format!("{PLACEHOLDER}°"),
        description: "Error".to_string(),
        icon: WARNING_ICON.to_string(),
        humidity: PLACEHOLDER.to_string(),
        wind: PLACEHOLDER.to_string(),
        location: message.to_string(),
        updated: PLACEHOLDER.to_string(),
        loading: false,
        unit_label: units.toggle_label().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CurrentConditions;
    use chrono::TimeZone;

    fn observation(temp: i32, wind: Option<f64>, code: i32, humidity: Option<u8>) -> Observation {
        Observation {
            conditions: CurrentConditions {
                temperature_c: temp,
                wind_speed_ms: wind,
                condition_code: code,
                observation_time: "2024-06-01T12:00".into(),
            },
            humidity_pct: humidity,
        }
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("unambiguous")
    }

    #[test]
    fn renders_metric() {
        let view = render(
            &observation(30, Some(3.5), 0, Some(40)),
            UnitSystem::Metric,
            Some("Hyderabad, Telangana, India"),
            Some(Coordinates::new(17.38, 78.45)),
            noon(),
        );

        assert_eq!(view.temperature, "30°");
        assert_eq!(view.description, "Clear sky");
        assert_eq!(view.icon, "☀️");
        assert_eq!(view.humidity, "40%");
        assert_eq!(view.wind, "3.5 m/s");
        assert_eq!(view.location, "Hyderabad, Telangana, India");
        assert_eq!(view.updated, "Last updated: 2024-06-01 12:00:00");
        assert_eq!(view.unit_label, "°C");
        assert!(!view.loading);
    }

    #[test]
    fn renders_imperial() {
        let view = render(
            &observation(30, Some(10.0), 63, None),
            UnitSystem::Imperial,
            None,
            Some(Coordinates::new(17.0, 78.0)),
            noon(),
        );

        assert_eq!(view.temperature, "86°");
        assert_eq!(view.wind, "22.4 mph");
        assert_eq!(view.description, "Moderate rain");
        assert_eq!(view.humidity, "--");
        assert_eq!(view.location, "Lat 17.00, Lon 78.00");
        assert_eq!(view.unit_label, "°F");
    }

    #[test]
    fn whole_wind_speeds_have_no_fraction() {
        assert_eq!(wind_text(Some(10.0), UnitSystem::Metric), "10 m/s");
    }

    #[test]
    fn unknown_wind_keeps_unit_suffix() {
        assert_eq!(wind_text(None, UnitSystem::Metric), "-- m/s");
        assert_eq!(wind_text(None, UnitSystem::Imperial), "-- mph");
    }

    #[test]
    fn location_fallbacks() {
        assert_eq!(location_text(Some("Oslo, Norway"), None), "Oslo, Norway");
        assert_eq!(location_text(Some("  "), Some(Coordinates::new(1.0, 2.0))), "Lat 1.00, Lon 2.00");
        assert_eq!(location_text(None, None), "Lat --, Lon --");
    }

    #[test]
    fn unknown_code_uses_fallback_entry() {
        let view = render(&observation(5, None, 42, None), UnitSystem::Metric, None, None, noon());
        assert_eq!(view.description, "Unknown");
        assert_eq!(view.icon, "🌈");
    }

    #[test]
    fn error_view_blanks_every_field() {
        let view = error_view("City not found", UnitSystem::Metric);

        assert_eq!(view.temperature, "--°");
        assert_eq!(view.description, "Error");
        assert_eq!(view.icon, WARNING_ICON);
        assert_eq!(view.humidity, "--");
        assert_eq!(view.wind, "--");
        assert_eq!(view.updated, "--");
        assert_eq!(view.location, "City not found");
        assert!(!view.loading);
    }

    #[test]
    fn unit_round_trip_restores_metric_display() {
        for celsius in -50..=50 {
            let metric = temperature_text(celsius, UnitSystem::Metric);
            let imperial = temperature_text(celsius, UnitSystem::Imperial);
            let back = temperature_text(celsius, UnitSystem::Imperial.toggled());

            assert_eq!(metric, back, "celsius {celsius}");
            assert_eq!(imperial, format!("{}°", c_to_f(celsius)));
        }
    }
}
