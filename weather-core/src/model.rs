use serde::{Deserialize, Serialize};

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Numeric label used when no place name is known, e.g. `Lat 17.39, Lon 78.49`.
    pub fn label(&self) -> String {
        format!("Lat {:.2}, Lon {:.2}", self.latitude, self.longitude)
    }
}

/// One geocoding candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub admin1: Option<String>,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// `name[, admin1][, country]`, skipping empty parts.
    pub fn display_name(&self) -> String {
        let mut out = self.name.clone();
        for part in [&self.admin1, &self.country].into_iter().flatten() {
            if !part.is_empty() {
                out.push_str(", ");
                out.push_str(part);
            }
        }
        out
    }
}

/// Coordinates plus the label the display should show for them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    pub label: String,
}

/// Current conditions as reported by the weather service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Rounded to the nearest whole degree.
    pub temperature_c: i32,
    pub wind_speed_ms: Option<f64>,
    pub condition_code: i32,
    pub observation_time: String,
}

/// One weather fetch: current conditions and the humidity aligned to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub conditions: CurrentConditions,
    pub humidity_pct: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    /// Label of the unit toggle control.
    pub fn toggle_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the most recent location resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionStatus {
    #[default]
    Pending,
    Resolved,
    Failed,
}

impl ResolutionStatus {
    pub fn is_resolved(self) -> bool {
        self == ResolutionStatus::Resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(admin1: Option<&str>, country: Option<&str>) -> Place {
        Place {
            name: "Hyderabad".into(),
            admin1: admin1.map(str::to_string),
            country: country.map(str::to_string),
            latitude: 17.38,
            longitude: 78.45,
        }
    }

    #[test]
    fn display_name_joins_present_parts() {
        assert_eq!(
            place(Some("Telangana"), Some("India")).display_name(),
            "Hyderabad, Telangana, India"
        );
        assert_eq!(place(None, Some("India")).display_name(), "Hyderabad, India");
        assert_eq!(place(Some(""), None).display_name(), "Hyderabad");
    }

    #[test]
    fn coordinate_label_uses_two_decimals() {
        assert_eq!(Coordinates::new(17.0, 78.0).label(), "Lat 17.00, Lon 78.00");
        assert_eq!(Coordinates::new(-33.8688, 151.2093).label(), "Lat -33.87, Lon 151.21");
    }

    #[test]
    fn coordinates_validity() {
        assert!(Coordinates::new(90.0, -180.0).is_valid());
        assert!(!Coordinates::new(90.5, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, 181.0).is_valid());
    }

    #[test]
    fn unit_toggle_flips_and_relabels() {
        let units = UnitSystem::default();
        assert_eq!(units.toggle_label(), "°C");
        assert_eq!(units.toggled().toggle_label(), "°F");
        assert_eq!(units.toggled().toggled(), UnitSystem::Metric);
    }

    #[test]
    fn units_deserialize_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            units: UnitSystem,
        }
        let w: Wrapper = toml::from_str("units = \"imperial\"").expect("valid toml");
        assert_eq!(w.units, UnitSystem::Imperial);
    }
}
