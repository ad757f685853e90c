//! WMO weather code catalog.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

/// Description and icon glyph for one condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionEntry {
    pub description: &'static str,
    pub icon: &'static str,
}

const fn entry(description: &'static str, icon: &'static str) -> ConditionEntry {
    ConditionEntry { description, icon }
}

/// Returned for codes missing from the table.
pub const UNKNOWN: ConditionEntry = entry("Unknown", "🌈");

/// Every code the catalog knows, in ascending order.
pub const KNOWN_CODES: [i32; 28] = [
    0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80, 81, 82, 85,
    86, 95, 96, 99,
];

/// Look up a condition code. Unknown codes map to [`UNKNOWN`].
pub fn lookup(code: i32) -> ConditionEntry {
    match code {
        0 => entry("Clear sky", "☀️"),
        1 => entry("Mainly clear", "🌤️"),
        2 => entry("Partly cloudy", "⛅"),
        3 => entry("Overcast", "☁️"),
        45 => entry("Fog", "🌫️"),
        48 => entry("Depositing rime fog", "🌫️"),
        51 => entry("Light drizzle", "🌦️"),
        53 => entry("Moderate drizzle", "🌦️"),
        55 => entry("Dense drizzle", "🌧️"),
        56 => entry("Light freezing drizzle", "🌧️❄️"),
        57 => entry("Dense freezing drizzle", "🌧️❄️"),
        61 => entry("Slight rain", "🌦️"),
        63 => entry("Moderate rain", "🌧️"),
        65 => entry("Heavy rain", "⛈️"),
        66 => entry("Light freezing rain", "🌧️❄️"),
        67 => entry("Heavy freezing rain", "🌧️❄️"),
        71 => entry("Slight snow", "🌨️"),
        73 => entry("Moderate snow", "🌨️"),
        75 => entry("Heavy snow", "❄️"),
        77 => entry("Snow grains", "❄️"),
        80 => entry("Slight rain showers", "🌦️"),
        81 => entry("Moderate rain showers", "🌧️"),
        82 => entry("Violent rain showers", "⛈️"),
        85 => entry("Slight snow showers", "🌨️"),
        86 => entry("Heavy snow showers", "❄️"),
        95 => entry("Thunderstorm", "⛈️"),
        96 => entry("Thunderstorm with slight hail", "⛈️❄️"),
        99 => entry("Thunderstorm with heavy hail", "⛈️❄️"),
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_entries() {
        let expected = [
            (0, "Clear sky", "☀️"),
            (1, "Mainly clear", "🌤️"),
            (2, "Partly cloudy", "⛅"),
            (3, "Overcast", "☁️"),
            (45, "Fog", "🌫️"),
            (48, "Depositing rime fog", "🌫️"),
            (51, "Light drizzle", "🌦️"),
            (53, "Moderate drizzle", "🌦️"),
            (55, "Dense drizzle", "🌧️"),
            (56, "Light freezing drizzle", "🌧️❄️"),
            (57, "Dense freezing drizzle", "🌧️❄️"),
            (61, "Slight rain", "🌦️"),
            (63, "Moderate rain", "🌧️"),
            (65, "Heavy rain", "⛈️"),
            (66, "Light freezing rain", "🌧️❄️"),
            (67, "Heavy freezing rain", "🌧️❄️"),
            (71, "Slight snow", "🌨️"),
            (73, "Moderate snow", "🌨️"),
            (75, "Heavy snow", "❄️"),
            (77, "Snow grains", "❄️"),
            (80, "Slight rain showers", "🌦️"),
            (81, "Moderate rain showers", "🌧️"),
            (82, "Violent rain showers", "⛈️"),
            (85, "Slight snow showers", "🌨️"),
            (86, "Heavy snow showers", "❄️"),
            (95, "Thunderstorm", "⛈️"),
            (96, "Thunderstorm with slight hail", "⛈️❄️"),
            (99, "Thunderstorm with heavy hail", "⛈️❄️"),
        ];

        assert_eq!(expected.len(), KNOWN_CODES.len());
        for (code, description, icon) in expected {
            assert_eq!(lookup(code), ConditionEntry { description, icon }, "code {code}");
        }
    }

    #[test]
    fn known_codes_never_fall_back() {
        for code in KNOWN_CODES {
            assert_ne!(lookup(code), UNKNOWN, "code {code}");
        }
    }

    #[test]
    fn absent_codes_fall_back() {
        for code in (-5..=120).filter(|c| !KNOWN_CODES.contains(c)) {
            assert_eq!(lookup(code), UNKNOWN, "code {code}");
        }
        assert_eq!(lookup(i32::MAX).description, "Unknown");
        assert_eq!(lookup(i32::MIN).icon, "🌈");
    }
}
