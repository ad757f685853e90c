use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::{Coordinates, UnitSystem};

/// Service base URLs. Overridable so tests and mirrors can point elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Open-Meteo geocoding API, serving `/search` and `/reverse`.
    pub geocoding_url: String,
    /// Open-Meteo forecast API, serving `/forecast`.
    pub forecast_url: String,
    /// IP geolocation endpoint used when no device location is pinned.
    pub ip_locate_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com/v1".to_string(),
            forecast_url: "https://api.open-meteo.com/v1".to_string(),
            ip_locate_url: "http://ip-api.com/json".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_city = "Hyderabad"
/// units = "metric"
///
/// [device_location]
/// latitude = 17.38
/// longitude = 78.45
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// City searched when startup geolocation does not resolve in time.
    pub default_city: String,
    pub units: UnitSystem,
    pub refresh_interval_secs: u64,
    pub startup_grace_secs: u64,
    pub locate_timeout_secs: u64,
    /// Re-fetch on unit toggle instead of re-rendering the last observation.
    pub refetch_on_toggle: bool,
    /// Geocoding result language.
    pub language: String,
    /// Pinned device position; when absent the host is located by IP.
    pub device_location: Option<Coordinates>,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_city: "Hyderabad".to_string(),
            units: UnitSystem::Metric,
            refresh_interval_secs: 5 * 60,
            startup_grace_secs: 4,
            locate_timeout_secs: 10,
            refetch_on_toggle: true,
            language: "en".to_string(),
            device_location: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn startup_grace(&self) -> Duration {
        Duration::from_secs(self.startup_grace_secs)
    }

    pub fn locate_timeout(&self) -> Duration {
        Duration::from_secs(self.locate_timeout_secs)
    }

    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            bail!("refresh_interval_secs must be greater than zero");
        }
        if self.locate_timeout_secs == 0 {
            bail!("locate_timeout_secs must be greater than zero");
        }
        if self.default_city.trim().is_empty() {
            bail!("default_city must not be empty");
        }
        if let Some(coords) = self.device_location {
            if !coords.is_valid() {
                bail!(
                    "device_location out of range: latitude must be -90..90, longitude -180..180 (got {}, {})",
                    coords.latitude,
                    coords.longitude
                );
            }
        }
        Ok(())
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the log file written by the interactive view.
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.data_local_dir().join("weather.log"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-task", "weather-cli")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();

        assert_eq!(cfg.default_city, "Hyderabad");
        assert_eq!(cfg.units, UnitSystem::Metric);
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(300));
        assert_eq!(cfg.startup_grace(), Duration::from_secs(4));
        assert_eq!(cfg.locate_timeout(), Duration::from_secs(10));
        assert!(cfg.refetch_on_toggle);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "default_city = \"Oslo\"\nunits = \"imperial\"\n\n[endpoints]\nforecast_url = \"http://localhost:9999\"\n",
        )
        .expect("write");

        let cfg = Config::load_from(&path).expect("parse");
        assert_eq!(cfg.default_city, "Oslo");
        assert_eq!(cfg.units, UnitSystem::Imperial);
        assert_eq!(cfg.refresh_interval_secs, 300);
        assert_eq!(cfg.endpoints.forecast_url, "http://localhost:9999");
        assert_eq!(cfg.endpoints.geocoding_url, Endpoints::default().geocoding_url);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            default_city: "Lisbon".into(),
            refetch_on_toggle: false,
            device_location: Some(Coordinates::new(38.72, -9.14)),
            ..Config::default()
        };
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let cfg = Config { refresh_interval_secs: 0, ..Config::default() };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("refresh_interval_secs"));
    }

    #[test]
    fn validate_rejects_out_of_range_device_location() {
        let cfg = Config {
            device_location: Some(Coordinates::new(120.0, 0.0)),
            ..Config::default()
        };
        assert!(cfg.validate().unwrap_err().to_string().contains("device_location"));
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "refresh_interval_secs = 0\n").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }
}
