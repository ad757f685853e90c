use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, CustomType, Select, Text};
use weather_core::{
    Config, ControllerSettings, Coordinates, LocateOptions, LocationResolver, Services, Startup,
    UnitSystem, WeatherError, WeatherView, render,
};

use crate::{app, logging};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city or your location")]
pub struct Cli {
    /// Defaults to `watch`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Full-screen view with search, location lookup and unit toggle; refreshes periodically.
    Watch(WatchArgs),

    /// Print the current weather once and exit.
    Show {
        /// City to look up; the device location is used when omitted.
        city: Option<String>,

        /// Show °F and mph.
        #[arg(long)]
        imperial: bool,
    },

    /// Set defaults interactively.
    Configure,
}

#[derive(Debug, Default, Args)]
pub struct WatchArgs {
    /// Start with this city instead of locating the device.
    #[arg(long)]
    pub city: Option<String>,

    /// Start in °F and mph.
    #[arg(long)]
    pub imperial: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Watch(WatchArgs::default())) {
            Command::Watch(args) => watch(args).await,
            Command::Show { city, imperial } => show(city, imperial).await,
            Command::Configure => configure(),
        }
    }
}

async fn watch(args: WatchArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let log_path = Config::log_file_path()?;
    logging::init_file(&log_path)?;
    tracing::info!(log = %log_path.display(), "starting interactive view");

    let mut settings = ControllerSettings::from_config(&config);
    if args.imperial {
        settings.units = UnitSystem::Imperial;
    }
    if let Some(city) = args.city {
        settings.startup = Startup::Search(city);
    }

    app::run(Services::from_config(&config), settings).await
}

async fn show(city: Option<String>, imperial: bool) -> anyhow::Result<()> {
    logging::init_stderr();
    let config = Config::load()?;
    let units = if imperial { UnitSystem::Imperial } else { config.units };

    let services = Services::from_config(&config);
    let settings = ControllerSettings::from_config(&config);

    let view = match lookup(&services, settings.locate, city, units).await {
        Ok(view) => view,
        Err(err) => {
            tracing::warn!(error = ?err, "lookup failed");
            render::error_view(&err.to_string(), units)
        }
    };
    print!("{}", report(&view));

    Ok(())
}

async fn lookup(
    services: &Services,
    locate: LocateOptions,
    city: Option<String>,
    units: UnitSystem,
) -> Result<WeatherView, WeatherError> {
    let resolver = LocationResolver::new(services.geocoder.clone(), services.locator.clone(), locate);

    let location = match city {
        Some(city) => resolver.by_name(&city).await?,
        None => resolver.by_device().await?,
    };
    let observation = services.weather.current(location.coordinates).await?;

    Ok(render::render(
        &observation,
        units,
        Some(&location.label),
        Some(location.coordinates),
        Local::now(),
    ))
}

/// The one-shot text output; error views print the same way.
fn report(view: &WeatherView) -> String {
    format!(
        "{}  {}  {}\nLocation: {}\nHumidity: {}\nWind:     {}\n{}\n",
        view.icon,
        view.temperature,
        view.description,
        view.location,
        view.humidity,
        view.wind,
        view.updated,
    )
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    cfg.default_city = Text::new("Default city:")
        .with_default(&cfg.default_city)
        .with_help_message("Searched when the device location is unavailable at startup")
        .prompt()?;

    let units = [UnitSystem::Metric, UnitSystem::Imperial];
    let cursor = units.iter().position(|u| *u == cfg.units).unwrap_or(0);
    cfg.units = Select::new("Units:", units.to_vec()).with_starting_cursor(cursor).prompt()?;

    cfg.refresh_interval_secs = CustomType::<u64>::new("Refresh interval (seconds):")
        .with_default(cfg.refresh_interval_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    cfg.refetch_on_toggle = Confirm::new("Re-fetch weather when toggling units?")
        .with_default(cfg.refetch_on_toggle)
        .prompt()?;

    let pin = Confirm::new("Pin a device location instead of looking it up by IP?")
        .with_default(cfg.device_location.is_some())
        .prompt()?;

    cfg.device_location = if pin {
        let current = cfg.device_location.unwrap_or(Coordinates::new(0.0, 0.0));
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_default(current.latitude)
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_default(current.longitude)
            .prompt()?;
        Some(Coordinates::new(latitude, longitude))
    } else {
        None
    };

    cfg.validate().context("Configuration not saved")?;
    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::render::WARNING_ICON;

    #[test]
    fn report_lists_every_field() {
        let mut view = WeatherView::initial(UnitSystem::Metric);
        view.icon = "☀️".into();
        view.temperature = "30°".into();
        view.description = "Clear sky".into();
        view.location = "Hyderabad, Telangana, India".into();
        view.humidity = "40%".into();
        view.wind = "3 m/s".into();

        let out = report(&view);
        assert!(out.starts_with("☀️  30°  Clear sky\n"));
        assert!(out.contains("Location: Hyderabad, Telangana, India\n"));
        assert!(out.contains("Humidity: 40%\n"));
        assert!(out.contains("Wind:     3 m/s\n"));
    }

    #[test]
    fn errors_print_as_the_error_view() {
        let err = WeatherError::NotFound { query: "Atlantis".into() };
        let out = report(&render::error_view(&err.to_string(), UnitSystem::Metric));

        assert!(out.starts_with(&format!("{WARNING_ICON}  --°  Error\n")));
        assert!(out.contains("Location: City not found\n"));
        assert!(out.contains("Humidity: --\n"));
    }
}
