//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Location resolution (city search, device location, reverse geocoding)
//! - The Open-Meteo client and device locators behind provider traits
//! - The condition catalog, unit conversion and display rendering
//! - The controller event loop with its refresh timer
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;
pub mod resolver;
pub mod scheduler;
pub mod session;
pub mod units;

pub use config::{Config, Endpoints};
pub use controller::{Action, Controller, ControllerSettings, Startup};
pub use error::WeatherError;
pub use model::{
    Coordinates, CurrentConditions, Observation, Place, ResolutionStatus, ResolvedLocation,
    UnitSystem,
};
pub use provider::{DeviceLocator, Geocoder, LocateOptions, Services, WeatherProvider};
pub use render::WeatherView;
pub use resolver::LocationResolver;
