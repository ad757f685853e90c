//! The event loop tying user actions, network completions and the refresh
//! timer to the display.
//!
//! One task owns the [`Session`]. Network work runs in spawned tasks that
//! report back over a channel; each launched operation takes a new
//! generation, and completions from superseded generations are dropped.
//! A resolution reports the location as soon as it is known, then the
//! weather fetched for it.

use std::{future::Future, sync::Arc, time::Duration};

use chrono::Local;
use tokio::{
    sync::{mpsc, watch},
    time::Instant,
};
use tracing::{debug, info, warn};

use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, Observation, ResolutionStatus, ResolvedLocation, UnitSystem},
    provider::{LocateOptions, Services, WeatherProvider},
    render::{self, WeatherView},
    resolver::LocationResolver,
    scheduler::{RefreshTimer, wait_for},
    session::Session,
};

pub const SEARCHING_LABEL: &str = "Searching...";

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(String),
    Geolocate,
    ToggleUnits,
}

/// What the controller does before the first user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Startup {
    /// Geolocate; search the default city if that has not resolved after the grace period.
    Locate,
    Search(String),
    Idle,
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub units: UnitSystem,
    pub refresh_interval: Duration,
    pub startup_grace: Duration,
    pub default_city: String,
    pub refetch_on_toggle: bool,
    pub locate: LocateOptions,
    pub startup: Startup,
}

impl ControllerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            units: config.units,
            refresh_interval: config.refresh_interval(),
            startup_grace: config.startup_grace(),
            default_city: config.default_city.clone(),
            refetch_on_toggle: config.refetch_on_toggle,
            locate: LocateOptions { high_accuracy: false, timeout: config.locate_timeout() },
            startup: Startup::Locate,
        }
    }
}

#[derive(Debug)]
struct Completion {
    generation: u64,
    outcome: Outcome,
}

#[derive(Debug)]
enum Outcome {
    /// The location is known; its weather fetch follows.
    Located(ResolvedLocation),
    /// A weather fetch finished.
    Fetched(Result<Observation, WeatherError>),
    /// Resolution failed; no weather fetch ran.
    Unresolved(WeatherError),
}

/// Sends completions for one launched operation.
#[derive(Debug)]
struct Reporter {
    generation: u64,
    tx: mpsc::UnboundedSender<Completion>,
}

impl Reporter {
    fn send(&self, outcome: Outcome) {
        // The receiver lives as long as the controller.
        let _ = self.tx.send(Completion { generation: self.generation, outcome });
    }
}

#[derive(Debug)]
pub struct Controller {
    resolver: LocationResolver,
    weather: Arc<dyn WeatherProvider>,
    settings: ControllerSettings,
    session: Session,
    refresh: RefreshTimer,
    /// Deadline of the startup fallback and the generation it guards.
    grace: Option<(Instant, u64)>,
    view: watch::Sender<WeatherView>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl Controller {
    pub fn new(services: Services, settings: ControllerSettings) -> Self {
        let resolver = LocationResolver::new(services.geocoder, services.locator, settings.locate);
        let (view, _) = watch::channel(WeatherView::initial(settings.units));
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Self {
            resolver,
            weather: services.weather,
            session: Session::new(settings.units),
            refresh: RefreshTimer::new(settings.refresh_interval),
            grace: None,
            settings,
            view,
            completions_tx,
            completions_rx,
        }
    }

    /// Receives a full snapshot after every change to the display.
    pub fn subscribe(&self) -> watch::Receiver<WeatherView> {
        self.view.subscribe()
    }

    /// Run until the action channel closes.
    pub async fn run(mut self, mut actions: mpsc::Receiver<Action>) {
        self.start();

        loop {
            tokio::select! {
                action = actions.recv() => match action {
                    Some(action) => self.handle(action),
                    None => break,
                },
                Some(done) = self.completions_rx.recv() => self.complete(done),
                _ = wait_for(self.refresh.deadline()) => self.refresh_due(),
                _ = wait_for(self.grace.map(|(at, _)| at)) => self.grace_elapsed(),
            }
        }

        debug!("action channel closed, controller stopping");
    }

    fn start(&mut self) {
        match self.settings.startup.clone() {
            Startup::Locate => {
                self.geolocate();
                let deadline = Instant::now() + self.settings.startup_grace;
                self.grace = Some((deadline, self.session.generation()));
            }
            Startup::Search(city) => self.search(&city),
            Startup::Idle => {}
        }
    }

    fn handle(&mut self, action: Action) {
        debug!(?action, "user action");
        match action {
            Action::Search(city) => self.search(&city),
            Action::Geolocate => self.geolocate(),
            Action::ToggleUnits => self.toggle_units(),
        }
    }

    fn search(&mut self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            debug!("ignoring blank search");
            return;
        }

        self.view.send_modify(|v| {
            v.location = SEARCHING_LABEL.to_string();
            v.loading = true;
        });
        self.session.begin_resolution();

        let resolver = self.resolver.clone();
        let city = city.to_string();
        self.resolve_with(async move { resolver.by_name(&city).await });
    }

    fn geolocate(&mut self) {
        self.view.send_modify(|v| v.loading = true);
        self.session.begin_resolution();

        let resolver = self.resolver.clone();
        self.resolve_with(async move { resolver.by_device().await });
    }

    fn resolve_with<R>(&mut self, resolution: R)
    where
        R: Future<Output = Result<ResolvedLocation, WeatherError>> + Send + 'static,
    {
        let weather = self.weather.clone();
        self.launch(|report| async move {
            match resolution.await {
                Ok(location) => {
                    let coords = location.coordinates;
                    report.send(Outcome::Located(location));
                    report.send(Outcome::Fetched(weather.current(coords).await));
                }
                Err(e) => report.send(Outcome::Unresolved(e)),
            }
        });
    }

    fn fetch_at(&mut self, coords: Coordinates) {
        self.view.send_modify(|v| v.loading = true);

        let weather = self.weather.clone();
        self.launch(|report| async move {
            report.send(Outcome::Fetched(weather.current(coords).await));
        });
    }

    fn toggle_units(&mut self) {
        let units = self.session.toggle_units();
        self.view.send_modify(|v| v.unit_label = units.toggle_label().to_string());
        info!(%units, "units toggled");

        let Some(coords) = self.session.coordinates() else {
            return;
        };
        // A pending resolution renders with the new units when it completes.
        if self.session.status() == ResolutionStatus::Pending {
            return;
        }

        if self.settings.refetch_on_toggle {
            self.fetch_at(coords);
        } else if let Some(observation) = self.session.last_observation().cloned() {
            self.show(observation);
        }
    }

    fn launch<W, F>(&mut self, work: W)
    where
        W: FnOnce(Reporter) -> F,
        F: Future<Output = ()> + Send + 'static,
    {
        let report = Reporter {
            generation: self.session.next_generation(),
            tx: self.completions_tx.clone(),
        };
        tokio::spawn(work(report));
    }

    fn complete(&mut self, done: Completion) {
        let current = self.session.is_current(done.generation);

        // Every finished fetch keeps the refresh cycle alive, superseded or not.
        if matches!(done.outcome, Outcome::Fetched(_)) && (current || !self.refresh.is_armed()) {
            self.refresh.arm();
        }

        if !current {
            debug!(
                generation = done.generation,
                latest = self.session.generation(),
                "discarding stale completion"
            );
            return;
        }

        match done.outcome {
            Outcome::Located(location) => {
                info!(label = %location.label, "location resolved");
                let label = location.label.clone();
                self.session.resolve(location);
                self.view.send_modify(|v| v.location = label);
            }
            Outcome::Fetched(weather) => self.apply(weather),
            Outcome::Unresolved(err) => {
                warn!(error = ?err, "location could not be resolved");
                self.session.fail_resolution();
                self.show_error(&err);
            }
        }
    }

    fn apply(&mut self, weather: Result<Observation, WeatherError>) {
        match weather {
            Ok(observation) => self.show(observation),
            Err(err) => {
                warn!(error = %err, "weather fetch failed");
                self.show_error(&err);
            }
        }
    }

    fn show(&mut self, observation: Observation) {
        let view = render::render(
            &observation,
            self.session.units(),
            self.session.label(),
            self.session.coordinates(),
            Local::now(),
        );
        self.session.remember(observation);
        self.view.send_replace(view);
    }

    fn show_error(&mut self, err: &WeatherError) {
        self.view.send_replace(render::error_view(&err.to_string(), self.session.units()));
    }

    fn refresh_due(&mut self) {
        if self.session.status() == ResolutionStatus::Pending {
            debug!("refresh due during a pending resolution, postponing");
            self.refresh.arm();
            return;
        }

        self.refresh.disarm();
        match self.session.coordinates() {
            Some(coords) => {
                info!(lat = coords.latitude, lon = coords.longitude, "scheduled refresh");
                self.fetch_at(coords);
            }
            None => debug!("refresh due but no coordinates known"),
        }
    }

    fn grace_elapsed(&mut self) {
        let Some((_, startup_generation)) = self.grace.take() else {
            return;
        };

        let superseded = self.session.generation() != startup_generation;
        if superseded || self.session.status().is_resolved() {
            return;
        }

        let city = self.settings.default_city.clone();
        info!(%city, "startup location not resolved, using default city");
        self.search(&city);
    }
}
