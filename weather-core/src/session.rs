use crate::model::{Coordinates, Observation, ResolutionStatus, ResolvedLocation, UnitSystem};

/// Mutable state of one display session, owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct Session {
    coordinates: Option<Coordinates>,
    label: Option<String>,
    units: UnitSystem,
    status: ResolutionStatus,
    generation: u64,
    last_observation: Option<Observation>,
}

impl Session {
    pub fn new(units: UnitSystem) -> Self {
        Self { units, ..Self::default() }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn status(&self) -> ResolutionStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_observation(&self) -> Option<&Observation> {
        self.last_observation.as_ref()
    }

    /// Start a new operation. Completions carrying an older generation are stale.
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn begin_resolution(&mut self) {
        self.status = ResolutionStatus::Pending;
    }

    /// Replace the coordinates and label; later fetches use only these.
    pub fn resolve(&mut self, location: ResolvedLocation) {
        self.coordinates = Some(location.coordinates);
        self.label = Some(location.label);
        self.status = ResolutionStatus::Resolved;
    }

    pub fn fail_resolution(&mut self) {
        self.status = ResolutionStatus::Failed;
    }

    pub fn toggle_units(&mut self) -> UnitSystem {
        self.units = self.units.toggled();
        self.units
    }

    pub fn remember(&mut self, observation: Observation) {
        self.last_observation = Some(observation);
    }
}
