//! Card catalog: static definitions loaded once at startup.
//!
//! The catalog is the only process-wide shared state. It transitions from
//! empty to populated exactly once behind a `OnceLock`; after that it is
//! read-only and shared freely. Tests construct `Catalog` values directly
//! and bypass the singleton.

mod actions;
mod loader;
mod rank;

use std::sync::OnceLock;

use serde::Serialize;

use crate::domain::cards::{Effect, MetricVector};
use crate::error::AppError;

pub use actions::builtin_actions;
pub use loader::{load_from_path, parse_cars};
pub use rank::CarRank;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDefinition {
    pub id: String,
    pub name: String,
    pub metrics: MetricVector,
    /// Informational only; never consulted by the rules engine.
    pub rank: CarRank,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    pub id: String,
    pub name: String,
    pub effect: Effect,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    cars: Vec<CarDefinition>,
    actions: Vec<ActionDefinition>,
}

impl Catalog {
    pub fn new(cars: Vec<CarDefinition>, actions: Vec<ActionDefinition>) -> Self {
        Self { cars, actions }
    }

    pub fn cars(&self) -> &[CarDefinition] {
        &self.cars
    }

    pub fn actions(&self) -> &[ActionDefinition] {
        &self.actions
    }
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// Install the process-wide catalog. Single-shot: a second call is a
/// startup bug and fails loudly.
pub fn init_global(catalog: Catalog) -> Result<(), AppError> {
    CATALOG
        .set(catalog)
        .map_err(|_| AppError::catalog("catalog already initialized"))
}

pub fn global() -> Result<&'static Catalog, AppError> {
    CATALOG
        .get()
        .ok_or_else(|| AppError::catalog("catalog not initialized"))
}
