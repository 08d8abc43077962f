//! One-shot catalog loading from the external car data source.

use serde::Deserialize;
use tracing::{info, warn};

use super::rank::assign_ranks;
use super::{builtin_actions, CarDefinition, CarRank, Catalog};
use crate::domain::cards::MetricVector;
use crate::error::AppError;

/// Shape of one record in the external car data file. Everything is
/// optional; validation decides what survives.
#[derive(Debug, Deserialize)]
struct RawCarRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default)]
    hp: Option<f64>,
    #[serde(default)]
    accel: Option<f64>,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    year: Option<f64>,
}

pub fn load_from_path(path: &str) -> Result<Catalog, AppError> {
    let raw = std::fs::read_to_string(path).map_err(|err| AppError::Catalog {
        detail: format!("cannot read card catalog {path}: {err}"),
    })?;
    let cars = parse_cars(&raw)?;
    info!(path, car_count = cars.len(), "Card catalog loaded");
    Ok(Catalog::new(cars, builtin_actions()))
}

/// Parse and validate car records. Cars with a missing or zero metric are
/// skipped, not errors: the data source is external and partially dirty.
pub fn parse_cars(json: &str) -> Result<Vec<CarDefinition>, AppError> {
    let records: Vec<RawCarRecord> = serde_json::from_str(json).map_err(|err| {
        AppError::Catalog {
            detail: format!("malformed card catalog: {err}"),
        }
    })?;

    let mut cars = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match validate_record(record, index) {
            Some(car) => cars.push(car),
            None => warn!(index, "Skipping invalid car record"),
        }
    }

    if cars.is_empty() {
        return Err(AppError::catalog("card catalog contains no valid cars"));
    }

    assign_ranks(&mut cars);
    Ok(cars)
}

fn validate_record(record: RawCarRecord, index: usize) -> Option<CarDefinition> {
    let name = record.name?;
    let metrics = MetricVector {
        speed: nonzero(record.speed)?,
        hp: nonzero(record.hp)?,
        accel: nonzero(record.accel)?,
        weight: nonzero(record.weight)?,
        year: nonzero(record.year)?,
    };
    let id = record.id.unwrap_or_else(|| format!("car-{index}"));
    Some(CarDefinition {
        id,
        name,
        metrics,
        rank: CarRank::D,
    })
}

fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}
