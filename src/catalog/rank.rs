//! Informational S-D car ranks from normalized weighted metric scores.

use serde::Serialize;

use super::CarDefinition;
use crate::domain::cards::Metric;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub enum CarRank {
    S,
    A,
    B,
    C,
    D,
}

/// Relative importance of each metric in the overall score.
const WEIGHTS: [(Metric, f64); 5] = [
    (Metric::Speed, 0.25),
    (Metric::Hp, 0.25),
    (Metric::Accel, 0.20),
    (Metric::Weight, 0.15),
    (Metric::Year, 0.15),
];

/// Quantile thresholds (fraction of cars scoring below) for S/A/B/C.
const QUANTILES: [(f64, CarRank); 4] = [
    (0.90, CarRank::S),
    (0.70, CarRank::A),
    (0.40, CarRank::B),
    (0.20, CarRank::C),
];

/// Score each car by min-max normalizing every metric across the catalog
/// (inverted for accel and weight, where lower is better), then bucket by
/// score quantile.
pub fn assign_ranks(cars: &mut [CarDefinition]) {
    if cars.is_empty() {
        return;
    }

    let scores: Vec<f64> = cars.iter().map(|car| score_car(car, cars)).collect();

    let mut sorted = scores.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));

    for (car, score) in cars.iter_mut().zip(scores.iter()) {
        let below = sorted.partition_point(|s| s < score);
        let quantile = below as f64 / sorted.len() as f64;
        car.rank = rank_for_quantile(quantile);
    }
}

fn score_car(car: &CarDefinition, all: &[CarDefinition]) -> f64 {
    WEIGHTS
        .iter()
        .map(|&(metric, weight)| weight * normalized(car, metric, all))
        .sum()
}

fn normalized(car: &CarDefinition, metric: Metric, all: &[CarDefinition]) -> f64 {
    let values: Vec<f64> = all.iter().map(|c| c.metrics.get(metric)).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return 0.5;
    }
    let fraction = (car.metrics.get(metric) - min) / (max - min);
    if metric.lower_wins() {
        1.0 - fraction
    } else {
        fraction
    }
}

fn rank_for_quantile(quantile: f64) -> CarRank {
    for &(threshold, rank) in &QUANTILES {
        if quantile >= threshold {
            return rank;
        }
    }
    CarRank::D
}
