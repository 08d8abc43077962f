//! Card-related types: metrics, effects, and runtime card instances.

use serde::{Deserialize, Serialize};

use crate::errors::domain::DomainError;

/// The five comparable attributes of a car card.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Speed,
    Hp,
    Accel,
    Weight,
    Year,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Speed,
        Metric::Hp,
        Metric::Accel,
        Metric::Weight,
        Metric::Year,
    ];

    /// Acceleration is seconds-to-speed and weight is mass: less is better.
    pub fn lower_wins(self) -> bool {
        matches!(self, Metric::Accel | Metric::Weight)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Speed => "speed",
            Metric::Hp => "hp",
            Metric::Accel => "accel",
            Metric::Weight => "weight",
            Metric::Year => "year",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per metric.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricVector {
    pub speed: f64,
    pub hp: f64,
    pub accel: f64,
    pub weight: f64,
    pub year: f64,
}

impl MetricVector {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Speed => self.speed,
            Metric::Hp => self.hp,
            Metric::Accel => self.accel,
            Metric::Weight => self.weight,
            Metric::Year => self.year,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::Speed => self.speed = value,
            Metric::Hp => self.hp = value,
            Metric::Accel => self.accel = value,
            Metric::Weight => self.weight = value,
            Metric::Year => self.year = value,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKind {
    Percentage,
    Absolute,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum EffectTarget {
    #[serde(rename = "self")]
    Own,
    #[serde(rename = "opponent")]
    Opponent,
}

/// Closed union of action-card effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Seconds added to (or removed from) the global turn time limit.
    TimeMod { seconds: i64 },
    /// Applies to the target player's next car card only.
    #[serde(rename_all = "camelCase")]
    MetricModTemp {
        target_metric: Metric,
        value: f64,
        modifier_type: ModifierKind,
        target: EffectTarget,
    },
    /// Imprinted into the car's current metrics for the rest of the match.
    #[serde(rename_all = "camelCase")]
    MetricModPerm {
        target_metric: Metric,
        value: f64,
        modifier_type: ModifierKind,
        target: EffectTarget,
    },
    /// The playing player picks the round metric from `allowed`.
    OverrideMetric { allowed: Vec<Metric> },
    /// The opponent loses one randomly selected card to the discard pile.
    DropCard,
    /// The current player acts again after this round resolves.
    ExtraTurn,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    Car,
    Action,
}

/// A runtime copy of a catalog definition with identity.
///
/// Identity (`instance_id`) is preserved across hand/board/discard moves.
/// Car instances carry both the current and the original metric vector;
/// `original_metrics` never mutates after minting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInstance {
    pub instance_id: String,
    pub definition_id: String,
    pub name: String,
    pub kind: CardKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_metrics: Option<MetricVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_metrics: Option<MetricVector>,
    #[serde(default)]
    pub is_modified_permanently: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<Effect>,
}

impl CardInstance {
    pub fn is_car(&self) -> bool {
        self.kind == CardKind::Car
    }

    pub fn current_metric(&self, metric: Metric) -> Result<f64, DomainError> {
        self.current_metrics
            .as_ref()
            .map(|m| m.get(metric))
            .ok_or_else(|| {
                DomainError::inconsistency(format!(
                    "card {} has no metrics but was compared",
                    self.instance_id
                ))
            })
    }

    pub fn original_metric(&self, metric: Metric) -> Result<f64, DomainError> {
        self.original_metrics
            .as_ref()
            .map(|m| m.get(metric))
            .ok_or_else(|| {
                DomainError::inconsistency(format!(
                    "card {} has no original metrics",
                    self.instance_id
                ))
            })
    }
}
