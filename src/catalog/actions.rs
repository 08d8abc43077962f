//! The fixed set of action-card definitions.

use super::ActionDefinition;
use crate::domain::cards::{Effect, EffectTarget, Metric, ModifierKind};

pub fn builtin_actions() -> Vec<ActionDefinition> {
    vec![
        ActionDefinition {
            id: "act-nitro".to_string(),
            name: "Nitro Boost".to_string(),
            effect: Effect::MetricModTemp {
                target_metric: Metric::Speed,
                value: 20.0,
                modifier_type: ModifierKind::Percentage,
                target: EffectTarget::Own,
            },
        },
        ActionDefinition {
            id: "act-turbo".to_string(),
            name: "Turbocharger".to_string(),
            effect: Effect::MetricModPerm {
                target_metric: Metric::Hp,
                value: 50.0,
                modifier_type: ModifierKind::Absolute,
                target: EffectTarget::Own,
            },
        },
        ActionDefinition {
            id: "act-sand".to_string(),
            name: "Sand in the Tank".to_string(),
            effect: Effect::MetricModTemp {
                target_metric: Metric::Speed,
                value: -20.0,
                modifier_type: ModifierKind::Percentage,
                target: EffectTarget::Opponent,
            },
        },
        ActionDefinition {
            id: "act-ballast".to_string(),
            name: "Ballast".to_string(),
            effect: Effect::MetricModTemp {
                target_metric: Metric::Weight,
                value: 15.0,
                modifier_type: ModifierKind::Percentage,
                target: EffectTarget::Opponent,
            },
        },
        ActionDefinition {
            id: "act-overtime".to_string(),
            name: "Overtime".to_string(),
            effect: Effect::TimeMod { seconds: 30 },
        },
        ActionDefinition {
            id: "act-pressure".to_string(),
            name: "Time Pressure".to_string(),
            effect: Effect::TimeMod { seconds: -10 },
        },
        ActionDefinition {
            id: "act-wildcard".to_string(),
            name: "Wildcard".to_string(),
            effect: Effect::OverrideMetric {
                allowed: Metric::ALL.to_vec(),
            },
        },
        ActionDefinition {
            id: "act-tow".to_string(),
            name: "Tow Truck".to_string(),
            effect: Effect::DropCard,
        },
        ActionDefinition {
            id: "act-encore".to_string(),
            name: "Encore Lap".to_string(),
            effect: Effect::ExtraTurn,
        },
    ]
}
