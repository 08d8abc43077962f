//! Domain layer: pure rules-engine types and operations.

pub mod cards;
pub mod plays;
pub mod projection;
pub mod resolution;
pub mod rng;
pub mod setup;
pub mod state;

#[cfg(test)]
mod tests_effects;
#[cfg(test)]
mod tests_engine;
#[cfg(test)]
mod tests_projection;

// Re-exports for ergonomics
pub use cards::{CardInstance, CardKind, Effect, EffectTarget, Metric, MetricVector, ModifierKind};
pub use plays::{submit_play, PlayPayload};
pub use projection::{project_for, project_value, GameView, HIDDEN_DEFINITION_ID};
pub use resolution::{advance_turn, end_turn, forfeit, resolve_round};
pub use rng::GameRng;
pub use setup::{initialize_game, PlayerSpec};
pub use state::{GameState, GameStatus, PlayerState, TurnPhase};
