//! The complete state of one match, plus invariant accessors.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{CardInstance, Effect, Metric};
use crate::domain::rng::GameRng;
use crate::errors::domain::DomainError;

pub const PLAYERS: usize = 2;
/// A hand above this size forces a discard after round resolution.
pub const MAX_HAND_SIZE: usize = 10;
/// Cards dealt to each player at initialization.
pub const INITIAL_HAND_SIZE: usize = 7;
/// time_mod effects never push the turn limit below this.
pub const MIN_TURN_TIME_MS: u64 = 5_000;

/// Per-turn phase. Transitions are produced exclusively by engine steps.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    WaitingForInitialPlay,
    WaitingForCarCardAfterAction,
    BothCardsOnBoard,
    MustDiscard,
    RoundResolved,
    TurnEnded,
}

impl TurnPhase {
    /// Phases in which the current player is expected to act.
    pub fn is_interactive(self) -> bool {
        matches!(
            self,
            TurnPhase::WaitingForInitialPlay
                | TurnPhase::WaitingForCarCardAfterAction
                | TurnPhase::MustDiscard
        )
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Win,
    Tie,
}

/// A metric modification queued against the target player's next car play.
///
/// Both the source player and the source action-card instance are kept so
/// the modifier can be traced back to the action card on the source
/// player's board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingModifier {
    pub source_player_id: String,
    pub source_instance_id: String,
    pub effect: Effect,
}

/// One player's side of the board for the current round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSide {
    pub car: Option<CardInstance>,
    pub action: Option<CardInstance>,
    /// Metric temporarily rewritten on `car` by a metric_mod_temp effect;
    /// reverted to the original value when the card leaves the board.
    pub temp_modified_metric: Option<Metric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub id: String,
    pub name: String,
    pub hand: Vec<CardInstance>,
    pub score: u32,
    pub is_bot: bool,
}

impl PlayerState {
    pub fn has_car_card(&self) -> bool {
        self.hand.iter().any(|c| c.is_car())
    }

    /// Remove a card by instance id, preserving the order of the rest.
    pub fn take_card(&mut self, instance_id: &str) -> Option<CardInstance> {
        let pos = self.hand.iter().position(|c| c.instance_id == instance_id)?;
        Some(self.hand.remove(pos))
    }
}

/// Entire match container, sufficient for pure engine operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub game_id: String,
    pub players: [PlayerState; PLAYERS],
    pub current_player_id: String,
    pub game_status: GameStatus,
    pub round_winner_id: Option<String>,
    pub winner_id: Option<String>,
    pub selected_metric_for_round: Option<Metric>,
    /// Board sides indexed like `players`.
    pub board: [BoardSide; PLAYERS],
    pub draw_pile: Vec<CardInstance>,
    pub discard_pile: Vec<CardInstance>,
    pub last_played_instance_id: Option<String>,
    pub turn_started_at_ms: u64,
    pub turn_time_limit_ms: u64,
    pub rng: GameRng,
    pub log: Vec<String>,
    pub extra_turn_player_id: Option<String>,
    pub phase: TurnPhase,
    /// At most one pending metric modifier per target player, indexed
    /// like `players`.
    pub pending_modifiers: [Option<PendingModifier>; PLAYERS],
}

impl GameState {
    pub fn player_index(&self, player_id: &str) -> Result<usize, DomainError> {
        self.players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| DomainError::inconsistency(format!("unknown player {player_id}")))
    }

    pub fn opponent_index(idx: usize) -> usize {
        1 - idx
    }

    pub fn current_index(&self) -> Result<usize, DomainError> {
        let id = self.current_player_id.clone();
        self.player_index(&id)
    }

    pub fn opponent_id_of(&self, player_id: &str) -> Result<String, DomainError> {
        let idx = self.player_index(player_id)?;
        Ok(self.players[Self::opponent_index(idx)].id.clone())
    }

    pub fn push_log(&mut self, entry: impl Into<String>) {
        self.log.push(entry.into());
    }
}

pub fn require_selected_metric(state: &GameState) -> Result<Metric, DomainError> {
    state.selected_metric_for_round.ok_or_else(|| {
        DomainError::inconsistency("round resolution without a selected metric")
    })
}
