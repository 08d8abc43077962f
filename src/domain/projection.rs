//! Client-visible projection of game state.
//!
//! The projection for player P keeps P's hand intact, reduces every
//! opponent hand entry to its instance id plus a sentinel definition id,
//! replaces the draw pile with its size, and drops the RNG. This is the
//! unit the orchestrator diffs against the last snapshot sent to P.

use serde::Serialize;

use crate::domain::cards::{CardInstance, CardKind, Effect, Metric, MetricVector};
use crate::domain::state::{BoardSide, GameState, GameStatus, PendingModifier, TurnPhase};

/// Definition id a hidden opponent card presents instead of its own.
pub const HIDDEN_DEFINITION_ID: &str = "card-back";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub instance_id: String,
    pub definition_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<CardKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_metrics: Option<MetricVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_metrics: Option<MetricVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_modified_permanently: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<Effect>,
}

impl CardView {
    fn full(card: &CardInstance) -> Self {
        Self {
            instance_id: card.instance_id.clone(),
            definition_id: card.definition_id.clone(),
            name: Some(card.name.clone()),
            kind: Some(card.kind),
            current_metrics: card.current_metrics,
            original_metrics: card.original_metrics,
            is_modified_permanently: Some(card.is_modified_permanently),
            effect: card.effect.clone(),
        }
    }

    fn hidden(card: &CardInstance) -> Self {
        Self {
            instance_id: card.instance_id.clone(),
            definition_id: HIDDEN_DEFINITION_ID.to_string(),
            name: None,
            kind: None,
            current_metrics: None,
            original_metrics: None,
            is_modified_permanently: None,
            effect: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: String,
    pub name: String,
    pub hand: Vec<CardView>,
    pub score: u32,
    pub is_bot: bool,
}

/// Board cards are public, so both sides project fully.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub car: Option<CardView>,
    pub action: Option<CardView>,
}

impl BoardView {
    fn from_side(side: &BoardSide) -> Self {
        Self {
            car: side.car.as_ref().map(CardView::full),
            action: side.action.as_ref().map(CardView::full),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub game_id: String,
    pub players: Vec<PlayerView>,
    pub current_player_id: String,
    pub game_status: GameStatus,
    pub round_winner_id: Option<String>,
    pub winner_id: Option<String>,
    pub selected_metric_for_round: Option<Metric>,
    pub board: Vec<BoardView>,
    pub draw_pile_size: usize,
    pub discard_pile: Vec<CardView>,
    pub last_played_instance_id: Option<String>,
    pub turn_started_at_ms: u64,
    pub turn_time_limit_ms: u64,
    pub log: Vec<String>,
    pub extra_turn_player_id: Option<String>,
    pub phase: TurnPhase,
    pub pending_modifiers: Vec<Option<PendingModifier>>,
}

pub fn project_for(state: &GameState, viewer_id: &str) -> GameView {
    let players = state
        .players
        .iter()
        .map(|p| {
            let own = p.id == viewer_id;
            PlayerView {
                id: p.id.clone(),
                name: p.name.clone(),
                hand: p
                    .hand
                    .iter()
                    .map(|c| if own { CardView::full(c) } else { CardView::hidden(c) })
                    .collect(),
                score: p.score,
                is_bot: p.is_bot,
            }
        })
        .collect();

    GameView {
        game_id: state.game_id.clone(),
        players,
        current_player_id: state.current_player_id.clone(),
        game_status: state.game_status,
        round_winner_id: state.round_winner_id.clone(),
        winner_id: state.winner_id.clone(),
        selected_metric_for_round: state.selected_metric_for_round,
        board: state.board.iter().map(BoardView::from_side).collect(),
        draw_pile_size: state.draw_pile.len(),
        discard_pile: state.discard_pile.iter().map(CardView::full).collect(),
        last_played_instance_id: state.last_played_instance_id.clone(),
        turn_started_at_ms: state.turn_started_at_ms,
        turn_time_limit_ms: state.turn_time_limit_ms,
        log: state.log.clone(),
        extra_turn_player_id: state.extra_turn_player_id.clone(),
        phase: state.phase,
        pending_modifiers: state.pending_modifiers.to_vec(),
    }
}

/// Projection as a JSON value, ready for diffing and the wire.
pub fn project_value(state: &GameState, viewer_id: &str) -> serde_json::Value {
    serde_json::to_value(project_for(state, viewer_id))
        .unwrap_or_else(|_| serde_json::Value::Null)
}
