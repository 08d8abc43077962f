//! Bot players.

mod basic;

use std::fmt;

use crate::domain::plays::PlayPayload;
use crate::domain::state::GameState;

pub use basic::BasicBot;

#[derive(Debug)]
pub enum BotError {
    /// The bot has no legal move; the orchestrator forfeits it.
    NoMove,
    Internal(String),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::NoMove => write!(f, "no move available"),
            BotError::Internal(msg) => write!(f, "bot internal error: {msg}"),
        }
    }
}

impl std::error::Error for BotError {}

/// A chosen play: instance id plus the payload a human client would send.
#[derive(Debug, Clone)]
pub struct BotMove {
    pub card_instance_id: String,
    pub payload: PlayPayload,
}

/// Strategy interface for bot players.
///
/// Implementations must be `Send` (they are owned by the match actor) and
/// must never panic; return [`BotError`] instead. The orchestrator owns
/// timing and feeds the chosen move through the same engine path as a
/// human play.
pub trait BotPlayer: Send {
    fn choose(&self, state: &GameState, player_id: &str) -> Result<BotMove, BotError>;
}
