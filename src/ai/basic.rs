//! Minimal deterministic bot: first car in hand, seed-derived metric pick.

use super::{BotError, BotMove, BotPlayer};
use crate::domain::cards::Metric;
use crate::domain::plays::PlayPayload;
use crate::domain::state::{GameState, TurnPhase};

#[derive(Debug, Default)]
pub struct BasicBot;

impl BotPlayer for BasicBot {
    fn choose(&self, state: &GameState, player_id: &str) -> Result<BotMove, BotError> {
        let idx = state
            .player_index(player_id)
            .map_err(|e| BotError::Internal(e.to_string()))?;
        let hand = &state.players[idx].hand;

        if state.phase == TurnPhase::MustDiscard {
            let card = hand.first().ok_or(BotError::NoMove)?;
            return Ok(BotMove {
                card_instance_id: card.instance_id.clone(),
                payload: PlayPayload::default(),
            });
        }

        let car = hand.iter().find(|c| c.is_car()).ok_or(BotError::NoMove)?;

        // The metric pick rides the match seed rather than a separate RNG,
        // so a replay from the same seed repeats it.
        let selected_metric = if state.selected_metric_for_round.is_none() {
            Some(Metric::ALL[state.rng.peek_range(Metric::ALL.len())])
        } else {
            None
        };

        Ok(BotMove {
            card_instance_id: car.instance_id.clone(),
            payload: PlayPayload {
                selected_metric,
                target_player_id: None,
            },
        })
    }
}
