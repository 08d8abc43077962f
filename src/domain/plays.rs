//! Play submission: validation, action-card resolution, and pending
//! modifier application.
//!
//! Every function here is a pure transformation: the input state is
//! cloned, the clone is mutated, and a rejected play returns the error
//! without the caller's state ever changing.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{CardKind, Effect, EffectTarget, Metric, ModifierKind};
use crate::domain::state::{
    GameState, GameStatus, PendingModifier, TurnPhase, MIN_TURN_TIME_MS,
};
use crate::errors::domain::DomainError;

/// Client-supplied play details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayPayload {
    pub selected_metric: Option<Metric>,
    pub target_player_id: Option<String>,
}

/// Submit a play (or, in the `must_discard` phase, a discard selection).
pub fn submit_play(
    state: &GameState,
    player_id: &str,
    instance_id: &str,
    payload: &PlayPayload,
) -> Result<GameState, DomainError> {
    if state.game_status != GameStatus::Playing {
        return Err(DomainError::validation("the game is already over"));
    }
    if player_id != state.current_player_id {
        return Err(DomainError::validation("it is not your turn"));
    }

    let mut s = state.clone();
    let idx = s.player_index(player_id)?;

    if s.phase == TurnPhase::MustDiscard {
        return discard_card(s, idx, instance_id);
    }

    let kind = s.players[idx]
        .hand
        .iter()
        .find(|c| c.instance_id == instance_id)
        .map(|c| c.kind)
        .ok_or_else(|| DomainError::validation("that card is not in your hand"))?;

    match kind {
        CardKind::Action => play_action_card(s, idx, instance_id, payload),
        CardKind::Car => play_car_card(s, idx, instance_id, payload),
    }
}

fn discard_card(
    mut s: GameState,
    idx: usize,
    instance_id: &str,
) -> Result<GameState, DomainError> {
    let card = s.players[idx]
        .take_card(instance_id)
        .ok_or_else(|| DomainError::validation("that card is not in your hand"))?;
    s.push_log(format!("{} discards {}", s.players[idx].name, card.name));
    s.discard_pile.push(card);
    s.phase = TurnPhase::RoundResolved;
    Ok(s)
}

fn play_action_card(
    mut s: GameState,
    idx: usize,
    instance_id: &str,
    payload: &PlayPayload,
) -> Result<GameState, DomainError> {
    if s.phase != TurnPhase::WaitingForInitialPlay {
        return Err(DomainError::validation(
            "action cards can only be played at the start of your turn",
        ));
    }

    let card = s.players[idx]
        .take_card(instance_id)
        .ok_or_else(|| DomainError::validation("that card is not in your hand"))?;
    let effect = card.effect.clone().ok_or_else(|| {
        DomainError::inconsistency(format!("action card {instance_id} has no effect"))
    })?;

    s.push_log(format!("{} plays {}", s.players[idx].name, card.name));
    apply_action_effect(&mut s, idx, instance_id, &effect, payload)?;

    s.board[idx].action = Some(card);
    s.last_played_instance_id = Some(instance_id.to_string());
    s.phase = TurnPhase::WaitingForCarCardAfterAction;
    Ok(s)
}

fn apply_action_effect(
    s: &mut GameState,
    idx: usize,
    instance_id: &str,
    effect: &Effect,
    payload: &PlayPayload,
) -> Result<(), DomainError> {
    let player_id = s.players[idx].id.clone();
    let opp = GameState::opponent_index(idx);

    match effect {
        Effect::TimeMod { seconds } => {
            let adjusted = s.turn_time_limit_ms as i64 + seconds * 1000;
            s.turn_time_limit_ms = adjusted.max(MIN_TURN_TIME_MS as i64) as u64;
            s.push_log(format!(
                "Turn time limit is now {} s",
                s.turn_time_limit_ms / 1000
            ));
        }
        Effect::OverrideMetric { allowed } => {
            let metric = payload.selected_metric.ok_or_else(|| {
                DomainError::validation("this card requires choosing a metric")
            })?;
            if !allowed.contains(&metric) {
                return Err(DomainError::validation(format!(
                    "{metric} cannot be chosen with this card"
                )));
            }
            s.selected_metric_for_round = Some(metric);
            s.push_log(format!("Round metric overridden to {metric}"));
        }
        Effect::MetricModTemp { target, .. } | Effect::MetricModPerm { target, .. } => {
            let target_idx = match target {
                EffectTarget::Own => idx,
                EffectTarget::Opponent => opp,
            };
            s.pending_modifiers[target_idx] = Some(PendingModifier {
                source_player_id: player_id,
                source_instance_id: instance_id.to_string(),
                effect: effect.clone(),
            });
            s.push_log(format!(
                "A modifier now awaits {}'s next car",
                s.players[target_idx].name
            ));
        }
        Effect::DropCard => {
            let hand_len = s.players[opp].hand.len();
            if hand_len == 0 {
                s.push_log(format!("{} has no cards to lose", s.players[opp].name));
            } else {
                s.rng.perturb(hand_len as u32);
                let pick = s.rng.next_range(hand_len);
                let lost = s.players[opp].hand.remove(pick);
                s.push_log(format!("{} loses {}", s.players[opp].name, lost.name));
                s.discard_pile.push(lost);
            }
        }
        Effect::ExtraTurn => {
            s.extra_turn_player_id = Some(player_id.clone());
            s.push_log(format!("{} will take an extra turn", s.players[idx].name));
        }
    }
    Ok(())
}

fn play_car_card(
    mut s: GameState,
    idx: usize,
    instance_id: &str,
    payload: &PlayPayload,
) -> Result<GameState, DomainError> {
    if !matches!(
        s.phase,
        TurnPhase::WaitingForInitialPlay | TurnPhase::WaitingForCarCardAfterAction
    ) {
        return Err(DomainError::validation("you cannot play a car card right now"));
    }

    // The first car of a round fixes the metric, unless an override
    // already set it. Later plays ignore any supplied selection.
    if s.selected_metric_for_round.is_none() {
        let metric = payload.selected_metric.ok_or_else(|| {
            DomainError::validation("the first car of a round needs a metric selection")
        })?;
        s.selected_metric_for_round = Some(metric);
        s.push_log(format!("Round metric: {metric}"));
    }

    let mut card = s.players[idx]
        .take_card(instance_id)
        .ok_or_else(|| DomainError::validation("that card is not in your hand"))?;

    if let Some(pending) = s.pending_modifiers[idx].take() {
        let (target_metric, value, modifier_type, permanent) = match pending.effect {
            Effect::MetricModTemp {
                target_metric,
                value,
                modifier_type,
                ..
            } => (target_metric, value, modifier_type, false),
            Effect::MetricModPerm {
                target_metric,
                value,
                modifier_type,
                ..
            } => (target_metric, value, modifier_type, true),
            other => {
                return Err(DomainError::inconsistency(format!(
                    "pending modifier carries a non-metric effect: {other:?}"
                )))
            }
        };

        let original = card.original_metric(target_metric)?;
        let modified = match modifier_type {
            ModifierKind::Percentage => original * (1.0 + value / 100.0),
            ModifierKind::Absolute => original + value,
        };
        let metrics = card.current_metrics.as_mut().ok_or_else(|| {
            DomainError::inconsistency(format!("car {instance_id} has no metrics"))
        })?;
        metrics.set(target_metric, modified);

        if permanent {
            card.is_modified_permanently = true;
        } else {
            s.board[idx].temp_modified_metric = Some(target_metric);
        }
        s.push_log(format!(
            "{}'s {} is modified: {} {} -> {}",
            s.players[idx].name, card.name, target_metric, original, modified
        ));
    }

    s.push_log(format!("{} plays {}", s.players[idx].name, card.name));
    s.last_played_instance_id = Some(card.instance_id.clone());
    s.board[idx].car = Some(card);

    let both_on_board = s.board.iter().all(|side| side.car.is_some());
    s.phase = if both_on_board {
        TurnPhase::BothCardsOnBoard
    } else {
        TurnPhase::TurnEnded
    };
    Ok(s)
}
