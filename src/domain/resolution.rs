//! Round resolution, turn rotation, and game-end handling.

use crate::domain::cards::Metric;
use crate::domain::state::{
    require_selected_metric, GameState, GameStatus, TurnPhase, MAX_HAND_SIZE,
};
use crate::errors::domain::DomainError;

/// Compare the cars on board and apply the round outcome.
///
/// The winner absorbs both cars and scores; a tie returns each car to its
/// owner. Temporary metric modifications revert when the car leaves the
/// board; action cards go to the discard pile.
pub fn resolve_round(state: &GameState) -> Result<GameState, DomainError> {
    if state.phase != TurnPhase::BothCardsOnBoard {
        return Err(DomainError::validation("no round is awaiting resolution"));
    }

    let mut s = state.clone();
    let metric = require_selected_metric(&s)?;

    let mut cars = [
        s.board[0]
            .car
            .take()
            .ok_or_else(|| DomainError::inconsistency("missing car on board side 0"))?,
        s.board[1]
            .car
            .take()
            .ok_or_else(|| DomainError::inconsistency("missing car on board side 1"))?,
    ];

    let values = [
        cars[0].current_metric(metric)?,
        cars[1].current_metric(metric)?,
    ];
    let winner_idx = compare(metric, values);

    let spent_actions: Vec<_> = s
        .board
        .iter_mut()
        .filter_map(|side| side.action.take())
        .collect();
    s.discard_pile.extend(spent_actions);
    for (side, car) in s.board.iter_mut().zip(cars.iter_mut()) {
        if let Some(temp) = side.temp_modified_metric.take() {
            let original = car.original_metric(temp)?;
            if let Some(metrics) = car.current_metrics.as_mut() {
                metrics.set(temp, original);
            }
        }
    }

    let [car0, car1] = cars;
    match winner_idx {
        Some(w) => {
            let winner_name = s.players[w].name.clone();
            s.push_log(format!(
                "{metric}: {} vs {}, {winner_name} wins the round",
                values[0], values[1]
            ));
            s.players[w].hand.push(car0);
            s.players[w].hand.push(car1);
            s.players[w].score += 1;
            s.round_winner_id = Some(s.players[w].id.clone());
        }
        None => {
            s.push_log(format!("{metric}: {} vs {}, round tied", values[0], values[1]));
            s.players[0].hand.push(car0);
            s.players[1].hand.push(car1);
            s.round_winner_id = None;
        }
    }

    match winner_idx {
        Some(w) if s.players[w].hand.len() > MAX_HAND_SIZE => {
            s.current_player_id = s.players[w].id.clone();
            s.phase = TurnPhase::MustDiscard;
            s.push_log(format!(
                "{} is over the hand limit and must discard",
                s.players[w].name
            ));
        }
        _ => s.phase = TurnPhase::RoundResolved,
    }

    Ok(s)
}

fn compare(metric: Metric, values: [f64; 2]) -> Option<usize> {
    if values[0] == values[1] {
        return None;
    }
    let first_wins = if metric.lower_wins() {
        values[0] < values[1]
    } else {
        values[0] > values[1]
    };
    Some(if first_wins { 0 } else { 1 })
}

/// Move from `round_resolved` into the next turn.
///
/// Precedence for who acts next: a marked extra turn, then the round
/// winner, then (on a tie) the opponent of the current player.
pub fn advance_turn(state: &GameState, now_ms: u64) -> Result<GameState, DomainError> {
    if state.phase != TurnPhase::RoundResolved {
        return Err(DomainError::validation("the round has not resolved yet"));
    }

    let mut s = state.clone();
    let next_id = if let Some(extra) = s.extra_turn_player_id.take() {
        extra
    } else if let Some(winner) = s.round_winner_id.clone() {
        winner
    } else {
        s.opponent_id_of(&s.current_player_id.clone())?
    };

    s.current_player_id = next_id;
    s.selected_metric_for_round = None;
    s.round_winner_id = None;
    s.phase = TurnPhase::WaitingForInitialPlay;
    s.turn_started_at_ms = now_ms;
    let current_idx = s.current_index()?;
    s.push_log(format!("It is {}'s turn", s.players[current_idx].name));

    check_game_end(&mut s)?;
    Ok(s)
}

/// Rotate out of `turn_ended`: the opponent becomes the current player.
pub fn end_turn(state: &GameState, now_ms: u64) -> Result<GameState, DomainError> {
    if state.phase != TurnPhase::TurnEnded {
        return Err(DomainError::validation("the turn has not ended"));
    }

    let mut s = state.clone();
    s.current_player_id = s.opponent_id_of(&s.current_player_id.clone())?;
    s.phase = TurnPhase::WaitingForInitialPlay;
    s.turn_started_at_ms = now_ms;
    let current_idx = s.current_index()?;
    s.push_log(format!("It is {}'s turn", s.players[current_idx].name));

    check_game_end(&mut s)?;
    Ok(s)
}

/// End the match against `loser_id` (disconnect, timeout, bot failure).
pub fn forfeit(state: &GameState, loser_id: &str, reason: &str) -> Result<GameState, DomainError> {
    if state.game_status != GameStatus::Playing {
        return Err(DomainError::validation("the game is already over"));
    }

    let mut s = state.clone();
    let loser_idx = s.player_index(loser_id)?;
    let winner_id = s.opponent_id_of(loser_id)?;
    s.push_log(format!("{} forfeits: {reason}", s.players[loser_idx].name));
    s.game_status = GameStatus::Win;
    s.winner_id = Some(winner_id);
    Ok(s)
}

/// Evaluate end-of-game conditions. Runs only after resolution has been
/// applied and the next player is set, never between the final plays of a
/// round and the winner absorbing the cards.
fn check_game_end(s: &mut GameState) -> Result<(), DomainError> {
    if s.game_status != GameStatus::Playing {
        return Ok(());
    }

    // The all-empty tie must be checked before the zero-car loss: an
    // empty hand also has no car card, so the reverse order could never
    // produce a tie.
    let all_empty =
        s.players.iter().all(|p| p.hand.is_empty()) && s.draw_pile.is_empty();
    if all_empty {
        s.game_status = GameStatus::Tie;
        s.winner_id = None;
        s.push_log("No cards remain on either side: the match is a tie".to_string());
        return Ok(());
    }

    let current_idx = s.current_index()?;
    if !s.players[current_idx].has_car_card() {
        let winner_id = s.players[GameState::opponent_index(current_idx)].id.clone();
        s.push_log(format!(
            "{} has no car cards left",
            s.players[current_idx].name
        ));
        s.game_status = GameStatus::Win;
        s.winner_id = Some(winner_id);
    }
    Ok(())
}
