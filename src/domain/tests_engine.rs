//! Core engine behavior: initialization, play validation, determinism.

use crate::catalog::{builtin_actions, CarDefinition, CarRank, Catalog};
use crate::domain::plays::{submit_play, PlayPayload};
use crate::domain::resolution::{advance_turn, end_turn, resolve_round};
use crate::domain::setup::{initialize_game, PlayerSpec};
use crate::domain::state::{GameStatus, TurnPhase, INITIAL_HAND_SIZE};
use crate::domain::test_helpers::*;
use crate::domain::Metric;

fn test_cars() -> Vec<CarDefinition> {
    (0..20)
        .map(|i| {
            let f = i as f64;
            CarDefinition {
                id: format!("car-{i}"),
                name: format!("Test Car {i}"),
                metrics: metrics(
                    150.0 + 10.0 * f,
                    200.0 + 25.0 * f,
                    9.0 - 0.2 * f,
                    1900.0 - 30.0 * f,
                    1990.0 + f,
                ),
                rank: CarRank::D,
            }
        })
        .collect()
}

fn test_catalog() -> Catalog {
    Catalog::new(test_cars(), builtin_actions())
}

/// Cars only: every dealt card is guaranteed playable as a car.
fn car_only_catalog() -> Catalog {
    Catalog::new(test_cars(), Vec::new())
}

fn specs() -> [PlayerSpec; 2] {
    [
        PlayerSpec {
            id: "p1".to_string(),
            name: "Player One".to_string(),
            is_bot: false,
        },
        PlayerSpec {
            id: "p2".to_string(),
            name: "Player Two".to_string(),
            is_bot: false,
        },
    ]
}

fn init(seed: u32) -> crate::domain::GameState {
    initialize_game(
        &test_catalog(),
        "game-1".to_string(),
        seed,
        specs(),
        30_000,
        0,
    )
    .unwrap()
}

fn init_cars_only(seed: u32) -> crate::domain::GameState {
    initialize_game(
        &car_only_catalog(),
        "game-1".to_string(),
        seed,
        specs(),
        30_000,
        0,
    )
    .unwrap()
}

fn metric_payload(metric: Metric) -> PlayPayload {
    PlayPayload {
        selected_metric: Some(metric),
        target_player_id: None,
    }
}

#[test]
fn initialization_deals_and_conserves_cards() {
    let state = init(42);
    assert_eq!(state.players[0].hand.len(), INITIAL_HAND_SIZE);
    assert_eq!(state.players[1].hand.len(), INITIAL_HAND_SIZE);
    assert_eq!(state.phase, TurnPhase::WaitingForInitialPlay);
    assert_eq!(state.game_status, GameStatus::Playing);
    assert_eq!(state.current_player_id, "p1");

    let ids = all_instance_ids(&state);
    // 20 cars + 9 actions x 2 copies
    assert_eq!(ids.len(), 20 + builtin_actions().len() * 2);
    assert_conservation(&state, &ids);
}

#[test]
fn initialization_is_deterministic() {
    let a = init(42);
    let b = init(42);
    assert_eq!(a, b);
    let c = init(43);
    assert_ne!(a, c);
}

// Scenario: straight car duel from seed 42, driven play by play.
#[test]
fn straight_car_duel_is_deterministic() {
    let state = init_cars_only(42);
    let baseline = all_instance_ids(&state);

    let first_car = |s: &crate::domain::GameState, idx: usize| {
        s.players[idx]
            .hand
            .iter()
            .find(|c| c.is_car())
            .expect("a dealt hand with a car")
            .instance_id
            .clone()
    };

    let s1 = submit_play(&state, "p1", &first_car(&state, 0), &metric_payload(Metric::Hp)).unwrap();
    assert_eq!(s1.phase, TurnPhase::TurnEnded);
    let s2 = end_turn(&s1, 1_000).unwrap();
    assert_eq!(s2.current_player_id, "p2");

    let s3 = submit_play(&s2, "p2", &first_car(&s2, 1), &PlayPayload::default()).unwrap();
    assert_eq!(s3.phase, TurnPhase::BothCardsOnBoard);
    assert_eq!(s3.game_status, GameStatus::Playing);
    assert!(s3.winner_id.is_none());
    assert!(s3.board.iter().all(|side| side.car.is_some()));

    let pre_total: usize = s3.players.iter().map(|p| p.hand.len()).sum();
    let s4 = resolve_round(&s3).unwrap();
    let s5 = advance_turn(&s4, 2_000).unwrap();

    assert!(s5.board.iter().all(|side| side.car.is_none()));
    assert!(s5.selected_metric_for_round.is_none());
    // Win or tie, both board cars are back in hands.
    let post_total: usize = s5.players.iter().map(|p| p.hand.len()).sum();
    assert_eq!(post_total, pre_total + 2);
    if let Some(winner) = &s4.round_winner_id {
        let widx = s5.player_index(winner).unwrap();
        assert_eq!(s5.players[widx].score, 1);
    }
    assert_conservation(&s5, &baseline);

    // Re-run the identical input sequence: byte-identical states.
    let r0 = init_cars_only(42);
    let r1 = submit_play(&r0, "p1", &first_car(&r0, 0), &metric_payload(Metric::Hp)).unwrap();
    let r2 = end_turn(&r1, 1_000).unwrap();
    let r3 = submit_play(&r2, "p2", &first_car(&r2, 1), &PlayPayload::default()).unwrap();
    let r4 = resolve_round(&r3).unwrap();
    let r5 = advance_turn(&r4, 2_000).unwrap();
    assert_eq!(s5, r5);
}

#[test]
fn rejected_play_leaves_state_unchanged() {
    let state = init_cars_only(42);
    let snapshot = state.clone();

    // Unknown card
    assert!(submit_play(&state, "p1", "no-such-card", &PlayPayload::default()).is_err());
    // Missing metric on the round's first car
    let car_id = state.players[0]
        .hand
        .iter()
        .find(|c| c.is_car())
        .unwrap()
        .instance_id
        .clone();
    assert!(submit_play(&state, "p1", &car_id, &PlayPayload::default()).is_err());
    // Out of turn
    let p2_card = state.players[1].hand[0].instance_id.clone();
    assert!(submit_play(&state, "p2", &p2_card, &metric_payload(Metric::Hp)).is_err());

    assert_eq!(state, snapshot);
}

#[test]
fn car_play_requires_a_car_phase() {
    let mut state = make_state(vec![make_car("c1", 100.0)], vec![make_car("c2", 90.0)]);
    state.phase = TurnPhase::RoundResolved;
    assert!(submit_play(&state, "p1", "c1", &metric_payload(Metric::Hp)).is_err());
}

#[test]
fn action_card_only_opens_a_turn() {
    use crate::domain::Effect;
    let mut state = make_state(
        vec![
            make_action("a1", Effect::ExtraTurn),
            make_action("a2", Effect::ExtraTurn),
            make_car("c1", 100.0),
        ],
        vec![make_car("c2", 90.0)],
    );
    // First action is fine, second is not: the phase moved on.
    let s1 = submit_play(&state, "p1", "a1", &PlayPayload::default()).unwrap();
    assert_eq!(s1.phase, TurnPhase::WaitingForCarCardAfterAction);
    assert!(submit_play(&s1, "p1", "a2", &PlayPayload::default()).is_err());

    // And never mid-round from other phases.
    state.phase = TurnPhase::BothCardsOnBoard;
    assert!(submit_play(&state, "p1", "a1", &PlayPayload::default()).is_err());
}

#[test]
fn second_car_ignores_metric_selection() {
    let state = make_state(vec![make_car("c1", 100.0)], vec![make_car("c2", 90.0)]);
    let s1 = submit_play(&state, "p1", "c1", &metric_payload(Metric::Hp)).unwrap();
    let s2 = end_turn(&s1, 0).unwrap();
    // p2 asks for speed; the round metric stays hp.
    let s3 = submit_play(&s2, "p2", "c2", &metric_payload(Metric::Speed)).unwrap();
    assert_eq!(s3.selected_metric_for_round, Some(Metric::Hp));
}

#[test]
fn game_log_grows_monotonically() {
    let state = init_cars_only(7);
    let car_id = state.players[0]
        .hand
        .iter()
        .find(|c| c.is_car())
        .unwrap()
        .instance_id
        .clone();
    let s1 = submit_play(&state, "p1", &car_id, &metric_payload(Metric::Speed)).unwrap();
    assert!(s1.log.len() > state.log.len());
    assert_eq!(&s1.log[..state.log.len()], &state.log[..]);
}
