//! Deterministic game initialization.

use crate::catalog::Catalog;
use crate::domain::cards::{CardInstance, CardKind};
use crate::domain::rng::GameRng;
use crate::domain::state::{
    BoardSide, GameState, GameStatus, PlayerState, TurnPhase, INITIAL_HAND_SIZE, PLAYERS,
};
use crate::errors::domain::DomainError;

/// Copies of each action definition minted into a fresh deck.
const ACTION_COPIES: usize = 2;

#[derive(Debug, Clone)]
pub struct PlayerSpec {
    pub id: String,
    pub name: String,
    pub is_bot: bool,
}

/// Mint instances from the catalog, shuffle with the seeded generator,
/// and deal starting hands. The remainder forms the draw pile.
pub fn initialize_game(
    catalog: &Catalog,
    game_id: String,
    seed: u32,
    specs: [PlayerSpec; PLAYERS],
    turn_time_limit_ms: u64,
    now_ms: u64,
) -> Result<GameState, DomainError> {
    let mut rng = GameRng::new(seed);
    let mut deck = mint_deck(catalog);

    if deck.len() < PLAYERS * INITIAL_HAND_SIZE {
        return Err(DomainError::inconsistency(format!(
            "catalog yields {} cards, need at least {}",
            deck.len(),
            PLAYERS * INITIAL_HAND_SIZE
        )));
    }

    rng.shuffle(&mut deck);

    let mut players = specs.map(|spec| PlayerState {
        id: spec.id,
        name: spec.name,
        hand: Vec::with_capacity(INITIAL_HAND_SIZE),
        score: 0,
        is_bot: spec.is_bot,
    });
    for player in players.iter_mut() {
        player.hand = deck.drain(..INITIAL_HAND_SIZE).collect();
    }

    let current_player_id = players[0].id.clone();
    let mut state = GameState {
        game_id,
        players,
        current_player_id,
        game_status: GameStatus::Playing,
        round_winner_id: None,
        winner_id: None,
        selected_metric_for_round: None,
        board: [BoardSide::default(), BoardSide::default()],
        draw_pile: deck,
        discard_pile: Vec::new(),
        last_played_instance_id: None,
        turn_started_at_ms: now_ms,
        turn_time_limit_ms,
        rng,
        log: Vec::new(),
        extra_turn_player_id: None,
        phase: TurnPhase::WaitingForInitialPlay,
        pending_modifiers: [None, None],
    };

    state.push_log(format!(
        "Game started: {} vs {}",
        state.players[0].name, state.players[1].name
    ));
    let first = state.players[0].name.clone();
    state.push_log(format!("{first} goes first"));

    Ok(state)
}

fn mint_deck(catalog: &Catalog) -> Vec<CardInstance> {
    let mut counter = 0usize;
    let mut deck = Vec::new();

    for def in catalog.cars() {
        deck.push(CardInstance {
            instance_id: format!("{}#{counter}", def.id),
            definition_id: def.id.clone(),
            name: def.name.clone(),
            kind: CardKind::Car,
            current_metrics: Some(def.metrics),
            original_metrics: Some(def.metrics),
            is_modified_permanently: false,
            effect: None,
        });
        counter += 1;
    }

    for def in catalog.actions() {
        for _ in 0..ACTION_COPIES {
            deck.push(CardInstance {
                instance_id: format!("{}#{counter}", def.id),
                definition_id: def.id.clone(),
                name: def.name.clone(),
                kind: CardKind::Action,
                current_metrics: None,
                original_metrics: None,
                is_modified_permanently: false,
                effect: Some(def.effect.clone()),
            });
            counter += 1;
        }
    }

    deck
}
