//! Per-match orchestrator.
//!
//! One `GameRuntime` actor owns one match: the authoritative state, the
//! turn timer, the scheduled resolve/auto-advance/bot steps, the set of
//! subscribed client channels, and the last projection sent to each
//! human. The actor mailbox serializes every mutation, so player inputs,
//! timer firings, and bot steps for the same match never interleave
//! mid-update; across matches, progress is parallel.

mod player_actions;
mod publish;
mod scheduling;

use std::collections::HashMap;

use actix::prelude::*;
use serde_json::Value;
use tracing::{error, info};

use crate::ai::{BasicBot, BotPlayer};
use crate::domain::resolution::{end_turn, forfeit};
use crate::domain::state::{GameState, GameStatus, TurnPhase};
use crate::errors::domain::DomainError;
use crate::services::manager::now_unix_ms;
use crate::services::messages::{AttachedChannel, MatchEnded};
use crate::ws::protocol::{GamePlayerEntry, ServerEvent};

pub use player_actions::{
    AdvanceRequest, PlayerDisconnected, PlayerInput, PlayerReconnected, Shutdown,
};

pub struct GameRuntime {
    state: GameState,
    channels: HashMap<String, AttachedChannel>,
    last_sent: HashMap<String, Value>,
    bot: Box<dyn BotPlayer>,
    turn_timer: Option<SpawnHandle>,
    scheduled: Option<SpawnHandle>,
    bot_step: Option<SpawnHandle>,
    on_end: Recipient<MatchEnded>,
    ended_notified: bool,
}

impl GameRuntime {
    pub fn new(
        state: GameState,
        channels: HashMap<String, AttachedChannel>,
        on_end: Recipient<MatchEnded>,
    ) -> Self {
        Self {
            state,
            channels,
            last_sent: HashMap::new(),
            bot: Box::new(BasicBot),
            turn_timer: None,
            scheduled: None,
            bot_step: None,
            on_end,
            ended_notified: false,
        }
    }

    fn is_bot(&self, player_id: &str) -> bool {
        self.state
            .players
            .iter()
            .any(|p| p.id == player_id && p.is_bot)
    }

    /// Apply one engine result: install the new state, publish diffs, and
    /// rearm scheduling, or route the error per the recovery policy.
    fn apply_step(
        &mut self,
        ctx: &mut Context<Self>,
        result: Result<GameState, DomainError>,
        offender: Option<&str>,
    ) {
        match result {
            Ok(mut new_state) => {
                // `turn_ended` is transient: rotate to the opponent in the
                // same step so clients never observe it.
                if new_state.phase == TurnPhase::TurnEnded {
                    match end_turn(&new_state, now_unix_ms()) {
                        Ok(rotated) => new_state = rotated,
                        Err(err) => {
                            self.fail_match(ctx, err, offender);
                            return;
                        }
                    }
                }
                self.state = new_state;
                self.publish_updates();
                self.after_step(ctx);
            }
            Err(err) if err.is_fatal() => self.fail_match(ctx, err, offender),
            Err(err) => {
                if let Some(player_id) = offender {
                    self.send_to(
                        player_id,
                        ServerEvent::GameError {
                            message: err.player_message(),
                        },
                    );
                }
            }
        }
    }

    /// A state inconsistency is fatal for this match only: the
    /// non-offending player (if any) wins, the process keeps serving
    /// other matches.
    fn fail_match(&mut self, ctx: &mut Context<Self>, err: DomainError, offender: Option<&str>) {
        error!(
            game_id = %self.state.game_id,
            error = %err,
            "Match terminated by internal error"
        );
        if let Some(loser) = offender {
            if let Ok(ended) = forfeit(&self.state, loser, "internal error") {
                self.state = ended;
                self.publish_updates();
                self.after_step(ctx);
                return;
            }
        }
        self.broadcast(ServerEvent::GameEnd {
            winner_id: None,
            game_status: GameStatus::Tie,
        });
        self.release(ctx);
    }

    fn release(&mut self, ctx: &mut Context<Self>) {
        self.cancel_all(ctx);
        if !self.ended_notified {
            self.ended_notified = true;
            self.on_end.do_send(MatchEnded {
                game_id: self.state.game_id.clone(),
            });
        }
        ctx.stop();
    }
}

impl Actor for GameRuntime {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(game_id = %self.state.game_id, "Match runtime started");

        let players: Vec<GamePlayerEntry> = self
            .state
            .players
            .iter()
            .map(|p| GamePlayerEntry {
                user_id: p.id.clone(),
                username: p.name.clone(),
                is_bot: p.is_bot,
            })
            .collect();
        self.broadcast(ServerEvent::GameStart {
            game_id: self.state.game_id.clone(),
            players,
        });

        // Full initial snapshot per human, stored for diffing.
        let ids: Vec<String> = self.channels.keys().cloned().collect();
        for player_id in ids {
            let full = crate::domain::projection::project_value(&self.state, &player_id);
            self.send_to(&player_id, ServerEvent::StateUpdate(full.clone()));
            self.last_sent.insert(player_id, full);
        }

        self.after_step(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if !self.ended_notified {
            self.ended_notified = true;
            self.on_end.do_send(MatchEnded {
                game_id: self.state.game_id.clone(),
            });
        }
        info!(game_id = %self.state.game_id, "Match runtime stopped");
    }
}
