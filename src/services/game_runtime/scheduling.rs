//! Timers and scheduled self-steps.
//!
//! Resolve, auto-advance, and bot-act are time-delayed self-messages.
//! Each re-checks phase and status at fire time and no-ops if the world
//! has moved on; all are cancelled on every state update and on release.

use std::time::Duration;

use actix::prelude::*;
use tracing::{info, warn};

use super::GameRuntime;
use crate::domain::plays::submit_play;
use crate::domain::resolution::{advance_turn, forfeit, resolve_round};
use crate::domain::state::{GameStatus, TurnPhase};
use crate::services::manager::now_unix_ms;

const RESOLVE_DELAY: Duration = Duration::from_millis(1000);
const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(1500);
const BOT_ACT_DELAY: Duration = Duration::from_millis(1500);

impl GameRuntime {
    pub(super) fn cancel_all(&mut self, ctx: &mut Context<Self>) {
        for handle in [
            self.turn_timer.take(),
            self.scheduled.take(),
            self.bot_step.take(),
        ]
        .into_iter()
        .flatten()
        {
            ctx.cancel_future(handle);
        }
    }

    /// Rearm timers for the phase just entered. The turn timer runs only
    /// in interactive phases; non-interactive phases schedule the next
    /// internal step instead.
    pub(super) fn after_step(&mut self, ctx: &mut Context<Self>) {
        self.cancel_all(ctx);

        if self.state.game_status != GameStatus::Playing {
            self.finish(ctx);
            return;
        }

        match self.state.phase {
            TurnPhase::BothCardsOnBoard => {
                self.scheduled = Some(ctx.run_later(RESOLVE_DELAY, |act, ctx| {
                    act.scheduled = None;
                    act.on_resolve_due(ctx);
                }));
            }
            TurnPhase::RoundResolved => {
                self.scheduled = Some(ctx.run_later(AUTO_ADVANCE_DELAY, |act, ctx| {
                    act.scheduled = None;
                    act.on_advance_due(ctx);
                }));
            }
            // Transient: apply_step rotates out of it synchronously.
            TurnPhase::TurnEnded => {}
            phase if phase.is_interactive() => {
                let limit = Duration::from_millis(self.state.turn_time_limit_ms);
                self.turn_timer = Some(ctx.run_later(limit, |act, ctx| {
                    act.turn_timer = None;
                    act.on_turn_timeout(ctx);
                }));
                if self.is_bot(&self.state.current_player_id) {
                    self.bot_step = Some(ctx.run_later(BOT_ACT_DELAY, |act, ctx| {
                        act.bot_step = None;
                        act.on_bot_due(ctx);
                    }));
                }
            }
            _ => {}
        }
    }

    fn on_resolve_due(&mut self, ctx: &mut Context<Self>) {
        if self.state.game_status != GameStatus::Playing
            || self.state.phase != TurnPhase::BothCardsOnBoard
        {
            return;
        }
        let result = resolve_round(&self.state);
        self.apply_step(ctx, result, None);
    }

    pub(super) fn on_advance_due(&mut self, ctx: &mut Context<Self>) {
        if self.state.game_status != GameStatus::Playing
            || self.state.phase != TurnPhase::RoundResolved
        {
            return;
        }
        let result = advance_turn(&self.state, now_unix_ms());
        self.apply_step(ctx, result, None);
    }

    fn on_turn_timeout(&mut self, ctx: &mut Context<Self>) {
        if self.state.game_status != GameStatus::Playing || !self.state.phase.is_interactive() {
            return;
        }
        let loser = self.state.current_player_id.clone();
        info!(game_id = %self.state.game_id, player_id = %loser, "Turn timer expired");
        let result = forfeit(&self.state, &loser, "turn timer expired");
        self.apply_step(ctx, result, None);
    }

    fn on_bot_due(&mut self, ctx: &mut Context<Self>) {
        let current = self.state.current_player_id.clone();
        if self.state.game_status != GameStatus::Playing
            || !self.state.phase.is_interactive()
            || !self.is_bot(&current)
        {
            return;
        }

        match self.bot.choose(&self.state, &current) {
            Ok(chosen) => {
                let result = submit_play(
                    &self.state,
                    &current,
                    &chosen.card_instance_id,
                    &chosen.payload,
                );
                match result {
                    Err(err) if !err.is_fatal() => {
                        // A rejected bot move is a bot failure: it forfeits.
                        warn!(
                            game_id = %self.state.game_id,
                            bot_id = %current,
                            error = %err,
                            "Bot move rejected"
                        );
                        let ended = forfeit(&self.state, &current, "bot move rejected");
                        self.apply_step(ctx, ended, None);
                    }
                    other => self.apply_step(ctx, other, Some(&current)),
                }
            }
            Err(err) => {
                warn!(
                    game_id = %self.state.game_id,
                    bot_id = %current,
                    error = %err,
                    "Bot has no move"
                );
                let ended = forfeit(&self.state, &current, "no move available");
                self.apply_step(ctx, ended, None);
            }
        }
    }
}
