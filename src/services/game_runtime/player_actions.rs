//! External inputs into a running match.

use actix::prelude::*;
use tracing::{info, warn};
use uuid::Uuid;

use super::GameRuntime;
use crate::domain::plays::{submit_play, PlayPayload};
use crate::domain::projection::project_value;
use crate::domain::resolution::forfeit;
use crate::domain::state::{GameStatus, TurnPhase};
use crate::services::messages::{AttachedChannel, ClientChannel, OutboundEvent};
use crate::ws::protocol::ServerEvent;

#[derive(Message)]
#[rtype(result = "()")]
pub struct PlayerInput {
    pub player_id: String,
    pub card_instance_id: String,
    pub payload: PlayPayload,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct AdvanceRequest {
    pub player_id: String,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct PlayerDisconnected {
    pub player_id: String,
    /// Connection the report came from; stale connections (already
    /// replaced by a reconnect) must not end the match.
    pub conn_token: Uuid,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct PlayerReconnected {
    pub player_id: String,
    pub channel: ClientChannel,
    pub conn_token: Uuid,
}

/// Tear the match down without a game outcome (process shutdown).
#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

impl Handler<PlayerInput> for GameRuntime {
    type Result = ();

    fn handle(&mut self, msg: PlayerInput, ctx: &mut Context<Self>) {
        if self.state.game_status != GameStatus::Playing {
            self.send_to(
                &msg.player_id,
                ServerEvent::GameError {
                    message: "The game is already over".to_string(),
                },
            );
            return;
        }
        if msg.player_id != self.state.current_player_id {
            self.send_to(
                &msg.player_id,
                ServerEvent::GameError {
                    message: "It is not your turn".to_string(),
                },
            );
            return;
        }
        if self.state.phase == TurnPhase::BothCardsOnBoard {
            self.send_to(
                &msg.player_id,
                ServerEvent::GameError {
                    message: "The round is being resolved".to_string(),
                },
            );
            return;
        }

        let result = submit_play(
            &self.state,
            &msg.player_id,
            &msg.card_instance_id,
            &msg.payload,
        );
        self.apply_step(ctx, result, Some(&msg.player_id));
    }
}

impl Handler<AdvanceRequest> for GameRuntime {
    type Result = ();

    fn handle(&mut self, msg: AdvanceRequest, ctx: &mut Context<Self>) {
        // Manual advance and the scheduled auto-advance are idempotent: a
        // second advance in the same round_resolved phase is a no-op.
        let _ = msg;
        self.on_advance_due(ctx);
    }
}

impl Handler<PlayerDisconnected> for GameRuntime {
    type Result = ();

    fn handle(&mut self, msg: PlayerDisconnected, ctx: &mut Context<Self>) {
        match self.channels.get(&msg.player_id) {
            Some(attached) if attached.conn_token == msg.conn_token => {}
            _ => {
                warn!(
                    game_id = %self.state.game_id,
                    player_id = %msg.player_id,
                    "Ignoring disconnect report from a stale connection"
                );
                return;
            }
        }

        if self.state.game_status == GameStatus::Playing {
            info!(
                game_id = %self.state.game_id,
                player_id = %msg.player_id,
                "Player disconnected mid-match"
            );
            let result = forfeit(&self.state, &msg.player_id, "disconnected");
            self.apply_step(ctx, result, None);
        } else {
            self.channels.remove(&msg.player_id);
            self.last_sent.remove(&msg.player_id);
        }
    }
}

impl Handler<PlayerReconnected> for GameRuntime {
    type Result = ();

    fn handle(&mut self, msg: PlayerReconnected, ctx: &mut Context<Self>) {
        info!(
            game_id = %self.state.game_id,
            player_id = %msg.player_id,
            "Player reconnected"
        );
        // Always a full snapshot on reconnect, never a diff; the stored
        // projection resets alongside it.
        let full = project_value(&self.state, &msg.player_id);
        msg.channel
            .do_send(OutboundEvent(ServerEvent::StateUpdate(full.clone())));
        self.last_sent.insert(msg.player_id.clone(), full);
        self.channels.insert(
            msg.player_id,
            AttachedChannel {
                channel: msg.channel,
                conn_token: msg.conn_token,
            },
        );

        if self.state.game_status == GameStatus::Playing {
            self.after_step(ctx);
        }
    }
}

impl Handler<Shutdown> for GameRuntime {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Context<Self>) {
        self.release(ctx);
    }
}
