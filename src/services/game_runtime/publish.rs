//! State dissemination: per-client projections, RFC 6902 diffs, and the
//! end-of-match broadcast.

use actix::prelude::*;
use tracing::info;

use super::GameRuntime;
use crate::domain::projection::project_value;
use crate::services::messages::OutboundEvent;
use crate::ws::protocol::ServerEvent;

impl GameRuntime {
    pub(super) fn send_to(&self, player_id: &str, event: ServerEvent) {
        if let Some(attached) = self.channels.get(player_id) {
            attached.channel.do_send(OutboundEvent(event));
        }
    }

    pub(super) fn broadcast(&self, event: ServerEvent) {
        for attached in self.channels.values() {
            attached.channel.do_send(OutboundEvent(event.clone()));
        }
    }

    /// Project the new state per human player, diff against the last
    /// projection that player saw, emit non-empty diffs, and store the
    /// new snapshot. Bots receive nothing.
    pub(super) fn publish_updates(&mut self) {
        for (player_id, attached) in &self.channels {
            let next = project_value(&self.state, player_id);
            match self.last_sent.get(player_id) {
                Some(previous) => {
                    let ops = json_patch::diff(previous, &next);
                    if !ops.0.is_empty() {
                        attached.channel.do_send(OutboundEvent(ServerEvent::Patch(ops)));
                    }
                }
                // No stored snapshot (e.g. channel attached mid-match):
                // fall back to a full update.
                None => attached
                    .channel
                    .do_send(OutboundEvent(ServerEvent::StateUpdate(next.clone()))),
            }
            self.last_sent.insert(player_id.clone(), next);
        }
    }

    /// Broadcast the terminal outcome, then release the match.
    pub(super) fn finish(&mut self, ctx: &mut Context<Self>) {
        info!(
            game_id = %self.state.game_id,
            status = ?self.state.game_status,
            winner_id = ?self.state.winner_id,
            "Match ended"
        );
        self.broadcast(ServerEvent::GameEnd {
            winner_id: self.state.winner_id.clone(),
            game_status: self.state.game_status,
        });
        self.release(ctx);
    }
}
