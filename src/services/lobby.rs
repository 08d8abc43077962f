//! Matchmaking lobby: waiting queue, pairing, and the AI fallback timer.
//!
//! The lobby is one process-wide actor; its mailbox serializes every
//! queue mutation. Pairing prefers the two earliest-joined humans and
//! fills the remainder with the earliest bots. `humanOnly` is a
//! preference with a grace window, not a hard constraint: a lingering
//! preference cannot starve matches forever.

use std::sync::Arc;
use std::time::Instant;

use actix::prelude::*;
use tracing::info;
use uuid::Uuid;

use crate::config::LobbyConfig;
use crate::services::manager::MatchRegistry;
use crate::services::messages::{
    AttachedChannel, ClientChannel, MatchFound, MatchedPlayer, OutboundEvent,
};
use crate::ws::protocol::{LobbyPlayerEntry, ServerEvent};

#[derive(Message)]
#[rtype(result = "()")]
pub struct JoinQueue {
    pub id: String,
    pub name: String,
    pub channel: ClientChannel,
    pub conn_token: Uuid,
    pub human_only: bool,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct CancelQueue {
    pub id: String,
}

struct WaitingPlayer {
    id: String,
    name: String,
    channel: Option<AttachedChannel>,
    joined_at: Instant,
    is_bot: bool,
    human_only: bool,
}

pub struct Lobby {
    cfg: LobbyConfig,
    queue: Vec<WaitingPlayer>,
    bot_seq: u32,
    spawn_timer: Option<SpawnHandle>,
    matches: Recipient<MatchFound>,
    registry: Arc<MatchRegistry>,
}

impl Lobby {
    pub fn new(
        cfg: LobbyConfig,
        matches: Recipient<MatchFound>,
        registry: Arc<MatchRegistry>,
    ) -> Self {
        Self {
            cfg,
            queue: Vec::new(),
            bot_seq: 0,
            spawn_timer: None,
            matches,
            registry,
        }
    }

    fn broadcast_update(&self) {
        let players: Vec<LobbyPlayerEntry> = self
            .queue
            .iter()
            .map(|p| LobbyPlayerEntry {
                username: p.name.clone(),
                is_bot: p.is_bot,
            })
            .collect();
        let event = ServerEvent::LobbyUpdate {
            player_count: players.len(),
            players,
        };
        for waiting in &self.queue {
            if let Some(attached) = &waiting.channel {
                attached.channel.do_send(OutboundEvent(event.clone()));
            }
        }
    }

    /// Pair players while at least two are queued: earliest humans first,
    /// earliest bots to fill.
    fn try_match(&mut self) {
        while self.queue.len() >= self.cfg.max_players_per_match {
            let [first, second] = self.select_pair();
            // Remove the higher index first so the lower stays valid.
            let (hi, lo) = if first > second {
                (first, second)
            } else {
                (second, first)
            };
            let b = self.queue.remove(hi);
            let a = self.queue.remove(lo);
            info!(a = %a.id, b = %b.id, "Match found");
            self.matches.do_send(MatchFound {
                players: [to_matched(a), to_matched(b)],
            });
        }
    }

    fn select_pair(&self) -> [usize; 2] {
        let mut chosen: Vec<usize> = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_bot)
            .map(|(i, _)| i)
            .take(2)
            .collect();
        if chosen.len() < 2 {
            chosen.extend(
                self.queue
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.is_bot)
                    .map(|(i, _)| i)
                    .take(2 - chosen.len()),
            );
        }
        [chosen[0], chosen[1]]
    }

    /// (Re)compute the single AI-spawn timer. Scheduled only when one
    /// human is waiting alone; the delay stretches to cover the longest
    /// remaining human-only grace window.
    fn reschedule_ai(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.spawn_timer.take() {
            ctx.cancel_future(handle);
        }
        if !self.cfg.ai_enabled {
            return;
        }
        let humans = self.queue.iter().filter(|p| !p.is_bot).count();
        if humans == 0 || self.queue.len() >= self.cfg.max_players_per_match {
            return;
        }

        let grace_remaining = self
            .queue
            .iter()
            .filter(|p| p.human_only)
            .map(|p| self.cfg.human_only_max_wait.saturating_sub(p.joined_at.elapsed()))
            .max()
            .unwrap_or_default();
        let delay = self.cfg.ai_delay.max(grace_remaining);

        self.spawn_timer = Some(ctx.run_later(delay, |act, ctx| {
            act.spawn_timer = None;
            act.spawn_ai(ctx);
        }));
    }

    fn spawn_ai(&mut self, ctx: &mut Context<Self>) {
        // Re-check at fire time; the queue may have moved on.
        let humans = self.queue.iter().filter(|p| !p.is_bot).count();
        if humans == 0 || self.queue.len() >= self.cfg.max_players_per_match {
            return;
        }
        let blocked = self.queue.iter().any(|p| {
            p.human_only && p.joined_at.elapsed() < self.cfg.human_only_max_wait
        });
        if blocked {
            self.reschedule_ai(ctx);
            return;
        }

        self.bot_seq += 1;
        let bot_id = format!("bot-{}", self.bot_seq);
        info!(bot_id = %bot_id, "Spawning AI opponent");
        self.queue.push(WaitingPlayer {
            id: bot_id,
            name: format!("Bot {}", self.bot_seq),
            channel: None,
            joined_at: Instant::now(),
            is_bot: true,
            human_only: false,
        });
        self.broadcast_update();
        self.try_match();
        self.broadcast_update();
        self.reschedule_ai(ctx);
    }
}

fn to_matched(p: WaitingPlayer) -> MatchedPlayer {
    MatchedPlayer {
        id: p.id,
        name: p.name,
        is_bot: p.is_bot,
        channel: p.channel,
    }
}

impl Actor for Lobby {
    type Context = Context<Self>;
}

impl Handler<JoinQueue> for Lobby {
    type Result = ();

    fn handle(&mut self, msg: JoinQueue, ctx: &mut Context<Self>) {
        if self.registry.contains_player(&msg.id) {
            msg.channel.do_send(OutboundEvent(ServerEvent::MatchmakingError {
                message: "You are already in a match".to_string(),
            }));
            return;
        }
        if self.queue.iter().any(|p| p.id == msg.id) {
            msg.channel.do_send(OutboundEvent(ServerEvent::MatchmakingError {
                message: "You are already queued".to_string(),
            }));
            return;
        }

        info!(player_id = %msg.id, human_only = msg.human_only, "Player joined matchmaking");
        msg.channel.do_send(OutboundEvent(ServerEvent::MatchmakingJoined {
            message: "Waiting for an opponent".to_string(),
        }));
        self.queue.push(WaitingPlayer {
            id: msg.id,
            name: msg.name,
            channel: Some(AttachedChannel {
                channel: msg.channel,
                conn_token: msg.conn_token,
            }),
            joined_at: Instant::now(),
            is_bot: false,
            human_only: msg.human_only,
        });
        self.broadcast_update();
        self.try_match();
        self.broadcast_update();
        self.reschedule_ai(ctx);
    }
}

impl Handler<CancelQueue> for Lobby {
    type Result = ();

    fn handle(&mut self, msg: CancelQueue, ctx: &mut Context<Self>) {
        let before = self.queue.len();
        self.queue.retain(|p| p.id != msg.id);
        if self.queue.len() == before {
            return;
        }
        info!(player_id = %msg.id, "Player left matchmaking");
        self.broadcast_update();
        self.reschedule_ai(ctx);
    }
}
