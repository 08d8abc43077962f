//! Match manager: constructs a game runtime for every `match-found`
//! pairing and owns the match registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix::prelude::*;
use tracing::{error, info};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::GameConfig;
use crate::domain::setup::{initialize_game, PlayerSpec};
use crate::services::game_runtime::GameRuntime;
use crate::services::messages::{AttachedChannel, MatchEnded, MatchFound, OutboundEvent};
use crate::ws::protocol::ServerEvent;

/// Match id to runtime address, plus player id to match id. Both maps
/// mutate together under one lock so a lookup never sees half an update.
pub struct MatchRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    by_match: HashMap<String, Addr<GameRuntime>>,
    by_player: HashMap<String, String>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn register(&self, game_id: &str, addr: Addr<GameRuntime>, player_ids: &[String]) {
        let mut inner = self.lock();
        inner.by_match.insert(game_id.to_string(), addr);
        for pid in player_ids {
            inner.by_player.insert(pid.clone(), game_id.to_string());
        }
    }

    pub fn remove_match(&self, game_id: &str) {
        let mut inner = self.lock();
        inner.by_match.remove(game_id);
        inner.by_player.retain(|_, gid| gid != game_id);
    }

    pub fn runtime_for_player(&self, player_id: &str) -> Option<Addr<GameRuntime>> {
        let inner = self.lock();
        let game_id = inner.by_player.get(player_id)?;
        inner.by_match.get(game_id).cloned()
    }

    pub fn contains_player(&self, player_id: &str) -> bool {
        self.lock().by_player.contains_key(player_id)
    }

    pub fn active_matches(&self) -> usize {
        self.lock().by_match.len()
    }
}

impl Default for MatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub struct MatchManager {
    registry: Arc<MatchRegistry>,
    catalog: Catalog,
    game_cfg: GameConfig,
}

impl MatchManager {
    pub fn new(registry: Arc<MatchRegistry>, catalog: Catalog, game_cfg: GameConfig) -> Self {
        Self {
            registry,
            catalog,
            game_cfg,
        }
    }
}

impl Actor for MatchManager {
    type Context = Context<Self>;
}

impl Handler<MatchFound> for MatchManager {
    type Result = ();

    fn handle(&mut self, msg: MatchFound, ctx: &mut Context<Self>) {
        let game_id = Uuid::new_v4().to_string();
        let uuid_bytes = *Uuid::new_v4().as_bytes();
        let seed = u32::from_le_bytes([uuid_bytes[0], uuid_bytes[1], uuid_bytes[2], uuid_bytes[3]]);

        let [a, b] = msg.players;
        let specs = [
            PlayerSpec {
                id: a.id.clone(),
                name: a.name.clone(),
                is_bot: a.is_bot,
            },
            PlayerSpec {
                id: b.id.clone(),
                name: b.name.clone(),
                is_bot: b.is_bot,
            },
        ];
        let mut channels: HashMap<String, AttachedChannel> = HashMap::new();
        if let Some(attached) = a.channel.clone() {
            channels.insert(a.id.clone(), attached);
        }
        if let Some(attached) = b.channel.clone() {
            channels.insert(b.id.clone(), attached);
        }

        let state = match initialize_game(
            &self.catalog,
            game_id.clone(),
            seed,
            specs,
            self.game_cfg.turn_time_limit.as_millis() as u64,
            now_unix_ms(),
        ) {
            Ok(state) => state,
            Err(err) => {
                error!(error = %err, "Failed to initialize a match");
                for attached in channels.values() {
                    attached.channel.do_send(OutboundEvent(ServerEvent::GameError {
                        message: "The match could not be started".to_string(),
                    }));
                }
                return;
            }
        };

        let player_ids = vec![a.id.clone(), b.id.clone()];
        let runtime = GameRuntime::new(state, channels, ctx.address().recipient()).start();
        // Registered before this handler returns: inputs arriving right
        // after match-found always find the runtime.
        self.registry.register(&game_id, runtime, &player_ids);
        info!(game_id = %game_id, a = %a.id, b = %b.id, "Match started");
    }
}

impl Handler<MatchEnded> for MatchManager {
    type Result = ();

    fn handle(&mut self, msg: MatchEnded, _ctx: &mut Context<Self>) {
        self.registry.remove_match(&msg.game_id);
        info!(game_id = %msg.game_id, "Match released");
    }
}

pub fn now_unix_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
