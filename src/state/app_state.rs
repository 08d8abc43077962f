use std::sync::Arc;

use actix::Addr;

use crate::services::lobby::Lobby;
use crate::services::manager::MatchRegistry;

/// Application state containing shared resources.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide matchmaking lobby.
    pub lobby: Addr<Lobby>,
    /// Match registry shared with websocket sessions for routing.
    pub registry: Arc<MatchRegistry>,
}

impl AppState {
    pub fn new(lobby: Addr<Lobby>, registry: Arc<MatchRegistry>) -> Self {
        Self { lobby, registry }
    }
}
