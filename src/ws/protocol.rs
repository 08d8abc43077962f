//! Wire protocol: named events with JSON payloads.
//!
//! Messages are adjacently tagged (`event` / `data`) so each frame reads
//! as a named event, e.g.
//! `{"event":"game:playCard","data":{"cardInstanceId":"..."}}`.

use serde::{Deserialize, Serialize};

use crate::domain::plays::PlayPayload;
use crate::domain::state::GameStatus;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "auth:authenticate", rename_all = "camelCase")]
    Authenticate { user_id: String, username: String },
    #[serde(rename = "matchmaking:join", rename_all = "camelCase")]
    JoinMatchmaking {
        #[serde(default)]
        human_only: bool,
    },
    #[serde(rename = "matchmaking:cancel")]
    CancelMatchmaking,
    #[serde(rename = "game:playCard", rename_all = "camelCase")]
    PlayCard {
        card_instance_id: String,
        #[serde(default)]
        payload: PlayPayload,
    },
    #[serde(rename = "game:advanceTurn")]
    AdvanceTurn,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyPlayerEntry {
    pub username: String,
    pub is_bot: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePlayerEntry {
    pub user_id: String,
    pub username: String,
    pub is_bot: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "auth:success", rename_all = "camelCase")]
    AuthSuccess { user_id: String, username: String },
    #[serde(rename = "auth:error")]
    AuthError { message: String },
    #[serde(rename = "matchmaking:joined")]
    MatchmakingJoined { message: String },
    #[serde(rename = "matchmaking:error")]
    MatchmakingError { message: String },
    #[serde(rename = "lobby:update", rename_all = "camelCase")]
    LobbyUpdate {
        players: Vec<LobbyPlayerEntry>,
        player_count: usize,
    },
    #[serde(rename = "game:start", rename_all = "camelCase")]
    GameStart {
        game_id: String,
        players: Vec<GamePlayerEntry>,
    },
    /// Full projected state: sent once at start and on reconnect.
    #[serde(rename = "game:stateUpdate")]
    StateUpdate(serde_json::Value),
    /// RFC 6902 operations against the previous projection.
    #[serde(rename = "game:patch")]
    Patch(json_patch::Patch),
    #[serde(rename = "game:error")]
    GameError { message: String },
    #[serde(rename = "game:end", rename_all = "camelCase")]
    GameEnd {
        winner_id: Option<String>,
        game_status: GameStatus,
    },
}
