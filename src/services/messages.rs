//! Actor messages shared between the lobby, the match manager, and the
//! per-match runtimes.

use actix::prelude::*;
use uuid::Uuid;

use crate::ws::protocol::ServerEvent;

/// One outbound named event for a single client channel.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct OutboundEvent(pub ServerEvent);

/// Opaque handle to a connected client.
pub type ClientChannel = Recipient<OutboundEvent>;

/// A client channel bound to one physical connection.
///
/// The token distinguishes a live binding from a stale one: after a
/// reconnect replaces the channel, the old connection's close report must
/// not forfeit the match.
#[derive(Clone)]
pub struct AttachedChannel {
    pub channel: ClientChannel,
    pub conn_token: Uuid,
}

#[derive(Clone)]
pub struct MatchedPlayer {
    pub id: String,
    pub name: String,
    pub is_bot: bool,
    /// None for bots.
    pub channel: Option<AttachedChannel>,
}

/// Emitted by the lobby once it has selected two players.
#[derive(Message)]
#[rtype(result = "()")]
pub struct MatchFound {
    pub players: [MatchedPlayer; 2],
}

/// End-of-match hook: the owning manager releases its references.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct MatchEnded {
    pub game_id: String,
}
