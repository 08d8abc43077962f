//! Websocket session actor: heartbeat, in-band authentication, and
//! routing of named events to the lobby and the player's match.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde_json::to_string;
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::game_runtime::{
    AdvanceRequest, PlayerDisconnected, PlayerInput, PlayerReconnected,
};
use crate::services::lobby::{CancelQueue, JoinQueue};
use crate::services::manager::MatchRegistry;
use crate::services::messages::OutboundEvent;
use crate::state::app_state::AppState;
use crate::ws::identity::{sanitize_identity, PlayerIdentity};
use crate::ws::protocol::{ClientEvent, ServerEvent};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(app_state.lobby.clone(), app_state.registry.clone());
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    identity: Option<PlayerIdentity>,
    lobby: Addr<crate::services::lobby::Lobby>,
    registry: Arc<MatchRegistry>,
    last_heartbeat: Instant,
}

impl WsSession {
    pub fn new(lobby: Addr<crate::services::lobby::Lobby>, registry: Arc<MatchRegistry>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            identity: None,
            lobby,
            registry,
            last_heartbeat: Instant::now(),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "Websocket client heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn send(&self, ctx: &mut ws::WebsocketContext<Self>, event: &ServerEvent) {
        match to_string(event) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(
                conn_id = %self.conn_id,
                error = %err,
                "Failed to serialize websocket message"
            ),
        }
    }

    fn handle_event(&mut self, event: ClientEvent, ctx: &mut ws::WebsocketContext<Self>) {
        match event {
            ClientEvent::Authenticate { user_id, username } => {
                if self.identity.is_some() {
                    self.send(
                        ctx,
                        &ServerEvent::AuthError {
                            message: "Already authenticated".to_string(),
                        },
                    );
                    return;
                }
                let short = self.conn_id.simple().to_string();
                let identity = sanitize_identity(&user_id, &username, &short[..8]);
                info!(
                    conn_id = %self.conn_id,
                    user_id = %identity.user_id,
                    "Client authenticated"
                );
                self.send(
                    ctx,
                    &ServerEvent::AuthSuccess {
                        user_id: identity.user_id.clone(),
                        username: identity.username.clone(),
                    },
                );

                // A returning player rejoins their running match with a
                // fresh full snapshot.
                if let Some(runtime) = self.registry.runtime_for_player(&identity.user_id) {
                    runtime.do_send(PlayerReconnected {
                        player_id: identity.user_id.clone(),
                        channel: ctx.address().recipient(),
                        conn_token: self.conn_id,
                    });
                }
                self.identity = Some(identity);
            }
            ClientEvent::JoinMatchmaking { human_only } => {
                let Some(identity) = &self.identity else {
                    self.send(
                        ctx,
                        &ServerEvent::MatchmakingError {
                            message: "Authenticate first".to_string(),
                        },
                    );
                    return;
                };
                self.lobby.do_send(JoinQueue {
                    id: identity.user_id.clone(),
                    name: identity.username.clone(),
                    channel: ctx.address().recipient(),
                    conn_token: self.conn_id,
                    human_only,
                });
            }
            ClientEvent::CancelMatchmaking => {
                if let Some(identity) = &self.identity {
                    self.lobby.do_send(CancelQueue {
                        id: identity.user_id.clone(),
                    });
                }
            }
            ClientEvent::PlayCard {
                card_instance_id,
                payload,
            } => {
                let Some(runtime) = self.current_runtime() else {
                    self.send(
                        ctx,
                        &ServerEvent::GameError {
                            message: "You are not in a match".to_string(),
                        },
                    );
                    return;
                };
                if let Some(identity) = &self.identity {
                    runtime.do_send(PlayerInput {
                        player_id: identity.user_id.clone(),
                        card_instance_id,
                        payload,
                    });
                }
            }
            ClientEvent::AdvanceTurn => {
                let Some(runtime) = self.current_runtime() else {
                    self.send(
                        ctx,
                        &ServerEvent::GameError {
                            message: "You are not in a match".to_string(),
                        },
                    );
                    return;
                };
                if let Some(identity) = &self.identity {
                    runtime.do_send(AdvanceRequest {
                        player_id: identity.user_id.clone(),
                    });
                }
            }
        }
    }

    fn current_runtime(
        &self,
    ) -> Option<Addr<crate::services::game_runtime::GameRuntime>> {
        let identity = self.identity.as_ref()?;
        self.registry.runtime_for_player(&identity.user_id)
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "Websocket session started");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(identity) = &self.identity {
            self.lobby.do_send(CancelQueue {
                id: identity.user_id.clone(),
            });
            if let Some(runtime) = self.registry.runtime_for_player(&identity.user_id) {
                runtime.do_send(PlayerDisconnected {
                    player_id: identity.user_id.clone(),
                    conn_token: self.conn_id,
                });
            }
        }
        info!(conn_id = %self.conn_id, "Websocket session stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => self.handle_event(event, ctx),
                    Err(err) => {
                        warn!(
                            conn_id = %self.conn_id,
                            error = %err,
                            "Unrecognized websocket message"
                        );
                        self.send(
                            ctx,
                            &ServerEvent::GameError {
                                message: "Unrecognized message".to_string(),
                            },
                        );
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {}
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) => {}
            Ok(ws::Message::Nop) => {}
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "Websocket protocol error");
                ctx.stop();
            }
        }
    }
}

impl Handler<OutboundEvent> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: OutboundEvent, ctx: &mut Self::Context) {
        self.send(ctx, &msg.0);
    }
}
