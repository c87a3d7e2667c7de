//! WebSocket Connection Handler
//!
//! Authenticates an upgrade request, registers the session with the
//! gateway, and pumps addressed event frames out to the client until the
//! connection drops.

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::interval;
use uuid::Uuid;

use crate::domain::MemberRepository;
use crate::infrastructure::repositories::PgMemberRepository;
use crate::presentation::middleware::auth::decode_user_id;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Connection query parameters
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    pub token: String,
}

/// WebSocket upgrade handler. The bearer token travels as a query
/// parameter since browsers cannot set headers on upgrade requests.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let user_id = decode_user_id(&params.token, &state.settings.jwt.secret)?;

    let member_repo = PgMemberRepository::new(state.db.clone());
    let guild_ids = member_repo.guild_ids_for_user(user_id).await?;

    let max_message_size = state.settings.websocket.max_message_size;

    Ok(ws
        .max_message_size(max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, state, user_id, guild_ids)))
}

/// Handle an authenticated WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState, user_id: i64, guild_ids: Vec<i64>) {
    let session_id = Uuid::new_v4().to_string();

    tracing::debug!(user_id = user_id, session_id = %session_id, "New WebSocket connection");

    let (mut sender, mut receiver) = socket.split();

    // Channel the gateway pushes serialized frames into
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    state
        .gateway
        .register_session(session_id.clone(), user_id, guild_ids, tx);

    let mut ping_timer = interval(Duration::from_millis(
        state.settings.websocket.heartbeat_interval_ms,
    ));
    ping_timer.tick().await; // Skip the immediate first tick

    loop {
        tokio::select! {
            // Outgoing event frames
            frame = rx.recv() => {
                match frame {
                    Some(text) => {
                        if sender.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            // Incoming messages; the client sends nothing meaningful, all
            // mutations travel over HTTP
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(session_id = %session_id, "Connection closed");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::debug!(session_id = %session_id, error = %e, "WebSocket error");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }

            // Keepalive
            _ = ping_timer.tick() => {
                if sender.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }
        }
    }

    state.gateway.unregister_session(&session_id);

    tracing::info!(user_id = user_id, session_id = %session_id, "User disconnected");
}
