//! WebSocket Gateway
//!
//! Tracks connected sessions and routes addressed events to them. This is
//! the concrete [`Fanout`]: delivery is best-effort and at-most-once per
//! session; users without an active session miss the event and reconcile
//! from the store on their next full fetch.

use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::domain::{Fanout, Recipient, SocialEvent};

/// Connected session with its outgoing message sender
pub struct ConnectedSession {
    pub user_id: i64,
    pub session_id: String,
    pub sender: mpsc::UnboundedSender<String>,
}

/// WebSocket gateway managing all connections
pub struct Gateway {
    /// Active sessions by session_id
    sessions: DashMap<String, ConnectedSession>,
    /// User ID to session IDs (one user can have multiple sessions)
    user_sessions: DashMap<i64, Vec<String>>,
    /// Guild ID to session IDs (for guild-room dispatch)
    guild_sessions: DashMap<i64, Vec<String>>,
}

impl Gateway {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            user_sessions: DashMap::new(),
            guild_sessions: DashMap::new(),
        }
    }

    /// Register a new connected session with its guild subscriptions.
    pub fn register_session(
        &self,
        session_id: String,
        user_id: i64,
        guilds: Vec<i64>,
        sender: mpsc::UnboundedSender<String>,
    ) {
        self.sessions.insert(
            session_id.clone(),
            ConnectedSession {
                user_id,
                session_id: session_id.clone(),
                sender,
            },
        );

        self.user_sessions
            .entry(user_id)
            .or_default()
            .push(session_id.clone());

        for guild_id in guilds {
            self.guild_sessions
                .entry(guild_id)
                .or_default()
                .push(session_id.clone());
        }

        tracing::info!(user_id = user_id, session_id = %session_id, "Session registered");
    }

    /// Unregister a session and drop it from every index.
    pub fn unregister_session(&self, session_id: &str) {
        if let Some((_, session)) = self.sessions.remove(session_id) {
            if let Some(mut sessions) = self.user_sessions.get_mut(&session.user_id) {
                sessions.retain(|s| s != session_id);
            }

            self.guild_sessions.iter_mut().for_each(|mut entry| {
                entry.value_mut().retain(|s| s != session_id);
            });

            tracing::info!(
                user_id = session.user_id,
                session_id = %session_id,
                "Session unregistered"
            );
        }
    }

    /// Subscribe all of a user's sessions to a guild room. Called when a
    /// membership is created while the user is connected.
    pub fn subscribe_user_to_guild(&self, user_id: i64, guild_id: i64) {
        if let Some(session_ids) = self.user_sessions.get(&user_id) {
            let mut room = self.guild_sessions.entry(guild_id).or_default();
            for session_id in session_ids.value() {
                if !room.contains(session_id) {
                    room.push(session_id.clone());
                }
            }
        }
    }

    /// Remove all of a user's sessions from a guild room.
    pub fn unsubscribe_user_from_guild(&self, user_id: i64, guild_id: i64) {
        if let Some(session_ids) = self.user_sessions.get(&user_id) {
            if let Some(mut room) = self.guild_sessions.get_mut(&guild_id) {
                room.retain(|s| !session_ids.contains(s));
            }
        }
    }

    /// Send a frame to all sessions of a user.
    fn send_to_user(&self, user_id: i64, frame: &str) {
        if let Some(session_ids) = self.user_sessions.get(&user_id) {
            for session_id in session_ids.value() {
                if let Some(session) = self.sessions.get(session_id) {
                    let _ = session.sender.send(frame.to_string());
                }
            }
        }
    }

    /// Send a frame to all sessions in a guild room.
    fn send_to_guild(&self, guild_id: i64, frame: &str) {
        if let Some(session_ids) = self.guild_sessions.get(&guild_id) {
            for session_id in session_ids.value() {
                if let Some(session) = self.sessions.get(session_id) {
                    let _ = session.sender.send(frame.to_string());
                }
            }
        }
    }

    /// Get session count
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Check if user is online (has at least one session)
    pub fn is_user_online(&self, user_id: i64) -> bool {
        self.user_sessions
            .get(&user_id)
            .map(|sessions| !sessions.is_empty())
            .unwrap_or(false)
    }
}

impl Fanout for Gateway {
    fn emit(&self, recipient: Recipient, event: SocialEvent) {
        let frame = match serde_json::to_string(&event) {
            Ok(f) => f,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize event");
                return;
            }
        };

        tracing::debug!(event = event.event_name(), ?recipient, "Dispatching event");

        match recipient {
            Recipient::User(user_id) => self.send_to_user(user_id, &frame),
            Recipient::Guild(guild_id) => self.send_to_guild(guild_id, &frame),
        }
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}
