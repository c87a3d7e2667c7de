//! Fan-out contract
//!
//! Accepted state transitions are translated into addressed real-time
//! events. The contract is fire-and-forget with at-most-once delivery per
//! connected session: recipients without an active connection miss the
//! event and reconcile from the store on their next full fetch.
//!
//! Services call [`Fanout::emit`] strictly after the corresponding
//! persistence succeeded; a persistence failure suppresses the emit.

use serde::Serialize;

#[cfg(test)]
use mockall::automock;

use super::entities::{Friend, FriendRequestItem, MemberProfile};

/// Addressing for a fan-out event: a single user or a guild room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    User(i64),
    Guild(i64),
}

/// Domain events dispatched to connected clients.
///
/// Serialized as `{"t": <event name>, "d": <payload>}` frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "t", content = "d")]
pub enum SocialEvent {
    /// A friend request arrived; payload is the requester's profile.
    #[serde(rename = "add_friend_request")]
    FriendRequestReceived(FriendRequestItem),

    /// A sent request was accepted; payload is the new friend's profile.
    #[serde(rename = "add_friend")]
    FriendAdded(Friend),

    /// A friendship was dissolved by the other party.
    #[serde(rename = "remove_friend")]
    FriendRemoved { user_id: i64 },

    /// A user joined the guild.
    #[serde(rename = "add_member")]
    MemberAdded { guild_id: i64, member: MemberProfile },

    /// A member left or was removed from the guild.
    #[serde(rename = "remove_member")]
    MemberRemoved { guild_id: i64, user_id: i64 },

    /// Direct notice to a kicked/banned user that they lost the guild.
    #[serde(rename = "remove_from_guild")]
    RemovedFromGuild { guild_id: i64 },

    /// A member changed their nickname or role color.
    #[serde(rename = "edit_member")]
    MemberSettingsUpdated { guild_id: i64, member: MemberProfile },
}

impl SocialEvent {
    /// The wire-level event name.
    pub fn event_name(&self) -> &'static str {
        match self {
            SocialEvent::FriendRequestReceived(_) => "add_friend_request",
            SocialEvent::FriendAdded(_) => "add_friend",
            SocialEvent::FriendRemoved { .. } => "remove_friend",
            SocialEvent::MemberAdded { .. } => "add_member",
            SocialEvent::MemberRemoved { .. } => "remove_member",
            SocialEvent::RemovedFromGuild { .. } => "remove_from_guild",
            SocialEvent::MemberSettingsUpdated { .. } => "edit_member",
        }
    }
}

/// Dispatch contract consumed by the services. Delivery problems stay
/// inside the transport and never fail the triggering operation.
#[cfg_attr(test, automock)]
pub trait Fanout: Send + Sync {
    /// Dispatch an event to a user or guild room, best effort.
    fn emit(&self, recipient: Recipient, event: SocialEvent);
}
