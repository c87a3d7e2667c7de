//! Friend relation entities and repository trait.
//!
//! The friendship relation is stored normalized: a single `friendships` row
//! per unordered pair with `user_a < user_b`. Reads are symmetric, so the
//! relation can never be observed half-applied.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::shared::error::AppError;

/// Direction discriminator for friend request listings: the request was
/// sent to the listing user.
pub const REQUEST_INCOMING: u8 = 1;

/// Direction discriminator for friend request listings: the request was
/// sent by the listing user.
pub const REQUEST_OUTGOING: u8 = 0;

/// Public profile of a friend, as returned by friend listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub id: i64,
    pub username: String,
    pub image: String,
}

/// One row of a user's friend-request listing.
///
/// `request_type` is [`REQUEST_INCOMING`] when the listed user sent the
/// request to the listing user, [`REQUEST_OUTGOING`] otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequestItem {
    pub id: i64,
    pub username: String,
    pub image: String,

    #[serde(rename = "type")]
    pub request_type: u8,
}

/// Repository trait for the friend graph.
///
/// The mutating operations are conditional writes: they return whether the
/// transition actually happened. Under concurrent duplicate invocation at
/// most one caller observes `true`; the rest see `false` and the service
/// layer converts that into the documented no-op.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FriendRepository: Send + Sync {
    /// List all friends of a user.
    async fn friends_list(&self, user_id: i64) -> Result<Vec<Friend>, AppError>;

    /// List all pending requests involving a user, in both directions.
    async fn request_list(&self, user_id: i64) -> Result<Vec<FriendRequestItem>, AppError>;

    /// Check whether two users are friends (symmetric).
    async fn is_friend(&self, a: i64, b: i64) -> Result<bool, AppError>;

    /// Check whether a pending request `sender -> receiver` exists.
    async fn request_exists(&self, sender: i64, receiver: i64) -> Result<bool, AppError>;

    /// Create a pending request `sender -> receiver` unless one already
    /// exists between the pair in either direction. Returns whether a row
    /// was created.
    async fn create_request(&self, sender: i64, receiver: i64) -> Result<bool, AppError>;

    /// Delete the pending request `sender -> receiver` if present.
    /// Returns whether a row was deleted.
    async fn delete_request(&self, sender: i64, receiver: i64) -> Result<bool, AppError>;

    /// Atomically consume the pending request `requester -> acceptor` and
    /// create the friendship, in one transaction. Returns `false` without
    /// side effects when the request is gone (already accepted or
    /// cancelled by a concurrent caller).
    async fn accept_request(&self, requester: i64, acceptor: i64) -> Result<bool, AppError>;

    /// Delete the friendship between two users if present (symmetric).
    /// Returns whether a row was deleted.
    async fn remove_friend(&self, a: i64, b: i64) -> Result<bool, AppError>;
}
