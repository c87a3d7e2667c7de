//! Guild membership entities and repository trait.
//!
//! Covers the membership rows themselves, per-guild profile overrides
//! (nickname, role color) and the guild-scoped ban list. A ban persists
//! independently of membership.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::shared::error::AppError;

/// A user's membership in a guild.
///
/// Maps to the `members` table:
/// - guild_id: BIGINT NOT NULL REFERENCES guilds(id) (composite PK)
/// - user_id: BIGINT NOT NULL REFERENCES users(id) (composite PK)
/// - nickname: VARCHAR(32) NULL
/// - color: VARCHAR(7) NULL (cosmetic role color, e.g. "#fe7d2a")
/// - last_seen: TIMESTAMPTZ NOT NULL
/// - joined_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub guild_id: i64,
    pub user_id: i64,

    /// Guild-specific nickname (if different from username)
    pub nickname: Option<String>,

    /// Cosmetic role color; carries no permissions
    pub color: Option<String>,

    pub last_seen: DateTime<Utc>,
    pub joined_at: DateTime<Utc>,
}

impl Member {
    /// Create a fresh membership with no overrides.
    pub fn new(guild_id: i64, user_id: i64) -> Self {
        let now = Utc::now();
        Self {
            guild_id,
            user_id,
            nickname: None,
            color: None,
            last_seen: now,
            joined_at: now,
        }
    }
}

/// Per-guild profile overrides for a member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSettings {
    pub nickname: Option<String>,
    pub color: Option<String>,
}

/// A member's public profile within a guild: the user profile joined with
/// the per-guild overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub id: i64,
    pub username: String,
    pub image: String,
    pub nickname: Option<String>,
    pub color: Option<String>,
}

/// A banned user, as returned by the ban-list read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannedUser {
    pub id: i64,
    pub username: String,
    pub image: String,
}

/// Repository trait for membership and ban data access.
///
/// Mutating operations are conditional writes returning whether the
/// transition happened, so duplicate concurrent invocations degrade into
/// no-ops instead of errors.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Check whether a user is a member of a guild.
    async fn is_member(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError>;

    /// Insert a membership unless one already exists.
    /// Returns whether a row was created.
    async fn create(&self, member: &Member) -> Result<bool, AppError>;

    /// Remove a membership if present. Returns whether a row was deleted.
    async fn delete(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError>;

    /// All member user IDs of a guild.
    async fn member_ids(&self, guild_id: i64) -> Result<Vec<i64>, AppError>;

    /// All guild IDs a user belongs to.
    async fn guild_ids_for_user(&self, user_id: i64) -> Result<Vec<i64>, AppError>;

    /// Resolve user profiles with their per-guild overrides applied.
    async fn find_users_by_ids(
        &self,
        ids: &[i64],
        guild_id: i64,
    ) -> Result<Vec<MemberProfile>, AppError>;

    /// Read a member's settings; `None` when not a member.
    async fn get_settings(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Option<MemberSettings>, AppError>;

    /// Write a member's settings.
    async fn update_settings(
        &self,
        guild_id: i64,
        user_id: i64,
        settings: &MemberSettings,
    ) -> Result<(), AppError>;

    /// Bump a member's last-seen timestamp.
    async fn update_last_seen(&self, guild_id: i64, user_id: i64) -> Result<(), AppError>;

    /// Insert a ban entry unless one exists. Returns whether a row was created.
    async fn create_ban(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError>;

    /// Remove a ban entry if present. Returns whether a row was deleted.
    async fn delete_ban(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError>;

    /// Check whether a user is banned from a guild.
    async fn is_banned(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError>;

    /// All banned users of a guild. Empty when none.
    async fn list_bans(&self, guild_id: i64) -> Result<Vec<BannedUser>, AppError>;
}
