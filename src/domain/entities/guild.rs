//! Guild entity and repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::shared::error::AppError;

/// A guild (server). The owner is a single user, not a role; they are an
/// implicit member and cannot be kicked, banned, or unbanned through the
/// member-management path.
///
/// Maps to the `guilds` table:
/// - id: BIGINT PRIMARY KEY
/// - name: VARCHAR(100) NOT NULL
/// - owner_id: BIGINT NOT NULL REFERENCES users(id)
/// - icon: TEXT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guild {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Guild {
    /// Check whether a user is the guild owner.
    pub fn is_owner(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }
}

/// Repository trait for Guild access.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GuildRepository: Send + Sync {
    /// Find a guild by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Guild>, AppError>;
}
