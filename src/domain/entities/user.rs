//! User entity and repository trait.
//!
//! Users are owned by the account subsystem; this crate only reads them to
//! validate actors and targets and to build event payloads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::shared::error::AppError;

/// A chat user.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY
/// - username: VARCHAR(32) NOT NULL
/// - email: VARCHAR(255) NOT NULL UNIQUE (stored lower-cased)
/// - image: TEXT NOT NULL (avatar URL)
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,

    /// Avatar URL
    pub image: String,

    pub created_at: DateTime<Utc>,
}

/// Repository trait for read-only User access.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
}
