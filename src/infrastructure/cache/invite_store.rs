//! Redis Invite Store
//!
//! Redis implementation of the InviteStore trait. Each token is a plain
//! key mapping to its guild ID, with expiry handled by Redis itself. A
//! per-guild set indexes outstanding tokens for bulk invalidation; index
//! entries whose token keys have expired are swept on the next issuance
//! for that guild, so the set stays bounded between invalidations.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

use crate::domain::InviteStore;
use crate::infrastructure::cache::keys;
use crate::shared::error::AppError;

/// Redis invite store.
#[derive(Clone)]
pub struct RedisInviteStore {
    conn: ConnectionManager,
}

impl RedisInviteStore {
    /// Create a new RedisInviteStore with the given connection manager.
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl InviteStore for RedisInviteStore {
    async fn put(
        &self,
        token: &str,
        guild_id: i64,
        permanent: bool,
        ttl: Duration,
    ) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let key = keys::invite(token);
        let index_key = keys::guild_invites(guild_id);

        if permanent {
            let _: () = conn.set(&key, guild_id).await?;
        } else {
            let _: () = conn.set_ex(&key, guild_id, ttl.as_secs()).await?;
        }

        // Sweep index entries whose token keys have since expired.
        let indexed: Vec<String> = conn.smembers(&index_key).await?;
        let mut stale = Vec::new();
        for indexed_token in indexed {
            let live: bool = conn.exists(keys::invite(&indexed_token)).await?;
            if !live {
                stale.push(indexed_token);
            }
        }
        if !stale.is_empty() {
            let _: () = conn.srem(&index_key, stale).await?;
        }

        let _: () = conn.sadd(&index_key, token).await?;

        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<i64>, AppError> {
        let mut conn = self.conn.clone();
        let guild_id: Option<i64> = conn.get(keys::invite(token)).await?;
        Ok(guild_id)
    }

    async fn delete_all_for_guild(&self, guild_id: i64) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let index_key = keys::guild_invites(guild_id);

        let tokens: Vec<String> = conn.smembers(&index_key).await?;

        for token in &tokens {
            let _: () = conn.del(keys::invite(token)).await?;
        }

        let _: () = conn.del(&index_key).await?;

        Ok(())
    }
}
