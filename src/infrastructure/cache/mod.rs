//! Cache Module
//!
//! Redis connection management and the invite token store.

mod invite_store;

pub use invite_store::RedisInviteStore;

use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{info, instrument};

use crate::config::RedisSettings;

/// Creates a Redis connection manager with automatic reconnection.
#[instrument(skip(settings), fields(url = %settings.url))]
pub async fn create_redis_client(
    settings: &RedisSettings,
) -> Result<ConnectionManager, redis::RedisError> {
    info!("Connecting to Redis...");
    let client = Client::open(settings.url.as_str())?;
    let manager = ConnectionManager::new(client).await?;
    info!("Redis connection established");
    Ok(manager)
}

/// Cache key prefixes.
pub mod keys {
    /// Prefix for invite tokens (e.g., "invite:a1b2c3d4")
    pub const INVITE: &str = "invite:";

    /// Prefix for per-guild invite token indexes (e.g., "guild_invites:42")
    pub const GUILD_INVITES: &str = "guild_invites:";

    /// Generates an invite token key
    #[inline]
    pub fn invite(token: &str) -> String {
        format!("{}{}", INVITE, token)
    }

    /// Generates a guild invite index key
    #[inline]
    pub fn guild_invites(guild_id: impl std::fmt::Display) -> String {
        format!("{}{}", GUILD_INVITES, guild_id)
    }
}
