//! Invite token generation and the token store trait.
//!
//! An invite token is an opaque code mapped to a guild ID. Ephemeral
//! tokens expire after a fixed TTL from issuance; permanent tokens live
//! until the guild's invites are explicitly invalidated. Tokens are
//! multi-use: resolving one never consumes it.

use std::time::Duration;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::shared::error::AppError;

/// Opaque invite token codes.
pub struct InviteToken;

impl InviteToken {
    /// Generate a random 8-character alphanumeric token.
    pub fn generate() -> String {
        use rand::Rng;
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        const TOKEN_LEN: usize = 8;

        let mut rng = rand::rng();
        (0..TOKEN_LEN)
            .map(|_| {
                let idx = rng.random_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }
}

/// Expiring key-value store for invite tokens, with a secondary index by
/// guild for bulk invalidation. There is no single-token revoke.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InviteStore: Send + Sync {
    /// Store `token -> guild_id`. Ephemeral tokens carry the given TTL;
    /// permanent tokens never expire. Also sweeps bookkeeping left behind
    /// by tokens that have since expired.
    async fn put(
        &self,
        token: &str,
        guild_id: i64,
        permanent: bool,
        ttl: Duration,
    ) -> Result<(), AppError>;

    /// Resolve a token to its guild ID. `None` when unknown or expired.
    /// Does not consume the token.
    async fn get(&self, token: &str) -> Result<Option<i64>, AppError>;

    /// Revoke every outstanding token for a guild.
    async fn delete_all_for_guild(&self, guild_id: i64) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_alphanumeric() {
        let token = InviteToken::generate();
        assert_eq!(token.len(), 8);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_tokens_differ() {
        assert_ne!(InviteToken::generate(), InviteToken::generate());
    }
}
