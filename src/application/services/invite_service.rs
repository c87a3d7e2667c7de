//! Invite Service
//!
//! Issues, resolves, and revokes guild invite tokens. Tokens are
//! multi-use: resolving never consumes one, and several live tokens may
//! exist per guild. The only revocation is the owner's bulk invalidation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::{GuildRepository, InviteStore, InviteToken, MemberRepository};
use crate::shared::error::AppError;

/// Invite service trait defining the token lifecycle.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InviteService: Send + Sync {
    /// Issue a new invite token for a guild. Ephemeral tokens expire
    /// after the configured TTL; permanent tokens are owner-only and
    /// never expire.
    async fn issue(
        &self,
        actor_id: i64,
        guild_id: i64,
        permanent: bool,
    ) -> Result<String, InviteError>;

    /// Resolve a token to its guild ID without consuming it.
    async fn resolve(&self, token: &str) -> Result<i64, InviteError>;

    /// Revoke every outstanding token for a guild (owner-only).
    async fn invalidate_all(&self, actor_id: i64, guild_id: i64) -> Result<(), InviteError>;
}

/// Invite service errors.
#[derive(Debug, thiserror::Error)]
pub enum InviteError {
    #[error("Guild not found")]
    GuildNotFound,

    #[error("Permission denied")]
    Forbidden,

    #[error("Invalid or expired invite")]
    InvalidOrExpired,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for InviteError {
    fn from(err: AppError) -> Self {
        InviteError::Internal(err.to_string())
    }
}

/// Invite service implementation.
pub struct InviteServiceImpl<S, G, M>
where
    S: InviteStore,
    G: GuildRepository,
    M: MemberRepository,
{
    store: Arc<S>,
    guild_repo: Arc<G>,
    member_repo: Arc<M>,
    ttl: Duration,
}

impl<S, G, M> InviteServiceImpl<S, G, M>
where
    S: InviteStore,
    G: GuildRepository,
    M: MemberRepository,
{
    /// Create a new InviteServiceImpl with the ephemeral-token TTL.
    pub fn new(store: Arc<S>, guild_repo: Arc<G>, member_repo: Arc<M>, ttl: Duration) -> Self {
        Self {
            store,
            guild_repo,
            member_repo,
            ttl,
        }
    }
}

#[async_trait]
impl<S, G, M> InviteService for InviteServiceImpl<S, G, M>
where
    S: InviteStore + 'static,
    G: GuildRepository + 'static,
    M: MemberRepository + 'static,
{
    async fn issue(
        &self,
        actor_id: i64,
        guild_id: i64,
        permanent: bool,
    ) -> Result<String, InviteError> {
        let guild = self
            .guild_repo
            .find_by_id(guild_id)
            .await?
            .ok_or(InviteError::GuildNotFound)?;

        // The owner is an implicit member.
        let is_member = guild.is_owner(actor_id)
            || self.member_repo.is_member(guild_id, actor_id).await?;

        if !is_member {
            return Err(InviteError::Forbidden);
        }

        // Permanent links are an owner privilege.
        if permanent && !guild.is_owner(actor_id) {
            return Err(InviteError::Forbidden);
        }

        let token = InviteToken::generate();
        self.store.put(&token, guild_id, permanent, self.ttl).await?;

        Ok(token)
    }

    async fn resolve(&self, token: &str) -> Result<i64, InviteError> {
        self.store
            .get(token)
            .await?
            .ok_or(InviteError::InvalidOrExpired)
    }

    async fn invalidate_all(&self, actor_id: i64, guild_id: i64) -> Result<(), InviteError> {
        let guild = self
            .guild_repo
            .find_by_id(guild_id)
            .await?
            .ok_or(InviteError::GuildNotFound)?;

        if !guild.is_owner(actor_id) {
            return Err(InviteError::Forbidden);
        }

        self.store.delete_all_for_guild(guild_id).await?;

        Ok(())
    }
}
