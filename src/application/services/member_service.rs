//! Member Service
//!
//! Owns guild membership: invite redemption, leaving, moderation
//! (kick/ban/unban), the ban list, and per-member settings. Moderation is
//! owner-only; there are no intermediate roles, and the cosmetic role
//! color carries no permissions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    BannedUser, Fanout, Guild, GuildRepository, Member, MemberProfile, MemberRepository,
    MemberSettings, Recipient, SocialEvent, User, UserRepository,
};
use crate::shared::error::AppError;

use super::invite_service::{InviteError, InviteService};

/// Member service trait defining membership and moderation operations.
#[async_trait]
pub trait MemberService: Send + Sync {
    /// Read the caller's per-guild settings.
    async fn get_settings(&self, user_id: i64, guild_id: i64)
        -> Result<MemberSettings, MemberError>;

    /// Update the caller's per-guild settings.
    async fn update_settings(
        &self,
        user_id: i64,
        guild_id: i64,
        settings: MemberSettings,
    ) -> Result<(), MemberError>;

    /// List the guild's members with per-guild overrides applied.
    async fn get_members(
        &self,
        user_id: i64,
        guild_id: i64,
    ) -> Result<Vec<MemberProfile>, MemberError>;

    /// Redeem an invite token and join the guild it resolves to.
    async fn redeem_invite(&self, user_id: i64, token: &str) -> Result<Guild, MemberError>;

    /// Leave a guild. The owner cannot leave.
    async fn leave_guild(&self, user_id: i64, guild_id: i64) -> Result<(), MemberError>;

    /// Kick a member (owner-only). Does not ban.
    async fn kick_member(
        &self,
        actor_id: i64,
        guild_id: i64,
        target_id: i64,
    ) -> Result<(), MemberError>;

    /// Ban a user from the guild (owner-only). Removes any membership.
    async fn ban_member(
        &self,
        actor_id: i64,
        guild_id: i64,
        target_id: i64,
    ) -> Result<(), MemberError>;

    /// Lift a ban (owner-only).
    async fn unban_member(
        &self,
        actor_id: i64,
        guild_id: i64,
        target_id: i64,
    ) -> Result<(), MemberError>;

    /// Read the guild's ban list (owner-only). Empty when no bans exist.
    async fn get_ban_list(
        &self,
        actor_id: i64,
        guild_id: i64,
    ) -> Result<Vec<BannedUser>, MemberError>;

    /// Bump the caller's last-seen timestamp for a guild.
    async fn update_last_seen(&self, user_id: i64, guild_id: i64) -> Result<(), MemberError>;
}

/// Member service errors.
#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    #[error("Guild not found")]
    GuildNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Must be the guild owner")]
    Unauthorized,

    #[error("You cannot perform this action on yourself")]
    SelfAction,

    #[error("You are banned from this guild")]
    Banned,

    #[error("Already a member of this guild")]
    AlreadyMember,

    #[error("The owner cannot leave their guild")]
    CannotLeaveAsOwner,

    #[error("Invalid or expired invite")]
    InvalidInvite,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AppError> for MemberError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Conflict(msg) => MemberError::Internal(format!("conflict: {msg}")),
            e => MemberError::Internal(e.to_string()),
        }
    }
}

impl From<InviteError> for MemberError {
    fn from(err: InviteError) -> Self {
        match err {
            InviteError::GuildNotFound => MemberError::GuildNotFound,
            InviteError::Forbidden => MemberError::Unauthorized,
            InviteError::InvalidOrExpired => MemberError::InvalidInvite,
            InviteError::Internal(msg) => MemberError::Internal(msg),
        }
    }
}

/// Member service implementation.
pub struct MemberServiceImpl<G, M, U, I, F>
where
    G: GuildRepository,
    M: MemberRepository,
    U: UserRepository,
    I: InviteService,
    F: Fanout,
{
    guild_repo: Arc<G>,
    member_repo: Arc<M>,
    user_repo: Arc<U>,
    invite_service: Arc<I>,
    fanout: Arc<F>,
}

impl<G, M, U, I, F> MemberServiceImpl<G, M, U, I, F>
where
    G: GuildRepository,
    M: MemberRepository,
    U: UserRepository,
    I: InviteService,
    F: Fanout,
{
    /// Create a new MemberServiceImpl.
    pub fn new(
        guild_repo: Arc<G>,
        member_repo: Arc<M>,
        user_repo: Arc<U>,
        invite_service: Arc<I>,
        fanout: Arc<F>,
    ) -> Self {
        Self {
            guild_repo,
            member_repo,
            user_repo,
            invite_service,
            fanout,
        }
    }

    async fn load_guild(&self, guild_id: i64) -> Result<Guild, MemberError> {
        self.guild_repo
            .find_by_id(guild_id)
            .await?
            .ok_or(MemberError::GuildNotFound)
    }

    async fn load_guild_owned_by(&self, guild_id: i64, actor_id: i64) -> Result<Guild, MemberError> {
        let guild = self.load_guild(guild_id).await?;
        if !guild.is_owner(actor_id) {
            return Err(MemberError::Unauthorized);
        }
        Ok(guild)
    }

    async fn load_user(&self, user_id: i64) -> Result<User, MemberError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(MemberError::UserNotFound)
    }

    /// Remove the target's membership; on an actual removal, notify the
    /// guild room and the removed user.
    async fn remove_and_notify(&self, guild_id: i64, target_id: i64) -> Result<(), MemberError> {
        let removed = self.member_repo.delete(guild_id, target_id).await?;

        if removed {
            self.fanout.emit(
                Recipient::Guild(guild_id),
                SocialEvent::MemberRemoved {
                    guild_id,
                    user_id: target_id,
                },
            );
            self.fanout.emit(
                Recipient::User(target_id),
                SocialEvent::RemovedFromGuild { guild_id },
            );
        }

        Ok(())
    }
}

#[async_trait]
impl<G, M, U, I, F> MemberService for MemberServiceImpl<G, M, U, I, F>
where
    G: GuildRepository + 'static,
    M: MemberRepository + 'static,
    U: UserRepository + 'static,
    I: InviteService + 'static,
    F: Fanout + 'static,
{
    async fn get_settings(
        &self,
        user_id: i64,
        guild_id: i64,
    ) -> Result<MemberSettings, MemberError> {
        let guild = self.load_guild(guild_id).await?;

        // The owner is an implicit member; without a row they read defaults.
        match self.member_repo.get_settings(guild_id, user_id).await? {
            Some(settings) => Ok(settings),
            None if guild.is_owner(user_id) => Ok(MemberSettings::default()),
            None => Err(MemberError::GuildNotFound),
        }
    }

    async fn update_settings(
        &self,
        user_id: i64,
        guild_id: i64,
        settings: MemberSettings,
    ) -> Result<(), MemberError> {
        let guild = self.load_guild(guild_id).await?;

        // Membership check precedes the mutation. The owner is an implicit
        // member; their row is materialized on first write.
        if !self.member_repo.is_member(guild_id, user_id).await? {
            if !guild.is_owner(user_id) {
                return Err(MemberError::GuildNotFound);
            }
            self.member_repo
                .create(&Member::new(guild_id, user_id))
                .await?;
        }

        self.member_repo
            .update_settings(guild_id, user_id, &settings)
            .await?;

        let profiles = self
            .member_repo
            .find_users_by_ids(&[user_id], guild_id)
            .await?;

        if let Some(member) = profiles.into_iter().next() {
            self.fanout.emit(
                Recipient::Guild(guild_id),
                SocialEvent::MemberSettingsUpdated { guild_id, member },
            );
        }

        Ok(())
    }

    async fn get_members(
        &self,
        user_id: i64,
        guild_id: i64,
    ) -> Result<Vec<MemberProfile>, MemberError> {
        let guild = self.load_guild(guild_id).await?;

        if !guild.is_owner(user_id) && !self.member_repo.is_member(guild_id, user_id).await? {
            return Err(MemberError::GuildNotFound);
        }

        let ids = self.member_repo.member_ids(guild_id).await?;
        Ok(self.member_repo.find_users_by_ids(&ids, guild_id).await?)
    }

    async fn redeem_invite(&self, user_id: i64, token: &str) -> Result<Guild, MemberError> {
        let user = self.load_user(user_id).await?;

        let guild_id = self.invite_service.resolve(token).await?;
        let guild = self.load_guild(guild_id).await?;

        // A ban blocks redemption even with a freshly issued token.
        if self.member_repo.is_banned(guild_id, user_id).await? {
            return Err(MemberError::Banned);
        }

        if self.member_repo.is_member(guild_id, user_id).await? {
            return Err(MemberError::AlreadyMember);
        }

        let created = self
            .member_repo
            .create(&Member::new(guild_id, user_id))
            .await?;

        // Lost a race against a concurrent redemption of the same user.
        if !created {
            return Err(MemberError::AlreadyMember);
        }

        self.fanout.emit(
            Recipient::Guild(guild_id),
            SocialEvent::MemberAdded {
                guild_id,
                member: MemberProfile {
                    id: user.id,
                    username: user.username,
                    image: user.image,
                    nickname: None,
                    color: None,
                },
            },
        );

        Ok(guild)
    }

    async fn leave_guild(&self, user_id: i64, guild_id: i64) -> Result<(), MemberError> {
        let guild = self.load_guild(guild_id).await?;

        if guild.is_owner(user_id) {
            return Err(MemberError::CannotLeaveAsOwner);
        }

        let removed = self.member_repo.delete(guild_id, user_id).await?;

        if removed {
            self.fanout.emit(
                Recipient::Guild(guild_id),
                SocialEvent::MemberRemoved { guild_id, user_id },
            );
        }

        Ok(())
    }

    async fn kick_member(
        &self,
        actor_id: i64,
        guild_id: i64,
        target_id: i64,
    ) -> Result<(), MemberError> {
        self.load_guild_owned_by(guild_id, actor_id).await?;
        self.load_user(target_id).await?;

        if target_id == actor_id {
            return Err(MemberError::SelfAction);
        }

        self.remove_and_notify(guild_id, target_id).await
    }

    async fn ban_member(
        &self,
        actor_id: i64,
        guild_id: i64,
        target_id: i64,
    ) -> Result<(), MemberError> {
        self.load_guild_owned_by(guild_id, actor_id).await?;
        self.load_user(target_id).await?;

        if target_id == actor_id {
            return Err(MemberError::SelfAction);
        }

        // Unique ban entry; re-banning is a no-op.
        self.member_repo.create_ban(guild_id, target_id).await?;

        // Ban implies immediate removal.
        self.remove_and_notify(guild_id, target_id).await
    }

    async fn unban_member(
        &self,
        actor_id: i64,
        guild_id: i64,
        target_id: i64,
    ) -> Result<(), MemberError> {
        self.load_guild_owned_by(guild_id, actor_id).await?;

        if target_id == actor_id {
            return Err(MemberError::SelfAction);
        }

        // No fanout: the target is not a member and was never notified.
        self.member_repo.delete_ban(guild_id, target_id).await?;

        Ok(())
    }

    async fn get_ban_list(
        &self,
        actor_id: i64,
        guild_id: i64,
    ) -> Result<Vec<BannedUser>, MemberError> {
        self.load_guild_owned_by(guild_id, actor_id).await?;

        Ok(self.member_repo.list_bans(guild_id).await?)
    }

    async fn update_last_seen(&self, user_id: i64, guild_id: i64) -> Result<(), MemberError> {
        self.member_repo.update_last_seen(guild_id, user_id).await?;
        Ok(())
    }
}
