//! Member Handlers
//!
//! Guild membership endpoints: joining via invite, leaving, member
//! listings, per-member settings, and owner-only moderation.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{
    JoinGuildRequest, MemberRequest, UpdateMemberSettingsRequest,
};
use crate::application::dto::response::{
    BannedUserResponse, GuildResponse, MemberResponse, MemberSettingsResponse, SuccessResponse,
};
use crate::application::services::{
    InviteServiceImpl, MemberError, MemberService, MemberServiceImpl,
};
use crate::domain::MemberSettings;
use crate::infrastructure::cache::RedisInviteStore;
use crate::infrastructure::repositories::{
    PgGuildRepository, PgMemberRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::presentation::websocket::Gateway;
use crate::shared::error::AppError;
use crate::startup::AppState;

use super::invite;

type Service = MemberServiceImpl<
    PgGuildRepository,
    PgMemberRepository,
    PgUserRepository,
    InviteServiceImpl<RedisInviteStore, PgGuildRepository, PgMemberRepository>,
    Gateway,
>;

fn member_service(state: &AppState) -> Service {
    MemberServiceImpl::new(
        Arc::new(PgGuildRepository::new(state.db.clone())),
        Arc::new(PgMemberRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        Arc::new(invite::invite_service(state)),
        state.gateway.clone(),
    )
}

fn map_err(e: MemberError) -> AppError {
    match e {
        MemberError::GuildNotFound => AppError::NotFound("Guild not found".into()),
        MemberError::UserNotFound => AppError::NotFound("User not found".into()),
        MemberError::Unauthorized => AppError::Forbidden(e.to_string()),
        MemberError::Banned => AppError::Forbidden(e.to_string()),
        MemberError::SelfAction
        | MemberError::AlreadyMember
        | MemberError::CannotLeaveAsOwner
        | MemberError::InvalidInvite => AppError::BadRequest(e.to_string()),
        MemberError::Internal(msg) => AppError::Internal(msg),
    }
}

fn parse_guild_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid guild ID".into()))
}

fn parse_member_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid member ID".into()))
}

/// Join a guild by redeeming an invite link
pub async fn join_guild(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<JoinGuildRequest>,
) -> Result<(StatusCode, Json<GuildResponse>), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let guild = member_service(&state)
        .redeem_invite(auth.user_id, body.link.trim())
        .await
        .map_err(map_err)?;

    // Live sessions of the joiner start receiving the guild room
    state.gateway.subscribe_user_to_guild(auth.user_id, guild.id);

    Ok((StatusCode::CREATED, Json(GuildResponse::from(guild))))
}

/// List a guild's members
pub async fn get_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(guild_id): Path<String>,
) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let guild_id = parse_guild_id(&guild_id)?;

    let members = member_service(&state)
        .get_members(auth.user_id, guild_id)
        .await
        .map_err(map_err)?;

    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// Leave a guild
pub async fn leave_guild(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(guild_id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let guild_id = parse_guild_id(&guild_id)?;

    member_service(&state)
        .leave_guild(auth.user_id, guild_id)
        .await
        .map_err(map_err)?;

    state
        .gateway
        .unsubscribe_user_from_guild(auth.user_id, guild_id);

    Ok(Json(SuccessResponse::ok()))
}

/// Read the caller's per-guild settings
pub async fn get_member_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(guild_id): Path<String>,
) -> Result<Json<MemberSettingsResponse>, AppError> {
    let guild_id = parse_guild_id(&guild_id)?;

    let settings = member_service(&state)
        .get_settings(auth.user_id, guild_id)
        .await
        .map_err(map_err)?;

    Ok(Json(MemberSettingsResponse::from(settings)))
}

/// Update the caller's per-guild settings
pub async fn update_member_settings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(guild_id): Path<String>,
    Json(body): Json<UpdateMemberSettingsRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let guild_id = parse_guild_id(&guild_id)?;

    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let settings = MemberSettings {
        nickname: body.nickname,
        color: body.color,
    };

    member_service(&state)
        .update_settings(auth.user_id, guild_id, settings)
        .await
        .map_err(map_err)?;

    Ok(Json(SuccessResponse::ok()))
}

/// Bump the caller's last-seen timestamp for a guild
pub async fn update_last_seen(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(guild_id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let guild_id = parse_guild_id(&guild_id)?;

    member_service(&state)
        .update_last_seen(auth.user_id, guild_id)
        .await
        .map_err(map_err)?;

    Ok(Json(SuccessResponse::ok()))
}

/// Read the guild's ban list (owner-only)
pub async fn get_ban_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(guild_id): Path<String>,
) -> Result<Json<Vec<BannedUserResponse>>, AppError> {
    let guild_id = parse_guild_id(&guild_id)?;

    let bans = member_service(&state)
        .get_ban_list(auth.user_id, guild_id)
        .await
        .map_err(map_err)?;

    Ok(Json(bans.into_iter().map(BannedUserResponse::from).collect()))
}

/// Ban a user from a guild (owner-only)
pub async fn ban_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(guild_id): Path<String>,
    Json(body): Json<MemberRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let guild_id = parse_guild_id(&guild_id)?;
    let target_id = parse_member_id(&body.member_id)?;

    member_service(&state)
        .ban_member(auth.user_id, guild_id, target_id)
        .await
        .map_err(map_err)?;

    state.gateway.unsubscribe_user_from_guild(target_id, guild_id);

    Ok(Json(SuccessResponse::ok()))
}

/// Lift a ban (owner-only)
pub async fn unban_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((guild_id, member_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, AppError> {
    let guild_id = parse_guild_id(&guild_id)?;
    let target_id = parse_member_id(&member_id)?;

    member_service(&state)
        .unban_member(auth.user_id, guild_id, target_id)
        .await
        .map_err(map_err)?;

    Ok(Json(SuccessResponse::ok()))
}

/// Kick a member without banning them (owner-only)
pub async fn kick_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(guild_id): Path<String>,
    Json(body): Json<MemberRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let guild_id = parse_guild_id(&guild_id)?;
    let target_id = parse_member_id(&body.member_id)?;

    member_service(&state)
        .kick_member(auth.user_id, guild_id, target_id)
        .await
        .map_err(map_err)?;

    state.gateway.unsubscribe_user_from_guild(target_id, guild_id);

    Ok(Json(SuccessResponse::ok()))
}
