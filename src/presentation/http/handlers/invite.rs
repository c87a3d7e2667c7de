//! Invite Handlers

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::CreateInviteRequest;
use crate::application::dto::response::{InviteResponse, SuccessResponse};
use crate::application::services::{InviteError, InviteService, InviteServiceImpl};
use crate::infrastructure::cache::RedisInviteStore;
use crate::infrastructure::repositories::{PgGuildRepository, PgMemberRepository};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

pub(super) fn invite_service(
    state: &AppState,
) -> InviteServiceImpl<RedisInviteStore, PgGuildRepository, PgMemberRepository> {
    InviteServiceImpl::new(
        Arc::new(RedisInviteStore::new(state.redis.clone())),
        Arc::new(PgGuildRepository::new(state.db.clone())),
        Arc::new(PgMemberRepository::new(state.db.clone())),
        Duration::from_secs(state.settings.invite.ttl_secs),
    )
}

pub(super) fn map_err(e: InviteError) -> AppError {
    match e {
        InviteError::GuildNotFound => AppError::NotFound("Guild not found".into()),
        InviteError::Forbidden => AppError::Forbidden(e.to_string()),
        InviteError::InvalidOrExpired => AppError::BadRequest(e.to_string()),
        InviteError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Issue an invite link for a guild
pub async fn create_invite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(guild_id): Path<String>,
    Json(body): Json<CreateInviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>), AppError> {
    let guild_id: i64 = guild_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid guild ID".into()))?;

    let link = invite_service(&state)
        .issue(auth.user_id, guild_id, body.is_permanent)
        .await
        .map_err(map_err)?;

    Ok((StatusCode::CREATED, Json(InviteResponse { link })))
}

/// Invalidate every outstanding invite for a guild (owner-only)
pub async fn delete_invites(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(guild_id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let guild_id: i64 = guild_id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid guild ID".into()))?;

    invite_service(&state)
        .invalidate_all(auth.user_id, guild_id)
        .await
        .map_err(map_err)?;

    Ok(Json(SuccessResponse::ok()))
}
