//! Friend Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};

use crate::application::dto::request::MemberRequest;
use crate::application::dto::response::{FriendRequestResponse, FriendResponse, SuccessResponse};
use crate::application::services::{FriendError, FriendService, FriendServiceImpl};
use crate::infrastructure::repositories::{PgFriendRepository, PgUserRepository};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn friend_service(
    state: &AppState,
) -> FriendServiceImpl<PgFriendRepository, PgUserRepository, crate::presentation::websocket::Gateway>
{
    FriendServiceImpl::new(
        Arc::new(PgFriendRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        state.gateway.clone(),
    )
}

fn map_err(e: FriendError) -> AppError {
    match e {
        FriendError::NotFound => AppError::NotFound("User not found".into()),
        FriendError::SelfAction => AppError::BadRequest(e.to_string()),
        FriendError::Internal(msg) => AppError::Internal(msg),
    }
}

fn parse_member_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Invalid member ID".into()))
}

/// List the caller's friends
pub async fn get_friends(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<FriendResponse>>, AppError> {
    let friends = friend_service(&state)
        .get_friends(auth.user_id)
        .await
        .map_err(map_err)?;

    Ok(Json(friends.into_iter().map(FriendResponse::from).collect()))
}

/// List the caller's pending friend requests, both directions
pub async fn get_requests(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<FriendRequestResponse>>, AppError> {
    let requests = friend_service(&state)
        .get_requests(auth.user_id)
        .await
        .map_err(map_err)?;

    Ok(Json(
        requests
            .into_iter()
            .map(FriendRequestResponse::from)
            .collect(),
    ))
}

/// Send a friend request
pub async fn send_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<MemberRequest>,
) -> Result<(StatusCode, Json<SuccessResponse>), AppError> {
    let target_id = parse_member_id(&body.member_id)?;

    friend_service(&state)
        .send_request(auth.user_id, target_id)
        .await
        .map_err(map_err)?;

    Ok((StatusCode::CREATED, Json(SuccessResponse::ok())))
}

/// Accept a pending friend request
pub async fn accept_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<MemberRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let target_id = parse_member_id(&body.member_id)?;

    friend_service(&state)
        .accept_request(auth.user_id, target_id)
        .await
        .map_err(map_err)?;

    Ok(Json(SuccessResponse::ok()))
}

/// Cancel a friend request the caller sent
pub async fn cancel_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<MemberRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let target_id = parse_member_id(&body.member_id)?;

    friend_service(&state)
        .cancel_request(auth.user_id, target_id)
        .await
        .map_err(map_err)?;

    Ok(Json(SuccessResponse::ok()))
}

/// Remove a friend
pub async fn remove_friend(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(member_id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let target_id = parse_member_id(&member_id)?;

    friend_service(&state)
        .remove_friend(auth.user_id, target_id)
        .await
        .map_err(map_err)?;

    Ok(Json(SuccessResponse::ok()))
}
