//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use super::handlers;
use crate::presentation::middleware::auth_middleware;
use crate::presentation::websocket::ws_handler;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        // WebSocket gateway endpoint
        .route("/gateway", get(ws_handler))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness))
        .with_state(state)
}

/// API v1 routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/friends", friend_routes(state.clone()))
        .nest("/guilds", guild_routes(state))
}

/// Friend graph routes (protected)
fn friend_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::friend::get_friends))
        .route("/requests", get(handlers::friend::get_requests))
        .route("/requests", post(handlers::friend::send_request))
        .route("/requests/accept", post(handlers::friend::accept_request))
        .route("/requests/cancel", post(handlers::friend::cancel_request))
        .route("/{member_id}", delete(handlers::friend::remove_friend))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Guild membership routes (protected)
fn guild_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/join", post(handlers::member::join_guild))
        .route("/{guild_id}/members", get(handlers::member::get_members))
        .route("/{guild_id}/member", get(handlers::member::get_member_settings))
        .route("/{guild_id}/member", put(handlers::member::update_member_settings))
        .route("/{guild_id}/seen", post(handlers::member::update_last_seen))
        .route("/{guild_id}/leave", delete(handlers::member::leave_guild))
        .route("/{guild_id}/kick", post(handlers::member::kick_member))
        .route("/{guild_id}/bans", get(handlers::member::get_ban_list))
        .route("/{guild_id}/bans", post(handlers::member::ban_member))
        .route("/{guild_id}/bans/{member_id}", delete(handlers::member::unban_member))
        .route("/{guild_id}/invites", post(handlers::invite::create_invite))
        .route("/{guild_id}/invites", delete(handlers::invite::delete_invites))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
