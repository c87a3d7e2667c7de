//! # Concord
//!
//! Membership and social-graph backend for a chat application:
//! - friend request lifecycle and the symmetric friend relation
//! - guild membership, moderation (kick/ban/unban) and per-guild settings
//! - invite tokens (ephemeral or permanent) admitting users into guilds
//! - real-time fan-out of accepted state transitions over WebSocket
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core entities, repository traits, and the fan-out contract
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: PostgreSQL repositories and the Redis invite store
//! - **Presentation Layer**: HTTP handlers and the WebSocket gateway
//!
//! ## Module Structure
//!
//! ```text
//! concord/
//! +-- config/         Configuration management
//! +-- domain/         Entities, repository traits, fan-out events
//! +-- application/    Services and DTOs
//! +-- infrastructure/ Database and invite-store implementations
//! +-- presentation/   HTTP routes and WebSocket gateway
//! +-- shared/         Common utilities (errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
