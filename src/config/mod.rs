//! Configuration Module
//!
//! Layered configuration loading: `config/default.toml`, an optional
//! environment-specific file, then environment variables.

mod settings;

pub use settings::{
    CorsSettings, DatabaseSettings, InviteSettings, JwtSettings, RedisSettings, ServerSettings,
    Settings, WebSocketSettings,
};
