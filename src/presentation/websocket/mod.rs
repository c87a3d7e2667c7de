//! WebSocket Module
//!
//! Real-time event delivery: the session-tracking Gateway and the
//! connection handler.

pub mod gateway;
pub mod handler;

pub use gateway::Gateway;
pub use handler::ws_handler;
