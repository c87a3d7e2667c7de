//! # Domain Layer
//!
//! Core business types of the membership and social-graph subsystem.
//! Independent of any framework or infrastructure concern.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, Guild, Member, friend relations, invites)
//! - **events**: Fan-out contract translating state transitions into addressed events
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts, including the
//!   conditional-write semantics the services rely on for race safety
//! - The core holds no authoritative state beyond what a single operation
//!   is actively validating

pub mod entities;
pub mod events;

// Re-export commonly used types
pub use entities::*;
pub use events::{Fanout, Recipient, SocialEvent};

#[cfg(test)]
pub use events::MockFanout;
