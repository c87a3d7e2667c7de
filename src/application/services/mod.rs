//! Application services.
//!
//! Each service validates preconditions against the store, applies a
//! transition through a conditional write, and only on persisted success
//! hands the resulting event to the fan-out. None of them cache graph
//! state between operations.

mod friend_service;
mod invite_service;
mod member_service;

pub use friend_service::{FriendError, FriendService, FriendServiceImpl};
pub use invite_service::{InviteError, InviteService, InviteServiceImpl};
pub use member_service::{MemberError, MemberService, MemberServiceImpl};

#[cfg(test)]
pub use invite_service::MockInviteService;
