//! Domain entities and their repository traits.

mod friend;
mod guild;
mod invite;
mod member;
mod user;

pub use friend::{Friend, FriendRepository, FriendRequestItem, REQUEST_INCOMING, REQUEST_OUTGOING};
pub use guild::{Guild, GuildRepository};
pub use invite::{InviteStore, InviteToken};
pub use member::{BannedUser, Member, MemberProfile, MemberRepository, MemberSettings};
pub use user::{User, UserRepository};

#[cfg(test)]
pub use friend::MockFriendRepository;
#[cfg(test)]
pub use guild::MockGuildRepository;
#[cfg(test)]
pub use invite::MockInviteStore;
#[cfg(test)]
pub use member::MockMemberRepository;
#[cfg(test)]
pub use user::MockUserRepository;
