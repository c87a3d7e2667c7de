//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits.

mod friend_repository;
mod guild_repository;
mod member_repository;
mod user_repository;

pub use friend_repository::PgFriendRepository;
pub use guild_repository::PgGuildRepository;
pub use member_repository::PgMemberRepository;
pub use user_repository::PgUserRepository;
