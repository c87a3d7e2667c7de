//! Response DTOs
//!
//! Data structures for API response bodies.

use serde::Serialize;

use crate::domain::{BannedUser, Friend, FriendRequestItem, Guild, MemberProfile, MemberSettings};

/// Friend response
#[derive(Debug, Serialize)]
pub struct FriendResponse {
    pub id: String,
    pub username: String,
    pub image: String,
}

impl From<Friend> for FriendResponse {
    fn from(friend: Friend) -> Self {
        Self {
            id: friend.id.to_string(),
            username: friend.username,
            image: friend.image,
        }
    }
}

/// Pending friend request response
#[derive(Debug, Serialize)]
pub struct FriendRequestResponse {
    pub id: String,
    pub username: String,
    pub image: String,
    /// 1 = incoming, 0 = outgoing
    #[serde(rename = "type")]
    pub request_type: u8,
}

impl From<FriendRequestItem> for FriendRequestResponse {
    fn from(item: FriendRequestItem) -> Self {
        Self {
            id: item.id.to_string(),
            username: item.username,
            image: item.image,
            request_type: item.request_type,
        }
    }
}

/// Guild response
#[derive(Debug, Serialize)]
pub struct GuildResponse {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub icon: Option<String>,
    pub created_at: String,
}

impl From<Guild> for GuildResponse {
    fn from(guild: Guild) -> Self {
        Self {
            id: guild.id.to_string(),
            name: guild.name,
            owner_id: guild.owner_id.to_string(),
            icon: guild.icon,
            created_at: guild.created_at.to_rfc3339(),
        }
    }
}

/// Guild member response (user profile with per-guild overrides applied)
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub username: String,
    pub image: String,
    pub nickname: Option<String>,
    pub color: Option<String>,
}

impl From<MemberProfile> for MemberResponse {
    fn from(profile: MemberProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            username: profile.username,
            image: profile.image,
            nickname: profile.nickname,
            color: profile.color,
        }
    }
}

/// Banned user response
#[derive(Debug, Serialize)]
pub struct BannedUserResponse {
    pub id: String,
    pub username: String,
    pub image: String,
}

impl From<BannedUser> for BannedUserResponse {
    fn from(banned: BannedUser) -> Self {
        Self {
            id: banned.id.to_string(),
            username: banned.username,
            image: banned.image,
        }
    }
}

/// Member settings response
#[derive(Debug, Serialize)]
pub struct MemberSettingsResponse {
    pub nickname: Option<String>,
    pub color: Option<String>,
}

impl From<MemberSettings> for MemberSettingsResponse {
    fn from(settings: MemberSettings) -> Self {
        Self {
            nickname: settings.nickname,
            color: settings.color,
        }
    }
}

/// Invite link response
#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub link: String,
}

/// Generic success response for operations with no payload
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
