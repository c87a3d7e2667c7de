//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::Deserialize;
use validator::Validate;

/// Single-target request body shared by friend actions and moderation
#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    #[serde(rename = "memberId")]
    pub member_id: String,
}

/// Create invite request
#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    #[serde(rename = "isPermanent", default)]
    pub is_permanent: bool,
}

/// Join guild via invite request
#[derive(Debug, Deserialize, Validate)]
pub struct JoinGuildRequest {
    #[validate(length(min = 1, message = "Invite link is required"))]
    pub link: String,
}

/// Update member settings request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMemberSettingsRequest {
    #[validate(length(min = 1, max = 32, message = "Nickname must be 1-32 characters"))]
    pub nickname: Option<String>,

    #[validate(length(equal = 7, message = "Color must be a #rrggbb hex value"))]
    pub color: Option<String>,
}
