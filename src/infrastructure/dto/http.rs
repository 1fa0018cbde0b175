//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room summary returned by the room list endpoint.
///
/// Passwords are never exposed, only whether one is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub name: String,
    pub has_password: bool,
    pub member_count: usize,
    /// RFC 3339 (JST)
    pub created_at: String,
}

/// Member entry of the room detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDetailDto {
    pub id: String,
    pub username: String,
    /// RFC 3339 (JST)
    pub joined_at: String,
}

/// Room detail returned by the room detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub name: String,
    pub has_password: bool,
    pub members: Vec<MemberDetailDto>,
    /// RFC 3339 (JST)
    pub created_at: String,
}
