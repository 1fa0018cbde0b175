//! HTTP API endpoint handlers.
//!
//! Read-only observability endpoints; all room mutation happens over the
//! WebSocket surface.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    common::time::timestamp_to_jst_rfc3339,
    domain::RoomName,
    infrastructure::dto::http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let mut summaries = Vec::new();
    for name in state.rooms.room_names().await {
        // A room can vanish between listing and lookup; skip it
        let Ok(room) = state.rooms.get_room(&name).await else {
            continue;
        };
        summaries.push(RoomSummaryDto {
            name: room.name.as_str().to_string(),
            has_password: room.has_password(),
            member_count: room.member_count(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        });
    }
    summaries.sort_by(|a, b| a.name.cmp(&b.name));

    Json(summaries)
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_name): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let name = RoomName::new(room_name).map_err(|_| StatusCode::NOT_FOUND)?;
    let room = state
        .rooms
        .get_room(&name)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    let detail = RoomDetailDto {
        name: room.name.as_str().to_string(),
        has_password: room.has_password(),
        members: room
            .members
            .iter()
            .map(|m| MemberDetailDto {
                id: m.id.as_str().to_string(),
                username: m.username.as_str().to_string(),
                joined_at: timestamp_to_jst_rfc3339(m.joined_at.value()),
            })
            .collect(),
        created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
    };

    Ok(Json(detail))
}
