//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{DisplayName, RoomName},
    infrastructure::dto::{
        http::{RoomDetailDto, RoomSummaryDto},
        websocket::MessageDto,
    },
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of active rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;
    Json(rooms.into_iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room = RoomName::normalize(Some(&room));
    match state.get_room_detail_usecase.execute(room).await {
        Ok(detail) => {
            // Domain Model から DTO への変換
            Ok(Json(RoomDetailDto {
                name: detail.room.into_string(),
                users: detail
                    .display_names
                    .into_iter()
                    .map(DisplayName::into_string)
                    .collect(),
                messages: detail.messages.iter().map(MessageDto::from).collect(),
            }))
        }
        Err(GetRoomDetailError::RoomNotFound(name)) => {
            tracing::debug!("Room '{}' not found", name);
            Err(StatusCode::NOT_FOUND)
        }
    }
}
