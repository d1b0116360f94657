//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use tamariba_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{MediaBlob, MediaStoreError, RoomName, RoomSnapshot},
    infrastructure::dto::{
        http::{
            ErrorResponseDto, MemberDetailDto, RoomDetailDto, RoomSummaryDto, UploadResponseDto,
        },
        websocket::StickerDto,
    },
    ui::state::AppState,
    usecase::{AddStickerUseCase, UploadAttachmentUseCase, UploadError},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.rooms.list_rooms().await;
    Json(rooms.iter().map(room_summary).collect())
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_name): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let Ok(name) = RoomName::new(room_name) else {
        return Err(StatusCode::NOT_FOUND);
    };
    let room = state
        .rooms
        .get_room(&name)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(RoomDetailDto {
        name: room.name.as_str().to_string(),
        members: room
            .members
            .iter()
            .map(|m| MemberDetailDto {
                name: m.name.as_str().to_string(),
                joined_at: timestamp_to_rfc3339(m.joined_at.value()),
            })
            .collect(),
        user_count: room.user_count(),
        message_count: room.message_count,
        created_at: timestamp_to_rfc3339(room.created_at.value()),
    }))
}

/// Upload a chat attachment (raw body, type from `Content-Type`)
pub async fn upload_attachment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let usecase = UploadAttachmentUseCase::new(state.uploads.clone(), state.max_upload_bytes);

    match usecase.execute(media_blob(&headers, body)).await {
        Ok(stored) => (
            StatusCode::CREATED,
            Json(UploadResponseDto {
                url: stored.url,
                media_type: stored.kind.to_string(),
            }),
        )
            .into_response(),
        Err(e) => upload_error_to_response(e).into_response(),
    }
}

/// Add a sticker image; the new list is broadcast to every connection
pub async fn add_sticker(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let usecase = AddStickerUseCase::new(
        state.stickers.clone(),
        state.sticker_store.clone(),
        state.max_sticker_bytes,
    );

    match usecase.execute(media_blob(&headers, body)).await {
        Ok(sticker) => (StatusCode::CREATED, Json(StickerDto::from(&sticker))).into_response(),
        Err(e) => upload_error_to_response(e).into_response(),
    }
}

fn room_summary(room: &RoomSnapshot) -> RoomSummaryDto {
    RoomSummaryDto {
        name: room.name.as_str().to_string(),
        user_count: room.user_count(),
        message_count: room.message_count,
        created_at: timestamp_to_rfc3339(room.created_at.value()),
    }
}

fn media_blob(headers: &HeaderMap, body: Bytes) -> MediaBlob {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");
    MediaBlob::new(content_type, body.to_vec())
}

/// Convert UploadError to HTTP response
fn upload_error_to_response(err: UploadError) -> (StatusCode, Json<ErrorResponseDto>) {
    tracing::warn!("Upload rejected: {}", err);
    let UploadError::Storage(err) = err;
    match err {
        MediaStoreError::TooLarge { .. } => (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorResponseDto::new("too_large", err.to_string())),
        ),
        MediaStoreError::WrongKind(_) => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(ErrorResponseDto::new("wrong_kind", err.to_string())),
        ),
        MediaStoreError::ForeignUrl(_) | MediaStoreError::Io(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponseDto::new("storage_error", err.to_string())),
        ),
    }
}
