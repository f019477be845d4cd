//! Message REST endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use parley_rooms::{Message, MessageRequest};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/org/:org_id/rooms/:room_id/sender/:sender_id/messages",
            post(send_message),
        )
        .route("/org/:org_id/rooms/:room_id/messages", get(list_messages))
        .route(
            "/org/:org_id/rooms/:room_id/messages/:message_id",
            put(update_message),
        )
}

async fn send_message(
    Path((org_id, room_id, sender_id)): Path<(String, String, String)>,
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state
        .message_service
        .send_message(&org_id, &room_id, &sender_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

async fn list_messages(
    Path((org_id, room_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = state.message_service.list_messages(&org_id, &room_id).await?;
    Ok(Json(messages))
}

async fn update_message(
    Path((org_id, room_id, message_id)): Path<(String, String, String)>,
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<Message>, ApiError> {
    let message = state
        .message_service
        .update_message(&org_id, &room_id, &message_id, request)
        .await?;
    Ok(Json(message))
}
