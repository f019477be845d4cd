//! Room and membership REST endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use parley_rooms::{AddMembersRequest, CreateRoomRequest, Room};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/org/:org_id/members/:member_id/rooms", post(create_room))
        .route("/org/:org_id/rooms/:room_id", get(get_room))
        .route(
            "/org/:org_id/rooms/:room_id/members/:member_id",
            put(add_members).patch(remove_member),
        )
}

/// Creates a room on behalf of the requesting member.
async fn create_room(
    Path((org_id, member_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let room = state
        .room_service
        .create_room(&org_id, &member_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(room)))
}

async fn get_room(
    Path((org_id, room_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Json<Room>, ApiError> {
    let room = state.room_service.get_room(&org_id, &room_id).await?;
    Ok(Json(room))
}

/// Adds new member(s) to a room. The path member is the acting requester.
async fn add_members(
    Path((org_id, room_id, member_id)): Path<(String, String, String)>,
    State(state): State<AppState>,
    Json(request): Json<AddMembersRequest>,
) -> Result<Json<Room>, ApiError> {
    let room = state
        .room_service
        .add_members(&org_id, &room_id, &member_id, request.into_members())
        .await?;
    Ok(Json(room))
}

#[derive(Debug, Deserialize)]
struct RemoveMemberQuery {
    /// Id of the member being removed.
    mem_id: String,
}

/// Removes a member, either an admin removing another member or the path
/// member leaving the room.
async fn remove_member(
    Path((org_id, room_id, member_id)): Path<(String, String, String)>,
    Query(query): Query<RemoveMemberQuery>,
    State(state): State<AppState>,
) -> Result<Json<Room>, ApiError> {
    let room = state
        .room_service
        .remove_member(&org_id, &room_id, &member_id, &query.mem_id)
        .await?;
    Ok(Json(room))
}
