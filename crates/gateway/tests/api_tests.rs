//! End-to-end tests for the REST surface against the in-memory stores.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use parley_gateway::{build_router, AppState};
use parley_realtime::NullPublisher;
use parley_rooms::{
    MemoryMessageStore, MemoryRoomStore, MessageService, Room, RoomError, RoomResult, RoomService,
    RoomStore,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let rooms = Arc::new(MemoryRoomStore::new());
    let messages = Arc::new(MemoryMessageStore::new());
    let publisher = Arc::new(NullPublisher);

    let room_service = Arc::new(RoomService::new(
        rooms.clone() as Arc<dyn RoomStore>,
        publisher.clone(),
    ));
    let message_service = Arc::new(MessageService::new(rooms, messages, publisher));
    build_router(AppState::new(room_service, message_service))
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_room(app: &Router, creator: &str, room_type: &str, members: Value) -> Value {
    let (status, body) = request(
        app,
        "POST",
        &format!("/org/org-1/members/{creator}/rooms"),
        Some(json!({ "room_type": room_type, "room_members": members })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, _) = request(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_and_get_room() {
    let app = app();
    let room = create_room(&app, "member-1", "CHANNEL", json!(["member-2"])).await;

    assert_eq!(room["room_type"], "CHANNEL");
    assert_eq!(room["created_by"], "member-1");
    assert_eq!(room["room_members"]["member-1"]["role"], "admin");
    assert_eq!(room["room_members"]["member-2"]["role"], "member");

    let room_id = room["id"].as_str().unwrap();
    let (status, fetched) =
        request(&app, "GET", &format!("/org/org-1/rooms/{room_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], room["id"]);
}

#[tokio::test]
async fn test_get_missing_room_is_not_found() {
    let app = app();
    let (status, body) = request(&app, "GET", "/org/org-1/rooms/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_invalid_dm_size_is_bad_request() {
    let app = app();
    let (status, _) = request(
        &app,
        "POST",
        "/org/org-1/members/member-1/rooms",
        Some(json!({ "room_type": "DM", "room_members": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_adds_member_to_channel() {
    let app = app();
    let room = create_room(&app, "member-1", "CHANNEL", json!(["member-2"])).await;
    let room_id = room["id"].as_str().unwrap();

    let (status, updated) = request(
        &app,
        "PUT",
        &format!("/org/org-1/rooms/{room_id}/members/member-1"),
        Some(json!({ "new_members": { "member-3": { "role": "member" } } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["room_members"]["member-3"]["role"], "member");
}

#[tokio::test]
async fn test_non_admin_add_is_unauthorized() {
    let app = app();
    let room = create_room(&app, "member-1", "CHANNEL", json!(["member-2"])).await;
    let room_id = room["id"].as_str().unwrap();

    let (status, _) = request(
        &app,
        "PUT",
        &format!("/org/org-1/rooms/{room_id}/members/member-2"),
        Some(json!({ "new_members": { "member-3": { "role": "member" } } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dm_membership_is_forbidden_to_change() {
    let app = app();
    let room = create_room(&app, "member-1", "DM", json!(["member-2"])).await;
    let room_id = room["id"].as_str().unwrap();

    let (status, _) = request(
        &app,
        "PUT",
        &format!("/org/org-1/rooms/{room_id}/members/member-1"),
        Some(json!({ "new_members": { "member-3": { "role": "member" } } })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_group_dm_over_cap_is_bad_request() {
    let app = app();
    let initial: Vec<String> = (2..=8).map(|i| format!("member-{i}")).collect();
    let room = create_room(&app, "member-1", "GROUP_DM", json!(initial)).await;
    let room_id = room["id"].as_str().unwrap();

    let (status, _) = request(
        &app,
        "PUT",
        &format!("/org/org-1/rooms/{room_id}/members/member-1"),
        Some(json!({ "new_members": {
            "member-9": { "role": "member" },
            "member-10": { "role": "member" }
        } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_member_leaves_channel() {
    let app = app();
    let room = create_room(&app, "member-1", "CHANNEL", json!(["member-2"])).await;
    let room_id = room["id"].as_str().unwrap();

    let (status, updated) = request(
        &app,
        "PATCH",
        &format!("/org/org-1/rooms/{room_id}/members/member-2?mem_id=member-2"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["room_members"]["member-2"].is_null());
}

#[tokio::test]
async fn test_remove_unknown_member_is_not_found() {
    let app = app();
    let room = create_room(&app, "member-1", "CHANNEL", json!(["member-2"])).await;
    let room_id = room["id"].as_str().unwrap();

    let (status, _) = request(
        &app,
        "PATCH",
        &format!("/org/org-1/rooms/{room_id}/members/member-1?mem_id=ghost"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_message_round_trip() {
    let app = app();
    let room = create_room(&app, "member-1", "CHANNEL", json!(["member-2"])).await;
    let room_id = room["id"].as_str().unwrap();

    let (status, message) = request(
        &app,
        "POST",
        &format!("/org/org-1/rooms/{room_id}/sender/member-2/messages"),
        Some(json!({ "text": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(message["text"], "hello");
    assert_eq!(message["sender_id"], "member-2");

    let (status, listed) = request(
        &app,
        "GET",
        &format!("/org/org-1/rooms/{room_id}/messages"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let message_id = message["id"].as_str().unwrap();
    let (status, edited) = request(
        &app,
        "PUT",
        &format!("/org/org-1/rooms/{room_id}/messages/{message_id}"),
        Some(json!({ "text": "hello again" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["text"], "hello again");
    assert!(edited["edited_at"].is_string());
}

#[tokio::test]
async fn test_message_from_non_member_is_not_found() {
    let app = app();
    let room = create_room(&app, "member-1", "CHANNEL", json!(["member-2"])).await;
    let room_id = room["id"].as_str().unwrap();

    let (status, _) = request(
        &app,
        "POST",
        &format!("/org/org-1/rooms/{room_id}/sender/stranger/messages"),
        Some(json!({ "text": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

struct UnavailableStore;

#[async_trait]
impl RoomStore for UnavailableStore {
    async fn fetch(&self, _org_id: &str, _room_id: &str) -> RoomResult<Option<Room>> {
        Err(RoomError::dependency_failure("store unreachable"))
    }

    async fn insert(&self, _org_id: &str, _room: &Room) -> RoomResult<()> {
        Err(RoomError::dependency_failure("store unreachable"))
    }

    async fn persist(
        &self,
        _org_id: &str,
        _room: &Room,
        _expected_version: u64,
    ) -> RoomResult<Room> {
        Err(RoomError::dependency_failure("store unreachable"))
    }
}

#[tokio::test]
async fn test_store_outage_maps_to_failed_dependency() {
    let rooms: Arc<dyn RoomStore> = Arc::new(UnavailableStore);
    let messages = Arc::new(MemoryMessageStore::new());
    let publisher = Arc::new(NullPublisher);
    let room_service = Arc::new(RoomService::new(rooms.clone(), publisher.clone()));
    let message_service = Arc::new(MessageService::new(rooms, messages, publisher));
    let app = build_router(AppState::new(room_service, message_service));

    let (status, body) = request(
        &app,
        "POST",
        "/org/org-1/members/member-1/rooms",
        Some(json!({ "room_type": "CHANNEL", "room_members": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::FAILED_DEPENDENCY);
    assert!(body["error"].is_string());
}
