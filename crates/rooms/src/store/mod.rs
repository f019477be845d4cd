//! Store adapter traits and implementations.
//!
//! Pure pass-through to the document store: no caching, no retries. Retry
//! and backoff policy, if any, belongs to the store collaborator itself.

pub mod http;
pub mod memory;

use async_trait::async_trait;

use crate::entities::{Message, Room};
use crate::error::RoomResult;

pub use http::{DocumentClient, HttpMessageStore, HttpRoomStore};
pub use memory::{MemoryMessageStore, MemoryRoomStore};

/// Fetch and persist room documents by organization and room id.
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Fetch the current room document, or `None` if it does not exist.
    async fn fetch(&self, org_id: &str, room_id: &str) -> RoomResult<Option<Room>>;

    /// Durably write a newly created room document.
    async fn insert(&self, org_id: &str, room: &Room) -> RoomResult<()>;

    /// Replace the full room document, conditional on the stored version
    /// matching `expected_version`. Returns the stored document with its
    /// bumped version; a mismatch yields `RoomError::VersionConflict`.
    async fn persist(&self, org_id: &str, room: &Room, expected_version: u64)
        -> RoomResult<Room>;
}

/// Fetch and persist message documents.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert(&self, org_id: &str, message: &Message) -> RoomResult<()>;

    async fn list_by_room(&self, org_id: &str, room_id: &str) -> RoomResult<Vec<Message>>;

    async fn get(&self, org_id: &str, message_id: &str) -> RoomResult<Option<Message>>;

    async fn update(&self, org_id: &str, message: &Message) -> RoomResult<Message>;
}
