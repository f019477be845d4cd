//! In-memory store backends for tests and development mode.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::entities::{Message, Room};
use crate::error::{RoomError, RoomResult};
use crate::store::{MessageStore, RoomStore};

/// Room store backed by a process-local map.
///
/// Enforces the same version discipline as the production document store so
/// the compare-and-swap path is exercised in tests.
#[derive(Clone, Default)]
pub struct MemoryRoomStore {
    rooms: Arc<RwLock<HashMap<(String, String), Room>>>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn fetch(&self, org_id: &str, room_id: &str) -> RoomResult<Option<Room>> {
        let rooms = self.rooms.read().await;
        Ok(rooms
            .get(&(org_id.to_string(), room_id.to_string()))
            .cloned())
    }

    async fn insert(&self, org_id: &str, room: &Room) -> RoomResult<()> {
        let mut rooms = self.rooms.write().await;
        rooms.insert((org_id.to_string(), room.id.clone()), room.clone());
        Ok(())
    }

    async fn persist(
        &self,
        org_id: &str,
        room: &Room,
        expected_version: u64,
    ) -> RoomResult<Room> {
        let mut rooms = self.rooms.write().await;
        let key = (org_id.to_string(), room.id.clone());
        let current = rooms.get(&key).ok_or(RoomError::RoomNotFound)?;

        if current.version != expected_version {
            return Err(RoomError::version_conflict(&room.id));
        }

        let mut stored = room.clone();
        stored.version = expected_version + 1;
        rooms.insert(key, stored.clone());
        Ok(stored)
    }
}

/// Message store backed by a process-local map.
#[derive(Clone, Default)]
pub struct MemoryMessageStore {
    messages: Arc<RwLock<HashMap<(String, String), Message>>>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn insert(&self, org_id: &str, message: &Message) -> RoomResult<()> {
        let mut messages = self.messages.write().await;
        messages.insert(
            (org_id.to_string(), message.id.clone()),
            message.clone(),
        );
        Ok(())
    }

    async fn list_by_room(&self, org_id: &str, room_id: &str) -> RoomResult<Vec<Message>> {
        let messages = self.messages.read().await;
        let mut found: Vec<Message> = messages
            .values()
            .filter(|m| m.org_id == org_id && m.room_id == room_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }

    async fn get(&self, org_id: &str, message_id: &str) -> RoomResult<Option<Message>> {
        let messages = self.messages.read().await;
        Ok(messages
            .get(&(org_id.to_string(), message_id.to_string()))
            .cloned())
    }

    async fn update(&self, org_id: &str, message: &Message) -> RoomResult<Message> {
        let mut messages = self.messages.write().await;
        let key = (org_id.to_string(), message.id.clone());
        if !messages.contains_key(&key) {
            return Err(RoomError::MessageNotFound);
        }
        messages.insert(key, message.clone());
        Ok(message.clone())
    }
}
