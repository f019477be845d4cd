//! Message service: plain data-record CRUD over the message collection.
//!
//! Depends on the room store only for existence and membership checks.

use std::sync::Arc;

use parley_realtime::{EventPublisher, RoomEvent};
use tracing::warn;

use crate::entities::{Message, MessageRequest};
use crate::error::{RoomError, RoomResult};
use crate::store::{MessageStore, RoomStore};

/// Service for sending, reading, and updating messages
pub struct MessageService {
    rooms: Arc<dyn RoomStore>,
    messages: Arc<dyn MessageStore>,
    publisher: Arc<dyn EventPublisher>,
}

impl MessageService {
    /// Create a new message service instance
    pub fn new(
        rooms: Arc<dyn RoomStore>,
        messages: Arc<dyn MessageStore>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            rooms,
            messages,
            publisher,
        }
    }

    /// Send a message to a room. The sender must be a current member.
    pub async fn send_message(
        &self,
        org_id: &str,
        room_id: &str,
        sender_id: &str,
        request: MessageRequest,
    ) -> RoomResult<Message> {
        let room = self
            .rooms
            .fetch(org_id, room_id)
            .await?
            .ok_or(RoomError::RoomNotFound)?;
        if !room.is_member(sender_id) {
            return Err(RoomError::member_not_found(sender_id));
        }

        let message = Message::new(org_id, room_id, sender_id, request);
        self.messages.insert(org_id, &message).await?;

        self.schedule_publish(
            room_id.to_string(),
            RoomEvent::MessageCreate {
                message_id: message.id.clone(),
                sender_id: sender_id.to_string(),
                text: message.text.clone(),
                files: message.files.clone(),
            },
        );
        Ok(message)
    }

    /// List messages in a room, oldest first.
    pub async fn list_messages(&self, org_id: &str, room_id: &str) -> RoomResult<Vec<Message>> {
        if self.rooms.fetch(org_id, room_id).await?.is_none() {
            return Err(RoomError::RoomNotFound);
        }
        self.messages.list_by_room(org_id, room_id).await
    }

    /// Update the text or attachments of an existing message.
    pub async fn update_message(
        &self,
        org_id: &str,
        room_id: &str,
        message_id: &str,
        request: MessageRequest,
    ) -> RoomResult<Message> {
        if self.rooms.fetch(org_id, room_id).await?.is_none() {
            return Err(RoomError::RoomNotFound);
        }

        let mut message = self
            .messages
            .get(org_id, message_id)
            .await?
            .ok_or(RoomError::MessageNotFound)?;
        if message.room_id != room_id {
            return Err(RoomError::MessageNotFound);
        }

        message.apply_edit(request);
        self.messages.update(org_id, &message).await
    }

    fn schedule_publish(&self, channel: String, event: RoomEvent) {
        let publisher = Arc::clone(&self.publisher);
        tokio::spawn(async move {
            if let Err(error) = publisher.publish(&channel, &event).await {
                warn!(%channel, %error, "dropping realtime event");
            }
        });
    }
}
