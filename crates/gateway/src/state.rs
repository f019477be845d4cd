//! Shared application state for the gateway

use std::sync::Arc;

use parley_rooms::{MessageService, RoomService};

/// Shared application state containing the backend services
#[derive(Clone)]
pub struct AppState {
    /// Room service
    pub room_service: Arc<RoomService>,
    /// Message service
    pub message_service: Arc<MessageService>,
}

impl AppState {
    pub fn new(room_service: Arc<RoomService>, message_service: Arc<MessageService>) -> Self {
        Self {
            room_service,
            message_service,
        }
    }
}
