use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A message sent to a room.
///
/// References `room_id` and `sender_id` but has no ownership over the room
/// or its membership mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub org_id: String,
    pub room_id: String,
    pub sender_id: String,
    pub text: String,
    #[serde(default)]
    pub files: Vec<String>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<String>,
}

impl Message {
    pub fn new(org_id: &str, room_id: &str, sender_id: &str, request: MessageRequest) -> Self {
        Self {
            id: cuid2::create_id(),
            org_id: org_id.to_string(),
            room_id: room_id.to_string(),
            sender_id: sender_id.to_string(),
            text: request.text,
            files: request.files,
            created_at: Utc::now().to_rfc3339(),
            edited_at: None,
        }
    }

    /// Apply an edit, stamping the edit time.
    pub fn apply_edit(&mut self, request: MessageRequest) {
        self.text = request.text;
        self.files = request.files;
        self.edited_at = Some(Utc::now().to_rfc3339());
    }
}

/// Parameters for sending or updating a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRequest {
    pub text: String,
    #[serde(default)]
    pub files: Vec<String>,
}
