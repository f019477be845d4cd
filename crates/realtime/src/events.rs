//! Event types pushed to connected clients.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Events published on a room's channel.
///
/// The membership-add payload carries only the delta (added member ids and
/// their roles), never the full room document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum RoomEvent {
    /// A room was created.
    RoomCreate {
        org_id: String,
        room_id: String,
        room_type: String,
        created_by: String,
    },

    /// Members were added to a room.
    RoomMemberAdd {
        /// Added member id mapped to the role it was granted.
        members: BTreeMap<String, String>,
    },

    /// A message was sent to a room.
    MessageCreate {
        message_id: String,
        sender_id: String,
        text: String,
        files: Vec<String>,
    },
}

impl RoomEvent {
    /// Wire name of the event, as clients see it.
    pub fn kind(&self) -> &'static str {
        match self {
            RoomEvent::RoomCreate { .. } => "room_create",
            RoomEvent::RoomMemberAdd { .. } => "room_member_add",
            RoomEvent::MessageCreate { .. } => "message_create",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_add_payload_carries_delta_only() {
        let mut members = BTreeMap::new();
        members.insert("member-a".to_string(), "member".to_string());
        members.insert("member-b".to_string(), "admin".to_string());

        let event = RoomEvent::RoomMemberAdd { members };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "room_member_add");
        assert_eq!(json["data"]["members"]["member-a"], "member");
        assert_eq!(json["data"]["members"]["member-b"], "admin");
        assert!(json["data"].get("room_members").is_none());
    }

    #[test]
    fn test_event_kind_matches_wire_tag() {
        let event = RoomEvent::MessageCreate {
            message_id: "m1".to_string(),
            sender_id: "u1".to_string(),
            text: "hello".to_string(),
            files: vec![],
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], event.kind());
    }

    #[test]
    fn test_room_create_round_trip() {
        let event = RoomEvent::RoomCreate {
            org_id: "org-1".to_string(),
            room_id: "room-1".to_string(),
            room_type: "GROUP_DM".to_string(),
            created_by: "member-1".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let parsed: RoomEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
