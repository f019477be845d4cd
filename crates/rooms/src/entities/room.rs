use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{RoomError, RoomResult};

/// Upper membership bound for group direct-message rooms.
pub const GROUP_DM_MEMBER_LIMIT: usize = 9;

/// Room type enumeration governing the membership mutation policy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    /// Exactly two members, fixed at creation, never mutated.
    Dm,
    /// Between 2 and 9 members inclusive.
    GroupDm,
    /// Unbounded membership, admin-gated changes, open self-leave.
    Channel,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Dm => "DM",
            RoomType::GroupDm => "GROUP_DM",
            RoomType::Channel => "CHANNEL",
        }
    }
}

/// Member role enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }
}

impl From<&str> for MemberRole {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "admin" => MemberRole::Admin,
            _ => MemberRole::Member,
        }
    }
}

/// Represents a member of a room.
///
/// Owned exclusively by its room; never referenced outside the room's
/// membership mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomMember {
    /// Member role in the room
    pub role: MemberRole,
    /// When the member joined the room
    #[serde(default = "now_rfc3339")]
    pub joined_at: String,
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

impl RoomMember {
    /// Create a new room member with the given role
    pub fn new(role: MemberRole) -> Self {
        Self {
            role,
            joined_at: now_rfc3339(),
        }
    }

    /// Check if the member is an admin
    pub fn is_admin(&self) -> bool {
        matches!(self.role, MemberRole::Admin)
    }
}

/// A named conversation context with a typed membership policy.
///
/// The `version` field is the optimistic-concurrency token: every persisted
/// mutation bumps it, and a persist against a stale version is rejected by
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub org_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_name: Option<String>,
    pub room_type: RoomType,
    pub created_by: String,
    pub room_members: BTreeMap<String, RoomMember>,
    pub created_at: String,
    #[serde(default)]
    pub version: u64,
}

impl Room {
    /// Build a room from a creation request.
    ///
    /// The creator becomes the sole admin; requested initial members join
    /// with the member role. The type-specific size invariant is validated
    /// before any id is allocated.
    pub fn from_request(
        org_id: &str,
        creator_id: &str,
        request: CreateRoomRequest,
    ) -> RoomResult<Self> {
        let mut room_members = BTreeMap::new();
        room_members.insert(creator_id.to_string(), RoomMember::new(MemberRole::Admin));
        for member_id in request.room_members {
            if member_id == creator_id {
                continue;
            }
            room_members.insert(member_id, RoomMember::new(MemberRole::Member));
        }

        let room = Self {
            id: cuid2::create_id(),
            org_id: org_id.to_string(),
            room_name: request.room_name,
            room_type: request.room_type,
            created_by: creator_id.to_string(),
            room_members,
            created_at: now_rfc3339(),
            version: 0,
        };
        room.validate_initial_size()?;
        Ok(room)
    }

    pub fn member(&self, member_id: &str) -> Option<&RoomMember> {
        self.room_members.get(member_id)
    }

    pub fn is_member(&self, member_id: &str) -> bool {
        self.room_members.contains_key(member_id)
    }

    pub fn member_count(&self) -> usize {
        self.room_members.len()
    }

    fn validate_initial_size(&self) -> RoomResult<()> {
        let count = self.member_count();
        match self.room_type {
            RoomType::Dm if count != 2 => Err(RoomError::bad_request(
                "a DM room must have exactly 2 members",
            )),
            RoomType::GroupDm if !(2..=GROUP_DM_MEMBER_LIMIT).contains(&count) => {
                Err(RoomError::bad_request(format!(
                    "a Group_DM room must have between 2 and {GROUP_DM_MEMBER_LIMIT} members"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Parameters for creating a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_name: Option<String>,
    pub room_type: RoomType,
    /// Initial member ids; the creator is always included as admin.
    #[serde(default)]
    pub room_members: Vec<String>,
}

/// Parameters for adding members to a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMembersRequest {
    pub new_members: BTreeMap<String, NewMember>,
}

/// Role assignment for a single member being added
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
    pub role: MemberRole,
}

impl AddMembersRequest {
    /// Stamp join metadata onto the requested members.
    pub fn into_members(self) -> BTreeMap<String, RoomMember> {
        self.new_members
            .into_iter()
            .map(|(id, m)| (id, RoomMember::new(m.role)))
            .collect()
    }
}
