//! Membership policy engine.
//!
//! Pure decision logic: given a room, an actor, and a membership operation,
//! returns the resulting membership mapping or a denial. Performs no I/O;
//! callers persist the accepted result.

use std::collections::BTreeMap;

use crate::entities::{MemberRole, Room, RoomMember, RoomType, GROUP_DM_MEMBER_LIMIT};
use crate::error::{RoomError, RoomResult};

/// A membership mutation to evaluate against a room.
#[derive(Debug, Clone)]
pub enum MembershipOp {
    /// Merge new members into the room, overwriting entries with the same id.
    AddMembers(BTreeMap<String, RoomMember>),
    /// Remove a single member from the room.
    RemoveMember(String),
}

/// Evaluate a membership operation against the current room state.
///
/// Denials are deterministic and computed before any persistence attempt.
pub fn evaluate(
    room: &Room,
    actor_id: &str,
    op: &MembershipOp,
) -> RoomResult<BTreeMap<String, RoomMember>> {
    let actor_role = room.member(actor_id).map(|m| m.role);

    match op {
        MembershipOp::AddMembers(new_members) => {
            addition_verdict(room.room_type, actor_role)?;

            let mut members = room.room_members.clone();
            if room.room_type == RoomType::GroupDm && !new_members.is_empty() {
                // Whole-batch pre-validation: counts only genuinely new ids,
                // and rejects the entire batch if the union would cross the cap.
                let joining = new_members
                    .keys()
                    .filter(|id| !members.contains_key(*id))
                    .count();
                if members.len() >= GROUP_DM_MEMBER_LIMIT
                    || members.len() + joining > GROUP_DM_MEMBER_LIMIT
                {
                    return Err(RoomError::bad_request(format!(
                        "the max number of members for a Group_DM is {GROUP_DM_MEMBER_LIMIT}"
                    )));
                }
            }

            members.extend(new_members.clone());
            Ok(members)
        }
        MembershipOp::RemoveMember(target_id) => {
            if !room.is_member(target_id) {
                return Err(RoomError::member_not_found(target_id));
            }

            removal_verdict(room.room_type, actor_role, actor_id == target_id)?;

            let mut members = room.room_members.clone();
            members.remove(target_id);
            Ok(members)
        }
    }
}

/// Decision table for member addition, keyed by room type and actor role.
fn addition_verdict(room_type: RoomType, actor_role: Option<MemberRole>) -> RoomResult<()> {
    match (room_type, actor_role) {
        (RoomType::Dm, _) => Err(RoomError::forbidden("DM room membership is immutable")),
        (_, Some(MemberRole::Admin)) => Ok(()),
        (_, _) => Err(RoomError::unauthorized(
            "member is not in the room or not an admin",
        )),
    }
}

/// Decision table for member removal, keyed by room type, actor role, and
/// whether the actor targets itself.
fn removal_verdict(
    room_type: RoomType,
    actor_role: Option<MemberRole>,
    is_self: bool,
) -> RoomResult<()> {
    match (room_type, is_self, actor_role) {
        (RoomType::Dm, _, _) | (RoomType::GroupDm, _, _) => Err(RoomError::forbidden(
            "members cannot be removed from this room type",
        )),
        // Leave semantics: a member may always remove itself.
        (RoomType::Channel, true, _) => Ok(()),
        (RoomType::Channel, false, Some(MemberRole::Admin)) => Ok(()),
        (RoomType::Channel, false, _) => Err(RoomError::forbidden(
            "only a room admin can remove another member",
        )),
    }
}
