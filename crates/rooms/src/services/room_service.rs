//! Room service for orchestrating membership operations.

use std::collections::BTreeMap;
use std::sync::Arc;

use parley_realtime::{EventPublisher, RoomEvent};
use tracing::{debug, info, warn};

use crate::entities::{CreateRoomRequest, Room, RoomMember};
use crate::error::{RoomError, RoomResult};
use crate::policy::{self, MembershipOp};
use crate::store::RoomStore;

/// Bounded attempts for the fetch-evaluate-persist loop when the room
/// document was modified concurrently.
const PERSIST_ATTEMPTS: u32 = 3;

/// Service for creating rooms and mutating their membership.
///
/// Orchestration only: loads the room, delegates the decision to the policy
/// engine, persists the accepted result, and schedules notification events.
pub struct RoomService {
    store: Arc<dyn RoomStore>,
    publisher: Arc<dyn EventPublisher>,
}

impl RoomService {
    /// Create a new room service instance
    pub fn new(store: Arc<dyn RoomStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }

    /// Create a room with the creator as sole admin plus any requested
    /// initial members.
    pub async fn create_room(
        &self,
        org_id: &str,
        creator_id: &str,
        request: CreateRoomRequest,
    ) -> RoomResult<Room> {
        let room = Room::from_request(org_id, creator_id, request)?;
        self.store.insert(org_id, &room).await?;

        info!(%org_id, room_id = %room.id, room_type = room.room_type.as_str(), "room created");
        self.schedule_publish(
            room.id.clone(),
            RoomEvent::RoomCreate {
                org_id: org_id.to_string(),
                room_id: room.id.clone(),
                room_type: room.room_type.as_str().to_string(),
                created_by: creator_id.to_string(),
            },
        );
        Ok(room)
    }

    /// Fetch a room by id.
    pub async fn get_room(&self, org_id: &str, room_id: &str) -> RoomResult<Room> {
        self.store
            .fetch(org_id, room_id)
            .await?
            .ok_or(RoomError::RoomNotFound)
    }

    /// Add members to a room.
    ///
    /// The member-added event carries only the delta and is scheduled
    /// strictly after the persistence acknowledgment.
    pub async fn add_members(
        &self,
        org_id: &str,
        room_id: &str,
        actor_id: &str,
        new_members: BTreeMap<String, RoomMember>,
    ) -> RoomResult<Room> {
        let delta: BTreeMap<String, String> = new_members
            .iter()
            .map(|(id, m)| (id.clone(), m.role.as_str().to_string()))
            .collect();

        let op = MembershipOp::AddMembers(new_members);
        let room = self.mutate_membership(org_id, room_id, actor_id, &op).await?;

        info!(%org_id, %room_id, added = delta.len(), "members added to room");
        self.schedule_publish(room_id.to_string(), RoomEvent::RoomMemberAdd { members: delta });
        Ok(room)
    }

    /// Remove a member from a room, either an admin removing another member
    /// or a member leaving. No notification is scheduled for removal.
    pub async fn remove_member(
        &self,
        org_id: &str,
        room_id: &str,
        actor_id: &str,
        target_id: &str,
    ) -> RoomResult<Room> {
        let op = MembershipOp::RemoveMember(target_id.to_string());
        let room = self.mutate_membership(org_id, room_id, actor_id, &op).await?;

        info!(%org_id, %room_id, %target_id, "member removed from room");
        Ok(room)
    }

    /// Fetch-evaluate-persist with compare-and-swap on the room version.
    ///
    /// A concurrent mutation invalidates the snapshot; the operation is then
    /// re-evaluated against fresh state rather than silently overwriting it.
    async fn mutate_membership(
        &self,
        org_id: &str,
        room_id: &str,
        actor_id: &str,
        op: &MembershipOp,
    ) -> RoomResult<Room> {
        for attempt in 1..=PERSIST_ATTEMPTS {
            let mut room = self.get_room(org_id, room_id).await?;
            let snapshot_version = room.version;

            room.room_members = policy::evaluate(&room, actor_id, op)?;

            match self.store.persist(org_id, &room, snapshot_version).await {
                Ok(stored) => return Ok(stored),
                Err(RoomError::VersionConflict { .. }) if attempt < PERSIST_ATTEMPTS => {
                    debug!(%room_id, attempt, "room modified concurrently, re-evaluating");
                }
                Err(err) => return Err(err),
            }
        }

        Err(RoomError::version_conflict(room_id))
    }

    /// Fire-and-forget event emission: detached task, failure logged and
    /// swallowed, never awaited by the caller.
    fn schedule_publish(&self, channel: String, event: RoomEvent) {
        let publisher = Arc::clone(&self.publisher);
        tokio::spawn(async move {
            if let Err(error) = publisher.publish(&channel, &event).await {
                warn!(%channel, %error, "dropping realtime event");
            }
        });
    }
}
