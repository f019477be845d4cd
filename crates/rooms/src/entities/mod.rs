//! Domain entities for rooms, members, and messages.

pub mod message;
pub mod room;

pub use message::{Message, MessageRequest};
pub use room::{
    AddMembersRequest, CreateRoomRequest, MemberRole, NewMember, Room, RoomMember, RoomType,
    GROUP_DM_MEMBER_LIMIT,
};
