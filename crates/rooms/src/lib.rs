//! # Parley Rooms Crate
//!
//! Core business logic for the Parley chat-room backend: domain entities,
//! the membership policy engine, orchestration services, and store adapters.
//!
//! ## Architecture
//!
//! - **Entities**: Domain models (Room, RoomMember, Message)
//! - **Policy**: Pure membership decision logic
//! - **Services**: Orchestration layer (fetch, evaluate, persist, notify)
//! - **Store**: Document-store adapters (HTTP and in-memory)

pub mod entities;
pub mod error;
pub mod policy;
pub mod services;
pub mod store;

// Re-export main types for convenience
pub use entities::{
    AddMembersRequest, CreateRoomRequest, MemberRole, Message, MessageRequest, NewMember, Room,
    RoomMember, RoomType, GROUP_DM_MEMBER_LIMIT,
};
pub use error::{RoomError, RoomResult};
pub use policy::MembershipOp;
pub use services::{MessageService, RoomService};
pub use store::{
    DocumentClient, HttpMessageStore, HttpRoomStore, MemoryMessageStore, MemoryRoomStore,
    MessageStore, RoomStore,
};
