//! # Parley Realtime Crate
//!
//! Fire-and-forget event publishing to the real-time bus. Events are pushed
//! on a per-room channel; delivery is best-effort with no acknowledgment
//! back to the caller.

pub mod events;
pub mod publisher;

pub use events::RoomEvent;
pub use publisher::{EventPublisher, NullPublisher, PublishError, PublishResult, RedisPublisher};
