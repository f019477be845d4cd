//! Publisher trait and transport implementations.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use thiserror::Error;
use tracing::debug;

use crate::events::RoomEvent;

/// Result type alias for publish operations
pub type PublishResult<T> = Result<T, PublishError>;

/// Errors raised by the publish transport.
///
/// These are never surfaced to API callers; the scheduling side logs and
/// drops them.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("payload serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<redis::RedisError> for PublishError {
    fn from(err: redis::RedisError) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Fire-and-forget event emission to the real-time bus.
///
/// At-most-once, best-effort: no retry, no durability guarantee if the
/// transport is down at call time.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, channel: &str, event: &RoomEvent) -> PublishResult<()>;
}

/// Publisher backed by Redis pub/sub.
#[derive(Clone)]
pub struct RedisPublisher {
    conn: ConnectionManager,
}

impl RedisPublisher {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Open a managed connection to the given Redis URL.
    pub async fn connect(url: &str) -> PublishResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn))
    }
}

#[async_trait]
impl EventPublisher for RedisPublisher {
    async fn publish(&self, channel: &str, event: &RoomEvent) -> PublishResult<()> {
        let payload = serde_json::to_string(event)?;
        let mut conn = self.conn.clone();
        redis::cmd("PUBLISH")
            .arg(channel)
            .arg(payload)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}

/// Publisher used when no real-time transport is configured.
///
/// Events are logged at debug level and dropped.
#[derive(Debug, Clone, Default)]
pub struct NullPublisher;

#[async_trait]
impl EventPublisher for NullPublisher {
    async fn publish(&self, channel: &str, event: &RoomEvent) -> PublishResult<()> {
        debug!(%channel, kind = event.kind(), "no realtime transport, dropping event");
        Ok(())
    }
}
