use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parley_config::{AppConfig, StoreBackend};
use parley_realtime::{EventPublisher, NullPublisher, RedisPublisher};
use parley_rooms::{
    DocumentClient, HttpMessageStore, HttpRoomStore, MemoryMessageStore, MemoryRoomStore,
    MessageService, MessageStore, RoomService, RoomStore,
};
use tracing::{info, warn};

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::INFO)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub room_service: Arc<RoomService>,
    pub message_service: Arc<MessageService>,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        // The publish bus is optional for development: degrade to dropping
        // events rather than refusing to start.
        let publisher: Arc<dyn EventPublisher> = match &config.realtime.redis_url {
            Some(url) => match RedisPublisher::connect(url).await {
                Ok(publisher) => {
                    info!("redis connection established");
                    Arc::new(publisher)
                }
                Err(error) => {
                    warn!(%error, "failed to connect to redis, proceeding without realtime events");
                    Arc::new(NullPublisher)
                }
            },
            None => {
                info!("no redis url configured, realtime events disabled");
                Arc::new(NullPublisher)
            }
        };

        let (room_store, message_store): (Arc<dyn RoomStore>, Arc<dyn MessageStore>) =
            match config.store.backend {
                StoreBackend::Memory => {
                    info!("using in-memory document store");
                    (
                        Arc::new(MemoryRoomStore::new()),
                        Arc::new(MemoryMessageStore::new()),
                    )
                }
                StoreBackend::Http => {
                    let client = DocumentClient::new(
                        &config.store.base_url,
                        Duration::from_secs(config.store.request_timeout_seconds),
                    )
                    .context("failed to build document store client")?;
                    info!(base_url = %config.store.base_url, "using http document store");
                    (
                        Arc::new(HttpRoomStore::new(client.clone())),
                        Arc::new(HttpMessageStore::new(client)),
                    )
                }
            };

        let room_service = Arc::new(RoomService::new(
            Arc::clone(&room_store),
            Arc::clone(&publisher),
        ));
        let message_service = Arc::new(MessageService::new(room_store, message_store, publisher));

        Ok(Self {
            room_service,
            message_service,
        })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
