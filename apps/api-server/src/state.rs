//! Application state - shared across all handlers.

use std::sync::Arc;

use approval_core::ports::{PostStore, PubSub};
use approval_core::workflow::{LiveListing, ReviewWorkflow, SubmissionWorkflow};
use approval_infra::{InMemoryPostStore, InMemoryPubSub};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Direct store handle for the health probe.
    pub store: Arc<dyn PostStore>,
    pub submissions: SubmissionWorkflow,
    pub reviews: ReviewWorkflow,
    pub listing: LiveListing,
    pub public_origin: Option<String>,
}

impl AppState {
    /// Wire the workflows around a post store.
    pub fn from_store(store: Arc<dyn PostStore>, public_origin: Option<String>) -> Self {
        Self {
            submissions: SubmissionWorkflow::new(store.clone()),
            reviews: ReviewWorkflow::new(store.clone()),
            listing: LiveListing::new(store.clone()),
            store,
            public_origin,
        }
    }

    /// Build the application state with the configured backends.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let pubsub = build_pubsub(config).await?;
        let store = build_store(config, pubsub).await;

        tracing::info!("Application state initialized");

        Ok(Self::from_store(store, config.public_origin.clone()))
    }
}

async fn build_pubsub(config: &AppConfig) -> anyhow::Result<Arc<dyn PubSub>> {
    #[cfg(feature = "redis")]
    if let Some(redis) = &config.redis {
        match approval_infra::RedisPubSub::new(redis).await {
            Ok(pubsub) => return Ok(Arc::new(pubsub)),
            Err(e) if redis.fallback_to_memory => {
                tracing::error!(
                    "Failed to connect to Redis: {}. Live updates are limited to this instance.",
                    e
                );
            }
            Err(e) => return Err(anyhow::anyhow!("Redis pub/sub unavailable: {e}")),
        }
    }

    tracing::info!("Using in-memory pub/sub");
    Ok(Arc::new(InMemoryPubSub::new(config.pubsub_buffer_size)))
}

async fn build_store(config: &AppConfig, pubsub: Arc<dyn PubSub>) -> Arc<dyn PostStore> {
    #[cfg(feature = "postgres")]
    if let Some(db_config) = &config.database {
        match approval_infra::database::connect(db_config).await {
            Ok(conn) => {
                tracing::info!("Using Postgres post store");
                return Arc::new(approval_infra::PostgresPostStore::new(conn, pubsub));
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    if config.database.is_some() {
        tracing::warn!("DATABASE_URL set but the postgres feature is disabled");
    }

    if config.database.is_none() {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
    }

    Arc::new(InMemoryPostStore::new(pubsub))
}
