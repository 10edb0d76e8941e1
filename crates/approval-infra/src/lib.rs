//! # Approval Infrastructure
//!
//! Concrete implementations of the ports defined in `approval-core`:
//! post stores, pub/sub backends and the change feed that turns store
//! writes into live list snapshots.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL post store via SeaORM
//! - `redis` - Redis pub/sub so live listings see writes from every instance

pub mod database;
pub mod pubsub;
pub mod store;

// Re-exports - In-Memory
pub use database::DatabaseConfig;
pub use pubsub::InMemoryPubSub;
pub use store::{ChangeFeed, InMemoryPostStore, POSTS_CHANNEL};

// Re-exports - External backends
#[cfg(feature = "postgres")]
pub use database::PostgresPostStore;
#[cfg(feature = "redis")]
pub use pubsub::{RedisConfig, RedisPubSub};
