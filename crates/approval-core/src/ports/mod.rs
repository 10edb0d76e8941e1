//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod post_store;
mod pubsub;

pub use post_store::{PostFeed, PostStore};
pub use pubsub::{
    MessageHandler, PubSub, PubSubError, PubSubMessage, Subscription, message_handler,
};
