//! Change feed - turns store writes into live post-list snapshots.
//!
//! Stores call [`ChangeFeed::notify`] after every successful write. Each
//! live query subscribes to the shared channel and re-runs the list query
//! whenever a notification arrives, so subscribers always receive the whole
//! recomputed list rather than a diff.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;

use approval_core::StoreError;
use approval_core::domain::{Post, PostId};
use approval_core::ports::{PostFeed, PubSub, Subscription, message_handler};

/// Channel carrying post change notifications.
pub const POSTS_CHANNEL: &str = "posts";

const SNAPSHOT_BUFFER: usize = 16;

#[derive(Clone)]
pub struct ChangeFeed {
    pubsub: Arc<dyn PubSub>,
    channel: String,
}

impl ChangeFeed {
    pub fn new(pubsub: Arc<dyn PubSub>) -> Self {
        Self::with_channel(pubsub, POSTS_CHANNEL)
    }

    pub fn with_channel(pubsub: Arc<dyn PubSub>, channel: impl Into<String>) -> Self {
        Self {
            pubsub,
            channel: channel.into(),
        }
    }

    /// Announce that a post changed.
    ///
    /// The write has already been committed, so a failed publish is only
    /// logged: listeners catch up with the next change.
    pub async fn notify(&self, id: PostId) {
        if let Err(e) = self.pubsub.publish(&self.channel, &id.to_string()).await {
            tracing::warn!(post_id = %id, error = %e, "Failed to publish post change");
        }
    }

    /// Start a live query backed by `load`.
    ///
    /// The first snapshot is loaded before this returns; a failure there is
    /// the subscription's failure. Later reload failures are logged and the
    /// feed waits for the next change.
    pub async fn watch<F, Fut>(&self, load: F) -> Result<PostFeed, StoreError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Post>, StoreError>> + Send + 'static,
    {
        // Capacity 1: a notification arriving while a reload is already
        // queued is folded into it.
        let (tick_tx, mut ticks) = mpsc::channel::<()>(1);
        let handler = message_handler(move |_msg| {
            let _ = tick_tx.try_send(());
            async {}
        });

        // Listen first so a write racing the initial load still triggers a
        // reload afterwards.
        let listener = self
            .pubsub
            .subscribe(&self.channel, handler)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let initial = load().await?;
        let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);
        // Fresh channel with spare capacity.
        let _ = tx.try_send(initial);

        let channel = self.channel.clone();
        let worker = tokio::spawn(async move {
            while ticks.recv().await.is_some() {
                match load().await {
                    Ok(posts) => {
                        if tx.send(posts).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(channel = %channel, error = %e, "Failed to refresh live query");
                    }
                }
            }
        });

        let subscription = Subscription::merge(vec![
            listener,
            Subscription::new(move || worker.abort()),
        ]);

        Ok(PostFeed::new(rx, subscription))
    }
}
