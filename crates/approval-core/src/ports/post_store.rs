//! Post store port - persistence plus a live, ordered query.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{NewPost, Post, PostId, PostPatch};
use crate::error::StoreError;

use super::Subscription;

/// Post store trait - abstraction over the backends holding posts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persist a new post and return the id the store assigned to it.
    async fn create(&self, post: NewPost) -> Result<PostId, StoreError>;

    /// Look up a post. `Ok(None)` means the id resolves to nothing.
    async fn get_by_id(&self, id: PostId) -> Result<Option<Post>, StoreError>;

    /// Merge a partial update into an existing post. Last writer wins.
    async fn update(&self, id: PostId, patch: PostPatch) -> Result<(), StoreError>;

    /// All posts, newest first.
    async fn list(&self) -> Result<Vec<Post>, StoreError>;

    /// Open a live query over all posts, newest first.
    ///
    /// The current list is delivered right away, then a fresh list after
    /// every change.
    async fn subscribe(&self) -> Result<PostFeed, StoreError>;
}

/// Stream of full post-list snapshots from a live query.
///
/// Owns the underlying subscription: dropping the feed cancels it.
#[derive(Debug)]
pub struct PostFeed {
    snapshots: mpsc::Receiver<Vec<Post>>,
    subscription: Subscription,
}

impl PostFeed {
    pub fn new(snapshots: mpsc::Receiver<Vec<Post>>, subscription: Subscription) -> Self {
        Self {
            snapshots,
            subscription,
        }
    }

    /// Wait for the next snapshot. `None` once the feed has ended.
    pub async fn next(&mut self) -> Option<Vec<Post>> {
        self.snapshots.recv().await
    }

    pub fn cancel(self) {
        let Self {
            mut snapshots,
            subscription,
        } = self;
        snapshots.close();
        subscription.cancel();
    }
}
