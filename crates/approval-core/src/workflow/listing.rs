//! Agency-side live listing of every post and its review status.

use std::sync::Arc;

use crate::domain::Post;
use crate::error::DomainError;
use crate::ports::{PostFeed, PostStore};

#[derive(Clone)]
pub struct LiveListing {
    store: Arc<dyn PostStore>,
}

impl LiveListing {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// One-shot snapshot, newest first.
    pub async fn current(&self) -> Result<Vec<Post>, DomainError> {
        self.store.list().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to list posts");
            e.into()
        })
    }

    /// Open the live query. The session holds the subscription until it is
    /// deactivated or dropped.
    pub async fn activate(&self) -> Result<ListingSession, DomainError> {
        let feed = self.store.subscribe().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to subscribe to posts");
            e
        })?;
        tracing::debug!("Live listing activated");

        Ok(ListingSession {
            feed,
            posts: Vec::new(),
        })
    }
}

/// An active listing view.
#[derive(Debug)]
pub struct ListingSession {
    feed: PostFeed,
    posts: Vec<Post>,
}

impl ListingSession {
    /// Wait for the next snapshot and replace the displayed list with it.
    /// `None` once the feed has ended.
    pub async fn refresh(&mut self) -> Option<&[Post]> {
        self.posts = self.feed.next().await?;
        Some(&self.posts)
    }

    /// The list as of the last snapshot. Empty means no submissions yet.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn deactivate(self) {
        self.feed.cancel();
        tracing::debug!("Live listing deactivated");
    }
}
