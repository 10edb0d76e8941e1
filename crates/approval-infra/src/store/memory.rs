//! In-memory post store - used when no database is configured.
//!
//! Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use approval_core::StoreError;
use approval_core::domain::{NewPost, Post, PostId, PostPatch, sort_newest_first};
use approval_core::ports::{PostFeed, PostStore, PubSub};

use super::ChangeFeed;

type Posts = Arc<RwLock<HashMap<PostId, Post>>>;

pub struct InMemoryPostStore {
    posts: Posts,
    changes: ChangeFeed,
}

impl InMemoryPostStore {
    pub fn new(pubsub: Arc<dyn PubSub>) -> Self {
        Self {
            posts: Arc::new(RwLock::new(HashMap::new())),
            changes: ChangeFeed::new(pubsub),
        }
    }
}

async fn snapshot(posts: &Posts) -> Vec<Post> {
    let mut list: Vec<Post> = posts.read().await.values().cloned().collect();
    sort_newest_first(&mut list);
    list
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn create(&self, post: NewPost) -> Result<PostId, StoreError> {
        let id = Uuid::new_v4();
        self.posts
            .write()
            .await
            .insert(id, Post::from_new(id, post));

        tracing::debug!(post_id = %id, "Post created");
        self.changes.notify(id).await;
        Ok(id)
    }

    async fn get_by_id(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn update(&self, id: PostId, patch: PostPatch) -> Result<(), StoreError> {
        {
            let mut posts = self.posts.write().await;
            let post = posts.get_mut(&id).ok_or(StoreError::NotFound)?;
            post.apply(&patch);
        }

        tracing::debug!(post_id = %id, status = %patch.status(), "Post updated");
        self.changes.notify(id).await;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        Ok(snapshot(&self.posts).await)
    }

    async fn subscribe(&self) -> Result<PostFeed, StoreError> {
        let posts = self.posts.clone();
        self.changes
            .watch(move || {
                let posts = posts.clone();
                async move { Ok(snapshot(&posts).await) }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pubsub::InMemoryPubSub;
    use crate::store::POSTS_CHANNEL;
    use approval_core::domain::{FeedbackText, PostStatus};
    use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
    use std::time::Duration;

    fn new_post(text: &str, age_minutes: i64) -> NewPost {
        NewPost {
            image: "data:image/webp;base64,UklGRg==".to_string(),
            text: text.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 30).unwrap(),
            created_at: Utc::now() - ChronoDuration::minutes(age_minutes),
        }
    }

    async fn next(feed: &mut PostFeed) -> Vec<Post> {
        tokio::time::timeout(Duration::from_secs(1), feed.next())
            .await
            .expect("snapshot in time")
            .expect("feed open")
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = InMemoryPostStore::new(Arc::new(InMemoryPubSub::default()));
        let id = store.create(new_post("hello", 0)).await.unwrap();

        let post = store.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(post.id, id);
        assert_eq!(post.status(), PostStatus::Pending);
        assert!(store.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_merges_decision() {
        let store = InMemoryPostStore::new(Arc::new(InMemoryPubSub::default()));
        let id = store.create(new_post("hello", 0)).await.unwrap();

        let text = FeedbackText::new("Use the blue logo").unwrap();
        store.update(id, PostPatch::Feedback(text)).await.unwrap();
        store.update(id, PostPatch::Approve).await.unwrap();

        let post = store.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(post.status(), PostStatus::Approved);
        assert_eq!(post.feedback(), Some("Use the blue logo"));
        assert_eq!(post.text, "hello");
    }

    #[tokio::test]
    async fn update_of_missing_post_fails() {
        let store = InMemoryPostStore::new(Arc::new(InMemoryPubSub::default()));
        let result = store.update(Uuid::new_v4(), PostPatch::Approve).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = InMemoryPostStore::new(Arc::new(InMemoryPubSub::default()));
        let old = store.create(new_post("old", 30)).await.unwrap();
        let new = store.create(new_post("new", 1)).await.unwrap();
        let mid = store.create(new_post("mid", 10)).await.unwrap();

        let ids: Vec<PostId> = store.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![new, mid, old]);
    }

    #[tokio::test]
    async fn subscription_pushes_full_list_on_every_change() {
        let store = InMemoryPostStore::new(Arc::new(InMemoryPubSub::default()));
        let first = store.create(new_post("first", 5)).await.unwrap();

        let mut feed = store.subscribe().await.unwrap();
        assert_eq!(next(&mut feed).await.len(), 1);

        let second = store.create(new_post("second", 0)).await.unwrap();
        let posts = next(&mut feed).await;
        assert_eq!(posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![second, first]);

        store.update(first, PostPatch::Approve).await.unwrap();
        let posts = next(&mut feed).await;
        assert_eq!(posts[1].status(), PostStatus::Approved);
    }

    #[tokio::test]
    async fn empty_store_yields_empty_snapshot() {
        let store = InMemoryPostStore::new(Arc::new(InMemoryPubSub::default()));
        let mut feed = store.subscribe().await.unwrap();
        assert!(next(&mut feed).await.is_empty());
    }

    #[tokio::test]
    async fn dropping_feed_releases_channel_subscription() {
        let pubsub = Arc::new(InMemoryPubSub::default());
        let store = InMemoryPostStore::new(pubsub.clone());

        let feed = store.subscribe().await.unwrap();
        assert_eq!(pubsub.subscriber_count(POSTS_CHANNEL).await, 1);

        drop(feed);
        // Aborted listener tasks release their receivers once rescheduled.
        for _ in 0..10 {
            if pubsub.subscriber_count(POSTS_CHANNEL).await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(pubsub.subscriber_count(POSTS_CHANNEL).await, 0);
    }
}
