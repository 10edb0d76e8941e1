//! Recording post store used by the workflow tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::domain::{NewPost, Post, PostId, PostPatch, sort_newest_first};
use crate::error::StoreError;
use crate::ports::{PostFeed, PostStore, Subscription};

type Posts = Arc<Mutex<HashMap<PostId, Post>>>;

pub struct RecordingStore {
    posts: Posts,
    changes: broadcast::Sender<()>,
    creates: AtomicUsize,
    updates: AtomicUsize,
    reads: AtomicUsize,
    live: Arc<AtomicUsize>,
    fail_writes: AtomicBool,
}

impl Default for RecordingStore {
    fn default() -> Self {
        Self {
            posts: Arc::default(),
            changes: broadcast::channel(16).0,
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            live: Arc::new(AtomicUsize::new(0)),
            fail_writes: AtomicBool::new(false),
        }
    }
}

impl RecordingStore {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.creates() + self.updates() + self.reads.load(Ordering::SeqCst)
    }

    pub fn live_subscribers(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<Post> {
        sorted(&self.posts)
    }

    pub fn post(&self, id: PostId) -> Option<Post> {
        self.posts.lock().unwrap().get(&id).cloned()
    }

    pub async fn seed_pending(&self, text: &str) -> PostId {
        self.create(NewPost {
            image: "data:image/png;base64,iVBORw0KGgo=".to_string(),
            text: text.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
            created_at: Utc::now(),
        })
        .await
        .unwrap()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Connection("store offline".to_string()));
        }
        Ok(())
    }
}

fn sorted(posts: &Posts) -> Vec<Post> {
    let mut list: Vec<Post> = posts.lock().unwrap().values().cloned().collect();
    sort_newest_first(&mut list);
    list
}

#[async_trait]
impl PostStore for RecordingStore {
    async fn create(&self, post: NewPost) -> Result<PostId, StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;
        let id = Uuid::new_v4();
        self.posts
            .lock()
            .unwrap()
            .insert(id, Post::from_new(id, post));
        let _ = self.changes.send(());
        Ok(id)
    }

    async fn get_by_id(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.post(id))
    }

    async fn update(&self, id: PostId, patch: PostPatch) -> Result<(), StoreError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;
        self.posts
            .lock()
            .unwrap()
            .get_mut(&id)
            .ok_or(StoreError::NotFound)?
            .apply(&patch);
        let _ = self.changes.send(());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot())
    }

    async fn subscribe(&self) -> Result<PostFeed, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel(16);
        let mut changes = self.changes.subscribe();
        let _ = tx.send(self.snapshot()).await;

        let posts = self.posts.clone();
        let task = tokio::spawn(async move {
            while changes.recv().await.is_ok() {
                if tx.send(sorted(&posts)).await.is_err() {
                    break;
                }
            }
        });

        let live = self.live.clone();
        live.fetch_add(1, Ordering::SeqCst);
        Ok(PostFeed::new(
            rx,
            Subscription::new(move || {
                task.abort();
                live.fetch_sub(1, Ordering::SeqCst);
            }),
        ))
    }
}
