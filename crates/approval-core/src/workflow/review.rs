//! Client-side review of a single post reached through its shareable link.

use std::sync::Arc;

use crate::domain::{FeedbackText, Post, PostId, PostPatch};
use crate::error::{DomainError, StoreError};
use crate::ports::PostStore;

/// Result of resolving a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewView {
    Found(Post),
    NotFound,
}

/// Confirmation shown to the reviewer after a decision is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Approved,
    FeedbackSent,
}

impl Confirmation {
    pub fn message(&self) -> &'static str {
        match self {
            Confirmation::Approved => "Content approved. The agency was notified.",
            Confirmation::FeedbackSent => "Feedback sent. The agency was notified.",
        }
    }
}

/// A recorded decision and the post as it now stands.
#[derive(Debug, Clone)]
pub struct Reviewed {
    pub post: Post,
    pub confirmation: Confirmation,
}

#[derive(Clone)]
pub struct ReviewWorkflow {
    store: Arc<dyn PostStore>,
}

impl ReviewWorkflow {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self, id: PostId) -> Result<ReviewView, DomainError> {
        let post = self.store.get_by_id(id).await.map_err(|e| {
            tracing::error!(post_id = %id, error = %e, "Failed to load post");
            e
        })?;

        Ok(match post {
            Some(post) => ReviewView::Found(post),
            None => {
                tracing::debug!(post_id = %id, "Post not found");
                ReviewView::NotFound
            }
        })
    }

    /// `pending → approved`.
    pub async fn approve(&self, id: PostId) -> Result<Reviewed, DomainError> {
        self.decide(id, PostPatch::Approve, Confirmation::Approved)
            .await
    }

    /// `pending → feedback`. Blank text is rejected before the store is touched.
    pub async fn submit_feedback(&self, id: PostId, text: &str) -> Result<Reviewed, DomainError> {
        let text = FeedbackText::new(text)?;
        self.decide(id, PostPatch::Feedback(text), Confirmation::FeedbackSent)
            .await
    }

    async fn decide(
        &self,
        id: PostId,
        patch: PostPatch,
        confirmation: Confirmation,
    ) -> Result<Reviewed, DomainError> {
        let mut post = match self.load(id).await? {
            ReviewView::Found(post) => post,
            ReviewView::NotFound => return Err(DomainError::NotFound { id }),
        };

        // Read-then-write: a concurrent decision on the same post still wins
        // if it lands between the two calls.
        post.ensure_pending()?;

        match self.store.update(id, patch.clone()).await {
            Ok(()) => {}
            Err(StoreError::NotFound) => return Err(DomainError::NotFound { id }),
            Err(e) => {
                tracing::error!(
                    post_id = %id,
                    status = %patch.status(),
                    error = %e,
                    "Failed to record decision"
                );
                return Err(e.into());
            }
        }

        post.apply(&patch);
        tracing::info!(post_id = %id, status = %post.status(), "Decision recorded");

        Ok(Reviewed { post, confirmation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostStatus;
    use crate::workflow::fake::RecordingStore;

    async fn store_with_pending() -> (Arc<RecordingStore>, PostId) {
        let store = Arc::new(RecordingStore::default());
        let id = store.seed_pending("Black Friday teaser").await;
        (store, id)
    }

    #[tokio::test]
    async fn load_resolves_existing_post() {
        let (store, id) = store_with_pending().await;
        let workflow = ReviewWorkflow::new(store);

        match workflow.load(id).await.unwrap() {
            ReviewView::Found(post) => assert_eq!(post.text, "Black Friday teaser"),
            ReviewView::NotFound => panic!("post should exist"),
        }
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = Arc::new(RecordingStore::default());
        let workflow = ReviewWorkflow::new(store);
        let id = uuid::Uuid::new_v4();

        assert_eq!(workflow.load(id).await.unwrap(), ReviewView::NotFound);
        assert!(matches!(
            workflow.approve(id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn approve_moves_pending_to_approved() {
        let (store, id) = store_with_pending().await;
        let workflow = ReviewWorkflow::new(store.clone());

        let reviewed = workflow.approve(id).await.unwrap();

        assert_eq!(reviewed.confirmation, Confirmation::Approved);
        assert_eq!(reviewed.post.status(), PostStatus::Approved);
        assert_eq!(reviewed.post.feedback(), None);
        assert_eq!(store.post(id).unwrap().status(), PostStatus::Approved);
    }

    #[tokio::test]
    async fn feedback_is_recorded_verbatim() {
        let (store, id) = store_with_pending().await;
        let workflow = ReviewWorkflow::new(store.clone());

        let reviewed = workflow
            .submit_feedback(id, "Please change the color")
            .await
            .unwrap();

        assert_eq!(reviewed.confirmation, Confirmation::FeedbackSent);
        let stored = store.post(id).unwrap();
        assert_eq!(stored.status(), PostStatus::Feedback);
        assert_eq!(stored.feedback(), Some("Please change the color"));
    }

    #[tokio::test]
    async fn blank_feedback_leaves_post_pending() {
        let (store, id) = store_with_pending().await;
        let workflow = ReviewWorkflow::new(store.clone());
        let calls_before = store.calls();

        for text in ["", "   ", "\n\t"] {
            assert!(matches!(
                workflow.submit_feedback(id, text).await,
                Err(DomainError::Validation(_))
            ));
        }

        assert_eq!(store.calls(), calls_before);
        assert_eq!(store.post(id).unwrap().status(), PostStatus::Pending);
    }

    #[tokio::test]
    async fn decided_posts_reject_further_decisions() {
        let (store, id) = store_with_pending().await;
        let workflow = ReviewWorkflow::new(store.clone());
        workflow.approve(id).await.unwrap();
        let updates_before = store.updates();

        assert!(matches!(
            workflow.approve(id).await,
            Err(DomainError::AlreadyDecided {
                status: PostStatus::Approved,
                ..
            })
        ));
        assert!(matches!(
            workflow.submit_feedback(id, "late note").await,
            Err(DomainError::AlreadyDecided { .. })
        ));
        assert_eq!(store.updates(), updates_before);
    }

    #[tokio::test]
    async fn failed_update_keeps_post_pending() {
        let (store, id) = store_with_pending().await;
        store.fail_writes(true);
        let workflow = ReviewWorkflow::new(store.clone());

        assert!(matches!(
            workflow.approve(id).await,
            Err(DomainError::Store(_))
        ));
        assert_eq!(store.post(id).unwrap().status(), PostStatus::Pending);
    }
}
