//! Agency-side submission: validate, create, hand back a shareable link.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};

use crate::domain::{Post, PostDraft, PostId};
use crate::error::DomainError;
use crate::ports::PostStore;

/// Path segment under which clients open a post for review.
pub const CLIENT_PATH: &str = "client";

/// Build `<origin>/client/<id>`.
pub fn share_link(origin: &str, id: PostId) -> String {
    format!("{}/{}/{}", origin.trim_end_matches('/'), CLIENT_PATH, id)
}

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct Submitted {
    pub post: Post,
    pub link: String,
}

#[derive(Clone)]
pub struct SubmissionWorkflow {
    store: Arc<dyn PostStore>,
}

impl SubmissionWorkflow {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// Create a pending post from the draft. Nothing reaches the store when
    /// validation fails.
    pub async fn submit(&self, draft: PostDraft, origin: &str) -> Result<Submitted, DomainError> {
        // Microseconds: what a timestamptz column keeps.
        let new_post = draft.validate(Utc::now().trunc_subsecs(6))?;

        let id = self.store.create(new_post.clone()).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to save post");
            e
        })?;

        let post = Post::from_new(id, new_post);
        let link = share_link(origin, id);
        tracing::info!(post_id = %id, "Post submitted for approval");

        Ok(Submitted { post, link })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostStatus;
    use crate::workflow::fake::RecordingStore;

    const IMAGE: &str = "data:image/png;base64,iVBORw0KGgo=";

    #[test]
    fn link_joins_origin_and_id() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(
            share_link("https://studio.example/", id),
            format!("https://studio.example/client/{id}")
        );
    }

    #[tokio::test]
    async fn submit_creates_one_pending_post() {
        let store = Arc::new(RecordingStore::default());
        let workflow = SubmissionWorkflow::new(store.clone());

        let submitted = workflow
            .submit(
                PostDraft::new(IMAGE, "New collection", "2026-11-20"),
                "http://localhost:5173",
            )
            .await
            .unwrap();

        assert_eq!(store.creates(), 1);
        let stored = store.snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, submitted.post.id);
        assert_eq!(stored[0].status(), PostStatus::Pending);
        assert_eq!(stored[0].feedback(), None);
        assert!(submitted.link.ends_with(&submitted.post.id.to_string()));
        assert!(submitted.link.starts_with("http://localhost:5173/client/"));
    }

    #[tokio::test]
    async fn created_at_survives_a_microsecond_store() {
        let store = Arc::new(RecordingStore::default());
        let workflow = SubmissionWorkflow::new(store.clone());

        let submitted = workflow
            .submit(PostDraft::new(IMAGE, "caption", "2026-11-20"), "http://localhost")
            .await
            .unwrap();

        let created_at = submitted.post.created_at;
        assert_eq!(created_at, created_at.trunc_subsecs(6));
        assert_eq!(store.post(submitted.post.id).unwrap().created_at, created_at);
    }

    #[tokio::test]
    async fn missing_fields_never_reach_the_store() {
        let store = Arc::new(RecordingStore::default());
        let workflow = SubmissionWorkflow::new(store.clone());

        for draft in [
            PostDraft {
                image: None,
                ..PostDraft::new(IMAGE, "caption", "2026-11-20")
            },
            PostDraft {
                text: None,
                ..PostDraft::new(IMAGE, "caption", "2026-11-20")
            },
            PostDraft {
                date: None,
                ..PostDraft::new(IMAGE, "caption", "2026-11-20")
            },
        ] {
            let result = workflow.submit(draft, "http://localhost").await;
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }

        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn store_failure_is_reported_without_partial_state() {
        let store = Arc::new(RecordingStore::default());
        store.fail_writes(true);
        let workflow = SubmissionWorkflow::new(store.clone());

        let result = workflow
            .submit(PostDraft::new(IMAGE, "caption", "2026-11-20"), "http://localhost")
            .await;

        assert!(matches!(result, Err(DomainError::Store(_))));
        assert!(store.snapshot().is_empty());
    }
}
