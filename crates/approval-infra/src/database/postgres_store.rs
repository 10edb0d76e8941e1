//! PostgreSQL post store.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder, UpdateMany};
use uuid::Uuid;

use approval_core::StoreError;
use approval_core::domain::{NewPost, Post, PostId, PostPatch};
use approval_core::ports::{PostFeed, PostStore, PubSub};

use super::entity::post::{self, Entity as PostEntity};
use crate::store::ChangeFeed;

pub struct PostgresPostStore {
    db: Arc<DbConn>,
    changes: ChangeFeed,
}

impl PostgresPostStore {
    pub fn new(db: DbConn, pubsub: Arc<dyn PubSub>) -> Self {
        Self {
            db: Arc::new(db),
            changes: ChangeFeed::new(pubsub),
        }
    }
}

fn query_error(e: DbErr) -> StoreError {
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => StoreError::Connection(e.to_string()),
        other => StoreError::Query(other.to_string()),
    }
}

fn to_domain(model: post::Model) -> Result<Post, StoreError> {
    let id = model.id;
    Post::try_from(model).map_err(|e| {
        tracing::error!(post_id = %id, error = %e, "Corrupt post row");
        StoreError::Corrupt(e.to_string())
    })
}

async fn list_posts(db: &DbConn) -> Result<Vec<Post>, StoreError> {
    PostEntity::find()
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
        .all(db)
        .await
        .map_err(query_error)?
        .into_iter()
        .map(to_domain)
        .collect()
}

/// `UPDATE posts SET ...` touching only the columns the patch sets.
pub(crate) fn update_statement(id: PostId, patch: &PostPatch) -> UpdateMany<PostEntity> {
    let update = PostEntity::update_many()
        .col_expr(post::Column::Status, Expr::value(patch.status().as_str()))
        .filter(post::Column::Id.eq(id));
    // Approval leaves the feedback column as it was.
    match patch {
        PostPatch::Approve => update,
        PostPatch::Feedback(text) => {
            update.col_expr(post::Column::Feedback, Expr::value(text.as_str()))
        }
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn create(&self, new_post: NewPost) -> Result<PostId, StoreError> {
        let id = Uuid::new_v4();
        PostEntity::insert(post::insert_model(id, new_post))
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(query_error)?;

        tracing::debug!(post_id = %id, "Post created");
        self.changes.notify(id).await;
        Ok(id)
    }

    async fn get_by_id(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        PostEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(query_error)?
            .map(to_domain)
            .transpose()
    }

    async fn update(&self, id: PostId, patch: PostPatch) -> Result<(), StoreError> {
        let result = update_statement(id, &patch)
            .exec(self.db.as_ref())
            .await
            .map_err(query_error)?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        tracing::debug!(post_id = %id, status = %patch.status(), "Post updated");
        self.changes.notify(id).await;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        list_posts(&self.db).await
    }

    async fn subscribe(&self) -> Result<PostFeed, StoreError> {
        let db = self.db.clone();
        self.changes
            .watch(move || {
                let db = db.clone();
                async move { list_posts(&db).await }
            })
            .await
    }
}
