//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use approval_core::domain::{Decision, DecisionRecord, InconsistentRecord, NewPost, PostStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub image: String,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub date: Date,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to domain Post. Rows whose status and
/// feedback disagree are rejected.
impl TryFrom<Model> for approval_core::domain::Post {
    type Error = InconsistentRecord;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let decision = Decision::try_from(DecisionRecord {
            status: model.status.parse()?,
            feedback: model.feedback,
        })?;

        Ok(Self {
            id: model.id,
            image: model.image,
            text: model.text,
            date: model.date,
            decision,
            created_at: model.created_at.into(),
        })
    }
}

/// Insert model for a freshly created post.
pub fn insert_model(id: Uuid, post: NewPost) -> ActiveModel {
    ActiveModel {
        id: Set(id),
        image: Set(post.image),
        text: Set(post.text),
        date: Set(post.date),
        status: Set(PostStatus::Pending.as_str().to_string()),
        feedback: Set(None),
        created_at: Set(post.created_at.into()),
    }
}
