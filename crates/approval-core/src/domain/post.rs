use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Opaque post identifier assigned by the store.
pub type PostId = Uuid;

/// Post entity - a piece of content submitted for client approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    /// Image as a `data:image/...;base64,` URI.
    pub image: String,
    pub text: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub decision: Decision,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Materialize a stored post from its creation payload.
    pub fn from_new(id: PostId, new: NewPost) -> Self {
        Self {
            id,
            image: new.image,
            text: new.text,
            date: new.date,
            decision: Decision::Pending,
            created_at: new.created_at,
        }
    }

    pub fn status(&self) -> PostStatus {
        self.decision.status()
    }

    /// Feedback text, if any was ever left.
    pub fn feedback(&self) -> Option<&str> {
        self.decision.feedback().map(FeedbackText::as_str)
    }

    /// Fails unless the post is still awaiting a decision.
    pub fn ensure_pending(&self) -> Result<(), DomainError> {
        match self.decision {
            Decision::Pending => Ok(()),
            _ => Err(DomainError::AlreadyDecided {
                id: self.id,
                status: self.status(),
            }),
        }
    }

    /// Apply a patch locally, mirroring what the store does.
    pub fn apply(&mut self, patch: &PostPatch) {
        self.decision = self.decision.merge(patch);
    }
}

/// Payload for creating a post. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub image: String,
    pub text: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Review state of a post.
///
/// Serialized as the flat `status`/`feedback` pair; pairs that break the
/// review invariants fail to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DecisionRecord", into = "DecisionRecord")]
pub enum Decision {
    Pending,
    /// Approval keeps whatever feedback was stored before it.
    Approved { feedback: Option<FeedbackText> },
    Feedback(FeedbackText),
}

impl Decision {
    pub fn status(&self) -> PostStatus {
        match self {
            Decision::Pending => PostStatus::Pending,
            Decision::Approved { .. } => PostStatus::Approved,
            Decision::Feedback(_) => PostStatus::Feedback,
        }
    }

    pub fn feedback(&self) -> Option<&FeedbackText> {
        match self {
            Decision::Pending => None,
            Decision::Approved { feedback } => feedback.as_ref(),
            Decision::Feedback(text) => Some(text),
        }
    }

    /// Merge a partial update into this state.
    pub fn merge(&self, patch: &PostPatch) -> Decision {
        match patch {
            PostPatch::Approve => Decision::Approved {
                feedback: self.feedback().cloned(),
            },
            PostPatch::Feedback(text) => Decision::Feedback(text.clone()),
        }
    }
}

/// Partial update accepted by the store's `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostPatch {
    /// `{status: approved}`; feedback is left untouched.
    Approve,
    /// `{status: feedback, feedback: text}`.
    Feedback(FeedbackText),
}

impl PostPatch {
    pub fn status(&self) -> PostStatus {
        match self {
            PostPatch::Approve => PostStatus::Approved,
            PostPatch::Feedback(_) => PostStatus::Feedback,
        }
    }
}

/// Non-blank feedback text, stored exactly as the client typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackText(String);

impl FeedbackText {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::invalid("feedback must not be empty"));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FeedbackText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire and storage value of the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Pending,
    Approved,
    Feedback,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Pending => "pending",
            PostStatus::Approved => "approved",
            PostStatus::Feedback => "feedback",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = InconsistentRecord;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PostStatus::Pending),
            "approved" => Ok(PostStatus::Approved),
            "feedback" => Ok(PostStatus::Feedback),
            other => Err(InconsistentRecord(format!("unknown status '{other}'"))),
        }
    }
}

/// Flat `status`/`feedback` pair as persisted and sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub status: PostStatus,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// A stored status/feedback pair that no workflow could have produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("inconsistent post record: {0}")]
pub struct InconsistentRecord(pub String);

impl TryFrom<DecisionRecord> for Decision {
    type Error = InconsistentRecord;

    fn try_from(record: DecisionRecord) -> Result<Self, Self::Error> {
        let feedback = record
            .feedback
            .map(|text| {
                FeedbackText::new(text)
                    .map_err(|_| InconsistentRecord("blank feedback text".to_string()))
            })
            .transpose()?;

        match (record.status, feedback) {
            (PostStatus::Pending, None) => Ok(Decision::Pending),
            (PostStatus::Pending, Some(_)) => Err(InconsistentRecord(
                "pending post carries feedback".to_string(),
            )),
            (PostStatus::Approved, feedback) => Ok(Decision::Approved { feedback }),
            (PostStatus::Feedback, Some(text)) => Ok(Decision::Feedback(text)),
            (PostStatus::Feedback, None) => Err(InconsistentRecord(
                "feedback status without feedback text".to_string(),
            )),
        }
    }
}

impl From<Decision> for DecisionRecord {
    fn from(decision: Decision) -> Self {
        let status = decision.status();
        let feedback = match decision {
            Decision::Pending => None,
            Decision::Approved { feedback } => feedback.map(FeedbackText::into_inner),
            Decision::Feedback(text) => Some(text.into_inner()),
        };
        Self { status, feedback }
    }
}

/// Order posts newest first; ties fall back to the id so snapshots are stable.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
