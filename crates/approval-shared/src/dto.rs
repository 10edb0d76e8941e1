//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to submit a post for approval.
///
/// Fields are optional so that missing input is reported as a validation
/// failure listing every absent field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitPostRequest {
    /// `data:image/...;base64,...` URI.
    pub image: Option<String>,
    pub text: Option<String>,
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// Request to leave feedback on a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub feedback: Option<String>,
}

/// A post as shown to the agency and to the reviewing client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub image: String,
    pub text: String,
    pub date: NaiveDate,
    /// `pending`, `approved` or `feedback`.
    pub status: String,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response to a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedResponse {
    pub post: PostResponse,
    /// Shareable `<origin>/client/<id>` link for the client.
    pub link: String,
}

/// Response to a recorded approval or feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub post: PostResponse,
    pub message: String,
}
