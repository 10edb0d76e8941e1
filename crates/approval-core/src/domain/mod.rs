//! Domain entities - the core business objects.

mod draft;
mod post;

pub use draft::PostDraft;
pub use post::{
    Decision, DecisionRecord, FeedbackText, InconsistentRecord, NewPost, Post, PostId, PostPatch,
    PostStatus, sort_newest_first,
};
