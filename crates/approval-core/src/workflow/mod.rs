//! Workflows - the operations the agency and the client perform.

mod listing;
mod review;
mod submission;

#[cfg(test)]
pub(crate) mod fake;

pub use listing::{ListingSession, LiveListing};
pub use review::{Confirmation, ReviewView, ReviewWorkflow, Reviewed};
pub use submission::{CLIENT_PATH, SubmissionWorkflow, Submitted, share_link};
