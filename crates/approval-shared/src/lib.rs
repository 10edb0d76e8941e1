//! # Approval Shared
//!
//! Wire types shared by the server and its front ends.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
