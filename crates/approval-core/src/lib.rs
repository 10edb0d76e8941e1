//! # Approval Core
//!
//! The domain layer of the approval service: the post model and its
//! review state machine, the ports infrastructure must implement, and the
//! submission, review and live-listing workflows built on top of them.
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod workflow;

pub use error::{DomainError, StoreError};
