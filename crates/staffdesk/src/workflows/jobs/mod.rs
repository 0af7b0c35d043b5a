//! Job posting drafting, completeness gating, and listing publication.
//!
//! Postings are drafted incomplete, filled field by field, and may only be
//! published once every required field is set. Published listings route to
//! a destination channel by posting kind and are edited in place on
//! republish.

pub mod domain;
pub mod registry;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{JobPosting, JobsError, PayRate, PostingId, PostingKind, RateFrequency};
pub use registry::{JobPostingRegistry, PostingChannels, PublishOutcome};
pub use store::{PostingStore, StoreError};
pub use views::PostingView;
