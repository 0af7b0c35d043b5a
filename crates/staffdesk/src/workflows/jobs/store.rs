use super::domain::{JobPosting, PostingId};
use crate::workflows::identity::UserId;
use crate::workflows::venues::VenueId;

/// Persistence seam for the posting collection.
///
/// Identifiers are assigned by the store at insert, same contract as the
/// venue store: synchronous calls, failures fatal to the triggering
/// operation.
pub trait PostingStore: Send + Sync {
    /// Persists a new draft shell and returns the identifier it was assigned.
    fn insert(&self, venue: &VenueId, contact: UserId) -> Result<PostingId, StoreError>;
    fn update(&self, posting: &JobPosting) -> Result<(), StoreError>;
    fn delete(&self, id: &PostingId) -> Result<(), StoreError>;
}

/// Error enumeration for persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
