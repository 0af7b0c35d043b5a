use super::domain::{Venue, VenueId};
use crate::workflows::identity::ChannelId;

/// Persistence seam for the venue collection and the shared post channel.
///
/// Identifiers are assigned by the store at insert; the registry never
/// invents them. Calls are synchronous and failures are fatal to the
/// triggering operation, there is no retry layer in the core.
pub trait VenueStore: Send + Sync {
    /// Persists a new venue shell and returns the identifier it was assigned.
    fn insert(&self, name: &str) -> Result<VenueId, StoreError>;
    fn update(&self, venue: &Venue) -> Result<(), StoreError>;
    fn delete(&self, id: &VenueId) -> Result<(), StoreError>;
    fn set_post_channel(&self, channel: Option<ChannelId>) -> Result<(), StoreError>;
}

/// Error enumeration for persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
