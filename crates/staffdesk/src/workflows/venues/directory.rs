use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::identity::UserId;

/// Listing as returned by the upstream venue directory.
///
/// The upstream service is the authority on these fields; an import copies
/// them wholesale onto the local venue profile. Manager ids come straight
/// from the upstream listing and may reference users this community cannot
/// resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalVenueRecord {
    pub external_id: String,
    pub name: String,
    pub banner_url: Option<String>,
    pub added: Option<DateTime<Utc>>,
    pub description: Vec<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub discord: Option<String>,
    pub hiring: bool,
    pub sfw: bool,
    pub tags: Vec<String>,
    pub managers: Vec<UserId>,
    pub modified: Option<DateTime<Utc>>,
}

/// Read-only client for the external venue directory.
pub trait VenueDirectory: Send + Sync {
    fn venues_managed_by(&self, user: UserId) -> Result<Vec<ExternalVenueRecord>, DirectoryError>;
}

/// External directory failures. Always transport-level; an empty result is
/// a successful lookup, not an error.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("external venue directory unavailable: {0}")]
    Unavailable(String),
}
