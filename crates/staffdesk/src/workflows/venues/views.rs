use serde::Serialize;

use super::domain::{Venue, VenueId};
use crate::workflows::identity::UserId;
use crate::workflows::messaging::MessageRef;

/// Read-only venue snapshot for API responses and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct VenueView {
    pub id: VenueId,
    pub name: String,
    pub pending: bool,
    pub authorized_users: Vec<UserId>,
    pub description: Vec<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub discord: Option<String>,
    pub hiring: bool,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted: Option<MessageRef>,
}

impl Venue {
    pub fn to_view(&self) -> VenueView {
        VenueView {
            id: self.id.clone(),
            name: self.name.clone(),
            pending: self.pending,
            authorized_users: self.authorized_users.clone(),
            description: self.profile.description.clone(),
            location: self.profile.location.clone(),
            website: self.profile.website.clone(),
            discord: self.profile.discord.clone(),
            hiring: self.profile.hiring,
            tags: self.profile.tags.clone(),
            posted: self.posted,
        }
    }
}
