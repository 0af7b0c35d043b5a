use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{JobPosting, PayRate, PostingId};
use crate::workflows::identity::UserId;
use crate::workflows::messaging::MessageRef;
use crate::workflows::venues::VenueId;

/// Read-only posting snapshot for API responses and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct PostingView {
    pub id: PostingId,
    pub venue: VenueId,
    pub contact: UserId,
    pub kind: Option<&'static str>,
    pub position: Option<String>,
    pub description: Option<String>,
    pub pay_rate: Option<PayRate>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<MessageRef>,
}

impl JobPosting {
    pub fn to_view(&self) -> PostingView {
        PostingView {
            id: self.id.clone(),
            venue: self.venue.clone(),
            contact: self.contact,
            kind: self.kind.map(|kind| kind.label()),
            position: self.position.clone(),
            description: self.description.clone(),
            pay_rate: self.pay_rate.clone(),
            start: self.start,
            end: self.end,
            complete: self.complete(),
            published: self.published,
        }
    }
}
