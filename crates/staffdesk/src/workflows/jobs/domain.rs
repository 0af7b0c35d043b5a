use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::store::StoreError;
use crate::workflows::identity::UserId;
use crate::workflows::messaging::{JobListingCard, MessageError, MessageRef};
use crate::workflows::venues::VenueId;

/// Opaque posting identifier assigned by the store at insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostingId(pub String);

impl fmt::Display for PostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the role is a one-off engagement or an ongoing position. Routes
/// the published listing to its destination channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingKind {
    Temporary,
    Permanent,
}

impl PostingKind {
    pub fn label(&self) -> &'static str {
        match self {
            PostingKind::Temporary => "temporary",
            PostingKind::Permanent => "permanent",
        }
    }
}

/// Unit the offered amount is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateFrequency {
    PerHour,
    PerShift,
    PerEvent,
    Flat,
}

impl RateFrequency {
    pub fn label(&self) -> &'static str {
        match self {
            RateFrequency::PerHour => "per hour",
            RateFrequency::PerShift => "per shift",
            RateFrequency::PerEvent => "per event",
            RateFrequency::Flat => "flat rate",
        }
    }
}

/// Compensation offer. Every field is optional; setting the rate at all is
/// what counts toward posting completeness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRate {
    pub amount: Option<i64>,
    pub frequency: Option<RateFrequency>,
    pub details: Option<String>,
}

/// One job posting draft owned by a venue.
///
/// `venue` and `contact` are fixed at creation. The four required fields
/// start unset; `complete` gates publication on all of them. Schedule
/// fields never gate anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: PostingId,
    pub venue: VenueId,
    pub contact: UserId,
    pub description: Option<String>,
    pub kind: Option<PostingKind>,
    pub position: Option<String>,
    pub pay_rate: Option<PayRate>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub published: Option<MessageRef>,
}

impl JobPosting {
    pub fn new(id: PostingId, venue: VenueId, contact: UserId) -> Self {
        Self {
            id,
            venue,
            contact,
            description: None,
            kind: None,
            position: None,
            pay_rate: None,
            start: None,
            end: None,
            published: None,
        }
    }

    /// True once kind, position, pay rate, and description are all set.
    pub fn complete(&self) -> bool {
        self.kind.is_some()
            && self.position.is_some()
            && self.pay_rate.is_some()
            && self.description.is_some()
    }

    /// Listing snapshot for the jobs channels, or `None` while the posting
    /// is incomplete.
    pub(crate) fn listing_card(&self, venue_name: &str) -> Option<JobListingCard> {
        let kind = self.kind?;
        let position = self.position.clone()?;
        let pay = self.pay_rate.clone()?;
        let description = self.description.clone()?;

        Some(JobListingCard {
            posting_id: self.id.0.clone(),
            venue_name: venue_name.to_string(),
            contact: self.contact,
            position,
            kind: kind.label(),
            description,
            pay_amount: pay.amount,
            pay_frequency: pay.frequency.map(|frequency| frequency.label()),
            pay_details: pay.details,
            start: self.start,
            end: self.end,
        })
    }
}

/// Policy violations and collaborator faults raised by posting workflows.
#[derive(Debug, thiserror::Error)]
pub enum JobsError {
    #[error("job posting '{0}' was not found")]
    NotFound(PostingId),
    #[error("a job posting with id '{0}' already exists")]
    DuplicateId(PostingId),
    #[error("venue '{0}' was not found for this posting")]
    VenueNotFound(String),
    #[error("the posting is missing required fields and cannot be published")]
    PostingNotComplete,
    #[error("no destination channel is configured for {} postings", .0.label())]
    ChannelUnset(PostingKind),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Messaging(#[from] MessageError),
}
