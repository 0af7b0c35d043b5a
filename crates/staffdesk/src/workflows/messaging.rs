//! Outbound messaging seam for published venue profiles and job listings.
//!
//! The core hands the gateway structured content values; turning them into
//! whatever the destination platform renders (embeds, markdown, plain text)
//! is the implementation's concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::identity::{ChannelId, UserId};

/// Reference to a message previously sent through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel: ChannelId,
    pub message: u64,
}

/// Structured payloads the core publishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MessageContent {
    VenueCard(VenueCard),
    JobListing(JobListingCard),
}

/// Snapshot of a venue profile for the shared venue channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueCard {
    pub name: String,
    pub description: Vec<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub discord: Option<String>,
    pub banner_url: Option<String>,
    pub hiring: bool,
    pub tags: Vec<String>,
}

/// Snapshot of a completed job posting for the jobs channels. Only complete
/// postings produce one, so the four required fields are plain values here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobListingCard {
    pub posting_id: String,
    pub venue_name: String,
    pub contact: UserId,
    pub position: String,
    pub kind: &'static str,
    pub description: String,
    pub pay_amount: Option<i64>,
    pub pay_frequency: Option<&'static str>,
    pub pay_details: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Message delivery errors. Delivery faults are transient infrastructure
/// failures from the core's perspective and abort the calling workflow
/// except on the documented best-effort paths.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("channel {0} is not available for delivery")]
    ChannelUnavailable(ChannelId),
    #[error("message send failed: {0}")]
    Send(String),
    #[error("message edit failed: {0}")]
    Edit(String),
    #[error("message delete failed: {0}")]
    Delete(String),
}

/// Messaging collaborator the registries publish through.
pub trait MessageGateway: Send + Sync {
    fn send(&self, channel: ChannelId, content: &MessageContent)
        -> Result<MessageRef, MessageError>;
    fn edit(&self, message: MessageRef, content: &MessageContent) -> Result<(), MessageError>;
    fn delete(&self, message: MessageRef) -> Result<(), MessageError>;
}
