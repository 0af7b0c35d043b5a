use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{JobPosting, JobsError, PayRate, PostingId, PostingKind};
use super::store::PostingStore;
use super::views::PostingView;
use crate::workflows::identity::{ChannelId, UserId};
use crate::workflows::messaging::{MessageContent, MessageGateway};
use crate::workflows::venues::VenueId;

/// Destination channels for published listings, one per posting kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostingChannels {
    pub temporary: Option<ChannelId>,
    pub permanent: Option<ChannelId>,
}

impl PostingChannels {
    pub fn for_kind(&self, kind: PostingKind) -> Option<ChannelId> {
        match kind {
            PostingKind::Temporary => self.temporary,
            PostingKind::Permanent => self.permanent,
        }
    }
}

/// Outcome reported by [`JobPostingRegistry::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A fresh listing message was sent.
    Posted,
    /// The existing listing message was edited in place.
    Updated,
}

impl PublishOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            PublishOutcome::Posted => "posted",
            PublishOutcome::Updated => "updated",
        }
    }
}

/// Single source of truth for one community's job postings.
///
/// Owns the live posting collection. Setters mutate and persist in one
/// step; publication is gated on completeness and routed by kind.
pub struct JobPostingRegistry {
    postings: Vec<JobPosting>,
    store: Arc<dyn PostingStore>,
    messaging: Arc<dyn MessageGateway>,
}

impl JobPostingRegistry {
    pub fn new(store: Arc<dyn PostingStore>, messaging: Arc<dyn MessageGateway>) -> Self {
        Self {
            postings: Vec::new(),
            store,
            messaging,
        }
    }

    /// Hydrates the collection from persisted records. Identifier collisions
    /// are rejected rather than silently keeping either record.
    pub fn load(&mut self, records: Vec<JobPosting>) -> Result<(), JobsError> {
        for record in records {
            if self.postings.iter().any(|posting| posting.id == record.id) {
                return Err(JobsError::DuplicateId(record.id));
            }
            self.postings.push(record);
        }
        Ok(())
    }

    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    pub fn get(&self, id: &PostingId) -> Option<&JobPosting> {
        self.postings.iter().find(|posting| &posting.id == id)
    }

    /// Persists a new draft posting for `venue` and appends it. The draft
    /// starts with every required field unset.
    pub fn create(&mut self, venue: VenueId, contact: UserId) -> Result<PostingView, JobsError> {
        let id = self.store.insert(&venue, contact)?;
        let posting = JobPosting::new(id, venue, contact);
        info!(posting = %posting.id, venue = %posting.venue, "job posting drafted");

        let view = posting.to_view();
        self.postings.push(posting);
        Ok(view)
    }

    pub fn set_description(
        &mut self,
        id: &PostingId,
        description: String,
    ) -> Result<(), JobsError> {
        self.mutate(id, |posting| posting.description = Some(description))
    }

    pub fn set_kind(&mut self, id: &PostingId, kind: PostingKind) -> Result<(), JobsError> {
        self.mutate(id, |posting| posting.kind = Some(kind))
    }

    pub fn set_position(&mut self, id: &PostingId, position: String) -> Result<(), JobsError> {
        self.mutate(id, |posting| posting.position = Some(position))
    }

    pub fn set_pay_rate(&mut self, id: &PostingId, pay_rate: PayRate) -> Result<(), JobsError> {
        self.mutate(id, |posting| posting.pay_rate = Some(pay_rate))
    }

    /// Schedule fields may be cleared again; they never gate completeness.
    pub fn set_start(
        &mut self,
        id: &PostingId,
        start: Option<DateTime<Utc>>,
    ) -> Result<(), JobsError> {
        self.mutate(id, |posting| posting.start = start)
    }

    pub fn set_end(&mut self, id: &PostingId, end: Option<DateTime<Utc>>) -> Result<(), JobsError> {
        self.mutate(id, |posting| posting.end = end)
    }

    /// Publishes the listing for a complete posting. A previously published
    /// message is edited in place without consulting the channel map; when
    /// the edit fails the stale reference is cleared and persisted before
    /// falling through to a fresh send. A fresh send requires a destination
    /// channel for the posting's kind and records the new reference only
    /// after the send succeeds.
    pub fn publish(
        &mut self,
        id: &PostingId,
        venue_name: &str,
        channels: PostingChannels,
    ) -> Result<PublishOutcome, JobsError> {
        let posting = find_mut(&mut self.postings, id)
            .ok_or_else(|| JobsError::NotFound(id.clone()))?;

        let Some(kind) = posting.kind else {
            return Err(JobsError::PostingNotComplete);
        };
        let card = posting
            .listing_card(venue_name)
            .ok_or(JobsError::PostingNotComplete)?;
        let content = MessageContent::JobListing(card);

        if let Some(existing) = posting.published {
            match self.messaging.edit(existing, &content) {
                Ok(()) => return Ok(PublishOutcome::Updated),
                Err(err) => {
                    warn!(posting = %posting.id, error = %err, "existing listing message is stale, sending a fresh one");
                    posting.published = None;
                    self.store.update(posting)?;
                }
            }
        }

        let channel = channels
            .for_kind(kind)
            .ok_or(JobsError::ChannelUnset(kind))?;
        let sent = self.messaging.send(channel, &content)?;
        posting.published = Some(sent);
        self.store.update(posting)?;
        info!(posting = %posting.id, channel = %channel, "job listing published");
        Ok(PublishOutcome::Posted)
    }

    /// Deletes a posting: best-effort retraction of any published message,
    /// then the durable delete, then removal from the live collection. A
    /// failed retraction is logged and does not block the delete.
    pub fn delete(&mut self, id: &PostingId) -> Result<(), JobsError> {
        let index = self
            .postings
            .iter()
            .position(|posting| &posting.id == id)
            .ok_or_else(|| JobsError::NotFound(id.clone()))?;

        if let Some(published) = self.postings[index].published {
            if let Err(err) = self.messaging.delete(published) {
                warn!(posting = %id, error = %err, "failed to retract published listing, continuing with delete");
            }
        }

        self.store.delete(id)?;
        let posting = self.postings.remove(index);
        info!(posting = %posting.id, venue = %posting.venue, "job posting deleted");
        Ok(())
    }

    fn mutate(
        &mut self,
        id: &PostingId,
        apply: impl FnOnce(&mut JobPosting),
    ) -> Result<(), JobsError> {
        let posting = find_mut(&mut self.postings, id)
            .ok_or_else(|| JobsError::NotFound(id.clone()))?;
        apply(posting);
        self.store.update(posting)?;
        Ok(())
    }
}

fn find_mut<'a>(postings: &'a mut [JobPosting], id: &PostingId) -> Option<&'a mut JobPosting> {
    postings.iter_mut().find(|posting| &posting.id == id)
}
