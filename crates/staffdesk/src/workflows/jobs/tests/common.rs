use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::workflows::identity::{ChannelId, UserId};
use crate::workflows::jobs::domain::{JobPosting, PayRate, PostingId, PostingKind, RateFrequency};
use crate::workflows::jobs::store::{PostingStore, StoreError};
use crate::workflows::jobs::{JobPostingRegistry, PostingChannels};
use crate::workflows::messaging::{MessageContent, MessageError, MessageGateway, MessageRef};
use crate::workflows::venues::VenueId;

pub(super) const TEMP_CHANNEL: ChannelId = ChannelId(310);
pub(super) const PERM_CHANNEL: ChannelId = ChannelId(320);

pub(super) fn channels() -> PostingChannels {
    PostingChannels {
        temporary: Some(TEMP_CHANNEL),
        permanent: Some(PERM_CHANNEL),
    }
}

pub(super) fn registry() -> (
    JobPostingRegistry,
    Arc<RecordingPostingStore>,
    Arc<RecordingGateway>,
) {
    registry_with_gateway(RecordingGateway::default())
}

pub(super) fn registry_with_gateway(
    gateway: RecordingGateway,
) -> (
    JobPostingRegistry,
    Arc<RecordingPostingStore>,
    Arc<RecordingGateway>,
) {
    let store = Arc::new(RecordingPostingStore::default());
    let gateway = Arc::new(gateway);
    let registry = JobPostingRegistry::new(store.clone(), gateway.clone());
    (registry, store, gateway)
}

pub(super) fn venue_id() -> VenueId {
    VenueId("venue-0001".to_string())
}

pub(super) fn pay_rate() -> PayRate {
    PayRate {
        amount: Some(150_000),
        frequency: Some(RateFrequency::PerShift),
        details: Some("Tips split at close".to_string()),
    }
}

/// Drafts a posting and fills every required field.
pub(super) fn complete_posting(
    registry: &mut JobPostingRegistry,
    kind: PostingKind,
) -> PostingId {
    let view = registry
        .create(venue_id(), UserId(7))
        .expect("create posting");
    registry.set_kind(&view.id, kind).expect("set kind");
    registry
        .set_position(&view.id, "Bartender".to_string())
        .expect("set position");
    registry
        .set_pay_rate(&view.id, pay_rate())
        .expect("set pay rate");
    registry
        .set_description(&view.id, "Shake and stir for the evening crowd.".to_string())
        .expect("set description");
    view.id
}

#[derive(Default)]
pub(super) struct RecordingPostingStore {
    seq: AtomicU64,
    postings: Mutex<HashMap<PostingId, JobPosting>>,
    deleted: Mutex<Vec<PostingId>>,
}

impl RecordingPostingStore {
    pub(super) fn stored(&self, id: &PostingId) -> Option<JobPosting> {
        self.postings
            .lock()
            .expect("store mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn deleted(&self) -> Vec<PostingId> {
        self.deleted.lock().expect("store mutex poisoned").clone()
    }
}

impl PostingStore for RecordingPostingStore {
    fn insert(&self, venue: &VenueId, contact: UserId) -> Result<PostingId, StoreError> {
        let next = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let id = PostingId(format!("posting-{next:04}"));
        self.postings
            .lock()
            .expect("store mutex poisoned")
            .insert(id.clone(), JobPosting::new(id.clone(), venue.clone(), contact));
        Ok(id)
    }

    fn update(&self, posting: &JobPosting) -> Result<(), StoreError> {
        self.postings
            .lock()
            .expect("store mutex poisoned")
            .insert(posting.id.clone(), posting.clone());
        Ok(())
    }

    fn delete(&self, id: &PostingId) -> Result<(), StoreError> {
        self.postings.lock().expect("store mutex poisoned").remove(id);
        self.deleted
            .lock()
            .expect("store mutex poisoned")
            .push(id.clone());
        Ok(())
    }
}

pub(super) struct UnavailablePostingStore;

impl PostingStore for UnavailablePostingStore {
    fn insert(&self, _venue: &VenueId, _contact: UserId) -> Result<PostingId, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _posting: &JobPosting) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &PostingId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct RecordingGateway {
    seq: AtomicU64,
    edit_fails: bool,
    send_fails: bool,
    delete_fails: bool,
    sent: Mutex<Vec<(ChannelId, MessageContent)>>,
    edits: Mutex<Vec<(MessageRef, MessageContent)>>,
    deletions: Mutex<Vec<MessageRef>>,
}

impl RecordingGateway {
    pub(super) fn stale_edits() -> Self {
        Self {
            edit_fails: true,
            ..Self::default()
        }
    }

    pub(super) fn offline() -> Self {
        Self {
            edit_fails: true,
            send_fails: true,
            delete_fails: true,
            ..Self::default()
        }
    }

    pub(super) fn failing_deletes() -> Self {
        Self {
            delete_fails: true,
            ..Self::default()
        }
    }

    pub(super) fn sent(&self) -> Vec<(ChannelId, MessageContent)> {
        self.sent.lock().expect("gateway mutex poisoned").clone()
    }

    pub(super) fn edits(&self) -> Vec<(MessageRef, MessageContent)> {
        self.edits.lock().expect("gateway mutex poisoned").clone()
    }

    pub(super) fn deletions(&self) -> Vec<MessageRef> {
        self.deletions.lock().expect("gateway mutex poisoned").clone()
    }
}

impl MessageGateway for RecordingGateway {
    fn send(
        &self,
        channel: ChannelId,
        content: &MessageContent,
    ) -> Result<MessageRef, MessageError> {
        if self.send_fails {
            return Err(MessageError::Send("gateway offline".to_string()));
        }
        let next = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.sent
            .lock()
            .expect("gateway mutex poisoned")
            .push((channel, content.clone()));
        Ok(MessageRef {
            channel,
            message: next,
        })
    }

    fn edit(&self, message: MessageRef, content: &MessageContent) -> Result<(), MessageError> {
        if self.edit_fails {
            return Err(MessageError::Edit("message no longer exists".to_string()));
        }
        self.edits
            .lock()
            .expect("gateway mutex poisoned")
            .push((message, content.clone()));
        Ok(())
    }

    fn delete(&self, message: MessageRef) -> Result<(), MessageError> {
        if self.delete_fails {
            return Err(MessageError::Delete("message no longer exists".to_string()));
        }
        self.deletions
            .lock()
            .expect("gateway mutex poisoned")
            .push(message);
        Ok(())
    }
}
