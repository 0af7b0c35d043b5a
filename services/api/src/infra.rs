use chrono::{TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use staffdesk::workflows::audit::{AuditEvent, AuditLog};
use staffdesk::workflows::identity::{
    Channel, ChannelId, ChannelKind, Member, MemberDirectory, UserId,
};
use staffdesk::workflows::jobs::{
    JobPosting, JobPostingRegistry, PostingChannels, PostingId, PostingStore,
    StoreError as PostingStoreError,
};
use staffdesk::workflows::messaging::{MessageContent, MessageError, MessageGateway, MessageRef};
use staffdesk::workflows::venues::{
    DirectoryError, ExternalVenueRecord, StoreError, Venue, VenueDirectory, VenueId, VenueRegistry,
    VenueStore,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Channels provisioned for the in-memory community.
pub(crate) const VENUE_POST_CHANNEL: ChannelId = ChannelId(100);
pub(crate) const TEMP_JOBS_CHANNEL: ChannelId = ChannelId(200);
pub(crate) const PERM_JOBS_CHANNEL: ChannelId = ChannelId(201);
pub(crate) const LOUNGE_CHANNEL: ChannelId = ChannelId(300);

/// Member acting as the venue owner in the demo and the fixture directory.
pub(crate) const DEMO_OWNER: UserId = UserId(401);

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutable state behind the HTTP routes. One lock covers both registries so
/// publishing a posting resolves its venue under the same guard.
pub(crate) struct Community {
    pub(crate) venues: VenueRegistry,
    pub(crate) jobs: JobPostingRegistry,
    pub(crate) posting_channels: PostingChannels,
    pub(crate) directory: Arc<dyn VenueDirectory>,
}

pub(crate) type SharedCommunity = Arc<Mutex<Community>>;

/// Builds a community wired to in-memory adapters. The listing destinations
/// start on the provisioned jobs channels; the shared venue channel stays
/// unset until an operator configures it.
pub(crate) fn in_memory_community() -> Community {
    let gateway: Arc<dyn MessageGateway> = Arc::new(RecordingMessageGateway::default());
    let venues = VenueRegistry::new(
        Arc::new(InMemoryVenueStore::default()),
        Arc::new(StaticMemberDirectory),
        gateway.clone(),
        Arc::new(TracingAuditLog),
    );
    let jobs = JobPostingRegistry::new(Arc::new(InMemoryPostingStore::default()), gateway);

    Community {
        venues,
        jobs,
        posting_channels: PostingChannels {
            temporary: Some(TEMP_JOBS_CHANNEL),
            permanent: Some(PERM_JOBS_CHANNEL),
        },
        directory: Arc::new(FixtureVenueDirectory::default()),
    }
}

#[derive(Default)]
pub(crate) struct InMemoryVenueStore {
    sequence: AtomicU64,
    records: Mutex<HashMap<VenueId, Venue>>,
    post_channel: Mutex<Option<ChannelId>>,
}

impl VenueStore for InMemoryVenueStore {
    fn insert(&self, name: &str) -> Result<VenueId, StoreError> {
        let number = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let id = VenueId(format!("venue-{number:04}"));
        let mut guard = self.records.lock().expect("venue store mutex poisoned");
        guard.insert(id.clone(), Venue::new(id.clone(), name));
        Ok(id)
    }

    fn update(&self, venue: &Venue) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("venue store mutex poisoned");
        if guard.contains_key(&venue.id) {
            guard.insert(venue.id.clone(), venue.clone());
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn delete(&self, id: &VenueId) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("venue store mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn set_post_channel(&self, channel: Option<ChannelId>) -> Result<(), StoreError> {
        let mut guard = self.post_channel.lock().expect("venue store mutex poisoned");
        *guard = channel;
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryPostingStore {
    sequence: AtomicU64,
    records: Mutex<HashMap<PostingId, JobPosting>>,
}

impl PostingStore for InMemoryPostingStore {
    fn insert(&self, venue: &VenueId, contact: UserId) -> Result<PostingId, PostingStoreError> {
        let number = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let id = PostingId(format!("posting-{number:04}"));
        let mut guard = self.records.lock().expect("posting store mutex poisoned");
        guard.insert(id.clone(), JobPosting::new(id.clone(), venue.clone(), contact));
        Ok(id)
    }

    fn update(&self, posting: &JobPosting) -> Result<(), PostingStoreError> {
        let mut guard = self.records.lock().expect("posting store mutex poisoned");
        if guard.contains_key(&posting.id) {
            guard.insert(posting.id.clone(), posting.clone());
            Ok(())
        } else {
            Err(PostingStoreError::NotFound)
        }
    }

    fn delete(&self, id: &PostingId) -> Result<(), PostingStoreError> {
        let mut guard = self.records.lock().expect("posting store mutex poisoned");
        guard
            .remove(id)
            .map(|_| ())
            .ok_or(PostingStoreError::NotFound)
    }
}

/// Every member id resolves; channels resolve only for the provisioned set.
pub(crate) struct StaticMemberDirectory;

impl MemberDirectory for StaticMemberDirectory {
    fn resolve_user(&self, id: UserId) -> Option<Member> {
        Some(Member {
            id,
            display_name: format!("member-{}", id.0),
        })
    }

    fn resolve_channel(&self, id: ChannelId) -> Option<Channel> {
        let (name, kind) = match id {
            VENUE_POST_CHANNEL => ("venue-listings", ChannelKind::Text),
            TEMP_JOBS_CHANNEL => ("temp-jobs", ChannelKind::Text),
            PERM_JOBS_CHANNEL => ("permanent-jobs", ChannelKind::Text),
            LOUNGE_CHANNEL => ("venue-lounge", ChannelKind::Voice),
            _ => return None,
        };
        Some(Channel {
            id,
            name: name.to_string(),
            kind,
        })
    }
}

/// Canned external directory listings keyed by their managers.
pub(crate) struct FixtureVenueDirectory {
    records: Vec<ExternalVenueRecord>,
}

impl Default for FixtureVenueDirectory {
    fn default() -> Self {
        Self {
            records: vec![neon_lotus(), driftwood_parlor(), umbral_den()],
        }
    }
}

impl VenueDirectory for FixtureVenueDirectory {
    fn venues_managed_by(&self, user: UserId) -> Result<Vec<ExternalVenueRecord>, DirectoryError> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.managers.contains(&user))
            .cloned()
            .collect())
    }
}

fn neon_lotus() -> ExternalVenueRecord {
    ExternalVenueRecord {
        external_id: "ext-7f2a".to_string(),
        name: "Neon Lotus".to_string(),
        banner_url: Some("https://cdn.example/neon-lotus.png".to_string()),
        added: Utc.with_ymd_and_hms(2026, 3, 14, 18, 30, 0).single(),
        description: vec!["Late-night cocktail bar with a rotating live set.".to_string()],
        location: Some("Ward 3, Plot 18".to_string()),
        website: Some("https://neonlotus.example".to_string()),
        discord: Some("https://discord.example/neonlotus".to_string()),
        hiring: true,
        sfw: true,
        tags: vec!["cocktails".to_string(), "live-music".to_string()],
        managers: vec![DEMO_OWNER, UserId(402)],
        modified: Utc.with_ymd_and_hms(2026, 6, 2, 21, 15, 0).single(),
    }
}

fn driftwood_parlor() -> ExternalVenueRecord {
    ExternalVenueRecord {
        external_id: "ext-91c4".to_string(),
        name: "Driftwood Parlor".to_string(),
        banner_url: None,
        added: Utc.with_ymd_and_hms(2025, 11, 8, 20, 0, 0).single(),
        description: vec!["Quiet reading lounge by the docks.".to_string()],
        location: Some("Ward 9, Plot 2".to_string()),
        website: None,
        discord: None,
        hiring: false,
        sfw: true,
        tags: vec!["lounge".to_string()],
        managers: vec![DEMO_OWNER],
        modified: None,
    }
}

fn umbral_den() -> ExternalVenueRecord {
    ExternalVenueRecord {
        external_id: "ext-p55d".to_string(),
        name: "Umbral Den".to_string(),
        banner_url: None,
        added: None,
        description: vec!["Members-only cellar bar.".to_string()],
        location: None,
        website: None,
        discord: None,
        hiring: false,
        sfw: false,
        tags: Vec::new(),
        managers: vec![UserId(777)],
        modified: None,
    }
}

/// Assigns sequential message ids and keeps a record of every delivery.
#[derive(Default)]
pub(crate) struct RecordingMessageGateway {
    sequence: AtomicU64,
    sent: Mutex<Vec<MessageRef>>,
    edited: Mutex<Vec<MessageRef>>,
    deleted: Mutex<Vec<MessageRef>>,
}

impl MessageGateway for RecordingMessageGateway {
    fn send(
        &self,
        channel: ChannelId,
        _content: &MessageContent,
    ) -> Result<MessageRef, MessageError> {
        let message = MessageRef {
            channel,
            message: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
        };
        self.sent
            .lock()
            .expect("gateway mutex poisoned")
            .push(message);
        Ok(message)
    }

    fn edit(&self, message: MessageRef, _content: &MessageContent) -> Result<(), MessageError> {
        self.edited
            .lock()
            .expect("gateway mutex poisoned")
            .push(message);
        Ok(())
    }

    fn delete(&self, message: MessageRef) -> Result<(), MessageError> {
        self.deleted
            .lock()
            .expect("gateway mutex poisoned")
            .push(message);
        Ok(())
    }
}

impl RecordingMessageGateway {
    pub(crate) fn sent(&self) -> Vec<MessageRef> {
        self.sent.lock().expect("gateway mutex poisoned").clone()
    }

    pub(crate) fn edits(&self) -> usize {
        self.edited.lock().expect("gateway mutex poisoned").len()
    }

    pub(crate) fn deletions(&self) -> usize {
        self.deleted.lock().expect("gateway mutex poisoned").len()
    }
}

/// Audit sink for the service: one structured log line per event.
pub(crate) struct TracingAuditLog;

impl AuditLog for TracingAuditLog {
    fn record(&self, event: AuditEvent) {
        info!(event = event.label(), venue = event.venue(), "catalog audit event");
    }
}

/// Audit sink for the demo: keeps the trail for printing at the end.
#[derive(Default)]
pub(crate) struct RecordingAuditLog {
    events: Mutex<Vec<AuditEvent>>,
}

impl AuditLog for RecordingAuditLog {
    fn record(&self, event: AuditEvent) {
        self.events
            .lock()
            .expect("audit mutex poisoned")
            .push(event);
    }
}

impl RecordingAuditLog {
    pub(crate) fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit mutex poisoned").clone()
    }
}
