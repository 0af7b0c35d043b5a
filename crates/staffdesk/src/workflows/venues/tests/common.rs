use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use crate::workflows::audit::{AuditEvent, AuditLog};
use crate::workflows::identity::{
    Channel, ChannelId, ChannelKind, Member, MemberDirectory, UserId,
};
use crate::workflows::messaging::{MessageContent, MessageError, MessageGateway, MessageRef};
use crate::workflows::venues::directory::{DirectoryError, ExternalVenueRecord, VenueDirectory};
use crate::workflows::venues::domain::{Venue, VenueId};
use crate::workflows::venues::store::{StoreError, VenueStore};
use crate::workflows::venues::VenueRegistry;

pub(super) const VENUE_CHANNEL: ChannelId = ChannelId(100);
pub(super) const VOICE_CHANNEL: ChannelId = ChannelId(200);

pub(super) fn registry() -> (
    VenueRegistry,
    Arc<RecordingVenueStore>,
    Arc<RecordingGateway>,
    Arc<RecordingAudit>,
) {
    registry_with_gateway(RecordingGateway::default())
}

pub(super) fn registry_with_gateway(
    gateway: RecordingGateway,
) -> (
    VenueRegistry,
    Arc<RecordingVenueStore>,
    Arc<RecordingGateway>,
    Arc<RecordingAudit>,
) {
    let store = Arc::new(RecordingVenueStore::default());
    let gateway = Arc::new(gateway);
    let audit = Arc::new(RecordingAudit::default());
    let registry = VenueRegistry::new(
        store.clone(),
        default_members(),
        gateway.clone(),
        audit.clone(),
    );
    (registry, store, gateway, audit)
}

/// Members 1 through 9 resolve; one text and one voice channel exist.
pub(super) fn default_members() -> Arc<StaticMembers> {
    Arc::new(StaticMembers {
        users: (1..=9).map(UserId).collect(),
        channels: vec![
            Channel {
                id: VENUE_CHANNEL,
                name: "venue-listings".to_string(),
                kind: ChannelKind::Text,
            },
            Channel {
                id: VOICE_CHANNEL,
                name: "venue-lounge".to_string(),
                kind: ChannelKind::Voice,
            },
        ],
    })
}

pub(super) fn external_record(name: &str) -> ExternalVenueRecord {
    ExternalVenueRecord {
        external_id: format!("ext-{}", name.to_lowercase().replace(' ', "-")),
        name: name.to_string(),
        banner_url: Some("https://cdn.example.com/banner.png".to_string()),
        added: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).single(),
        description: vec!["Rooftop cocktail bar with live sets.".to_string()],
        location: Some("Kings Row, Plot 7".to_string()),
        website: Some("https://neon.example".to_string()),
        discord: Some("https://discord.gg/neon".to_string()),
        hiring: true,
        sfw: true,
        tags: vec!["cocktails".to_string(), "live-music".to_string()],
        managers: vec![UserId(2)],
        modified: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single(),
    }
}

#[derive(Default)]
pub(super) struct RecordingVenueStore {
    seq: AtomicU64,
    venues: Mutex<HashMap<VenueId, Venue>>,
    deleted: Mutex<Vec<VenueId>>,
    post_channel: Mutex<Option<ChannelId>>,
}

impl RecordingVenueStore {
    pub(super) fn stored(&self, id: &VenueId) -> Option<Venue> {
        self.venues.lock().expect("store mutex poisoned").get(id).cloned()
    }

    pub(super) fn deleted(&self) -> Vec<VenueId> {
        self.deleted.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn post_channel(&self) -> Option<ChannelId> {
        *self.post_channel.lock().expect("store mutex poisoned")
    }
}

impl VenueStore for RecordingVenueStore {
    fn insert(&self, name: &str) -> Result<VenueId, StoreError> {
        let next = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let id = VenueId(format!("venue-{next:04}"));
        self.venues
            .lock()
            .expect("store mutex poisoned")
            .insert(id.clone(), Venue::new(id.clone(), name));
        Ok(id)
    }

    fn update(&self, venue: &Venue) -> Result<(), StoreError> {
        self.venues
            .lock()
            .expect("store mutex poisoned")
            .insert(venue.id.clone(), venue.clone());
        Ok(())
    }

    fn delete(&self, id: &VenueId) -> Result<(), StoreError> {
        self.venues.lock().expect("store mutex poisoned").remove(id);
        self.deleted
            .lock()
            .expect("store mutex poisoned")
            .push(id.clone());
        Ok(())
    }

    fn set_post_channel(&self, channel: Option<ChannelId>) -> Result<(), StoreError> {
        *self.post_channel.lock().expect("store mutex poisoned") = channel;
        Ok(())
    }
}

pub(super) struct UnavailableVenueStore;

impl VenueStore for UnavailableVenueStore {
    fn insert(&self, _name: &str) -> Result<VenueId, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _venue: &Venue) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &VenueId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn set_post_channel(&self, _channel: Option<ChannelId>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct StaticMembers {
    pub(super) users: Vec<UserId>,
    pub(super) channels: Vec<Channel>,
}

impl MemberDirectory for StaticMembers {
    fn resolve_user(&self, id: UserId) -> Option<Member> {
        self.users.iter().find(|user| **user == id).map(|user| Member {
            id: *user,
            display_name: format!("member-{user}"),
        })
    }

    fn resolve_channel(&self, id: ChannelId) -> Option<Channel> {
        self.channels.iter().find(|channel| channel.id == id).cloned()
    }
}

#[derive(Default)]
pub(super) struct RecordingGateway {
    seq: AtomicU64,
    edit_fails: bool,
    send_fails: bool,
    sent: Mutex<Vec<(ChannelId, MessageContent)>>,
    edits: Mutex<Vec<(MessageRef, MessageContent)>>,
    deletions: Mutex<Vec<MessageRef>>,
}

impl RecordingGateway {
    /// Every edit fails as if the original message was deleted upstream.
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
        self.deletions
            .lock()
            .expect("gateway mutex poisoned")
            .push(message);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct RecordingAudit {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAudit {
    pub(super) fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit mutex poisoned").clone()
    }

    pub(super) fn labels(&self) -> Vec<&'static str> {
        self.events().iter().map(AuditEvent::label).collect()
    }
}

impl AuditLog for RecordingAudit {
    fn record(&self, event: AuditEvent) {
        self.events.lock().expect("audit mutex poisoned").push(event);
    }
}

pub(super) struct StaticDirectory {
    pub(super) records: Vec<ExternalVenueRecord>,
}

impl VenueDirectory for StaticDirectory {
    fn venues_managed_by(&self, _user: UserId) -> Result<Vec<ExternalVenueRecord>, DirectoryError> {
        Ok(self.records.clone())
    }
}

pub(super) struct OfflineDirectory;

impl VenueDirectory for OfflineDirectory {
    fn venues_managed_by(&self, _user: UserId) -> Result<Vec<ExternalVenueRecord>, DirectoryError> {
        Err(DirectoryError::Unavailable("directory offline".to_string()))
    }
}
