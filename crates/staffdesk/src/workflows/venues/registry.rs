use std::sync::Arc;

use tracing::{info, warn};

use super::directory::VenueDirectory;
use super::domain::{UserRemovalBlock, Venue, VenueError, VenueId};
use super::report::{self, ReportBucket};
use super::store::VenueStore;
use super::views::VenueView;
use crate::workflows::audit::{AuditEvent, AuditLog};
use crate::workflows::identity::{ChannelId, ChannelKind, MemberDirectory, UserId};
use crate::workflows::messaging::{MessageContent, MessageGateway};

/// Authorized-user cap enforced for non-admin authorization.
pub const MAX_AUTHORIZED_USERS: usize = 5;

/// Co-owner slots offered by the self-service signup form.
pub const SIGNUP_EXTRA_SLOTS: usize = 3;

/// Outcome reported by [`VenueRegistry::authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizeOutcome {
    Added,
    AlreadyAuthorized,
}

impl AuthorizeOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            AuthorizeOutcome::Added => "added",
            AuthorizeOutcome::AlreadyAuthorized => "already_authorized",
        }
    }
}

/// Outcome reported by [`VenueRegistry::post_venue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    /// A fresh profile card was sent to the shared channel.
    Posted,
    /// An existing card was edited in place.
    Updated,
    /// No shared channel is configured; nothing was sent.
    ChannelUnset,
}

impl PostOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            PostOutcome::Posted => "posted",
            PostOutcome::Updated => "updated",
            PostOutcome::ChannelUnset => "channel_unset",
        }
    }
}

/// Single source of truth for one community's venues.
///
/// Owns the live venue collection and the shared post channel reference,
/// and enforces the naming and authorization invariants. Collaborators are
/// injected at construction; the external directory is passed per import
/// call because it is only consulted there.
pub struct VenueRegistry {
    venues: Vec<Venue>,
    post_channel: Option<ChannelId>,
    store: Arc<dyn VenueStore>,
    members: Arc<dyn MemberDirectory>,
    messaging: Arc<dyn MessageGateway>,
    audit: Arc<dyn AuditLog>,
}

impl VenueRegistry {
    pub fn new(
        store: Arc<dyn VenueStore>,
        members: Arc<dyn MemberDirectory>,
        messaging: Arc<dyn MessageGateway>,
        audit: Arc<dyn AuditLog>,
    ) -> Self {
        Self {
            venues: Vec::new(),
            post_channel: None,
            store,
            members,
            messaging,
            audit,
        }
    }

    /// Rebuilds a registry from previously persisted state. The stored
    /// records are trusted; invariants were enforced when they were written.
    pub fn restore(
        store: Arc<dyn VenueStore>,
        members: Arc<dyn MemberDirectory>,
        messaging: Arc<dyn MessageGateway>,
        audit: Arc<dyn AuditLog>,
        venues: Vec<Venue>,
        post_channel: Option<ChannelId>,
    ) -> Self {
        Self {
            venues,
            post_channel,
            store,
            members,
            messaging,
            audit,
        }
    }

    pub fn venues(&self) -> &[Venue] {
        &self.venues
    }

    pub fn post_channel(&self) -> Option<ChannelId> {
        self.post_channel
    }

    /// Case-insensitive lookup by name.
    pub fn by_name(&self, name: &str) -> Option<&Venue> {
        let lowered = name.to_lowercase();
        self.venues
            .iter()
            .find(|venue| venue.name.to_lowercase() == lowered)
    }

    pub fn by_id(&self, id: &VenueId) -> Option<&Venue> {
        self.venues.iter().find(|venue| &venue.id == id)
    }

    /// True iff `user` is on the venue's authorization roster. Every
    /// non-admin mutating operation funnels through this check.
    pub fn authenticate(venue: &Venue, user: UserId) -> bool {
        venue.is_authorized(user)
    }

    /// Registers a venue directly. The venue starts approved with the
    /// creator as its first authorized user.
    pub fn create(&mut self, name: &str, creator: UserId) -> Result<VenueView, VenueError> {
        self.ensure_name_free(name)?;

        let id = self.store.insert(name)?;
        let mut venue = Venue::new(id, name);
        venue.add_user(creator);
        self.store.update(&venue)?;

        info!(venue = %venue.name, %creator, "venue registered");
        self.audit.record(AuditEvent::VenueCreated {
            venue: venue.name.clone(),
            creator,
        });

        let view = venue.to_view();
        self.venues.push(venue);
        Ok(view)
    }

    /// Self-service venue submission. The venue starts pending staff
    /// approval, with the creator plus up to three co-owners authorized.
    ///
    /// A submitter who denies being the owner may not fill every co-owner
    /// slot; that cap keeps a non-owner from bulk-authorizing strangers
    /// onto a venue they do not control.
    pub fn self_service_signup(
        &mut self,
        name: &str,
        creator: UserId,
        extra_users: [Option<UserId>; SIGNUP_EXTRA_SLOTS],
        owner_confirmed: bool,
    ) -> Result<VenueView, VenueError> {
        self.ensure_name_free(name)?;

        if extra_users.iter().all(Option::is_some) && !owner_confirmed {
            return Err(VenueError::TooManyUsers(name.to_string()));
        }

        let id = self.store.insert(name)?;
        let mut venue = Venue::new(id, name);
        venue.pending = true;
        venue.add_user(creator);
        for user in extra_users.into_iter().flatten() {
            venue.add_user(user);
        }
        self.store.update(&venue)?;

        info!(venue = %venue.name, %creator, "venue submitted for approval");
        self.audit.record(AuditEvent::VenueSubmitted {
            venue: venue.name.clone(),
            creator,
        });

        let view = venue.to_view();
        self.venues.push(venue);
        Ok(view)
    }

    /// Adds `user` to a venue's roster. Requires the requester to already
    /// be authorized unless `admin` is set; the roster cap only binds
    /// non-admin calls. Re-authorizing a present user is a reported no-op.
    pub fn authorize(
        &mut self,
        venue_name: &str,
        user: UserId,
        requesting_user: UserId,
        admin: bool,
    ) -> Result<AuthorizeOutcome, VenueError> {
        let venue = find_mut(&mut self.venues, venue_name)
            .ok_or_else(|| VenueError::NotFound(venue_name.to_string()))?;

        if venue.authorized_users.len() >= MAX_AUTHORIZED_USERS && !admin {
            return Err(VenueError::TooManyUsers(venue.name.clone()));
        }
        if !admin && !venue.is_authorized(requesting_user) {
            return Err(VenueError::Unauthorized(venue.name.clone()));
        }
        if venue.is_authorized(user) {
            return Ok(AuthorizeOutcome::AlreadyAuthorized);
        }

        venue.add_user(user);
        self.store.update(venue)?;
        self.audit.record(AuditEvent::UserAuthorized {
            venue: venue.name.clone(),
            user,
        });
        Ok(AuthorizeOutcome::Added)
    }

    /// Removes `user` from a venue's roster. Refused when the roster is
    /// empty, when the user is not on it, or when they are the last one
    /// left; a live venue never drops to zero authorized users.
    pub fn deauthorize(&mut self, venue_name: &str, user: UserId) -> Result<(), VenueError> {
        let venue = find_mut(&mut self.venues, venue_name)
            .ok_or_else(|| VenueError::NotFound(venue_name.to_string()))?;

        if venue.authorized_users.is_empty() {
            return Err(VenueError::CannotRemoveUser(UserRemovalBlock::EmptyRoster));
        }
        if !venue.is_authorized(user) {
            return Err(VenueError::CannotRemoveUser(UserRemovalBlock::NotAuthorized));
        }
        if venue.authorized_users.len() == 1 {
            return Err(VenueError::CannotRemoveUser(UserRemovalBlock::LastUser));
        }

        venue.remove_user(user);
        self.store.update(venue)?;
        self.audit.record(AuditEvent::UserDeauthorized {
            venue: venue.name.clone(),
            user,
        });
        Ok(())
    }

    /// Clears the pending flag. Approving an already approved venue is a
    /// no-op so staff can safely double-approve.
    pub fn approve(&mut self, venue_name: &str) -> Result<(), VenueError> {
        let venue = find_mut(&mut self.venues, venue_name)
            .ok_or_else(|| VenueError::NotFound(venue_name.to_string()))?;

        if !venue.pending {
            return Ok(());
        }

        venue.pending = false;
        self.store.update(venue)?;
        info!(venue = %venue.name, "venue approved");
        self.audit.record(AuditEvent::VenueApproved {
            venue: venue.name.clone(),
        });
        Ok(())
    }

    /// Detaches the venue from the live collection and issues the durable
    /// delete. Job postings referencing the venue are left alone.
    pub fn remove(&mut self, venue_name: &str) -> Result<(), VenueError> {
        let lowered = venue_name.to_lowercase();
        let index = self
            .venues
            .iter()
            .position(|venue| venue.name.to_lowercase() == lowered)
            .ok_or_else(|| VenueError::NotFound(venue_name.to_string()))?;

        let venue = self.venues.remove(index);
        self.store.delete(&venue.id)?;
        info!(venue = %venue.name, "venue removed");
        self.audit.record(AuditEvent::VenueRemoved { venue: venue.name });
        Ok(())
    }

    /// Creates a local venue from the requesting user's listing in the
    /// external directory. Exactly one listing must match the requested
    /// name; the local venue gets a fresh identifier and its profile is
    /// overwritten wholesale from the external record. Managers named by
    /// the record are authorized when the member directory can resolve
    /// them, after the requester.
    pub fn import_from_external(
        &mut self,
        name: &str,
        requesting_user: UserId,
        directory: &dyn VenueDirectory,
    ) -> Result<VenueView, VenueError> {
        let lowered = name.to_lowercase();
        let mut matches: Vec<_> = directory
            .venues_managed_by(requesting_user)?
            .into_iter()
            .filter(|record| record.name.to_lowercase() == lowered)
            .collect();

        if matches.len() > 1 {
            return Err(VenueError::AmbiguousMatch);
        }
        let record = matches.pop().ok_or(VenueError::ImportNotFound)?;

        self.ensure_name_free(&record.name)?;

        let id = self.store.insert(&record.name)?;
        let mut venue = Venue::new(id, record.name.clone());
        venue.add_user(requesting_user);
        for manager in &record.managers {
            if self.members.resolve_user(*manager).is_some() {
                venue.add_user(*manager);
            }
        }
        venue.update_from_external(&record);
        self.store.update(&venue)?;

        info!(venue = %venue.name, external_id = %record.external_id, "venue imported");
        self.audit.record(AuditEvent::VenueImported {
            venue: venue.name.clone(),
            external_id: record.external_id,
        });

        let view = venue.to_view();
        self.venues.push(venue);
        Ok(view)
    }

    /// Points the shared venue channel at `channel`, which must resolve to
    /// a text channel.
    pub fn set_post_channel(&mut self, channel: ChannelId) -> Result<(), VenueError> {
        let resolved = self
            .members
            .resolve_channel(channel)
            .ok_or(VenueError::ChannelNotFound(channel))?;
        if resolved.kind != ChannelKind::Text {
            return Err(VenueError::InvalidChannelKind(resolved.kind));
        }

        self.post_channel = Some(channel);
        self.store.set_post_channel(self.post_channel)?;
        info!(channel = %channel, "venue post channel set");
        Ok(())
    }

    /// Publishes a venue's profile card to the shared channel. Pending
    /// venues cannot post; the requester must be authorized. With no
    /// shared channel configured the post is skipped and logged rather
    /// than failed. A previously posted card is edited in place, falling
    /// back to a fresh send when the edit fails.
    pub fn post_venue(
        &mut self,
        venue_name: &str,
        requesting_user: UserId,
    ) -> Result<PostOutcome, VenueError> {
        let post_channel = self.post_channel;
        let venue = find_mut(&mut self.venues, venue_name)
            .ok_or_else(|| VenueError::NotFound(venue_name.to_string()))?;

        if venue.pending {
            return Err(VenueError::PendingApproval(venue.name.clone()));
        }
        if !venue.is_authorized(requesting_user) {
            return Err(VenueError::Unauthorized(venue.name.clone()));
        }

        let Some(channel) = post_channel else {
            warn!(venue = %venue.name, "venue post skipped, no shared venue channel configured");
            return Ok(PostOutcome::ChannelUnset);
        };

        let content = MessageContent::VenueCard(venue.card());

        if let Some(existing) = venue.posted {
            match self.messaging.edit(existing, &content) {
                Ok(()) => return Ok(PostOutcome::Updated),
                Err(err) => {
                    warn!(venue = %venue.name, error = %err, "existing venue post is stale, sending a fresh one");
                    venue.posted = None;
                    self.store.update(venue)?;
                }
            }
        }

        let sent = self.messaging.send(channel, &content)?;
        venue.posted = Some(sent);
        self.store.update(venue)?;
        Ok(PostOutcome::Posted)
    }

    /// Detail snapshot of a venue. Pending venues are only visible to
    /// admins; everyone else must be on the roster.
    pub fn detail(
        &self,
        venue_name: &str,
        requesting_user: UserId,
        admin: bool,
    ) -> Result<VenueView, VenueError> {
        let venue = self
            .by_name(venue_name)
            .ok_or_else(|| VenueError::NotFound(venue_name.to_string()))?;

        if venue.pending && !admin {
            return Err(VenueError::PendingApproval(venue.name.clone()));
        }
        if !admin && !venue.is_authorized(requesting_user) {
            return Err(VenueError::Unauthorized(venue.name.clone()));
        }

        Ok(venue.to_view())
    }

    /// Catalog report over the live collection.
    pub fn build_report(&self) -> Vec<ReportBucket> {
        report::build_report(&self.venues)
    }

    fn ensure_name_free(&self, name: &str) -> Result<(), VenueError> {
        if self.by_name(name).is_some() {
            return Err(VenueError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}

fn find_mut<'a>(venues: &'a mut [Venue], name: &str) -> Option<&'a mut Venue> {
    let lowered = name.to_lowercase();
    venues
        .iter_mut()
        .find(|venue| venue.name.to_lowercase() == lowered)
}
