use std::fmt;

use serde::{Deserialize, Serialize};

use super::directory::{DirectoryError, ExternalVenueRecord};
use super::store::StoreError;
use crate::workflows::identity::{ChannelId, ChannelKind, UserId};
use crate::workflows::messaging::{MessageError, MessageRef, VenueCard};

/// Opaque venue identifier assigned by the store at insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VenueId(pub String);

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptive fields synchronized wholesale from the external directory.
/// Manual edits to these lose to a re-import by design.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueProfile {
    pub description: Vec<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub discord: Option<String>,
    pub banner_url: Option<String>,
    pub hiring: bool,
    pub sfw: bool,
    pub tags: Vec<String>,
}

/// One registered venue and its authorization roster.
///
/// The roster is an ordered set: insertion order is authorization order and
/// duplicates are rejected at the mutation level. Registry operations keep
/// it non-empty for every live venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub authorized_users: Vec<UserId>,
    pub pending: bool,
    pub profile: VenueProfile,
    pub posted: Option<MessageRef>,
}

impl Venue {
    pub fn new(id: VenueId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            authorized_users: Vec::new(),
            pending: false,
            profile: VenueProfile::default(),
            posted: None,
        }
    }

    pub fn is_authorized(&self, user: UserId) -> bool {
        self.authorized_users.contains(&user)
    }

    /// Appends to the roster unless already present. Returns whether the
    /// roster changed.
    pub fn add_user(&mut self, user: UserId) -> bool {
        if self.is_authorized(user) {
            return false;
        }
        self.authorized_users.push(user);
        true
    }

    /// Removes from the roster. Returns whether the roster changed. The
    /// non-empty and last-user invariants are the registry's to enforce.
    pub fn remove_user(&mut self, user: UserId) -> bool {
        match self.authorized_users.iter().position(|entry| *entry == user) {
            Some(index) => {
                self.authorized_users.remove(index);
                true
            }
            None => false,
        }
    }

    /// Overwrites the profile from an external directory record. The roster,
    /// approval state, name, and identifier are never touched here.
    pub fn update_from_external(&mut self, record: &ExternalVenueRecord) {
        self.profile = VenueProfile {
            description: record.description.clone(),
            location: record.location.clone(),
            website: record.website.clone(),
            discord: record.discord.clone(),
            banner_url: record.banner_url.clone(),
            hiring: record.hiring,
            sfw: record.sfw,
            tags: record.tags.clone(),
        };
    }

    pub(crate) fn card(&self) -> VenueCard {
        VenueCard {
            name: self.name.clone(),
            description: self.profile.description.clone(),
            location: self.profile.location.clone(),
            website: self.profile.website.clone(),
            discord: self.profile.discord.clone(),
            banner_url: self.profile.banner_url.clone(),
            hiring: self.profile.hiring,
            tags: self.profile.tags.clone(),
        }
    }
}

/// Reason a roster removal was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRemovalBlock {
    /// The roster was already empty, which no live venue should reach.
    EmptyRoster,
    /// The user was never authorized for this venue.
    NotAuthorized,
    /// The user is the sole remaining authorized user.
    LastUser,
}

impl UserRemovalBlock {
    pub fn label(&self) -> &'static str {
        match self {
            UserRemovalBlock::EmptyRoster => "the venue has no authorized users",
            UserRemovalBlock::NotAuthorized => "the user is not authorized for this venue",
            UserRemovalBlock::LastUser => "the only remaining authorized user cannot be removed",
        }
    }
}

impl fmt::Display for UserRemovalBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Policy violations and collaborator faults raised by venue workflows.
#[derive(Debug, thiserror::Error)]
pub enum VenueError {
    #[error("venue '{0}' was not found")]
    NotFound(String),
    #[error("a venue named '{0}' already exists")]
    DuplicateName(String),
    #[error("venue '{0}' already has the maximum number of authorized users")]
    TooManyUsers(String),
    #[error("user is not authorized to manage venue '{0}'")]
    Unauthorized(String),
    #[error("cannot remove user: {0}")]
    CannotRemoveUser(UserRemovalBlock),
    #[error("venue '{0}' is awaiting staff approval")]
    PendingApproval(String),
    #[error("channel {0} could not be resolved")]
    ChannelNotFound(ChannelId),
    #[error("venue channel must be a text channel, got a {} channel", .0.label())]
    InvalidChannelKind(ChannelKind),
    #[error("no venue matching that name is managed by the requesting user")]
    ImportNotFound,
    #[error("more than one external venue matched that name")]
    AmbiguousMatch,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Messaging(#[from] MessageError),
}
