//! Member and channel identity resolution against the community platform.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque member identifier issued by the community platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque channel identifier issued by the community platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolved member profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: UserId,
    pub display_name: String,
}

/// Channel categories the platform exposes. Venue and listing posts only
/// ever target text channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    Text,
    Voice,
    Forum,
    Category,
}

impl ChannelKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChannelKind::Text => "text",
            ChannelKind::Voice => "voice",
            ChannelKind::Forum => "forum",
            ChannelKind::Category => "category",
        }
    }
}

/// Resolved channel descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    pub kind: ChannelKind,
}

/// Identity lookups. Absence is reported as `None`, never as an error.
pub trait MemberDirectory: Send + Sync {
    fn resolve_user(&self, id: UserId) -> Option<Member>;
    fn resolve_channel(&self, id: ChannelId) -> Option<Channel>;
}
