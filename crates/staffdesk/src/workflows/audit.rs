//! Audit notifications emitted after successful registry mutations.

use crate::workflows::identity::UserId;

/// One auditable mutation of the venue catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    VenueCreated { venue: String, creator: UserId },
    VenueSubmitted { venue: String, creator: UserId },
    VenueApproved { venue: String },
    VenueRemoved { venue: String },
    VenueImported { venue: String, external_id: String },
    UserAuthorized { venue: String, user: UserId },
    UserDeauthorized { venue: String, user: UserId },
}

impl AuditEvent {
    pub fn label(&self) -> &'static str {
        match self {
            AuditEvent::VenueCreated { .. } => "venue_created",
            AuditEvent::VenueSubmitted { .. } => "venue_submitted",
            AuditEvent::VenueApproved { .. } => "venue_approved",
            AuditEvent::VenueRemoved { .. } => "venue_removed",
            AuditEvent::VenueImported { .. } => "venue_imported",
            AuditEvent::UserAuthorized { .. } => "user_authorized",
            AuditEvent::UserDeauthorized { .. } => "user_deauthorized",
        }
    }

    /// Venue name the event concerns.
    pub fn venue(&self) -> &str {
        match self {
            AuditEvent::VenueCreated { venue, .. }
            | AuditEvent::VenueSubmitted { venue, .. }
            | AuditEvent::VenueApproved { venue }
            | AuditEvent::VenueRemoved { venue }
            | AuditEvent::VenueImported { venue, .. }
            | AuditEvent::UserAuthorized { venue, .. }
            | AuditEvent::UserDeauthorized { venue, .. } => venue,
        }
    }
}

/// Fire-and-forget audit sink. Implementations must not fail the calling
/// workflow; anything that can go wrong stays on their side of the seam.
pub trait AuditLog: Send + Sync {
    fn record(&self, event: AuditEvent);
}
