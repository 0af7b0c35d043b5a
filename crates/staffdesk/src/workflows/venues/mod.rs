//! Venue catalog lifecycle: registration, multi-user authorization, the
//! approval workflow, synchronization from the external venue directory,
//! and the alphabetical catalog report.

pub mod directory;
pub mod domain;
pub mod registry;
pub mod report;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use directory::{DirectoryError, ExternalVenueRecord, VenueDirectory};
pub use domain::{UserRemovalBlock, Venue, VenueError, VenueId, VenueProfile};
pub use registry::{
    AuthorizeOutcome, PostOutcome, VenueRegistry, MAX_AUTHORIZED_USERS, SIGNUP_EXTRA_SLOTS,
};
pub use report::{ReportBucket, ReportEntry, ReportPage, REPORT_PAGE_SIZE};
pub use store::{StoreError, VenueStore};
pub use views::VenueView;
