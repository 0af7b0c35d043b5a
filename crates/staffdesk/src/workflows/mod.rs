pub mod audit;
pub mod identity;
pub mod jobs;
pub mod messaging;
pub mod venues;
