//! Core library for the staffdesk service: a community's venue catalog and
//! the job postings those venues publish.
//!
//! Workflow state lives in per-community registries; persistence, identity
//! resolution, messaging, and the external venue directory are consumed as
//! injected collaborator traits so the engines can be exercised in isolation.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
