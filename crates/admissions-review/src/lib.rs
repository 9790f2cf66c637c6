//! Coordination layer for the graduate admissions review pipeline.
//!
//! The crate owns the review workflow for one open applicant at a time:
//! resolving the reviewer's role, gating which fields that role may edit,
//! previewing and committing status transitions, reading the audit trail,
//! and keeping every panel that displays the status in sync after a commit.
//! Document storage, bulk ingestion, and session mechanics live behind the
//! [`review::ReviewBackend`] trait and are supplied by the host service.

pub mod config;
pub mod error;
pub mod review;
pub mod telemetry;
