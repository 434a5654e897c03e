//! Weighted scoring model (WSM) engine and the decision service built around it.
//!
//! The [`decisions::evaluation`] module is a pure function of a decision snapshot. The
//! remaining modules provide the validation, storage, service, and HTTP plumbing that feed it.

pub mod config;
pub mod decisions;
pub mod error;
pub mod telemetry;
