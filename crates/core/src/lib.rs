//! Maintrack domain logic.
//!
//! This crate has zero internal dependencies so the repository layer, the
//! HTTP server, and any CLI tooling can share the same report semantics.

pub mod date_filter;
pub mod deletion;
pub mod error;
pub mod export;
pub mod maintenance;
pub mod report;
pub mod report_window;
pub mod roles;
pub mod types;
