//! Request extractors for identity and permissions.
//!
//! [`auth::AuthUser`] decodes the bearer token; the [`rbac`] gates add a
//! minimum role on top.

pub mod auth;
pub mod rbac;
