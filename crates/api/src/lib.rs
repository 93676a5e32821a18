//! Maintrack API server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! report service, file storage) so integration tests and the binary
//! entrypoint can both access them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod reports;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod storage;
