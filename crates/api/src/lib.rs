//! Fibber API server library.
//!
//! Exposes the submission gateway, the query surface and the HTTP
//! transport around them so integration tests and the binary entrypoint
//! can both access them.

pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod query;
pub mod router;
pub mod routes;
pub mod state;
