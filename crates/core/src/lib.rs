//! Fibber domain core.
//!
//! Holds everything the gateway and the worker agree on: the job index
//! domain, the values written to the fast state store, the fibonacci
//! function itself, and the contracts every backend implements.

pub mod config;
pub mod error;
pub mod fibonacci;
pub mod job;
pub mod ports;
