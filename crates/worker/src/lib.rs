//! Fibber computation worker.
//!
//! Exposes the worker loop so the standalone binary and the gateway's
//! in-process mode run the exact same code.

pub mod signal;
pub mod worker;

pub use signal::shutdown_signal;
pub use worker::{ChannelClosed, ComputationWorker, WorkerError, WorkerStats};
