//! Lifecycle management.
//!
//! Startup is linear in `main`: config, logging, metrics, listener, server.
//! Shutdown stops accepting on Ctrl+C or a programmatic trigger and lets
//! in-flight requests finish.

pub mod shutdown;

pub use shutdown::Shutdown;
