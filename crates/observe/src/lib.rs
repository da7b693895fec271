//! This crate contains the code that makes the deployer observable: logging
//! initialization, the panic hook and helpers to time futures.
pub mod config;
pub mod future;
pub mod tracing;

pub use config::Config;
