//! Logging setup for the edge cache advisor.
//!
//! This crate provides:
//! - `LogLevel` / `LogFormat` - Parsable from CLI flags and config
//! - `init_logging` - Installs a `tracing` subscriber (human or JSON)

mod logging;

pub use logging::*;
