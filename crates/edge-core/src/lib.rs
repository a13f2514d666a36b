//! Core abstractions for the edge cache max-age advisor.
//!
//! This crate provides the fundamental types and traits:
//! - `AdvisorConfig` - Max-age and notice configuration
//! - `RequestContext` - Who is viewing which screen, with which integration
//! - `SettingsStore` trait - Persistent settings and per-user flags
//! - `MemorySettingsStore` - In-process store for tests and embedding

mod config;
mod context;
mod error;
mod store;

pub use config::*;
pub use context::*;
pub use error::*;
pub use store::*;
