//! Max-age evaluation and notice-state engine for the edge cache.
//!
//! This crate provides:
//! - `MaxAgeAdvisor` - Facade wiring the settings store, rank cache and policy
//! - `DeviationRank` - 0 (optimal) to 10 score of how far max-age falls short
//! - `MigrationOutcome` - Result of the one-time legacy max-age promotion
//! - `Notice` / `NoticeKind` / `Severity` - Operator notices and their state
//! - `HealthReport` - Structured status for diagnostics tooling
//! - `Humanizer` / `HumanTimeDiff` - Duration wording
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use edge_advisor::MaxAgeAdvisor;
//! use edge_cache::MemoryCache;
//! use edge_core::{Integration, MemorySettingsStore, RequestContext, Screen, Viewer};
//!
//! let advisor = MaxAgeAdvisor::new(
//!     Arc::new(MemorySettingsStore::new()),
//!     Arc::new(MemoryCache::new()),
//! );
//!
//! let ctx = RequestContext::new(Screen::Settings, Integration::installed("1.5.0")?)
//!     .with_viewer(Viewer::manager(1));
//! if let Some(notice) = advisor.select_notice(&ctx) {
//!     println!("[{}] {}", notice.severity, notice.message);
//! }
//! ```

mod advisor;
mod error;
mod events;
mod health;
mod humanize;
mod migration;
mod notice;
mod rank;
mod settings;

#[cfg(test)]
mod testing;

pub use advisor::*;
pub use error::*;
pub use events::*;
pub use health::*;
pub use humanize::*;
pub use migration::*;
pub use notice::*;
pub use rank::*;
pub use settings::*;
