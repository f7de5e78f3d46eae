//! Comet discovery and brightness tracker
//!
//! Watches the Minor Planet Center for newly designated comets and for
//! renames / permanent numbering of comets already tracked, and flags comets
//! whose rolling 2-day magnitude crosses a visibility threshold.
//!
//! # Architecture
//!
//! ```text
//! CatalogStore (CSV) → Catalog
//!     ↓
//! Tracker::run_pass
//!   ├─ designation       probe set for current + previous half-month
//!   ├─ mpc               identifier lookup, observation history
//!   ├─ catalog           reconcile (added / updated)
//!   └─ brightness        1-day / 2-day averages, threshold crossings
//!     ↓
//! PassReport → notify (TrackerEvent → Discord)
//!     ↓
//! CatalogStore::save
//! ```

pub mod brightness;
pub mod catalog;
pub mod config;
pub mod designation;
pub mod mpc;
pub mod notify;
pub mod tracker;

pub use catalog::{Catalog, CatalogStore, TrackedObject};
pub use config::TrackerConfig;
pub use tracker::{PassReport, Tracker, TrackerError};
