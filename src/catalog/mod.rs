//! Comet catalog
//!
//! The catalog is an ordered, append-only list of tracked comets keyed by
//! designation. It also carries the `added` / `updated` partitions produced by
//! the most recent reconciliation pass; those are pass-scoped and never
//! persisted.
//!
//! ```text
//! CatalogStore::load → Catalog → reconcile(lookup results) → Tracker aggregation
//!                                                              ↓
//!                                               CatalogStore::save
//! ```

pub mod reconciler;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use reconciler::{build_probe_set, reconcile, LookupResult, ReconcileOutcome};
pub use store::{CatalogStore, LoadOutcome, MalformedRow, StoreError};

/// One row of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    /// Stable join key, never blank for a persisted object
    pub designation: String,
    pub permanent_id: Option<String>,
    pub display_name: Option<String>,
    pub discoverer: Option<String>,
    pub one_day_magnitude_avg: Option<f64>,
    pub two_day_magnitude_avg: Option<f64>,
    pub last_observation_time: Option<DateTime<Utc>>,
    pub last_update_time: Option<DateTime<Utc>>,
}

impl TrackedObject {
    pub fn new(designation: impl Into<String>) -> Self {
        Self {
            designation: designation.into(),
            permanent_id: None,
            display_name: None,
            discoverer: None,
            one_day_magnitude_avg: None,
            two_day_magnitude_avg: None,
            last_observation_time: None,
            last_update_time: None,
        }
    }

    /// Name used in logs and notifications: display name if known, else designation
    pub fn label(&self) -> String {
        match &self.display_name {
            Some(name) => format!("{} ({})", self.designation, name),
            None => self.designation.clone(),
        }
    }
}

/// Ordered collection of tracked objects with single-key upsert
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    objects: Vec<TrackedObject>,
    index: HashMap<String, usize>,
    added: Vec<String>,
    updated: Vec<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from rows, keeping the first row for a repeated designation
    pub fn from_objects(objects: Vec<TrackedObject>) -> Self {
        let mut catalog = Self::new();
        for object in objects {
            if catalog.contains(&object.designation) {
                log::warn!(
                    "Duplicate designation {} in catalog, keeping first row",
                    object.designation
                );
                continue;
            }
            catalog.insert(object);
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, designation: &str) -> bool {
        self.index.contains_key(designation)
    }

    pub fn get(&self, designation: &str) -> Option<&TrackedObject> {
        self.index.get(designation).map(|&i| &self.objects[i])
    }

    pub fn get_mut(&mut self, designation: &str) -> Option<&mut TrackedObject> {
        match self.index.get(designation) {
            Some(&i) => Some(&mut self.objects[i]),
            None => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedObject> {
        self.objects.iter()
    }

    /// Designations in catalog order
    pub fn designations(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.designation.clone()).collect()
    }

    /// Insert a new object; returns false (and leaves the catalog alone) if the
    /// designation is blank or already present
    pub(crate) fn insert(&mut self, object: TrackedObject) -> bool {
        if object.designation.trim().is_empty() || self.contains(&object.designation) {
            return false;
        }
        self.index
            .insert(object.designation.clone(), self.objects.len());
        self.objects.push(object);
        true
    }

    /// Reset the pass-scoped partitions
    pub fn begin_pass(&mut self) {
        self.added.clear();
        self.updated.clear();
    }

    pub(crate) fn mark_added(&mut self, designation: &str) {
        self.added.push(designation.to_string());
    }

    pub(crate) fn mark_updated(&mut self, designation: &str) {
        self.updated.push(designation.to_string());
    }

    /// Designations inserted by the latest reconciliation pass
    pub fn added(&self) -> &[String] {
        &self.added
    }

    /// Designations renamed or given a permanent id by the latest pass
    pub fn updated(&self) -> &[String] {
        &self.updated
    }

    pub fn into_objects(self) -> Vec<TrackedObject> {
        self.objects
    }
}
