//! Merge freshly queried designation records into the catalog

use super::{Catalog, TrackedObject};
use crate::designation::{designation_range, previous_half_month};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;

/// Outcome of probing one designation against the identifier service
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
    pub found: bool,
    pub designation: String,
    pub name: Option<String>,
    pub permanent_id: Option<String>,
}

impl LookupResult {
    pub fn found(designation: impl Into<String>) -> Self {
        Self {
            found: true,
            designation: designation.into(),
            name: None,
            permanent_id: None,
        }
    }

    pub fn not_found(designation: impl Into<String>) -> Self {
        Self {
            found: false,
            designation: designation.into(),
            name: None,
            permanent_id: None,
        }
    }
}

/// Counts from one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub not_found: usize,
}

/// Reconcile lookup results into `catalog`
///
/// Resets the catalog's `added` / `updated` partitions, then for each found
/// result either inserts a new object (→ `added`), refreshes name and
/// permanent id of an existing one (→ `updated`, `last_update_time = now`), or
/// leaves it untouched. Not-found results are ignored. A designation repeated
/// within `results` is handled once.
pub fn reconcile(catalog: &mut Catalog, results: &[LookupResult], now: DateTime<Utc>) -> ReconcileOutcome {
    catalog.begin_pass();

    let mut outcome = ReconcileOutcome::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for result in results {
        if !result.found {
            outcome.not_found += 1;
            continue;
        }
        if !seen.insert(result.designation.as_str()) {
            continue;
        }

        match catalog.get_mut(&result.designation) {
            Some(existing) => {
                if existing.display_name == result.name && existing.permanent_id == result.permanent_id {
                    outcome.unchanged += 1;
                    continue;
                }

                log::info!(
                    "✏️  {} updated: name {:?} → {:?}, permid {:?} → {:?}",
                    existing.designation,
                    existing.display_name,
                    result.name,
                    existing.permanent_id,
                    result.permanent_id
                );
                existing.display_name = result.name.clone();
                existing.permanent_id = result.permanent_id.clone();
                existing.last_update_time = Some(now);
                catalog.mark_updated(&result.designation);
                outcome.updated += 1;
            }
            None => {
                let mut object = TrackedObject::new(result.designation.clone());
                object.display_name = result.name.clone();
                object.permanent_id = result.permanent_id.clone();

                if catalog.insert(object) {
                    log::info!("🌟 New discovery: {}", result.designation);
                    catalog.mark_added(&result.designation);
                    outcome.added += 1;
                } else {
                    log::warn!("Ignoring lookup result with blank designation");
                }
            }
        }
    }

    outcome
}

/// Designations to send to the identifier service for `today`
///
/// Every catalog designation (to pick up renames and permanent ids), then the
/// previous and current half-month index ranges, de-duplicated in first-seen
/// order.
pub fn build_probe_set(catalog: &Catalog, today: NaiveDate, start: u32, end: u32) -> Vec<String> {
    let candidates = catalog
        .designations()
        .into_iter()
        .chain(designation_range(previous_half_month(today), start, end))
        .chain(designation_range(today, start, end));

    let mut seen = HashSet::new();
    candidates
        .filter(|designation| seen.insert(designation.clone()))
        .collect()
}
