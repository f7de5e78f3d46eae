//! Tracking pass orchestration
//!
//! One pass, strictly in order:
//!
//! ```text
//! build_probe_set → IdentifierLookup (one batch request)
//!     ↓
//! reconcile into catalog (added / updated)
//!     ↓
//! for each comet: throttle → ObservationSource → compute_averages → BrightnessDetector
//!     ↓
//! PassReport (caller persists the catalog and delivers events)
//! ```
//!
//! A lookup failure aborts the pass before the catalog is touched. An
//! observation failure only skips that comet.

pub mod throttle;

use crate::brightness::{compute_averages, BrightnessDetector, ObservationSample, VisibilityCategory};
use crate::catalog::{build_probe_set, reconcile, Catalog, ReconcileOutcome, TrackedObject};
use crate::mpc::{IdentifierLookup, MpcError, ObservationSource};
use crate::notify::{EventCategory, TrackerEvent};
use chrono::{DateTime, NaiveDate, Utc};
use std::time::Duration;

pub use throttle::RequestThrottle;

pub const DEFAULT_PROBE_START: u32 = 1;
pub const DEFAULT_PROBE_END: u32 = 5;
pub const DEFAULT_FETCH_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug)]
pub enum TrackerError {
    /// Batch identifier lookup failed; nothing was reconciled
    Lookup(MpcError),
}

impl From<MpcError> for TrackerError {
    fn from(err: MpcError) -> Self {
        TrackerError::Lookup(err)
    }
}

impl std::fmt::Display for TrackerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerError::Lookup(e) => write!(f, "Identifier lookup failed: {}", e),
        }
    }
}

impl std::error::Error for TrackerError {}

/// What happened to one comet's brightness this pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrightnessUpdate {
    /// No observation newer than the stored one
    NoNewData,
    Updated {
        category: Option<VisibilityCategory>,
        sudden_increase: bool,
    },
}

/// Recompute rolling averages for `object` from fresh `samples` and classify
/// the change in 2-day average
pub fn apply_observations(
    object: &mut TrackedObject,
    samples: &[ObservationSample],
    detector: &BrightnessDetector,
    now: DateTime<Utc>,
) -> BrightnessUpdate {
    let Some(averages) = compute_averages(samples, object.last_observation_time) else {
        return BrightnessUpdate::NoNewData;
    };

    let prior_two_day = object.two_day_magnitude_avg;

    object.one_day_magnitude_avg = averages.one_day;
    object.two_day_magnitude_avg = averages.two_day;
    object.last_observation_time = Some(averages.last_observation);
    object.last_update_time = Some(now);

    BrightnessUpdate::Updated {
        category: detector.classify(prior_two_day, averages.two_day),
        sudden_increase: detector.sudden_increase(prior_two_day, averages.two_day),
    }
}

/// Pass-scoped output; every list holds designations
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    pub probed: usize,
    pub reconcile: ReconcileOutcome,
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub spectacular: Vec<String>,
    pub naked_eye: Vec<String>,
    pub binocular: Vec<String>,
    pub sudden_increase: Vec<String>,
    pub aggregated: usize,
    pub no_new_data: usize,
    pub fetch_failures: usize,
}

impl PassReport {
    /// Notification events in reporting order
    pub fn events(&self, catalog: &Catalog) -> Vec<TrackerEvent> {
        let buckets = [
            (EventCategory::NewDiscovery, &self.added),
            (EventCategory::Renamed, &self.updated),
            (EventCategory::Spectacular, &self.spectacular),
            (EventCategory::NakedEye, &self.naked_eye),
            (EventCategory::Binocular, &self.binocular),
            (EventCategory::SuddenIncrease, &self.sudden_increase),
        ];

        buckets
            .iter()
            .flat_map(|(category, designations)| {
                designations
                    .iter()
                    .filter_map(|d| catalog.get(d))
                    .map(|object| TrackerEvent::new(*category, object))
            })
            .collect()
    }

    fn record(&mut self, designation: &str, update: BrightnessUpdate) {
        match update {
            BrightnessUpdate::NoNewData => self.no_new_data += 1,
            BrightnessUpdate::Updated { category, sudden_increase } => {
                self.aggregated += 1;
                if let Some(category) = category {
                    let bucket = match EventCategory::from(category) {
                        EventCategory::Spectacular => &mut self.spectacular,
                        EventCategory::NakedEye => &mut self.naked_eye,
                        _ => &mut self.binocular,
                    };
                    bucket.push(designation.to_string());
                }
                if sudden_increase {
                    self.sudden_increase.push(designation.to_string());
                }
            }
        }
    }
}

pub struct Tracker<L, O> {
    lookup: L,
    observations: O,
    detector: BrightnessDetector,
    probe_start: u32,
    probe_end: u32,
    fetch_interval: Duration,
}

impl<L: IdentifierLookup, O: ObservationSource> Tracker<L, O> {
    pub fn new(lookup: L, observations: O) -> Self {
        Self {
            lookup,
            observations,
            detector: BrightnessDetector::with_defaults(),
            probe_start: DEFAULT_PROBE_START,
            probe_end: DEFAULT_PROBE_END,
            fetch_interval: DEFAULT_FETCH_INTERVAL,
        }
    }

    pub fn with_probe_range(mut self, start: u32, end: u32) -> Self {
        self.probe_start = start;
        self.probe_end = end;
        self
    }

    pub fn with_fetch_interval(mut self, interval: Duration) -> Self {
        self.fetch_interval = interval;
        self
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn observations(&self) -> &O {
        &self.observations
    }

    /// Run one full pass over `catalog`
    ///
    /// `today` picks the half-month ranges to probe; `now` stamps
    /// `last_update_time` on anything modified.
    pub async fn run_pass(
        &self,
        catalog: &mut Catalog,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<PassReport, TrackerError> {
        let mut report = PassReport::default();

        let probes = build_probe_set(catalog, today, self.probe_start, self.probe_end);
        report.probed = probes.len();
        log::info!("🔍 Probing {} designations", probes.len());

        let results = self.lookup.lookup(&probes).await?;

        report.reconcile = reconcile(catalog, &results, now);
        report.added = catalog.added().to_vec();
        report.updated = catalog.updated().to_vec();
        log::info!(
            "✅ Reconciled: {} new, {} updated, {} unchanged, {} not found",
            report.reconcile.added,
            report.reconcile.updated,
            report.reconcile.unchanged,
            report.reconcile.not_found
        );

        self.aggregate_all(catalog, now, &mut report).await;

        log::info!(
            "✅ Pass complete: {} aggregated, {} without new data, {} fetch failures",
            report.aggregated,
            report.no_new_data,
            report.fetch_failures
        );
        Ok(report)
    }

    async fn aggregate_all(&self, catalog: &mut Catalog, now: DateTime<Utc>, report: &mut PassReport) {
        let mut throttle = RequestThrottle::new(self.fetch_interval);
        log::debug!(
            "Fetching observations for {} comets, {:?} apart",
            catalog.len(),
            throttle.min_interval()
        );

        for designation in catalog.designations() {
            throttle.wait().await;

            let samples = match self.observations.observations(&designation).await {
                Ok(samples) => samples,
                Err(e) => {
                    log::warn!("⚠️  Failed to fetch observations for {}: {}", designation, e);
                    report.fetch_failures += 1;
                    continue;
                }
            };

            let Some(object) = catalog.get_mut(&designation) else {
                continue;
            };

            let update = apply_observations(object, &samples, &self.detector, now);
            if let BrightnessUpdate::Updated { category, sudden_increase } = update {
                log::debug!(
                    "{}: 1d {:?}, 2d {:?}",
                    designation,
                    object.one_day_magnitude_avg,
                    object.two_day_magnitude_avg
                );
                if let Some(category) = category {
                    log::info!("🎯 {} crossed {} threshold", object.label(), category.as_str());
                }
                if sudden_increase {
                    log::info!("💥 {} brightened suddenly", object.label());
                }
            }

            report.record(&designation, update);
        }
    }
}
