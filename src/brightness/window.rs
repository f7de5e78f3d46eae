//! Rolling magnitude windows over observation history
//!
//! "Now" for aggregation is the latest observation time, not the wall clock,
//! so the same history always yields the same averages.

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// One astrometric observation
///
/// Times are kept to whole seconds, the precision the catalog persists.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSample {
    pub observed_at: DateTime<Utc>,
    /// Absent when the report carried no usable magnitude
    pub magnitude: Option<f64>,
}

impl ObservationSample {
    pub fn new(observed_at: DateTime<Utc>, magnitude: Option<f64>) -> Self {
        Self {
            observed_at: observed_at.trunc_subsecs(0),
            magnitude: magnitude.filter(|m| m.is_finite()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowSize {
    OneDay,
    TwoDay,
}

impl WindowSize {
    pub fn duration(&self) -> Duration {
        match self {
            WindowSize::OneDay => Duration::days(1),
            WindowSize::TwoDay => Duration::days(2),
        }
    }
}

/// Mean magnitude of samples in `[window_end - duration, window_end]`,
/// rounded to 2 decimals
///
/// Samples without a magnitude are ignored. `None` when nothing usable falls
/// inside the window.
pub fn rolling_average(
    samples: &[ObservationSample],
    window_end: DateTime<Utc>,
    duration: Duration,
) -> Option<f64> {
    let cutoff = window_end - duration;

    let (sum, count) = samples
        .iter()
        .filter(|s| s.observed_at >= cutoff && s.observed_at <= window_end)
        .filter_map(|s| s.magnitude)
        .fold((0.0_f64, 0_usize), |(sum, count), m| (sum + m, count + 1));

    if count == 0 {
        return None;
    }
    Some(round2(sum / count as f64))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Latest observation time in `samples`
pub fn latest_observation(samples: &[ObservationSample]) -> Option<DateTime<Utc>> {
    samples.iter().map(|s| s.observed_at).max()
}

/// Both rolling averages ending at the latest observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeAverages {
    pub last_observation: DateTime<Utc>,
    pub one_day: Option<f64>,
    pub two_day: Option<f64>,
}

/// Compute 1-day and 2-day averages, unless there is nothing newer than
/// `previous_observation`
///
/// Returns `None` when `samples` is empty or its latest observation is not
/// strictly after `previous_observation`; stored averages should then be left
/// as they are.
pub fn compute_averages(
    samples: &[ObservationSample],
    previous_observation: Option<DateTime<Utc>>,
) -> Option<MagnitudeAverages> {
    let last_observation = latest_observation(samples)?;

    if let Some(previous) = previous_observation {
        if last_observation <= previous.trunc_subsecs(0) {
            return None;
        }
    }

    Some(MagnitudeAverages {
        last_observation,
        one_day: rolling_average(samples, last_observation, WindowSize::OneDay.duration()),
        two_day: rolling_average(samples, last_observation, WindowSize::TwoDay.duration()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap()
    }

    fn sample(offset: Duration, magnitude: Option<f64>) -> ObservationSample {
        ObservationSample::new(t0() + offset, magnitude)
    }

    #[test]
    fn test_rolling_average_excludes_samples_outside_window() {
        let samples = vec![
            sample(Duration::zero(), Some(10.0)),
            sample(Duration::hours(1), Some(12.0)),
            sample(Duration::days(3), Some(99.0)),
        ];

        let avg = rolling_average(&samples, t0() + Duration::hours(1), Duration::days(1));

        assert_eq!(avg, Some(11.0));
    }

    #[test]
    fn test_rolling_average_drops_old_samples() {
        let samples = vec![
            sample(Duration::zero(), Some(20.0)),
            sample(Duration::days(2), Some(9.0)),
            sample(Duration::days(3), Some(8.0)),
        ];

        let end = t0() + Duration::days(3);
        assert_eq!(rolling_average(&samples, end, Duration::days(1)), Some(8.5));
        assert_eq!(rolling_average(&samples, end, Duration::days(2)), Some(8.5));
        assert_eq!(rolling_average(&samples, end, Duration::days(3)), Some(12.33));
    }

    #[test]
    fn test_missing_magnitudes_are_not_zero() {
        let samples = vec![
            sample(Duration::zero(), Some(10.0)),
            sample(Duration::hours(2), None),
            sample(Duration::hours(3), Some(11.0)),
        ];

        let avg = rolling_average(&samples, t0() + Duration::hours(3), Duration::days(1));

        assert_eq!(avg, Some(10.5));
    }

    #[test]
    fn test_empty_window_is_none() {
        let samples = vec![sample(Duration::zero(), None)];
        assert_eq!(rolling_average(&samples, t0(), Duration::days(1)), None);
        assert_eq!(rolling_average(&[], t0(), Duration::days(1)), None);
    }

    #[test]
    fn test_non_finite_magnitude_is_absent() {
        assert_eq!(ObservationSample::new(t0(), Some(f64::NAN)).magnitude, None);
    }

    #[test]
    fn test_sample_time_drops_fractional_seconds() {
        let sample = ObservationSample::new(t0() + Duration::milliseconds(14_500), Some(9.0));
        assert_eq!(sample.observed_at, t0() + Duration::seconds(14));
    }

    #[test]
    fn test_compute_averages_ignores_subsecond_difference() {
        let samples = vec![sample(Duration::milliseconds(14_500), Some(9.0))];

        assert!(compute_averages(&samples, Some(t0() + Duration::seconds(14))).is_none());
        assert!(compute_averages(&samples, Some(t0() + Duration::milliseconds(14_900))).is_none());
        assert!(compute_averages(&samples, Some(t0() + Duration::seconds(13))).is_some());
    }

    #[test]
    fn test_compute_averages_uses_latest_observation() {
        let samples = vec![
            sample(Duration::hours(30), Some(9.0)),
            sample(Duration::zero(), Some(13.0)),
            sample(Duration::hours(40), Some(7.0)),
        ];

        let averages = compute_averages(&samples, None).unwrap();

        assert_eq!(averages.last_observation, t0() + Duration::hours(40));
        assert_eq!(averages.one_day, Some(8.0));
        assert_eq!(averages.two_day, Some(9.67));
    }

    #[test]
    fn test_compute_averages_skips_when_no_new_data() {
        let samples = vec![sample(Duration::hours(5), Some(9.0))];

        assert!(compute_averages(&samples, Some(t0() + Duration::hours(5))).is_none());
        assert!(compute_averages(&samples, Some(t0() + Duration::hours(6))).is_none());
        assert!(compute_averages(&samples, Some(t0() + Duration::hours(4))).is_some());
        assert!(compute_averages(&[], None).is_none());
    }

    #[test]
    fn test_window_size_durations() {
        assert_eq!(WindowSize::OneDay.duration(), Duration::days(1));
        assert_eq!(WindowSize::TwoDay.duration(), Duration::days(2));
    }
}
