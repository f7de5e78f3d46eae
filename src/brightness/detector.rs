//! Visibility threshold detection with fixed thresholds
//!
//! Magnitudes run backwards: lower is brighter. A crossing is a 2-day average
//! moving from above a threshold to at-or-below it between two passes.

/// Brighter than this is spectacular
pub const SPECTACULAR: f64 = 2.0;
/// Brighter than this is visible to the naked eye
pub const NAKED_EYE: f64 = 6.0;
/// Brighter than this is visible in binoculars
pub const BINOCULAR: f64 = 8.0;
/// Brightening by at least this many magnitudes between passes
pub const SUDDEN_INCREASE_DELTA: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityCategory {
    Spectacular,
    NakedEye,
    Binocular,
}

impl VisibilityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisibilityCategory::Spectacular => "SPECTACULAR",
            VisibilityCategory::NakedEye => "NAKED_EYE",
            VisibilityCategory::Binocular => "BINOCULAR",
        }
    }
}

/// True iff both values are present and the object went from above
/// `threshold` to at-or-below it
pub fn crossed_threshold(threshold: f64, prior: Option<f64>, new: Option<f64>) -> bool {
    match (prior, new) {
        (Some(prior), Some(new)) => prior > threshold && new <= threshold,
        _ => false,
    }
}

/// True iff both values are present and brightness rose by at least
/// `SUDDEN_INCREASE_DELTA`
pub fn sudden_increase(prior: Option<f64>, new: Option<f64>) -> bool {
    match (prior, new) {
        (Some(prior), Some(new)) => prior - new >= SUDDEN_INCREASE_DELTA,
        _ => false,
    }
}

pub struct BrightnessDetector {
    spectacular: f64,
    naked_eye: f64,
    binocular: f64,
    sudden_increase_delta: f64,
}

impl BrightnessDetector {
    pub fn new(spectacular: f64, naked_eye: f64, binocular: f64, sudden_increase_delta: f64) -> Self {
        Self {
            spectacular,
            naked_eye,
            binocular,
            sudden_increase_delta,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(SPECTACULAR, NAKED_EYE, BINOCULAR, SUDDEN_INCREASE_DELTA)
    }

    /// Classify a change in 2-day average
    ///
    /// # Priority
    /// SPECTACULAR, then NAKED_EYE, then BINOCULAR; at most one category is
    /// returned even when several thresholds are crossed at once.
    pub fn classify(&self, prior: Option<f64>, new: Option<f64>) -> Option<VisibilityCategory> {
        if crossed_threshold(self.spectacular, prior, new) {
            return Some(VisibilityCategory::Spectacular);
        }

        if crossed_threshold(self.naked_eye, prior, new) {
            return Some(VisibilityCategory::NakedEye);
        }

        if crossed_threshold(self.binocular, prior, new) {
            return Some(VisibilityCategory::Binocular);
        }

        None
    }

    pub fn sudden_increase(&self, prior: Option<f64>, new: Option<f64>) -> bool {
        match (prior, new) {
            (Some(prior), Some(new)) => prior - new >= self.sudden_increase_delta,
            _ => false,
        }
    }
}

impl Default for BrightnessDetector {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// `BrightnessDetector::with_defaults().classify(prior, new)`
pub fn classify(prior: Option<f64>, new: Option<f64>) -> Option<VisibilityCategory> {
    BrightnessDetector::with_defaults().classify(prior, new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossed_threshold() {
        assert!(crossed_threshold(6.0, Some(6.5), Some(5.9)));
        assert!(crossed_threshold(6.0, Some(6.5), Some(6.0)));
        assert!(!crossed_threshold(6.0, Some(5.9), Some(5.5)));
        assert!(!crossed_threshold(6.0, None, Some(5.5)));
        assert!(!crossed_threshold(6.0, Some(6.5), None));
        assert!(!crossed_threshold(6.0, Some(5.5), Some(6.5)));
    }

    #[test]
    fn test_binocular_signal() {
        assert_eq!(classify(Some(8.4), Some(7.9)), Some(VisibilityCategory::Binocular));
    }

    #[test]
    fn test_naked_eye_signal() {
        assert_eq!(classify(Some(6.2), Some(5.8)), Some(VisibilityCategory::NakedEye));
    }

    #[test]
    fn test_spectacular_takes_precedence() {
        // Crosses all three thresholds in one pass
        assert_eq!(classify(Some(9.0), Some(1.5)), Some(VisibilityCategory::Spectacular));
    }

    #[test]
    fn test_naked_eye_beats_binocular() {
        assert_eq!(classify(Some(8.5), Some(5.0)), Some(VisibilityCategory::NakedEye));
    }

    #[test]
    fn test_no_signal() {
        assert_eq!(classify(Some(7.5), Some(7.0)), None);
        assert_eq!(classify(None, Some(1.0)), None);
        assert_eq!(classify(Some(5.0), Some(9.0)), None);
    }

    #[test]
    fn test_sudden_increase() {
        assert!(sudden_increase(Some(11.0), Some(9.5)));
        assert!(sudden_increase(Some(12.0), Some(9.0)));
        assert!(!sudden_increase(Some(11.0), Some(9.6)));
        assert!(!sudden_increase(None, Some(5.0)));
        assert!(!sudden_increase(Some(9.0), Some(11.0)));
    }

    #[test]
    fn test_custom_thresholds() {
        let detector = BrightnessDetector::new(1.0, 5.0, 10.0, 0.5);

        assert_eq!(detector.classify(Some(10.5), Some(9.9)), Some(VisibilityCategory::Binocular));
        assert!(detector.sudden_increase(Some(10.5), Some(10.0)));
    }
}
