//! Brightness tracking
//!
//! ```text
//! ObservationSource → Vec<ObservationSample>
//!     ↓
//! compute_averages (1-day / 2-day windows ending at latest observation)
//!     ↓
//! BrightnessDetector (crossings of 2 / 6 / 8 mag, sudden brightening)
//! ```

pub mod detector;
pub mod window;

pub use detector::{
    classify, crossed_threshold, sudden_increase, BrightnessDetector, VisibilityCategory,
};
pub use window::{compute_averages, rolling_average, MagnitudeAverages, ObservationSample, WindowSize};
