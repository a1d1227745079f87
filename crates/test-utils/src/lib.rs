//! Fixtures and synthetic data shared by the workspace's tests.
//!
//! [`SyntheticGrid`] builds small reanalysis-shaped datasets whose fields
//! are analytic functions of position and level, so tests can compare
//! interpolated values against [`temperature`] and friends. Named regions,
//! transects and times live in [`fixtures`].

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Assert two numbers differ by no more than `tolerance`, comparing as `f64`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (actual, expected, tolerance) = ($actual as f64, $expected as f64, $tolerance as f64);
        assert!(
            (actual - expected).abs() <= tolerance,
            "assertion failed: {} is not within {} of {}",
            actual,
            tolerance,
            expected
        );
    }};
}

/// Assert two `LatLon` points agree to within `tolerance` degrees on each axis.
#[macro_export]
macro_rules! assert_latlon_eq {
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (actual, expected) = ($actual, $expected);
        $crate::assert_approx_eq!(actual.lat, expected.lat, $tolerance);
        $crate::assert_approx_eq!(actual.lon, expected.lon, $tolerance);
    }};
}
