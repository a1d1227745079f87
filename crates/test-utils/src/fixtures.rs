//! Common test fixtures for meteoroscanner tests.
//!
//! This module provides pre-defined regions and transects that represent
//! common scenarios when scanning reanalysis data.

/// Common bounding boxes as (west, east, north, south).
pub mod bbox {
    /// Continental United States, the extent of [`crate::SyntheticGrid::conus`].
    pub const CONUS: (f64, f64, f64, f64) = (-130.0, -60.0, 52.0, 20.0);

    /// Great Plains, strictly inside CONUS.
    pub const PLAINS: (f64, f64, f64, f64) = (-105.0, -90.0, 45.0, 30.0);

    /// Extends past the western edge of CONUS.
    pub const PACIFIC: (f64, f64, f64, f64) = (-150.0, -120.0, 45.0, 30.0);

    /// Inverted (west > east).
    pub const INVERTED: (f64, f64, f64, f64) = (-90.0, -105.0, 45.0, 30.0);
}

/// Transect endpoints as used by the picker and sweep renderer.
pub mod transect {
    /// Origin, transect end (lat, lon, lat, lon): a south-to-north line at -100°.
    pub const PLAINS_NS: [f64; 4] = [30.0, -100.0, 45.0, -100.0];

    /// Sweep start (lat, lon): five degrees east of the origin.
    pub const PLAINS_SWEEP: [f64; 2] = [30.0, -95.0];

    /// Picker revision moving every point.
    pub const REVISION: &str = "32,-102,46,-101,32,-90";
}

/// Common time values for testing.
pub mod time {
    /// Reference analysis time of the synthetic grids.
    pub const REFERENCE_TIME: &str = "2021-08-29T12:00:00Z";

    /// The same time in figure title format.
    pub const REFERENCE_VALID_TIME: &str = "2021-08-29 12:00Z";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plains_inside_conus() {
        let (w, e, n, s) = bbox::CONUS;
        let (pw, pe, pn, ps) = bbox::PLAINS;
        assert!(pw >= w && pe <= e && pn <= n && ps >= s);
    }

    #[test]
    fn test_transect_inside_plains() {
        let (w, e, n, s) = bbox::PLAINS;
        let [lat0, lon0, lat1, lon1] = transect::PLAINS_NS;
        for (lat, lon) in [(lat0, lon0), (lat1, lon1)] {
            assert!(lat >= s && lat <= n && lon >= w && lon <= e);
        }
    }
}
