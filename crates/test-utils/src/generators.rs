//! Test data generators for creating synthetic reanalysis-like grids.
//!
//! Every field is an analytic function of latitude, longitude and pressure,
//! so tests can predict values at any point without reading files.

use chrono::{DateTime, Duration, TimeZone, Utc};
use scanner_common::{Axis, Dataset, Variable};

/// Temperature in Kelvin: warm near the surface and in the south,
/// with a weak zonal wave.
pub fn temperature(lat: f64, lon: f64, pressure: f64) -> f32 {
    let lapse = 60.0 * (1.0 - pressure / 1000.0);
    let meridional = 0.6 * (lat - 20.0);
    let wave = 2.0 * (lon.to_radians() * 4.0).sin();
    (300.0 - lapse - meridional + wave) as f32
}

/// Geopotential height in metres, roughly hypsometric.
pub fn geopotential_height(lat: f64, lon: f64, pressure: f64) -> f32 {
    let base = 7400.0 * (1000.0 / pressure).ln() + 110.0;
    let trough = -60.0 * (-((lon + 95.0) / 15.0).powi(2)).exp() * (pressure / 1000.0).recip().ln().max(0.2);
    (base - 3.0 * (lat - 20.0) + trough) as f32
}

/// Relative vorticity in 1/s: a positive bump centred over the plains.
pub fn relative_vorticity(lat: f64, lon: f64, _pressure: f64) -> f32 {
    let r2 = ((lat - 38.0) / 6.0).powi(2) + ((lon + 95.0) / 8.0).powi(2);
    (3.0e-4 * (-r2).exp()) as f32
}

/// Vertical velocity (omega) in Pa/s, alternating ascent and descent.
pub fn omega(lat: f64, lon: f64, pressure: f64) -> f32 {
    let vertical = (std::f64::consts::PI * pressure / 1000.0).sin();
    (2.5 * vertical * (lon.to_radians() * 6.0).sin() * (lat.to_radians() * 3.0).cos()) as f32
}

/// Potential temperature in Kelvin derived from [`temperature`].
pub fn potential_temperature(lat: f64, lon: f64, pressure: f64) -> f32 {
    let t = temperature(lat, lon, pressure) as f64;
    (t * (1000.0 / pressure).powf(0.286)) as f32
}

fn zero(_lat: f64, _lon: f64, _pressure: f64) -> f32 {
    0.0
}

/// Evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + i as f64 * step).collect()
        }
    }
}

/// Reference analysis time used by the synthetic grids (2021-08-29T12:00Z).
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 8, 29, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Builder for a synthetic dataset on a regular lat/lon grid.
///
/// # Example
///
/// ```
/// use test_utils::SyntheticGrid;
///
/// let ds = SyntheticGrid::conus().variables(&["t", "z"]).build();
/// assert_eq!(ds.variable_names(), vec!["t", "z"]);
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticGrid {
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    pub levels: Vec<f64>,
    pub times: usize,
    pub variables: Vec<String>,
    pub north_first: bool,
}

impl SyntheticGrid {
    /// CONUS at 2°: lat 20–52, lon -130–-60, a single 500 hPa level and one
    /// time, with `t`, `z` and `vo`.
    pub fn conus() -> Self {
        Self {
            latitudes: linspace(20.0, 52.0, 17),
            longitudes: linspace(-130.0, -60.0, 36),
            levels: vec![500.0],
            times: 1,
            variables: vec!["t".into(), "z".into(), "vo".into()],
            north_first: false,
        }
    }

    pub fn levels(mut self, levels: &[f64]) -> Self {
        self.levels = levels.to_vec();
        self
    }

    /// Standard pressure levels from 1000 to 100 hPa every 100 hPa.
    pub fn standard_levels(self) -> Self {
        self.levels(&[1000.0, 900.0, 800.0, 700.0, 600.0, 500.0, 400.0, 300.0, 200.0, 100.0])
    }

    pub fn times(mut self, times: usize) -> Self {
        self.times = times;
        self
    }

    pub fn variables(mut self, names: &[&str]) -> Self {
        self.variables = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Store latitude north-first (descending), as many reanalyses do.
    pub fn north_first(mut self) -> Self {
        self.north_first = true;
        self
    }

    /// Build the dataset. Unknown variable names are filled with zeros.
    pub fn build(&self) -> Dataset {
        self.try_build().unwrap_or_else(|e| panic!("synthetic grid is invalid: {}", e))
    }

    pub fn try_build(&self) -> scanner_common::DatasetResult<Dataset> {
        let mut latitudes = self.latitudes.clone();
        if self.north_first {
            latitudes.reverse();
        }
        let base = reference_time();
        let times: Vec<DateTime<Utc>> = (0..self.times)
            .map(|i| base + Duration::hours(6 * i as i64))
            .collect();

        let mut builder = Dataset::builder()
            .times(times)
            .axis(Axis::new("pressure", self.levels.clone()).with_attrs("pressure", "hPa"))
            .axis(Axis::new("lat", latitudes.clone()).with_attrs("latitude", "degrees_north"))
            .axis(Axis::new("lon", self.longitudes.clone()).with_attrs("longitude", "degrees_east"));

        for name in &self.variables {
            let (field, long_name, units): (fn(f64, f64, f64) -> f32, &str, &str) =
                match name.as_str() {
                    "t" => (temperature, "Temperature", "K"),
                    "z" => (geopotential_height, "Geopotential height", "m"),
                    "vo" => (relative_vorticity, "Vorticity (relative)", "s**-1"),
                    "w" => (omega, "Vertical velocity", "Pa s**-1"),
                    "thta" => (potential_temperature, "Potential temperature", "K"),
                    _ => (zero, "Unknown", "1"),
                };
            let mut data =
                Vec::with_capacity(self.times * self.levels.len() * latitudes.len() * self.longitudes.len());
            for _ in 0..self.times {
                for &p in &self.levels {
                    for &lat in &latitudes {
                        for &lon in &self.longitudes {
                            data.push(field(lat, lon, p));
                        }
                    }
                }
            }
            builder = builder.variable(Variable::new(name.clone(), data).with_attrs(long_name, units));
        }

        builder.build()
    }
}
