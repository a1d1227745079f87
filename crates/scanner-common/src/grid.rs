//! Gridded reanalysis datasets.
//!
//! A [`Dataset`] holds named variables over four axes: time, vertical
//! (pressure), latitude and longitude. Variable data is row-major with
//! shape `[time][vertical][latitude][longitude]`; NaN marks missing values.
//!
//! Axis roles are resolved once, when the dataset is built, from the axis
//! names through [`AxisRole::from_name`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::error::{DatasetError, DatasetResult};
use crate::BoundingBox;

/// Semantic role of a spatial axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisRole {
    Latitude,
    Longitude,
    Vertical,
}

impl AxisRole {
    pub const ALL: [AxisRole; 3] = [AxisRole::Latitude, AxisRole::Longitude, AxisRole::Vertical];

    /// Lower-case axis names accepted for this role.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            AxisRole::Latitude => &["lat", "latitude", "latitudes"],
            AxisRole::Longitude => &["lon", "long", "longitude", "longitudes"],
            AxisRole::Vertical => &["pressure", "isobaricinhpa", "level", "plev", "isobaric"],
        }
    }

    /// Resolve the role of an axis from its name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|role| role.synonyms().contains(&lower.as_str()))
    }
}

impl fmt::Display for AxisRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisRole::Latitude => "latitude",
            AxisRole::Longitude => "longitude",
            AxisRole::Vertical => "vertical",
        };
        f.write_str(name)
    }
}

/// A named, strictly monotonic coordinate axis with CF-style attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub name: String,
    pub values: Vec<f64>,
    pub long_name: String,
    pub units: String,
}

impl Axis {
    /// Create an axis whose long name defaults to its name.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        let name = name.into();
        Self {
            long_name: name.clone(),
            name,
            values,
            units: String::new(),
        }
    }

    pub fn with_attrs(mut self, long_name: impl Into<String>, units: impl Into<String>) -> Self {
        self.long_name = long_name.into();
        self.units = units.into();
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// True when values decrease with index (e.g. north-first latitude).
    pub fn is_descending(&self) -> bool {
        self.values.len() > 1 && self.values[1] < self.values[0]
    }

    /// Strict monotonicity in either direction. Single-point axes qualify.
    pub fn is_monotonic(&self) -> bool {
        let increasing = self.values.windows(2).all(|w| w[1] > w[0]);
        let decreasing = self.values.windows(2).all(|w| w[1] < w[0]);
        increasing || decreasing
    }

    /// Spacing between the first two points.
    pub fn step(&self) -> Option<f64> {
        match self.values.as_slice() {
            [a, b, ..] => Some((b - a).abs()),
            _ => None,
        }
    }

    /// True for pressure-like vertical coordinates.
    pub fn is_pressure(&self) -> bool {
        let units = self.units.to_lowercase();
        let name = self.name.to_lowercase();
        matches!(units.as_str(), "hpa" | "pa" | "mb" | "mbar" | "millibar")
            || name.contains("pressure")
            || name.starts_with("isobaric")
    }

    /// Fractional index of `value` along the axis, interpolating linearly
    /// between neighbouring coordinates. `None` outside the axis range.
    pub fn fractional_index(&self, value: f64) -> Option<f64> {
        fractional_index(&self.values, value)
    }

    /// Index of the coordinate equal to `value` within `tolerance`.
    pub fn position(&self, value: f64, tolerance: f64) -> Option<usize> {
        self.values.iter().position(|&v| (v - value).abs() <= tolerance)
    }

    /// Contiguous index range of coordinates inside `[lo, hi]`.
    pub fn range_within(&self, lo: f64, hi: f64) -> Range<usize> {
        let inside: Vec<usize> = self
            .values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v >= lo && v <= hi)
            .map(|(i, _)| i)
            .collect();
        match (inside.first(), inside.last()) {
            (Some(&first), Some(&last)) => first..last + 1,
            _ => 0..0,
        }
    }

    /// A new axis holding the given indices.
    pub fn take(&self, indices: impl IntoIterator<Item = usize>) -> Axis {
        Axis {
            name: self.name.clone(),
            values: indices.into_iter().map(|i| self.values[i]).collect(),
            long_name: self.long_name.clone(),
            units: self.units.clone(),
        }
    }
}

/// A named data variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    data: Vec<f32>,
}

impl Variable {
    pub fn new(name: impl Into<String>, data: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            long_name: None,
            units: None,
            data,
        }
    }

    pub fn with_attrs(mut self, long_name: impl Into<String>, units: impl Into<String>) -> Self {
        self.long_name = Some(long_name.into());
        self.units = Some(units.into());
        self
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

/// In-memory gridded dataset over time, vertical, latitude and longitude.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    times: Vec<DateTime<Utc>>,
    vertical: Axis,
    latitude: Axis,
    longitude: Axis,
    variables: Vec<Variable>,
}

impl Dataset {
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn vertical(&self) -> &Axis {
        &self.vertical
    }

    pub fn latitude(&self) -> &Axis {
        &self.latitude
    }

    pub fn longitude(&self) -> &Axis {
        &self.longitude
    }

    pub fn axis(&self, role: AxisRole) -> &Axis {
        match role {
            AxisRole::Latitude => &self.latitude,
            AxisRole::Longitude => &self.longitude,
            AxisRole::Vertical => &self.vertical,
        }
    }

    /// Variables in insertion order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// `[time, vertical, latitude, longitude]` lengths.
    pub fn shape(&self) -> [usize; 4] {
        [
            self.times.len(),
            self.vertical.len(),
            self.latitude.len(),
            self.longitude.len(),
        ]
    }

    /// Spatial extent of the grid.
    pub fn extent(&self) -> BoundingBox {
        BoundingBox::new(
            self.longitude.min(),
            self.longitude.max(),
            self.latitude.max(),
            self.latitude.min(),
        )
    }

    /// The 2-D latitude × longitude field of `name` at one time and level,
    /// row-major with one row per latitude in axis order.
    pub fn field(&self, name: &str, time: usize, level: usize) -> DatasetResult<&[f32]> {
        let variable = self
            .variable(name)
            .ok_or_else(|| DatasetError::UnknownVariable(name.to_string()))?;
        let [nt, nz, ny, nx] = self.shape();
        check_index("time", time, nt)?;
        check_index(&self.vertical.name, level, nz)?;

        let plane = ny * nx;
        let start = (time * nz + level) * plane;
        Ok(&variable.data[start..start + plane])
    }

    /// Build a subset holding the named variables (in the given order) and
    /// the given time, level, latitude and longitude indices.
    pub fn subset(
        &self,
        names: &[&str],
        times: &[usize],
        levels: &[usize],
        lat: Range<usize>,
        lon: Range<usize>,
    ) -> DatasetResult<Dataset> {
        let [nt, nz, ny, nx] = self.shape();
        for &t in times {
            check_index("time", t, nt)?;
        }
        for &k in levels {
            check_index(&self.vertical.name, k, nz)?;
        }
        if lat.end > ny {
            return Err(DatasetError::IndexOutOfRange {
                axis: self.latitude.name.clone(),
                index: lat.end,
                len: ny,
            });
        }
        if lon.end > nx {
            return Err(DatasetError::IndexOutOfRange {
                axis: self.longitude.name.clone(),
                index: lon.end,
                len: nx,
            });
        }

        let mut variables: Vec<Variable> = Vec::with_capacity(names.len());
        for &name in names {
            if variables.iter().any(|v| v.name == name) {
                return Err(DatasetError::DuplicateVariable(name.to_string()));
            }
            let source = self
                .variable(name)
                .ok_or_else(|| DatasetError::UnknownVariable(name.to_string()))?;
            let mut data = Vec::with_capacity(times.len() * levels.len() * lat.len() * lon.len());
            for &t in times {
                for &k in levels {
                    for j in lat.clone() {
                        let row = ((t * nz + k) * ny + j) * nx;
                        data.extend_from_slice(&source.data[row + lon.start..row + lon.end]);
                    }
                }
            }
            variables.push(Variable {
                name: source.name.clone(),
                long_name: source.long_name.clone(),
                units: source.units.clone(),
                data,
            });
        }

        Ok(Dataset {
            times: times.iter().map(|&t| self.times[t]).collect(),
            vertical: self.vertical.take(levels.iter().copied()),
            latitude: self.latitude.take(lat),
            longitude: self.longitude.take(lon),
            variables,
        })
    }
}

/// Slack when deciding whether a value lies on a coordinate array.
const COORDINATE_EPSILON: f64 = 1e-9;

/// Fractional index of `value` in a monotonic coordinate array (ascending or
/// descending). `None` when `value` lies outside the array.
pub fn fractional_index(coords: &[f64], value: f64) -> Option<f64> {
    let n = coords.len();
    if n == 0 || value.is_nan() {
        return None;
    }
    if n == 1 {
        return ((value - coords[0]).abs() < COORDINATE_EPSILON).then_some(0.0);
    }

    let descending = coords[1] < coords[0];
    let (lo, hi) = if descending {
        (coords[n - 1], coords[0])
    } else {
        (coords[0], coords[n - 1])
    };
    if value < lo - COORDINATE_EPSILON || value > hi + COORDINATE_EPSILON {
        return None;
    }

    // First index whose coordinate has passed `value` in array order.
    let upper = if descending {
        coords.partition_point(|&c| c > value)
    } else {
        coords.partition_point(|&c| c < value)
    };
    let upper = upper.clamp(1, n - 1);
    let lower = upper - 1;

    let (c0, c1) = (coords[lower], coords[upper]);
    let t = ((value - c0) / (c1 - c0)).clamp(0.0, 1.0);
    Some(lower as f64 + t)
}

fn check_index(axis: &str, index: usize, len: usize) -> DatasetResult<()> {
    if index >= len {
        return Err(DatasetError::IndexOutOfRange {
            axis: axis.to_string(),
            index,
            len,
        });
    }
    Ok(())
}

/// Builder that validates axes and variable shapes.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    times: Vec<DateTime<Utc>>,
    axes: Vec<Axis>,
    variables: Vec<Variable>,
}

impl DatasetBuilder {
    pub fn times(mut self, times: Vec<DateTime<Utc>>) -> Self {
        self.times = times;
        self
    }

    /// Add a spatial axis; its role is resolved from its name at build time.
    pub fn axis(mut self, axis: Axis) -> Self {
        self.axes.push(axis);
        self
    }

    pub fn variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn build(self) -> DatasetResult<Dataset> {
        let mut latitude: Option<Axis> = None;
        let mut longitude: Option<Axis> = None;
        let mut vertical: Option<Axis> = None;

        for axis in self.axes {
            let role =
                AxisRole::from_name(&axis.name).ok_or_else(|| DatasetError::UnknownAxis(axis.name.clone()))?;
            if axis.is_empty() {
                return Err(DatasetError::EmptyAxis(axis.name));
            }
            if !axis.is_monotonic() {
                return Err(DatasetError::NonMonotonicAxis(axis.name));
            }

            let slot = match role {
                AxisRole::Latitude => &mut latitude,
                AxisRole::Longitude => &mut longitude,
                AxisRole::Vertical => &mut vertical,
            };
            if let Some(existing) = slot.as_ref() {
                return Err(DatasetError::DuplicateAxis {
                    role,
                    first: existing.name.clone(),
                    second: axis.name,
                });
            }
            *slot = Some(axis);
        }

        let latitude = latitude.ok_or(DatasetError::MissingAxis(AxisRole::Latitude))?;
        let longitude = longitude.ok_or(DatasetError::MissingAxis(AxisRole::Longitude))?;
        let vertical = vertical.ok_or(DatasetError::MissingAxis(AxisRole::Vertical))?;
        if self.times.is_empty() {
            return Err(DatasetError::EmptyAxis("time".to_string()));
        }

        let shape = [self.times.len(), vertical.len(), latitude.len(), longitude.len()];
        let expected: usize = shape.iter().product();
        for (i, variable) in self.variables.iter().enumerate() {
            if variable.data.len() != expected {
                return Err(DatasetError::ShapeMismatch {
                    name: variable.name.clone(),
                    expected,
                    actual: variable.data.len(),
                    shape,
                });
            }
            if self.variables[..i].iter().any(|v| v.name == variable.name) {
                return Err(DatasetError::DuplicateVariable(variable.name.clone()));
            }
        }

        tracing::debug!(
            shape = ?shape,
            variables = self.variables.len(),
            vertical = %vertical.name,
            "Built dataset"
        );

        Ok(Dataset {
            times: self.times,
            vertical,
            latitude,
            longitude,
            variables: self.variables,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_role_synonyms() {
        assert_eq!(AxisRole::from_name("Latitude"), Some(AxisRole::Latitude));
        assert_eq!(AxisRole::from_name("lon"), Some(AxisRole::Longitude));
        assert_eq!(AxisRole::from_name("isobaricInhPa"), Some(AxisRole::Vertical));
        assert_eq!(AxisRole::from_name("time"), None);
    }

    #[test]
    fn test_fractional_index_descending() {
        let lat = Axis::new("lat", vec![50.0, 40.0, 30.0]);
        assert_eq!(lat.fractional_index(45.0), Some(0.5));
        assert_eq!(lat.fractional_index(30.0), Some(2.0));
        assert_eq!(lat.fractional_index(55.0), None);
    }

    #[test]
    fn test_fractional_index_on_slices() {
        let levels = [1000.0, 850.0, 700.0, 500.0];
        assert_eq!(fractional_index(&levels, 850.0), Some(1.0));
        assert_eq!(fractional_index(&levels, 600.0), Some(2.5));
        assert_eq!(fractional_index(&levels, 1050.0), None);
        // Edge values within rounding slack still land on the axis
        assert_eq!(fractional_index(&levels, 500.0 - 1e-12), Some(3.0));
        assert_eq!(fractional_index(&[0.0, 1.0], 0.25), Some(0.25));
        assert_eq!(fractional_index(&[5.0], 5.0), Some(0.0));
        assert_eq!(fractional_index(&[], 5.0), None);
    }

    #[test]
    fn test_range_within() {
        let lon = Axis::new("lon", vec![-130.0, -120.0, -110.0, -100.0]);
        assert_eq!(lon.range_within(-125.0, -100.0), 1..4);
        assert_eq!(lon.range_within(0.0, 10.0), 0..0);
    }
}
