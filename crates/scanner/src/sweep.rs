//! Sweep geometry: the family of parallel transects traced between the
//! initial transect and the sweep start.

use scanner_common::LatLon;
use serde::{Deserialize, Serialize};

use crate::error::{ScannerError, ScannerResult};
use crate::geodesic;

/// Endpoints confirmed by the transect picker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndpointPairs {
    /// Origin and transect end: `[lat0, lon0, lat1, lon1]`.
    pub transect: [f64; 4],
    /// Origin of the last transect in the sweep: `[lat2, lon2]`.
    pub sweep: [f64; 2],
}

impl EndpointPairs {
    pub fn new(transect: [f64; 4], sweep: [f64; 2]) -> Self {
        Self { transect, sweep }
    }

    pub fn origin(&self) -> LatLon {
        LatLon::new(self.transect[0], self.transect[1])
    }

    pub fn end(&self) -> LatLon {
        LatLon::new(self.transect[2], self.transect[3])
    }

    pub fn sweep_start(&self) -> LatLon {
        LatLon::new(self.sweep[0], self.sweep[1])
    }

    /// `(Δlat, Δlon)` from the origin to the transect end.
    pub fn displacement(&self) -> (f64, f64) {
        let (origin, end) = (self.origin(), self.end());
        (end.lat - origin.lat, end.lon - origin.lon)
    }

    /// Step count used when none is requested: the distance in degrees
    /// between the origin and the sweep start, rounded. This treats degrees
    /// as a step count and is only a heuristic.
    pub fn default_steps(&self) -> usize {
        let (origin, sweep) = (self.origin(), self.sweep_start());
        let distance = ((origin.lat - sweep.lat).powi(2) + (origin.lon - sweep.lon).powi(2)).sqrt();
        distance.round() as usize
    }
}

/// Number of transects in a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Steps {
    /// Derive the count from the endpoints ([`EndpointPairs::default_steps`]).
    #[default]
    Default,
    Count(usize),
}

impl Steps {
    pub fn resolve(&self, pairs: &EndpointPairs) -> usize {
        match self {
            Steps::Default => pairs.default_steps(),
            Steps::Count(n) => *n,
        }
    }
}

impl From<Option<usize>> for Steps {
    fn from(steps: Option<usize>) -> Self {
        steps.map_or(Steps::Default, Steps::Count)
    }
}

/// Two parallel point arrays; transect `i` runs from `near[i]` to `far[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPath {
    near: Vec<LatLon>,
    far: Vec<LatLon>,
}

impl SweepPath {
    /// Wrap precomputed arrays, e.g. the path of an earlier run.
    pub fn new(near: Vec<LatLon>, far: Vec<LatLon>) -> ScannerResult<Self> {
        if near.len() != far.len() {
            return Err(ScannerError::invalid_configuration(format!(
                "sweep arrays differ in length: {} near points, {} far points",
                near.len(),
                far.len()
            )));
        }
        if near.is_empty() {
            return Err(ScannerError::invalid_configuration("sweep path has no transects"));
        }
        if let Some(bad) = near.iter().chain(&far).find(|p| !p.is_finite()) {
            return Err(ScannerError::invalid_configuration(format!(
                "sweep point {:?} is not finite",
                bad
            )));
        }
        Ok(Self { near, far })
    }

    /// Interpolate `steps` origins along the great circle from the origin
    /// to the sweep start and shift each by the transect displacement.
    pub fn from_endpoints(pairs: &EndpointPairs, steps: Steps) -> ScannerResult<Self> {
        let count = steps.resolve(pairs);
        if count < 2 {
            return Err(ScannerError::invalid_configuration(format!(
                "a sweep needs at least 2 steps, got {} ({:?})",
                count, steps
            )));
        }

        let (d_lat, d_lon) = pairs.displacement();
        let near = geodesic::great_circle_points(pairs.origin(), pairs.sweep_start(), count);
        let far = near
            .iter()
            .map(|p| LatLon::new(p.lat + d_lat, p.lon + d_lon))
            .collect();

        tracing::debug!(
            steps = count,
            d_lat,
            d_lon,
            heading_deg = geodesic::initial_bearing(pairs.origin(), pairs.sweep_start()).to_degrees(),
            "Computed sweep path"
        );

        Self::new(near, far)
    }

    pub fn len(&self) -> usize {
        self.near.len()
    }

    pub fn is_empty(&self) -> bool {
        self.near.is_empty()
    }

    pub fn near(&self) -> &[LatLon] {
        &self.near
    }

    pub fn far(&self) -> &[LatLon] {
        &self.far
    }

    /// Endpoints of transect `index`.
    pub fn transect(&self, index: usize) -> Option<(LatLon, LatLon)> {
        Some((*self.near.get(index)?, *self.far.get(index)?))
    }
}
