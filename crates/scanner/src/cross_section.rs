//! Vertical cross-sections interpolated along a great circle.

use chrono::{DateTime, Utc};
use renderer::Field;
use scanner_common::{Axis, Dataset, LatLon};

use crate::error::{ScannerError, ScannerResult};
use crate::geodesic;

/// One variable sampled along a transect, `[vertical][along-track]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionVariable {
    pub name: String,
    pub values: Vec<f32>,
}

/// Every variable of a dataset sampled along the path from `start` to `end`.
#[derive(Debug, Clone)]
pub struct CrossSection {
    start: LatLon,
    end: LatLon,
    points: Vec<LatLon>,
    vertical: Axis,
    valid_time: DateTime<Utc>,
    variables: Vec<SectionVariable>,
}

impl CrossSection {
    /// Sample all variables of `dataset` at `points` great-circle points
    /// between `start` and `end`. The dataset must hold a single time step.
    pub fn extract(dataset: &Dataset, start: LatLon, end: LatLon, points: usize) -> ScannerResult<Self> {
        let [nt, nz, ny, nx] = dataset.shape();
        if nt != 1 {
            return Err(ScannerError::invalid_configuration(format!(
                "cross-sections need a single time step, the dataset holds {}; select one with tidx",
                nt
            )));
        }
        if points < 2 {
            return Err(ScannerError::invalid_configuration(format!(
                "a cross-section needs at least 2 points, got {}",
                points
            )));
        }
        let valid_time = dataset.times()[0];

        let path = geodesic::great_circle_points(start, end, points);
        let stencils: Vec<Option<Stencil>> = path
            .iter()
            .map(|p| Stencil::locate(dataset.latitude(), dataset.longitude(), *p))
            .collect();

        let mut variables = Vec::with_capacity(dataset.variable_names().len());
        for name in dataset.variable_names() {
            let mut values = Vec::with_capacity(nz * points);
            for level in 0..nz {
                let plane = dataset.field(name, 0, level)?;
                values.extend(
                    stencils
                        .iter()
                        .map(|s| s.as_ref().map_or(f32::NAN, |s| s.apply(plane, nx, ny))),
                );
            }
            variables.push(SectionVariable {
                name: name.to_string(),
                values,
            });
        }

        let outside = stencils.iter().filter(|s| s.is_none()).count();
        tracing::debug!(
            start = %start,
            end = %end,
            points,
            levels = nz,
            outside,
            "Extracted cross-section"
        );

        Ok(Self {
            start,
            end,
            points: path,
            vertical: dataset.vertical().clone(),
            valid_time,
            variables,
        })
    }

    pub fn start(&self) -> LatLon {
        self.start
    }

    pub fn end(&self) -> LatLon {
        self.end
    }

    /// Along-track sample positions.
    pub fn points(&self) -> &[LatLon] {
        &self.points
    }

    pub fn vertical(&self) -> &Axis {
        &self.vertical
    }

    pub fn valid_time(&self) -> &DateTime<Utc> {
        &self.valid_time
    }

    /// Sampled variables in dataset order.
    pub fn variables(&self) -> &[SectionVariable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&SectionVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// The section of `name` as a renderable field: x is the along-track
    /// sample index, y the vertical coordinate.
    pub fn to_field(&self, name: &str) -> ScannerResult<Field> {
        let variable = self
            .variable(name)
            .ok_or_else(|| scanner_common::DatasetError::UnknownVariable(name.to_string()))?;
        let x = (0..self.points.len()).map(|i| i as f64).collect();
        let field = Field::new(x, self.vertical.values.clone(), variable.values.clone())?;
        Ok(field)
    }
}

/// Bilinear interpolation weights for one point of a lat/lon grid.
#[derive(Debug, Clone, Copy)]
struct Stencil {
    row: usize,
    col: usize,
    ty: f64,
    tx: f64,
}

impl Stencil {
    fn locate(latitude: &Axis, longitude: &Axis, point: LatLon) -> Option<Self> {
        let fy = latitude.fractional_index(point.lat)?;
        let fx = longitude.fractional_index(point.lon)?;
        let row = (fy.floor() as usize).min(latitude.len().saturating_sub(2));
        let col = (fx.floor() as usize).min(longitude.len().saturating_sub(2));
        Some(Self {
            row,
            col,
            ty: fy - row as f64,
            tx: fx - col as f64,
        })
    }

    fn apply(&self, plane: &[f32], nx: usize, ny: usize) -> f32 {
        let row1 = (self.row + 1).min(ny - 1);
        let col1 = (self.col + 1).min(nx - 1);
        let v00 = plane[self.row * nx + self.col] as f64;
        let v01 = plane[self.row * nx + col1] as f64;
        let v10 = plane[row1 * nx + self.col] as f64;
        let v11 = plane[row1 * nx + col1] as f64;

        let top = v00 * (1.0 - self.tx) + v01 * self.tx;
        let bottom = v10 * (1.0 - self.tx) + v11 * self.tx;
        (top * (1.0 - self.ty) + bottom * self.ty) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use scanner_common::Variable;

    /// 3 × 3 grid where each value is `lat + 10 * lon`, on two levels.
    fn planar_dataset() -> Dataset {
        let lats = vec![0.0, 1.0, 2.0];
        let lons = vec![10.0, 11.0, 12.0];
        let mut data = Vec::new();
        for level in 0..2 {
            for &lat in &lats {
                for &lon in &lons {
                    data.push((lat + 10.0 * lon + 1000.0 * level as f64) as f32);
                }
            }
        }
        Dataset::builder()
            .times(vec![Utc.with_ymd_and_hms(2021, 8, 29, 12, 0, 0).unwrap()])
            .axis(Axis::new("pressure", vec![850.0, 500.0]).with_attrs("pressure", "hPa"))
            .axis(Axis::new("lat", lats))
            .axis(Axis::new("lon", lons))
            .variable(Variable::new("t", data))
            .build()
            .unwrap()
    }

    #[test]
    fn test_bilinear_is_exact_on_planes() {
        let ds = planar_dataset();
        let section = CrossSection::extract(&ds, LatLon::new(0.5, 10.5), LatLon::new(0.5, 11.5), 3).unwrap();
        let t = &section.variable("t").unwrap().values;
        assert_eq!(t.len(), 6);
        assert!((t[0] - 105.5).abs() < 1e-3);
        assert!((t[2] - 115.5).abs() < 1e-3);
        assert!((t[3] - 1105.5).abs() < 1e-3);
    }

    #[test]
    fn test_points_outside_grid_are_nan() {
        let ds = planar_dataset();
        let section = CrossSection::extract(&ds, LatLon::new(1.0, 11.0), LatLon::new(1.0, 13.0), 3).unwrap();
        let t = &section.variable("t").unwrap().values;
        assert!(!t[0].is_nan());
        assert!(t[2].is_nan());
    }

    #[test]
    fn test_to_field_axes() {
        let ds = planar_dataset();
        let section = CrossSection::extract(&ds, LatLon::new(0.0, 10.0), LatLon::new(2.0, 12.0), 4).unwrap();
        let field = section.to_field("t").unwrap();
        assert_eq!(field.x(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(field.y(), &[850.0, 500.0]);
        assert!(section.to_field("q").is_err());
    }
}
