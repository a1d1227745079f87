//! 2-D scalar fields on rectilinear coordinates.

use crate::error::{RenderError, RenderResult};

/// A row-major scalar field: one row per `y` coordinate, one column per `x`
/// coordinate. Coordinates must be strictly monotonic in either direction;
/// NaN values are treated as missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    x: Vec<f64>,
    y: Vec<f64>,
    values: Vec<f32>,
}

impl Field {
    pub fn new(x: Vec<f64>, y: Vec<f64>, values: Vec<f32>) -> RenderResult<Self> {
        if x.len() < 2 || y.len() < 2 {
            return Err(RenderError::invalid_field(format!(
                "need at least 2x2 points, got {}x{}",
                x.len(),
                y.len()
            )));
        }
        if values.len() != x.len() * y.len() {
            return Err(RenderError::invalid_field(format!(
                "{} values for a {}x{} grid",
                values.len(),
                x.len(),
                y.len()
            )));
        }
        if !is_strictly_monotonic(&x) || !is_strictly_monotonic(&y) {
            return Err(RenderError::invalid_field("coordinates must be strictly monotonic"));
        }
        Ok(Self { x, y, values })
    }

    pub fn width(&self) -> usize {
        self.x.len()
    }

    pub fn height(&self) -> usize {
        self.y.len()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Coordinate at a fractional column index.
    pub fn x_at(&self, index: f32) -> f64 {
        coordinate_at(&self.x, index as f64)
    }

    /// Coordinate at a fractional row index.
    pub fn y_at(&self, index: f32) -> f64 {
        coordinate_at(&self.y, index as f64)
    }

    /// Bilinear sample at fractional (column, row) indices.
    pub fn sample(&self, col: f64, row: f64) -> f32 {
        let w = self.width();
        let h = self.height();
        let col = col.clamp(0.0, (w - 1) as f64);
        let row = row.clamp(0.0, (h - 1) as f64);

        let x1 = (col.floor() as usize).min(w - 2);
        let y1 = (row.floor() as usize).min(h - 2);
        let x2 = x1 + 1;
        let y2 = y1 + 1;

        let dx = (col - x1 as f64) as f32;
        let dy = (row - y1 as f64) as f32;

        // Get the four surrounding values
        let v11 = self.values[y1 * w + x1];
        let v21 = self.values[y1 * w + x2];
        let v12 = self.values[y2 * w + x1];
        let v22 = self.values[y2 * w + x2];

        // Interpolate
        let v1 = v11 * (1.0 - dx) + v21 * dx;
        let v2 = v12 * (1.0 - dx) + v22 * dx;
        v1 * (1.0 - dy) + v2 * dy
    }
}

fn is_strictly_monotonic(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[1] > w[0]) || values.windows(2).all(|w| w[1] < w[0])
}

/// Linear interpolation of a coordinate array at a fractional index.
pub fn coordinate_at(coords: &[f64], index: f64) -> f64 {
    let n = coords.len();
    match n {
        0 => f64::NAN,
        1 => coords[0],
        _ => {
            let index = index.clamp(0.0, (n - 1) as f64);
            let lower = (index.floor() as usize).min(n - 2);
            let t = index - lower as f64;
            coords[lower] * (1.0 - t) + coords[lower + 1] * t
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_validation() {
        assert!(Field::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0; 4]).is_ok());
        assert!(Field::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0; 3]).is_err());
        assert!(Field::new(vec![0.0], vec![0.0, 1.0], vec![0.0; 2]).is_err());
        assert!(Field::new(vec![0.0, 0.0], vec![0.0, 1.0], vec![0.0; 4]).is_err());
    }

    #[test]
    fn test_bilinear_sample() {
        let field = Field::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0, 10.0, 20.0, 30.0]).unwrap();
        assert!((field.sample(0.5, 0.5) - 15.0).abs() < 1e-6);
        assert!((field.sample(1.0, 0.0) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_coordinate_at_descending_pressure() {
        let levels = [1000.0, 850.0, 700.0, 500.0];
        assert!((coordinate_at(&levels, 2.5) - 600.0).abs() < 1e-9);
        assert_eq!(coordinate_at(&levels, 9.0), 500.0);
    }
}
