//! Filled contours rendered as band rasters.
//!
//! Every output pixel is mapped back to fractional grid indices, the field
//! is bilinearly sampled there, and the value is classified into the band
//! between two consecutive levels. The result is a palette-index raster
//! (index 0 = transparent) that encodes directly as an indexed PNG.

use rayon::prelude::*;
use scanner_common::grid::fractional_index;

use crate::colormap::Colormap;
use crate::error::{RenderError, RenderResult};
use crate::field::Field;
use crate::png::create_png_indexed;
use crate::style::Rgba;

/// Indexed PNG limits the palette to 256 entries, one of which is transparent.
pub const MAX_BANDS: usize = 255;

/// Band containing `value`: band `i` covers `levels[i] <= v < levels[i + 1]`,
/// the last band also includes its upper level. Values outside the levels
/// (and NaN) belong to no band.
pub fn band_index(levels: &[f64], value: f64) -> Option<usize> {
    let n = levels.len();
    if n < 2 || value.is_nan() || value < levels[0] || value > levels[n - 1] {
        return None;
    }
    let upper = levels.partition_point(|&l| l <= value);
    Some(upper.saturating_sub(1).min(n - 2))
}

#[derive(Debug, Clone)]
pub struct FilledContour {
    field: Field,
    levels: Vec<f64>,
    colors: Vec<Rgba>,
}

impl FilledContour {
    pub fn new(field: Field, levels: Vec<f64>, colors: Vec<Rgba>) -> RenderResult<Self> {
        if levels.len() < 2 {
            return Err(RenderError::invalid_field("filled contours need at least two levels"));
        }
        if levels.windows(2).any(|w| w[1] <= w[0]) {
            return Err(RenderError::invalid_field("levels must be strictly increasing"));
        }
        if levels.len() - 1 > MAX_BANDS {
            return Err(RenderError::invalid_field(format!(
                "{} bands exceed the limit of {}",
                levels.len() - 1,
                MAX_BANDS
            )));
        }
        if colors.len() != levels.len() - 1 {
            return Err(RenderError::invalid_field(format!(
                "{} colors for {} bands",
                colors.len(),
                levels.len() - 1
            )));
        }
        Ok(Self {
            field,
            levels,
            colors,
        })
    }

    /// Band colors sampled from a colormap at the band midpoints.
    pub fn with_colormap(field: Field, levels: Vec<f64>, cmap: &Colormap) -> RenderResult<Self> {
        let colors = cmap.band_colors(&levels);
        Self::new(field, levels, colors)
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Band of a value, if any.
    pub fn classify(&self, value: f32) -> Option<usize> {
        band_index(&self.levels, value as f64)
    }

    /// Palette-index raster of `width` × `height` pixels.
    ///
    /// `to_data` maps a pixel-center position (relative to the raster's
    /// top-left corner) to data coordinates.
    pub fn rasterize<F>(&self, width: usize, height: usize, to_data: F) -> Vec<u8>
    where
        F: Fn(f64, f64) -> (f64, f64) + Sync,
    {
        let mut indices = vec![0u8; width * height];
        if width == 0 {
            return indices;
        }

        indices
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(py, row)| {
                for (px, slot) in row.iter_mut().enumerate() {
                    let (x, y) = to_data(px as f64 + 0.5, py as f64 + 0.5);
                    let (Some(col), Some(grid_row)) = (
                        fractional_index(self.field.x(), x),
                        fractional_index(self.field.y(), y),
                    ) else {
                        continue;
                    };
                    let value = self.field.sample(col, grid_row);
                    if let Some(band) = self.classify(value) {
                        *slot = band as u8 + 1;
                    }
                }
            });

        indices
    }

    /// Palette matching [`FilledContour::rasterize`] indices.
    pub fn palette(&self) -> Vec<(u8, u8, u8, u8)> {
        std::iter::once((0, 0, 0, 0))
            .chain(self.colors.iter().map(|c| (c[0], c[1], c[2], c[3])))
            .collect()
    }

    /// Rasterize and encode as an indexed PNG.
    pub fn to_png<F>(&self, width: usize, height: usize, to_data: F) -> RenderResult<Vec<u8>>
    where
        F: Fn(f64, f64) -> (f64, f64) + Sync,
    {
        let indices = self.rasterize(width, height, to_data);
        create_png_indexed(width, height, &self.palette(), &indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_index() {
        let levels = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(band_index(&levels, 0.0), Some(0));
        assert_eq!(band_index(&levels, 1.5), Some(1));
        assert_eq!(band_index(&levels, 3.0), Some(2));
        assert_eq!(band_index(&levels, 3.1), None);
        assert_eq!(band_index(&levels, -0.1), None);
        assert_eq!(band_index(&levels, f64::NAN), None);
    }

    #[test]
    fn test_rasterize_identity_mapping() {
        // Field increases left to right: 0..3 over x = 0..3
        let field = Field::new(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0],
        )
        .unwrap();
        let filled = FilledContour::new(
            field,
            vec![1.0, 2.0, 3.0],
            vec![[255, 0, 0, 255], [0, 0, 255, 255]],
        )
        .unwrap();
        // Pixel (px + 0.5) maps to x = px + 0.5 (minus the half-pixel offset)
        let indices = filled.rasterize(3, 1, |px, _| (px - 0.5, 0.5));
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(filled.palette().len(), 3);
    }
}
