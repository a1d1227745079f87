//! Raster canvas: rasterizes figures through usvg/resvg into a reusable
//! tiny-skia pixmap.

use std::sync::Arc;

use image::RgbaImage;

use crate::error::{RenderError, RenderResult};
use crate::figure::Figure;
use crate::png::create_png_auto;

/// A pixmap plus the font database used for text, reused across renders.
///
/// Loading system fonts is the expensive part of rasterizing a figure, so
/// an animation acquires one canvas and renders every frame into it.
pub struct Canvas {
    pixmap: tiny_skia::Pixmap,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let pixmap = allocate(width, height)?;
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::debug!(width, height, faces = fontdb.len(), "Allocated canvas");
        Ok(Self {
            pixmap,
            fontdb: Arc::new(fontdb),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Rasterize `figure`, replacing the previous contents. The pixmap is
    /// reallocated when the figure size differs.
    pub fn render(&mut self, figure: &Figure) -> RenderResult<()> {
        if figure.width() != self.width() || figure.height() != self.height() {
            self.pixmap = allocate(figure.width(), figure.height())?;
        }

        let svg = figure.to_svg()?;
        let options = usvg::Options {
            font_family: figure.font_family().to_string(),
            fontdb: self.fontdb.clone(),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&svg, &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        self.pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut self.pixmap.as_mut());
        Ok(())
    }

    /// Raw pixel data. The background is opaque, so premultiplied and
    /// straight alpha coincide.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        create_png_auto(self.pixmap.data(), self.width() as usize, self.height() as usize)
    }

    pub fn to_rgba_image(&self) -> RenderResult<RgbaImage> {
        RgbaImage::from_raw(self.width(), self.height(), self.pixmap.data().to_vec()).ok_or(
            RenderError::PixmapAllocation {
                width: self.width(),
                height: self.height(),
            },
        )
    }
}

fn allocate(width: u32, height: u32) -> RenderResult<tiny_skia::Pixmap> {
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyFigure { width, height });
    }
    tiny_skia::Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation { width, height })
}

impl Figure {
    /// Rasterize into a fresh canvas and encode as PNG.
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        let mut canvas = Canvas::new(self.width(), self.height())?;
        canvas.render(self)?;
        canvas.to_png()
    }
}
