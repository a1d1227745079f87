//! Error types for figure rendering.

use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while assembling, rasterizing or encoding figures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot allocate a {width}x{height} pixmap")]
    PixmapAllocation { width: u32, height: u32 },

    #[error("figure has no drawable area ({width}x{height})")]
    EmptyFigure { width: u32, height: u32 },

    #[error("SVG parse failed: {0}")]
    SvgParse(String),

    #[error("PNG encoding failed: {0}")]
    PngEncoding(String),

    #[error("GIF encoding failed: {0}")]
    GifEncoding(String),

    #[error("animation has no frames")]
    EmptyAnimation,

    #[error("frame is {actual:?}, animation expects {expected:?}")]
    FrameSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("invalid contour input: {0}")]
    InvalidField(String),
}

impl RenderError {
    pub fn invalid_field(message: impl Into<String>) -> Self {
        RenderError::InvalidField(message.into())
    }
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        RenderError::GifEncoding(err.to_string())
    }
}
