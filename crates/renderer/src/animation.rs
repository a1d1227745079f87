//! GIF animations assembled from rasterized frames.

use std::time::Duration;

use base64::Engine;
use image::codecs::gif::GifEncoder;
use image::{Delay, Frame, RgbaImage};

use crate::canvas::Canvas;
use crate::error::{RenderError, RenderResult};

/// Ordered frames shown at a fixed interval. The encoded GIF carries no
/// loop extension, so viewers play it once.
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<RgbaImage>,
    interval: Duration,
}

impl Animation {
    pub fn new(interval: Duration) -> Self {
        Self {
            frames: Vec::new(),
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// (width, height) of the frames, once the first one is in.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|f| f.dimensions())
    }

    /// Append a frame; every frame must match the size of the first.
    pub fn push_frame(&mut self, frame: RgbaImage) -> RenderResult<()> {
        if let Some(expected) = self.dimensions() {
            let actual = frame.dimensions();
            if actual != expected {
                return Err(RenderError::FrameSizeMismatch { expected, actual });
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Snapshot the current canvas contents as the next frame.
    pub fn capture(&mut self, canvas: &Canvas) -> RenderResult<()> {
        self.push_frame(canvas.to_rgba_image()?)
    }

    pub fn to_gif(&self) -> RenderResult<Vec<u8>> {
        if self.frames.is_empty() {
            return Err(RenderError::EmptyAnimation);
        }

        let delay_ms = self.interval.as_millis().min(u32::MAX as u128) as u32;
        let mut buf = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut buf, 10);
            for image in &self.frames {
                let frame = Frame::from_parts(
                    image.clone(),
                    0,
                    0,
                    Delay::from_numer_denom_ms(delay_ms, 1),
                );
                encoder.encode_frame(frame)?;
            }
        }

        tracing::debug!(frames = self.frames.len(), bytes = buf.len(), "Encoded GIF");
        Ok(buf)
    }

    /// `<img>` element embedding the GIF as a base64 data URI, for notebook
    /// and browser display. This stands in for an embedded `<video>`: the
    /// frames are encoded as an animated GIF, not a video stream.
    pub fn to_html_img(&self) -> RenderResult<String> {
        let gif = self.to_gif()?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(gif);
        Ok(format!(
            r#"<img src="data:image/gif;base64,{}" alt="animation" />"#,
            encoded
        ))
    }
}
