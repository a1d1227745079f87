//! PNG encoding for canvas snapshots and filled-contour rasters.
//!
//! Two color types are written: indexed (3) when the image holds at most
//! 256 distinct colors, which is always the case for band rasters, and
//! RGBA (6) otherwise. Scanlines are stored unfiltered and deflated with
//! `flate2`; chunk CRCs come from `crc32fast`.

use rayon::prelude::*;
use std::collections::HashMap;
use std::io::Write;

use crate::error::{RenderError, RenderResult};

/// The 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Palette entries available to an indexed PNG.
const MAX_PALETTE_SIZE: usize = 256;

/// Images at least this many pixels large are indexed in parallel.
const PARALLEL_THRESHOLD: usize = 64 * 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorType {
    Indexed,
    Rgba,
}

impl ColorType {
    fn code(self) -> u8 {
        match self {
            ColorType::Indexed => 3,
            ColorType::Rgba => 6,
        }
    }

    fn bytes_per_pixel(self) -> usize {
        match self {
            ColorType::Indexed => 1,
            ColorType::Rgba => 4,
        }
    }
}

/// Encode RGBA pixels, choosing indexed output when the colors fit a palette.
pub fn create_png_auto(pixels: &[u8], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    check_rgba_len(pixels, width, height)?;
    match index_colors(pixels) {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices),
        None => create_png(pixels, width, height),
    }
}

/// Encode RGBA pixels as a truecolor-with-alpha PNG.
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    check_rgba_len(pixels, width, height)?;
    let mut out = PngWriter::new(width, height, ColorType::Rgba);
    out.image_data(pixels)?;
    Ok(out.finish())
}

/// Encode palette indices. Band rasters pass their palette directly, with
/// index 0 reserved for the transparent "no band" entry.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[(u8, u8, u8, u8)],
    indices: &[u8],
) -> RenderResult<Vec<u8>> {
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(RenderError::PngEncoding(format!(
            "palette must hold 1..={} colors, got {}",
            MAX_PALETTE_SIZE,
            palette.len()
        )));
    }
    if indices.len() != width * height {
        return Err(RenderError::PngEncoding(format!(
            "{} indices for a {}x{} image",
            indices.len(),
            width,
            height
        )));
    }

    let mut out = PngWriter::new(width, height, ColorType::Indexed);
    let rgb: Vec<u8> = palette.iter().flat_map(|&(r, g, b, _)| [r, g, b]).collect();
    out.chunk(b"PLTE", &rgb);
    if palette.iter().any(|&(_, _, _, a)| a < 255) {
        let alpha: Vec<u8> = palette.iter().map(|&(_, _, _, a)| a).collect();
        out.chunk(b"tRNS", &alpha);
    }
    out.image_data(indices)?;
    Ok(out.finish())
}

fn check_rgba_len(pixels: &[u8], width: usize, height: usize) -> RenderResult<()> {
    if pixels.len() != width * height * 4 {
        return Err(RenderError::PngEncoding(format!(
            "{} bytes for a {}x{} RGBA image",
            pixels.len(),
            width,
            height
        )));
    }
    Ok(())
}

/// Palette and per-pixel indices for `pixels`, or `None` when more than
/// 256 colors occur. Palette order follows first appearance.
fn index_colors(pixels: &[u8]) -> Option<(Vec<(u8, u8, u8, u8)>, Vec<u8>)> {
    let mut lookup: HashMap<[u8; 4], u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    for px in pixels.chunks_exact(4) {
        let color = [px[0], px[1], px[2], px[3]];
        if lookup.contains_key(&color) {
            continue;
        }
        if palette.len() == MAX_PALETTE_SIZE {
            return None;
        }
        lookup.insert(color, palette.len() as u8);
        palette.push((color[0], color[1], color[2], color[3]));
    }

    let index_of = |px: &[u8]| lookup.get(&[px[0], px[1], px[2], px[3]]).copied().unwrap_or(0);
    let indices = if pixels.len() / 4 >= PARALLEL_THRESHOLD {
        pixels.par_chunks_exact(4).map(index_of).collect()
    } else {
        pixels.chunks_exact(4).map(index_of).collect()
    };
    Some((palette, indices))
}

/// Zlib stream of `height` rows, each prefixed with filter type 0.
fn deflate_rows(data: &[u8], row_bytes: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    if row_bytes > 0 {
        for row in data.chunks_exact(row_bytes).take(height) {
            encoder.write_all(&[0])?;
            encoder.write_all(row)?;
        }
    }
    encoder.finish()
}

/// Builds a PNG stream chunk by chunk.
struct PngWriter {
    buf: Vec<u8>,
    width: usize,
    height: usize,
    color: ColorType,
}

impl PngWriter {
    fn new(width: usize, height: usize, color: ColorType) -> Self {
        let mut writer = Self {
            buf: PNG_SIGNATURE.to_vec(),
            width,
            height,
            color,
        };

        let mut header = Vec::with_capacity(13);
        header.extend_from_slice(&(width as u32).to_be_bytes());
        header.extend_from_slice(&(height as u32).to_be_bytes());
        // bit depth, color type, compression, filter, interlace
        header.extend_from_slice(&[8, color.code(), 0, 0, 0]);
        writer.chunk(b"IHDR", &header);
        writer
    }

    fn chunk(&mut self, kind: &[u8; 4], data: &[u8]) {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(kind);
        hasher.update(data);

        self.buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
        self.buf.extend_from_slice(kind);
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(&hasher.finalize().to_be_bytes());
    }

    /// Deflate unfiltered scanlines into one IDAT chunk.
    fn image_data(&mut self, data: &[u8]) -> RenderResult<()> {
        let row_bytes = self.width * self.color.bytes_per_pixel();
        let compressed = deflate_rows(data, row_bytes, self.height)
            .map_err(|e| RenderError::PngEncoding(format!("deflate failed: {}", e)))?;
        self.chunk(b"IDAT", &compressed);
        Ok(())
    }

    fn finish(mut self) -> Vec<u8> {
        self.chunk(b"IEND", &[]);
        self.buf
    }
}
