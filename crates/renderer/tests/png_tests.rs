//! Tests for PNG encoding: format choice, the band-raster encoder, and
//! decodability of what we write.

use renderer::colormap::Colormap;
use renderer::png::{create_png, create_png_auto, create_png_indexed, PNG_SIGNATURE};

/// Chunk types in file order.
fn chunk_types(png: &[u8]) -> Vec<String> {
    let mut types = Vec::new();
    let mut at = PNG_SIGNATURE.len();
    while at + 8 <= png.len() {
        let len = u32::from_be_bytes([png[at], png[at + 1], png[at + 2], png[at + 3]]) as usize;
        types.push(String::from_utf8_lossy(&png[at + 4..at + 8]).into_owned());
        at += 12 + len;
    }
    types
}

/// IHDR color type: 3 indexed, 6 RGBA.
fn color_type(png: &[u8]) -> u8 {
    png[25]
}

fn decode(png: &[u8]) -> Vec<u8> {
    image::load_from_memory(png).unwrap().to_rgba8().into_raw()
}

/// A tilted stack of twelve colormap bands, like a filled cross-section.
fn banded(width: usize, height: usize) -> Vec<u8> {
    let levels: Vec<f64> = (0..=12).map(f64::from).collect();
    let colors = Colormap::from_name("RdBu_r").unwrap().band_colors(&levels);
    (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .flat_map(|(x, y)| {
            let t = 0.8 * y as f32 / height as f32 + 0.2 * x as f32 / width as f32;
            colors[((t * 12.0) as usize).min(11)]
        })
        .collect()
}

// ============================================================================
// Format choice
// ============================================================================

#[test]
fn test_few_colors_are_indexed() {
    let pixels = [255, 0, 0, 255, 0, 255, 0, 255, 0, 255, 0, 255, 255, 0, 0, 255];
    let png = create_png_auto(&pixels, 2, 2).unwrap();

    assert!(png.starts_with(&PNG_SIGNATURE));
    assert_eq!(color_type(&png), 3);
    // All opaque: no transparency chunk
    assert_eq!(chunk_types(&png), vec!["IHDR", "PLTE", "IDAT", "IEND"]);
    assert_eq!(decode(&png), pixels);
}

#[test]
fn test_palette_limit_is_inclusive() {
    let gray: Vec<u8> = (0..=255u8).flat_map(|v| [v, v, v, 255]).collect();
    assert_eq!(color_type(&create_png_auto(&gray, 256, 1).unwrap()), 3);

    let mut busy = gray.clone();
    busy.extend_from_slice(&[1, 2, 3, 255]);
    let png = create_png_auto(&busy, 257, 1).unwrap();
    assert_eq!(color_type(&png), 6);
    assert_eq!(decode(&png), busy);
}

#[test]
fn test_forced_rgba_keeps_alpha() {
    let pixels = [255, 0, 0, 255, 0, 0, 0, 0, 0, 255, 0, 128, 0, 0, 255, 255];
    let png = create_png(&pixels, 2, 2).unwrap();
    assert_eq!(color_type(&png), 6);
    assert_eq!(decode(&png), pixels);
}

#[test]
fn test_buffer_length_checked() {
    assert!(create_png_auto(&[0u8; 12], 2, 2).is_err());
    assert!(create_png(&[0u8; 12], 2, 2).is_err());
    assert!(create_png_indexed(2, 2, &[(0, 0, 0, 0)], &[0; 3]).is_err());
}

// ============================================================================
// Band rasters
// ============================================================================

#[test]
fn test_band_raster_marks_transparent_entry() {
    let palette = [(0, 0, 0, 0), (255, 0, 0, 255), (0, 0, 255, 255)];
    let png = create_png_indexed(3, 2, &palette, &[0, 1, 2, 2, 1, 0]).unwrap();

    assert_eq!(chunk_types(&png), vec!["IHDR", "PLTE", "tRNS", "IDAT", "IEND"]);
    let rgba = decode(&png);
    assert_eq!(&rgba[..4], &[0, 0, 0, 0]);
    assert_eq!(&rgba[4..8], &[255, 0, 0, 255]);
}

#[test]
fn test_palette_size_checked() {
    assert!(create_png_indexed(1, 1, &[], &[0]).is_err());
    let oversized = vec![(0, 0, 0, 255); 257];
    assert!(create_png_indexed(1, 1, &oversized, &[0]).is_err());
}

#[test]
fn test_banded_image_compresses_better_indexed() {
    // Large enough to take the parallel indexing path
    let pixels = banded(128, 128);
    let indexed = create_png_auto(&pixels, 128, 128).unwrap();
    let rgba = create_png(&pixels, 128, 128).unwrap();

    assert_eq!(color_type(&indexed), 3);
    assert!(indexed.len() < rgba.len(), "{} >= {}", indexed.len(), rgba.len());
    assert_eq!(decode(&indexed), pixels);
}

#[test]
fn test_flat_image_is_tiny() {
    let png = create_png_auto(&[128, 64, 32, 255].repeat(100 * 100), 100, 100).unwrap();
    assert!(png.len() < 1000, "{} bytes", png.len());
}
