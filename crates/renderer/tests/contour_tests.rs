//! Tests for isoline tracing and label placement.

use renderer::contour::{
    collect_label_positions, connect_segments, contour_field, contour_length, generate_all_contours,
    march_squares, smooth_contour, Contour, ContourConfig, LabelPosition, Point, Segment,
};
use renderer::Field;
use test_utils::assert_approx_eq;

fn seg(x0: f32, y0: f32, x1: f32, y1: f32) -> Segment {
    Segment {
        start: Point::new(x0, y0),
        end: Point::new(x1, y1),
    }
}

fn polyline(points: &[(f32, f32)], closed: bool) -> Contour {
    Contour {
        level: 5.0,
        points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        closed,
    }
}

fn unsmoothed(levels: &[f32]) -> ContourConfig {
    ContourConfig {
        levels: levels.to_vec(),
        smoothing_passes: 0,
        ..Default::default()
    }
}

// ============================================================================
// Marching squares
// ============================================================================

#[test]
fn test_degenerate_grids_trace_nothing() {
    assert!(march_squares(&[1.0], 1, 1, 0.5).is_empty());
    assert!(march_squares(&[], 0, 0, 0.5).is_empty());
    assert!(march_squares(&[1.0, 2.0], 3, 3, 0.5).is_empty());
}

#[test]
fn test_uniform_cells_trace_nothing() {
    // Below, above, and exactly at the level (counted as above)
    for value in [1.0, 10.0, 5.0] {
        assert!(march_squares(&[value; 4], 2, 2, 5.0).is_empty(), "value {}", value);
    }
}

#[test]
fn test_lone_corner_cuts_it_off() {
    let segments = march_squares(&[10.0, 0.0, 0.0, 0.0], 2, 2, 5.0);
    assert_eq!(segments.len(), 1);
    // left edge to top edge, both at the halfway crossing
    assert_eq!(segments[0].start, Point::new(0.0, 0.5));
    assert_eq!(segments[0].end, Point::new(0.5, 0.0));
}

#[test]
fn test_gradient_orientation() {
    // Increasing to the right gives a vertical crossing at the interpolated x
    let across = march_squares(&[0.0, 100.0, 0.0, 100.0], 2, 2, 25.0);
    assert_eq!(across.len(), 1);
    assert_approx_eq!(across[0].start.x as f64, 0.25, 1e-6);
    assert_approx_eq!(across[0].end.x as f64, 0.25, 1e-6);

    // Increasing downward gives a horizontal one
    let down = march_squares(&[0.0, 0.0, 10.0, 10.0], 2, 2, 5.0);
    assert_eq!(down.len(), 1);
    assert_eq!(down[0].start.y, down[0].end.y);
}

#[test]
fn test_saddles_emit_two_segments() {
    assert_eq!(march_squares(&[10.0, 0.0, 0.0, 10.0], 2, 2, 5.0).len(), 2);
    assert_eq!(march_squares(&[0.0, 10.0, 10.0, 0.0], 2, 2, 5.0).len(), 2);
}

#[test]
fn test_cells_touching_nan_are_skipped() {
    #[rustfmt::skip]
    let data = [
        f32::NAN, 0.0, 10.0,
        0.0,      0.0, 10.0,
    ];
    let segments = march_squares(&data, 3, 2, 5.0);
    // Only the right-hand cell contributes
    assert_eq!(segments.len(), 1);
    assert!(segments.iter().all(|s| s.start.x >= 1.0 && s.end.x >= 1.0));
}

#[test]
fn test_ramp_crosses_every_row() {
    let (width, height) = (12, 8);
    let data: Vec<f32> = (0..width * height).map(|i| (i % width) as f32).collect();
    let segments = march_squares(&data, width, height, 6.5);
    assert_eq!(segments.len(), height - 1);
    assert!(segments.iter().all(|s| s.start.x == 6.5));
}

// ============================================================================
// Joining segments
// ============================================================================

#[test]
fn test_join_empty_and_single() {
    assert!(connect_segments(Vec::new()).is_empty());

    let one = connect_segments(vec![seg(0.0, 0.0, 1.0, 1.0)]);
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].points.len(), 2);
    assert!(!one[0].closed);
}

#[test]
fn test_join_grows_both_ends() {
    // The seed is the middle segment; one neighbour is stored reversed
    let contours = connect_segments(vec![
        seg(1.0, 0.0, 2.0, 0.0),
        seg(3.0, 0.0, 2.0, 0.0),
        seg(0.0, 0.0, 1.0, 0.0),
    ]);
    assert_eq!(contours.len(), 1);
    let xs: Vec<f32> = contours[0].points.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_join_detects_rings() {
    let contours = connect_segments(vec![
        seg(0.0, 0.0, 1.0, 0.0),
        seg(1.0, 1.0, 0.0, 1.0),
        seg(1.0, 0.0, 1.0, 1.0),
        seg(0.0, 1.0, 0.0, 0.0),
    ]);
    assert_eq!(contours.len(), 1);
    assert!(contours[0].closed);
    assert_eq!(contours[0].points.len(), 4);
}

#[test]
fn test_join_keeps_disjoint_lines_apart() {
    let contours = connect_segments(vec![seg(0.0, 0.0, 1.0, 0.0), seg(10.0, 10.0, 11.0, 10.0)]);
    assert_eq!(contours.len(), 2);
}

// ============================================================================
// Smoothing
// ============================================================================

#[test]
fn test_smoothing_needs_three_points_and_a_pass() {
    let bend = polyline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], false);
    assert_eq!(smooth_contour(&bend, 0).points, bend.points);

    let stub = polyline(&[(0.0, 0.0), (1.0, 0.0)], false);
    assert_eq!(smooth_contour(&stub, 3).points, stub.points);
}

#[test]
fn test_open_line_keeps_endpoints() {
    let tent = Contour {
        level: 273.15,
        ..polyline(&[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)], false)
    };
    let smoothed = smooth_contour(&tent, 2);

    assert_eq!(smoothed.points.first(), Some(&Point::new(0.0, 0.0)));
    assert_eq!(smoothed.points.last(), Some(&Point::new(10.0, 0.0)));
    assert_eq!(smoothed.level, 273.15);
    // The apex is cut away
    assert!(smoothed.points.iter().all(|p| p.y < 5.0));
}

#[test]
fn test_ring_stays_closed() {
    let square = polyline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], true);
    let smoothed = smooth_contour(&square, 1);
    assert!(smoothed.closed);
    assert_eq!(smoothed.points.len(), 8);
    assert_eq!(smoothed.points[0], Point::new(0.25, 0.0));
}

// ============================================================================
// Layer configuration
// ============================================================================

#[test]
fn test_config_defaults() {
    let config = ContourConfig::default();
    assert!(config.levels.is_empty());
    assert_eq!(config.line_width, 1.0);
    assert_eq!(config.line_color, [0, 0, 0, 255]);
    assert_eq!(config.smoothing_passes, 1);
    assert!(!config.labels_enabled);
}

#[test]
fn test_alternate_labels_start_at_second_level() {
    let config = ContourConfig {
        levels: vec![280.0, 284.0, 288.0, 292.0, 296.0, 300.0],
        ..Default::default()
    }
    .label_alternate_levels();

    assert_eq!(config.label_levels, vec![284.0, 292.0, 300.0]);
    assert!(config.is_labelled(292.0));
    assert!(!config.is_labelled(288.0));

    let disabled = ContourConfig {
        labels_enabled: false,
        ..config
    };
    assert!(!disabled.is_labelled(292.0));
}

#[test]
fn test_level_labels_truncate() {
    let config = ContourConfig::default();
    assert_eq!(config.get_level_label(5820.0), "5820");
    assert_eq!(config.get_level_label(302.9), "302");
    assert_eq!(config.get_level_label(-4.5), "-4");
}

// ============================================================================
// Whole fields
// ============================================================================

#[test]
fn test_nested_rings_per_level() {
    #[rustfmt::skip]
    let data = [
        0.0, 0.0, 0.0,  0.0, 0.0,
        0.0, 5.0, 5.0,  5.0, 0.0,
        0.0, 5.0, 10.0, 5.0, 0.0,
        0.0, 5.0, 5.0,  5.0, 0.0,
        0.0, 0.0, 0.0,  0.0, 0.0,
    ];
    let contours = generate_all_contours(&data, 5, 5, &unsmoothed(&[2.5, 7.5]));

    let levels: Vec<f32> = contours.iter().map(|c| c.level).collect();
    assert_eq!(levels, vec![2.5, 7.5]);
    assert!(contours.iter().all(|c| c.closed));
}

#[test]
fn test_field_contours_use_data_coordinates() {
    // The 15 isoline sits halfway between x = 10 and x = 20
    let field = Field::new(
        vec![0.0, 10.0, 20.0, 30.0],
        vec![1000.0, 850.0, 700.0],
        [0.0, 10.0, 20.0, 30.0].repeat(3),
    )
    .unwrap();

    let contours = contour_field(&field, &unsmoothed(&[15.0]));
    assert_eq!(contours.len(), 1);
    assert!(contours[0].points.iter().all(|p| (p.x - 15.0).abs() < 1e-4));
    let ys: Vec<f32> = contours[0].points.iter().map(|p| p.y).collect();
    assert!(ys.contains(&1000.0) && ys.contains(&700.0));
}

#[test]
fn test_field_contours_follow_uneven_axis() {
    let field = Field::new(vec![0.0, 1.0, 5.0], vec![0.0, 1.0], [0.0, 10.0, 20.0].repeat(2)).unwrap();
    let contours = contour_field(&field, &unsmoothed(&[15.0]));
    assert_eq!(contours.len(), 1);
    // Index 1.5 lies halfway between x = 1 and x = 5
    assert_approx_eq!(contours[0].points[0].x as f64, 3.0, 1e-4);
}

// ============================================================================
// Label placement
// ============================================================================

const PAGE: [f32; 4] = [0.0, 0.0, 1000.0, 1000.0];

fn flat_line(length: f32) -> Contour {
    Contour {
        level: 12.0,
        points: (0..=10).map(|i| Point::new(i as f32 * length / 10.0, 500.0)).collect(),
        closed: false,
    }
}

fn labelled(spacing: f32) -> ContourConfig {
    ContourConfig {
        labels_enabled: true,
        label_spacing: spacing,
        ..Default::default()
    }
}

#[test]
fn test_length_includes_ring_closure() {
    assert_approx_eq!(contour_length(&flat_line(1000.0)) as f64, 1000.0, 1e-3);
    let square = polyline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)], true);
    assert_approx_eq!(contour_length(&square) as f64, 4.0, 1e-6);
}

#[test]
fn test_labels_spread_evenly() {
    let mut positions: Vec<LabelPosition> = Vec::new();
    collect_label_positions(&flat_line(1000.0), &labelled(300.0), &mut positions, PAGE);

    // floor(1000 / 300) labels, a quarter of the line apart
    let xs: Vec<f32> = positions.iter().map(|p| p.x.round()).collect();
    assert_eq!(xs, vec![250.0, 500.0, 750.0]);
    assert!(positions.iter().all(|p| p.text == "12" && p.angle == 0.0 && p.level == 12.0));
}

#[test]
fn test_labels_on_reversed_line_read_upright() {
    let mut line = flat_line(1000.0);
    line.points.reverse();
    let mut positions = Vec::new();
    collect_label_positions(&line, &labelled(600.0), &mut positions, PAGE);

    assert_eq!(positions.len(), 1);
    assert!(positions[0].angle.abs() <= std::f32::consts::FRAC_PI_2);
}

#[test]
fn test_short_lines_and_crowded_labels_dropped() {
    let config = labelled(300.0);
    let mut positions = Vec::new();
    collect_label_positions(&flat_line(100.0), &config, &mut positions, PAGE);
    assert!(positions.is_empty());

    collect_label_positions(&flat_line(1000.0), &config, &mut positions, PAGE);
    let placed = positions.len();
    collect_label_positions(&flat_line(1000.0), &config, &mut positions, PAGE);
    assert_eq!(positions.len(), placed);
}

#[test]
fn test_labels_respect_bounds_margin() {
    let mut positions = Vec::new();
    collect_label_positions(&flat_line(1000.0), &labelled(300.0), &mut positions, [0.0, 0.0, 400.0, 1000.0]);
    assert_eq!(positions.len(), 1);
    assert!(positions[0].x < 400.0 - 20.0);
}
