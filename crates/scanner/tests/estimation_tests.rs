//! Tests for the interactive transect picker.

use std::collections::VecDeque;
use std::io;

use renderer::{Figure, TitleLoc};
use scanner::estimation::{CONFIRM_PROMPT, REVISION_PROMPT};
use scanner::{estimation, parse_revision, Picker, Prompt, ScannerConfig, ScannerError, ScannerResult};
use scanner_common::StyleTable;
use test_utils::{time, transect, SyntheticGrid};

/// Answers prompts from a fixed script and records what was asked.
struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, message: &str) -> io::Result<String> {
        self.asked.push(message.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

fn plains_points() -> ([Option<f64>; 2], [Option<f64>; 2], [Option<f64>; 2]) {
    let [lat0, lon0, lat1, lon1] = transect::PLAINS_NS;
    let [lat2, lon2] = transect::PLAINS_SWEEP;
    ([Some(lat0), Some(lon0)], [Some(lat1), Some(lon1)], [Some(lat2), Some(lon2)])
}

// ============================================================================
// Revision parsing
// ============================================================================

#[test]
fn test_revision_updates_only_numeric_positions() {
    let mut points = [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0), Some(6.0)];
    let updated = parse_revision("10,x,20,-30,,40", &mut points);

    assert_eq!(updated, 4);
    assert_eq!(
        points,
        [Some(10.0), Some(2.0), Some(20.0), Some(-30.0), Some(5.0), Some(40.0)]
    );
}

#[test]
fn test_short_revision_keeps_tail() {
    let mut points = [None; 6];
    parse_revision(" 35.5 , -97", &mut points);
    assert_eq!(points, [Some(35.5), Some(-97.0), None, None, None, None]);
}

#[test]
fn test_empty_revision_changes_nothing() {
    let mut points = [Some(0.0); 6];
    assert_eq!(parse_revision("", &mut points), 0);
    assert_eq!(points, [Some(0.0); 6]);
}

// ============================================================================
// Picker sessions
// ============================================================================

#[test]
fn test_confirm_after_one_revision() {
    let ds = SyntheticGrid::conus().build();
    let styles = StyleTable::default();
    let (pos1, pos2, pos3) = plains_points();
    let mut prompt = ScriptedPrompt::new(&["n", transect::REVISION, "y"]);
    let mut shown: Vec<Figure> = Vec::new();
    let mut sink = |figure: &Figure| -> ScannerResult<()> {
        shown.push(figure.clone());
        Ok(())
    };

    let pairs = estimation(&ds, pos1, pos2, pos3, &styles, &mut prompt, &mut sink, &ScannerConfig::default()).unwrap();

    assert_eq!(pairs.transect, [32.0, -102.0, 46.0, -101.0]);
    assert_eq!(pairs.sweep, [32.0, -90.0]);
    assert_eq!(prompt.asked, vec![CONFIRM_PROMPT, REVISION_PROMPT, CONFIRM_PROMPT]);

    // One draft per round, redrawn with the revised points
    assert_eq!(shown.len(), 2);
    let markers = shown[1].axes().markers();
    assert_eq!(markers.len(), 3);
    assert_eq!((markers[0].x, markers[0].y), (-102.0, 32.0));
    assert_eq!(markers[0].color, [255, 0, 0, 255]);
    assert_eq!((markers[2].x, markers[2].y), (-90.0, 32.0));
    assert_eq!(shown[0].axes().markers()[1].y, 45.0);
}

#[test]
fn test_confirm_with_unset_points_asks_for_revision() {
    let ds = SyntheticGrid::conus().build();
    let styles = StyleTable::default();
    let mut prompt = ScriptedPrompt::new(&["y", "30,-100,45,-100,30,-95", "Yes"]);
    let mut drafts = 0;
    let mut marker_counts = Vec::new();
    let mut sink = |figure: &Figure| -> ScannerResult<()> {
        drafts += 1;
        marker_counts.push(figure.axes().markers().len());
        Ok(())
    };

    let pairs = estimation(
        &ds,
        [Some(30.0), None],
        [None, None],
        [None, None],
        &styles,
        &mut prompt,
        &mut sink,
        &ScannerConfig::default(),
    )
    .unwrap();

    assert_eq!(pairs.transect, transect::PLAINS_NS);
    assert_eq!(pairs.sweep, transect::PLAINS_SWEEP);
    assert_eq!(drafts, 2);
    assert_eq!(marker_counts, vec![0, 3]);
}

#[test]
fn test_closed_input_ends_session() {
    let ds = SyntheticGrid::conus().build();
    let styles = StyleTable::default();
    let (pos1, pos2, pos3) = plains_points();
    let mut prompt = ScriptedPrompt::new(&["n"]);
    let mut sink = |_: &Figure| -> ScannerResult<()> { Ok(()) };

    let err = estimation(&ds, pos1, pos2, pos3, &styles, &mut prompt, &mut sink, &ScannerConfig::default()).unwrap_err();
    match err {
        ScannerError::Prompt(e) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
        other => panic!("expected a prompt error, got {:?}", other),
    }
}

#[test]
fn test_sink_failure_propagates() {
    let ds = SyntheticGrid::conus().build();
    let styles = StyleTable::default();
    let (pos1, pos2, pos3) = plains_points();
    let mut prompt = ScriptedPrompt::new(&["y"]);
    let mut sink = |_: &Figure| -> ScannerResult<()> { Err(ScannerError::invalid_configuration("no display")) };

    let err = estimation(&ds, pos1, pos2, pos3, &styles, &mut prompt, &mut sink, &ScannerConfig::default()).unwrap_err();
    assert!(matches!(err, ScannerError::InvalidConfiguration(_)));
    assert!(prompt.asked.is_empty());
}

#[test]
fn test_config_sizes_map_and_is_validated() {
    let ds = SyntheticGrid::conus().build();
    let styles = StyleTable::default();
    let (pos1, pos2, pos3) = plains_points();

    let config = ScannerConfig {
        figure_width: 640,
        figure_height: 360,
        ..Default::default()
    };
    let mut prompt = ScriptedPrompt::new(&["y"]);
    let mut size = (0, 0);
    let mut sink = |figure: &Figure| -> ScannerResult<()> {
        size = (figure.width(), figure.height());
        Ok(())
    };
    estimation(&ds, pos1, pos2, pos3, &styles, &mut prompt, &mut sink, &config).unwrap();
    assert_eq!(size, (640, 360));

    let invalid = ScannerConfig {
        figure_width: 0,
        ..Default::default()
    };
    let mut prompt = ScriptedPrompt::new(&["y"]);
    let mut shown = 0;
    let mut sink = |_: &Figure| -> ScannerResult<()> {
        shown += 1;
        Ok(())
    };
    let err = estimation(&ds, pos1, pos2, pos3, &styles, &mut prompt, &mut sink, &invalid).unwrap_err();
    assert!(matches!(err, ScannerError::InvalidConfiguration(_)));
    assert_eq!(shown, 0);
    assert!(prompt.asked.is_empty());
}

// ============================================================================
// Drafted map
// ============================================================================

#[test]
fn test_map_titles_and_labels() {
    let ds = SyntheticGrid::conus().build();
    let styles = StyleTable::default();
    let picker = Picker::new(ScannerConfig::default());
    let mut prompt = ScriptedPrompt::new(&["y"]);
    let mut map: Option<Figure> = None;
    let mut sink = |figure: &Figure| -> ScannerResult<()> {
        map = Some(figure.clone());
        Ok(())
    };

    let (pos1, pos2, pos3) = plains_points();
    let initial = [pos1[0], pos1[1], pos2[0], pos2[1], pos3[0], pos3[1]];
    picker.run(&ds, initial, &styles, &mut prompt, &mut sink).unwrap();

    let map = map.unwrap();
    let suptitle = map.suptitle().unwrap();
    assert_eq!(
        suptitle.text,
        "Temperature (K)(black), Geopotential height (m)(black), Relative vorticity(1/s)"
    );
    assert_eq!(suptitle.y, 0.85);

    let ax = map.axes();
    assert_eq!(ax.title(TitleLoc::Left), Some("Pressure level: 500hPa"));
    assert_eq!(
        ax.title(TitleLoc::Right).map(str::to_string),
        Some(format!("Valid time: {}", time::REFERENCE_VALID_TIME))
    );
    assert_eq!(ax.xlabel(), Some("Longitude (Deg)"));
    assert_eq!(ax.ylabel(), Some("Latitude (Deg)"));
    assert_eq!(ax.xlim(), (-130.0, -60.0));
    assert_eq!(ax.ylim(), (20.0, 52.0));

    // 2° grid: ticks every 2 points (round half to even), labelled like floats
    let lat_ticks: Vec<String> = ax.y_ticks().into_iter().map(|t| t.label).collect();
    assert_eq!(lat_ticks.first().map(String::as_str), Some("20.0"));
    assert_eq!(lat_ticks.get(1).map(String::as_str), Some("24.0"));

    assert_eq!(ax.contour_layers().len(), 2);
    assert_eq!(ax.filled_layers().len(), 1);
    assert_eq!(map.colorbars().len(), 1);
    assert_eq!(map.colorbars()[0].label, "Relative vorticity(1/s)");
}

#[test]
fn test_unstyled_variables_skipped() {
    let ds = SyntheticGrid::conus().variables(&["q", "t"]).build();
    let styles = StyleTable::default();
    let mut prompt = ScriptedPrompt::new(&["y"]);
    let mut title = String::new();
    let mut layers = 0;
    let mut sink = |figure: &Figure| -> ScannerResult<()> {
        title = figure.suptitle().map(|s| s.text.clone()).unwrap_or_default();
        layers = figure.axes().contour_layers().len() + figure.axes().filled_layers().len();
        Ok(())
    };

    let (pos1, pos2, pos3) = plains_points();
    estimation(&ds, pos1, pos2, pos3, &styles, &mut prompt, &mut sink, &ScannerConfig::default()).unwrap();

    assert_eq!(title, "Temperature (K)(black)");
    assert_eq!(layers, 1);
}
