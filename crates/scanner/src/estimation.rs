//! Interactive transect picker.
//!
//! The picker draws the full grid with the candidate points, asks the user
//! to confirm them, and otherwise applies a comma-separated revision and
//! redraws. It loops until the user confirms a complete set of points.

use std::io::{self, BufRead, Write};

use renderer::Figure;
use scanner_common::{Dataset, StyleTable};

use crate::config::ScannerConfig;
use crate::error::ScannerResult;
use crate::plotting;
use crate::sweep::EndpointPairs;

pub const CONFIRM_PROMPT: &str = "No change/Exit? [y/n]: ";
pub const REVISION_PROMPT: &str = "Type change: ";

/// Source of the user's answers.
pub trait Prompt {
    /// Show `message` and return one line of input without its newline.
    fn ask(&mut self, message: &str) -> io::Result<String>;
}

/// Prompts on standard output and reads answers from standard input.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, message: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        stdout.write_all(message.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }
}

/// Receives each drafted map so it can be shown to the user.
pub trait FigureSink {
    fn show(&mut self, figure: &Figure) -> ScannerResult<()>;
}

impl<F> FigureSink for F
where
    F: FnMut(&Figure) -> ScannerResult<()>,
{
    fn show(&mut self, figure: &Figure) -> ScannerResult<()> {
        self(figure)
    }
}

/// Apply a comma-separated revision positionally to the six coordinates
/// (origin lat, origin lon, end lat, end lon, sweep lat, sweep lon).
/// Entries that are empty or not numbers leave their coordinate unchanged;
/// entries past the sixth are ignored. Returns how many coordinates changed.
pub fn parse_revision(input: &str, points: &mut [Option<f64>; 6]) -> usize {
    let mut updated = 0;
    for (slot, token) in points.iter_mut().zip(input.split(',')) {
        match token.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => {
                *slot = Some(value);
                updated += 1;
            }
            _ => {}
        }
    }
    updated
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Complete endpoints, if all six coordinates are set.
fn endpoints(points: &[Option<f64>; 6]) -> Option<EndpointPairs> {
    match *points {
        [Some(lat0), Some(lon0), Some(lat1), Some(lon1), Some(lat2), Some(lon2)] => {
            Some(EndpointPairs::new([lat0, lon0, lat1, lon1], [lat2, lon2]))
        }
        _ => None,
    }
}

/// State of the picker loop.
#[derive(Debug, Clone, PartialEq)]
enum PickerState {
    Draft([Option<f64>; 6]),
    Confirmed(EndpointPairs),
}

/// The transect picker with its rendering configuration.
#[derive(Debug, Clone, Default)]
pub struct Picker {
    config: ScannerConfig,
}

impl Picker {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Run the confirm/revise loop until the user confirms complete points.
    pub fn run<P, S>(
        &self,
        dataset: &Dataset,
        initial: [Option<f64>; 6],
        styles: &StyleTable,
        prompt: &mut P,
        sink: &mut S,
    ) -> ScannerResult<EndpointPairs>
    where
        P: Prompt + ?Sized,
        S: FigureSink + ?Sized,
    {
        let mut state = PickerState::Draft(initial);
        let mut round = 0usize;

        loop {
            let mut points = match state {
                PickerState::Confirmed(pairs) => {
                    tracing::info!(
                        transect = ?pairs.transect,
                        sweep = ?pairs.sweep,
                        rounds = round,
                        "Transect confirmed"
                    );
                    return Ok(pairs);
                }
                PickerState::Draft(points) => points,
            };
            round += 1;

            let figure = plotting::map_figure(dataset, &points, styles, &self.config)?;
            sink.show(&figure)?;

            let answer = prompt.ask(CONFIRM_PROMPT)?;
            if is_affirmative(&answer) {
                match endpoints(&points) {
                    Some(pairs) => {
                        state = PickerState::Confirmed(pairs);
                        continue;
                    }
                    None => {
                        tracing::warn!(points = ?points, "Cannot confirm with unset coordinates");
                    }
                }
            }

            let revision = prompt.ask(REVISION_PROMPT)?;
            let updated = parse_revision(&revision, &mut points);
            tracing::debug!(round, updated, points = ?points, "Revised transect points");
            state = PickerState::Draft(points);
        }
    }
}

/// Pick a transect interactively. `pos1` is the origin, `pos2` the end of
/// the initial transect and `pos3` the origin of the last transect; each
/// coordinate may be unset. `config` sizes the map figure and is validated
/// before anything is drawn.
#[allow(clippy::too_many_arguments)]
pub fn estimation<P, S>(
    dataset: &Dataset,
    pos1: [Option<f64>; 2],
    pos2: [Option<f64>; 2],
    pos3: [Option<f64>; 2],
    styles: &StyleTable,
    prompt: &mut P,
    sink: &mut S,
    config: &ScannerConfig,
) -> ScannerResult<EndpointPairs>
where
    P: Prompt + ?Sized,
    S: FigureSink + ?Sized,
{
    config.validate()?;
    let initial = [pos1[0], pos1[1], pos2[0], pos2[1], pos3[0], pos3[1]];
    Picker::new(config.clone()).run(dataset, initial, styles, prompt, sink)
}
