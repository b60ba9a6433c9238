//! Finds glyphs that overlap removal leaves wonky.
//!
//! Glyph outlines are drawn with skrifa at every named instance of a font,
//! merged with linesweeper and scored with [`wonkiness`].

mod font;
mod overlap;
mod pen;

use std::{io::Write, path::Path};

use serde::Serialize;
use thiserror::Error;
use wonkiness::{
    run_batch, BatchOutcome, Cancellation, EvaluationOptions, Evaluator, ExitStatus, Reporter,
    RunError, Summary, WonkinessReport,
};

pub use font::{Font, FontError, GlyphEntry, Instance, SkrifaGlyphSource, DEFAULT_INSTANCE};
pub use overlap::{LinesweeperRemover, DEFAULT_ACCURACY};
pub use pen::OutlineRecorder;

/// Errors that abort a check.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Font(#[from] FontError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// The glyphs and instances to evaluate.
///
/// `None` selects every simple glyph or every instance of the font. Names
/// that the font does not have are still evaluated, and fail individually.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    pub glyphs: Option<Vec<String>>,
    pub instances: Option<Vec<String>>,
}

/// Instance name that stands for every instance of the font.
pub const ALL_INSTANCES: &str = "all";

impl Selection {
    /// Builds a selection from command line values.
    ///
    /// `glyphset` is whitespace separated. An instance list containing
    /// [`ALL_INSTANCES`], in any case, selects every instance.
    pub fn from_args(glyphset: Option<&str>, instances: Option<Vec<String>>) -> Self {
        let instances = instances.filter(|names| {
            !names
                .iter()
                .any(|name| name.trim().eq_ignore_ascii_case(ALL_INSTANCES))
        });
        Self {
            glyphs: glyphset.map(|set| set.split_ascii_whitespace().map(str::to_owned).collect()),
            instances,
        }
    }
}

/// Responds to a user interrupt during a check.
///
/// The first interrupt cancels the batch so that the reports already
/// finished can still be written. Returns true on any later interrupt,
/// when the caller should exit immediately.
pub fn interrupt(cancel: &Cancellation) -> bool {
    if cancel.is_cancelled() {
        return true;
    }
    log::warn!("interrupted, finishing reports in flight");
    cancel.cancel();
    false
}

/// Result of checking one font.
#[derive(Debug)]
pub struct CheckOutcome {
    pub reporter: Reporter,
    pub cancelled: bool,
}

/// Evaluates the selected glyphs of a font at the selected instances.
pub fn check_font(
    font: &Font,
    selection: &Selection,
    options: EvaluationOptions,
    jobs: Option<usize>,
    cancel: &Cancellation,
) -> Result<CheckOutcome, Error> {
    let glyphs = match &selection.glyphs {
        Some(glyphs) => glyphs.clone(),
        None => font.simple_glyphs().map(str::to_owned).collect(),
    };
    let instances = match &selection.instances {
        Some(instances) => instances.clone(),
        None => font
            .instances()
            .iter()
            .map(|instance| instance.name().to_owned())
            .collect(),
    };
    let evaluator = Evaluator::new(font.glyph_source(), LinesweeperRemover::default(), options);
    let BatchOutcome { reports, cancelled } =
        run_batch(&evaluator, &glyphs, &instances, jobs, cancel)?;
    Ok(CheckOutcome {
        reporter: Reporter::new(reports),
        cancelled,
    })
}

#[derive(Serialize)]
struct JsonReport<'a> {
    font: &'a Path,
    summary: Summary,
    exit_status: ExitStatus,
    reports: &'a [WonkinessReport],
}

/// Writes every report, ranked, as a JSON document.
pub fn write_json(font: &Path, reporter: &Reporter, sink: impl Write) -> Result<(), Error> {
    let report = JsonReport {
        font,
        summary: reporter.summary(),
        exit_status: reporter.exit_status(),
        reports: reporter.reports(),
    };
    serde_json::to_writer_pretty(sink, &report)?;
    Ok(())
}
