//! Parallel evaluation of every (glyph, instance) pair.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use rayon::prelude::*;

use crate::{Evaluator, GlyphSource, OverlapRemover, RunError, WonkinessReport};

/// A flag that stops a running batch.
///
/// Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The reports produced by a batch.
#[derive(Clone, Debug, Default)]
pub struct BatchOutcome {
    /// Reports completed before any cancellation, in glyph-major order.
    pub reports: Vec<WonkinessReport>,
    /// True if the batch was cancelled before every pair was evaluated.
    pub cancelled: bool,
}

/// Evaluates every glyph at every instance.
///
/// `jobs` sets the number of worker threads, `None` uses one per core and
/// `Some(1)` evaluates the pairs in order on a single thread. Pairs not yet
/// started when `cancel` is raised are skipped and pairs in flight are
/// discarded.
pub fn run_batch<S, R>(
    evaluator: &Evaluator<S, R>,
    glyphs: &[String],
    instances: &[String],
    jobs: Option<usize>,
    cancel: &Cancellation,
) -> Result<BatchOutcome, RunError>
where
    S: GlyphSource + 'static,
    R: OverlapRemover + 'static,
{
    if instances.is_empty() {
        return Err(RunError::NoInstances);
    }
    if glyphs.is_empty() {
        return Err(RunError::NoGlyphs);
    }
    let pairs: Vec<(&str, &str)> = glyphs
        .iter()
        .flat_map(|glyph| {
            instances
                .iter()
                .map(move |instance| (glyph.as_str(), instance.as_str()))
        })
        .collect();
    log::info!(
        "evaluating {} glyphs at {} instances",
        glyphs.len(),
        instances.len()
    );
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .build()?;
    let reports: Vec<WonkinessReport> = pool.install(|| {
        pairs
            .par_iter()
            .filter_map(|(glyph, instance)| {
                if cancel.is_cancelled() {
                    return None;
                }
                let report = evaluator.evaluate(glyph, instance);
                if cancel.is_cancelled() {
                    log::debug!("discarding {glyph} @ {instance}, batch was cancelled");
                    return None;
                }
                log::info!("{report}");
                Some(report)
            })
            .collect()
    });
    let cancelled = cancel.is_cancelled();
    if cancelled {
        log::warn!(
            "batch cancelled after {} of {} pairs",
            reports.len(),
            pairs.len()
        );
    }
    Ok(BatchOutcome { reports, cancelled })
}
