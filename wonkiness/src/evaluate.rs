//! Before and after measurement of a single (glyph, instance) pair.

use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::{mpsc, Arc},
    thread,
    time::Duration,
};

use crate::{
    EvaluationError, EvaluationOptions, ExternalCall, InstantiationError, Outline,
    OverlapRemovalError, TimeoutError, WonkinessReport,
};

/// Supplies concrete outlines for a glyph at a named instance.
pub trait GlyphSource: Send + Sync {
    fn instantiate(&self, glyph: &str, instance: &str) -> Result<Outline, InstantiationError>;
}

/// Merges the overlapping paths of an outline.
pub trait OverlapRemover: Send + Sync {
    fn remove_overlaps(&self, outline: &Outline) -> Result<Outline, OverlapRemovalError>;
}

impl<F> GlyphSource for F
where
    F: Fn(&str, &str) -> Result<Outline, InstantiationError> + Send + Sync,
{
    fn instantiate(&self, glyph: &str, instance: &str) -> Result<Outline, InstantiationError> {
        self(glyph, instance)
    }
}

impl<F> OverlapRemover for F
where
    F: Fn(&Outline) -> Result<Outline, OverlapRemovalError> + Send + Sync,
{
    fn remove_overlaps(&self, outline: &Outline) -> Result<Outline, OverlapRemovalError> {
        self(outline)
    }
}

/// Measures wonkiness before and after overlap removal.
///
/// Holds no per-pair state, so a single evaluator can be shared by any
/// number of threads.
pub struct Evaluator<S, R> {
    source: Arc<S>,
    remover: Arc<R>,
    options: EvaluationOptions,
}

impl<S, R> Evaluator<S, R>
where
    S: GlyphSource + 'static,
    R: OverlapRemover + 'static,
{
    pub fn new(source: S, remover: R, options: EvaluationOptions) -> Self {
        Self::from_shared(Arc::new(source), Arc::new(remover), options)
    }

    pub fn from_shared(source: Arc<S>, remover: Arc<R>, options: EvaluationOptions) -> Self {
        Self {
            source,
            remover,
            options,
        }
    }

    pub fn options(&self) -> &EvaluationOptions {
        &self.options
    }

    /// Evaluates one pair.
    ///
    /// Failures are recorded in the returned report rather than returned as
    /// errors, so one bad pair never prevents evaluation of the others.
    pub fn evaluate(&self, glyph: &str, instance: &str) -> WonkinessReport {
        let tolerances = &self.options.tolerances;
        let outline = match self.instantiate(glyph, instance) {
            Ok(outline) => outline,
            Err(e) => {
                log::warn!("{glyph} @ {instance}: {e}");
                return WonkinessReport::failed(glyph, instance, None, &e);
            }
        };
        let baseline = outline.wonkiness(tolerances);
        let merged = match self.remove_overlaps(outline) {
            Ok(merged) => merged,
            Err(e) => {
                log::warn!("{glyph} @ {instance}: {e}");
                return WonkinessReport::failed(glyph, instance, Some(baseline), &e);
            }
        };
        let post = merged.wonkiness(tolerances);
        log::debug!("{glyph} @ {instance}: {baseline} -> {post}");
        WonkinessReport::completed(
            glyph,
            instance,
            baseline,
            post,
            &self.options,
            merged.worst_node(tolerances),
        )
    }

    fn instantiate(&self, glyph: &str, instance: &str) -> Result<Outline, EvaluationError> {
        let source = self.source.clone();
        let (glyph, instance) = (glyph.to_owned(), instance.to_owned());
        self.call(ExternalCall::Instantiate, move || {
            source.instantiate(&glyph, &instance)
        })
    }

    fn remove_overlaps(&self, outline: Outline) -> Result<Outline, EvaluationError> {
        let remover = self.remover.clone();
        let outline = Arc::new(outline);
        self.call(ExternalCall::RemoveOverlaps, move || {
            remover.remove_overlaps(&outline)
        })
    }

    fn call<T, E, F>(&self, call: ExternalCall, f: F) -> Result<T, EvaluationError>
    where
        T: Send + 'static,
        E: Into<EvaluationError> + Send + 'static,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        match self.options.timeout {
            Some(limit) => run_with_timeout(call, limit, self.options.retries, f),
            None => catch_unwind(AssertUnwindSafe(&f))
                .map_err(|_| EvaluationError::Panicked(call))?
                .map_err(Into::into),
        }
    }
}

/// Runs `f` on a helper thread, waiting at most `limit` for each attempt.
///
/// An attempt that times out is abandoned: its thread keeps running until
/// `f` returns but its result is dropped.
fn run_with_timeout<T, E, F>(
    call: ExternalCall,
    limit: Duration,
    retries: u32,
    f: F,
) -> Result<T, EvaluationError>
where
    T: Send + 'static,
    E: Into<EvaluationError> + Send + 'static,
    F: Fn() -> Result<T, E> + Send + Sync + 'static,
{
    let f = Arc::new(f);
    let attempts = retries.saturating_add(1);
    for attempt in 1..=attempts {
        let (send, recv) = mpsc::channel();
        let f = f.clone();
        thread::spawn(move || {
            let result = catch_unwind(AssertUnwindSafe(|| f()));
            // The receiver is gone if this attempt already timed out
            let _ = send.send(result);
        });
        match recv.recv_timeout(limit) {
            Ok(Ok(result)) => return result.map_err(Into::into),
            Ok(Err(_)) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(EvaluationError::Panicked(call))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                log::warn!("{call} timed out after {limit:?} (attempt {attempt} of {attempts})");
            }
        }
    }
    Err(TimeoutError {
        call,
        limit,
        attempts,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use kurbo::BezPath;

    use super::*;
    use crate::report::FailureKind;

    fn square(_: &str, _: &str) -> Result<Outline, InstantiationError> {
        let path = BezPath::from_svg("M0,0 L100,0 L100,100 L0,100 Z").unwrap();
        Ok(Outline::from_bez_path(&path)?)
    }

    fn identity(outline: &Outline) -> Result<Outline, OverlapRemovalError> {
        Ok(outline.clone())
    }

    #[test]
    fn unchanged_outline_is_not_flagged() {
        let evaluator = Evaluator::new(square, identity, EvaluationOptions::default());
        let report = evaluator.evaluate("square", "Regular");
        assert_eq!(report.baseline(), Some(0.0));
        assert_eq!(report.delta(), Some(0.0));
        assert!(!report.is_flagged());
        assert!(!report.is_failure());
    }

    #[test]
    fn overlap_removal_failure_keeps_baseline() {
        let fail = |_: &Outline| -> Result<Outline, OverlapRemovalError> {
            Err(OverlapRemovalError::new("boom"))
        };
        let evaluator = Evaluator::new(square, fail, EvaluationOptions::default());
        let report = evaluator.evaluate("square", "Regular");
        assert_eq!(report.baseline(), Some(0.0));
        assert_eq!(report.post(), None);
        assert_eq!(report.failure().unwrap().kind, FailureKind::OverlapRemoval);
    }

    #[test]
    fn panics_are_contained() {
        let explode = |_: &str, _: &str| -> Result<Outline, InstantiationError> {
            panic!("font is on fire")
        };
        let evaluator = Evaluator::new(explode, identity, EvaluationOptions::default());
        let report = evaluator.evaluate("a", "Regular");
        assert_eq!(report.failure().unwrap().kind, FailureKind::Panicked);

        let options = EvaluationOptions::default().with_timeout(Some(Duration::from_secs(5)));
        let evaluator = Evaluator::new(explode, identity, options);
        let report = evaluator.evaluate("a", "Regular");
        assert_eq!(report.failure().unwrap().kind, FailureKind::Panicked);
    }

    #[test]
    fn slow_call_is_retried_then_surfaced() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let slow = move |_: &str, _: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(500));
            square("", "")
        };
        let options = EvaluationOptions::default()
            .with_timeout(Some(Duration::from_millis(20)))
            .with_retries(1);
        let evaluator = Evaluator::new(slow, identity, options);
        let err = evaluator.instantiate("a", "Regular").unwrap_err();
        assert_eq!(
            err,
            EvaluationError::Timeout(TimeoutError {
                call: ExternalCall::Instantiate,
                limit: Duration::from_millis(20),
                attempts: 2,
            })
        );
        assert!(calls.load(Ordering::SeqCst) >= 1);
        let report = evaluator.evaluate("a", "Regular");
        assert_eq!(report.failure().unwrap().kind, FailureKind::Timeout);
    }

    #[test]
    fn retry_recovers_from_one_slow_attempt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let first_is_slow = move |_: &str, _: &str| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                thread::sleep(Duration::from_millis(500));
            }
            square("", "")
        };
        let options = EvaluationOptions::default()
            .with_timeout(Some(Duration::from_millis(100)))
            .with_retries(1);
        let evaluator = Evaluator::new(first_is_slow, identity, options);
        let report = evaluator.evaluate("a", "Regular");
        assert!(!report.is_failure(), "{report}");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
