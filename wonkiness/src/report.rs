//! Per pair reports and their ranking.

use std::{cmp::Ordering, fmt};

use crate::{node::NodeScore, EvaluationError, EvaluationOptions};

/// The outcome of evaluating one glyph at one instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WonkinessReport {
    glyph: String,
    instance: String,
    baseline: Option<f64>,
    post: Option<f64>,
    delta: Option<f64>,
    flagged: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    worst_node: Option<NodeScore>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    failure: Option<Failure>,
}

/// Which step of an evaluation failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FailureKind {
    Instantiation,
    OverlapRemoval,
    Timeout,
    Panicked,
}

/// A recorded evaluation failure.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Failure {
    pub kind: FailureKind,
    pub reason: String,
}

impl From<&EvaluationError> for Failure {
    fn from(error: &EvaluationError) -> Self {
        let kind = match error {
            EvaluationError::Instantiation(_) => FailureKind::Instantiation,
            EvaluationError::OverlapRemoval(_) => FailureKind::OverlapRemoval,
            EvaluationError::Timeout(_) => FailureKind::Timeout,
            EvaluationError::Panicked(_) => FailureKind::Panicked,
        };
        Self {
            kind,
            reason: error.to_string(),
        }
    }
}

impl WonkinessReport {
    pub(crate) fn completed(
        glyph: &str,
        instance: &str,
        baseline: f64,
        post: f64,
        options: &EvaluationOptions,
        worst_node: Option<NodeScore>,
    ) -> Self {
        let delta = post - baseline;
        Self {
            glyph: glyph.to_owned(),
            instance: instance.to_owned(),
            baseline: Some(baseline),
            post: Some(post),
            delta: Some(delta),
            flagged: options.flags(baseline, post),
            worst_node,
            failure: None,
        }
    }

    /// A report for a pair that could not be fully evaluated.
    ///
    /// `baseline` is kept when the failure happened after it was measured.
    pub(crate) fn failed(
        glyph: &str,
        instance: &str,
        baseline: Option<f64>,
        error: &EvaluationError,
    ) -> Self {
        Self {
            glyph: glyph.to_owned(),
            instance: instance.to_owned(),
            baseline,
            post: None,
            delta: None,
            flagged: false,
            worst_node: None,
            failure: Some(error.into()),
        }
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Wonkiness before overlap removal.
    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    /// Wonkiness after overlap removal, `None` if it is unavailable.
    pub fn post(&self) -> Option<f64> {
        self.post
    }

    pub fn delta(&self) -> Option<f64> {
        self.delta
    }

    /// The change as a percentage of the baseline.
    ///
    /// Returns `None` when there is no delta or the baseline is zero.
    pub fn relative_change(&self) -> Option<f64> {
        match (self.baseline, self.delta) {
            (Some(baseline), Some(delta)) if baseline > 0.0 => Some(delta / baseline * 100.0),
            _ => None,
        }
    }

    pub fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// The highest scoring node of the outline after overlap removal.
    pub fn worst_node(&self) -> Option<&NodeScore> {
        self.worst_node.as_ref()
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

impl fmt::Display for WonkinessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}: ", self.glyph, self.instance)?;
        if let Some(failure) = &self.failure {
            return write!(f, "{}", failure.reason);
        }
        let (Some(baseline), Some(post), Some(delta)) = (self.baseline, self.post, self.delta)
        else {
            return write!(f, "unavailable");
        };
        write!(f, "{baseline:.4} -> {post:.4} (Δ {delta:+.4}")?;
        if let Some(pct) = self.relative_change() {
            write!(f, ", {pct:+.1}%")?;
        }
        write!(f, ")")?;
        if let Some(node) = &self.worst_node {
            write!(
                f,
                ", worst node at ({}, {})",
                node.position.x, node.position.y
            )?;
        }
        Ok(())
    }
}

/// Process exit status for a completed run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ExitStatus {
    /// Every pair was evaluated and none was flagged.
    Clean,
    /// Every pair was evaluated and at least one was flagged.
    DefectsFound,
    /// At least one pair failed.
    Errors,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::DefectsFound => 1,
            Self::Errors => 2,
        }
    }
}

/// Counts over a set of reports.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Summary {
    pub evaluated: usize,
    pub flagged: usize,
    pub failed: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pairs evaluated, {} flagged, {} failed",
            self.evaluated, self.flagged, self.failed
        )
    }
}

/// Ranks reports by how much overlap removal increased their wonkiness.
#[derive(Clone, Debug, Default)]
pub struct Reporter {
    reports: Vec<WonkinessReport>,
}

impl Reporter {
    /// Sorts the reports by descending delta.
    ///
    /// Ties are broken by glyph name and then instance name. Reports with
    /// no delta sort last.
    pub fn new(reports: impl IntoIterator<Item = WonkinessReport>) -> Self {
        let mut reports: Vec<_> = reports.into_iter().collect();
        reports.sort_by(compare);
        Self { reports }
    }

    /// All reports, in ranked order.
    pub fn reports(&self) -> &[WonkinessReport] {
        &self.reports
    }

    /// The flagged reports, in ranked order.
    ///
    /// The iterator can be cloned to restart it and `take(n)` gives the top
    /// `n`.
    pub fn flagged(&self) -> impl Iterator<Item = &WonkinessReport> + Clone + '_ {
        self.reports.iter().filter(|report| report.is_flagged())
    }

    pub fn failures(&self) -> impl Iterator<Item = &WonkinessReport> + Clone + '_ {
        self.reports.iter().filter(|report| report.is_failure())
    }

    pub fn summary(&self) -> Summary {
        Summary {
            evaluated: self.reports.len(),
            flagged: self.flagged().count(),
            failed: self.failures().count(),
        }
    }

    /// Errors take precedence over defects.
    pub fn exit_status(&self) -> ExitStatus {
        let summary = self.summary();
        if summary.failed > 0 {
            ExitStatus::Errors
        } else if summary.flagged > 0 {
            ExitStatus::DefectsFound
        } else {
            ExitStatus::Clean
        }
    }
}

fn compare(a: &WonkinessReport, b: &WonkinessReport) -> Ordering {
    let by_delta = match (a.delta, b.delta) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_delta
        .then_with(|| a.glyph.cmp(&b.glyph))
        .then_with(|| a.instance.cmp(&b.instance))
}
