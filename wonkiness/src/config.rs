//! Numeric tolerances and evaluation options.

use std::time::Duration;

/// Default bound on `Δ = W₁ − W₀` above which a pair is flagged.
///
/// Scores depend on the arc length approximation and on the units of the
/// outline, so this is a starting point rather than a calibrated constant.
pub const DEFAULT_THRESHOLD: f64 = 0.001;

/// Default number of times a timed out external call is retried.
pub const DEFAULT_RETRIES: u32 = 1;

/// Tolerances used when measuring outline geometry.
///
/// All distances are in design units and all angles are in degrees.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Tolerances {
    /// Maximum distance between the end of one segment and the start of the
    /// next for the two to be considered connected.
    pub position: f64,
    /// Segments with a control polygon no longer than this are collapsed.
    pub zero_length: f64,
    /// Maximum distance of a cubic's control points from its chord for the
    /// cubic to be treated as a line.
    pub collinear: f64,
    /// Turning angles at or below this are treated as tangent continuous.
    pub angle: f64,
    /// Curvature differences at or below this are treated as curvature
    /// continuous.
    pub curvature: f64,
    /// Accuracy passed to the arc length computation for curves.
    pub arclen_accuracy: f64,
    /// Handles no longer than this fraction of their segment's control
    /// polygon are short. Curvature next to a short handle is sampled a
    /// little way into the curve instead of at the node.
    pub short_handle: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            position: 1e-6,
            zero_length: 1e-6,
            collinear: 1e-6,
            angle: 1e-6,
            curvature: 1e-9,
            arclen_accuracy: 1e-3,
            short_handle: 0.02,
        }
    }
}

/// Options for a single (glyph, instance) evaluation.
#[derive(Clone, PartialEq, Debug)]
pub struct EvaluationOptions {
    /// A pair is flagged when its wonkiness delta is strictly greater than
    /// this value.
    pub threshold: f64,
    /// When set, a pair is also required to have grown by more than this
    /// fraction of its baseline, so `0.1` means "more than 10% wonkier".
    pub relative_threshold: Option<f64>,
    /// Upper bound on the duration of each external call. `None` runs the
    /// calls inline with no bound.
    pub timeout: Option<Duration>,
    /// How many times a timed out call is retried before giving up.
    pub retries: u32,
    pub tolerances: Tolerances,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            relative_threshold: None,
            timeout: None,
            retries: DEFAULT_RETRIES,
            tolerances: Tolerances::default(),
        }
    }
}

impl EvaluationOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_relative_threshold(mut self, fraction: Option<f64>) -> Self {
        self.relative_threshold = fraction;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Returns true if going from `baseline` to `post` should be flagged.
    pub fn flags(&self, baseline: f64, post: f64) -> bool {
        let delta = post - baseline;
        delta > self.threshold
            && self
                .relative_threshold
                .is_none_or(|fraction| delta > baseline * fraction)
    }
}
