//! Error types.

use std::{fmt, time::Duration};

use kurbo::Point;
use thiserror::Error;

/// Errors that can occur when building an outline.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OutlineError {
    /// A drawing element at this index was not preceded by a move.
    #[error("path element {0} has no preceding move")]
    MissingMoveTo(usize),
    /// A coordinate of the drawing element at this index was NaN or infinite.
    #[error("path element {0} has a non-finite coordinate")]
    NonFinite(usize),
    /// Segment at this index does not start where its predecessor ends.
    #[error("segment {0} does not start where the previous segment ends")]
    Discontinuous(usize),
    /// The last segment of a closed path does not end at its start point.
    #[error("closed path does not end at its start point")]
    Unclosed,
    /// A path was created with no segments.
    #[error("path has no segments")]
    EmptyPath,
}

/// Reason a node could not be scored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum DegenerateKind {
    #[error("tangent is undefined")]
    UndefinedTangent,
    #[error("curvature is not finite")]
    NonFiniteCurvature,
    #[error("adjacent segments have no length")]
    ZeroLength,
    #[error("score is not finite")]
    NonFiniteScore,
}

/// A node whose geometry could not be measured.
///
/// Degenerate nodes contribute nothing to the path total.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
#[error(
    "degenerate node {node}{} at ({}, {}): {kind}",
    of_path(.path),
    .position.x,
    .position.y
)]
pub struct DegenerateGeometry {
    /// Index of the path within its outline, when the path was measured as
    /// part of one.
    pub path: Option<usize>,
    /// Index of the node within its path.
    pub node: usize,
    /// Position of the node in design units.
    pub position: Point,
    /// What could not be measured.
    pub kind: DegenerateKind,
}

impl DegenerateGeometry {
    /// Attaches the index of the path the node belongs to.
    pub fn in_path(self, path: usize) -> Self {
        Self {
            path: Some(path),
            ..self
        }
    }
}

fn of_path(path: &Option<usize>) -> String {
    path.map(|path| format!(" of path {path}"))
        .unwrap_or_default()
}

/// Errors produced by a [`GlyphSource`](crate::GlyphSource).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InstantiationError {
    #[error("glyph '{0}' is not present in the font")]
    UnknownGlyph(String),
    #[error("instance '{0}' is not present in the design space")]
    UnknownInstance(String),
    #[error("failed to draw glyph: {0}")]
    Draw(String),
    #[error("glyph outline is malformed: {0}")]
    Outline(#[from] OutlineError),
}

/// Error produced by an [`OverlapRemover`](crate::OverlapRemover).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct OverlapRemovalError {
    reason: String,
}

impl OverlapRemovalError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<OutlineError> for OverlapRemovalError {
    fn from(e: OutlineError) -> Self {
        Self::new(format!("result is not a valid outline: {e}"))
    }
}

/// The external collaborators invoked during an evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ExternalCall {
    Instantiate,
    RemoveOverlaps,
}

impl fmt::Display for ExternalCall {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Instantiate => write!(f, "instantiation"),
            Self::RemoveOverlaps => write!(f, "overlap removal"),
        }
    }
}

/// An external call did not complete within the configured bound.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{call} did not finish within {limit:?} after {attempts} attempt(s)")]
pub struct TimeoutError {
    pub call: ExternalCall,
    pub limit: Duration,
    pub attempts: u32,
}

/// Failure of a single (glyph, instance) evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("instantiation failed: {0}")]
    Instantiation(#[from] InstantiationError),
    #[error("overlap removal failed: {0}")]
    OverlapRemoval(#[from] OverlapRemovalError),
    #[error(transparent)]
    Timeout(#[from] TimeoutError),
    #[error("{0} panicked")]
    Panicked(ExternalCall),
}

/// Errors that abort a whole batch.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("no instances to evaluate")]
    NoInstances,
    #[error("no glyphs to evaluate")]
    NoGlyphs,
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
