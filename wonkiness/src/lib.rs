//! Measures how much overlap removal distorts glyph outlines.
//!
//! Removing overlaps from a glyph merges its contours into their union.
//! Where two curves cross, the union has a new node at which the curvature
//! jumps and the tangent turns sharply. This crate scores such nodes with a
//! _wonkiness_ heuristic, sums the scores over each outline, and compares
//! the sum before and after overlap removal for every glyph at every
//! named instance of a design space.
//!
//! Font parsing, instancing and the boolean union itself are supplied by
//! the caller through the [`GlyphSource`] and [`OverlapRemover`] traits.
//!
//! ```
//! use wonkiness::kurbo::BezPath;
//! use wonkiness::{EvaluationOptions, Evaluator, InstantiationError, Outline, OverlapRemovalError};
//!
//! let source = |_glyph: &str, _instance: &str| -> Result<Outline, InstantiationError> {
//!     let path = BezPath::from_svg("M0,0 L100,0 L100,100 L0,100 Z").unwrap();
//!     Ok(Outline::from_bez_path(&path)?)
//! };
//! let remover = |outline: &Outline| -> Result<Outline, OverlapRemovalError> {
//!     Ok(outline.clone())
//! };
//! let evaluator = Evaluator::new(source, remover, EvaluationOptions::default());
//! let report = evaluator.evaluate("square", "Regular");
//! assert_eq!(report.delta(), Some(0.0));
//! assert!(!report.is_flagged());
//! ```

#![forbid(unsafe_code)]

pub mod batch;
pub mod continuity;
pub mod curvature;
pub mod node;

mod config;
mod error;
mod evaluate;
mod outline;
mod path;
mod report;
mod segment;

pub use batch::{run_batch, BatchOutcome, Cancellation};
pub use config::{EvaluationOptions, Tolerances, DEFAULT_RETRIES, DEFAULT_THRESHOLD};
pub use continuity::Continuity;
pub use error::{
    DegenerateGeometry, DegenerateKind, EvaluationError, ExternalCall, InstantiationError,
    OutlineError, OverlapRemovalError, RunError, TimeoutError,
};
pub use evaluate::{Evaluator, GlyphSource, OverlapRemover};
pub use node::{Node, NodeScore};
pub use outline::Outline;
pub use path::Path;
pub use report::{ExitStatus, Failure, FailureKind, Reporter, Summary, WonkinessReport};
pub use segment::{Segment, SegmentEnd};

/// Re-exported so callers can build outlines without a direct dependency.
pub use kurbo;
