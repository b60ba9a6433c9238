//! Line and cubic segments evaluated at their endpoints.

use kurbo::{CubicBez, Line, ParamCurve, ParamCurveArclen, ParamCurveDeriv, Point, Vec2};

use crate::Tolerances;

/// Parameter offset used to sample curvature next to a short handle.
const NUDGE: f64 = 0.05;

/// Selects one of the two ends of a segment.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SegmentEnd {
    /// The start point, t = 0.
    Start,
    /// The end point, t = 1.
    End,
}

impl SegmentEnd {
    /// Returns the curve parameter for this end.
    pub fn t(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::End => 1.0,
        }
    }

    fn nudged(self) -> f64 {
        match self {
            Self::Start => NUDGE,
            Self::End => 1.0 - NUDGE,
        }
    }
}

/// A single segment of a path.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Segment {
    /// A straight segment.
    Line(Line),
    /// A cubic Bézier. Quadratics are elevated to cubics when an outline
    /// is built.
    Cubic(CubicBez),
}

impl Segment {
    /// Creates a straight segment from `p0` to `p1`.
    pub fn line(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self::Line(Line::new(p0.into(), p1.into()))
    }

    /// Creates a cubic segment from `p0` to `p3` with control points `p1`
    /// and `p2`.
    pub fn cubic(
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        p3: impl Into<Point>,
    ) -> Self {
        Self::Cubic(CubicBez::new(p0.into(), p1.into(), p2.into(), p3.into()))
    }

    /// The point the segment leaves from.
    pub fn start(&self) -> Point {
        match self {
            Self::Line(line) => line.p0,
            Self::Cubic(cubic) => cubic.p0,
        }
    }

    /// The point the segment arrives at.
    pub fn end(&self) -> Point {
        match self {
            Self::Line(line) => line.p1,
            Self::Cubic(cubic) => cubic.p3,
        }
    }

    /// Returns [`start`](Self::start) or [`end`](Self::end).
    pub fn point_at(&self, end: SegmentEnd) -> Point {
        match end {
            SegmentEnd::Start => self.start(),
            SegmentEnd::End => self.end(),
        }
    }

    /// Length of the control polygon, an upper bound on the arc length.
    pub fn hull_length(&self) -> f64 {
        match self {
            Self::Line(line) => line.length(),
            Self::Cubic(c) => c.p0.distance(c.p1) + c.p1.distance(c.p2) + c.p2.distance(c.p3),
        }
    }

    /// Returns true if the segment has (effectively) no extent.
    pub fn is_zero_length(&self, tolerances: &Tolerances) -> bool {
        self.hull_length() <= tolerances.zero_length
    }

    /// Returns true for lines and for cubics whose control points lie on
    /// the line through their endpoints.
    pub fn is_line_like(&self, tolerances: &Tolerances) -> bool {
        match self {
            Self::Line(_) => true,
            Self::Cubic(c) => {
                let chord = c.p3 - c.p0;
                let len = chord.hypot();
                if len <= tolerances.zero_length {
                    // Loops that return to their start are curves, not lines
                    return false;
                }
                let off_chord = |p: Point| ((p - c.p0).cross(chord) / len).abs();
                off_chord(c.p1) <= tolerances.collinear && off_chord(c.p2) <= tolerances.collinear
            }
        }
    }

    /// Returns the vector from the given end to its adjacent control point.
    ///
    /// Lines have no handles and return the zero vector.
    pub fn handle_at(&self, end: SegmentEnd) -> Vec2 {
        match (self, end) {
            (Self::Line(_), _) => Vec2::ZERO,
            (Self::Cubic(c), SegmentEnd::Start) => c.p1 - c.p0,
            (Self::Cubic(c), SegmentEnd::End) => c.p2 - c.p3,
        }
    }

    /// Returns true if the handle at `end` is short relative to the
    /// segment.
    ///
    /// Handles at or below the zero length tolerance are always short, so
    /// every end whose tangent falls back to a further control point is
    /// also sampled away from the node when measuring curvature.
    pub fn has_short_handle(&self, end: SegmentEnd, tolerances: &Tolerances) -> bool {
        let limit = tolerances
            .zero_length
            .max(tolerances.short_handle * self.hull_length());
        self.handle_at(end).hypot() <= limit
    }

    /// Returns the unit tangent, in the direction of travel, at the given
    /// end.
    ///
    /// Line-like cubics use their chord. When a control point coincides with
    /// its endpoint the next distinct point along the control polygon gives
    /// the direction. Returns `None` when every candidate vanishes.
    pub fn tangent_at(&self, end: SegmentEnd, tolerances: &Tolerances) -> Option<Vec2> {
        let eps = tolerances.zero_length;
        let candidates = match self {
            Self::Line(line) => [line.p1 - line.p0; 3],
            Self::Cubic(c) if self.is_line_like(tolerances) => [c.p3 - c.p0; 3],
            Self::Cubic(c) => match end {
                SegmentEnd::Start => [c.p1 - c.p0, c.p2 - c.p0, c.p3 - c.p0],
                SegmentEnd::End => [c.p3 - c.p2, c.p3 - c.p1, c.p3 - c.p0],
            },
        };
        candidates
            .into_iter()
            .find(|v| v.hypot() > eps)
            .map(|v| v / v.hypot())
    }

    /// Returns the signed curvature at the given end.
    ///
    /// Positive values turn counter-clockwise in a y-up coordinate system.
    /// Lines and line-like cubics have zero curvature.
    ///
    /// The curvature at an end with a short handle grows without bound as
    /// the handle shrinks, so there it is sampled at a parameter slightly
    /// inside the curve instead. The result may be
    /// non-finite for pathological cubics; see
    /// [`curvature_at`](crate::curvature::curvature_at) for the checked
    /// variant.
    pub fn curvature(&self, end: SegmentEnd, tolerances: &Tolerances) -> f64 {
        match self {
            Self::Cubic(cubic) if !self.is_line_like(tolerances) => {
                let t = if self.has_short_handle(end, tolerances) {
                    end.nudged()
                } else {
                    end.t()
                };
                cubic_curvature(cubic, t)
            }
            _ => 0.0,
        }
    }

    /// Returns the length of the segment.
    ///
    /// Lines and line-like cubics measure their chord; other cubics use an
    /// arc length approximation to the configured accuracy.
    pub fn length(&self, tolerances: &Tolerances) -> f64 {
        match self {
            Self::Line(line) => line.length(),
            Self::Cubic(c) if self.is_line_like(tolerances) => c.p0.distance(c.p3),
            Self::Cubic(c) => c.arclen(tolerances.arclen_accuracy),
        }
    }

    /// Returns the same geometry traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        match self {
            Self::Line(line) => Self::Line(Line::new(line.p1, line.p0)),
            Self::Cubic(c) => Self::Cubic(CubicBez::new(c.p3, c.p2, c.p1, c.p0)),
        }
    }
}

/// κ(t) = (x′y″ − y′x″) / (x′² + y′²)^{3/2}
fn cubic_curvature(cubic: &CubicBez, t: f64) -> f64 {
    let d1 = cubic.deriv();
    let d2 = d1.deriv();
    let v1 = d1.eval(t).to_vec2();
    let v2 = d2.eval(t).to_vec2();
    v1.cross(v2) / v1.hypot2().powf(1.5)
}
