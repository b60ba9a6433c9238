//! Wonkiness of a single node.
//!
//! A node joins the end of one segment to the start of the next. Its score
//! is
//!
//! ```text
//! |κ_out − κ_in| × |θ| / (L_in + L_out)
//! ```
//!
//! where κ is the signed curvature on either side of the node, θ the
//! turning angle in degrees and L the segment lengths. Tangent continuous
//! nodes always score zero.

use kurbo::Point;

use crate::{
    continuity::{classify, Continuity, Junction},
    DegenerateGeometry, DegenerateKind, Path, Segment, Tolerances,
};

/// A junction between two segments of a path.
///
/// Segments are referenced by their index in the owning [`Path`]. Zero
/// length segments are skipped, so `incoming` and `outgoing` are not
/// necessarily consecutive indices.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Node {
    /// Position of this node in the path's node sequence.
    pub index: usize,
    /// Index of the segment arriving at the node.
    pub incoming: usize,
    /// Index of the segment leaving the node.
    pub outgoing: usize,
}

/// The score of one node, located within its outline.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NodeScore {
    /// Index of the path within the outline.
    pub path: usize,
    /// Index of the node within its path.
    pub node: usize,
    /// Where the node is, in design units.
    pub position: Point,
    pub continuity: Continuity,
    /// The node's contribution to the outline total.
    pub wonkiness: f64,
}

/// Scores the junction of two segments.
///
/// Returns the junction measurements along with the score.
pub fn score(
    incoming: &Segment,
    outgoing: &Segment,
    tolerances: &Tolerances,
) -> Result<(Junction, f64), DegenerateKind> {
    let junction = classify(incoming, outgoing, tolerances)?;
    if matches!(junction.continuity, Continuity::G1 | Continuity::G2) {
        return Ok((junction, 0.0));
    }
    let lengths = incoming.length(tolerances) + outgoing.length(tolerances);
    if lengths <= 0.0 {
        return Err(DegenerateKind::ZeroLength);
    }
    let wonkiness = junction.curvature_change() * junction.turning_angle.abs() / lengths;
    if !wonkiness.is_finite() {
        return Err(DegenerateKind::NonFiniteScore);
    }
    Ok((junction, wonkiness))
}

/// Returns the wonkiness of `node`, which must belong to `path`.
pub fn node_wonkiness(
    path: &Path,
    node: &Node,
    tolerances: &Tolerances,
) -> Result<f64, DegenerateGeometry> {
    measure(path, node, tolerances).map(|(_, wonkiness)| wonkiness)
}

pub(crate) fn measure(
    path: &Path,
    node: &Node,
    tolerances: &Tolerances,
) -> Result<(Junction, f64), DegenerateGeometry> {
    let segments = path.segments();
    let incoming = &segments[node.incoming];
    let outgoing = &segments[node.outgoing];
    score(incoming, outgoing, tolerances).map_err(|kind| DegenerateGeometry {
        path: None,
        node: node.index,
        position: outgoing.start(),
        kind,
    })
}

#[cfg(test)]
mod tests {
    use kurbo::ParamCurve;

    use super::*;

    fn tol() -> Tolerances {
        Tolerances::default()
    }

    fn wonk(a: &Segment, b: &Segment) -> f64 {
        score(a, b, &tol()).unwrap().1
    }

    // Arcs of a circle of radius 100 that meet at (100, 0) with a kink.
    fn kinked_pair(scale: f64) -> (Segment, Segment) {
        let k = 0.5522847498 * 100.0 * scale;
        let r = 100.0 * scale;
        let incoming = Segment::cubic((0.0, -r), (k, -r), (r, -k), (r, 0.0));
        // Smaller circle leaving at 45°
        let outgoing = Segment::cubic(
            (r, 0.0),
            (r + 20.0 * scale, 20.0 * scale),
            (r + 20.0 * scale, 50.0 * scale),
            (r, 60.0 * scale),
        );
        (incoming, outgoing)
    }

    #[test]
    fn collinear_nodes_score_zero() {
        let a = Segment::line((0.0, 0.0), (50.0, 0.0));
        // Strongly curved, but leaving in the same direction
        let b = Segment::cubic((50.0, 0.0), (60.0, 0.0), (70.0, 30.0), (50.0, 40.0));
        assert_eq!(wonk(&a, &b), 0.0);
    }

    #[test]
    fn equal_curvature_scores_zero() {
        // Two lines at a right angle
        let a = Segment::line((0.0, 0.0), (100.0, 0.0));
        let b = Segment::line((100.0, 0.0), (100.0, 100.0));
        assert_eq!(wonk(&a, &b), 0.0);
        // Two lines at a sharp angle
        let b = Segment::line((100.0, 0.0), (10.0, 5.0));
        assert_eq!(wonk(&a, &b), 0.0);
    }

    #[test]
    fn kink_between_curves_is_positive() {
        let (a, b) = kinked_pair(1.0);
        let (junction, w) = score(&a, &b, &tol()).unwrap();
        assert_eq!(junction.continuity, Continuity::G0);
        assert!(w > 0.0);
    }

    #[test]
    fn larger_segments_score_lower() {
        let (a, b) = kinked_pair(1.0);
        let small = wonk(&a, &b);
        let (a, b) = kinked_pair(2.0);
        let large = wonk(&a, &b);
        assert!(large < small, "{large} >= {small}");
    }

    #[test]
    fn shortening_one_side_increases_score() {
        let (a, b) = kinked_pair(1.0);
        let before = wonk(&a, &b);
        let Segment::Cubic(outgoing) = b else {
            unreachable!()
        };
        // Same start, tangent and curvature, half the length
        let shorter = Segment::Cubic(outgoing.subsegment(0.0..0.5));
        let after = wonk(&a, &shorter);
        // Curvature at the node is unchanged up to rounding
        let ka = score(&a, &shorter, &tol()).unwrap().0;
        let kb = score(&a, &b, &tol()).unwrap().0;
        assert!((ka.outgoing_curvature - kb.outgoing_curvature).abs() < 1e-9);
        assert!(after > before, "{after} <= {before}");
    }

    #[test]
    fn score_formula() {
        let a = Segment::line((0.0, 0.0), (100.0, 0.0));
        let k = 0.5522847498 * 100.0;
        // Quarter circle leaving a 90° corner
        let b = Segment::cubic(
            (100.0, 0.0),
            (100.0, k),
            (200.0 - k, 100.0),
            (200.0, 100.0),
        );
        let (junction, w) = score(&a, &b, &tol()).unwrap();
        let expected = junction.curvature_change() * 90.0
            / (a.length(&tol()) + b.length(&tol()));
        assert!((junction.turning_angle - 90.0).abs() < 1e-9);
        assert!((w - expected).abs() < 1e-12);
    }

    #[test]
    fn shrinking_handle_does_not_explode_the_score() {
        let edge = Segment::line((0.0, 0.0), (100.0, 0.0));
        let curve =
            |h: f64| Segment::cubic((100.0, 0.0), (100.0 + h, h), (160.0, 40.0), (200.0, 100.0));
        let retracted = wonk(&edge, &curve(0.0));
        assert!(retracted > 0.0);
        for h in [5e-7, 1e-6, 1e-4, 1e-2, 1.0] {
            let w = wonk(&edge, &curve(h));
            assert!(w.is_finite());
            assert!(w < 10.0 * retracted && w > 0.1 * retracted, "{w} at {h}");
        }
    }

    #[test]
    fn degenerate_tangent_is_reported() {
        let a = Segment::line((0.0, 0.0), (100.0, 0.0));
        let point = Segment::cubic((100.0, 0.0), (100.0, 0.0), (100.0, 0.0), (100.0, 0.0));
        assert_eq!(
            score(&a, &point, &tol()).map(|(_, w)| w),
            Err(DegenerateKind::UndefinedTangent)
        );
    }
}
