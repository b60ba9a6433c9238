//! Geometric continuity at the junction of two segments.

use crate::{
    curvature::{curvature_at, turning_angle},
    DegenerateKind, Segment, SegmentEnd, Tolerances,
};

/// Continuity class of a junction, ordered from weakest to strongest.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Continuity {
    /// The segments do not meet.
    Discontinuous,
    /// Positions match.
    G0,
    /// Positions and tangent directions match.
    G1,
    /// Positions, tangent directions and curvature match.
    G2,
}

/// Measurements taken at the junction of two segments.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Junction {
    /// Signed turning angle in degrees.
    pub turning_angle: f64,
    pub incoming_curvature: f64,
    pub outgoing_curvature: f64,
    pub continuity: Continuity,
}

impl Junction {
    /// Absolute difference between the curvatures on either side.
    pub fn curvature_change(&self) -> f64 {
        (self.outgoing_curvature - self.incoming_curvature).abs()
    }
}

/// Measures and classifies the junction where `incoming` ends and
/// `outgoing` begins.
///
/// Line-like cubics have zero curvature, so a line-like cubic that
/// continues a line in the same direction is G2.
pub fn classify(
    incoming: &Segment,
    outgoing: &Segment,
    tolerances: &Tolerances,
) -> Result<Junction, DegenerateKind> {
    let turning_angle = turning_angle(incoming, outgoing, tolerances)?;
    let incoming_curvature = curvature_at(incoming, SegmentEnd::End, tolerances)?;
    let outgoing_curvature = curvature_at(outgoing, SegmentEnd::Start, tolerances)?;
    let gap = incoming.end().distance(outgoing.start());
    let continuity = if gap > tolerances.position {
        Continuity::Discontinuous
    } else if turning_angle.abs() > tolerances.angle {
        Continuity::G0
    } else if (outgoing_curvature - incoming_curvature).abs() > tolerances.curvature {
        Continuity::G1
    } else {
        Continuity::G2
    };
    Ok(Junction {
        turning_angle,
        incoming_curvature,
        outgoing_curvature,
        continuity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tol() -> Tolerances {
        Tolerances::default()
    }

    #[test]
    fn corner_is_g0() {
        let a = Segment::line((0.0, 0.0), (100.0, 0.0));
        let b = Segment::line((100.0, 0.0), (100.0, 100.0));
        assert_eq!(classify(&a, &b, &tol()).unwrap().continuity, Continuity::G0);
    }

    #[test]
    fn collinear_lines_are_g2() {
        let a = Segment::line((0.0, 0.0), (50.0, 50.0));
        let b = Segment::line((50.0, 50.0), (80.0, 80.0));
        assert_eq!(classify(&a, &b, &tol()).unwrap().continuity, Continuity::G2);
    }

    #[test]
    fn line_into_tangent_curve_is_g1() {
        let a = Segment::line((0.0, 0.0), (100.0, 0.0));
        let b = Segment::cubic((100.0, 0.0), (150.0, 0.0), (200.0, 50.0), (200.0, 100.0));
        let junction = classify(&a, &b, &tol()).unwrap();
        assert_eq!(junction.continuity, Continuity::G1);
        assert!(junction.curvature_change() > 0.0);
    }

    #[test]
    fn line_like_curve_continuing_line_is_g2() {
        let a = Segment::line((0.0, 0.0), (100.0, 0.0));
        let b = Segment::cubic((100.0, 0.0), (120.0, 0.0), (180.0, 0.0), (200.0, 0.0));
        assert_eq!(classify(&a, &b, &tol()).unwrap().continuity, Continuity::G2);
    }

    #[test]
    fn gap_is_discontinuous() {
        let a = Segment::line((0.0, 0.0), (100.0, 0.0));
        let b = Segment::line((101.0, 0.0), (200.0, 0.0));
        assert_eq!(
            classify(&a, &b, &tol()).unwrap().continuity,
            Continuity::Discontinuous
        );
    }
}
