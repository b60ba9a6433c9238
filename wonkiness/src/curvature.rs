//! Tangent angles and curvature at segment ends.
//!
//! Everything returned from this module is finite: undefined tangents and
//! non-finite curvature are reported as [`DegenerateKind`] instead of being
//! propagated as NaN or infinity.

use crate::{DegenerateKind, Segment, SegmentEnd, Tolerances};

/// Normalizes an angle in degrees to the range (−180, 180].
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Returns the direction of travel at the given end of the segment, in
/// degrees in the range (−180, 180].
pub fn tangent_angle(
    segment: &Segment,
    end: SegmentEnd,
    tolerances: &Tolerances,
) -> Result<f64, DegenerateKind> {
    let tangent = segment
        .tangent_at(end, tolerances)
        .ok_or(DegenerateKind::UndefinedTangent)?;
    Ok(normalize_degrees(tangent.atan2().to_degrees()))
}

/// Returns the signed curvature at the given end of the segment.
pub fn curvature_at(
    segment: &Segment,
    end: SegmentEnd,
    tolerances: &Tolerances,
) -> Result<f64, DegenerateKind> {
    let curvature = segment.curvature(end, tolerances);
    if curvature.is_finite() {
        Ok(curvature)
    } else {
        Err(DegenerateKind::NonFiniteCurvature)
    }
}

/// Returns the signed turning angle, in degrees, between an incoming and an
/// outgoing tangent angle.
///
/// Both angles are directions of travel, so the incoming one is the reverse
/// of the tangent pointing away from the node. Collinear continuation is 0,
/// and the result wraps at ±180° so that 179° and −179° differ by 2°.
pub fn angle_delta(incoming: f64, outgoing: f64) -> f64 {
    normalize_degrees(outgoing - incoming)
}

/// Returns the turning angle at the junction where `incoming` ends and
/// `outgoing` begins.
pub fn turning_angle(
    incoming: &Segment,
    outgoing: &Segment,
    tolerances: &Tolerances,
) -> Result<f64, DegenerateKind> {
    let a = tangent_angle(incoming, SegmentEnd::End, tolerances)?;
    let b = tangent_angle(outgoing, SegmentEnd::Start, tolerances)?;
    Ok(angle_delta(a, b))
}
