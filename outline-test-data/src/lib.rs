//! test outlines shared between the wonkiness crates.
//!
//! Coordinates are in font units with y pointing up.

use std::f64::consts::TAU;

use kurbo::{Arc, BezPath, Circle, Point, Shape, Vec2};

/// A 100 unit square, counter-clockwise.
pub static SQUARE: &str = "M0,0 L100,0 L100,100 L0,100 Z";

/// Two overlapping bars forming a plus sign.
pub static CROSS: &str =
    "M0,100 L300,100 L300,200 L0,200 Z M100,0 L200,0 L200,300 L100,300 Z";

/// A straight base flowing smoothly into a quarter round, with a corner at
/// the top right.
pub static TAB: &str = "M0,0 L100,0 C155,0 200,45 200,100 L0,100 Z";

/// [`TAB`] with an extra point in the middle of its base.
pub static TAB_SPLIT_BASE: &str = "M0,0 L50,0 L100,0 C155,0 200,45 200,100 L0,100 Z";

/// Two curves joined with matching tangents.
pub static SMOOTH_S: &str = "M0,0 C0,30 30,100 100,100 C170,100 200,30 200,0";

/// A straight stem meeting a bowl at two corners.
pub static D_SHAPE: &str = "M0,0 L0,300 C120,300 200,230 200,150 C200,70 120,0 0,0 Z";

/// A line-like cubic standing in for the base of the square.
pub static SQUARE_CURVED_BASE: &str = "M0,0 C25,0 75,0 100,0 L100,100 L0,100 Z";

/// Parses one of the SVG path fixtures.
pub fn bez_path(svg: &str) -> BezPath {
    BezPath::from_svg(svg).expect("fixture paths are valid SVG")
}

const BIG_RADIUS: f64 = 100.0;
const SMALL_RADIUS: f64 = 60.0;
const SMALL_CENTER: Point = Point::new(120.0, 0.0);

/// Two overlapping circles of different radii, each a separate contour.
pub fn overlapping_circles() -> BezPath {
    let mut path = Circle::new(Point::ORIGIN, BIG_RADIUS).to_path(0.1);
    path.extend(Circle::new(SMALL_CENTER, SMALL_RADIUS).to_path(0.1));
    path
}

/// The union of [`overlapping_circles`]: one contour with a cusp at each of
/// the two intersection points.
pub fn unioned_circles() -> BezPath {
    let d = SMALL_CENTER.x;
    let x = (d * d + BIG_RADIUS * BIG_RADIUS - SMALL_RADIUS * SMALL_RADIUS) / (2.0 * d);
    let y = (BIG_RADIUS * BIG_RADIUS - x * x).sqrt();
    let big_angle = y.atan2(x);
    let small_angle = y.atan2(x - d);

    let big = Arc {
        center: Point::ORIGIN,
        radii: Vec2::new(BIG_RADIUS, BIG_RADIUS),
        start_angle: big_angle,
        sweep_angle: TAU - 2.0 * big_angle,
        x_rotation: 0.0,
    };
    let small = Arc {
        center: SMALL_CENTER,
        radii: Vec2::new(SMALL_RADIUS, SMALL_RADIUS),
        start_angle: -small_angle,
        sweep_angle: 2.0 * small_angle,
        x_rotation: 0.0,
    };
    let mut path = BezPath::new();
    path.move_to(Point::new(x, y));
    path.extend(big.append_iter(0.1));
    path.extend(small.append_iter(0.1));
    path.close_path();
    path
}
