#![no_main]
use libfuzzer_sys::{
    arbitrary::{self, Arbitrary},
    fuzz_target,
};
use wonkiness::{
    kurbo::{BezPath, Point},
    Outline, Tolerances,
};

/// One drawing command, in font units.
///
/// Coordinates are integers so that every input is finite; fractional
/// positions come from the quadratic elevation and the scale.
#[derive(Arbitrary, Debug)]
enum Element {
    Move(i16, i16),
    Line(i16, i16),
    Quad(i16, i16, i16, i16),
    Curve(i16, i16, i16, i16, i16, i16),
    Close,
}

#[derive(Arbitrary, Debug)]
struct Drawing {
    /// Divides every coordinate, to reach tiny segments
    scale: u8,
    elements: Vec<Element>,
}

fn point(x: i16, y: i16, scale: f64) -> Point {
    Point::new(x as f64 / scale, y as f64 / scale)
}

fn build(drawing: &Drawing) -> BezPath {
    let scale = drawing.scale.max(1) as f64;
    let mut path = BezPath::new();
    for element in &drawing.elements {
        match *element {
            Element::Move(x, y) => path.move_to(point(x, y, scale)),
            Element::Line(x, y) => path.line_to(point(x, y, scale)),
            Element::Quad(x0, y0, x, y) => path.quad_to(point(x0, y0, scale), point(x, y, scale)),
            Element::Curve(x0, y0, x1, y1, x, y) => path.curve_to(
                point(x0, y0, scale),
                point(x1, y1, scale),
                point(x, y, scale),
            ),
            Element::Close => path.close_path(),
        }
    }
    path
}

fuzz_target!(|drawing: Drawing| {
    let Ok(outline) = Outline::from_bez_path(&build(&drawing)) else {
        return;
    };
    let tolerances = Tolerances::default();
    let total = outline.wonkiness(&tolerances);
    assert!(total.is_finite() && total >= 0.0, "{total}");
    for score in outline.node_scores(&tolerances) {
        assert!(score.wonkiness.is_finite() && score.wonkiness >= 0.0, "{score:?}");
    }
});
