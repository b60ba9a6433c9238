use kurbo::{BezPath, Point};
use skrifa::outline::OutlinePen;

/// Pen that records a drawn glyph as a [`BezPath`] ready for scoring.
///
/// Outline loaders may emit elements that carry no geometry. Left in place
/// these become zero length segments, so this covers two cases:
///
/// 1. A move that is superseded by another move, or that is followed only by
///    a close, never reaches the path.
///
/// 2. A line that ends at the current point is dropped.
///
/// Every font contour is closed, so a contour that received at least one
/// segment is always terminated with a close element, even when the loader
/// stops drawing without emitting one.
#[derive(Debug, Default)]
pub struct OutlineRecorder {
    path: BezPath,
    pending_move: Option<Point>,
    current: Option<Point>,
    in_contour: bool,
}

impl OutlineRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded path, closing the last contour if needed.
    pub fn finish(mut self) -> BezPath {
        self.end_contour();
        self.path
    }

    fn flush_pending_move(&mut self) {
        if let Some(start) = self.pending_move.take() {
            self.path.move_to(start);
            self.in_contour = true;
        }
    }

    fn end_contour(&mut self) {
        if self.in_contour {
            self.path.close_path();
            self.in_contour = false;
        }
        self.pending_move = None;
    }
}

fn point(x: f32, y: f32) -> Point {
    Point::new(x as f64, y as f64)
}

impl OutlinePen for OutlineRecorder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.end_contour();
        let p = point(x, y);
        self.pending_move = Some(p);
        self.current = Some(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = point(x, y);
        if self.current != Some(p) {
            self.flush_pending_move();
            self.path.line_to(p);
            self.current = Some(p);
        }
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let p = point(x, y);
        self.flush_pending_move();
        self.path.quad_to(point(cx0, cy0), p);
        self.current = Some(p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let p = point(x, y);
        self.flush_pending_move();
        self.path.curve_to(point(cx0, cy0), point(cx1, cy1), p);
        self.current = Some(p);
    }

    fn close(&mut self) {
        self.end_contour();
    }
}

#[cfg(test)]
mod tests {
    use kurbo::PathEl::{self, *};
    use pretty_assertions::assert_eq;

    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn record(draw: impl FnOnce(&mut OutlineRecorder)) -> Vec<PathEl> {
        let mut pen = OutlineRecorder::new();
        draw(&mut pen);
        pen.finish().elements().to_vec()
    }

    #[test]
    fn contours_are_closed() {
        let elements = record(|pen| {
            // Subpath 1
            pen.move_to(1.0, 2.0);
            pen.line_to(42.0, 24.0);
            pen.close();
            // Subpath 2, never explicitly closed
            pen.move_to(3.5, 4.5);
            pen.curve_to(10.0, 20.0, 30.0, 40.0, 100.0, 200.0);
        });
        assert_eq!(
            elements,
            [
                MoveTo(p(1.0, 2.0)),
                LineTo(p(42.0, 24.0)),
                ClosePath,
                MoveTo(p(3.5, 4.5)),
                CurveTo(p(10.0, 20.0), p(30.0, 40.0), p(100.0, 200.0)),
                ClosePath,
            ]
        );
    }

    #[test]
    fn degenerate_elements_are_dropped() {
        let elements = record(|pen| {
            // Dropped: superseded by following move
            pen.move_to(1.0, 2.0);
            pen.move_to(4.5, 5.0);
            // Dropped: line to previous move
            pen.line_to(4.5, 5.0);
            pen.quad_to(1.0, 2.0, 5.0, 6.0);
            // Dropped: line to previous curve
            pen.line_to(5.0, 6.0);
            pen.close();
            // Dropped: nothing drawn
            pen.move_to(8.0, 8.0);
            pen.close();
        });
        assert_eq!(
            elements,
            [
                MoveTo(p(4.5, 5.0)),
                QuadTo(p(1.0, 2.0), p(5.0, 6.0)),
                ClosePath,
            ]
        );
    }

    #[test]
    fn fractional_points_are_kept() {
        // Implied oncurve points of TrueType quadratics sit halfway between
        // two offcurve points
        let elements = record(|pen| {
            pen.move_to(0.0, 0.0);
            pen.quad_to(4.0, 4.0, 5.5, 6.5);
            pen.quad_to(7.0, 9.0, 10.0, 12.0);
        });
        assert_eq!(
            elements[1..3],
            [
                QuadTo(p(4.0, 4.0), p(5.5, 6.5)),
                QuadTo(p(7.0, 9.0), p(10.0, 12.0))
            ]
        );
    }

    #[test]
    fn recorded_outline_scores() {
        let elements = record(|pen| {
            pen.move_to(0.0, 0.0);
            pen.line_to(100.0, 0.0);
            pen.line_to(100.0, 100.0);
            pen.line_to(0.0, 100.0);
            pen.close();
        });
        let path = BezPath::from_vec(elements);
        let outline = wonkiness::Outline::from_bez_path(&path).unwrap();
        assert_eq!(outline.paths().len(), 1);
        assert_eq!(outline.paths()[0].segments().len(), 4);
        assert_eq!(outline.wonkiness(&Default::default()), 0.0);
    }
}
