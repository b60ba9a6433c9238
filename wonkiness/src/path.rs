//! Paths and their summed wonkiness.

use crate::{
    node::{self, Node},
    DegenerateGeometry, OutlineError, Segment, Tolerances,
};

/// An ordered sequence of connected segments.
///
/// Each segment starts where the previous one ends and, for closed paths,
/// the last segment ends where the first starts.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    segments: Vec<Segment>,
    closed: bool,
}

impl Path {
    /// Creates a path, checking continuity with the default position
    /// tolerance.
    pub fn new(segments: Vec<Segment>, closed: bool) -> Result<Self, OutlineError> {
        Self::with_tolerance(segments, closed, Tolerances::default().position)
    }

    /// Creates a path, allowing gaps of up to `tolerance` between
    /// consecutive segments.
    pub fn with_tolerance(
        segments: Vec<Segment>,
        closed: bool,
        tolerance: f64,
    ) -> Result<Self, OutlineError> {
        if segments.is_empty() {
            return Err(OutlineError::EmptyPath);
        }
        for (i, segment) in segments.iter().enumerate() {
            if !points(segment).iter().all(|p| p.is_finite()) {
                return Err(OutlineError::NonFinite(i));
            }
        }
        for (i, pair) in segments.windows(2).enumerate() {
            if pair[0].end().distance(pair[1].start()) > tolerance {
                return Err(OutlineError::Discontinuous(i + 1));
            }
        }
        if closed {
            let first = segments[0].start();
            let last = segments[segments.len() - 1].end();
            if last.distance(first) > tolerance {
                return Err(OutlineError::Unclosed);
            }
        }
        Ok(Self { segments, closed })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the nodes of this path.
    ///
    /// Zero length segments are collapsed, making their neighbours adjacent.
    /// A closed path has a node at every junction including the one where
    /// the last segment meets the first. An open path has no nodes at its
    /// two ends.
    pub fn nodes(&self, tolerances: &Tolerances) -> Vec<Node> {
        let kept: Vec<usize> = self
            .segments
            .iter()
            .enumerate()
            .filter(|(_, seg)| !seg.is_zero_length(tolerances))
            .map(|(i, _)| i)
            .collect();
        let count = match (self.closed, kept.len()) {
            (_, 0) => 0,
            (true, n) => n,
            (false, n) => n - 1,
        };
        (0..count)
            .map(|index| Node {
                index,
                incoming: kept[index],
                outgoing: kept[(index + 1) % kept.len()],
            })
            .collect()
    }

    /// Returns the wonkiness of one node of this path.
    pub fn node_wonkiness(
        &self,
        node: &Node,
        tolerances: &Tolerances,
    ) -> Result<f64, DegenerateGeometry> {
        node::node_wonkiness(self, node, tolerances)
    }

    /// Returns the sum of the wonkiness of every node.
    ///
    /// Degenerate nodes are logged and contribute nothing.
    pub fn wonkiness(&self, tolerances: &Tolerances) -> f64 {
        self.total(None, tolerances)
    }

    /// Sums the node scores, naming the path `index` in log messages.
    pub(crate) fn total(&self, index: Option<usize>, tolerances: &Tolerances) -> f64 {
        self.nodes(tolerances)
            .iter()
            .map(|node| match self.node_wonkiness(node, tolerances) {
                Ok(wonkiness) => {
                    if wonkiness != 0.0 {
                        match index {
                            Some(path) => log::debug!(
                                "path {path} node {} contributes {wonkiness}",
                                node.index
                            ),
                            None => log::debug!("node {} contributes {wonkiness}", node.index),
                        }
                    }
                    wonkiness
                }
                Err(e) => {
                    let e = match index {
                        Some(path) => e.in_path(path),
                        None => e,
                    };
                    log::warn!("{e}");
                    0.0
                }
            })
            .sum()
    }
}

fn points(segment: &Segment) -> Vec<kurbo::Point> {
    match segment {
        Segment::Line(line) => vec![line.p0, line.p1],
        Segment::Cubic(c) => vec![c.p0, c.p1, c.p2, c.p3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tol() -> Tolerances {
        Tolerances::default()
    }

    fn polyline(points: &[(f64, f64)], closed: bool) -> Path {
        let mut segments: Vec<Segment> = points
            .windows(2)
            .map(|pair| Segment::line(pair[0], pair[1]))
            .collect();
        if closed {
            segments.push(Segment::line(points[points.len() - 1], points[0]));
        }
        Path::new(segments, closed).unwrap()
    }

    #[test]
    fn closed_path_nodes_wrap_around() {
        let square = polyline(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)], true);
        let nodes = square.nodes(&tol());
        assert_eq!(nodes.len(), 4);
        assert_eq!((nodes[3].incoming, nodes[3].outgoing), (3, 0));
        assert_eq!(square.wonkiness(&tol()), 0.0);
    }

    #[test]
    fn open_path_excludes_endpoints() {
        let path = polyline(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], false);
        let nodes = path.nodes(&tol());
        assert_eq!(nodes.len(), 1);
        assert_eq!((nodes[0].incoming, nodes[0].outgoing), (0, 1));
    }

    #[test]
    fn zero_length_segments_are_collapsed() {
        let path = Path::new(
            vec![
                Segment::line((0.0, 0.0), (10.0, 0.0)),
                Segment::line((10.0, 0.0), (10.0, 0.0)),
                Segment::cubic((10.0, 0.0), (10.0, 0.0), (10.0, 0.0), (10.0, 0.0)),
                Segment::line((10.0, 0.0), (10.0, 10.0)),
            ],
            false,
        )
        .unwrap();
        let nodes = path.nodes(&tol());
        assert_eq!(nodes.len(), 1);
        assert_eq!((nodes[0].incoming, nodes[0].outgoing), (0, 3));
        assert_eq!(path.wonkiness(&tol()), 0.0);
    }

    #[test]
    fn all_zero_length_has_no_nodes() {
        let path = Path::new(vec![Segment::line((1.0, 1.0), (1.0, 1.0))], true).unwrap();
        assert!(path.nodes(&tol()).is_empty());
        assert_eq!(path.wonkiness(&tol()), 0.0);
    }

    #[test]
    fn single_loop_has_one_node() {
        let path = Path::new(
            vec![Segment::cubic((0.0, 0.0), (100.0, 100.0), (-50.0, 100.0), (0.0, 0.0))],
            true,
        )
        .unwrap();
        let nodes = path.nodes(&tol());
        assert_eq!(nodes.len(), 1);
        assert_eq!((nodes[0].incoming, nodes[0].outgoing), (0, 0));
        assert!(path.wonkiness(&tol()) > 0.0);
    }

    #[test]
    fn validation() {
        let a = Segment::line((0.0, 0.0), (10.0, 0.0));
        let b = Segment::line((10.0, 1.0), (10.0, 10.0));
        assert_eq!(Path::new(vec![], false), Err(OutlineError::EmptyPath));
        assert_eq!(
            Path::new(vec![a, b], false),
            Err(OutlineError::Discontinuous(1))
        );
        assert!(Path::with_tolerance(vec![a, b], false, 1.0).is_ok());
        let b = Segment::line((10.0, 0.0), (10.0, 10.0));
        assert_eq!(Path::new(vec![a, b], true), Err(OutlineError::Unclosed));
        let nan = Segment::line((10.0, 0.0), (f64::NAN, 10.0));
        assert_eq!(
            Path::new(vec![a, nan], false),
            Err(OutlineError::NonFinite(1))
        );
    }
}
