//! Outlines: the paths of one glyph at one location.

use kurbo::{BezPath, PathEl, Point, QuadBez};

use crate::{
    node::{self, NodeScore},
    DegenerateGeometry, OutlineError, Path, Segment, Tolerances,
};

/// An ordered collection of paths.
///
/// Paths are semantically unordered but are always processed in the order
/// they were added so that results are reproducible.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    paths: Vec<Path>,
}

impl Outline {
    pub fn new(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Builds an outline from a [`BezPath`].
    ///
    /// Quadratic segments are elevated to cubics. A closed subpath whose
    /// last point differs from its start gets an explicit closing line.
    /// Subpaths with no drawing commands are dropped.
    pub fn from_bez_path(path: &BezPath) -> Result<Self, OutlineError> {
        let mut builder = OutlineBuilder::default();
        for (i, el) in path.elements().iter().enumerate() {
            builder.push(i, *el)?;
        }
        builder.finish()
    }

    /// Converts this outline back to a [`BezPath`].
    pub fn to_bez_path(&self) -> BezPath {
        let mut result = BezPath::new();
        for path in &self.paths {
            let segments = path.segments();
            result.move_to(segments[0].start());
            for segment in segments {
                match segment {
                    Segment::Line(line) => result.line_to(line.p1),
                    Segment::Cubic(c) => result.curve_to(c.p1, c.p2, c.p3),
                }
            }
            if path.is_closed() {
                result.close_path();
            }
        }
        result
    }

    /// Returns the sum of the wonkiness of every path.
    pub fn wonkiness(&self, tolerances: &Tolerances) -> f64 {
        self.paths
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let wonkiness = path.total(Some(i), tolerances);
                log::debug!("path {i} wonkiness {wonkiness}");
                wonkiness
            })
            .sum()
    }

    /// Returns the wonkiness of node `node` of path `path`.
    ///
    /// Errors carry the path index. Returns `None` if there is no such
    /// node.
    pub fn node_wonkiness(
        &self,
        path: usize,
        node: usize,
        tolerances: &Tolerances,
    ) -> Option<Result<f64, DegenerateGeometry>> {
        let owner = self.paths.get(path)?;
        let node = owner.nodes(tolerances).into_iter().nth(node)?;
        Some(
            owner
                .node_wonkiness(&node, tolerances)
                .map_err(|e| e.in_path(path)),
        )
    }

    /// Returns the score of every measurable node, in path order.
    ///
    /// Degenerate nodes are omitted.
    pub fn node_scores<'a>(
        &'a self,
        tolerances: &'a Tolerances,
    ) -> impl Iterator<Item = NodeScore> + 'a {
        self.paths.iter().enumerate().flat_map(move |(path_idx, path)| {
            path.nodes(tolerances)
                .into_iter()
                .filter_map(move |node| {
                    let (junction, wonkiness) = node::measure(path, &node, tolerances).ok()?;
                    Some(NodeScore {
                        path: path_idx,
                        node: node.index,
                        position: path.segments()[node.outgoing].start(),
                        continuity: junction.continuity,
                        wonkiness,
                    })
                })
        })
    }

    /// Returns the node with the highest score, if any node scores above
    /// zero.
    pub fn worst_node(&self, tolerances: &Tolerances) -> Option<NodeScore> {
        self.node_scores(tolerances)
            .filter(|score| score.wonkiness > 0.0)
            .max_by(|a, b| a.wonkiness.total_cmp(&b.wonkiness))
    }
}

#[derive(Default)]
struct OutlineBuilder {
    paths: Vec<Path>,
    segments: Vec<Segment>,
    start: Option<Point>,
    current: Point,
}

impl OutlineBuilder {
    fn push(&mut self, index: usize, el: PathEl) -> Result<(), OutlineError> {
        let finite = match el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => p.is_finite(),
            PathEl::QuadTo(p1, p2) => p1.is_finite() && p2.is_finite(),
            PathEl::CurveTo(p1, p2, p3) => p1.is_finite() && p2.is_finite() && p3.is_finite(),
            PathEl::ClosePath => true,
        };
        if !finite {
            return Err(OutlineError::NonFinite(index));
        }
        let segment = match el {
            PathEl::MoveTo(p) => {
                self.end_subpath(false)?;
                self.start = Some(p);
                self.current = p;
                return Ok(());
            }
            PathEl::ClosePath => {
                let start = self.start.ok_or(OutlineError::MissingMoveTo(index))?;
                if self.current != start {
                    self.segments.push(Segment::line(self.current, start));
                }
                return self.end_subpath(true);
            }
            PathEl::LineTo(p) => Segment::line(self.pen(index)?, p),
            PathEl::QuadTo(p1, p2) => {
                Segment::Cubic(QuadBez::new(self.pen(index)?, p1, p2).raise())
            }
            PathEl::CurveTo(p1, p2, p3) => Segment::cubic(self.pen(index)?, p1, p2, p3),
        };
        self.current = segment.end();
        self.segments.push(segment);
        Ok(())
    }

    /// The current point, if a subpath has been started.
    fn pen(&self, index: usize) -> Result<Point, OutlineError> {
        self.start
            .map(|_| self.current)
            .ok_or(OutlineError::MissingMoveTo(index))
    }

    fn end_subpath(&mut self, closed: bool) -> Result<(), OutlineError> {
        self.start = None;
        if self.segments.is_empty() {
            return Ok(());
        }
        let segments = std::mem::take(&mut self.segments);
        self.paths.push(Path::new(segments, closed)?);
        Ok(())
    }

    fn finish(mut self) -> Result<Outline, OutlineError> {
        self.end_subpath(false)?;
        Ok(Outline::new(self.paths))
    }
}
