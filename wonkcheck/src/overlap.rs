//! Overlap removal backed by linesweeper.

use kurbo::BezPath;
use linesweeper::topology::Topology;
use wonkiness::{Outline, OverlapRemovalError, OverlapRemover};

/// Default distance, in font units, below which linesweeper treats two
/// points as coincident.
pub const DEFAULT_ACCURACY: f64 = 1e-3;

/// Computes the non-zero union of all contours in an outline.
#[derive(Copy, Clone, Debug)]
pub struct LinesweeperRemover {
    accuracy: f64,
}

impl LinesweeperRemover {
    pub fn new(accuracy: f64) -> Self {
        Self { accuracy }
    }
}

impl Default for LinesweeperRemover {
    fn default() -> Self {
        Self::new(DEFAULT_ACCURACY)
    }
}

impl OverlapRemover for LinesweeperRemover {
    fn remove_overlaps(&self, outline: &Outline) -> Result<Outline, OverlapRemovalError> {
        if outline.is_empty() {
            return Ok(outline.clone());
        }
        if let Some(open) = outline.paths().iter().position(|path| !path.is_closed()) {
            return Err(OverlapRemovalError::new(format!(
                "contour {open} is open and has no inside"
            )));
        }
        let topology = Topology::<i32>::from_path(&outline.to_bez_path(), self.accuracy)
            .map_err(|_| OverlapRemovalError::new("outline has an open contour"))?;
        let mut union = BezPath::new();
        let mut count = 0;
        for contour in topology.contours(|winding| winding != 0).contours() {
            union.extend(contour.path.iter());
            count += 1;
        }
        log::debug!(
            "union of {} contours has {count} contours",
            outline.paths().len()
        );
        Ok(Outline::from_bez_path(&union)?)
    }
}
