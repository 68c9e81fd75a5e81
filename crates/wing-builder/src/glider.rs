use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::lineset::LineSet;
use crate::rib::Rib;

/// A realized 3D glider: ribs positioned in space, cells connecting adjacent
/// ribs, and the rigging. Rebuilt from scratch on every upstream change and
/// otherwise discarded; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glider3D {
    pub ribs: Vec<Rib>,
    pub cells: Vec<Cell>,
    pub lineset: LineSet,
    /// True while only the half wing is materialized.
    pub half: bool,
}

impl Glider3D {
    /// The wing reflected across the symmetry plane.
    pub fn mirrored(&self) -> Self {
        Self {
            ribs: self.ribs.iter().map(Rib::mirrored).collect(),
            cells: self
                .cells
                .iter()
                .map(|c| {
                    let mut cell = c.clone();
                    cell.midribs = c
                        .midribs
                        .iter()
                        .map(|contour| {
                            contour
                                .iter()
                                .map(|p| Point3::new(p.x, -p.y, p.z))
                                .collect()
                        })
                        .collect();
                    cell
                })
                .collect(),
            lineset: self.lineset.mirrored(),
            half: self.half,
        }
    }

    /// The complete wing: the mirrored half concatenated with this one.
    ///
    /// The root rib sits on the symmetry plane and is shared, not
    /// duplicated. Cell rib indices are remapped into the combined list.
    pub fn complete(&self) -> Self {
        if !self.half {
            return self.clone();
        }
        let mirrored = self.mirrored();
        let n = self.ribs.len();
        let tolerance = wing_geom::Tolerance::default();
        let shared_root = self
            .ribs
            .first()
            .map(|r| tolerance.is_zero_length(r.pos.y))
            .unwrap_or(false);
        let skip = usize::from(shared_root);

        // Mirrored ribs run tip-to-root so the combined list is ordered
        // left tip .. root .. right tip.
        let mut ribs: Vec<Rib> = mirrored.ribs.iter().skip(skip).rev().cloned().collect();
        let offset = ribs.len();
        ribs.extend(self.ribs.iter().cloned());

        // Mirrored rib i lands at combined index n-1-i; when the root is
        // shared that index coincides with the original root rib.
        let mut cells = Vec::with_capacity(self.cells.len() * 2);
        for cell in mirrored.cells.iter() {
            let mut c = cell.clone();
            let (a, b) = (n - 1 - c.rib_left, n - 1 - c.rib_right);
            c.rib_left = a.min(b);
            c.rib_right = a.max(b);
            // Left and right swap under the reflection, so the cached
            // midrib contours must run the other way too.
            c.midribs.reverse();
            cells.push(c);
        }
        cells.reverse();
        for cell in self.cells.iter() {
            let mut c = cell.clone();
            c.rib_left += offset;
            c.rib_right += offset;
            cells.push(c);
        }

        let mut lineset = mirrored.lineset;
        lineset.lines.extend(self.lineset.lines.iter().cloned());

        Self {
            ribs,
            cells,
            lineset,
            half: false,
        }
    }
}
