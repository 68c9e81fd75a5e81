use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use wing_types::{Ballooning, StrapKind};
use wing_geom::GeomError;

use crate::rib::Rib;

/// A material patch covering part of the cell surface, addressed by contour
/// fractions (0 = trailing edge upper, 1 = trailing edge lower).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub name: String,
    pub material: String,
    pub front: f64,
    pub back: f64,
}

/// An internal diagonal reinforcement between the cell's rib pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagonal {
    pub left_front: f64,
    pub left_back: f64,
    pub right_front: f64,
    pub right_back: f64,
}

/// A tension-only member between the cell's rib pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strap {
    pub kind: StrapKind,
    pub left: f64,
    pub right: f64,
}

/// The surface spanning two adjacent ribs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Index of the left boundary rib in the glider's rib list.
    pub rib_left: usize,
    /// Index of the right boundary rib.
    pub rib_right: usize,
    pub ballooning: Ballooning,
    pub panels: Vec<Panel>,
    pub diagonals: Vec<Diagonal>,
    pub straps: Vec<Strap>,
    pub material: String,
    /// Interpolated contours between the boundary ribs, left to right,
    /// excluding the boundary ribs themselves.
    pub midribs: Vec<Vec<Point3<f64>>>,
}

impl Cell {
    /// Interpolated contour at position t in [0, 1] across the cell.
    ///
    /// t = 0 reproduces the left rib's contour exactly, t = 1 the right's.
    /// In between, corresponding profile points are blended linearly and
    /// bulged outward along the surface normal by the ballooning amplitude,
    /// scaled with a parabola vanishing at both ribs.
    pub fn midrib(&self, ribs: &[Rib], t: f64) -> Result<Vec<Point3<f64>>, GeomError> {
        let left = ribs.get(self.rib_left).ok_or(GeomError::InvalidParameter {
            name: "rib_left",
            reason: format!("rib index {} out of range", self.rib_left),
        })?;
        let right = ribs.get(self.rib_right).ok_or(GeomError::InvalidParameter {
            name: "rib_right",
            reason: format!("rib index {} out of range", self.rib_right),
        })?;

        if t <= 0.0 {
            return left.profile_3d();
        }
        if t >= 1.0 {
            return right.profile_3d();
        }

        let mut left_skin = left.skin_profile()?;
        let mut right_skin = right.skin_profile()?;
        if left_skin.numpoints() != right_skin.numpoints() {
            // Single-skin conversions can change the contour point count;
            // bring both sides to a common sampling before blending.
            let n = left_skin.numpoints().max(right_skin.numpoints());
            left_skin = left_skin.resample(n)?;
            right_skin = right_skin.resample(n)?;
        }

        let l3d: Vec<Point3<f64>> = left_skin.data().iter().map(|p| left.to_3d(*p)).collect();
        let r3d: Vec<Point3<f64>> = right_skin.data().iter().map(|p| right.to_3d(*p)).collect();
        let mean_chord = (left.chord + right.chord) / 2.0;
        let parabola = 4.0 * t * (1.0 - t);
        let n = l3d.len();

        let mut contour = Vec::with_capacity(n);
        for i in 0..n {
            let blended = Point3::from(l3d[i].coords.lerp(&r3d[i].coords, t));
            let fraction = left_skin.data()[i].x.clamp(0.0, 1.0);
            let amplitude = self.ballooning.amplitude(fraction)?;
            if amplitude <= 0.0 {
                contour.push(blended);
                continue;
            }
            let span_dir = r3d[i] - l3d[i];
            let prev = l3d[if i == 0 { 0 } else { i - 1 }];
            let next = l3d[if i + 1 == n { n - 1 } else { i + 1 }];
            let tangent = next - prev;
            let normal = span_dir.cross(&tangent);
            let norm = normal.norm();
            let offset = if norm < 1e-12 {
                Vector3::zeros()
            } else {
                normal / norm * (parabola * amplitude * mean_chord)
            };
            contour.push(blended + offset);
        }
        Ok(contour)
    }
}
