use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A straight rigging line between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub name: String,
    pub upper: Point3<f64>,
    pub lower: Point3<f64>,
}

impl Line {
    /// Sample the line as a polyline with `numpoints` points.
    pub fn points(&self, numpoints: usize) -> Vec<Point3<f64>> {
        let n = numpoints.max(2);
        (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                Point3::from(self.lower.coords.lerp(&self.upper.coords, t))
            })
            .collect()
    }

    pub fn length(&self) -> f64 {
        (self.upper - self.lower).norm()
    }
}

/// The rigging connecting canopy attachment points to the riser. Built once
/// per rebuild and discarded with the glider it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineSet {
    pub lines: Vec<Line>,
}

impl LineSet {
    pub fn total_length(&self) -> f64 {
        self.lines.iter().map(Line::length).sum()
    }

    pub fn mirrored(&self) -> Self {
        Self {
            lines: self
                .lines
                .iter()
                .map(|l| Line {
                    name: l.name.clone(),
                    upper: Point3::new(l.upper.x, -l.upper.y, l.upper.z),
                    lower: Point3::new(l.lower.x, -l.lower.y, l.lower.z),
                })
                .collect(),
        }
    }
}
