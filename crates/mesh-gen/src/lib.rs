pub mod generators;
pub mod triangulate;

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use wing_geom::GeomError;

pub use generators::{
    diagonal_mesh, glider_mesh, line_mesh, panel_mesh, rib_mesh, strap_mesh, GliderMeshConfig,
};

/// A polygon as indices into the owning mesh's vertex list. Two indices
/// form a line element, three or more a face.
pub type Polygon = Vec<u32>;

/// Errors from mesh generation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MeshError {
    #[error(transparent)]
    Geom(#[from] GeomError),

    #[error("triangulation failed for {part}: {reason}")]
    Triangulation { part: &'static str, reason: String },

    #[error("panel range {front}..{back} selects no surface strip")]
    EmptyPanel { front: f64, back: f64 },
}

/// An indexed mesh: a flat vertex list plus polygon groups keyed by
/// material/part name.
///
/// Polygon indices always reference this mesh's own vertex list; the union
/// operators re-index on every merge, so meshes from different generators
/// combine without collisions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub polygons: BTreeMap<String, Vec<Polygon>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.values().map(Vec::len).sum()
    }

    /// Append a named part: vertices plus polygons indexing into them.
    /// The polygon indices are offset into the combined vertex list.
    pub fn add_part(
        &mut self,
        name: impl Into<String>,
        vertices: &[Point3<f64>],
        polygons: Vec<Polygon>,
    ) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        let shifted: Vec<Polygon> = polygons
            .into_iter()
            .map(|poly| poly.into_iter().map(|i| i + offset).collect())
            .collect();
        self.polygons.entry(name.into()).or_default().extend(shifted);
    }

    /// Disjoint union: append the other mesh's vertices and re-index its
    /// polygons into the combined list.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        for (name, polys) in &other.polygons {
            let shifted = polys
                .iter()
                .map(|poly| poly.iter().map(|&i| i + offset).collect());
            self.polygons.entry(name.clone()).or_default().extend(shifted);
        }
    }

    /// True when every polygon index points into the vertex list.
    pub fn indices_valid(&self) -> bool {
        let n = self.vertices.len() as u32;
        self.polygons
            .values()
            .flatten()
            .flatten()
            .all(|&i| i < n)
    }
}

impl AddAssign<&Mesh> for Mesh {
    fn add_assign(&mut self, rhs: &Mesh) {
        self.merge(rhs);
    }
}

impl Add<&Mesh> for Mesh {
    type Output = Mesh;

    fn add(mut self, rhs: &Mesh) -> Mesh {
        self.merge(rhs);
        self
    }
}
