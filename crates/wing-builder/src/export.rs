use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::info;

use wing_geom::DistributionKind;
use wing_types::ParametricGlider;

use crate::build::{build, GliderBuildConfig};
use crate::BuildError;

/// Resolution of the panel geometry handed to an aerodynamic solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelExportConfig {
    pub midribs: usize,
    pub profile_numpoints: usize,
    /// Chordwise clustering; solvers usually want nose clustering.
    pub distribution: DistributionKind,
    /// Export the complete mirrored wing.
    pub symmetric: bool,
}

impl Default for PanelExportConfig {
    fn default() -> Self {
        Self {
            midribs: 0,
            profile_numpoints: 50,
            distribution: DistributionKind::NoseCosine { coefficient: 0.2 },
            symmetric: true,
        }
    }
}

/// Vertex + polygon-group form of the wing surface, consumable by an
/// external potential-flow solver. The core does not compute aerodynamic
/// forces itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelGeometry {
    pub vertices: Vec<Point3<f64>>,
    pub panels: Vec<PanelGroup>,
    /// Vertex indices along the trailing edge, one per span row.
    pub trailing_edge: Vec<u32>,
}

/// Quads belonging to one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelGroup {
    pub name: String,
    pub quads: Vec<[u32; 4]>,
}

/// Build the wing at export resolution and lay its surface out as spanwise
/// rows of quads.
pub fn panel_geometry(
    glider: &ParametricGlider,
    config: &PanelExportConfig,
) -> Result<PanelGeometry, BuildError> {
    let built = build(
        glider,
        &GliderBuildConfig {
            profile_numpoints: config.profile_numpoints,
            midrib_count: config.midribs,
            chord_distribution: config.distribution,
            symmetric: config.symmetric,
        },
    )?;

    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut trailing_edge: Vec<u32> = Vec::new();
    let mut panels = Vec::with_capacity(built.cells.len());

    let rows_per_cell = config.midribs + 2;
    for (cell_index, cell) in built.cells.iter().enumerate() {
        // Rows: left rib, midribs, right rib. Boundary ribs shared between
        // neighbouring cells are emitted per cell; the solver adapter keys
        // on indices, not on point identity.
        let mut rows: Vec<Vec<Point3<f64>>> = Vec::with_capacity(rows_per_cell);
        rows.push(built.ribs[cell.rib_left].profile_3d()?);
        for contour in &cell.midribs {
            rows.push(contour.clone());
        }
        rows.push(built.ribs[cell.rib_right].profile_3d()?);

        let points_per_row = rows[0].len();
        let base = vertices.len() as u32;
        for row in &rows {
            trailing_edge.push(vertices.len() as u32);
            vertices.extend(row.iter().copied());
        }

        let mut quads = Vec::with_capacity((rows_per_cell - 1) * (points_per_row - 1));
        for r in 0..rows.len() - 1 {
            let row_a = base + (r * points_per_row) as u32;
            let row_b = base + ((r + 1) * points_per_row) as u32;
            for i in 0..points_per_row as u32 - 1 {
                quads.push([row_a + i, row_a + i + 1, row_b + i + 1, row_b + i]);
            }
        }
        panels.push(PanelGroup {
            name: format!("cell_{}", cell_index),
            quads,
        });
    }

    info!(
        vertices = vertices.len(),
        groups = panels.len(),
        "exported panel geometry"
    );
    Ok(PanelGeometry {
        vertices,
        panels,
        trailing_edge,
    })
}

/// Result of an external aerodynamic computation over a panel geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSolution {
    /// Pressure coefficient per vertex.
    pub cp: Vec<f64>,
    pub force: Vector3<f64>,
    pub center_of_pressure: Point3<f64>,
}

/// Capability interface for an external potential-flow solver.
///
/// The core depends on this abstractly; whether an implementation exists is
/// a configuration-time decision of the embedding application.
pub trait PanelSolver {
    fn solve(
        &self,
        geometry: &PanelGeometry,
        v_inf: Vector3<f64>,
    ) -> Result<PanelSolution, BuildError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_geometry_counts() {
        let glider = ParametricGlider::default_template();
        let config = PanelExportConfig {
            midribs: 1,
            profile_numpoints: 21,
            distribution: DistributionKind::NoseCosine { coefficient: 0.2 },
            symmetric: false,
        };
        let geometry = panel_geometry(&glider, &config).unwrap();
        // 4 cells, 3 rows each, 21 points per row.
        assert_eq!(geometry.vertices.len(), 4 * 3 * 21);
        assert_eq!(geometry.panels.len(), 4);
        for group in &geometry.panels {
            assert_eq!(group.quads.len(), 2 * 20);
            for quad in &group.quads {
                for &idx in quad {
                    assert!((idx as usize) < geometry.vertices.len());
                }
            }
        }
        assert_eq!(geometry.trailing_edge.len(), 4 * 3);
    }

    #[test]
    fn test_symmetric_export_covers_both_halves() {
        let glider = ParametricGlider::default_template();
        let geometry = panel_geometry(
            &glider,
            &PanelExportConfig {
                profile_numpoints: 11,
                ..Default::default()
            },
        )
        .unwrap();
        let min_y = geometry.vertices.iter().map(|v| v.y).fold(f64::MAX, f64::min);
        let max_y = geometry.vertices.iter().map(|v| v.y).fold(f64::MIN, f64::max);
        assert!(min_y < -1.0 && max_y > 1.0);
    }
}
