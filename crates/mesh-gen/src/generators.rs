//! Mesh generators for ribs, panels, diagonals, straps and lines.
//!
//! Generators return self-contained meshes; combining parts is the job of
//! the `Mesh` union operators, which re-index on merge.

use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use wing_builder::{Cell, Diagonal, Glider3D, Line, Panel, Rib, Strap};
use wing_geom::GeomError;
use wing_types::StrapKind;

use crate::triangulate::triangulate_with_holes;
use crate::{Mesh, MeshError, Polygon};

/// Chordwise band the rib cutouts are distributed over.
const HOLE_BAND: (f64, f64) = (0.15, 0.85);
/// Cutout radius as a fraction of the local profile thickness.
const HOLE_RADIUS_FACTOR: f64 = 0.3;
const HOLE_SEGMENTS: usize = 12;

/// Triangulate a rib's profile outline into a face mesh.
///
/// With `hole_count > 0` the face is perforated by circular cutouts
/// distributed along the chord. `filled = false` yields the outline as a
/// single polygon without triangulation. A zero-thickness rib cannot be
/// meshed solid and is a degenerate-geometry error; outline meshing is
/// still allowed.
pub fn rib_mesh(rib: &Rib, hole_count: usize, filled: bool) -> Result<Mesh, MeshError> {
    let skin = rib.skin_profile()?;

    if !filled {
        let outline: Vec<Point3<f64>> = skin.data().iter().map(|p| rib.to_3d(*p)).collect();
        let polygon: Polygon = (0..outline.len() as u32).collect();
        let mut mesh = Mesh::new();
        mesh.add_part("rib_outlines", &outline, vec![polygon]);
        return Ok(mesh);
    }

    if skin.zero_thickness() {
        return Err(MeshError::Geom(GeomError::DegenerateGeometry {
            stage: "rib",
            index: 0,
            reason: format!("zero-thickness profile '{}' requested for solid meshing", skin.name()),
        }));
    }

    let outline: Vec<Point2<f64>> = skin.data().to_vec();
    let mut holes: Vec<Vec<Point2<f64>>> = Vec::with_capacity(hole_count);
    for k in 1..=hole_count {
        let x = HOLE_BAND.0 + (HOLE_BAND.1 - HOLE_BAND.0) * k as f64 / (hole_count + 1) as f64;
        let upper = skin.upper_y_at(x);
        let lower = skin.lower_y_at(x);
        let radius = HOLE_RADIUS_FACTOR * (upper - lower);
        if radius < 1e-4 {
            continue;
        }
        let center = Point2::new(x, (upper + lower) / 2.0);
        // Clockwise ring, opposite the outline winding.
        let ring = (0..HOLE_SEGMENTS)
            .map(|s| {
                let angle = -2.0 * std::f64::consts::PI * s as f64 / HOLE_SEGMENTS as f64;
                Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
            })
            .collect();
        holes.push(ring);
    }

    let triangles = triangulate_with_holes(&outline, &holes)?;

    let mut flat: Vec<Point2<f64>> = outline;
    for hole in &holes {
        flat.extend_from_slice(hole);
    }
    let vertices: Vec<Point3<f64>> = flat.iter().map(|p| rib.to_3d(*p)).collect();
    let polygons: Vec<Polygon> = triangles.iter().map(|t| t.to_vec()).collect();

    let mut mesh = Mesh::new();
    mesh.add_part("ribs", &vertices, polygons);
    debug!(holes = holes.len(), triangles = mesh.polygon_count(), "rib meshed");
    Ok(mesh)
}

/// Quadrangulate a panel's strip of the cell surface across the (possibly
/// midrib-subdivided) contours.
pub fn panel_mesh(
    glider: &Glider3D,
    cell: &Cell,
    panel: &Panel,
    midrib_count: usize,
) -> Result<Mesh, MeshError> {
    let steps = midrib_count + 1;
    let mut rows: Vec<Vec<Point3<f64>>> = Vec::with_capacity(midrib_count + 2);
    for k in 0..=steps {
        rows.push(cell.midrib(&glider.ribs, k as f64 / steps as f64)?);
    }

    let points_per_row = rows[0].len();
    let i0 = (panel.front * (points_per_row - 1) as f64).round() as usize;
    let i1 = (panel.back * (points_per_row - 1) as f64).round() as usize;
    if i1 <= i0 {
        return Err(MeshError::EmptyPanel {
            front: panel.front,
            back: panel.back,
        });
    }

    let mut vertices = Vec::with_capacity(rows.len() * (i1 - i0 + 1));
    for row in &rows {
        vertices.extend(row[i0..=i1].iter().copied());
    }
    let row_len = (i1 - i0 + 1) as u32;
    let mut polygons = Vec::with_capacity((rows.len() - 1) * (i1 - i0));
    for r in 0..rows.len() as u32 - 1 {
        let a = r * row_len;
        let b = (r + 1) * row_len;
        for i in 0..row_len - 1 {
            polygons.push(vec![a + i, a + i + 1, b + i + 1, b + i]);
        }
    }

    let mut mesh = Mesh::new();
    mesh.add_part(panel.material.clone(), &vertices, polygons);
    Ok(mesh)
}

/// Mesh a diagonal reinforcement as a strip between its rib edges, with
/// `insert_points` interior columns for smooth loading visualization.
pub fn diagonal_mesh(
    diagonal: &Diagonal,
    cell: &Cell,
    ribs: &[Rib],
    insert_points: usize,
) -> Result<Mesh, MeshError> {
    let left = ribs.get(cell.rib_left).ok_or(GeomError::MissingCatalogEntry {
        kind: "rib",
        index: cell.rib_left,
        len: ribs.len(),
    })?;
    let right = ribs.get(cell.rib_right).ok_or(GeomError::MissingCatalogEntry {
        kind: "rib",
        index: cell.rib_right,
        len: ribs.len(),
    })?;

    let left_front = left.point_at_chord(diagonal.left_front)?;
    let left_back = left.point_at_chord(diagonal.left_back)?;
    let right_front = right.point_at_chord(diagonal.right_front)?;
    let right_back = right.point_at_chord(diagonal.right_back)?;

    let columns = insert_points + 2;
    let mut vertices = Vec::with_capacity(columns * 2);
    for j in 0..columns {
        let t = j as f64 / (columns - 1) as f64;
        vertices.push(Point3::from(left_front.coords.lerp(&right_front.coords, t)));
        vertices.push(Point3::from(left_back.coords.lerp(&right_back.coords, t)));
    }

    let mut polygons = Vec::with_capacity(columns - 1);
    for j in 0..columns as u32 - 1 {
        let a = j * 2;
        let b = (j + 1) * 2;
        polygons.push(vec![a, a + 1, b + 1, b]);
    }

    let mut mesh = Mesh::new();
    mesh.add_part("diagonals", &vertices, polygons);
    Ok(mesh)
}

/// Mesh a tension-only strap as a straight 2-point line element, grouped by
/// its variant.
pub fn strap_mesh(strap: &Strap, cell: &Cell, ribs: &[Rib]) -> Result<Mesh, MeshError> {
    let left = ribs.get(cell.rib_left).ok_or(GeomError::MissingCatalogEntry {
        kind: "rib",
        index: cell.rib_left,
        len: ribs.len(),
    })?;
    let right = ribs.get(cell.rib_right).ok_or(GeomError::MissingCatalogEntry {
        kind: "rib",
        index: cell.rib_right,
        len: ribs.len(),
    })?;

    let group = match strap.kind {
        StrapKind::DiagonalStrap => "straps",
        StrapKind::TensionLine => "tension_lines",
    };
    let vertices = [
        left.point_at_chord(strap.left)?,
        right.point_at_chord(strap.right)?,
    ];
    let mut mesh = Mesh::new();
    mesh.add_part(group, &vertices, vec![vec![0, 1]]);
    Ok(mesh)
}

/// Mesh a rigging line as a sampled polyline element.
pub fn line_mesh(line: &Line, numpoints: usize) -> Mesh {
    let vertices = line.points(numpoints);
    let polygon: Polygon = (0..vertices.len() as u32).collect();
    let mut mesh = Mesh::new();
    mesh.add_part("lines", &vertices, vec![polygon]);
    mesh
}

/// Resolution knobs for a whole-glider mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GliderMeshConfig {
    pub rib_holes: usize,
    pub filled_ribs: bool,
    pub diagonal_insert_points: usize,
    pub line_numpoints: usize,
}

impl Default for GliderMeshConfig {
    fn default() -> Self {
        Self {
            rib_holes: 3,
            filled_ribs: true,
            diagonal_insert_points: 2,
            line_numpoints: 5,
        }
    }
}

/// Best-effort mesh of the complete glider: ribs, panels, diagonals, straps
/// and lines merged into one mesh.
///
/// Parts that fail are skipped and reported alongside the result, each with
/// enough context to identify the offending element. Zero-thickness ribs
/// are skipped silently when meshing solid, as documented for `rib_mesh`.
#[instrument(skip(glider, config))]
pub fn glider_mesh(
    glider: &Glider3D,
    config: &GliderMeshConfig,
) -> (Mesh, Vec<(String, MeshError)>) {
    let mut mesh = Mesh::new();
    let mut errors = Vec::new();

    for (i, rib) in glider.ribs.iter().enumerate() {
        let zero = match rib.skin_profile() {
            Ok(skin) => skin.zero_thickness(),
            Err(e) => {
                errors.push((format!("rib {}", i), e.into()));
                continue;
            }
        };
        if config.filled_ribs && zero {
            continue;
        }
        match rib_mesh(rib, config.rib_holes, config.filled_ribs) {
            Ok(part) => mesh += &part,
            Err(e) => errors.push((format!("rib {}", i), e)),
        }
    }

    for (c, cell) in glider.cells.iter().enumerate() {
        for panel in &cell.panels {
            match panel_mesh(glider, cell, panel, cell.midribs.len()) {
                Ok(part) => mesh += &part,
                Err(e) => errors.push((format!("cell {} panel '{}'", c, panel.name), e)),
            }
        }
        for (d, diagonal) in cell.diagonals.iter().enumerate() {
            match diagonal_mesh(diagonal, cell, &glider.ribs, config.diagonal_insert_points) {
                Ok(part) => mesh += &part,
                Err(e) => errors.push((format!("cell {} diagonal {}", c, d), e)),
            }
        }
        for (s, strap) in cell.straps.iter().enumerate() {
            match strap_mesh(strap, cell, &glider.ribs) {
                Ok(part) => mesh += &part,
                Err(e) => errors.push((format!("cell {} strap {}", c, s), e)),
            }
        }
    }

    for line in &glider.lineset.lines {
        mesh += &line_mesh(line, config.line_numpoints);
    }

    debug!(
        vertices = mesh.vertex_count(),
        polygons = mesh.polygon_count(),
        errors = errors.len(),
        "glider meshed"
    );
    (mesh, errors)
}
