//! Polygon triangulation, a thin wrapper around earcutr.

use nalgebra::Point2;

use crate::MeshError;

/// Simple fan triangulation for convex outlines.
fn fan_triangulate(n: usize) -> Vec<[u32; 3]> {
    (1..n - 1).map(|i| [0, i as u32, i as u32 + 1]).collect()
}

/// Triangulate a simple polygon without holes. Returns triangles as index
/// triples into the input points.
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<[u32; 3]>, MeshError> {
    let n = points.len();
    if n < 3 {
        return Err(MeshError::Triangulation {
            part: "outline",
            reason: format!("need at least 3 points, got {}", n),
        });
    }
    if n == 3 {
        return Ok(vec![[0, 1, 2]]);
    }
    if n == 4 {
        return Ok(fan_triangulate(4));
    }

    let mut vertices = Vec::with_capacity(n * 2);
    for p in points {
        vertices.push(p.x);
        vertices.push(p.y);
    }
    let indices = earcutr::earcut(&vertices, &[], 2).map_err(|e| MeshError::Triangulation {
        part: "outline",
        reason: format!("{:?}", e),
    })?;
    Ok(group_triples(indices))
}

/// Triangulate a polygon with interior hole outlines. Returns triangles
/// indexing into the combined vertex list (outer points, then each hole's
/// points in order).
pub fn triangulate_with_holes(
    outer: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> Result<Vec<[u32; 3]>, MeshError> {
    if outer.len() < 3 {
        return Err(MeshError::Triangulation {
            part: "outline",
            reason: format!("need at least 3 points in outer boundary, got {}", outer.len()),
        });
    }
    let valid_holes: Vec<&Vec<Point2<f64>>> = holes.iter().filter(|h| h.len() >= 3).collect();
    if valid_holes.is_empty() {
        return triangulate_polygon(outer);
    }

    let total: usize = outer.len() + valid_holes.iter().map(|h| h.len()).sum::<usize>();
    let mut vertices = Vec::with_capacity(total * 2);
    for p in outer {
        vertices.push(p.x);
        vertices.push(p.y);
    }
    let mut hole_indices = Vec::with_capacity(valid_holes.len());
    for hole in valid_holes {
        hole_indices.push(vertices.len() / 2);
        for p in hole {
            vertices.push(p.x);
            vertices.push(p.y);
        }
    }

    let indices =
        earcutr::earcut(&vertices, &hole_indices, 2).map_err(|e| MeshError::Triangulation {
            part: "outline",
            reason: format!("{:?}", e),
        })?;
    Ok(group_triples(indices))
}

fn group_triples(indices: Vec<usize>) -> Vec<[u32; 3]> {
    indices
        .chunks_exact(3)
        .map(|t| [t[0] as u32, t[1] as u32, t[2] as u32])
        .collect()
}
