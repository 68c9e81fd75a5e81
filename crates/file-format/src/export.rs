use mesh_gen::Mesh;
use nalgebra::Vector3;

use crate::errors::ExportError;

/// Serialize a mesh's face groups to ASCII STL, one solid per group.
///
/// Polygons with more than three vertices are fan-triangulated; line
/// elements (fewer than three vertices) carry no surface and are skipped.
pub fn mesh_to_stl(mesh: &Mesh, name: &str) -> Result<String, ExportError> {
    let mut out = String::new();
    let mut facets = 0usize;

    for (group, polygons) in &mesh.polygons {
        let faces: Vec<&Vec<u32>> = polygons.iter().filter(|p| p.len() >= 3).collect();
        if faces.is_empty() {
            continue;
        }
        out.push_str(&format!("solid {}_{}\n", name, group));
        for polygon in faces {
            let anchor = mesh.vertices[polygon[0] as usize];
            for w in polygon[1..].windows(2) {
                let b = mesh.vertices[w[0] as usize];
                let c = mesh.vertices[w[1] as usize];
                let normal = (b - anchor).cross(&(c - anchor));
                let normal = if normal.norm() < 1e-15 {
                    Vector3::zeros()
                } else {
                    normal.normalize()
                };
                out.push_str(&format!(
                    "  facet normal {} {} {}\n    outer loop\n",
                    normal.x, normal.y, normal.z
                ));
                for p in [anchor, b, c] {
                    out.push_str(&format!("      vertex {} {} {}\n", p.x, p.y, p.z));
                }
                out.push_str("    endloop\n  endfacet\n");
                facets += 1;
            }
        }
        out.push_str(&format!("endsolid {}_{}\n", name, group));
    }

    if facets == 0 {
        return Err(ExportError::EmptyMesh);
    }
    Ok(out)
}
