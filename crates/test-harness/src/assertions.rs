use nalgebra::Point3;

use mesh_gen::Mesh;

/// Panics unless the values are strictly increasing.
pub fn assert_strictly_increasing(values: &[f64]) {
    for (i, w) in values.windows(2).enumerate() {
        assert!(
            w[1] > w[0],
            "values not strictly increasing at {}: {} -> {}",
            i,
            w[0],
            w[1]
        );
    }
}

/// Panics if any polygon index points outside the mesh's vertex list.
pub fn assert_mesh_valid(mesh: &Mesh) {
    assert!(
        mesh.indices_valid(),
        "mesh has dangling polygon indices ({} vertices)",
        mesh.vertex_count()
    );
}

/// Panics unless two contours match pointwise within the tolerance.
pub fn assert_contours_close(a: &[Point3<f64>], b: &[Point3<f64>], tolerance: f64) {
    assert_eq!(a.len(), b.len(), "contour point counts differ");
    for (i, (p, q)) in a.iter().zip(b).enumerate() {
        let d = (p - q).norm();
        assert!(
            d <= tolerance,
            "contours deviate by {} at point {} (tolerance {})",
            d,
            i,
            tolerance
        );
    }
}
