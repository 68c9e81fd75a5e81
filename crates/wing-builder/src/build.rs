use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use wing_geom::{ControlCurve, DistributionKind, GeomError, SAMPLES_ON_RELEASE};
use wing_types::ParametricGlider;

use crate::cell::{Cell, Diagonal, Panel, Strap};
use crate::glider::Glider3D;
use crate::lineset::{Line, LineSet};
use crate::rib::{Rib, RibKind};
use crate::BuildError;

/// Resolution and scope of a 3D rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GliderBuildConfig {
    /// Contour points per rib profile.
    pub profile_numpoints: usize,
    /// Interpolated ribs generated inside each cell.
    pub midrib_count: usize,
    /// Chordwise clustering of the resampled profiles.
    pub chord_distribution: DistributionKind,
    /// Build the complete mirrored wing instead of the half wing.
    pub symmetric: bool,
}

impl Default for GliderBuildConfig {
    fn default() -> Self {
        Self {
            profile_numpoints: 13,
            midrib_count: 0,
            chord_distribution: DistributionKind::Cosine,
            symmetric: false,
        }
    }
}

/// Build a 3D glider from the parametric description.
///
/// Rib roots come from the planform, the arc lofts them out of plane, and
/// the angle-of-attack and z-rotation curves orient each rib at its span
/// fraction. Half-wing output is the default; `symmetric` produces the
/// explicit mirror concatenation.
#[instrument(skip(glider, config), fields(ribs = glider.rib_count()))]
pub fn build(glider: &ParametricGlider, config: &GliderBuildConfig) -> Result<Glider3D, BuildError> {
    if config.profile_numpoints < 5 {
        return Err(BuildError::InvalidConfig {
            reason: format!(
                "profile_numpoints must be at least 5, got {}",
                config.profile_numpoints
            ),
        });
    }
    glider.validate()?;

    let fractions = glider.rib_fractions()?;
    let arc = ArcMapping::new(&glider.arc, glider.span)?;

    let mut ribs = Vec::with_capacity(fractions.len());
    for (i, &fraction) in fractions.iter().enumerate() {
        let x_span = fraction * glider.span;
        let (front, back) = glider.shape.front_back(x_span)?;
        let chord = back - front;
        if chord <= 0.0 {
            return Err(GeomError::DegenerateGeometry {
                stage: "rib",
                index: i,
                reason: format!("non-positive chord {}", chord),
            }
            .into());
        }

        let profile = glider
            .rib_airfoil(i)?
            .resample_with(config.profile_numpoints, config.chord_distribution)?;
        if profile.self_intersects() {
            return Err(GeomError::DegenerateGeometry {
                stage: "rib",
                index: i,
                reason: format!(
                    "self-intersecting resampled airfoil '{}'",
                    profile.name()
                ),
            }
            .into());
        }

        let (arc_point, arc_rot) = arc.at(x_span);
        ribs.push(Rib {
            profile,
            kind: RibKind::Normal,
            chord,
            pos: Point3::new(front, arc_point.x, arc_point.y),
            aoa: glider.aoa.interpolate_x(x_span)?,
            zrot: glider.zrot.interpolate_x(x_span)?,
            arc_rot,
        });
    }
    debug!(count = ribs.len(), "positioned ribs");

    let mut cells = Vec::with_capacity(glider.cells.len());
    for (j, def) in glider.cells.iter().enumerate() {
        let mut cell = Cell {
            rib_left: j,
            rib_right: j + 1,
            ballooning: glider.ballooning(def.ballooning)?.clone(),
            panels: def
                .panels
                .iter()
                .map(|p| Panel {
                    name: p.name.clone(),
                    material: def.material.clone(),
                    front: p.front,
                    back: p.back,
                })
                .collect(),
            diagonals: def
                .diagonals
                .iter()
                .map(|d| Diagonal {
                    left_front: d.left_front,
                    left_back: d.left_back,
                    right_front: d.right_front,
                    right_back: d.right_back,
                })
                .collect(),
            straps: def
                .straps
                .iter()
                .map(|s| Strap {
                    kind: s.kind,
                    left: s.left,
                    right: s.right,
                })
                .collect(),
            material: def.material.clone(),
            midribs: Vec::new(),
        };
        if config.midrib_count > 0 {
            let steps = config.midrib_count + 1;
            let mut midribs = Vec::with_capacity(config.midrib_count);
            for k in 1..steps {
                midribs.push(cell.midrib(&ribs, k as f64 / steps as f64)?);
            }
            cell.midribs = midribs;
        }
        cells.push(cell);
    }

    let lineset = build_lineset(glider, &ribs)?;

    let built = Glider3D {
        ribs,
        cells,
        lineset,
        half: true,
    };
    info!(
        ribs = built.ribs.len(),
        cells = built.cells.len(),
        lines = built.lineset.lines.len(),
        symmetric = config.symmetric,
        "glider rebuilt"
    );
    Ok(if config.symmetric {
        built.complete()
    } else {
        built
    })
}

/// Maps flat span positions onto the arc curve by arc length, so the fabric
/// length along the arc equals the flat span.
struct ArcMapping {
    points: Vec<Point2<f64>>,
    cumulative: Vec<f64>,
    scale: f64,
}

impl ArcMapping {
    fn new(arc: &ControlCurve, span: f64) -> Result<Self, GeomError> {
        let points = arc.get_sequence(SAMPLES_ON_RELEASE)?;
        let mut cumulative = Vec::with_capacity(points.len());
        cumulative.push(0.0);
        for w in points.windows(2) {
            let last = cumulative[cumulative.len() - 1];
            cumulative.push(last + (w[1] - w[0]).norm());
        }
        let total = cumulative[cumulative.len() - 1];
        if total < 1e-12 {
            return Err(GeomError::InvalidCurve {
                reason: "arc curve has zero length".to_string(),
            });
        }
        Ok(Self {
            points,
            cumulative,
            scale: total / span,
        })
    }

    /// Position on the arc (lateral, vertical) and roll angle at the given
    /// flat span position.
    fn at(&self, x_span: f64) -> (Point2<f64>, f64) {
        let target = (x_span * self.scale)
            .clamp(0.0, self.cumulative[self.cumulative.len() - 1]);
        let mut seg = 0usize;
        while seg < self.points.len() - 2 && self.cumulative[seg + 1] < target {
            seg += 1;
        }
        let a = self.points[seg];
        let b = self.points[seg + 1];
        let seg_len = self.cumulative[seg + 1] - self.cumulative[seg];
        let local = if seg_len < 1e-15 {
            0.0
        } else {
            (target - self.cumulative[seg]) / seg_len
        };
        let position = Point2::new(a.x + (b.x - a.x) * local, a.y + (b.y - a.y) * local);
        let tangent = b - a;
        let roll = tangent.y.atan2(tangent.x);
        (position, roll)
    }
}

fn build_lineset(glider: &ParametricGlider, ribs: &[Rib]) -> Result<LineSet, BuildError> {
    let mut lines = Vec::new();
    for row in &glider.attachment_rows {
        let mut attachments = Vec::with_capacity(row.rib_indices.len());
        for &rib_index in &row.rib_indices {
            let rib = ribs.get(rib_index).ok_or(GeomError::MissingCatalogEntry {
                kind: "rib",
                index: rib_index,
                len: ribs.len(),
            })?;
            attachments.push((rib_index, rib.point_at_chord(row.chord_fraction)?));
        }
        if attachments.is_empty() {
            continue;
        }
        // One gallery node per row, pulled two thirds of the way down to the
        // riser, then one upper line per attachment.
        let mean = attachments
            .iter()
            .fold(Point3::origin(), |acc, (_, p)| acc + p.coords)
            / attachments.len() as f64;
        let node = Point3::from(glider.riser.coords.lerp(&mean.coords, 1.0 / 3.0));
        lines.push(Line {
            name: format!("{}_main", row.name),
            upper: node,
            lower: glider.riser,
        });
        for (rib_index, attachment) in attachments {
            lines.push(Line {
                name: format!("{}_{}", row.name, rib_index),
                upper: attachment,
                lower: node,
            });
        }
    }
    Ok(LineSet { lines })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_build_default_template() {
        let glider = ParametricGlider::default_template();
        let built = build(&glider, &GliderBuildConfig::default()).unwrap();
        assert_eq!(built.ribs.len(), 5);
        assert_eq!(built.cells.len(), 4);
        assert!(built.half);
        // One rib per shape-curve sample, no midribs.
        for cell in &built.cells {
            assert!(cell.midribs.is_empty());
        }
        // Root rib sits on the symmetry plane, tip does not.
        assert_relative_eq!(built.ribs[0].pos.y, 0.0, epsilon = 1e-9);
        assert!(built.ribs[4].pos.y > 1.0);
    }

    #[test]
    fn test_build_with_midribs() {
        let glider = ParametricGlider::default_template();
        let config = GliderBuildConfig {
            midrib_count: 2,
            ..Default::default()
        };
        let built = build(&glider, &config).unwrap();
        // 2 boundary + 2 interpolated contours per cell.
        for cell in &built.cells {
            assert_eq!(cell.midribs.len(), 2);
        }
    }

    #[test]
    fn test_build_symmetric_doubles_cells() {
        let glider = ParametricGlider::default_template();
        let half = build(&glider, &GliderBuildConfig::default()).unwrap();
        let full = build(
            &glider,
            &GliderBuildConfig {
                symmetric: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(!full.half);
        assert_eq!(full.cells.len(), 2 * half.cells.len());
        // Shared root rib is not duplicated.
        assert_eq!(full.ribs.len(), 2 * half.ribs.len() - 1);
        // Every cell's rib indices are valid and ordered.
        for cell in &full.cells {
            assert!(cell.rib_left < cell.rib_right);
            assert!(cell.rib_right < full.ribs.len());
        }
    }

    #[test]
    fn test_build_reports_missing_catalog_entry() {
        let mut glider = ParametricGlider::default_template();
        glider.cells[2].ballooning = 9;
        let err = build(&glider, &GliderBuildConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            BuildError::Geom(GeomError::MissingCatalogEntry { kind: "ballooning", .. })
        ));
    }

    #[test]
    fn test_build_rejects_tiny_profile_count() {
        let glider = ParametricGlider::default_template();
        let config = GliderBuildConfig {
            profile_numpoints: 3,
            ..Default::default()
        };
        assert!(matches!(
            build(&glider, &config),
            Err(BuildError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_lineset_connects_riser_to_ribs() {
        let glider = ParametricGlider::default_template();
        let built = build(&glider, &GliderBuildConfig::default()).unwrap();
        // 3 rows, each with 1 main line + 5 attachments.
        assert_eq!(built.lineset.lines.len(), 3 * 6);
        let main = built
            .lineset
            .lines
            .iter()
            .find(|l| l.name == "A_main")
            .unwrap();
        assert_relative_eq!(main.lower.x, glider.riser.x, epsilon = 1e-12);
    }

    #[test]
    fn test_arc_mapping_endpoints() {
        let glider = ParametricGlider::default_template();
        let arc = ArcMapping::new(&glider.arc, glider.span).unwrap();
        let (start, _) = arc.at(0.0);
        assert_relative_eq!(start.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(start.y, 0.0, epsilon = 1e-9);
        let (end, roll) = arc.at(glider.span);
        assert_relative_eq!(end.x, glider.span, epsilon = 1e-9);
        assert_relative_eq!(end.y, -1.3, epsilon = 1e-9);
        // Tips roll downward on this template.
        assert!(roll < 0.0);
    }
}
