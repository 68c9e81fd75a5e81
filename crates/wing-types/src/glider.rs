use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

use wing_geom::{ControlCurve, CurveKind, DistributionKind, GeomError, Profile2D};

use crate::ballooning::Ballooning;
use crate::lines::AttachmentRow;
use crate::shape::PlanformShape;

/// Definition of one cell of the half wing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellDef {
    /// Index into the airfoil catalog.
    pub airfoil: usize,
    /// Index into the ballooning catalog.
    pub ballooning: usize,
    pub material: String,
    pub panels: Vec<PanelDef>,
    pub diagonals: Vec<DiagonalDef>,
    pub straps: Vec<StrapDef>,
}

/// A material patch covering a contiguous range of the cell surface.
///
/// `front` and `back` are contour fractions in [0, 1]: 0 is the trailing
/// edge on the upper surface, ~0.5 the nose, 1 the trailing edge on the
/// lower surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDef {
    pub name: String,
    pub front: f64,
    pub back: f64,
}

/// An internal diagonal reinforcement between the two ribs of a cell.
/// Fractions address the lower surface chordwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagonalDef {
    pub left_front: f64,
    pub left_back: f64,
    pub right_front: f64,
    pub right_back: f64,
}

/// Tension-only members connecting the rib pair of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StrapKind {
    DiagonalStrap,
    TensionLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrapDef {
    pub kind: StrapKind,
    /// Chordwise fraction on the left rib's lower surface.
    pub left: f64,
    /// Chordwise fraction on the right rib's lower surface.
    pub right: f64,
}

/// The parametric description of a glider: the single source of truth the
/// UI edits and every 3D glider is derived from.
///
/// All span-domain curves (planform front/back, arc, angle of attack,
/// z-rotation) run over x in [0, span], where `span` is the flat half-span;
/// the last control point of each is pinned to x = span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametricGlider {
    /// Flat half-span.
    pub span: f64,
    /// Glide ratio, fixes the direction of the oncoming flow.
    pub glide: f64,
    /// Relative air velocity.
    pub v_inf: Vector3<f64>,
    /// Whether the innermost cell straddles the symmetry plane.
    pub has_center_cell: bool,
    pub shape: PlanformShape,
    /// Front-view arc: x is the flat span position, y the vertical offset.
    pub arc: ControlCurve,
    /// Angle of attack over span position, radians.
    pub aoa: ControlCurve,
    /// Rotation of the ribs about the vertical axis over span position.
    pub zrot: ControlCurve,
    pub profiles: Vec<Profile2D>,
    pub balloonings: Vec<Ballooning>,
    pub cells: Vec<CellDef>,
    pub attachment_rows: Vec<AttachmentRow>,
    /// Riser point the line set converges to.
    pub riser: Point3<f64>,
}

impl ParametricGlider {
    /// Ribs of the half wing (cells + 1).
    pub fn rib_count(&self) -> usize {
        self.cells.len() + 1
    }

    /// Spanwise rib fractions in [0, 1].
    pub fn rib_fractions(&self) -> Result<Vec<f64>, GeomError> {
        self.shape.rib_fractions(self.rib_count())
    }

    /// Airfoil assigned to rib `index`: the airfoil of the adjacent cell.
    pub fn rib_airfoil(&self, index: usize) -> Result<&Profile2D, GeomError> {
        let cell = index.min(self.cells.len().saturating_sub(1));
        let def = self.cells.get(cell).ok_or(GeomError::MissingCatalogEntry {
            kind: "cell",
            index: cell,
            len: self.cells.len(),
        })?;
        self.profile(def.airfoil)
    }

    pub fn profile(&self, index: usize) -> Result<&Profile2D, GeomError> {
        self.profiles.get(index).ok_or(GeomError::MissingCatalogEntry {
            kind: "airfoil",
            index,
            len: self.profiles.len(),
        })
    }

    pub fn ballooning(&self, index: usize) -> Result<&Ballooning, GeomError> {
        self.balloonings
            .get(index)
            .ok_or(GeomError::MissingCatalogEntry {
                kind: "ballooning",
                index,
                len: self.balloonings.len(),
            })
    }

    /// Rescale the glider to a new span. Every span-domain curve follows, so
    /// the pinned last control points stay at x = span.
    pub fn set_span(&mut self, span: f64) -> Result<(), GeomError> {
        if span <= 0.0 {
            return Err(GeomError::InvalidParameter {
                name: "span",
                reason: format!("span must be positive, got {}", span),
            });
        }
        let factor = span / self.span;
        self.shape.front.scale(factor, 1.0);
        self.shape.back.scale(factor, 1.0);
        self.arc.scale(factor, factor);
        self.aoa.scale(factor, 1.0);
        self.zrot.scale(factor, 1.0);
        self.span = span;
        Ok(())
    }

    /// Check internal consistency: catalog references resolve, panel and
    /// attachment fractions are in range, the planform has positive chord.
    /// Called before a parametric glider is swapped in, so an invalid edit
    /// never leaves partial state behind.
    pub fn validate(&self) -> Result<(), GeomError> {
        if self.span <= 0.0 {
            return Err(GeomError::InvalidParameter {
                name: "span",
                reason: format!("span must be positive, got {}", self.span),
            });
        }
        if self.cells.is_empty() {
            return Err(GeomError::InvalidParameter {
                name: "cells",
                reason: "glider needs at least one cell".to_string(),
            });
        }
        for (i, cell) in self.cells.iter().enumerate() {
            self.profile(cell.airfoil)?;
            self.ballooning(cell.ballooning)?;
            for panel in &cell.panels {
                if !(0.0..=1.0).contains(&panel.front)
                    || !(0.0..=1.0).contains(&panel.back)
                    || panel.front >= panel.back
                {
                    return Err(GeomError::InvalidParameter {
                        name: "panel",
                        reason: format!(
                            "cell {} panel '{}' has invalid contour range {}..{}",
                            i, panel.name, panel.front, panel.back
                        ),
                    });
                }
            }
        }
        let rib_count = self.rib_count();
        for row in &self.attachment_rows {
            if !(0.0..=1.0).contains(&row.chord_fraction) {
                return Err(GeomError::InvalidParameter {
                    name: "attachment_row",
                    reason: format!(
                        "row '{}' chord fraction {} out of range",
                        row.name, row.chord_fraction
                    ),
                });
            }
            if let Some(&bad) = row.rib_indices.iter().find(|&&r| r >= rib_count) {
                return Err(GeomError::MissingCatalogEntry {
                    kind: "rib",
                    index: bad,
                    len: rib_count,
                });
            }
        }
        for fraction in self.rib_fractions()? {
            let chord = self.shape.chord_at(fraction * self.span)?;
            if chord <= 0.0 {
                return Err(GeomError::DegenerateGeometry {
                    stage: "planform",
                    index: 0,
                    reason: format!("non-positive chord {} at span fraction {}", chord, fraction),
                });
            }
        }
        Ok(())
    }

    /// The built-in starter wing used for new documents.
    pub fn default_template() -> Self {
        // The template is made of fixed, known-good parameters.
        Self::try_default_template().expect("default template parameters are statically valid")
    }

    fn try_default_template() -> Result<Self, GeomError> {
        let span = 4.0;
        let glide = 8.0f64;
        let trim_angle = (1.0 / glide).atan();
        let airspeed = 10.0;

        let shape = PlanformShape {
            front: ControlCurve::new(
                vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(2.0, 0.12),
                    Point2::new(span, 0.55),
                ],
                CurveKind::Bezier,
            )?,
            back: ControlCurve::new(
                vec![
                    Point2::new(0.0, 1.0),
                    Point2::new(2.0, 0.97),
                    Point2::new(span, 0.82),
                ],
                CurveKind::Bezier,
            )?,
            rib_distribution: DistributionKind::Cosine,
        };

        let arc = ControlCurve::new(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(2.0, -0.25),
                Point2::new(span, -1.3),
            ],
            CurveKind::Bezier,
        )?;
        let aoa = ControlCurve::new(
            vec![Point2::new(0.0, 0.17), Point2::new(span, 0.10)],
            CurveKind::Bezier,
        )?;
        let zrot = ControlCurve::new(
            vec![Point2::new(0.0, 0.0), Point2::new(span, 0.06)],
            CurveKind::Bezier,
        )?;

        let ballooning = Ballooning {
            name: "default".to_string(),
            amounts: ControlCurve::new(
                vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(0.4, 0.035),
                    Point2::new(1.0, 0.0),
                ],
                CurveKind::BSpline,
            )?,
        };

        let cell = CellDef {
            airfoil: 0,
            ballooning: 0,
            material: "skytex27".to_string(),
            panels: vec![PanelDef {
                name: "main".to_string(),
                front: 0.0,
                back: 1.0,
            }],
            diagonals: vec![DiagonalDef {
                left_front: 0.08,
                left_back: 0.3,
                right_front: 0.08,
                right_back: 0.3,
            }],
            straps: vec![StrapDef {
                kind: StrapKind::TensionLine,
                left: 0.7,
                right: 0.7,
            }],
        };
        let cells = vec![cell.clone(), cell.clone(), cell.clone(), cell];

        Ok(Self {
            span,
            glide,
            v_inf: Vector3::new(trim_angle.cos(), 0.0, -trim_angle.sin()) * airspeed,
            has_center_cell: false,
            shape,
            arc,
            aoa,
            zrot,
            profiles: vec![
                Profile2D::compute_naca(2412, 81)?,
                Profile2D::compute_naca(4412, 81)?,
            ],
            balloonings: vec![ballooning],
            cells,
            attachment_rows: vec![
                AttachmentRow {
                    name: "A".to_string(),
                    chord_fraction: 0.08,
                    rib_indices: vec![0, 1, 2, 3, 4],
                },
                AttachmentRow {
                    name: "B".to_string(),
                    chord_fraction: 0.4,
                    rib_indices: vec![0, 1, 2, 3, 4],
                },
                AttachmentRow {
                    name: "C".to_string(),
                    chord_fraction: 0.75,
                    rib_indices: vec![0, 1, 2, 3, 4],
                },
            ],
            riser: Point3::new(0.4, 0.0, -6.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_template_is_valid() {
        let g = ParametricGlider::default_template();
        g.validate().unwrap();
        assert_eq!(g.rib_count(), 5);
        assert_eq!(g.rib_fractions().unwrap().len(), 5);
    }

    #[test]
    fn test_catalog_lookup_errors() {
        let g = ParametricGlider::default_template();
        assert!(g.profile(0).is_ok());
        let err = g.profile(99).unwrap_err();
        assert!(matches!(
            err,
            GeomError::MissingCatalogEntry { kind: "airfoil", index: 99, .. }
        ));
        assert!(matches!(
            g.ballooning(7).unwrap_err(),
            GeomError::MissingCatalogEntry { kind: "ballooning", .. }
        ));
    }

    #[test]
    fn test_set_span_rescales_curves() {
        let mut g = ParametricGlider::default_template();
        g.set_span(6.0).unwrap();
        assert_relative_eq!(g.span, 6.0);
        let last = g.aoa.controlpoints().last().copied().unwrap();
        assert_relative_eq!(last.x, 6.0, epsilon = 1e-12);
        let last_front = g.shape.front.controlpoints().last().copied().unwrap();
        assert_relative_eq!(last_front.x, 6.0, epsilon = 1e-12);
        g.validate().unwrap();
    }

    #[test]
    fn test_validate_catches_bad_catalog_reference() {
        let mut g = ParametricGlider::default_template();
        g.cells[1].airfoil = 42;
        assert!(matches!(
            g.validate().unwrap_err(),
            GeomError::MissingCatalogEntry { kind: "airfoil", index: 42, .. }
        ));
    }

    #[test]
    fn test_validate_catches_bad_panel_range() {
        let mut g = ParametricGlider::default_template();
        g.cells[0].panels[0].front = 0.9;
        g.cells[0].panels[0].back = 0.2;
        assert!(matches!(
            g.validate().unwrap_err(),
            GeomError::InvalidParameter { name: "panel", .. }
        ));
    }

    #[test]
    fn test_serde_round_trip() {
        let g = ParametricGlider::default_template();
        let json = serde_json::to_string(&g).unwrap();
        let back: ParametricGlider = serde_json::from_str(&json).unwrap();
        assert_eq!(g, back);
    }
}
