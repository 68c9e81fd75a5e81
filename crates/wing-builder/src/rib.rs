use nalgebra::{Point2, Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use wing_geom::{GeomError, Profile2D, SingleSkinParams};

/// The closed set of rib variants.
///
/// A single-skin rib keeps its base profile and derives the skin contour on
/// demand, so re-applying a conversion with new parameters never compounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RibKind {
    Normal,
    SingleSkin { params: SingleSkinParams },
}

/// A cross-sectional airfoil positioned and oriented in 3D along the span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rib {
    /// Chord-normalized base profile.
    pub profile: Profile2D,
    pub kind: RibKind,
    pub chord: f64,
    /// Leading-edge position.
    pub pos: Point3<f64>,
    /// Angle of attack, radians.
    pub aoa: f64,
    /// Rotation about the vertical axis, radians.
    pub zrot: f64,
    /// Roll induced by the arc, radians.
    pub arc_rot: f64,
}

impl Rib {
    /// The profile actually forming the skin: the base profile for a normal
    /// rib, the single-skin reprofile otherwise.
    pub fn skin_profile(&self) -> Result<Profile2D, GeomError> {
        match &self.kind {
            RibKind::Normal => Ok(self.profile.clone()),
            RibKind::SingleSkin { params } => self.profile.single_skin(params),
        }
    }

    /// Orientation of the rib plane: yaw, then arc roll, then pitch.
    pub fn rotation(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::z_axis(), self.zrot)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.arc_rot)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.aoa)
    }

    /// Transform a chord-normalized 2D profile point into world space.
    pub fn to_3d(&self, p: Point2<f64>) -> Point3<f64> {
        let local = Vector3::new(p.x * self.chord, 0.0, p.y * self.chord);
        self.pos + self.rotation() * local
    }

    /// The rib's skin contour in world space.
    pub fn profile_3d(&self) -> Result<Vec<Point3<f64>>, GeomError> {
        let skin = self.skin_profile()?;
        Ok(skin.data().iter().map(|p| self.to_3d(*p)).collect())
    }

    /// Lower-surface point at a chordwise fraction, in world space. Used for
    /// line attachments, diagonals and straps.
    pub fn point_at_chord(&self, fraction: f64) -> Result<Point3<f64>, GeomError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(GeomError::InvalidParameter {
                name: "fraction",
                reason: format!("chord fraction {} out of range", fraction),
            });
        }
        let skin = self.skin_profile()?;
        Ok(self.to_3d(Point2::new(fraction, skin.lower_y_at(fraction))))
    }

    /// The rib reflected across the symmetry plane.
    pub fn mirrored(&self) -> Self {
        Self {
            profile: self.profile.clone(),
            kind: self.kind.clone(),
            chord: self.chord,
            pos: Point3::new(self.pos.x, -self.pos.y, self.pos.z),
            aoa: self.aoa,
            zrot: -self.zrot,
            arc_rot: -self.arc_rot,
        }
    }
}
