pub mod curves;
pub mod distribution;
pub mod error;
pub mod profile;

pub use curves::{ControlCurve, CurveKind, SAMPLES_ON_DRAG, SAMPLES_ON_RELEASE};
pub use distribution::{distribution, DistributionKind};
pub use error::GeomError;
pub use profile::{Profile2D, SingleSkinParams};

/// Tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Points closer than this are considered coincident (chord units).
    pub coincidence: f64,
    /// Contours thinner than this are considered zero-thickness.
    pub thickness: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-9,
            thickness: 1e-8,
        }
    }
}

impl Tolerance {
    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.coincidence
    }
}
