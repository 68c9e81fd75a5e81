use serde::{Deserialize, Serialize};

use wing_geom::{ControlCurve, GeomError};

/// Cross-section bulge between two ribs, as a curve of amplitude over the
/// chordwise fraction [0, 1]. Amplitudes are relative to the cell's chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ballooning {
    pub name: String,
    pub amounts: ControlCurve,
}

impl Ballooning {
    /// Bulge amplitude at chordwise fraction x, clamped to non-negative.
    pub fn amplitude(&self, x: f64) -> Result<f64, GeomError> {
        Ok(self.amounts.interpolate_x(x)?.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point2;
    use wing_geom::CurveKind;

    #[test]
    fn test_amplitude_interpolates_and_clamps() {
        let b = Ballooning {
            name: "default".to_string(),
            amounts: ControlCurve::new(
                vec![
                    Point2::new(0.0, -0.01),
                    Point2::new(0.5, 0.04),
                    Point2::new(1.0, 0.0),
                ],
                CurveKind::Linear,
            )
            .unwrap(),
        };
        assert_relative_eq!(b.amplitude(0.5).unwrap(), 0.04, epsilon = 1e-9);
        // Negative curve values clamp to zero.
        assert_eq!(b.amplitude(0.0).unwrap(), 0.0);
    }
}
