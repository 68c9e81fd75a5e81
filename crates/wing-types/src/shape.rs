use serde::{Deserialize, Serialize};

use wing_geom::{distribution, ControlCurve, DistributionKind, GeomError};

/// The planform of the half wing in plan view.
///
/// Both curves run over span position x in [0, span]; y is the chordwise
/// position of the leading (front) and trailing (back) line. The chord at a
/// span position is back minus front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanformShape {
    pub front: ControlCurve,
    pub back: ControlCurve,
    /// Strategy placing ribs along the span.
    pub rib_distribution: DistributionKind,
}

impl PlanformShape {
    /// Front and back chordwise positions at span position x.
    pub fn front_back(&self, x: f64) -> Result<(f64, f64), GeomError> {
        Ok((self.front.interpolate_x(x)?, self.back.interpolate_x(x)?))
    }

    /// Chord length at span position x.
    pub fn chord_at(&self, x: f64) -> Result<f64, GeomError> {
        let (front, back) = self.front_back(x)?;
        Ok(back - front)
    }

    /// Spanwise rib fractions in [0, 1] for the given rib count.
    pub fn rib_fractions(&self, rib_count: usize) -> Result<Vec<f64>, GeomError> {
        distribution(self.rib_distribution, rib_count)
    }

    /// Projected (flat) area of the half wing, integrated over the span.
    pub fn flat_area(&self, span: f64, samples: usize) -> Result<f64, GeomError> {
        let mut area = 0.0;
        let mut prev_chord = self.chord_at(0.0)?;
        for i in 1..=samples {
            let x = span * i as f64 / samples as f64;
            let chord = self.chord_at(x)?;
            area += (prev_chord + chord) / 2.0 * (span / samples as f64);
            prev_chord = chord;
        }
        Ok(area)
    }
}
