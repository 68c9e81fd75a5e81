use serde::{Deserialize, Serialize};

use crate::error::GeomError;

/// Sampling strategy for placing ribs / profile points along a unit interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DistributionKind {
    /// Evenly spaced samples.
    Uniform,
    /// Cosine spacing, clustered toward both ends.
    Cosine,
    /// Cosine spacing clustered toward 0 (the nose). The coefficient in (0, 1)
    /// blends between uniform (0) and full nose clustering (1).
    NoseCosine { coefficient: f64 },
}

/// Generate `n` sample positions spanning [0, 1].
///
/// The result is strictly increasing with first = 0 and last = 1 for every
/// kind. Pure function of its inputs; mesh topology consistency across
/// rebuilds depends on this being deterministic.
pub fn distribution(kind: DistributionKind, n: usize) -> Result<Vec<f64>, GeomError> {
    if n < 2 {
        return Err(GeomError::InvalidParameter {
            name: "n",
            reason: format!("need at least 2 samples, got {}", n),
        });
    }
    if let DistributionKind::NoseCosine { coefficient } = kind {
        if !(0.0..1.0).contains(&coefficient) || coefficient == 0.0 {
            return Err(GeomError::InvalidParameter {
                name: "coefficient",
                reason: format!("nose-cosine coefficient must lie in (0, 1), got {}", coefficient),
            });
        }
    }

    let last = (n - 1) as f64;
    let mut values: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64 / last;
            match kind {
                DistributionKind::Uniform => t,
                DistributionKind::Cosine => {
                    (1.0 - (std::f64::consts::PI * t).cos()) / 2.0
                }
                DistributionKind::NoseCosine { coefficient } => {
                    let clustered = 1.0 - (std::f64::consts::FRAC_PI_2 * t).cos();
                    coefficient * clustered + (1.0 - coefficient) * t
                }
            }
        })
        .collect();

    // Endpoints are exact by definition; pin them so downstream comparisons
    // never see floating-point residue from the trig evaluation.
    values[0] = 0.0;
    values[n - 1] = 1.0;
    Ok(values)
}
