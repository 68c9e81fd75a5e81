use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wing_builder::BuildError;
use wing_geom::{GeomError, SingleSkinParams};

/// The ordered chain of geometric overrides layered on the base glider.
///
/// Order is significant: later features apply last and win over earlier
/// ones touching the same rib or cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureStack {
    pub features: Vec<Feature>,
}

/// A single feature in the stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    /// Unique identifier.
    pub id: Uuid,
    /// User-visible name.
    pub name: String,
    /// The override this feature performs.
    pub op: FeatureOp,
    /// Suppressed features pass their input through unchanged.
    pub suppressed: bool,
}

/// The closed set of feature operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeatureOp {
    /// Replace the profile of the listed ribs with a catalog airfoil.
    RibProfile { ribs: Vec<usize>, airfoil: usize },
    /// Replace the ballooning of the listed cells with a catalog entry.
    Ballooning { cells: Vec<usize>, ballooning: usize },
    /// Apply a shark-gill deformation to the listed ribs.
    SharkGill {
        ribs: Vec<usize>,
        x1: f64,
        x2: f64,
        x3: f64,
        y_add: f64,
    },
    /// Convert the listed ribs to single-skin ribs. Re-applying to an
    /// already converted rib replaces its parameters instead of converting
    /// twice.
    SingleSkin {
        ribs: Vec<usize>,
        params: SingleSkinParams,
    },
    /// Deflect the trailing edge of the listed ribs.
    Flap {
        ribs: Vec<usize>,
        flap_begin: f64,
        flap_amount: f64,
    },
}

impl FeatureOp {
    /// Short label used for auto-generated feature names.
    pub fn label(&self) -> &'static str {
        match self {
            FeatureOp::RibProfile { .. } => "rib profile",
            FeatureOp::Ballooning { .. } => "ballooning",
            FeatureOp::SharkGill { .. } => "shark gill",
            FeatureOp::SingleSkin { .. } => "single skin",
            FeatureOp::Flap { .. } => "flap",
        }
    }
}

/// Errors from the feature engine.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("feature not found: {id}")]
    FeatureNotFound { id: Uuid },

    #[error("feature targets {kind} {index} but glider has {len}")]
    TargetOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error(transparent)]
    Geom(#[from] GeomError),

    #[error(transparent)]
    Build(#[from] BuildError),
}
