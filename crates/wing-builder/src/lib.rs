pub mod build;
pub mod cell;
pub mod export;
pub mod glider;
pub mod lineset;
pub mod rib;

pub use build::{build, GliderBuildConfig};
pub use cell::{Cell, Diagonal, Panel, Strap};
pub use export::{panel_geometry, PanelExportConfig, PanelGeometry, PanelGroup, PanelSolution, PanelSolver};
pub use glider::Glider3D;
pub use lineset::{Line, LineSet};
pub use rib::{Rib, RibKind};

use wing_geom::GeomError;

/// Errors from turning a parametric glider into a 3D glider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Geom(#[from] GeomError),

    #[error("invalid build config: {reason}")]
    InvalidConfig { reason: String },
}
