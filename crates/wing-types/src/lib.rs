pub mod ballooning;
pub mod glider;
pub mod lines;
pub mod shape;

pub use ballooning::Ballooning;
pub use glider::{CellDef, DiagonalDef, PanelDef, ParametricGlider, StrapDef, StrapKind};
pub use lines::AttachmentRow;
pub use shape::PlanformShape;
