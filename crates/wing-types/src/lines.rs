use serde::{Deserialize, Serialize};

/// A row of line attachment points at a fixed chordwise fraction, one
/// attachment per listed rib. Rows correspond to the classic A/B/C riser
/// groups of a paraglider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRow {
    pub name: String,
    /// Chordwise fraction on the lower surface where the lines attach.
    pub chord_fraction: f64,
    /// Indices of the ribs carrying an attachment in this row.
    pub rib_indices: Vec<usize>,
}
