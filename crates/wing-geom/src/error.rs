/// Errors from curve, distribution and profile construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeomError {
    #[error("invalid curve: {reason}")]
    InvalidCurve { reason: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("degenerate geometry at {stage} {index}: {reason}")]
    DegenerateGeometry {
        stage: &'static str,
        index: usize,
        reason: String,
    },

    #[error("no {kind} catalog entry at index {index} (catalog has {len})")]
    MissingCatalogEntry {
        kind: &'static str,
        index: usize,
        len: usize,
    },
}
