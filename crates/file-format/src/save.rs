use feature_engine::FeatureStack;
use serde::Serialize;
use wing_types::ParametricGlider;

use crate::metadata::ProjectMetadata;

/// Current file format version.
pub const FORMAT_VERSION: u32 = 1;

/// Format identifier written into every project file.
pub const FORMAT_NAME: &str = "wing-studio";

/// The top-level file structure.
#[derive(Debug, Clone, Serialize)]
pub struct WingFile {
    /// Format identifier.
    pub format: String,
    /// Format version number.
    pub version: u32,
    /// Project metadata.
    pub project: ProjectMetadata,
    /// The parametric glider (the editable source of truth).
    pub glider: ParametricGlider,
    /// The feature stack layered on the glider.
    pub features: FeatureStack,
}

/// Serialize a project to a pretty-printed JSON string.
pub fn save_project(
    glider: &ParametricGlider,
    features: &FeatureStack,
    metadata: &ProjectMetadata,
) -> String {
    let file = WingFile {
        format: FORMAT_NAME.to_string(),
        version: FORMAT_VERSION,
        project: metadata.clone(),
        glider: glider.clone(),
        features: features.clone(),
    };
    serde_json::to_string_pretty(&file).expect("glider serialization should never fail")
}
