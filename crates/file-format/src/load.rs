use feature_engine::FeatureStack;
use serde::Deserialize;
use wing_types::ParametricGlider;

use crate::errors::LoadError;
use crate::metadata::ProjectMetadata;
use crate::save::{FORMAT_NAME, FORMAT_VERSION};

/// The top-level file structure for deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct WingFileRaw {
    pub format: String,
    pub version: u32,
    pub project: ProjectMetadata,
    pub glider: ParametricGlider,
    #[serde(default)]
    pub features: FeatureStack,
}

/// Deserialize a project from a JSON string.
///
/// Validates the format identifier and version, migrating older files when
/// needed. Returns the glider, the feature stack and the metadata.
pub fn load_project(
    json: &str,
) -> Result<(ParametricGlider, FeatureStack, ProjectMetadata), LoadError> {
    let raw: WingFileRaw =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != FORMAT_NAME {
        return Err(LoadError::UnknownFormat(raw.format));
    }
    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    let (glider, features) = if raw.version < FORMAT_VERSION {
        crate::migrate::migrate(raw.glider, raw.features, raw.version, FORMAT_VERSION)?
    } else {
        (raw.glider, raw.features)
    };

    Ok((glider, features, raw.project))
}
