use feature_engine::FeatureStack;
use wing_types::ParametricGlider;

use crate::errors::LoadError;

/// Migrate a project from an older format version to the current one.
///
/// Version 1 is the initial format, so there is nothing to migrate yet;
/// the chain exists so future versions have a place to hook in.
pub fn migrate(
    glider: ParametricGlider,
    features: FeatureStack,
    from: u32,
    to: u32,
) -> Result<(ParametricGlider, FeatureStack), LoadError> {
    if from == 0 {
        return Err(LoadError::MigrationFailed {
            from,
            to,
            reason: "version 0 files were never written by a release".to_string(),
        });
    }
    Ok((glider, features))
}
