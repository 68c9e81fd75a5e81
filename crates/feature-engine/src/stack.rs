use uuid::Uuid;

use crate::types::{EngineError, Feature, FeatureOp, FeatureStack};

impl FeatureStack {
    pub fn new() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    /// Append a feature at the end of the stack.
    pub fn add_feature(&mut self, name: String, op: FeatureOp) -> Uuid {
        let id = Uuid::new_v4();
        self.features.push(Feature {
            id,
            name,
            op,
            suppressed: false,
        });
        id
    }

    /// Remove a feature by ID. Returns the removed feature.
    pub fn remove_feature(&mut self, id: Uuid) -> Result<Feature, EngineError> {
        let pos = self
            .features
            .iter()
            .position(|f| f.id == id)
            .ok_or(EngineError::FeatureNotFound { id })?;
        Ok(self.features.remove(pos))
    }

    /// Move a feature to a new position, shifting the ones in between.
    pub fn reorder_feature(&mut self, id: Uuid, new_pos: usize) -> Result<(), EngineError> {
        let old_pos = self
            .features
            .iter()
            .position(|f| f.id == id)
            .ok_or(EngineError::FeatureNotFound { id })?;
        let feature = self.features.remove(old_pos);
        let clamped = new_pos.min(self.features.len());
        self.features.insert(clamped, feature);
        Ok(())
    }

    pub fn set_suppressed(&mut self, id: Uuid, suppressed: bool) -> Result<(), EngineError> {
        let feature = self
            .features
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(EngineError::FeatureNotFound { id })?;
        feature.suppressed = suppressed;
        Ok(())
    }

    pub fn find_feature(&self, id: Uuid) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn find_feature_mut(&mut self, id: Uuid) -> Option<&mut Feature> {
        self.features.iter_mut().find(|f| f.id == id)
    }

    pub fn feature_index(&self, id: Uuid) -> Option<usize> {
        self.features.iter().position(|f| f.id == id)
    }
}
