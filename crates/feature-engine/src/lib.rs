pub mod rebuild;
pub mod stack;
pub mod types;

use nalgebra::Point2;
use tracing::{info, instrument};
use uuid::Uuid;

use wing_builder::{build, Glider3D, GliderBuildConfig};
use wing_geom::{ControlCurve, CurveKind};
use wing_types::ParametricGlider;

pub use types::{EngineError, Feature, FeatureOp, FeatureStack};

/// Curves of the parametric glider addressable by the editing entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveTarget {
    Aoa,
    Zrot,
    Arc,
    ShapeFront,
    ShapeBack,
}

/// The recompute engine.
///
/// Owns the parametric glider (the single source of truth), the feature
/// stack layered on top of it, and the cached per-stage outputs. All
/// mutation goes through the entry points here; every edit triggers an
/// immediate, synchronous rebuild of the affected stages.
pub struct Engine {
    parametric: ParametricGlider,
    pub stack: FeatureStack,
    config: GliderBuildConfig,
    base: Glider3D,
    stage_outputs: Vec<Option<Glider3D>>,
    /// Features that failed during the last rebuild.
    pub errors: Vec<(Uuid, String)>,
    pub warnings: Vec<String>,
}

impl Engine {
    pub fn new(
        parametric: ParametricGlider,
        config: GliderBuildConfig,
    ) -> Result<Self, EngineError> {
        let base = build(&parametric, &config)?;
        Ok(Self {
            parametric,
            stack: FeatureStack::new(),
            config,
            base,
            stage_outputs: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        })
    }

    /// The parametric glider currently driving the build.
    pub fn get_parametric_glider(&self) -> &ParametricGlider {
        &self.parametric
    }

    /// Replace the parametric glider, rebuilding everything.
    ///
    /// The new glider is validated and its base build completed before any
    /// state is swapped, so a failing edit leaves the engine untouched.
    #[instrument(skip(self, parametric))]
    pub fn set_parametric_glider(
        &mut self,
        parametric: ParametricGlider,
    ) -> Result<&Glider3D, EngineError> {
        parametric.validate()?;
        let base = build(&parametric, &self.config)?;
        self.parametric = parametric;
        self.base = base;
        self.rebuild_from(0);
        Ok(self.get_glider_instance())
    }

    /// The final materialized glider: the last successful stage output, or
    /// the base build when the stack is empty.
    pub fn get_glider_instance(&self) -> &Glider3D {
        self.stage_outputs
            .iter()
            .rev()
            .find_map(|o| o.as_ref())
            .unwrap_or(&self.base)
    }

    /// Materialized output of a specific feature, if its stage succeeded.
    pub fn stage_output(&self, id: Uuid) -> Option<&Glider3D> {
        let index = self.stack.feature_index(id)?;
        self.stage_outputs.get(index)?.as_ref()
    }

    pub fn build_config(&self) -> &GliderBuildConfig {
        &self.config
    }

    /// Change build resolution (profile points, midribs, symmetry).
    pub fn set_build_config(&mut self, config: GliderBuildConfig) -> Result<(), EngineError> {
        let base = build(&self.parametric, &config)?;
        self.config = config;
        self.base = base;
        self.rebuild_from(0);
        Ok(())
    }

    /// Append a feature and rebuild from it.
    pub fn add_feature(&mut self, name: String, op: FeatureOp) -> Uuid {
        let id = self.stack.add_feature(name, op);
        let index = self.stack.feature_index(id).unwrap_or(0);
        self.rebuild_from(index);
        id
    }

    /// Remove a feature and rebuild from its old position.
    pub fn remove_feature(&mut self, id: Uuid) -> Result<(), EngineError> {
        let pos = self
            .stack
            .feature_index(id)
            .ok_or(EngineError::FeatureNotFound { id })?;
        self.stack.remove_feature(id)?;
        if pos < self.stage_outputs.len() {
            self.stage_outputs.remove(pos);
        }
        self.rebuild_from(pos);
        Ok(())
    }

    /// Edit a feature's operation and rebuild from that stage.
    pub fn edit_feature(&mut self, id: Uuid, op: FeatureOp) -> Result<(), EngineError> {
        let pos = self
            .stack
            .feature_index(id)
            .ok_or(EngineError::FeatureNotFound { id })?;
        let feature = self
            .stack
            .find_feature_mut(id)
            .ok_or(EngineError::FeatureNotFound { id })?;
        feature.op = op;
        self.rebuild_from(pos);
        Ok(())
    }

    /// Suppress or unsuppress a feature and rebuild from it.
    pub fn set_suppressed(&mut self, id: Uuid, suppressed: bool) -> Result<(), EngineError> {
        let pos = self
            .stack
            .feature_index(id)
            .ok_or(EngineError::FeatureNotFound { id })?;
        self.stack.set_suppressed(id, suppressed)?;
        self.rebuild_from(pos);
        Ok(())
    }

    /// Install a restored feature stack wholesale (document load).
    pub fn set_feature_stack(&mut self, stack: FeatureStack) {
        self.stack = stack;
        self.rebuild_from(0);
    }

    /// Low-resolution preview of a curve edit while a control point drag is
    /// live. Nothing is mutated.
    pub fn preview_curve(
        &self,
        target: CurveTarget,
        controlpoints: Vec<Point2<f64>>,
    ) -> Result<Vec<Point2<f64>>, EngineError> {
        let kind = self.curve(target).kind();
        let candidate = ControlCurve::new(controlpoints, kind)?;
        Ok(candidate.sequence_preview())
    }

    /// Commit a curve edit on drag release: validate, swap, full rebuild.
    ///
    /// The last control point of span-domain curves is pinned to x = span.
    pub fn commit_curve(
        &mut self,
        target: CurveTarget,
        mut controlpoints: Vec<Point2<f64>>,
    ) -> Result<&Glider3D, EngineError> {
        if let Some(last) = controlpoints.last_mut() {
            last.x = self.parametric.span;
        }
        let kind = self.curve(target).kind();
        let candidate = ControlCurve::new(controlpoints, kind)?;
        let mut parametric = self.parametric.clone();
        *Self::curve_mut(&mut parametric, target) = candidate;
        self.set_parametric_glider(parametric)
    }

    /// Switch a curve's interpolation family, refitting its control points.
    pub fn set_curve_kind(
        &mut self,
        target: CurveTarget,
        kind: CurveKind,
    ) -> Result<&Glider3D, EngineError> {
        let mut parametric = self.parametric.clone();
        Self::curve_mut(&mut parametric, target).set_kind(kind)?;
        self.set_parametric_glider(parametric)
    }

    /// Change a curve's control point count, refitting.
    pub fn set_curve_numpoints(
        &mut self,
        target: CurveTarget,
        n: usize,
    ) -> Result<&Glider3D, EngineError> {
        let mut parametric = self.parametric.clone();
        Self::curve_mut(&mut parametric, target).set_numpoints(n)?;
        self.set_parametric_glider(parametric)
    }

    fn curve(&self, target: CurveTarget) -> &ControlCurve {
        match target {
            CurveTarget::Aoa => &self.parametric.aoa,
            CurveTarget::Zrot => &self.parametric.zrot,
            CurveTarget::Arc => &self.parametric.arc,
            CurveTarget::ShapeFront => &self.parametric.shape.front,
            CurveTarget::ShapeBack => &self.parametric.shape.back,
        }
    }

    fn curve_mut(parametric: &mut ParametricGlider, target: CurveTarget) -> &mut ControlCurve {
        match target {
            CurveTarget::Aoa => &mut parametric.aoa,
            CurveTarget::Zrot => &mut parametric.zrot,
            CurveTarget::Arc => &mut parametric.arc,
            CurveTarget::ShapeFront => &mut parametric.shape.front,
            CurveTarget::ShapeBack => &mut parametric.shape.back,
        }
    }

    /// Rebuild the stack from the given stage, carrying earlier outputs.
    fn rebuild_from(&mut self, from_index: usize) {
        let existing = std::mem::take(&mut self.stage_outputs);
        let state = rebuild::rebuild(
            &self.stack,
            &self.parametric,
            &self.base,
            from_index,
            existing,
        );
        self.stage_outputs = state.stage_outputs;
        self.errors = state.errors;
        self.warnings = state.warnings;
        info!(
            stages = self.stage_outputs.len(),
            errors = self.errors.len(),
            "stack rebuilt"
        );
    }
}
