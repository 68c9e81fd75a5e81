use tracing::{debug, warn};
use uuid::Uuid;

use wing_builder::{Glider3D, RibKind};
use wing_types::ParametricGlider;

use crate::types::{EngineError, FeatureOp, FeatureStack};

/// Per-stage outputs of a stack rebuild.
///
/// `stage_outputs[i]` is the materialized glider after feature i, or `None`
/// when the feature is suppressed or failed (in which case its input passes
/// through to the next stage).
#[derive(Debug, Default)]
pub struct RebuildState {
    pub stage_outputs: Vec<Option<Glider3D>>,
    /// Features that failed to apply, with error messages.
    pub errors: Vec<(Uuid, String)>,
    pub warnings: Vec<String>,
}

/// Rebuild the feature stack from `from_index` onward.
///
/// Outputs of earlier stages are carried over from `existing`; each rebuilt
/// stage starts from its parent's output (the nearest materialized stage
/// before it, or the base glider) so a failing feature never corrupts the
/// parent's cached state.
pub fn rebuild(
    stack: &FeatureStack,
    parametric: &ParametricGlider,
    base: &Glider3D,
    from_index: usize,
    existing: Vec<Option<Glider3D>>,
) -> RebuildState {
    let mut state = RebuildState::default();
    let mut carried = existing;
    carried.resize(stack.features.len(), None);

    for (i, feature) in stack.features.iter().enumerate() {
        if i < from_index {
            state.stage_outputs.push(carried[i].take());
            continue;
        }
        if feature.suppressed {
            debug!(feature = %feature.name, "suppressed, passing through");
            state.stage_outputs.push(None);
            continue;
        }

        let parent = state
            .stage_outputs
            .iter()
            .rev()
            .find_map(|o| o.as_ref())
            .unwrap_or(base);

        match apply_feature(parent, &feature.op, parametric) {
            Ok(out) => state.stage_outputs.push(Some(out)),
            Err(e) => {
                warn!(
                    feature = %feature.name,
                    op = feature.op.label(),
                    error = %e,
                    "feature failed to apply"
                );
                state.errors.push((feature.id, e.to_string()));
                state.stage_outputs.push(None);
            }
        }
    }
    state
}

/// Apply one feature to its parent's output.
///
/// The parent glider is cloned before any mutation, so an error part-way
/// through leaves no observable state behind.
pub fn apply_feature(
    parent: &Glider3D,
    op: &FeatureOp,
    parametric: &ParametricGlider,
) -> Result<Glider3D, EngineError> {
    let mut glider = parent.clone();
    match op {
        FeatureOp::RibProfile { ribs, airfoil } => {
            let replacement = parametric.profile(*airfoil)?;
            for &index in ribs {
                let rib = glider
                    .ribs
                    .get_mut(index)
                    .ok_or(EngineError::TargetOutOfRange {
                        kind: "rib",
                        index,
                        len: parent.ribs.len(),
                    })?;
                rib.profile = replacement.resample(rib.profile.numpoints())?;
            }
        }

        FeatureOp::Ballooning { cells, ballooning } => {
            let replacement = parametric.ballooning(*ballooning)?;
            for &index in cells {
                let cell = glider
                    .cells
                    .get_mut(index)
                    .ok_or(EngineError::TargetOutOfRange {
                        kind: "cell",
                        index,
                        len: parent.cells.len(),
                    })?;
                cell.ballooning = replacement.clone();
            }
        }

        FeatureOp::SharkGill {
            ribs,
            x1,
            x2,
            x3,
            y_add,
        } => {
            for &index in ribs {
                let rib = glider
                    .ribs
                    .get_mut(index)
                    .ok_or(EngineError::TargetOutOfRange {
                        kind: "rib",
                        index,
                        len: parent.ribs.len(),
                    })?;
                rib.profile = rib.profile.with_shark_gill(*x1, *x2, *x3, *y_add)?;
            }
        }

        FeatureOp::SingleSkin { ribs, params } => {
            for &index in ribs {
                let rib = glider
                    .ribs
                    .get_mut(index)
                    .ok_or(EngineError::TargetOutOfRange {
                        kind: "rib",
                        index,
                        len: parent.ribs.len(),
                    })?;
                // Validate against the base profile so a bad parameter set
                // is rejected before the kind is switched.
                rib.profile.single_skin(params)?;
                rib.kind = RibKind::SingleSkin {
                    params: params.clone(),
                };
            }
        }

        FeatureOp::Flap {
            ribs,
            flap_begin,
            flap_amount,
        } => {
            for &index in ribs {
                let rib = glider
                    .ribs
                    .get_mut(index)
                    .ok_or(EngineError::TargetOutOfRange {
                        kind: "rib",
                        index,
                        len: parent.ribs.len(),
                    })?;
                rib.profile = rib.profile.with_flap(*flap_begin, *flap_amount)?;
            }
        }
    }

    refresh_midribs(&mut glider)?;
    Ok(glider)
}

/// Regenerate the interpolated midrib contours of every cell after an
/// override changed profiles or ballooning.
fn refresh_midribs(glider: &mut Glider3D) -> Result<(), EngineError> {
    let ribs = glider.ribs.clone();
    for cell in &mut glider.cells {
        let count = cell.midribs.len();
        if count == 0 {
            continue;
        }
        let steps = count + 1;
        let mut midribs = Vec::with_capacity(count);
        for k in 1..steps {
            midribs.push(cell.midrib(&ribs, k as f64 / steps as f64)?);
        }
        cell.midribs = midribs;
    }
    Ok(())
}
