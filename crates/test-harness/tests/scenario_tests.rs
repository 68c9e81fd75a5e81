//! End-to-end scenarios exercising the parametric-to-3D pipeline.

use approx::assert_relative_eq;

use feature_engine::{Engine, FeatureOp};
use test_harness::{assert_strictly_increasing, demo_glider, demo_glider_with_aoa};
use wing_builder::{build, GliderBuildConfig, RibKind};
use wing_geom::SingleSkinParams;

// A two-point angle-of-attack curve spanning [0, 0.1] radians, sampled at 80
// points, traces strictly increasing span positions with exact end angles.
#[test]
fn two_point_aoa_curve_sampling() {
    let glider = demo_glider_with_aoa(0.0, 0.1);
    let sequence = glider.aoa.get_sequence(80).unwrap();
    assert_eq!(sequence.len(), 80);

    let xs: Vec<f64> = sequence.iter().map(|p| p.x).collect();
    assert_strictly_increasing(&xs);
    assert_eq!(sequence[0].y, 0.0);
    assert_eq!(sequence[79].y, 0.1);
}

// Shark-gill deformation: at x = 0.3 inside the ramp-down region the lower
// surface drops by y_add * (x3 - x) / (x3 - x2).
#[test]
fn shark_gill_ramp_formula() {
    use nalgebra::Point2;
    use wing_geom::Profile2D;

    let profile = Profile2D::new(
        "scenario",
        vec![
            Point2::new(1.0, 0.1),
            Point2::new(0.5, 0.12),
            Point2::new(0.0, 0.0),
            Point2::new(0.3, -0.2),
            Point2::new(1.0, -0.01),
        ],
    )
    .unwrap();

    let gilled = profile.with_shark_gill(0.1, 0.11, 0.5, 0.1).unwrap();
    let expected = -0.2 - 0.1 * (0.5 - 0.3) / (0.5 - 0.11);
    assert_relative_eq!(gilled.data()[3].y, expected, epsilon = 1e-12);
}

// Midrib counts: 0 gives one rib per shape sample and no interpolated
// contours; 2 gives each cell 4 contours total (2 boundary + 2 interpolated).
#[test]
fn midrib_counts_match_config() {
    let glider = demo_glider();

    let flat = build(&glider, &GliderBuildConfig::default()).unwrap();
    assert_eq!(flat.ribs.len(), glider.rib_count());
    for cell in &flat.cells {
        assert!(cell.midribs.is_empty());
    }

    let subdivided = build(
        &glider,
        &GliderBuildConfig {
            midrib_count: 2,
            ..Default::default()
        },
    )
    .unwrap();
    for cell in &subdivided.cells {
        // 2 interpolated plus the 2 boundary ribs referenced by index.
        assert_eq!(cell.midribs.len(), 2);
        assert!(cell.rib_left < subdivided.ribs.len());
        assert!(cell.rib_right < subdivided.ribs.len());
    }
}

// Re-applying a single-skin conversion with a different height replaces the
// parameters on the converted rib instead of converting twice.
#[test]
fn single_skin_idempotent_reapplication() {
    let mut engine = Engine::new(demo_glider(), GliderBuildConfig::default()).unwrap();
    for height in [0.25, 0.65] {
        engine.add_feature(
            format!("single skin h={}", height),
            FeatureOp::SingleSkin {
                ribs: vec![1],
                params: SingleSkinParams {
                    height,
                    ..Default::default()
                },
            },
        );
    }
    assert!(engine.errors.is_empty());

    let out = engine.get_glider_instance();
    match &out.ribs[1].kind {
        RibKind::SingleSkin { params } => {
            assert_relative_eq!(params.height, 0.65, epsilon = 1e-12)
        }
        other => panic!("expected a single-skin rib, got {:?}", other),
    }
    // The base profile is still the untouched catalog resample.
    assert_eq!(
        out.ribs[1].profile.numpoints(),
        engine.build_config().profile_numpoints
    );
}
