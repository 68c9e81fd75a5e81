//! Property-based tests over the geometric invariants the pipeline relies
//! on, using the `proptest` crate.

use proptest::prelude::*;

use test_harness::{assert_contours_close, assert_strictly_increasing, demo_glider};
use wing_builder::{build, GliderBuildConfig};
use wing_geom::{distribution, DistributionKind, Profile2D};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_kind() -> impl Strategy<Value = DistributionKind> {
    prop_oneof![
        Just(DistributionKind::Uniform),
        Just(DistributionKind::Cosine),
        (0.05f64..0.95).prop_map(|coefficient| DistributionKind::NoseCosine { coefficient }),
    ]
}

// ---------------------------------------------------------------------------
// Distribution invariants: length, bounds, monotonicity, purity
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn distribution_invariants(kind in arb_kind(), n in 2usize..200) {
        let values = distribution(kind, n).unwrap();
        prop_assert_eq!(values.len(), n);
        prop_assert_eq!(values[0], 0.0);
        prop_assert_eq!(values[n - 1], 1.0);
        assert_strictly_increasing(&values);
    }

    #[test]
    fn distribution_is_pure(kind in arb_kind(), n in 2usize..100) {
        let a = distribution(kind, n).unwrap();
        let b = distribution(kind, n).unwrap();
        prop_assert_eq!(a, b);
    }
}

// ---------------------------------------------------------------------------
// Resampling: repeated identical resampling converges
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]
    #[test]
    fn resample_idempotent(camber in 0u32..7, thickness in 6u32..18, n in 31usize..81) {
        let code = camber * 1000 + 400 + thickness;
        let profile = Profile2D::compute_naca(code, 161).unwrap();
        let once = profile.resample(n).unwrap();
        let twice = once.resample(n).unwrap();
        let deviation = once.max_deviation(&twice).unwrap();
        prop_assert!(deviation < 5e-3, "resample drifted by {}", deviation);
    }
}

// ---------------------------------------------------------------------------
// Midrib endpoints: cell.midrib(0) and (1) equal the boundary ribs
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]
    #[test]
    fn midrib_endpoints_equal_boundary_ribs(cell_index in 0usize..4) {
        let built = build(&demo_glider(), &GliderBuildConfig::default()).unwrap();
        let cell = &built.cells[cell_index];
        let left = built.ribs[cell.rib_left].profile_3d().unwrap();
        let right = built.ribs[cell.rib_right].profile_3d().unwrap();
        assert_contours_close(&cell.midrib(&built.ribs, 0.0).unwrap(), &left, 1e-12);
        assert_contours_close(&cell.midrib(&built.ribs, 1.0).unwrap(), &right, 1e-12);
    }
}
