use nalgebra::Point2;

use feature_engine::Engine;
use wing_builder::GliderBuildConfig;
use wing_geom::{ControlCurve, CurveKind};
use wing_types::ParametricGlider;

/// The starter wing every scenario builds on.
pub fn demo_glider() -> ParametricGlider {
    ParametricGlider::default_template()
}

/// A demo glider whose angle-of-attack curve is a two-point curve from
/// `root` to `tip` radians over the span.
pub fn demo_glider_with_aoa(root: f64, tip: f64) -> ParametricGlider {
    let mut glider = demo_glider();
    glider.aoa = ControlCurve::new(
        vec![
            Point2::new(0.0, root),
            Point2::new(glider.span, tip),
        ],
        CurveKind::Bezier,
    )
    .expect("two control points are always a valid curve");
    glider
}

/// An engine over the demo glider at default build resolution.
pub fn demo_engine() -> Engine {
    Engine::new(demo_glider(), GliderBuildConfig::default())
        .expect("demo glider must build")
}
