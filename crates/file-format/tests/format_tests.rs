use feature_engine::{FeatureOp, FeatureStack};
use file_format::{load_project, mesh_to_stl, save_project, LoadError, ProjectMetadata};
use wing_geom::SingleSkinParams;
use wing_types::ParametricGlider;

fn sample_stack() -> FeatureStack {
    let mut stack = FeatureStack::new();
    stack.add_feature(
        "Flap tips".to_string(),
        FeatureOp::Flap {
            ribs: vec![3, 4],
            flap_begin: 0.95,
            flap_amount: 0.01,
        },
    );
    stack.add_feature(
        "Single skin center".to_string(),
        FeatureOp::SingleSkin {
            ribs: vec![0, 1],
            params: SingleSkinParams::default(),
        },
    );
    stack
}

#[test]
fn round_trip_preserves_glider_and_features() {
    let glider = ParametricGlider::default_template();
    let stack = sample_stack();
    let metadata = ProjectMetadata::new("demo kite", "test");

    let json = save_project(&glider, &stack, &metadata);
    let (loaded_glider, loaded_stack, loaded_meta) = load_project(&json).unwrap();

    // Every owned field round-trips losslessly.
    assert_eq!(loaded_glider, glider);
    assert_eq!(loaded_meta, metadata);
    assert_eq!(loaded_stack.features.len(), stack.features.len());
    for (a, b) in loaded_stack.features.iter().zip(&stack.features) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.name, b.name);
    }
}

#[test]
fn loaded_glider_still_builds() {
    let glider = ParametricGlider::default_template();
    let json = save_project(&glider, &FeatureStack::new(), &ProjectMetadata::new("x", "y"));
    let (loaded, _, _) = load_project(&json).unwrap();
    wing_builder::build(&loaded, &wing_builder::GliderBuildConfig::default()).unwrap();
}

#[test]
fn unknown_format_rejected() {
    let glider = ParametricGlider::default_template();
    let json = save_project(&glider, &FeatureStack::new(), &ProjectMetadata::new("x", "y"));
    let tampered = json.replace("wing-studio", "other-cad");
    assert!(matches!(
        load_project(&tampered),
        Err(LoadError::UnknownFormat(_))
    ));
}

#[test]
fn future_version_rejected() {
    let glider = ParametricGlider::default_template();
    let json = save_project(&glider, &FeatureStack::new(), &ProjectMetadata::new("x", "y"));
    let tampered = json.replacen("\"version\": 1", "\"version\": 99", 1);
    assert!(matches!(
        load_project(&tampered),
        Err(LoadError::FutureVersion { file_version: 99, .. })
    ));
}

#[test]
fn garbage_input_is_a_parse_error() {
    assert!(matches!(
        load_project("not json at all"),
        Err(LoadError::ParseError(_))
    ));
}

#[test]
fn missing_features_field_defaults_to_empty_stack() {
    let glider = ParametricGlider::default_template();
    let json = save_project(&glider, &FeatureStack::new(), &ProjectMetadata::new("x", "y"));
    // Strip the features field; older files may predate the stack.
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let mut object = value.as_object().unwrap().clone();
    object.remove("features");
    let trimmed = serde_json::to_string(&object).unwrap();

    let (_, stack, _) = load_project(&trimmed).unwrap();
    assert!(stack.features.is_empty());
}

#[test]
fn stl_export_of_rib_mesh() {
    let glider = ParametricGlider::default_template();
    let built = wing_builder::build(&glider, &wing_builder::GliderBuildConfig::default()).unwrap();
    let mesh = mesh_gen::rib_mesh(&built.ribs[0], 2, true).unwrap();
    let stl = mesh_to_stl(&mesh, "demo").unwrap();
    assert!(stl.starts_with("solid demo_ribs"));
    assert!(stl.contains("facet normal"));
    assert!(stl.trim_end().ends_with("endsolid demo_ribs"));
}

#[test]
fn stl_export_of_line_only_mesh_fails() {
    let glider = ParametricGlider::default_template();
    let built = wing_builder::build(&glider, &wing_builder::GliderBuildConfig::default()).unwrap();
    let mesh = mesh_gen::line_mesh(&built.lineset.lines[0], 4);
    assert!(mesh_to_stl(&mesh, "demo").is_err());
}
