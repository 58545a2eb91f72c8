use chart_dash::ChartError;
use chart_dash::api::DashboardConfig;
use chart_dash::core::Viewport;
use chart_dash::render::{Theme, ThemeName};

#[test]
fn defaults_match_the_dashboard_layout() {
    let config = DashboardConfig::default();
    assert_eq!(config.viewport, Viewport::new(960, 640));
    assert_eq!(config.preview_rows, 5);
    assert_eq!(config.donut_hole, 0.4);
    assert_eq!(config.layout_seed, 42);
    assert_eq!(config.layout_iterations, 50);
    assert_eq!(config.theme, ThemeName::Dark);
    assert_eq!(
        (
            config.margins.left,
            config.margins.right,
            config.margins.top,
            config.margins.bottom
        ),
        (80.0, 80.0, 100.0, 80.0)
    );
    config.validate().expect("defaults are valid");
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let config = DashboardConfig::from_json_str(
        r#"{ "theme": "light", "layout_seed": 7, "viewport": { "width": 400, "height": 300 } }"#,
    )
    .expect("parse config");

    assert_eq!(config.theme, ThemeName::Light);
    assert_eq!(config.theme(), Theme::light());
    assert_eq!(config.layout_seed, 7);
    assert_eq!(config.spring_layout().seed, 7);
    assert_eq!(config.viewport, Viewport::new(400, 300));
    assert_eq!(config.preview_rows, 5);
}

#[test]
fn json_round_trip_preserves_config() {
    let config = DashboardConfig::new(Viewport::new(1280, 720))
        .with_theme(ThemeName::Light)
        .with_layout_seed(99);
    let json = config.to_json_pretty().expect("serialize");
    assert_eq!(DashboardConfig::from_json_str(&json).expect("parse"), config);
}

#[test]
fn invalid_values_are_rejected() {
    let err = DashboardConfig::from_json_str(r#"{ "donut_hole": 1.5 }"#)
        .expect_err("hole must be below one");
    assert!(matches!(err, ChartError::InvalidData(_)));

    let err = DashboardConfig::from_json_str(r#"{ "viewport": { "width": 0, "height": 300 } }"#)
        .expect_err("zero width");
    assert!(matches!(err, ChartError::InvalidViewport { width: 0, .. }));

    let err = DashboardConfig::from_json_str("not json").expect_err("malformed json");
    assert!(matches!(err, ChartError::InvalidData(_)));
}
