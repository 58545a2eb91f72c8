use approx::assert_relative_eq;
use chart_dash::api::{ChartKind, ChartRequest, DashboardConfig, Figure, build_figure, build_scene};
use chart_dash::core::{Dataset, Viewport};
use chart_dash::render::{CanvasLayerKind, NullRenderer, Renderer, TextHAlign};

const CATEGORY_CSV: &[u8] = b"category,amount\nA,10\nB,20\nC,30\nD,5\n";
const EDGE_CSV: &[u8] = b"source,target,value\nA,B,5\nB,C,10\nC,A,2\n";

fn figure_for(kind: ChartKind) -> Figure {
    let csv = match kind {
        ChartKind::Chord | ChartKind::Network => EDGE_CSV,
        _ => CATEGORY_CSV,
    };
    let dataset = Dataset::from_csv_bytes(csv).expect("parse csv");
    let request = ChartRequest::new(kind)
        .with_category("category")
        .with_value("amount");
    build_figure(&dataset, &request, &DashboardConfig::default()).expect("build figure")
}

#[test]
fn every_chart_type_builds_a_valid_frame() {
    let config = DashboardConfig::default();
    for kind in ChartKind::ALL {
        let frame = build_scene(&figure_for(kind), &config)
            .unwrap_or_else(|err| panic!("{kind} scene failed: {err}"));
        frame.validate().expect("valid frame");

        let mut renderer = NullRenderer::default();
        renderer.render(&frame).expect("null render");
        assert_eq!(renderer.last_counts, frame.counts());
        assert!(
            frame
                .layer(CanvasLayerKind::Series)
                .is_some_and(|layer| !layer.is_empty()),
            "{kind} has no series primitives"
        );
    }
}

#[test]
fn layers_are_stored_in_canonical_drawing_order() {
    let frame = build_scene(&figure_for(ChartKind::Radar), &DashboardConfig::default())
        .expect("scene");
    let kinds: Vec<CanvasLayerKind> = frame.layers.iter().map(|layer| layer.kind).collect();
    assert_eq!(kinds, CanvasLayerKind::CANONICAL_ORDER.to_vec());
}

#[test]
fn polar_bars_draw_one_wedge_per_category_and_a_legend() {
    let frame = build_scene(&figure_for(ChartKind::RadialBar), &DashboardConfig::default())
        .expect("scene");
    assert_eq!(frame.polygons().count(), 4);

    let annotation = frame
        .layer(CanvasLayerKind::Annotation)
        .expect("annotation layer");
    assert_eq!(annotation.rects.len(), 4, "one legend swatch per category");
    for label in ["A", "B", "C", "D"] {
        assert!(
            frame.texts().any(|text| text.text == label),
            "missing label {label}"
        );
    }
}

#[test]
fn radar_closes_its_outline() {
    let frame = build_scene(&figure_for(ChartKind::Radar), &DashboardConfig::default())
        .expect("scene");
    let series = frame.layer(CanvasLayerKind::Series).expect("series layer");
    assert_eq!(series.lines.len(), 4);
    let first = series.lines[0];
    let last = series.lines[3];
    assert_eq!((last.x2, last.y2), (first.x1, first.y1));
}

#[test]
fn donut_labels_show_percentages() {
    let frame = build_scene(&figure_for(ChartKind::Donut), &DashboardConfig::default())
        .expect("scene");
    let percents: Vec<&str> = frame
        .texts()
        .map(|text| text.text.as_str())
        .filter(|text| text.ends_with('%'))
        .collect();
    assert_eq!(percents, vec!["46.2%", "30.8%", "15.4%", "7.7%"]);
}

#[test]
fn treemap_tiles_fill_the_plot_area() {
    let config = DashboardConfig::default();
    let frame = build_scene(&figure_for(ChartKind::Treemap), &config).expect("scene");
    let series = frame.layer(CanvasLayerKind::Series).expect("series layer");
    assert_eq!(series.rects.len(), 4);

    let plot_width = f64::from(config.viewport.width) - config.margins.left - config.margins.right;
    let plot_height =
        f64::from(config.viewport.height) - config.margins.top - config.margins.bottom;
    let covered: f64 = series.rects.iter().map(|r| r.width * r.height).sum();
    assert_relative_eq!(covered, plot_width * plot_height, max_relative = 1e-9);
}

#[test]
fn chord_strokes_scale_with_value() {
    let config = DashboardConfig::default();
    let frame = build_scene(&figure_for(ChartKind::Chord), &config).expect("scene");
    let series = frame.layer(CanvasLayerKind::Series).expect("series layer");
    let widths: Vec<f64> = series.lines.iter().map(|line| line.stroke_width).collect();
    assert_eq!(widths.len(), 3);
    let max = config.chord_max_stroke_px;
    for (width, expected) in widths.iter().zip([max / 2.0, max, max / 5.0]) {
        assert_relative_eq!(*width, expected, epsilon = 1e-9);
    }
    assert!(series.lines.iter().all(|line| line.y1 == line.y2));
}

#[test]
fn network_nodes_are_markers_inside_the_plot_area() {
    let config = DashboardConfig::new(Viewport::new(640, 480));
    let frame = build_scene(&figure_for(ChartKind::Network), &config).expect("scene");
    let markers = frame.layer(CanvasLayerKind::Markers).expect("marker layer");
    assert_eq!(markers.circles.len(), 3);
    assert_eq!(frame.layer(CanvasLayerKind::Series).map(|l| l.lines.len()), Some(3));

    for circle in &markers.circles {
        assert!(circle.cx >= config.margins.left);
        assert!(circle.cx <= 640.0 - config.margins.right);
        assert!(circle.cy >= config.margins.top);
        assert!(circle.cy <= 480.0 - config.margins.bottom);
    }
}

#[test]
fn title_is_drawn_top_left() {
    let config = DashboardConfig::default();
    let frame = build_scene(&figure_for(ChartKind::Network), &config).expect("scene");
    let title = frame
        .texts()
        .find(|text| text.text == "Network Diagram")
        .expect("title text");
    assert_eq!(title.h_align, TextHAlign::Left);
    assert_eq!(title.x, config.margins.left);
}

#[test]
fn viewport_without_room_for_the_plot_is_rejected() {
    let config = DashboardConfig::new(Viewport::new(120, 120));
    assert!(build_scene(&figure_for(ChartKind::Donut), &config).is_err());
}

#[test]
fn category_totals_that_overflow_are_dropped_before_drawing() {
    let dataset =
        Dataset::from_csv_bytes(b"category,amount\nA,1e308\nA,1e308\nB,1\n").expect("parse csv");
    let config = DashboardConfig::default();
    for kind in [
        ChartKind::RadialBar,
        ChartKind::Nightingale,
        ChartKind::Donut,
        ChartKind::Treemap,
        ChartKind::Sunburst,
    ] {
        let request = ChartRequest::new(kind)
            .with_category("category")
            .with_value("amount");
        let figure = build_figure(&dataset, &request, &config).expect("build figure");
        let frame = build_scene(&figure, &config)
            .unwrap_or_else(|err| panic!("{kind} scene failed: {err}"));
        frame
            .validate()
            .unwrap_or_else(|err| panic!("{kind} frame invalid: {err}"));
        assert!(
            frame
                .layer(CanvasLayerKind::Series)
                .is_some_and(|layer| !layer.is_empty()),
            "{kind} lost the finite category"
        );
    }
}

#[test]
fn shares_stay_finite_when_the_grand_total_overflows() {
    let dataset = Dataset::from_csv_bytes(b"category,amount\nA,1.7e308\nB,1.7e308\nC,1\n")
        .expect("parse csv");
    let config = DashboardConfig::default();
    for kind in [ChartKind::Donut, ChartKind::Treemap, ChartKind::Sunburst] {
        let request = ChartRequest::new(kind)
            .with_category("category")
            .with_value("amount");
        let figure = build_figure(&dataset, &request, &config).expect("build figure");
        let frame = build_scene(&figure, &config)
            .unwrap_or_else(|err| panic!("{kind} scene failed: {err}"));
        frame
            .validate()
            .unwrap_or_else(|err| panic!("{kind} frame invalid: {err}"));
    }

    let donut = ChartRequest::new(ChartKind::Donut)
        .with_category("category")
        .with_value("amount");
    let figure = build_figure(&dataset, &donut, &config).expect("donut");
    let chart_dash::api::Trace::Pie(pie) = &figure.traces[0] else {
        panic!("expected pie trace");
    };
    let fractions = pie.fractions();
    assert_relative_eq!(fractions[0], 0.5, epsilon = 1e-12);
    assert_relative_eq!(fractions[1], 0.5, epsilon = 1e-12);
    assert_relative_eq!(fractions.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
}
