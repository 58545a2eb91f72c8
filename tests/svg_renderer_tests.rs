use chart_dash::api::{ChartKind, ChartRequest, DashboardConfig, build_figure, build_scene};
use chart_dash::core::{Dataset, Viewport};
use chart_dash::render::{Color, RenderFrame, Renderer, SvgRenderer};

fn render_svg(csv: &[u8], kind: ChartKind) -> (RenderFrame, SvgRenderer) {
    let dataset = Dataset::from_csv_bytes(csv).expect("parse csv");
    let request = ChartRequest::new(kind)
        .with_category("category")
        .with_value("amount");
    let config = DashboardConfig::default();
    let figure = build_figure(&dataset, &request, &config).expect("figure");
    let frame = build_scene(&figure, &config).expect("scene");
    let mut renderer = SvgRenderer::default();
    renderer.render(&frame).expect("render svg");
    (frame, renderer)
}

#[test]
fn svg_has_one_element_per_primitive() {
    let (frame, renderer) = render_svg(
        b"category,amount\nA,10\nB,20\nC,30\n",
        ChartKind::Nightingale,
    );
    let document = renderer.document();
    let counts = frame.counts();

    assert!(document.starts_with("<svg "));
    assert!(document.trim_end().ends_with("</svg>"));
    // The extra rect is the canvas background.
    assert_eq!(document.matches("<rect ").count(), counts.rects + 1);
    assert_eq!(document.matches("<polygon ").count(), counts.polygons);
    assert_eq!(document.matches("<line ").count(), counts.lines);
    assert_eq!(document.matches("<circle ").count(), counts.circles);
    assert_eq!(document.matches("<text ").count(), counts.texts);
    assert_eq!(renderer.last_counts(), counts);
}

#[test]
fn svg_escapes_label_text() {
    let (_, renderer) = render_svg(
        b"category,amount\nR&D,10\n<ops>,20\n",
        ChartKind::Treemap,
    );
    let document = renderer.document();
    assert!(document.contains(">R&amp;D</text>"));
    assert!(document.contains(">&lt;ops&gt;</text>"));
    assert!(!document.contains("<ops>"));
}

#[test]
fn svg_writes_to_disk_only_after_a_render() {
    let path = std::env::temp_dir().join(format!("chart-dash-svg-{}.svg", std::process::id()));

    let empty = SvgRenderer::default();
    assert!(empty.write_to(&path).is_err());

    let mut renderer = SvgRenderer::default();
    renderer
        .render(&RenderFrame::new(Viewport::new(320, 200), Color::rgb(0.0, 0.0, 0.0)))
        .expect("render empty frame");
    renderer.write_to(&path).expect("write svg");
    let written = std::fs::read_to_string(&path).expect("read back");
    let _ = std::fs::remove_file(&path);
    assert_eq!(written, renderer.document());
    assert!(written.contains(r#"width="320" height="200""#));
}
