#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use chart_dash::ChartError;
use chart_dash::api::{ChartKind, ChartRequest, DashboardConfig, build_figure, build_scene};
use chart_dash::core::{Dataset, Viewport};
use chart_dash::render::{CairoContextRenderer, CairoRenderer, RenderFrame, Renderer};

fn donut_frame(viewport: Viewport) -> RenderFrame {
    let dataset =
        Dataset::from_csv_bytes(b"category,amount\nA,10\nB,20\nC,30\n").expect("parse csv");
    let request = ChartRequest::new(ChartKind::Donut)
        .with_category("category")
        .with_value("amount");
    let config = DashboardConfig::new(viewport);
    let figure = build_figure(&dataset, &request, &config).expect("figure");
    build_scene(&figure, &config).expect("scene")
}

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).expect_err("invalid width must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn cairo_renderer_draws_every_frame_primitive() {
    let frame = donut_frame(Viewport::new(900, 500));
    let mut renderer = CairoRenderer::new(900, 500).expect("renderer");
    renderer.render(&frame).expect("render");

    let stats = renderer.last_stats();
    let counts = frame.counts();
    assert_eq!(stats.polygons_drawn, counts.polygons);
    assert_eq!(stats.rects_drawn, counts.rects);
    assert_eq!(stats.texts_drawn, counts.texts);
    assert_eq!(stats.lines_drawn, counts.lines);
    assert_eq!(renderer.backend_name(), "cairo+pango+pangocairo");
}

#[test]
fn cairo_renderer_can_draw_on_external_context() {
    let frame = donut_frame(Viewport::new(600, 420));
    let mut renderer = CairoRenderer::new(1, 1).expect("renderer");

    let surface = ImageSurface::create(Format::ARgb32, 600, 420).expect("surface");
    let context = Context::new(&surface).expect("context");
    renderer
        .render_on_cairo_context(&context, &frame)
        .expect("render on context");
    assert_eq!(renderer.last_stats().polygons_drawn, 3);
}

#[test]
fn cairo_renderer_writes_png() {
    let frame = donut_frame(Viewport::new(400, 300));
    let mut renderer = CairoRenderer::new(400, 300).expect("renderer");
    renderer.render(&frame).expect("render");

    let path = std::env::temp_dir().join(format!("chart-dash-cairo-{}.png", std::process::id()));
    renderer.write_png(&path).expect("write png");
    let bytes = std::fs::read(&path).expect("read png");
    let _ = std::fs::remove_file(&path);
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
