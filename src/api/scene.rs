use tracing::{debug, trace};

use crate::api::{
    DashboardConfig, Figure, HierarchyTrace, NetworkEdgeTrace, NetworkNodeTrace, PieTrace,
    PolarBarTrace, PolarLineTrace, SegmentTrace, Trace,
};
use crate::core::dataset::format_number;
use crate::core::polar::{self, POLAR_BAR_GAP, PolarFrame};
use crate::core::{LinearScale, PlotArea, Point, squarify};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CanvasLayerKind, CirclePrimitive, Color, LinePrimitive, PolygonPrimitive, RectPrimitive,
    RenderFrame, TextHAlign, TextPrimitive, Theme,
};

const LEGEND_WIDTH_PX: f64 = 140.0;
const LEGEND_ROW_PX: f64 = 20.0;
const LEGEND_SWATCH_PX: f64 = 12.0;
const ANGULAR_LABEL_GAP_PX: f64 = 16.0;
const RADIAL_TICKS: usize = 5;
const MIN_LABELED_FRACTION: f64 = 0.04;
const GRID_STROKE_PX: f64 = 1.0;

/// Builds the drawable frame for a figure.
///
/// The result depends only on the figure and the config, so the same input
/// always yields an identical frame.
pub fn build_scene(figure: &Figure, config: &DashboardConfig) -> ChartResult<RenderFrame> {
    config.validate()?;
    let builder = SceneBuilder::new(config)?;
    builder.build(figure)
}

struct SceneBuilder<'a> {
    config: &'a DashboardConfig,
    theme: Theme,
    plot: PlotArea,
}

impl<'a> SceneBuilder<'a> {
    fn new(config: &'a DashboardConfig) -> ChartResult<Self> {
        let width = f64::from(config.viewport.width);
        let height = f64::from(config.viewport.height);
        let margins = config.margins;
        let plot = PlotArea::new(
            margins.left,
            margins.top,
            width - margins.left - margins.right,
            height - margins.top - margins.bottom,
        );
        if plot.width <= 0.0 || plot.height <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "viewport {}x{} leaves no room for the plot area",
                config.viewport.width, config.viewport.height
            )));
        }
        Ok(Self {
            config,
            theme: config.theme(),
            plot,
        })
    }

    fn build(&self, figure: &Figure) -> ChartResult<RenderFrame> {
        let mut frame = RenderFrame::new(self.config.viewport, self.theme.background);
        frame.push_rect(
            CanvasLayerKind::Background,
            RectPrimitive::new(
                self.plot.left,
                self.plot.top,
                self.plot.width,
                self.plot.height,
                self.theme.plot_background,
            ),
        );

        if let Some(title) = figure.title.as_deref().filter(|title| !title.is_empty()) {
            frame.push_text(
                CanvasLayerKind::Annotation,
                TextPrimitive::new(
                    title,
                    self.config.margins.left,
                    self.config.margins.top / 2.0,
                    self.theme.title_font_size_px,
                    self.theme.text_color,
                    TextHAlign::Left,
                ),
            );
        }

        let chart_area = if figure.layout.show_legend {
            PlotArea::new(
                self.plot.left,
                self.plot.top,
                (self.plot.width - LEGEND_WIDTH_PX).max(1.0),
                self.plot.height,
            )
        } else {
            self.plot
        };

        let segments: Vec<&SegmentTrace> = figure.segments().collect();
        if !segments.is_empty() {
            self.draw_segments(&mut frame, &figure.layout.category_axis, &segments)?;
        }

        for trace in &figure.traces {
            match trace {
                Trace::BarPolar(bars) => {
                    self.draw_polar_bars(&mut frame, chart_area, &figure.layout.category_axis, bars)?;
                }
                Trace::LinePolar(line) => {
                    self.draw_polar_line(&mut frame, chart_area, &figure.layout.category_axis, line)?;
                }
                Trace::Pie(pie) => self.draw_pie(&mut frame, chart_area, pie)?,
                Trace::Treemap(nodes) => self.draw_treemap(&mut frame, chart_area, nodes),
                Trace::Sunburst(nodes) => self.draw_sunburst(&mut frame, chart_area, nodes)?,
                Trace::NetworkEdges(edges) => self.draw_network_edges(&mut frame, edges),
                Trace::NetworkNodes(nodes) => self.draw_network_nodes(&mut frame, nodes),
                Trace::Segment(_) => {}
            }
        }

        let counts = frame.counts();
        debug!(
            chart = figure.kind.label(),
            lines = counts.lines,
            polygons = counts.polygons,
            rects = counts.rects,
            circles = counts.circles,
            texts = counts.texts,
            "built scene"
        );
        Ok(frame)
    }

    fn polar_frame(&self, area: PlotArea) -> ChartResult<PolarFrame> {
        let radius =
            area.width.min(area.height) / 2.0 - ANGULAR_LABEL_GAP_PX - self.theme.label_font_size_px;
        PolarFrame::new(area.center(), radius.max(1.0))
    }

    fn draw_polar_grid(
        &self,
        frame: &mut RenderFrame,
        polar_frame: PolarFrame,
        scale: LinearScale,
        categories: &[String],
    ) -> ChartResult<()> {
        for tick in scale.ticks(RADIAL_TICKS) {
            let radius = scale.map(tick)?;
            if radius <= 0.0 {
                continue;
            }
            let ring = polar_frame.ring(radius);
            for (from, to) in ring.iter().zip(ring.iter().cycle().skip(1)) {
                frame.push_line(
                    CanvasLayerKind::Grid,
                    LinePrimitive::between(*from, *to, GRID_STROKE_PX, self.theme.grid_color),
                );
            }
            let anchor = polar_frame.point(0.0, radius);
            frame.push_text(
                CanvasLayerKind::Annotation,
                TextPrimitive::new(
                    format_tick(tick),
                    anchor.x + 4.0,
                    anchor.y - self.theme.label_font_size_px / 2.0,
                    self.theme.label_font_size_px * 0.9,
                    self.theme.text_color,
                    TextHAlign::Left,
                ),
            );
        }

        let angles = polar::category_angles(categories.len());
        for (category, angle) in categories.iter().zip(angles) {
            frame.push_line(
                CanvasLayerKind::Grid,
                LinePrimitive::between(
                    polar_frame.center(),
                    polar_frame.point(angle, polar_frame.radius()),
                    GRID_STROKE_PX,
                    self.theme.grid_color,
                ),
            );
            if category.is_empty() {
                continue;
            }
            let anchor = polar_frame.point(angle, polar_frame.radius() + ANGULAR_LABEL_GAP_PX);
            frame.push_text(
                CanvasLayerKind::Annotation,
                TextPrimitive::new(
                    category.as_str(),
                    anchor.x,
                    anchor.y,
                    self.theme.label_font_size_px,
                    self.theme.text_color,
                    horizontal_align_for_angle(angle),
                ),
            );
        }
        Ok(())
    }

    fn draw_polar_bars(
        &self,
        frame: &mut RenderFrame,
        area: PlotArea,
        categories: &[String],
        trace: &PolarBarTrace,
    ) -> ChartResult<()> {
        let polar_frame = self.polar_frame(area)?;
        let scale = LinearScale::including_zero(trace.bars.iter().map(|bar| bar.value))?
            .with_range(0.0, polar_frame.radius())?;
        self.draw_polar_grid(frame, polar_frame, scale, categories)?;

        let sector = polar::category_sector_deg(categories.len());
        let half_width = sector * (1.0 - POLAR_BAR_GAP) / 2.0;
        let baseline = scale.map(0.0)?;
        let mut legend = Vec::with_capacity(trace.bars.len());
        for bar in &trace.bars {
            let color = self.theme.category_color(bar.color_index);
            legend.push((bar.category.as_str(), color));
            let Some(index) = categories.iter().position(|c| *c == bar.category) else {
                continue;
            };
            let angle = sector * index as f64;
            let tip = scale.map(bar.value)?;
            let (inner, outer) = if tip >= baseline { (baseline, tip) } else { (tip, baseline) };
            if outer - inner <= f64::EPSILON {
                continue;
            }
            frame.push_polygon(
                CanvasLayerKind::Series,
                PolygonPrimitive::new(
                    polar_frame.wedge(angle - half_width, angle + half_width, inner, outer),
                    color,
                )
                .with_border(0.5, self.theme.background),
            );
        }
        self.draw_legend(frame, area, &legend);
        Ok(())
    }

    fn draw_polar_line(
        &self,
        frame: &mut RenderFrame,
        area: PlotArea,
        categories: &[String],
        trace: &PolarLineTrace,
    ) -> ChartResult<()> {
        let polar_frame = self.polar_frame(area)?;
        let scale = LinearScale::including_zero(trace.points.iter().map(|point| point.value))?
            .with_range(0.0, polar_frame.radius())?;
        self.draw_polar_grid(frame, polar_frame, scale, categories)?;

        let sector = polar::category_sector_deg(categories.len());
        let mut vertices = Vec::with_capacity(trace.points.len() + 1);
        for point in &trace.points {
            let Some(index) = categories.iter().position(|c| *c == point.category) else {
                continue;
            };
            vertices.push(polar_frame.point(sector * index as f64, scale.map_clamped(point.value)?));
        }
        if trace.closed && vertices.len() > 2 {
            vertices.push(vertices[0]);
        }

        let color = self.theme.category_color(0);
        for pair in vertices.windows(2) {
            frame.push_line(
                CanvasLayerKind::Series,
                LinePrimitive::between(pair[0], pair[1], 2.0, color),
            );
        }
        trace!(vertices = vertices.len(), "polar line vertices");
        Ok(())
    }

    fn draw_pie(&self, frame: &mut RenderFrame, area: PlotArea, trace: &PieTrace) -> ChartResult<()> {
        let radius = area.width.min(area.height) / 2.0;
        let polar_frame = PolarFrame::new(area.center(), radius.max(1.0))?;
        let inner = polar_frame.radius() * trace.hole;

        let mut start = 90.0;
        let mut legend = Vec::with_capacity(trace.slices.len());
        for (slice, fraction) in trace.slices.iter().zip(trace.fractions()) {
            let color = self.theme.category_color(slice.color_index);
            legend.push((slice.label.as_str(), color));
            if fraction <= 0.0 {
                continue;
            }
            let end = start + fraction * 360.0;
            frame.push_polygon(
                CanvasLayerKind::Series,
                PolygonPrimitive::new(
                    polar_frame.wedge(start, end, inner, polar_frame.radius()),
                    color,
                )
                .with_border(1.0, self.theme.tile_border_color),
            );
            if fraction >= MIN_LABELED_FRACTION {
                let anchor =
                    polar_frame.point((start + end) / 2.0, (inner + polar_frame.radius()) / 2.0);
                frame.push_text(
                    CanvasLayerKind::Annotation,
                    TextPrimitive::new(
                        format!("{:.1}%", fraction * 100.0),
                        anchor.x,
                        anchor.y,
                        self.theme.label_font_size_px,
                        self.theme.text_color,
                        TextHAlign::Center,
                    ),
                );
            }
            start = end;
        }
        self.draw_legend(frame, area, &legend);
        Ok(())
    }

    fn draw_treemap(&self, frame: &mut RenderFrame, area: PlotArea, trace: &HierarchyTrace) {
        let weights: Vec<f64> = trace.nodes.iter().map(|node| node.value).collect();
        for tile in squarify(&weights, area) {
            let node = &trace.nodes[tile.index];
            let color = self.theme.scale_color(node.value, trace.color_range);
            frame.push_rect(
                CanvasLayerKind::Series,
                RectPrimitive::new(
                    tile.area.left,
                    tile.area.top,
                    tile.area.width,
                    tile.area.height,
                    color,
                )
                .with_border(1.0, self.theme.tile_border_color),
            );
            let fits = tile.area.width > 4.0 * self.theme.label_font_size_px
                && tile.area.height > 2.0 * self.theme.label_font_size_px;
            if fits && !node.label.is_empty() {
                frame.push_text(
                    CanvasLayerKind::Annotation,
                    TextPrimitive::new(
                        node.label.as_str(),
                        tile.area.left + 6.0,
                        tile.area.top + self.theme.label_font_size_px,
                        self.theme.label_font_size_px,
                        self.theme.text_color,
                        TextHAlign::Left,
                    ),
                );
            }
        }
    }

    fn draw_sunburst(
        &self,
        frame: &mut RenderFrame,
        area: PlotArea,
        trace: &HierarchyTrace,
    ) -> ChartResult<()> {
        let radius = area.width.min(area.height) / 2.0;
        let polar_frame = PolarFrame::new(area.center(), radius.max(1.0))?;
        let mut start = 90.0;
        for (node, fraction) in trace.nodes.iter().zip(trace.fractions()) {
            if fraction <= 0.0 {
                continue;
            }
            let end = start + fraction * 360.0;
            frame.push_polygon(
                CanvasLayerKind::Series,
                PolygonPrimitive::new(
                    polar_frame.wedge(start, end, 0.0, polar_frame.radius()),
                    self.theme.scale_color(node.value, trace.color_range),
                )
                .with_border(1.0, self.theme.tile_border_color),
            );
            if fraction >= MIN_LABELED_FRACTION && !node.label.is_empty() {
                let anchor = polar_frame.point((start + end) / 2.0, polar_frame.radius() * 0.6);
                frame.push_text(
                    CanvasLayerKind::Annotation,
                    TextPrimitive::new(
                        node.label.as_str(),
                        anchor.x,
                        anchor.y,
                        self.theme.label_font_size_px,
                        self.theme.text_color,
                        TextHAlign::Center,
                    ),
                );
            }
            start = end;
        }
        Ok(())
    }

    fn draw_segments(
        &self,
        frame: &mut RenderFrame,
        categories: &[String],
        segments: &[&SegmentTrace],
    ) -> ChartResult<()> {
        if categories.is_empty() {
            return Ok(());
        }
        let x_scale = LinearScale::new(-0.5, categories.len() as f64 - 0.5)?
            .with_range(self.plot.left, self.plot.right())?;
        let y = self.plot.center().y;

        frame.push_line(
            CanvasLayerKind::Grid,
            LinePrimitive::new(
                self.plot.left,
                self.plot.bottom(),
                self.plot.right(),
                self.plot.bottom(),
                GRID_STROKE_PX,
                self.theme.axis_line_color,
            ),
        );
        for (index, category) in categories.iter().enumerate() {
            let x = x_scale.map(index as f64)?;
            frame.push_line(
                CanvasLayerKind::Grid,
                LinePrimitive::new(
                    x,
                    self.plot.top,
                    x,
                    self.plot.bottom(),
                    GRID_STROKE_PX,
                    self.theme.grid_color,
                ),
            );
            if !category.is_empty() {
                frame.push_text(
                    CanvasLayerKind::Annotation,
                    TextPrimitive::new(
                        category.as_str(),
                        x,
                        self.plot.bottom() + ANGULAR_LABEL_GAP_PX,
                        self.theme.label_font_size_px,
                        self.theme.text_color,
                        TextHAlign::Center,
                    ),
                );
            }
        }

        let max_width = segments
            .iter()
            .map(|segment| segment.width)
            .filter(|width| width.is_finite())
            .fold(0.0_f64, f64::max);
        if max_width <= 0.0 {
            return Ok(());
        }
        for (trace_index, segment) in segments.iter().enumerate() {
            if !segment.width.is_finite() || segment.width <= 0.0 {
                continue;
            }
            let (Some(from), Some(to)) = (
                categories.iter().position(|c| *c == segment.source),
                categories.iter().position(|c| *c == segment.target),
            ) else {
                continue;
            };
            let stroke = segment.width / max_width * self.config.chord_max_stroke_px;
            frame.push_line(
                CanvasLayerKind::Series,
                LinePrimitive::new(
                    x_scale.map(from as f64)?,
                    y,
                    x_scale.map(to as f64)?,
                    y,
                    stroke,
                    self.theme.category_color(trace_index),
                ),
            );
        }
        Ok(())
    }

    /// Maps layout space `[-1, 1]²` into the plot area, keeping aspect ratio.
    fn network_point(&self, point: Point) -> Point {
        let center = self.plot.center();
        let half = (self.plot.width.min(self.plot.height) / 2.0
            - 2.0 * self.config.node_marker_radius_px)
            .max(1.0);
        Point::new(center.x + point.x * half, center.y - point.y * half)
    }

    fn draw_network_edges(&self, frame: &mut RenderFrame, trace: &NetworkEdgeTrace) {
        let color = self.theme.category_color(0);
        for (from, to) in &trace.segments {
            frame.push_line(
                CanvasLayerKind::Series,
                LinePrimitive::between(self.network_point(*from), self.network_point(*to), 1.0, color),
            );
        }
    }

    fn draw_network_nodes(&self, frame: &mut RenderFrame, trace: &NetworkNodeTrace) {
        let color = self.theme.category_color(1);
        for position in &trace.positions {
            let center = self.network_point(*position);
            frame.push_circle(
                CanvasLayerKind::Markers,
                CirclePrimitive::new(center.x, center.y, self.config.node_marker_radius_px, color),
            );
        }
    }

    fn draw_legend(&self, frame: &mut RenderFrame, area: PlotArea, entries: &[(&str, Color)]) {
        let left = area.right() + 20.0;
        let mut y = area.top + LEGEND_SWATCH_PX;
        for (label, color) in entries {
            frame.push_rect(
                CanvasLayerKind::Annotation,
                RectPrimitive::new(
                    left,
                    y - LEGEND_SWATCH_PX / 2.0,
                    LEGEND_SWATCH_PX,
                    LEGEND_SWATCH_PX,
                    *color,
                ),
            );
            if !label.is_empty() {
                frame.push_text(
                    CanvasLayerKind::Annotation,
                    TextPrimitive::new(
                        *label,
                        left + LEGEND_SWATCH_PX + 6.0,
                        y,
                        self.theme.label_font_size_px,
                        self.theme.text_color,
                        TextHAlign::Left,
                    ),
                );
            }
            y += LEGEND_ROW_PX;
        }
    }
}

fn horizontal_align_for_angle(angle_deg: f64) -> TextHAlign {
    let cos = angle_deg.to_radians().cos();
    if cos > 0.2 {
        TextHAlign::Left
    } else if cos < -0.2 {
        TextHAlign::Right
    } else {
        TextHAlign::Center
    }
}

/// Radial tick label: integers plain, everything else with two decimals trimmed.
fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        return format_number(value);
    }
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}
