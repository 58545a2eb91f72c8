use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CanvasLayerKind, CirclePrimitive, Color, LinePrimitive, PolygonPrimitive, RectPrimitive,
    TextPrimitive,
};

/// Primitives that belong to one drawing layer.
///
/// Inside a layer, backends draw rects, polygons, lines, circles and texts,
/// in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPrimitives {
    pub kind: CanvasLayerKind,
    pub rects: Vec<RectPrimitive>,
    pub polygons: Vec<PolygonPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl LayerPrimitives {
    #[must_use]
    pub fn new(kind: CanvasLayerKind) -> Self {
        Self {
            kind,
            rects: Vec::new(),
            polygons: Vec::new(),
            lines: Vec::new(),
            circles: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
            && self.polygons.is_empty()
            && self.lines.is_empty()
            && self.circles.is_empty()
            && self.texts.is_empty()
    }
}

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub background: Color,
    pub layers: Vec<LayerPrimitives>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport, background: Color) -> Self {
        Self {
            viewport,
            background,
            layers: CanvasLayerKind::CANONICAL_ORDER
                .iter()
                .map(|kind| LayerPrimitives::new(*kind))
                .collect(),
        }
    }

    #[must_use]
    pub fn layer(&self, kind: CanvasLayerKind) -> Option<&LayerPrimitives> {
        self.layers.iter().find(|layer| layer.kind == kind)
    }

    fn layer_mut(&mut self, kind: CanvasLayerKind) -> &mut LayerPrimitives {
        if let Some(index) = self.layers.iter().position(|layer| layer.kind == kind) {
            return &mut self.layers[index];
        }
        self.layers.push(LayerPrimitives::new(kind));
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }

    pub fn push_line(&mut self, kind: CanvasLayerKind, line: LinePrimitive) {
        self.layer_mut(kind).lines.push(line);
    }

    pub fn push_rect(&mut self, kind: CanvasLayerKind, rect: RectPrimitive) {
        self.layer_mut(kind).rects.push(rect);
    }

    pub fn push_polygon(&mut self, kind: CanvasLayerKind, polygon: PolygonPrimitive) {
        self.layer_mut(kind).polygons.push(polygon);
    }

    pub fn push_circle(&mut self, kind: CanvasLayerKind, circle: CirclePrimitive) {
        self.layer_mut(kind).circles.push(circle);
    }

    pub fn push_text(&mut self, kind: CanvasLayerKind, text: TextPrimitive) {
        self.layer_mut(kind).texts.push(text);
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> + '_ {
        self.layers.iter().flat_map(|layer| layer.lines.iter())
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> + '_ {
        self.layers.iter().flat_map(|layer| layer.rects.iter())
    }

    pub fn polygons(&self) -> impl Iterator<Item = &PolygonPrimitive> + '_ {
        self.layers.iter().flat_map(|layer| layer.polygons.iter())
    }

    pub fn circles(&self) -> impl Iterator<Item = &CirclePrimitive> + '_ {
        self.layers.iter().flat_map(|layer| layer.circles.iter())
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> + '_ {
        self.layers.iter().flat_map(|layer| layer.texts.iter())
    }

    #[must_use]
    pub fn counts(&self) -> FrameCounts {
        FrameCounts {
            lines: self.lines().count(),
            rects: self.rects().count(),
            polygons: self.polygons().count(),
            circles: self.circles().count(),
            texts: self.texts().count(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        self.background.validate()?;

        for layer in &self.layers {
            for rect in &layer.rects {
                rect.validate()?;
            }
            for polygon in &layer.polygons {
                polygon.validate()?;
            }
            for line in &layer.lines {
                line.validate()?;
            }
            for circle in &layer.circles {
                circle.validate()?;
            }
            for text in &layer.texts {
                text.validate()?;
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(LayerPrimitives::is_empty)
    }
}

/// Primitive totals across all layers of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameCounts {
    pub lines: usize,
    pub rects: usize,
    pub polygons: usize,
    pub circles: usize,
    pub texts: usize,
}
