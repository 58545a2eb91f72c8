mod frame;
mod layer_stack;
mod null_renderer;
mod primitives;
mod svg_renderer;
mod theme;

pub use frame::{FrameCounts, LayerPrimitives, RenderFrame};
pub use layer_stack::CanvasLayerKind;
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, PolygonPrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};
pub use svg_renderer::{SvgRenderer, escape_xml};
pub use theme::{Theme, ThemeName};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from dataset and dispatch logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
