mod builders;
mod chart_kind;
mod config;
pub mod dispatch;
mod figure;
mod request;
pub mod scene;
mod session;

pub use builders::{
    build_chord, build_donut, build_network, build_polar_bars, build_radar, build_sunburst,
    build_treemap,
};
pub use chart_kind::ChartKind;
pub use config::{DashboardConfig, PlotMargins};
pub use dispatch::{ChartSpec, ColumnRequirement, FigureBuilder, build_figure, chart_spec, chart_specs};
pub use figure::{
    FIGURE_JSON_SCHEMA_V1, Figure, FigureLayout, HierarchyNode, HierarchyTrace, NetworkEdgeTrace,
    NetworkNodeTrace, PieSlice, PieTrace, PolarBar, PolarBarTrace, PolarLineTrace, PolarPoint,
    SegmentTrace, Trace,
};
pub use request::ChartRequest;
pub use scene::build_scene;
pub use session::{DASHBOARD_TITLE, DashboardSession, DashboardView};
