pub mod dataset;
pub mod force_layout;
pub mod graph;
pub mod polar;
pub mod scale;
pub mod treemap;
pub mod types;

pub use dataset::{CellValue, Column, ColumnKind, DEFAULT_PREVIEW_ROWS, DataPreview, Dataset};
pub use force_layout::{SpringLayoutConfig, spring_layout};
pub use graph::{NetworkGraph, NodeKey};
pub use polar::PolarFrame;
pub use scale::LinearScale;
pub use treemap::{TreemapTile, squarify};
pub use types::{PlotArea, Point, Viewport};
