use serde::Serialize;

use crate::api::ChartKind;
use crate::core::{NetworkGraph, Point};
use crate::error::{ChartError, ChartResult};

pub const FIGURE_JSON_SCHEMA_V1: u32 = 1;

/// Backend-agnostic chart model produced by the figure builders.
///
/// Front ends do not inspect it beyond display; tests use the typed
/// accessors to check what was constructed.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub kind: ChartKind,
    pub title: Option<String>,
    pub layout: FigureLayout,
    pub traces: Vec<Trace>,
    #[serde(skip)]
    network: Option<NetworkGraph>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FigureLayout {
    /// Categories of the angular (polar) or horizontal (chord) axis, in order.
    pub category_axis: Vec<String>,
    pub show_legend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    BarPolar(PolarBarTrace),
    LinePolar(PolarLineTrace),
    Pie(PieTrace),
    Treemap(HierarchyTrace),
    Sunburst(HierarchyTrace),
    Segment(SegmentTrace),
    NetworkEdges(NetworkEdgeTrace),
    NetworkNodes(NetworkNodeTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolarBar {
    pub category: String,
    pub value: f64,
    pub color_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolarBarTrace {
    pub bars: Vec<PolarBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolarPoint {
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolarLineTrace {
    pub points: Vec<PolarPoint>,
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub slices: Vec<PieSlice>,
    pub hole: f64,
}

impl PieTrace {
    /// Share of the full turn for each slice, in slice order.
    #[must_use]
    pub fn fractions(&self) -> Vec<f64> {
        positive_shares(self.slices.iter().map(|slice| slice.value))
    }
}

/// Share of the positive total for each value; non-positive and non-finite
/// values get zero.
///
/// Values are divided by the peak before summing so the total stays finite
/// even when the raw sum would overflow.
#[must_use]
pub(crate) fn positive_shares(values: impl Iterator<Item = f64> + Clone) -> Vec<f64> {
    let usable = |value: &f64| value.is_finite() && *value > 0.0;
    let peak = values.clone().filter(usable).fold(0.0_f64, f64::max);
    if peak <= 0.0 {
        return values.map(|_| 0.0).collect();
    }
    let total: f64 = values.clone().filter(usable).map(|value| value / peak).sum();
    values
        .map(|value| {
            if usable(&value) {
                value / peak / total
            } else {
                0.0
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub label: String,
    pub value: f64,
}

/// Single-level hierarchy shared by treemap and sunburst traces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyTrace {
    pub nodes: Vec<HierarchyNode>,
    pub color_range: (f64, f64),
}

impl HierarchyTrace {
    /// Share of the full area for each node, in node order.
    #[must_use]
    pub fn fractions(&self) -> Vec<f64> {
        positive_shares(self.nodes.iter().map(|node| node.value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentTrace {
    pub source: String,
    pub target: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkEdgeTrace {
    pub segments: Vec<(Point, Point)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkNodeTrace {
    pub labels: Vec<String>,
    pub positions: Vec<Point>,
}

#[derive(Serialize)]
struct FigureJsonContractV1<'a> {
    schema_version: u32,
    figure: &'a Figure,
}

impl Figure {
    #[must_use]
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            title: None,
            layout: FigureLayout::default(),
            traces: Vec::new(),
            network: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: FigureLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    #[must_use]
    pub fn with_network(mut self, network: NetworkGraph) -> Self {
        self.network = Some(network);
        self
    }

    /// Graph behind a network diagram, with its computed layout.
    #[must_use]
    pub fn network(&self) -> Option<&NetworkGraph> {
        self.network.as_ref()
    }

    #[must_use]
    pub fn pie(&self) -> Option<&PieTrace> {
        self.traces.iter().find_map(|trace| match trace {
            Trace::Pie(pie) => Some(pie),
            _ => None,
        })
    }

    #[must_use]
    pub fn polar_bars(&self) -> Option<&PolarBarTrace> {
        self.traces.iter().find_map(|trace| match trace {
            Trace::BarPolar(bars) => Some(bars),
            _ => None,
        })
    }

    #[must_use]
    pub fn polar_line(&self) -> Option<&PolarLineTrace> {
        self.traces.iter().find_map(|trace| match trace {
            Trace::LinePolar(line) => Some(line),
            _ => None,
        })
    }

    #[must_use]
    pub fn hierarchy(&self) -> Option<&HierarchyTrace> {
        self.traces.iter().find_map(|trace| match trace {
            Trace::Treemap(nodes) | Trace::Sunburst(nodes) => Some(nodes),
            _ => None,
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = &SegmentTrace> + '_ {
        self.traces.iter().filter_map(|trace| match trace {
            Trace::Segment(segment) => Some(segment),
            _ => None,
        })
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        let payload = FigureJsonContractV1 {
            schema_version: FIGURE_JSON_SCHEMA_V1,
            figure: self,
        };
        serde_json::to_string_pretty(&payload)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize figure json: {e}")))
    }
}
