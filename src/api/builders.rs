//! Figure construction, one builder per chart construction.
//!
//! Builders assume their column requirement was already checked by the
//! dispatch table; they only skip rows that cannot be plotted.

use std::cmp::Reverse;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use crate::api::{
    ChartKind, ChartRequest, DashboardConfig, Figure, FigureLayout, HierarchyNode,
    HierarchyTrace, NetworkEdgeTrace, NetworkNodeTrace, PieSlice, PieTrace, PolarBar,
    PolarBarTrace, PolarLineTrace, PolarPoint, SegmentTrace, Trace,
};
use crate::core::{Dataset, NetworkGraph, NodeKey};
use crate::error::ChartResult;

pub(crate) const SOURCE_COLUMN: &str = "source";
pub(crate) const TARGET_COLUMN: &str = "target";
pub(crate) const VALUE_COLUMN: &str = "value";

/// Polar bars keyed by category; shared by Radial Bar and Nightingale.
pub fn build_polar_bars(
    dataset: &Dataset,
    request: &ChartRequest,
    _config: &DashboardConfig,
) -> ChartResult<Figure> {
    let totals = aggregate(category_value_rows(dataset, request)?);
    let bars = totals
        .iter()
        .enumerate()
        .map(|(color_index, (category, value))| PolarBar {
            category: category.clone(),
            value: *value,
            color_index,
        })
        .collect();
    let layout = FigureLayout {
        category_axis: totals.keys().cloned().collect(),
        show_legend: true,
    };
    Ok(Figure::new(request.kind)
        .with_layout(layout)
        .with_trace(Trace::BarPolar(PolarBarTrace { bars })))
}

/// Closed polar line through the rows in their original order.
pub fn build_radar(
    dataset: &Dataset,
    request: &ChartRequest,
    _config: &DashboardConfig,
) -> ChartResult<Figure> {
    let rows = category_value_rows(dataset, request)?;
    let mut categories: Vec<String> = Vec::new();
    for (category, _) in &rows {
        if !categories.contains(category) {
            categories.push(category.clone());
        }
    }
    let points = rows
        .into_iter()
        .map(|(category, value)| PolarPoint { category, value })
        .collect();
    let layout = FigureLayout {
        category_axis: categories,
        show_legend: false,
    };
    Ok(Figure::new(ChartKind::Radar)
        .with_layout(layout)
        .with_trace(Trace::LinePolar(PolarLineTrace {
            points,
            closed: true,
        })))
}

/// Pie with a center hole; labels summed and sorted largest first.
pub fn build_donut(
    dataset: &Dataset,
    request: &ChartRequest,
    config: &DashboardConfig,
) -> ChartResult<Figure> {
    let totals = aggregate(category_value_rows(dataset, request)?);
    let mut slices: Vec<PieSlice> = totals
        .into_iter()
        .enumerate()
        .map(|(color_index, (label, value))| PieSlice {
            label,
            value,
            color_index,
        })
        .collect();
    slices.sort_by_key(|slice| Reverse(OrderedFloat(slice.value)));

    Ok(Figure::new(ChartKind::Donut)
        .with_layout(FigureLayout {
            category_axis: Vec::new(),
            show_legend: true,
        })
        .with_trace(Trace::Pie(PieTrace {
            slices,
            hole: config.donut_hole,
        })))
}

pub fn build_treemap(
    dataset: &Dataset,
    request: &ChartRequest,
    _config: &DashboardConfig,
) -> ChartResult<Figure> {
    let trace = hierarchy(dataset, request, false)?;
    Ok(Figure::new(ChartKind::Treemap).with_trace(Trace::Treemap(trace)))
}

pub fn build_sunburst(
    dataset: &Dataset,
    request: &ChartRequest,
    _config: &DashboardConfig,
) -> ChartResult<Figure> {
    let trace = hierarchy(dataset, request, true)?;
    Ok(Figure::new(ChartKind::Sunburst).with_trace(Trace::Sunburst(trace)))
}

/// One straight segment per row between `source` and `target`.
pub fn build_chord(
    dataset: &Dataset,
    _request: &ChartRequest,
    _config: &DashboardConfig,
) -> ChartResult<Figure> {
    let sources = dataset.require_column(SOURCE_COLUMN)?;
    let targets = dataset.require_column(TARGET_COLUMN)?;
    let widths = dataset.require_numeric_column(VALUE_COLUMN)?;

    let mut categories: Vec<String> = Vec::new();
    let mut figure = Figure::new(ChartKind::Chord).with_title("Chord Diagram");
    for ((source, target), width) in sources
        .cells()
        .iter()
        .zip(targets.cells())
        .zip(widths.numbers())
    {
        let (Some(source), Some(target)) = (source.label(), target.label()) else {
            continue;
        };
        for label in [&source, &target] {
            if !categories.contains(label) {
                categories.push(label.clone());
            }
        }
        figure = figure.with_trace(Trace::Segment(SegmentTrace {
            source,
            target,
            width: width.unwrap_or(0.0),
        }));
    }
    debug!(
        segments = figure.traces.len(),
        categories = categories.len(),
        "built chord figure"
    );

    Ok(figure.with_layout(FigureLayout {
        category_axis: categories,
        show_legend: false,
    }))
}

/// Undirected graph from `source`/`target`, positioned by the spring layout.
pub fn build_network(
    dataset: &Dataset,
    _request: &ChartRequest,
    config: &DashboardConfig,
) -> ChartResult<Figure> {
    let sources = dataset.require_column(SOURCE_COLUMN)?;
    let targets = dataset.require_column(TARGET_COLUMN)?;

    let edges = sources
        .cells()
        .iter()
        .zip(targets.cells())
        .filter_map(|(source, target)| {
            Some((NodeKey::from_cell(source)?, NodeKey::from_cell(target)?))
        });
    let mut network = NetworkGraph::from_edges(edges);
    network.apply_layout(config.spring_layout());

    let positions = network.positions();
    let segments = network
        .graph()
        .edge_indices()
        .filter_map(|edge| network.graph().edge_endpoints(edge))
        .map(|(a, b)| (positions[a.index()], positions[b.index()]))
        .collect();
    let nodes = NetworkNodeTrace {
        labels: network.node_labels().map(str::to_owned).collect(),
        positions: positions.to_vec(),
    };

    Ok(Figure::new(ChartKind::Network)
        .with_title("Network Diagram")
        .with_trace(Trace::NetworkEdges(NetworkEdgeTrace { segments }))
        .with_trace(Trace::NetworkNodes(nodes))
        .with_network(network))
}

/// `(category label, value)` for every row where both cells are usable.
fn category_value_rows(
    dataset: &Dataset,
    request: &ChartRequest,
) -> ChartResult<Vec<(String, f64)>> {
    let categories = dataset.require_column(request.category_column()?)?;
    let values = dataset.require_numeric_column(request.value_column()?)?;

    let rows: Vec<(String, f64)> = categories
        .cells()
        .iter()
        .zip(values.numbers())
        .filter_map(|(category, value)| {
            let value = value.filter(|v| v.is_finite())?;
            Some((category.label()?, value))
        })
        .collect();
    debug!(
        kept = rows.len(),
        total = dataset.row_count(),
        "collected category/value rows"
    );
    Ok(rows)
}

/// Sums values per category, keeping first-appearance order.
///
/// Categories whose sum overflows are dropped.
fn aggregate(rows: Vec<(String, f64)>) -> IndexMap<String, f64> {
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for (category, value) in rows {
        *totals.entry(category).or_insert(0.0) += value;
    }
    totals.retain(|category, total| {
        let keep = total.is_finite();
        if !keep {
            warn!(category = %category, "dropping category whose total overflows");
        }
        keep
    });
    totals
}

fn hierarchy(
    dataset: &Dataset,
    request: &ChartRequest,
    sort_descending: bool,
) -> ChartResult<HierarchyTrace> {
    let mut nodes: Vec<HierarchyNode> = aggregate(category_value_rows(dataset, request)?)
        .into_iter()
        .map(|(label, value)| HierarchyNode { label, value })
        .collect();
    if sort_descending {
        nodes.sort_by_key(|node| Reverse(OrderedFloat(node.value)));
    }
    let color_range = nodes
        .iter()
        .fold(None, |range: Option<(f64, f64)>, node| match range {
            None => Some((node.value, node.value)),
            Some((min, max)) => Some((min.min(node.value), max.max(node.value))),
        })
        .unwrap_or((0.0, 0.0));
    Ok(HierarchyTrace { nodes, color_range })
}
