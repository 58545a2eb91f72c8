use tracing::{debug, warn};

use crate::api::builders::{
    SOURCE_COLUMN, TARGET_COLUMN, VALUE_COLUMN, build_chord, build_donut, build_network,
    build_polar_bars, build_radar, build_sunburst, build_treemap,
};
use crate::api::{ChartKind, ChartRequest, DashboardConfig, Figure};
use crate::core::Dataset;
use crate::error::{ChartError, ChartResult};

pub type FigureBuilder = fn(&Dataset, &ChartRequest, &DashboardConfig) -> ChartResult<Figure>;

/// Columns a chart type needs before it can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRequirement {
    /// A user-selected category column plus a numeric value column.
    CategoryAndValue,
    /// Fixed column names that must exist in the dataset.
    Named {
        columns: &'static [&'static str],
        warning: &'static str,
        error: &'static str,
    },
}

impl ColumnRequirement {
    pub fn check(self, dataset: &Dataset, request: &ChartRequest) -> ChartResult<()> {
        match self {
            Self::CategoryAndValue => {
                dataset.require_column(request.category_column()?)?;
                dataset.require_numeric_column(request.value_column()?)?;
                Ok(())
            }
            Self::Named { columns, error, .. } => {
                let missing = dataset.missing_columns(columns);
                if missing.is_empty() {
                    return Ok(());
                }
                warn!(
                    chart = request.kind.label(),
                    missing = ?missing,
                    "dataset lacks required columns"
                );
                Err(ChartError::SchemaValidation {
                    chart: request.kind.label().to_owned(),
                    missing: missing.into_vec(),
                    message: error.to_owned(),
                })
            }
        }
    }

    /// Inline banner shown while this chart type is selected.
    #[must_use]
    pub fn warning(self) -> Option<&'static str> {
        match self {
            Self::CategoryAndValue => None,
            Self::Named { warning, .. } => Some(warning),
        }
    }

    #[must_use]
    pub fn needs_column_selectors(self) -> bool {
        matches!(self, Self::CategoryAndValue)
    }
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub requirement: ColumnRequirement,
    pub build: FigureBuilder,
}

const CHORD_COLUMNS: &[&str] = &[SOURCE_COLUMN, TARGET_COLUMN, VALUE_COLUMN];
const NETWORK_COLUMNS: &[&str] = &[SOURCE_COLUMN, TARGET_COLUMN];

/// Dispatch table in selector order.
static CHART_SPECS: [ChartSpec; 8] = [
    ChartSpec {
        kind: ChartKind::RadialBar,
        requirement: ColumnRequirement::CategoryAndValue,
        build: build_polar_bars,
    },
    ChartSpec {
        kind: ChartKind::Radar,
        requirement: ColumnRequirement::CategoryAndValue,
        build: build_radar,
    },
    ChartSpec {
        kind: ChartKind::Nightingale,
        requirement: ColumnRequirement::CategoryAndValue,
        build: build_polar_bars,
    },
    ChartSpec {
        kind: ChartKind::Donut,
        requirement: ColumnRequirement::CategoryAndValue,
        build: build_donut,
    },
    ChartSpec {
        kind: ChartKind::Treemap,
        requirement: ColumnRequirement::CategoryAndValue,
        build: build_treemap,
    },
    ChartSpec {
        kind: ChartKind::Sunburst,
        requirement: ColumnRequirement::CategoryAndValue,
        build: build_sunburst,
    },
    ChartSpec {
        kind: ChartKind::Chord,
        requirement: ColumnRequirement::Named {
            columns: CHORD_COLUMNS,
            warning: "Ensure your dataset contains a 'source', 'target', and 'value' column.",
            error: "Dataset must contain 'source', 'target', and 'value' columns.",
        },
        build: build_chord,
    },
    ChartSpec {
        kind: ChartKind::Network,
        requirement: ColumnRequirement::Named {
            columns: NETWORK_COLUMNS,
            warning: "Ensure your dataset contains a 'source' and 'target' column.",
            error: "Dataset must contain 'source' and 'target' columns.",
        },
        build: build_network,
    },
];

#[must_use]
pub fn chart_spec(kind: ChartKind) -> &'static ChartSpec {
    &CHART_SPECS[kind.position()]
}

#[must_use]
pub fn chart_specs() -> &'static [ChartSpec] {
    &CHART_SPECS
}

/// Checks the request against the chart type's column requirement.
pub fn validate(dataset: &Dataset, request: &ChartRequest) -> ChartResult<()> {
    chart_spec(request.kind).requirement.check(dataset, request)
}

/// Validates, then constructs the figure; nothing is built when validation fails.
pub fn build_figure(
    dataset: &Dataset,
    request: &ChartRequest,
    config: &DashboardConfig,
) -> ChartResult<Figure> {
    let spec = chart_spec(request.kind);
    spec.requirement.check(dataset, request)?;
    let figure = (spec.build)(dataset, request, config)?;
    debug!(
        chart = spec.kind.label(),
        traces = figure.traces.len(),
        "constructed figure"
    );
    Ok(figure)
}

#[cfg(test)]
mod tests {
    use super::{ChartKind, chart_spec, chart_specs};

    #[test]
    fn table_rows_follow_selector_order() {
        assert_eq!(chart_specs().len(), ChartKind::ALL.len());
        for kind in ChartKind::ALL {
            assert_eq!(chart_spec(kind).kind, kind);
        }
    }

    #[test]
    fn only_chord_and_network_carry_banners() {
        let with_banner: Vec<ChartKind> = ChartKind::ALL
            .into_iter()
            .filter(|kind| chart_spec(*kind).requirement.warning().is_some())
            .collect();
        assert_eq!(with_banner, vec![ChartKind::Chord, ChartKind::Network]);
    }

    #[test]
    fn radial_bar_and_nightingale_share_builder() {
        assert!(std::ptr::fn_addr_eq(
            chart_spec(ChartKind::RadialBar).build,
            chart_spec(ChartKind::Nightingale).build,
        ));
    }
}
