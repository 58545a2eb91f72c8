use std::path::Path;

use tracing::{debug, info, warn};

use crate::api::dispatch::{self, chart_spec};
use crate::api::scene::build_scene;
use crate::api::{ChartKind, ChartRequest, DashboardConfig, Figure};
use crate::core::{DataPreview, Dataset};
use crate::error::{ChartError, ChartResult};
use crate::render::{RenderFrame, Renderer};

pub const DASHBOARD_TITLE: &str = "Interactive Data Visualization Dashboard";

/// Everything a front end shows after one evaluation pass.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub title: &'static str,
    pub preview: Option<DataPreview>,
    pub chart: ChartKind,
    pub warning: Option<&'static str>,
    /// Schema-validation message shown in place of the chart.
    pub error: Option<String>,
    pub figure: Option<Figure>,
}

impl DashboardView {
    #[must_use]
    pub fn has_figure(&self) -> bool {
        self.figure.is_some()
    }
}

/// Per-user dashboard state: the uploaded dataset plus current selections.
///
/// Owned by the front end; every interaction mutates it and calls
/// [`DashboardSession::evaluate`] again.
#[derive(Debug, Clone, Default)]
pub struct DashboardSession {
    config: DashboardConfig,
    dataset: Option<Dataset>,
    request: ChartRequest,
}

impl DashboardSession {
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            request: ChartRequest::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    #[must_use]
    pub fn request(&self) -> &ChartRequest {
        &self.request
    }

    /// Replaces the dataset and resets column selections to their defaults.
    ///
    /// A failed parse leaves the session untouched.
    pub fn upload_csv(&mut self, bytes: &[u8]) -> ChartResult<()> {
        let dataset = Dataset::from_csv_bytes(bytes).inspect_err(|err| {
            warn!(error = %err, "rejected csv upload");
        })?;
        self.request.category = dataset.column_names().next().map(str::to_owned);
        self.request.value = dataset.numeric_column_names().next().map(str::to_owned);
        info!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            category = ?self.request.category,
            value = ?self.request.value,
            "dataset uploaded"
        );
        self.dataset = Some(dataset);
        Ok(())
    }

    pub fn load_csv_path(&mut self, path: impl AsRef<Path>) -> ChartResult<()> {
        let bytes = std::fs::read(path)?;
        self.upload_csv(&bytes)
    }

    #[must_use]
    pub fn preview(&self) -> Option<DataPreview> {
        self.dataset
            .as_ref()
            .map(|dataset| dataset.head(self.config.preview_rows))
    }

    pub fn select_chart(&mut self, kind: ChartKind) {
        debug!(chart = kind.label(), "chart type selected");
        self.request.kind = kind;
    }

    pub fn select_category(&mut self, name: &str) -> ChartResult<()> {
        let dataset = self.require_dataset(name)?;
        dataset.require_column(name)?;
        self.request.category = Some(name.to_owned());
        Ok(())
    }

    pub fn select_value(&mut self, name: &str) -> ChartResult<()> {
        let dataset = self.require_dataset(name)?;
        dataset.require_numeric_column(name)?;
        self.request.value = Some(name.to_owned());
        Ok(())
    }

    #[must_use]
    pub fn category_options(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(|dataset| dataset.column_names().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn value_options(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(|dataset| dataset.numeric_column_names().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn needs_column_selectors(&self) -> bool {
        chart_spec(self.request.kind)
            .requirement
            .needs_column_selectors()
    }

    #[must_use]
    pub fn warning_banner(&self) -> Option<&'static str> {
        chart_spec(self.request.kind).requirement.warning()
    }

    /// Runs the whole pass: preview, banner, validation, construction.
    ///
    /// Schema-validation failures land in `DashboardView::error`; every other
    /// failure is returned.
    pub fn evaluate(&self) -> ChartResult<DashboardView> {
        let mut view = DashboardView {
            title: DASHBOARD_TITLE,
            preview: self.preview(),
            chart: self.request.kind,
            warning: self.warning_banner(),
            error: None,
            figure: None,
        };
        let Some(dataset) = &self.dataset else {
            return Ok(view);
        };

        match dispatch::build_figure(dataset, &self.request, &self.config) {
            Ok(figure) => view.figure = Some(figure),
            Err(err) if err.is_schema_validation() => view.error = Some(err.to_string()),
            Err(err) => return Err(err),
        }
        Ok(view)
    }

    /// Scene for the current selections, or `None` when there is no figure.
    pub fn scene(&self) -> ChartResult<Option<RenderFrame>> {
        let view = self.evaluate()?;
        view.figure
            .as_ref()
            .map(|figure| build_scene(figure, &self.config))
            .transpose()
    }

    /// Evaluates and, when a figure was produced, renders it.
    pub fn render_with<R: Renderer>(&self, renderer: &mut R) -> ChartResult<DashboardView> {
        let view = self.evaluate()?;
        if let Some(figure) = &view.figure {
            let frame = build_scene(figure, &self.config)?;
            renderer.render(&frame)?;
        }
        Ok(view)
    }

    fn require_dataset(&self, column: &str) -> ChartResult<&Dataset> {
        self.dataset
            .as_ref()
            .ok_or_else(|| ChartError::UnknownColumn(column.to_owned()))
    }
}
