use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{DEFAULT_PREVIEW_ROWS, SpringLayoutConfig, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{Theme, ThemeName};

/// Pixel margins around the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotMargins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for PlotMargins {
    fn default() -> Self {
        Self {
            left: 80.0,
            right: 80.0,
            top: 100.0,
            bottom: 80.0,
        }
    }
}

/// Dashboard bootstrap configuration.
///
/// Serializable so front ends can load it from a JSON file; every field has a
/// default, so partial files are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub viewport: Viewport,
    pub theme: ThemeName,
    pub margins: PlotMargins,
    pub preview_rows: usize,
    pub donut_hole: f64,
    pub layout_seed: u64,
    pub layout_iterations: usize,
    pub chord_max_stroke_px: f64,
    pub node_marker_radius_px: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let layout = SpringLayoutConfig::default();
        Self {
            viewport: Viewport::default(),
            theme: ThemeName::Dark,
            margins: PlotMargins::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            donut_hole: 0.4,
            layout_seed: layout.seed,
            layout_iterations: layout.iterations,
            chord_max_stroke_px: 24.0,
            node_marker_radius_px: 5.0,
        }
    }
}

impl DashboardConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ThemeName) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_layout_seed(mut self, seed: u64) -> Self {
        self.layout_seed = seed;
        self
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        Theme::named(self.theme)
    }

    #[must_use]
    pub fn spring_layout(&self) -> SpringLayoutConfig {
        SpringLayoutConfig {
            iterations: self.layout_iterations,
            seed: self.layout_seed,
            ..SpringLayoutConfig::default()
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.donut_hole.is_finite() || !(0.0..1.0).contains(&self.donut_hole) {
            return Err(ChartError::InvalidData(
                "donut hole must be finite and in [0, 1)".to_owned(),
            ));
        }
        for (value, name) in [
            (self.chord_max_stroke_px, "chord_max_stroke_px"),
            (self.node_marker_radius_px, "node_marker_radius_px"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "config `{name}` must be finite and > 0"
                )));
            }
        }
        for (value, name) in [
            (self.margins.left, "margins.left"),
            (self.margins.right, "margins.right"),
            (self.margins.top, "margins.top"),
            (self.margins.bottom, "margins.bottom"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "config `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> ChartResult<Self> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json_str(&input)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config json: {e}")))
    }
}
