use serde::{Deserialize, Serialize};

use crate::api::ChartKind;
use crate::error::{ChartError, ChartResult};

/// The user's current selections.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChartRequest {
    pub kind: ChartKind,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl ChartRequest {
    #[must_use]
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            category: None,
            value: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, column: impl Into<String>) -> Self {
        self.category = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, column: impl Into<String>) -> Self {
        self.value = Some(column.into());
        self
    }

    pub fn category_column(&self) -> ChartResult<&str> {
        self.category.as_deref().ok_or_else(|| {
            ChartError::IncompleteRequest(format!(
                "{} needs a categorical column",
                self.kind.label()
            ))
        })
    }

    pub fn value_column(&self) -> ChartResult<&str> {
        self.value.as_deref().ok_or_else(|| {
            ChartError::IncompleteRequest(format!(
                "{} needs a numerical column",
                self.kind.label()
            ))
        })
    }
}
