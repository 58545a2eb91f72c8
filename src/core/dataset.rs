use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{ChartError, ChartResult};

pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Field spellings read as missing values, matching common CSV tooling.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Missing,
}

impl CellValue {
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Display label used when the cell acts as a category or node key.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        if self.is_missing() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => f.write_str(&format_number(*value)),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Text(text) => f.write_str(text),
            Self::Missing => f.write_str("NaN"),
        }
    }
}

/// Formats integral values without a trailing fraction (`10`, not `10.0`).
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    cells: Vec<CellValue>,
}

impl Column {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }

    #[must_use]
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Numeric view of the column; `None` for missing or non-numeric cells.
    pub fn numbers(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.cells.iter().map(CellValue::as_f64)
    }
}

/// Read-only tabular dataset loaded from one upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    pub fn from_csv_bytes(bytes: &[u8]) -> ChartResult<Self> {
        Self::from_csv_reader(bytes)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> ChartResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "read csv upload from disk");
        Self::from_csv_bytes(&bytes)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> ChartResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers().map_err(map_csv_error)?.clone();
        if headers.is_empty() {
            return Err(ChartError::Parse(
                "no columns to parse from input".to_owned(),
            ));
        }
        let names = repair_headers(&headers);
        let width = names.len();

        let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
        let mut row_count = 0_usize;
        for result in reader.records() {
            let record = result.map_err(map_csv_error)?;
            if record.len() > width {
                let line = record.position().map_or(row_count + 2, |p| p.line() as usize);
                return Err(ChartError::Parse(format!(
                    "expected {width} fields in line {line}, saw {}",
                    record.len()
                )));
            }
            for (index, column) in raw.iter_mut().enumerate() {
                let field = record.get(index).filter(|field| !is_na(field));
                column.push(field.map(str::to_owned));
            }
            row_count += 1;
        }

        let columns: Vec<Column> = names
            .into_iter()
            .zip(raw)
            .map(|(name, cells)| infer_column(name, cells))
            .collect();
        debug!(
            columns = columns.len(),
            rows = row_count,
            "parsed csv dataset"
        );

        Ok(Self { columns, row_count })
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }

    pub fn numeric_column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns
            .iter()
            .filter(|column| column.is_numeric())
            .map(Column::name)
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn require_column(&self, name: &str) -> ChartResult<&Column> {
        self.column(name)
            .ok_or_else(|| ChartError::UnknownColumn(name.to_owned()))
    }

    pub fn require_numeric_column(&self, name: &str) -> ChartResult<&Column> {
        let column = self.require_column(name)?;
        if !column.is_numeric() {
            return Err(ChartError::NonNumericColumn(name.to_owned()));
        }
        Ok(column)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Names from `required` that this dataset does not have, in input order.
    #[must_use]
    pub fn missing_columns(&self, required: &[&str]) -> SmallVec<[String; 4]> {
        required
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| (*name).to_owned())
            .collect()
    }

    #[must_use]
    pub fn head(&self, rows: usize) -> DataPreview {
        let shown = rows.min(self.row_count);
        let rows = (0..shown)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| column.cells[row].to_string())
                    .collect()
            })
            .collect();
        DataPreview {
            columns: self.column_names().map(str::to_owned).collect(),
            rows,
            total_rows: self.row_count,
        }
    }
}

/// First rows of a dataset, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl fmt::Display for DataPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index_width = self
            .rows
            .len()
            .saturating_sub(1)
            .to_string()
            .len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, name)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (name, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {name:>width$}")?;
        }
        writeln!(f)?;
        for (row_index, row) in self.rows.iter().enumerate() {
            write!(f, "{row_index:<index_width$}")?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {cell:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn is_na(field: &str) -> bool {
    NA_VALUES.contains(&field)
}

fn parse_bool(field: &str) -> Option<bool> {
    match field {
        "True" | "TRUE" | "true" => Some(true),
        "False" | "FALSE" | "false" => Some(false),
        _ => None,
    }
}

fn infer_column(name: String, raw: Vec<Option<String>>) -> Column {
    let present = || raw.iter().flatten();

    let numeric = present().all(|field| field.trim().parse::<f64>().is_ok());
    if numeric {
        trace!(column = %name, "column inferred numeric");
        let cells = raw
            .iter()
            .map(|field| match field {
                Some(field) => field
                    .trim()
                    .parse::<f64>()
                    .map_or(CellValue::Missing, CellValue::Number),
                None => CellValue::Missing,
            })
            .collect();
        return Column {
            name,
            kind: ColumnKind::Numeric,
            cells,
        };
    }

    let boolean = raw.iter().all(|field| field.as_deref().and_then(parse_bool).is_some());
    if boolean {
        trace!(column = %name, "column inferred boolean");
        let cells = raw
            .iter()
            .map(|field| {
                field
                    .as_deref()
                    .and_then(parse_bool)
                    .map_or(CellValue::Missing, CellValue::Bool)
            })
            .collect();
        return Column {
            name,
            kind: ColumnKind::Boolean,
            cells,
        };
    }

    let cells = raw
        .into_iter()
        .map(|field| field.map_or(CellValue::Missing, CellValue::Text))
        .collect();
    Column {
        name,
        kind: ColumnKind::Text,
        cells,
    }
}

/// Blank headers become `Unnamed: {index}`; repeats get `.1`, `.2`, ... suffixes.
fn repair_headers(headers: &csv::StringRecord) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut repeat_counts: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(headers.len());

    for (index, raw) in headers.iter().enumerate() {
        let base = if raw.is_empty() {
            format!("Unnamed: {index}")
        } else {
            raw.to_owned()
        };
        let mut name = base.clone();
        if used.contains(&name) {
            let counter = repeat_counts.entry(base.clone()).or_insert(0);
            loop {
                *counter += 1;
                let candidate = format!("{base}.{counter}");
                if !used.contains(&candidate) {
                    name = candidate;
                    break;
                }
            }
        }
        used.insert(name.clone());
        names.push(name);
    }
    names
}

fn map_csv_error(err: csv::Error) -> ChartError {
    ChartError::Parse(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{format_number, repair_headers};

    #[test]
    fn integral_numbers_format_without_fraction() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn repeated_and_blank_headers_are_repaired() {
        let headers = csv::StringRecord::from(vec!["a", "a", "", "a", "a.1"]);
        assert_eq!(
            repair_headers(&headers),
            vec!["a", "a.1", "Unnamed: 2", "a.2", "a.1.1"]
        );
    }
}
