use anyhow::{anyhow, Context};
use nom::number::complete::recognize_float;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;

use crate::error::{Result, TrellisError};

/// Stable identity of a row: its position in the dataset as loaded.
///
/// Assigned once and carried through every geometry record so a renderer
/// can join frames on it instead of on column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RowId(pub usize);

/// A table of string cells with a fixed header.
///
/// Rows are immutable once loaded and always cover every column.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let expected = columns.len();
        if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(TrellisError::RaggedRow {
                row,
                expected,
                found: values.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    /// Load a dataset from CSV text with a header line.
    pub fn from_csv<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, record) in csv_reader.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read CSV record {}", idx + 1))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::new(columns, rows)?)
    }

    /// Create a dataset from a JSON array of objects.
    ///
    /// Column order is taken from the first object; missing keys and nulls become "".
    pub fn from_json(value: &Value) -> anyhow::Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        let first_obj = match array.first() {
            Some(first) => first
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?,
            None => return Err(anyhow!("Input data array is empty")),
        };

        let columns: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut row = Vec::with_capacity(columns.len());
            for column in &columns {
                let cell = match obj.get(column) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", column)),
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(Self::new(columns, rows)?)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row identities in dataset order.
    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        (0..self.rows.len()).map(RowId)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TrellisError::unknown_column(name))
    }

    /// Cell at `row` / column index `col`.
    pub fn cell(&self, row: RowId, col: usize) -> &str {
        &self.rows[row.0][col]
    }

    /// Looks a cell up by column name.
    pub fn get(&self, row: RowId, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row.0).map(|r| r[col].as_str())
    }

    /// Numeric reading of a cell, with unparseable values coerced to 0.
    pub fn numeric(&self, row: RowId, col: usize) -> f64 {
        numeric_value(self.cell(row, col))
    }

    /// Distinct values of a column, in first-occurrence order.
    pub fn unique_values(&self, col: usize) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.rows
            .iter()
            .map(|r| r[col].as_str())
            .filter(|v| seen.insert(*v))
            .collect()
    }

    /// Columns in which every distinct value parses as a number.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(col, _)| {
                self.unique_values(*col)
                    .iter()
                    .all(|v| parse_number(v).is_some())
            })
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// Columns usable as categorical axes.
    ///
    /// Every column qualifies, except a sole numeric column which is reserved
    /// for the numeric axis.
    pub fn categorical_columns(&self) -> Vec<&str> {
        let numeric = self.numeric_columns();
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| numeric.len() != 1 || numeric[0] != *c)
            .collect()
    }
}

/// Parse the leading number out of a cell after stripping everything except
/// digits, '.' and '-'. "$1,200.50" reads as 1200.5 and "1.2.3" as 1.2.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let (_, literal) = recognize_float::<&str, nom::error::Error<&str>>(cleaned.as_str()).ok()?;
    literal.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lossy numeric coercion: anything unparseable contributes 0.
pub fn numeric_value(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}
