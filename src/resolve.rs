use serde::{Deserialize, Serialize};

use crate::data::Dataset;
use crate::error::{Result, TrellisError};
use crate::sort::{SortColumns, SortOrder};

/// Which columns drive the chart, and how rows are ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub numeric: String,
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub order: SortOrder,
}

/// One of the three column slots of an `AxisConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisField {
    Numeric,
    Y,
    X,
}

/// Column indices of an `AxisConfig` checked against a dataset header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAxes {
    pub numeric: usize,
    pub x: usize,
    pub y: usize,
}

impl ResolvedAxes {
    pub fn sort_columns(&self) -> SortColumns {
        SortColumns {
            numeric: self.numeric,
            x: self.x,
            y: self.y,
        }
    }
}

impl AxisConfig {
    pub fn new<S: Into<String>>(numeric: S, x: S, y: S, order: Option<SortOrder>) -> Self {
        Self {
            numeric: numeric.into(),
            x: x.into(),
            y: y.into(),
            order: order.unwrap_or_default(),
        }
    }

    /// Same configuration with the categorical axes swapped.
    pub fn transposed(&self) -> Self {
        Self {
            numeric: self.numeric.clone(),
            x: self.y.clone(),
            y: self.x.clone(),
            order: self.order,
        }
    }

    /// Check every column against the dataset header.
    pub fn resolve(&self, data: &Dataset) -> Result<ResolvedAxes> {
        Ok(ResolvedAxes {
            numeric: data.column_index(&self.numeric)?,
            x: data.column_index(&self.x)?,
            y: data.column_index(&self.y)?,
        })
    }

    /// Pick a starting configuration for a dataset: the first numeric column,
    /// then distinct categorical columns for y and x.
    pub fn suggest(data: &Dataset) -> Result<Self> {
        let found = data.columns().len();
        if found < 3 {
            return Err(TrellisError::NotEnoughColumns { found });
        }
        let numeric = data.numeric_columns();
        let first_numeric = numeric.first().ok_or(TrellisError::NoNumericColumn)?;
        let first_categorical = data
            .categorical_columns()
            .first()
            .map(|c| c.to_string())
            .unwrap_or_default();

        let mut config = Self::new(
            first_numeric.to_string(),
            first_categorical.clone(),
            first_categorical,
            None,
        );
        config.reconcile(data, None);
        Ok(config)
    }

    /// Set one field and move any other field that now collides with a taken
    /// column onto the next free column of its kind.
    pub fn with_field(mut self, data: &Dataset, field: AxisField, column: &str) -> Self {
        *self.field_mut(field) = column.to_string();
        self.reconcile(data, Some(field));
        self
    }

    fn reconcile(&mut self, data: &Dataset, fixed: Option<AxisField>) {
        let numeric_columns = data.numeric_columns();
        let categorical_columns = data.categorical_columns();

        let mut taken: Vec<String> = fixed.map(|f| self.field(f).to_string()).into_iter().collect();

        for field in [AxisField::Numeric, AxisField::Y, AxisField::X] {
            if Some(field) == fixed {
                continue;
            }
            let candidates = match field {
                AxisField::Numeric => &numeric_columns,
                AxisField::X | AxisField::Y => &categorical_columns,
            };
            let preferred = self.field(field).to_string();
            let chosen = if !taken.contains(&preferred) {
                Some(preferred)
            } else {
                candidates
                    .iter()
                    .find(|c| !taken.iter().any(|t| t == *c))
                    .map(|c| c.to_string())
            };
            if let Some(column) = chosen {
                taken.push(column.clone());
                *self.field_mut(field) = column;
            }
        }
    }

    fn field(&self, field: AxisField) -> &str {
        match field {
            AxisField::Numeric => &self.numeric,
            AxisField::X => &self.x,
            AxisField::Y => &self.y,
        }
    }

    fn field_mut(&mut self, field: AxisField) -> &mut String {
        match field {
            AxisField::Numeric => &mut self.numeric,
            AxisField::X => &mut self.x,
            AxisField::Y => &mut self.y,
        }
    }
}
