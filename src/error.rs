//! Error type for the trellis layout core

use thiserror::Error;

/// Every failure the layout engine and controller can report.
#[derive(Error, Debug)]
pub enum TrellisError {
    #[error("Column '{column}' not found")]
    UnknownColumn { column: String },

    #[error("Row {row} has {found} values but the header declares {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Cannot lay out an empty dataset")]
    EmptyDataset,

    #[error("Stacked extent {total} cannot span a linear scale")]
    DegenerateExtent { total: f64 },

    #[error("Chart has no axes configured yet")]
    NotConfigured,

    #[error("Data should have at least 3 columns (found {found})")]
    NotEnoughColumns { found: usize },

    #[error("No numeric columns")]
    NoNumericColumn,

    #[error(transparent)]
    Render(#[from] anyhow::Error),
}

impl TrellisError {
    pub fn unknown_column<S: Into<String>>(column: S) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrellisError>;
