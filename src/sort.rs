//! Row ordering for the two categorical axes.
//!
//! Sorting always runs over the dataset's own row sequence, never over a
//! previously sorted view, and the distinct-value order of each axis is read
//! back off the sorted rows by first occurrence. Stacking order and label
//! order therefore always agree.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::aggregate::{group_by, Aggregate};
use crate::data::{Dataset, RowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Dataset order.
    #[default]
    None,
    /// By y value, then x value, lexicographically.
    Alpha,
    /// By x group sum, then y group sum, smallest first.
    Asc,
    /// By x group sum, then y group sum, largest first.
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(SortOrder::None),
            "alpha" => Ok(SortOrder::Alpha),
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!(
                "Unknown order '{}' (expected none, alpha, asc or desc)",
                other
            )),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortOrder::None => "none",
            SortOrder::Alpha => "alpha",
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        f.write_str(name)
    }
}

/// Column indices the sorter reads.
#[derive(Debug, Clone, Copy)]
pub struct SortColumns {
    pub numeric: usize,
    pub x: usize,
    pub y: usize,
}

/// Order every row of the dataset according to `order`.
///
/// The sort is stable: rows that compare equal keep their dataset order.
pub fn sort_rows(data: &Dataset, cols: SortColumns, order: SortOrder) -> Vec<RowId> {
    let mut rows: Vec<RowId> = data.row_ids().collect();

    match order {
        SortOrder::None => {}
        SortOrder::Alpha => {
            rows.sort_by(|&a, &b| {
                data.cell(a, cols.y)
                    .cmp(data.cell(b, cols.y))
                    .then_with(|| data.cell(a, cols.x).cmp(data.cell(b, cols.x)))
            });
        }
        SortOrder::Asc | SortOrder::Desc => {
            // Sums always come from the full dataset in its natural order.
            let x_sums = group_sums(data, &rows, cols.x, cols.numeric);
            let y_sums = group_sums(data, &rows, cols.y, cols.numeric);
            let sum_of = |sums: &HashMap<String, f64>, row: RowId, col: usize| {
                sums.get(data.cell(row, col)).copied().unwrap_or(0.0)
            };

            rows.sort_by(|&a, &b| {
                let by_x = sum_of(&x_sums, a, cols.x).total_cmp(&sum_of(&x_sums, b, cols.x));
                let by_y = sum_of(&y_sums, a, cols.y).total_cmp(&sum_of(&y_sums, b, cols.y));
                let ord = by_x.then(by_y);
                if order == SortOrder::Desc {
                    ord.reverse()
                } else {
                    ord
                }
            });
        }
    }

    rows
}

/// Distinct values of `col` in first-occurrence order within `rows`.
pub fn distinct_order(data: &Dataset, rows: &[RowId], col: usize) -> Vec<String> {
    group_by(data, rows, col)
        .keys()
        .map(str::to_string)
        .collect()
}

fn group_sums(data: &Dataset, rows: &[RowId], col: usize, numeric: usize) -> HashMap<String, f64> {
    let grouping = group_by(data, rows, col);
    let sums = grouping.aggregate(data, numeric, Aggregate::Sum);
    grouping.keys().map(str::to_string).zip(sums).collect()
}
