use std::collections::HashMap;

use crate::data::{Dataset, RowId};

/// Rows sharing one distinct value of a categorical column.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: String,
    pub rows: Vec<RowId>,
}

/// Distinct values of a column in first-occurrence order, each with its rows.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    groups: Vec<Group>,
    lookup: HashMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Max,
    Sum,
}

impl Grouping {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group> {
        self.groups.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(|g| g.key.as_str())
    }

    /// Ordinal position of `key` in this grouping.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.lookup.get(key).copied()
    }

    pub fn get(&self, key: &str) -> Option<&Group> {
        self.position(key).map(|idx| &self.groups[idx])
    }

    /// Aggregate of the numeric column per group, aligned with group order.
    pub fn aggregate(&self, data: &Dataset, numeric_col: usize, op: Aggregate) -> Vec<f64> {
        self.groups
            .iter()
            .map(|group| {
                let values = group.rows.iter().map(|&row| data.numeric(row, numeric_col));
                match op {
                    Aggregate::Max => values.fold(f64::NEG_INFINITY, f64::max),
                    Aggregate::Sum => values.sum(),
                }
            })
            .collect()
    }
}

/// Group the given row sequence by the value in `col`.
///
/// Group order is the order in which each value first appears in `order`,
/// so passing a sorted row sequence yields sorted groups.
pub fn group_by(data: &Dataset, order: &[RowId], col: usize) -> Grouping {
    let mut grouping = Grouping::default();
    for &row in order {
        let value = data.cell(row, col);
        match grouping.lookup.get(value) {
            Some(&idx) => grouping.groups[idx].rows.push(row),
            None => {
                grouping.lookup.insert(value.to_string(), grouping.groups.len());
                grouping.groups.push(Group {
                    key: value.to_string(),
                    rows: vec![row],
                });
            }
        }
    }
    grouping
}

/// Per-value aggregate of `numeric_col` over the whole dataset in its natural order.
pub fn aggregate(data: &Dataset, col: usize, numeric_col: usize, op: Aggregate) -> Vec<(String, f64)> {
    let order: Vec<RowId> = data.row_ids().collect();
    let grouping = group_by(data, &order, col);
    let values = grouping.aggregate(data, numeric_col, op);
    grouping
        .groups
        .into_iter()
        .map(|g| g.key)
        .zip(values)
        .collect()
}
