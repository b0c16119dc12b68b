//! Layout engine: dataset + axis configuration in, pixel geometry out.
//!
//! `compute_layout` is a pure function. Every call rebuilds grouping,
//! ordering, stacking, scales, dimensions and the frame together, so a
//! snapshot is never partially stale.

use std::collections::HashMap;

use crate::aggregate::{group_by, Aggregate, Grouping};
use crate::config::ChartOptions;
use crate::data::{Dataset, RowId};
use crate::error::{Result, TrellisError};
use crate::ir::{AxisGeometry, AxisLabel, BarGeometry, DividerLine, Frame, TextAnchor};
use crate::measure::TextMeasurer;
use crate::resolve::{AxisConfig, ResolvedAxes};
use crate::scale::{BandScale, ColorScale, LinearScale, ScaleSet};
use crate::sort::sort_rows;

/// Offset of the y label anchor to the left of the gutter: tick size plus tick padding.
const Y_LABEL_INSET: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Height grows with whichever axis has more distinct values.
    pub fn derive(options: &ChartOptions, x_count: usize, y_count: usize) -> Self {
        let rows = x_count.max(y_count) as f64;
        Self {
            width: options.width,
            height: options.top_padding
                + options.element_height * rows
                + options.margin.top
                + options.margin.bottom,
        }
    }
}

/// Where one x group sits in the stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackPosition {
    pub index: usize,
    /// Sum of the maxima of every x group before this one.
    pub offset: f64,
}

/// Stacking of the x groups in their current order.
#[derive(Debug, Clone, PartialEq)]
pub struct Stacking {
    pub keys: Vec<String>,
    pub maxima: Vec<f64>,
    pub positions: Vec<StackPosition>,
    /// Sum of every x group maximum; the linear scale's domain upper bound.
    pub total_extent: f64,
    lookup: HashMap<String, usize>,
}

impl Stacking {
    pub fn from_grouping(data: &Dataset, grouping: &Grouping, numeric_col: usize) -> Self {
        let maxima = grouping.aggregate(data, numeric_col, Aggregate::Max);

        let mut positions = Vec::with_capacity(maxima.len());
        let mut running = 0.0;
        for (index, max) in maxima.iter().enumerate() {
            positions.push(StackPosition { index, offset: running });
            running += max;
        }

        let keys: Vec<String> = grouping.keys().map(str::to_string).collect();
        let lookup = keys.iter().enumerate().map(|(i, k)| (k.clone(), i)).collect();

        Self {
            keys,
            maxima,
            positions,
            total_extent: running,
            lookup,
        }
    }

    pub fn position(&self, key: &str) -> Option<StackPosition> {
        self.lookup.get(key).map(|&i| self.positions[i])
    }
}

/// Everything computed for one axis configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub axes: AxisConfig,
    pub x_keys: Vec<String>,
    pub y_keys: Vec<String>,
    pub stacking: Stacking,
    pub scales: ScaleSet,
    pub dimensions: Dimensions,
    pub frame: Frame,
}

impl Layout {
    /// Horizontal start of the stacked column for `x_key`.
    pub fn x_offset(&self, x_key: &str, options: &ChartOptions) -> Option<f64> {
        let pos = self.stacking.position(x_key)?;
        Some(column_left(&self.scales, pos, options))
    }

    /// Width available to the linear scale after margins, gutter and gaps.
    pub fn available_width(&self) -> f64 {
        self.scales.linear.range().1
    }
}

fn column_left(scales: &ScaleSet, pos: StackPosition, options: &ChartOptions) -> f64 {
    scales.left_padding
        + options.margin.left
        + scales.linear.map(pos.offset)
        + pos.index as f64 * options.margin.between
}

/// Recompute the full layout for `axes` over `data`.
pub fn compute_layout(
    data: &Dataset,
    axes: &AxisConfig,
    options: &ChartOptions,
    measurer: &dyn TextMeasurer,
) -> Result<Layout> {
    let cols = axes.resolve(data)?;
    if data.is_empty() {
        return Err(TrellisError::EmptyDataset);
    }

    // 1. Order rows, then group both axes off the ordered sequence
    let rows = sort_rows(data, cols.sort_columns(), axes.order);
    let x_groups = group_by(data, &rows, cols.x);
    let y_groups = group_by(data, &rows, cols.y);

    // 2. Stack x groups by their maxima
    let stacking = Stacking::from_grouping(data, &x_groups, cols.numeric);
    if stacking.total_extent == 0.0 || !stacking.total_extent.is_finite() {
        return Err(TrellisError::DegenerateExtent {
            total: stacking.total_extent,
        });
    }

    // 3. Scales
    let dimensions = Dimensions::derive(options, x_groups.len(), y_groups.len());
    let scales = build_scales(data, &cols, &x_groups, &y_groups, &stacking, dimensions, options, measurer)?;

    log::debug!(
        "layout: {} x groups, {} y groups, total extent {}, left padding {}",
        x_groups.len(),
        y_groups.len(),
        stacking.total_extent,
        scales.left_padding
    );

    // 4. Geometry
    let frame = build_frame(data, &cols, &rows, &stacking, &scales, dimensions, options);

    Ok(Layout {
        axes: axes.clone(),
        x_keys: stacking.keys.clone(),
        y_keys: y_groups.keys().map(str::to_string).collect(),
        stacking,
        scales,
        dimensions,
        frame,
    })
}

fn build_scales(
    data: &Dataset,
    cols: &ResolvedAxes,
    x_groups: &Grouping,
    y_groups: &Grouping,
    stacking: &Stacking,
    dimensions: Dimensions,
    options: &ChartOptions,
    measurer: &dyn TextMeasurer,
) -> Result<ScaleSet> {
    let left_padding = x_groups
        .keys()
        .chain(y_groups.keys())
        .map(|k| measurer.text_width(k))
        .fold(0.0, f64::max);

    let margin = &options.margin;
    let available_width = dimensions.width
        - margin.left
        - margin.right
        - left_padding
        - margin.between * (y_groups.len() as f64 - 1.0);
    let linear = LinearScale::new((0.0, stacking.total_extent), (0.0, available_width))?;

    let band = BandScale::new(
        y_groups.keys().map(str::to_string).collect(),
        (
            margin.top + options.top_padding,
            dimensions.height - margin.bottom - options.top_padding,
        ),
        options.band_padding,
    );

    let (min, max) = data
        .row_ids()
        .map(|row| data.numeric(row, cols.numeric))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let color = ColorScale::new(min, max);

    Ok(ScaleSet {
        linear,
        band,
        color,
        left_padding,
    })
}

fn build_frame(
    data: &Dataset,
    cols: &ResolvedAxes,
    rows: &[RowId],
    stacking: &Stacking,
    scales: &ScaleSet,
    dimensions: Dimensions,
    options: &ChartOptions,
) -> Frame {
    // Bars are emitted in dataset order so consumers can index by identity.
    let mut ordered: Vec<RowId> = rows.to_vec();
    ordered.sort();

    let bars = ordered
        .into_iter()
        .filter_map(|row| {
            let value = data.numeric(row, cols.numeric);
            let pos = stacking.position(data.cell(row, cols.x))?;
            let y = scales.band.position(data.cell(row, cols.y))?;
            Some(BarGeometry {
                id: row,
                x: column_left(scales, pos, options),
                y,
                width: scales.linear.map(value),
                height: scales.band.bandwidth(),
                fill: scales.color.map(value),
            })
        })
        .collect();

    let mut axes = AxisGeometry::default();
    let label_y = options.margin.top + options.top_padding;
    for (key, pos) in stacking.keys.iter().zip(&stacking.positions) {
        let x = column_left(scales, *pos, options);
        axes.x_labels.push(AxisLabel {
            text: key.clone(),
            x,
            y: label_y,
            anchor: TextAnchor::Start,
        });
        axes.x_dividers.push(DividerLine {
            x,
            y0: options.margin.top,
            y1: dimensions.height - options.margin.bottom,
        });
    }

    let label_offset = band_label_offset(scales.band.bandwidth());
    for key in scales.band.keys() {
        if let Some(y) = scales.band.position(key) {
            axes.y_labels.push(AxisLabel {
                text: key.clone(),
                x: options.margin.left + scales.left_padding - Y_LABEL_INSET,
                y: y + label_offset,
                anchor: TextAnchor::End,
            });
        }
    }

    Frame {
        width: dimensions.width,
        height: dimensions.height,
        bars,
        axes,
        transition_ms: options.transition_ms,
    }
}

/// Offset of a y label from the top of its band, as a left axis places ticks
/// on a rounded band scale.
fn band_label_offset(bandwidth: f64) -> f64 {
    ((bandwidth - 1.0).max(0.0) / 2.0).round()
}
