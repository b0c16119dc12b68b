use plotters::style::RGBColor;
use serde::{Serialize, Serializer};

use crate::data::RowId;
use crate::scale::to_hex;

// =============================================================================
// Geometry handed to the renderer
// =============================================================================

/// One frame of chart geometry. Everything a renderer needs, already in pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub bars: Vec<BarGeometry>,
    pub axes: AxisGeometry,
    /// How long a renderer should animate from the previous frame.
    pub transition_ms: u64,
}

/// A single bar, keyed by the identity of the row it draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGeometry {
    pub id: RowId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(serialize_with = "serialize_color")]
    pub fill: RGBColor,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AxisGeometry {
    /// One label per stacked column group, above the plot.
    pub x_labels: Vec<AxisLabel>,
    /// One vertical divider per stacked column group.
    pub x_dividers: Vec<DividerLine>,
    /// One label per band, right-aligned against the gutter.
    pub y_labels: Vec<AxisLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: TextAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividerLine {
    pub x: f64,
    pub y0: f64,
    pub y1: f64,
}

impl Frame {
    pub fn bar(&self, id: RowId) -> Option<&BarGeometry> {
        self.bars.iter().find(|b| b.id == id)
    }
}

fn serialize_color<S: Serializer>(color: &RGBColor, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_hex(color))
}
