// Abstract Syntax Tree for reconfiguration scripts

use crate::sort::SortOrder;

/// A sequence of commands applied in order to one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `axes(numeric: c, x: c, y: c, order: o)`; a missing order means none
    Axes {
        numeric: String,
        x: String,
        y: String,
        order: Option<SortOrder>,
    },
    Transpose,
    Rerender,
}
