// Library exports for trellis

pub mod aggregate;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod graph;
pub mod layout;
pub mod measure;
pub mod parser;
pub mod render;
pub mod runtime;
pub mod sort;

// Geometry pipeline
pub mod ir;
pub mod resolve;
pub mod scale;

pub use config::ChartOptions;
pub use controller::{Phase, Trellis};
pub use data::{Dataset, RowId};
pub use error::{Result, TrellisError};
pub use resolve::AxisConfig;
pub use sort::SortOrder;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
    /// One JSON line per emitted frame
    #[serde(rename = "json")]
    Json,
}
