use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Fixed chart geometry. Every field has a default so a config file only
/// needs to name what it overrides.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChartOptions {
    #[serde(default = "default_width")]
    pub width: f64,
    /// Height reserved per row of the taller axis.
    #[serde(default = "default_element_height")]
    pub element_height: f64,
    #[serde(default = "default_top_padding")]
    pub top_padding: f64,
    #[serde(default)]
    pub margin: Margins,
    #[serde(default)]
    pub font: FontConfig,
    /// Band padding as a fraction of one band step.
    #[serde(default = "default_band_padding")]
    pub band_padding: f64,
    /// Advisory duration handed to the renderer with every frame.
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Margins {
    #[serde(default = "default_margin")]
    pub top: f64,
    #[serde(default = "default_margin")]
    pub bottom: f64,
    #[serde(default = "default_margin")]
    pub left: f64,
    #[serde(default = "default_margin")]
    pub right: f64,
    /// Gap between adjacent stacked column groups.
    #[serde(default = "default_margin")]
    pub between: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FontConfig {
    #[serde(default = "default_font_family")]
    pub family: String,
    #[serde(default = "default_font_size")]
    pub size: f64,
}

fn default_width() -> f64 { 1500.0 }
fn default_element_height() -> f64 { 40.0 }
fn default_top_padding() -> f64 { 30.0 }
fn default_margin() -> f64 { 10.0 }
fn default_band_padding() -> f64 { 0.4 }
fn default_transition_ms() -> u64 { 750 }
fn default_font_family() -> String { "sans-serif".to_string() }
fn default_font_size() -> f64 { 12.0 }

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            element_height: default_element_height(),
            top_padding: default_top_padding(),
            margin: Margins::default(),
            font: FontConfig::default(),
            band_padding: default_band_padding(),
            transition_ms: default_transition_ms(),
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: default_margin(),
            bottom: default_margin(),
            left: default_margin(),
            right: default_margin(),
            between: default_margin(),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: default_font_family(),
            size: default_font_size(),
        }
    }
}

impl ChartOptions {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_empty_json() {
        let opts: ChartOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, ChartOptions::default());
        assert_eq!(opts.width, 1500.0);
        assert_eq!(opts.margin.between, 10.0);
        assert_eq!(opts.font.family, "sans-serif");
    }

    #[test]
    fn test_partial_override() {
        let opts: ChartOptions =
            serde_json::from_str(r#"{"width": 800, "margin": {"left": 25}}"#).unwrap();
        assert_eq!(opts.width, 800.0);
        assert_eq!(opts.margin.left, 25.0);
        assert_eq!(opts.margin.right, 10.0);
        assert_eq!(opts.element_height, 40.0);
    }
}
