use plotters::style::RGBColor;
use std::collections::HashMap;

use crate::error::{Result, TrellisError};

/// Affine map from a value domain onto a pixel range. Values outside the
/// domain extrapolate; nothing is clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Fails when the domain has zero or non-finite width.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        let span = domain.1 - domain.0;
        if span == 0.0 || !span.is_finite() {
            return Err(TrellisError::DegenerateExtent { total: span });
        }
        Ok(Self { domain, range })
    }

    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Evenly spaced, rounded bands for an ordered set of categories.
///
/// Inner and outer padding are both `padding` band steps and the bands are
/// centred in the range, with step, start and bandwidth rounded to whole
/// pixels so adjacent bands never overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    keys: Vec<String>,
    lookup: HashMap<String, usize>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(keys: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let n = keys.len() as f64;
        let (lo, hi) = if range.1 < range.0 { (range.1, range.0) } else { range };

        let step = ((hi - lo) / (n - padding + 2.0 * padding).max(1.0)).floor();
        let start = (lo + (hi - lo - step * (n - padding)) * 0.5).round();
        let bandwidth = (step * (1.0 - padding)).round();

        let lookup = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();

        Self {
            keys,
            lookup,
            start,
            step,
            bandwidth,
        }
    }

    /// Top edge of the band for `key`, or None for an unknown category.
    pub fn position(&self, key: &str) -> Option<f64> {
        self.lookup
            .get(key)
            .map(|&i| self.start + self.step * i as f64)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// Stops of the ramp, light to dark. Every channel is non-increasing along
/// the ramp and green strictly decreases, so the map is strictly monotonic.
const RAMP: [(f64, f64, f64); 5] = [
    (107.0, 174.0, 214.0),
    (66.0, 146.0, 198.0),
    (33.0, 113.0, 181.0),
    (8.0, 81.0, 156.0),
    (8.0, 48.0, 107.0),
];

/// Continuous sequential colour scale over the dataset's full value range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    domain: (f64, f64),
}

impl ColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { domain: (min, max) }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Position of `v` along the ramp in [0, 1]. A zero-width domain maps
    /// everything to the light end.
    pub fn ramp_position(&self, v: f64) -> f64 {
        let (lo, hi) = self.domain;
        if hi == lo {
            return 0.0;
        }
        ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
    }

    /// Unrounded RGB channels for `v`.
    pub fn channels(&self, v: f64) -> (f64, f64, f64) {
        let t = self.ramp_position(v) * (RAMP.len() - 1) as f64;
        let i = (t.floor() as usize).min(RAMP.len() - 2);
        let f = t - i as f64;
        let (a, b) = (RAMP[i], RAMP[i + 1]);
        (
            a.0 + (b.0 - a.0) * f,
            a.1 + (b.1 - a.1) * f,
            a.2 + (b.2 - a.2) * f,
        )
    }

    pub fn map(&self, v: f64) -> RGBColor {
        let (r, g, b) = self.channels(v);
        RGBColor(r.round() as u8, g.round() as u8, b.round() as u8)
    }

    /// The two ends of the ramp.
    pub fn ends() -> (RGBColor, RGBColor) {
        let to_rgb = |c: (f64, f64, f64)| RGBColor(c.0 as u8, c.1 as u8, c.2 as u8);
        (to_rgb(RAMP[0]), to_rgb(RAMP[RAMP.len() - 1]))
    }
}

/// Hex notation for a colour, e.g. "#6baed6".
pub fn to_hex(color: &RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

/// The complete scale set for one axis configuration. Always rebuilt as a
/// whole.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSet {
    pub linear: LinearScale,
    pub band: BandScale,
    pub color: ColorScale,
    /// Gutter reserved for the widest label.
    pub left_padding: f64,
}
