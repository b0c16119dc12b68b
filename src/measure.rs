//! Label width measurement used to reserve the left gutter.

use plotters::style::IntoFont;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::config::FontConfig;

/// Pixel width of a label in the chart font.
///
/// Assumed pure and stable for the lifetime of a chart.
pub trait TextMeasurer {
    fn text_width(&self, text: &str) -> f64;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str) -> f64,
{
    fn text_width(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Measures with the font metrics plotters resolves for the configured family.
///
/// Falls back to `heuristic_width` when the font cannot be loaded.
#[derive(Debug)]
pub struct FontMeasurer {
    font: FontConfig,
    warned: Cell<bool>,
}

impl FontMeasurer {
    pub fn new(font: FontConfig) -> Self {
        Self {
            font,
            warned: Cell::new(false),
        }
    }
}

impl TextMeasurer for FontMeasurer {
    fn text_width(&self, text: &str) -> f64 {
        let desc = (self.font.family.as_str(), self.font.size).into_font();
        match desc.box_size(text) {
            Ok((w, _)) => w as f64,
            Err(e) => {
                if !self.warned.replace(true) {
                    log::warn!(
                        "Font '{}' unavailable ({:?}), estimating label widths",
                        self.font.family,
                        e
                    );
                }
                heuristic_width(text, self.font.size)
            }
        }
    }
}

/// Rough width assuming ~0.6em per glyph.
pub fn heuristic_width(text: &str, font_size: f64) -> f64 {
    0.6 * font_size * text.chars().count() as f64
}

/// Memoises another measurer's answers.
#[derive(Debug)]
pub struct CachedMeasurer<M> {
    inner: M,
    widths: RefCell<HashMap<String, f64>>,
}

impl<M: TextMeasurer> CachedMeasurer<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            widths: RefCell::new(HashMap::new()),
        }
    }

    pub fn cached(&self) -> usize {
        self.widths.borrow().len()
    }
}

impl<M: TextMeasurer> TextMeasurer for CachedMeasurer<M> {
    fn text_width(&self, text: &str) -> f64 {
        if let Some(&w) = self.widths.borrow().get(text) {
            return w;
        }
        let w = self.inner.text_width(text);
        self.widths.borrow_mut().insert(text.to_string(), w);
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_measurer() {
        let m = |s: &str| s.len() as f64 * 7.0;
        assert_eq!(m.text_width("abc"), 21.0);
    }

    #[test]
    fn test_heuristic_counts_chars() {
        assert_eq!(heuristic_width("héllo", 10.0), 30.0);
        assert_eq!(heuristic_width("", 10.0), 0.0);
    }

    #[test]
    fn test_cache_calls_inner_once() {
        let calls = Cell::new(0);
        let inner = |s: &str| {
            calls.set(calls.get() + 1);
            s.len() as f64
        };
        let cached = CachedMeasurer::new(inner);
        assert_eq!(cached.text_width("region"), 6.0);
        assert_eq!(cached.text_width("region"), 6.0);
        assert_eq!(cached.text_width("x"), 1.0);
        assert_eq!(calls.get(), 2);
        assert_eq!(cached.cached(), 2);
    }

    #[test]
    fn test_font_measurer_is_positive() {
        let m = FontMeasurer::new(FontConfig::default());
        assert!(m.text_width("Region") > 0.0);
        assert!(m.text_width("a much longer label") > m.text_width("a"));
    }
}
