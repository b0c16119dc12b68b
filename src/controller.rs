//! The chart controller: owns the live axis configuration and the snapshot
//! derived from it, and pushes frames to a render sink.

use crate::config::ChartOptions;
use crate::data::Dataset;
use crate::error::{Result, TrellisError};
use crate::ir::Frame;
use crate::layout::{compute_layout, Layout};
use crate::measure::{CachedMeasurer, FontMeasurer, TextMeasurer};
use crate::render::RenderSink;
use crate::resolve::AxisConfig;
use crate::sort::SortOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Configured,
    Rendered,
}

pub struct Trellis<S: RenderSink> {
    data: Dataset,
    options: ChartOptions,
    measurer: Box<dyn TextMeasurer>,
    sink: S,
    phase: Phase,
    current: Option<Layout>,
}

impl<S: RenderSink> Trellis<S> {
    /// A controller measuring labels with the configured font.
    pub fn new(data: Dataset, options: ChartOptions, sink: S) -> Self {
        let measurer = CachedMeasurer::new(FontMeasurer::new(options.font.clone()));
        Self {
            data,
            options,
            measurer: Box::new(measurer),
            sink,
            phase: Phase::Uninitialized,
            current: None,
        }
    }

    pub fn with_measurer<M: TextMeasurer + 'static>(mut self, measurer: M) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    /// Replace the axis configuration and render it. An omitted order resets
    /// to `SortOrder::None`.
    ///
    /// Invalid columns fail before anything changes.
    pub fn set_axes(
        &mut self,
        numeric: &str,
        x: &str,
        y: &str,
        order: Option<SortOrder>,
    ) -> Result<()> {
        self.apply(AxisConfig::new(numeric, x, y, order))
    }

    /// Swap the categorical axes, keeping the numeric column and order.
    pub fn transpose(&mut self) -> Result<()> {
        let axes = self.axes().ok_or(TrellisError::NotConfigured)?.transposed();
        log::info!("transpose: x={} y={}", axes.x, axes.y);
        self.apply(axes)
    }

    /// Emit the current frame again without recomputing anything.
    pub fn rerender(&mut self) -> Result<()> {
        let frame = self
            .current
            .as_ref()
            .map(|l| &l.frame)
            .ok_or(TrellisError::NotConfigured)?;
        self.sink.render(frame)?;
        self.phase = Phase::Rendered;
        Ok(())
    }

    /// Compute the snapshot for `axes`, install it and render.
    pub fn apply(&mut self, axes: AxisConfig) -> Result<()> {
        let layout = compute_layout(&self.data, &axes, &self.options, self.measurer.as_ref())?;
        log::info!(
            "configured numeric={} x={} y={} order={}",
            axes.numeric,
            axes.x,
            axes.y,
            axes.order
        );
        self.current = Some(layout);
        self.phase = Phase::Configured;
        self.rerender()
    }

    /// Release the sink and hand it back.
    pub fn destroy(mut self) -> S {
        log::debug!("destroying chart in phase {:?}", self.phase);
        self.sink.destroy();
        self.sink
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn axes(&self) -> Option<&AxisConfig> {
        self.current.as_ref().map(|l| &l.axes)
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.current.as_ref()
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.current.as_ref().map(|l| &l.frame)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.data
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RowId;
    use crate::render::RecordingSink;

    fn sales() -> Dataset {
        let columns = ["amount", "region", "product"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = [
            ["10", "A", "X"],
            ["20", "A", "Y"],
            ["5", "B", "X"],
            ["7", "C", "Z"],
        ]
        .iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect();
        Dataset::new(columns, rows).unwrap()
    }

    fn chart() -> Trellis<RecordingSink> {
        Trellis::new(sales(), ChartOptions::default(), RecordingSink::new())
            .with_measurer(|s: &str| 7.0 * s.chars().count() as f64)
    }

    struct FailingSink;

    impl RenderSink for FailingSink {
        fn render(&mut self, _frame: &Frame) -> anyhow::Result<()> {
            anyhow::bail!("sink unavailable")
        }
    }

    #[test]
    fn test_set_axes_renders() {
        let mut c = chart();
        assert_eq!(c.phase(), Phase::Uninitialized);
        c.set_axes("amount", "product", "region", None).unwrap();
        assert_eq!(c.phase(), Phase::Rendered);
        assert_eq!(c.sink().frames.len(), 1);
        assert_eq!(c.sink().frames[0].bars.len(), 4);
    }

    #[test]
    fn test_transpose_requires_configuration() {
        let mut c = chart();
        assert!(matches!(c.transpose(), Err(TrellisError::NotConfigured)));
        assert!(matches!(c.rerender(), Err(TrellisError::NotConfigured)));
        assert!(c.sink().frames.is_empty());
    }

    #[test]
    fn test_transpose_twice_restores() {
        let mut c = chart();
        c.set_axes("amount", "product", "region", Some(SortOrder::Desc)).unwrap();
        let before = c.frame().unwrap().clone();
        let axes = c.axes().unwrap().clone();

        c.transpose().unwrap();
        assert_eq!(c.axes().unwrap().x, "region");
        assert_eq!(c.axes().unwrap().order, SortOrder::Desc);
        c.transpose().unwrap();

        assert_eq!(c.axes().unwrap(), &axes);
        let after = c.frame().unwrap();
        assert_eq!(after.bars.len(), before.bars.len());
        for (a, b) in before.bars.iter().zip(&after.bars) {
            assert_eq!(a.id, b.id);
            assert!((a.x - b.x).abs() < 1e-9);
            assert!((a.y - b.y).abs() < 1e-9);
            assert!((a.width - b.width).abs() < 1e-9);
        }
    }

    #[test]
    fn test_row_identity_persists() {
        let mut c = chart();
        c.set_axes("amount", "product", "region", None).unwrap();
        c.set_axes("amount", "region", "product", Some(SortOrder::Alpha)).unwrap();
        c.transpose().unwrap();
        let sink = c.sink();
        for j in &sink.joins[1..] {
            assert!(j.is_pure_update());
            assert_eq!(j.update.len(), 4);
        }
        let ids: Vec<RowId> = sink.last_frame().unwrap().bars.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![RowId(0), RowId(1), RowId(2), RowId(3)]);
    }

    #[test]
    fn test_invalid_columns_leave_state() {
        let mut c = chart();
        c.set_axes("amount", "product", "region", Some(SortOrder::Asc)).unwrap();
        let before = c.layout().unwrap().clone();

        let err = c.set_axes("amount", "product", "country", None);
        assert!(matches!(err, Err(TrellisError::UnknownColumn { .. })));
        assert_eq!(c.layout().unwrap(), &before);
        assert_eq!(c.phase(), Phase::Rendered);
        assert_eq!(c.sink().frames.len(), 1);
    }

    #[test]
    fn test_order_none_stable_across_reconfiguration() {
        let mut c = chart();
        c.set_axes("amount", "product", "region", None).unwrap();
        let first = c.layout().unwrap().y_keys.clone();
        c.set_axes("amount", "product", "region", Some(SortOrder::Desc)).unwrap();
        c.set_axes("amount", "product", "region", None).unwrap();
        assert_eq!(c.layout().unwrap().y_keys, first);
        assert_eq!(first, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_rerender_reemits_same_frame() {
        let mut c = chart();
        c.set_axes("amount", "product", "region", None).unwrap();
        c.rerender().unwrap();
        let frames = &c.sink().frames;
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], frames[1]);
    }

    #[test]
    fn test_sink_failure_keeps_snapshot() {
        let mut c = Trellis::new(sales(), ChartOptions::default(), FailingSink)
            .with_measurer(|s: &str| 7.0 * s.len() as f64);
        let err = c.set_axes("amount", "product", "region", None);
        assert!(matches!(err, Err(TrellisError::Render(_))));
        assert_eq!(c.phase(), Phase::Configured);
        assert!(c.frame().is_some());
    }

    #[test]
    fn test_destroy_returns_sink() {
        let mut c = chart();
        c.set_axes("amount", "product", "region", None).unwrap();
        let sink = c.destroy();
        assert!(sink.destroyed);
        assert_eq!(sink.frames.len(), 1);
    }
}
