//! Rendering sinks: the external collaborator that receives each frame.

pub mod join;

use anyhow::{bail, Context, Result};
use std::io::Write;

use crate::config::FontConfig;
use crate::graph;
use crate::ir::Frame;
use crate::OutputFormat;

pub use join::{join, Join, Transition};

/// Receives every frame the controller emits.
pub trait RenderSink {
    fn render(&mut self, frame: &Frame) -> Result<()>;

    /// Release whatever the sink owns. Called at most once.
    fn destroy(&mut self) {}
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        (**self).render(frame)
    }

    fn destroy(&mut self) {
        (**self).destroy()
    }
}

/// Keeps every frame it receives, along with the join and the transition
/// from the frame before it.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<Frame>,
    pub joins: Vec<Join>,
    pub transitions: Vec<Transition>,
    pub destroyed: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn last_join(&self) -> Option<&Join> {
        self.joins.last()
    }

    pub fn last_transition(&self) -> Option<&Transition> {
        self.transitions.last()
    }
}

impl RenderSink for RecordingSink {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        self.joins.push(join(self.frames.last(), frame));
        self.transitions
            .push(Transition::between(self.frames.last(), frame));
        self.frames.push(frame.clone());
        Ok(())
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}

/// Writes each frame as one line of JSON.
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderSink for JsonSink<W> {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        serde_json::to_writer(&mut self.writer, frame).context("Failed to serialize frame")?;
        self.writer.write_all(b"\n").context("Failed to write frame")?;
        Ok(())
    }

    fn destroy(&mut self) {
        if let Err(e) = self.writer.flush() {
            log::warn!("failed to flush frame output: {}", e);
        }
    }
}

/// Draws frames with plotters. Only the latest drawing is kept.
pub struct PlottersSink {
    format: OutputFormat,
    font: FontConfig,
    output: Option<Vec<u8>>,
}

impl PlottersSink {
    pub fn new(format: OutputFormat, font: FontConfig) -> Self {
        Self {
            format,
            font,
            output: None,
        }
    }

    /// Encoded bytes of the last frame drawn.
    pub fn output(&self) -> Option<&[u8]> {
        self.output.as_deref()
    }

    pub fn take_output(&mut self) -> Option<Vec<u8>> {
        self.output.take()
    }
}

impl RenderSink for PlottersSink {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        let bytes = match self.format {
            OutputFormat::Png => graph::render_png(frame, &self.font)?,
            OutputFormat::Svg => graph::render_svg(frame, &self.font)?.into_bytes(),
            OutputFormat::Json => bail!("PlottersSink draws png or svg; use JsonSink for json"),
        };
        log::debug!("drew {} bars into {} bytes", frame.bars.len(), bytes.len());
        self.output = Some(bytes);
        Ok(())
    }

    fn destroy(&mut self) {
        self.output = None;
    }
}
