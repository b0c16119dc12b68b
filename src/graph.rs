use anyhow::{anyhow, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::config::FontConfig;
use crate::ir::{Frame, TextAnchor};

/// Divider lines are drawn as faint rules behind the bars.
const DIVIDER_ALPHA: f64 = 0.15;

/// Largest RGB buffer a bitmap render will allocate (1 GiB).
const MAX_BITMAP_BYTES: usize = 1 << 30;

/// Rasterise a frame and encode it as PNG.
pub fn render_png(frame: &Frame, font: &FontConfig) -> Result<Vec<u8>> {
    let (width, height) = pixel_size(frame);
    let mut buffer = vec![0u8; bitmap_len(width, height)?];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_frame(&root, frame, font)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

/// Draw a frame into an SVG document.
pub fn render_svg(frame: &Frame, font: &FontConfig) -> Result<String> {
    let (width, height) = pixel_size(frame);
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        draw_frame(&root, frame, font)?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg)
}

/// Bytes of an RGB buffer for `width` x `height` pixels.
fn bitmap_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(3))
        .filter(|&len| len <= MAX_BITMAP_BYTES)
        .ok_or_else(|| anyhow!("Chart of {}x{} pixels is too large to rasterise", width, height))
}

fn pixel_size(frame: &Frame) -> (u32, u32) {
    (frame.width.ceil().max(1.0) as u32, frame.height.ceil().max(1.0) as u32)
}

fn draw_frame<DB>(root: &DrawingArea<DB, Shift>, frame: &Frame, font: &FontConfig) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).context("Failed to fill background")?;

    let divider_style = BLACK.mix(DIVIDER_ALPHA).stroke_width(1);
    for line in &frame.axes.x_dividers {
        let x = line.x.round() as i32;
        root.draw(&PathElement::new(
            vec![(x, line.y0.round() as i32), (x, line.y1.round() as i32)],
            divider_style,
        ))
        .context("Failed to draw divider")?;
    }

    for bar in &frame.bars {
        let x0 = bar.x.round() as i32;
        let y0 = bar.y.round() as i32;
        let x1 = (bar.x + bar.width).round() as i32;
        let y1 = (bar.y + bar.height).round() as i32;
        root.draw(&Rectangle::new([(x0, y0), (x1, y1)], bar.fill.filled()))
            .context("Failed to draw bar")?;
    }

    let labels = frame.axes.x_labels.iter().chain(&frame.axes.y_labels);
    for label in labels {
        let pos = match label.anchor {
            TextAnchor::Start => Pos::new(HPos::Left, VPos::Bottom),
            TextAnchor::End => Pos::new(HPos::Right, VPos::Center),
        };
        let style = (font.family.as_str(), font.size)
            .into_font()
            .color(&BLACK)
            .pos(pos);
        root.draw(&Text::new(
            label.text.clone(),
            (label.x.round() as i32, label.y.round() as i32),
            style,
        ))
        .context("Failed to draw label")?;
    }

    Ok(())
}
