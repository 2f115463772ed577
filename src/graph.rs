use crate::palette::{self, AXIS_GREY};
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::PI;
use tracing::debug;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const MARGIN: i32 = 16;
const TITLE_BAND: i32 = 40;
const TITLE_SIZE: f64 = 20.0;
const LABEL_SIZE: f64 = 13.0;

/// Draw text, tolerating hosts without a usable font.
///
/// Shapes never depend on text, so a failed lookup only costs the label.
fn draw_label(area: &Area<'_>, text: &str, pos: (i32, i32), size: f64, color: &RGBColor) {
    let style = ("sans-serif", size).into_font().color(color);
    if let Err(e) = area.draw(&Text::new(text.to_string(), pos, style)) {
        debug!(error = ?e, text, "label skipped");
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with "..."
fn truncate_label(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Fixed-size RGB bitmap that one chart is drawn onto
pub struct Canvas {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    title: String,
}

impl Canvas {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Result<Self> {
        if width == 0 || height == 0 {
            anyhow::bail!("Canvas dimensions must be positive (got {}x{})", width, height);
        }

        Ok(Self {
            buffer: vec![0u8; (width as usize) * (height as usize) * 3],
            width,
            height,
            title: title.into(),
        })
    }

    /// Clear to white and draw the title; the closure draws the body
    fn paint<F>(&mut self, body: F) -> Result<()>
    where
        F: FnOnce(&Area<'_>, i32, i32) -> Result<()>,
    {
        let (width, height) = (self.width, self.height);
        let root = BitMapBackend::with_buffer(&mut self.buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).context("Failed to fill background")?;

        if !self.title.is_empty() {
            draw_label(&root, &self.title, (MARGIN, MARGIN / 2), TITLE_SIZE, &BLACK);
        }

        body(&root, width as i32, height as i32)?;

        root.present().context("Failed to present drawing")?;
        Ok(())
    }

    /// Centered notice used when there is nothing to plot
    pub fn draw_message(&mut self, message: &str) -> Result<()> {
        self.paint(|root, w, h| {
            let x = (w / 2 - (message.chars().count() as i32) * 4).max(MARGIN);
            draw_label(root, message, (x, h / 2 - 8), 18.0, &AXIS_GREY);
            Ok(())
        })
    }

    /// One horizontal bar per entry, top to bottom in the given order.
    ///
    /// Bar lengths scale to the largest value; labels sit left of the bars.
    pub fn draw_horizontal_bars(
        &mut self,
        entries: &[(String, f64)],
        axis_label: &str,
        color: RGBColor,
    ) -> Result<()> {
        if entries.is_empty() {
            return self.draw_message("No data");
        }

        let max_value = entries
            .iter()
            .map(|(_, v)| *v)
            .fold(0.0_f64, f64::max);

        self.paint(|root, w, h| {
            let label_width = (w * 3 / 10).clamp(90, 260);
            let left = MARGIN + label_width;
            let right = w - MARGIN - 48;
            let top = TITLE_BAND;
            let bottom = h - MARGIN - 24;
            let plot_w = (right - left).max(1);
            let plot_h = (bottom - top).max(1);

            let slot = plot_h / entries.len() as i32;
            let pad = (slot / 6).max(1);
            let max_chars = (label_width / 7).max(4) as usize;

            // 1. Axis line
            root.draw(&PathElement::new(
                vec![(left, top), (left, bottom)],
                AXIS_GREY.stroke_width(1),
            ))
            .context("Failed to draw axis")?;

            // 2. Bars with category and value labels
            for (i, (label, value)) in entries.iter().enumerate() {
                let y0 = top + i as i32 * slot + pad;
                let y1 = top + (i as i32 + 1) * slot - pad;
                let length = if max_value > 0.0 {
                    ((value / max_value) * plot_w as f64).round() as i32
                } else {
                    0
                };

                root.draw(&Rectangle::new(
                    [(left, y0), (left + length.max(1), y1.max(y0 + 1))],
                    color.filled(),
                ))
                .context("Failed to draw bar")?;

                let text_y = (y0 + y1) / 2 - 6;
                draw_label(
                    root,
                    &truncate_label(label, max_chars),
                    (MARGIN, text_y),
                    LABEL_SIZE,
                    &BLACK,
                );
                draw_label(
                    root,
                    &format!("{}", value),
                    (left + length + 4, text_y),
                    LABEL_SIZE,
                    &AXIS_GREY,
                );
            }

            // 3. Axis caption
            if !axis_label.is_empty() {
                draw_label(root, axis_label, (left + plot_w / 2 - 30, bottom + 6), LABEL_SIZE, &AXIS_GREY);
            }

            Ok(())
        })
    }

    /// Pie with a legend to its right. Slices start at twelve o'clock and run
    /// clockwise in the given order. Non-positive values are skipped.
    pub fn draw_pie(&mut self, slices: &[(String, f64)]) -> Result<()> {
        let total: f64 = slices.iter().map(|(_, v)| v.max(0.0)).sum();
        if slices.is_empty() || total <= 0.0 {
            return self.draw_message("No data");
        }

        self.paint(|root, w, h| {
            let plot_h = h - TITLE_BAND - MARGIN;
            let pie_w = w * 11 / 20;
            let radius = ((pie_w.min(plot_h) / 2) - MARGIN).max(10) as f64;
            let center = (MARGIN + pie_w / 2, TITLE_BAND + plot_h / 2);

            let mut start = -PI / 2.0;
            for (i, (_, value)) in slices.iter().enumerate() {
                if *value <= 0.0 {
                    continue;
                }
                let sweep = value / total * 2.0 * PI;
                let steps = ((sweep.to_degrees()).ceil() as usize).max(2);

                let mut points = Vec::with_capacity(steps + 2);
                points.push(center);
                for s in 0..=steps {
                    let angle = start + sweep * s as f64 / steps as f64;
                    points.push((
                        center.0 + (radius * angle.cos()).round() as i32,
                        center.1 + (radius * angle.sin()).round() as i32,
                    ));
                }

                root.draw(&Polygon::new(points, palette::color_at(i).filled()))
                    .context("Failed to draw pie slice")?;
                start += sweep;
            }

            // Legend
            let legend_x = MARGIN + pie_w + 8;
            let max_chars = (((w - legend_x) / 7) - 10).max(4) as usize;
            let row_h = ((plot_h / slices.len() as i32).min(22)).max(12);
            for (i, (label, value)) in slices.iter().enumerate() {
                let y = TITLE_BAND + i as i32 * row_h;
                root.draw(&Rectangle::new(
                    [(legend_x, y), (legend_x + 12, y + 12)],
                    palette::color_at(i).filled(),
                ))
                .context("Failed to draw legend swatch")?;
                let text = format!("{} ({:.1}%)", truncate_label(label, max_chars), value / total * 100.0);
                draw_label(root, &text, (legend_x + 18, y), LABEL_SIZE, &BLACK);
            }

            Ok(())
        })
    }

    /// Finalize and encode the canvas as PNG
    pub fn render(self) -> Result<Vec<u8>> {
        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&self.buffer, self.width, self.height, image::ColorType::Rgb8)
                .context("Failed to encode PNG")?;
        }

        Ok(png_bytes)
    }
}
