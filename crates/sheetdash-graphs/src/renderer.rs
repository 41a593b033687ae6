//! PNG rendering of bar chart descriptions with plotters

use crate::chart::BarChart;
use crate::types::{color_or_fallback, GraphConfig};
use plotters::coord::Shift;
use plotters::prelude::*;
use sheetdash_common::{DashError, Result};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Draws [`BarChart`]s onto bitmaps.
#[derive(Debug, Clone, Default)]
pub struct BitmapRenderer {
    config: GraphConfig,
}

impl BitmapRenderer {
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Render to a PNG file at `path`.
    pub fn render_to_file(&self, chart: &BarChart, path: &Path) -> Result<()> {
        let png = self.render_to_bytes(chart)?;
        std::fs::write(path, png).map_err(|e| {
            DashError::with_source(format!("Failed to write chart to {}", path.display()), e)
        })?;

        info!("Rendered chart to {}", path.display());
        Ok(())
    }

    /// Render to PNG-encoded bytes.
    #[instrument(skip(self, chart), fields(title = %chart.title, bars = chart.bars.len()))]
    pub fn render_to_bytes(&self, chart: &BarChart) -> Result<Vec<u8>> {
        let (width, height) = (self.config.width, self.config.height);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            self.draw(&root, chart)?;
            root.present()?;
        }

        let image = image::RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| DashError::graph("Bitmap buffer does not match chart size"))?;
        let mut png = Vec::new();
        image::DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut png), image::ImageOutputFormat::Png)
            .map_err(|e| DashError::graph_with_source("Failed to encode PNG", e))?;

        debug!(bytes = png.len(), "Encoded chart as PNG");
        Ok(png)
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        chart: &BarChart,
    ) -> Result<()>
    where
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        let style = &self.config.style;
        root.fill(&color_or_fallback(&style.background_color))?;

        let slots = chart.bars.len().max(1);
        let (y_min, y_max) = value_range(chart);
        let title_font = (style.title_font.family.as_str(), style.title_font.size);
        let label_font = (style.label_font.family.as_str(), style.label_font.size);

        let mut plot = ChartBuilder::on(root)
            .caption(&chart.title, title_font)
            .margin(style.margins.top as i32)
            .x_label_area_size(style.margins.bottom)
            .y_label_area_size(style.margins.left)
            .build_cartesian_2d((0usize..slots).into_segmented(), y_min..y_max)?;

        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        let label_for = |value: &SegmentValue<usize>| match value {
            SegmentValue::CenterOf(i) => labels.get(*i).map(|l| l.to_string()).unwrap_or_default(),
            _ => String::new(),
        };

        let mut mesh = plot.configure_mesh();
        mesh.x_desc(chart.x_axis_label.as_str())
            .y_desc(chart.y_axis_label.as_str())
            .x_labels(slots)
            .x_label_formatter(&label_for)
            .label_style(label_font);
        if !style.grid.show_x {
            mesh.disable_x_mesh();
        }
        if !style.grid.show_y {
            mesh.disable_y_mesh();
        }
        mesh.draw()?;

        let bar_color = color_or_fallback(&style.bar_color);
        plot.draw_series(
            Histogram::vertical(&plot)
                .style(bar_color.filled())
                .margin(8)
                .data(chart.bars.iter().enumerate().map(|(i, bar)| (i, bar.value))),
        )?;

        Ok(())
    }
}

/// Y range covering every bar and zero, with headroom above the tallest.
fn value_range(chart: &BarChart) -> (f64, f64) {
    let low = chart.min_value().unwrap_or(0.0).min(0.0);
    let high = chart.max_value().unwrap_or(0.0).max(0.0);
    if high - low <= f64::EPSILON {
        return (0.0, 1.0);
    }
    let headroom = (high - low) * 0.1;
    let low = if low < 0.0 { low - headroom } else { 0.0 };
    (low, high + headroom)
}
