//! PNG chart renderer built on plotters.
//!
//! Draws into an in-memory RGB buffer with the bitmap backend, then
//! encodes PNG bytes with the `image` crate. Fixed 16x10 aspect, white
//! background, legend, date x-axis — one chart per (instrument, indicator)
//! pair.

use super::{ChartRenderer, ChartSpec, RenderError, RenderedChart};
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

/// Default raster size, 16x10 aspect.
pub const DEFAULT_WIDTH: u32 = 1600;
pub const DEFAULT_HEIGHT: u32 = 1000;

// Matplotlib's default color cycle, which the dashboard look follows.
const LINE_COLORS: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];

const HISTOGRAM_COLOR: RGBColor = RGBColor(100, 149, 237);

const HEADER_HEIGHT: i32 = 130;
const FOOTER_HEIGHT: i32 = 70;

pub struct PngChartRenderer {
    width: u32,
    height: u32,
}

impl PngChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for PngChartRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl ChartRenderer for PngChartRenderer {
    fn render(&self, spec: &ChartSpec) -> Result<RenderedChart, RenderError> {
        if spec.dates.is_empty() {
            return Err(RenderError::InvalidSpec("no dates to plot".into()));
        }
        for line in &spec.panel.lines {
            if line.values.len() != spec.dates.len() {
                return Err(RenderError::InvalidSpec(format!(
                    "series '{}' has {} values for {} dates",
                    line.label,
                    line.values.len(),
                    spec.dates.len()
                )));
            }
        }

        let (x_range, y_range) = axis_ranges(spec)?;

        let mut buf = vec![0u8; (self.width * self.height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(backend_err)?;

            let (header, body) = root.split_vertically(HEADER_HEIGHT);
            let (_, body_height) = body.dim_in_pixel();
            let (plot_area, footer) =
                body.split_vertically(body_height as i32 - FOOTER_HEIGHT);

            draw_centered(&header, &spec.title, 40, 24)?;
            draw_centered(&header, &spec.subtitle, 26, 84)?;

            for (i, text) in spec.footer.iter().enumerate() {
                draw_centered(&footer, text, 22, 8 + 30 * i as i32)?;
            }

            let mut chart = ChartBuilder::on(&plot_area)
                .margin(15)
                .x_label_area_size(70)
                .y_label_area_size(90)
                .build_cartesian_2d(x_range, y_range)
                .map_err(backend_err)?;

            chart
                .configure_mesh()
                .x_desc(spec.x_label)
                .y_desc(spec.panel.y_label)
                .label_style(("sans-serif", 20))
                .axis_desc_style(("sans-serif", 26))
                .draw()
                .map_err(backend_err)?;

            if let Some(histogram) = &spec.panel.histogram {
                let style = HISTOGRAM_COLOR.mix(0.5).filled();
                chart
                    .draw_series(
                        spec.dates
                            .iter()
                            .zip(histogram)
                            .filter(|(_, v)| !v.is_nan())
                            .map(|(&d, &v)| {
                                Rectangle::new([(d, 0.0), (d + Duration::days(1), v)], style)
                            }),
                    )
                    .map_err(backend_err)?
                    .label("MACD Histogram")
                    .legend(|(x, y)| {
                        Rectangle::new([(x, y - 6), (x + 16, y + 6)], HISTOGRAM_COLOR.filled())
                    });
            }

            for (i, line) in spec.panel.lines.iter().enumerate() {
                let color = LINE_COLORS[i % LINE_COLORS.len()];
                let points: Vec<(NaiveDate, f64)> = spec
                    .dates
                    .iter()
                    .zip(&line.values)
                    .filter(|(_, v)| !v.is_nan())
                    .map(|(&d, &v)| (d, v))
                    .collect();

                chart
                    .draw_series(LineSeries::new(points, color.stroke_width(2)))
                    .map_err(backend_err)?
                    .label(&line.label)
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
            }

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.85))
                .border_style(BLACK)
                .label_font(("sans-serif", 24))
                .draw()
                .map_err(backend_err)?;

            root.present().map_err(backend_err)?;
        }

        let img = image::RgbImage::from_raw(self.width, self.height, buf)
            .ok_or_else(|| RenderError::Encode("buffer size mismatch".into()))?;
        let mut png = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut png),
            image::ImageFormat::Png,
        )
        .map_err(|e| RenderError::Encode(e.to_string()))?;

        Ok(RenderedChart {
            png,
            width: self.width,
            height: self.height,
        })
    }
}

fn backend_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Backend(e.to_string())
}

/// Compute the x/y ranges covering every defined value (plus the zero
/// baseline when a histogram is present), with a little vertical padding.
fn axis_ranges(
    spec: &ChartSpec,
) -> Result<(std::ops::Range<NaiveDate>, std::ops::Range<f64>), RenderError> {
    let start = spec.dates[0];
    let mut end = spec.dates[spec.dates.len() - 1];
    if end <= start {
        end = start + Duration::days(1);
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    let defined = spec
        .panel
        .lines
        .iter()
        .flat_map(|l| l.values.iter())
        .chain(spec.panel.histogram.iter().flatten())
        .filter(|v| !v.is_nan());
    for &v in defined {
        lo = lo.min(v);
        hi = hi.max(v);
    }

    if !lo.is_finite() || !hi.is_finite() {
        return Err(RenderError::InvalidSpec("no defined values to plot".into()));
    }

    if spec.panel.histogram.is_some() {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }

    let pad = ((hi - lo) * 0.05).max(1e-6);
    Ok((start..end, (lo - pad)..(hi + pad)))
}

/// Draw one line of text horizontally centered at vertical offset `y`.
fn draw_centered<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    text: &str,
    font_size: i32,
    y: i32,
) -> Result<(), RenderError> {
    if text.is_empty() {
        return Ok(());
    }
    let style = TextStyle::from(("sans-serif", font_size)).color(&BLACK);
    let (text_width, _) = area
        .estimate_text_size(text, &style)
        .map_err(|e| RenderError::Backend(e.to_string()))?;
    let (area_width, _) = area.dim_in_pixel();
    let x = (area_width as i32 - text_width as i32) / 2;
    area.draw(&Text::new(text.to_string(), (x.max(0), y), style))
        .map_err(|e| RenderError::Backend(e.to_string()))?;
    Ok(())
}
