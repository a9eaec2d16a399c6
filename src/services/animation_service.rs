use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, info};

use crate::models::{PriceHistory, PricePoint};
use crate::utils::AppError;

const NAVY: RGBColor = RGBColor(0, 0, 128);
const CRIMSON: RGBColor = RGBColor(220, 20, 60);

/// How the animation is laid out and written
#[derive(Debug, Clone)]
pub struct AnimationOptions {
    pub title: String,
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub frame_delay_ms: u32,
    /// Upper bound on reveal frames, 0 means one frame per point
    pub max_frames: usize,
    /// Extra copies of the finished chart appended at the end
    pub hold_frames: usize,
}

/// What a finished render produced
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub frames: usize,
    pub output_path: PathBuf,
}

/// Fixed axis ranges shared by every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub x: (DateTime<Utc>, DateTime<Utc>),
    pub y: (f64, f64),
}

/// Exclusive end index of the points revealed in each frame
///
/// Ends are strictly increasing and the last one always equals `len`, so the
/// final frame shows the whole series.
pub fn plan_frames(len: usize, max_frames: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }

    let step = if max_frames == 0 || len <= max_frames {
        1
    } else {
        len.div_ceil(max_frames)
    };

    let mut ends: Vec<usize> = (step..=len).step_by(step).collect();
    if ends.last() != Some(&len) {
        ends.push(len);
    }
    ends
}

/// Axis ranges covering the full history
///
/// Prices get 5% of their span as padding on both sides, or 10 when the
/// series is flat.
pub fn axis_bounds(history: &PriceHistory) -> Option<AxisBounds> {
    let (start, end) = history.time_bounds()?;
    let (min_price, max_price) = history.price_bounds()?;

    let x = if start == end {
        (start - Duration::days(1), end + Duration::days(1))
    } else {
        (start, end)
    };

    let span = max_price - min_price;
    let padding = if span > 0.0 { span * 0.05 } else { 10.0 };

    Some(AxisBounds {
        x,
        y: (min_price - padding, max_price + padding),
    })
}

/// Text shown next to the newest revealed point
pub fn frame_label(history: &PriceHistory, point: &PricePoint) -> String {
    format!("{}: {:.2}", history.local_date(point).format("%Y-%m-%d"), point.price)
}

/// Date format for x tick labels, coarser for longer spans
pub fn date_format_for(bounds: &AxisBounds) -> &'static str {
    let days = (bounds.x.1 - bounds.x.0).num_days();
    if days > 3 * 365 {
        "%Y"
    } else if days > 60 {
        "%Y-%m"
    } else {
        "%m-%d"
    }
}

/// Render the reveal animation as an animated GIF
pub fn render_animation(
    history: &PriceHistory,
    options: &AnimationOptions,
) -> Result<RenderSummary, AppError> {
    let bounds = axis_bounds(history)
        .ok_or_else(|| AppError::EmptyHistory(history.symbol.clone()))?;
    let frame_ends = plan_frames(history.len(), options.max_frames);
    let total = frame_ends.len() + options.hold_frames;

    info!(
        "Rendering {} frames ({} points, {}ms per frame) to {}",
        total,
        history.len(),
        options.frame_delay_ms,
        options.output_path.display()
    );

    {
        let root = BitMapBackend::gif(
            &options.output_path,
            (options.width, options.height),
            options.frame_delay_ms,
        )
        .map_err(|e| render_error("Failed to create GIF", e))?
        .into_drawing_area();

        let hold = std::iter::repeat(history.len()).take(options.hold_frames);
        for (i, end) in frame_ends.iter().copied().chain(hold).enumerate() {
            draw_frame(&root, history, &bounds, &options.title, end)?;
            if (i + 1) % 100 == 0 {
                debug!("Rendered {}/{} frames", i + 1, total);
            }
        }
    }

    Ok(RenderSummary {
        frames: total,
        output_path: options.output_path.clone(),
    })
}

fn draw_frame(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    history: &PriceHistory,
    bounds: &AxisBounds,
    title: &str,
    end: usize,
) -> Result<(), AppError> {
    root.fill(&WHITE)
        .map_err(|e| render_error("Failed to fill canvas", e))?;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28.0).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(bounds.x.0..bounds.x.1, bounds.y.0..bounds.y.1)
        .map_err(|e| render_error("Failed to build chart", e))?;

    let date_format = date_format_for(bounds);
    let x_formatter = |d: &DateTime<Utc>| d.format(date_format).to_string();
    let y_formatter = |v: &f64| format!("{:.0}", v);

    chart
        .configure_mesh()
        .y_desc("Index Level")
        .x_labels(10)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(BLACK.mix(0.05))
        .draw()
        .map_err(|e| render_error("Failed to draw mesh", e))?;

    let revealed = &history.points()[..end.min(history.len())];

    chart
        .draw_series(LineSeries::new(
            revealed.iter().map(|p| (p.timestamp, p.price)),
            NAVY.stroke_width(2),
        ))
        .map_err(|e| render_error("Failed to draw line", e))?;

    if let Some(newest) = revealed.last() {
        chart
            .draw_series(std::iter::once(Circle::new(
                (newest.timestamp, newest.price),
                5,
                CRIMSON.filled(),
            )))
            .map_err(|e| render_error("Failed to draw marker", e))?;

        // Label sits in the top-left corner of the plot area
        let (x_pixels, y_pixels) = chart.plotting_area().get_pixel_range();
        root.draw(&Text::new(
            frame_label(history, newest),
            (x_pixels.start + 12, y_pixels.start + 10),
            ("sans-serif", 18.0).into_font().color(&BLACK),
        ))
        .map_err(|e| render_error("Failed to draw label", e))?;
    }

    root.present()
        .map_err(|e| render_error("Failed to write frame", e))
}

fn render_error<E: std::fmt::Display>(context: &str, e: E) -> AppError {
    AppError::Render(format!("{}: {}", context, e))
}
