//! Static SVG export of the charts at one narrative step.

use chrono::{DateTime, Duration, FixedOffset};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::path::{Path, PathBuf};

use crate::analysis::{language_breakdown, CommitHistory};
use crate::error::{self, Result};
use crate::settings::Settings;
use crate::utils::format::{format_hour, format_time_tick};

use super::pie::{slices_from_breakdown, LegendFormat, PieChart};
use super::scale::CategoryColors;
use super::scatter::{CircleFrame, GlobalDomain, ScatterPlot};
use super::styles::{ChartTheme, PieStyle, STEELBLUE};

type PlotError = Box<dyn Error + Send + Sync>;

type Canvas<'a> = DrawingArea<SVGBackend<'a>, Shift>;

// Helper function to wrap errors
fn wrap_err<E>(e: E) -> error::Error
where
    E: Into<PlotError>,
{
    error::Error::Plot(e.into().to_string())
}

/// Far enough in the future that every transition has settled.
const SETTLED: f64 = f64::MAX / 2.0;

/// Files written by [`export_snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub scatter: PathBuf,
    pub pie: PathBuf,
}

/// Render the scatter plot and language pie as they stand at `step` into
/// `out_dir/scatter.svg` and `out_dir/pie.svg`.
pub fn export_snapshot(
    history: &CommitHistory,
    step: usize,
    settings: &Settings,
    theme: &ChartTheme,
    out_dir: &Path,
) -> Result<Snapshot> {
    if step >= history.commits().len() {
        return Err(error::Error::Plot(format!(
            "step {} is out of range for {} commits",
            step,
            history.commits().len()
        )));
    }
    std::fs::create_dir_all(out_dir)?;

    let visible = history.visible_at(step);
    let global = GlobalDomain::from_commits(history.commits(), &settings.layout);
    let mut plot = ScatterPlot::new(global, settings.layout, settings.scatter_transition_ms);
    plot.update(&visible, 0.0);
    let frames = plot.frame(SETTLED);

    let mut pie = PieChart::new(
        CategoryColors::new(history.all_types()),
        LegendFormat::Lines,
        settings.pie.dimmed_opacity,
    );
    let lines = history.lines_of_set(visible.iter().copied());
    pie.set_data(slices_from_breakdown(&language_breakdown(&lines)));

    let snapshot = Snapshot {
        scatter: out_dir.join("scatter.svg"),
        pie: out_dir.join("pie.svg"),
    };
    write_scatter_svg(&snapshot.scatter, &plot, &frames, theme)?;
    write_pie_svg(&snapshot.pie, &pie, &settings.pie, theme)?;

    log::info!(
        "Exported step {} ({} commits visible) to {}",
        step,
        visible.len(),
        out_dir.display()
    );
    Ok(snapshot)
}

pub fn write_scatter_svg(
    path: &Path,
    plot: &ScatterPlot,
    frames: &[CircleFrame],
    theme: &ChartTheme,
) -> Result<()> {
    let layout = plot.layout();
    let size = (layout.width as u32, layout.height as u32);
    let root = SVGBackend::new(path, size).into_drawing_area();
    draw_scatter(&root, plot, frames, theme).map_err(wrap_err)?;
    root.present().map_err(wrap_err)?;
    Ok(())
}

pub fn write_pie_svg(path: &Path, pie: &PieChart, style: &PieStyle, theme: &ChartTheme) -> Result<()> {
    let legend_width = 220;
    let size = (style.width as u32 + legend_width, style.height as u32);
    let root = SVGBackend::new(path, size).into_drawing_area();
    draw_pie(&root, pie, style, theme).map_err(wrap_err)?;
    root.present().map_err(wrap_err)?;
    Ok(())
}

fn px(value: f64) -> i32 {
    value.round() as i32
}

fn draw_scatter(
    root: &Canvas<'_>,
    plot: &ScatterPlot,
    frames: &[CircleFrame],
    theme: &ChartTheme,
) -> std::result::Result<(), PlotError> {
    let layout = plot.layout();
    let global = plot.global();
    root.fill(&theme.background_color)?;

    let (start, mut end) = global.x.bounds().ok_or("time domain out of range")?;
    if end <= start {
        end = start + Duration::hours(1);
    }

    // Label areas match the plot margins so the cartesian area lines up with
    // the circle positions.
    let mut chart = ChartBuilder::on(root)
        .margin_top(layout.margin_top as u32)
        .margin_right(layout.margin_right as u32)
        .x_label_area_size(layout.margin_bottom as u32)
        .y_label_area_size(layout.margin_left as u32)
        .build_cartesian_2d(start..end, 0f64..24f64)?;

    let interval = global.x.interval.approx_secs();
    let x_label_formatter = |tick: &DateTime<FixedOffset>| format_time_tick(tick, interval);
    let y_label_formatter = |hour: &f64| format_hour(*hour);
    let label_style = ("sans-serif", layout.font_size)
        .into_font()
        .color(&theme.text_color);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .x_labels(layout.time_ticks())
        .y_labels(13)
        .x_label_formatter(&x_label_formatter)
        .y_label_formatter(&y_label_formatter)
        .label_style(label_style)
        .draw()?;

    let visible: Vec<(DateTime<FixedOffset>, f64, &CircleFrame)> = frames
        .iter()
        .filter(|f| f.r > 0.0)
        .filter_map(|f| Some((global.x.invert(f.cx)?, global.y.invert(f.cy), f)))
        .collect();

    chart.draw_series(
        visible
            .iter()
            .map(|(x, y, f)| Circle::new((*x, *y), px(f.r), STEELBLUE.mix(f.opacity).filled())),
    )?;
    chart.draw_series(
        visible
            .iter()
            .filter(|(_, _, f)| f.selected)
            .map(|(x, y, f)| {
                Circle::new(
                    (*x, *y),
                    px(f.r),
                    ShapeStyle::from(&RGBColor(0xff, 0x6b, 0x6b)).stroke_width(2),
                )
            }),
    )?;

    Ok(())
}

fn draw_pie(
    root: &Canvas<'_>,
    pie: &PieChart,
    style: &PieStyle,
    theme: &ChartTheme,
) -> std::result::Result<(), PlotError> {
    root.fill(&theme.background_color)?;

    let center = (style.width / 2.0, style.height / 2.0);
    let radius = style.radius();
    for wedge in pie.wedges() {
        let points: Vec<(i32, i32)> = wedge
            .polygon(center, radius)
            .into_iter()
            .map(|(x, y)| (px(x), px(y)))
            .collect();
        root.draw(&Polygon::new(points, wedge.color.mix(wedge.opacity).filled()))?;
    }

    let label_style = ("sans-serif", 13).into_font().color(&theme.text_color);
    let left = px(style.width) + 10;
    for (i, entry) in pie.legend().into_iter().enumerate() {
        let top = 20 + i as i32 * 22;
        root.draw(&Rectangle::new(
            [(left, top), (left + 14, top + 14)],
            entry.swatch.mix(entry.opacity).filled(),
        ))?;
        root.draw(&Text::new(
            entry.text,
            (left + 20, top + 1),
            label_style.clone(),
        ))?;
    }

    Ok(())
}
