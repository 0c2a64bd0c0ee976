//! Chart renderers.
//!
//! Each renderer is a long-lived context bound to data by identity (commit
//! id, file name, line key) and sampled once per frame at an explicit time in
//! milliseconds. The viewer paints the samples with egui; [`chart`] paints the
//! same geometry to SVG with plotters.

pub mod chart;
pub mod files;
pub mod pie;
pub mod scale;
pub mod scatter;
pub mod styles;
pub mod tween;

#[cfg(test)]
mod tests;

pub use chart::{export_snapshot, Snapshot};
pub use files::{DotFrame, FileFrame, FileView};
pub use pie::{slices_from_breakdown, LegendEntry, LegendFormat, PieChart, Slice, Wedge};
pub use scale::CategoryColors;
pub use scatter::{BrushRect, CircleFrame, GlobalDomain, ScatterPlot, Selection, Tooltip};
pub use styles::{ChartTheme, PieStyle, PlotLayout};
pub use tween::Tween;
