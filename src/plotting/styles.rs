use plotters::style::{RGBAColor, RGBColor};

use crate::types::ColorScheme;

/// Tableau 10 categorical palette.
pub const TABLEAU10: [RGBColor; 10] = [
    RGBColor(0x4e, 0x79, 0xa7),
    RGBColor(0xf2, 0x8e, 0x2c),
    RGBColor(0xe1, 0x57, 0x59),
    RGBColor(0x76, 0xb7, 0xb2),
    RGBColor(0x59, 0xa1, 0x4f),
    RGBColor(0xed, 0xc9, 0x49),
    RGBColor(0xaf, 0x7a, 0xa1),
    RGBColor(0xff, 0x9d, 0xa7),
    RGBColor(0x9c, 0x75, 0x5f),
    RGBColor(0xba, 0xb0, 0xab),
];

/// Fill of scatter-plot circles.
pub const STEELBLUE: RGBColor = RGBColor(70, 130, 180);

/// Chart theme configuration
#[derive(Clone, Copy, Debug)]
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
}

impl ChartTheme {
    pub fn light() -> Self {
        Self {
            background_color: RGBAColor(255, 255, 255, 1.0),
            text_color: RGBAColor(0, 0, 0, 0.85),
            grid_color: RGBAColor(204, 204, 204, 0.3),
            axis_color: RGBAColor(0, 0, 0, 0.8),
        }
    }

    pub fn dark() -> Self {
        Self {
            background_color: RGBAColor(0, 0, 0, 0.94),
            text_color: RGBAColor(255, 255, 255, 0.8),
            grid_color: RGBAColor(255, 255, 255, 0.15),
            axis_color: RGBAColor(255, 255, 255, 0.8),
        }
    }

    /// Theme for a colour scheme; `Automatic` resolves with the platform's dark mode flag.
    pub fn for_scheme(scheme: ColorScheme, system_dark: bool) -> Self {
        match scheme {
            ColorScheme::Light => Self::light(),
            ColorScheme::Dark => Self::dark(),
            ColorScheme::Automatic if system_dark => Self::dark(),
            ColorScheme::Automatic => Self::light(),
        }
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Geometry of the scatter plot, in SVG user units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotLayout {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    /// Radius range of the circles
    pub min_radius: f64,
    pub max_radius: f64,
    pub font_size: u32,
}

impl PlotLayout {
    pub fn x_range(&self) -> (f64, f64) {
        (self.margin_left, self.width - self.margin_right)
    }

    /// Hour axis runs bottom to top.
    pub fn y_range(&self) -> (f64, f64) {
        (self.height - self.margin_bottom, self.margin_top)
    }

    /// Approximate number of time ticks.
    pub fn time_ticks(&self) -> usize {
        ((self.width / 100.0) as usize).max(1)
    }
}

impl Default for PlotLayout {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            margin_top: 10.0,
            margin_right: 10.0,
            margin_bottom: 30.0,
            margin_left: 40.0,
            min_radius: 5.0,
            max_radius: 19.0,
            font_size: 12,
        }
    }
}

/// Pie chart size configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PieStyle {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Opacity of wedges outside an isolated category
    pub dimmed_opacity: f64,
}

impl PieStyle {
    pub fn radius(&self) -> f64 {
        self.width.min(self.height) / 2.0 - self.margin
    }
}

impl Default for PieStyle {
    fn default() -> Self {
        Self {
            width: 250.0,
            height: 250.0,
            margin: 10.0,
            dimmed_opacity: 0.5,
        }
    }
}
