use plotters::style::RGBColor;
use std::f64::consts::TAU;

use crate::analysis::LanguageBreakdown;
use crate::utils::format_percent;

use super::scale::CategoryColors;

/// How legend entries describe their slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendFormat {
    /// `js: 120 lines (40%)`
    Lines,
    /// `2024 (3)`
    Count,
}

/// One category fed to the pie.
#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: usize,
}

impl Slice {
    pub fn new(label: impl Into<String>, value: usize) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Slices of a language breakdown.
pub fn slices_from_breakdown(breakdown: &LanguageBreakdown) -> Vec<Slice> {
    breakdown
        .entries
        .iter()
        .map(|e| Slice::new(e.label.clone(), e.count))
        .collect()
}

/// A wedge of the pie, angles in radians clockwise from twelve o'clock.
#[derive(Clone, Debug, PartialEq)]
pub struct Wedge {
    pub label: String,
    pub value: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: RGBColor,
    pub opacity: f64,
    pub selected: bool,
}

impl Wedge {
    /// Outline of the wedge as a polygon around `center`.
    pub fn polygon(&self, center: (f64, f64), radius: f64) -> Vec<(f64, f64)> {
        let sweep = self.end_angle - self.start_angle;
        let segments = ((sweep / TAU) * 96.0).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(segments + 2);
        if sweep < TAU - 1e-9 {
            points.push(center);
        }
        for i in 0..=segments {
            let angle = self.start_angle + sweep * i as f64 / segments as f64;
            points.push((
                center.0 + radius * angle.sin(),
                center.1 - radius * angle.cos(),
            ));
        }
        points
    }
}

/// One row of the legend.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub swatch: RGBColor,
    pub text: String,
    pub opacity: f64,
    pub selected: bool,
}

/// A pie with its legend and click-to-isolate selection.
#[derive(Clone, Debug)]
pub struct PieChart {
    colors: CategoryColors,
    format: LegendFormat,
    dimmed_opacity: f64,
    slices: Vec<Slice>,
    selected: Option<String>,
}

impl PieChart {
    pub fn new(colors: CategoryColors, format: LegendFormat, dimmed_opacity: f64) -> Self {
        Self {
            colors,
            format,
            dimmed_opacity,
            slices: Vec::new(),
            selected: None,
        }
    }

    /// Replace the data, largest slice first. Isolation survives while its
    /// category is still present.
    pub fn set_data(&mut self, mut slices: Vec<Slice>) {
        slices.retain(|s| s.value > 0);
        slices.sort_by(|a, b| b.value.cmp(&a.value));
        self.slices = slices;

        if let Some(selected) = &self.selected {
            if !self.slices.iter().any(|s| &s.label == selected) {
                self.selected = None;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.value).sum()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Click on a wedge or legend entry: isolate it, or clear if already isolated.
    pub fn toggle(&mut self, label: &str) {
        if self.selected.as_deref() == Some(label) {
            self.selected = None;
        } else if self.slices.iter().any(|s| s.label == label) {
            self.selected = Some(label.to_string());
        }
    }

    fn opacity_of(&self, label: &str) -> f64 {
        match &self.selected {
            Some(selected) if selected != label => self.dimmed_opacity,
            _ => 1.0,
        }
    }

    pub fn wedges(&self) -> Vec<Wedge> {
        let total = self.total() as f64;
        let mut angle = 0.0;
        self.slices
            .iter()
            .map(|s| {
                let sweep = if total > 0.0 { TAU * s.value as f64 / total } else { 0.0 };
                let wedge = Wedge {
                    label: s.label.clone(),
                    value: s.value,
                    start_angle: angle,
                    end_angle: angle + sweep,
                    color: self.colors.color(&s.label),
                    opacity: self.opacity_of(&s.label),
                    selected: self.selected.as_deref() == Some(s.label.as_str()),
                };
                angle += sweep;
                wedge
            })
            .collect()
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        let total = self.total();
        self.slices
            .iter()
            .map(|s| {
                let text = match self.format {
                    LegendFormat::Lines => {
                        let fraction = if total > 0 { s.value as f64 / total as f64 } else { 0.0 };
                        format!(
                            "{}: {} lines ({})",
                            s.label,
                            s.value,
                            format_percent(fraction, 0, false)
                        )
                    }
                    LegendFormat::Count => format!("{} ({})", s.label, s.value),
                };
                LegendEntry {
                    label: s.label.clone(),
                    swatch: self.colors.color(&s.label),
                    text,
                    opacity: self.opacity_of(&s.label),
                    selected: self.selected.as_deref() == Some(s.label.as_str()),
                }
            })
            .collect()
    }

    /// Label of the wedge under `point`, for a pie drawn at `center`.
    pub fn hit_test(&self, point: (f64, f64), center: (f64, f64), radius: f64) -> Option<String> {
        let dx = point.0 - center.0;
        let dy = point.1 - center.1;
        if dx * dx + dy * dy > radius * radius {
            return None;
        }
        let angle = dx.atan2(-dy).rem_euclid(TAU);
        self.wedges()
            .into_iter()
            .find(|w| angle >= w.start_angle && angle < w.end_angle)
            .map(|w| w.label)
    }
}
