//! The commit scatter plot: time of commit against hour of day, radius by
//! lines changed.
//!
//! [`GlobalDomain`] is computed once from the full commit sequence and never
//! renormalized, so axis positions and circle sizes stay comparable while the
//! narrative reveals the history. [`ScatterPlot`] is the renderer context: it
//! keeps one circle per commit id and animates enter, update and exit.

use std::collections::HashMap;

use crate::analysis::{language_breakdown, CommitHistory, LanguageBreakdown};
use crate::types::Commit;
use crate::utils::format::{format_full, format_hour};

use super::scale::{LinearScale, SqrtScale, TimeScale};
use super::styles::PlotLayout;
use super::tween::Tween;

pub const DEFAULT_OPACITY: f64 = 0.7;
pub const ACTIVE_OPACITY: f64 = 1.0;
pub const NOTHING_SELECTED: &str = "No commits selected";

/// Scale domains fixed to the whole dataset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalDomain {
    pub x: TimeScale,
    pub y: LinearScale,
    pub r: SqrtScale,
}

impl GlobalDomain {
    pub fn from_commits(commits: &[Commit], layout: &PlotLayout) -> Self {
        let x = TimeScale::nice(
            commits.iter().filter_map(|c| c.datetime.as_ref()),
            layout.x_range(),
            layout.time_ticks(),
        );
        let y = LinearScale::new((0.0, 24.0), layout.y_range());

        let min_lines = commits.iter().map(|c| c.total_lines).min().unwrap_or(0);
        let max_lines = commits.iter().map(|c| c.total_lines).max().unwrap_or(1);
        let r = SqrtScale::new(
            (min_lines as f64, max_lines as f64),
            (layout.min_radius, layout.max_radius),
        );

        Self { x, y, r }
    }

    /// Target position and radius of a commit; `None` when it has no valid time.
    pub fn place(&self, commit: &Commit) -> Option<(f64, f64, f64)> {
        let datetime = commit.datetime.as_ref()?;
        let hour = commit.hour_frac?;
        Some((
            self.x.scale(datetime),
            self.y.scale(hour),
            self.r.scale(commit.total_lines as f64),
        ))
    }
}

/// Rectangle in plot coordinates, corners in any order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrushRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BrushRect {
    pub fn new(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x0: a.0.min(b.0),
            y0: a.1.min(b.1),
            x1: a.0.max(b.0),
            y1: a.1.max(b.1),
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// Result of a brush gesture.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    /// Selected commit ids in drawing order
    pub ids: Vec<String>,
    pub breakdown: LanguageBreakdown,
}

impl Selection {
    pub fn count_label(&self) -> String {
        if self.ids.is_empty() {
            NOTHING_SELECTED.to_string()
        } else {
            format!("{} commits selected", self.ids.len())
        }
    }
}

/// Tooltip content for a hovered commit.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub id: String,
    pub short_id: String,
    pub url: String,
    pub date: String,
    /// Top-left corner, offset from the pointer
    pub position: (f64, f64),
}

impl Tooltip {
    pub fn for_commit(commit: &Commit, pointer: (f64, f64)) -> Self {
        Self {
            id: commit.id.clone(),
            short_id: format!("{}...", commit.short_id()),
            url: commit.url.clone(),
            date: format_full(&commit.datetime),
            position: (pointer.0 + 10.0, pointer.1 + 10.0),
        }
    }
}

/// One animated circle.
#[derive(Clone, Debug)]
struct Circle {
    commit: Commit,
    cx: Tween,
    cy: Tween,
    r: Tween,
    exiting: bool,
    hovered: bool,
    selected: bool,
}

impl Circle {
    fn opacity(&self) -> f64 {
        if self.hovered || self.selected {
            ACTIVE_OPACITY
        } else {
            DEFAULT_OPACITY
        }
    }
}

/// Geometry of a circle at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct CircleFrame {
    pub id: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub opacity: f64,
    pub selected: bool,
    pub hovered: bool,
}

/// Renderer context of the scatter plot.
#[derive(Clone, Debug)]
pub struct ScatterPlot {
    global: GlobalDomain,
    layout: PlotLayout,
    duration: f64,
    circles: HashMap<String, Circle>,
    /// Drawing order: largest first so small circles stay on top
    order: Vec<String>,
    selection: Selection,
    tooltip: Option<Tooltip>,
}

impl ScatterPlot {
    pub fn new(global: GlobalDomain, layout: PlotLayout, duration_ms: f64) -> Self {
        Self {
            global,
            layout,
            duration: duration_ms,
            circles: HashMap::new(),
            order: Vec::new(),
            selection: Selection::default(),
            tooltip: None,
        }
    }

    pub fn global(&self) -> &GlobalDomain {
        &self.global
    }

    pub fn layout(&self) -> &PlotLayout {
        &self.layout
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Rebind the circles to `visible`, keyed by commit id.
    ///
    /// New circles grow from radius zero, kept circles move to their new
    /// target, and circles no longer visible shrink away. In-flight
    /// transitions are retargeted. Any brush selection is cleared.
    pub fn update(&mut self, visible: &[&Commit], now: f64) {
        let mut sorted: Vec<&Commit> = visible.to_vec();
        sorted.sort_by(|a, b| b.total_lines.cmp(&a.total_lines));

        let mut next_order = Vec::with_capacity(sorted.len());
        let mut seen = std::collections::HashSet::new();

        for commit in sorted {
            let Some((cx, cy, r)) = self.global.place(commit) else {
                continue;
            };
            seen.insert(commit.id.clone());
            next_order.push(commit.id.clone());

            match self.circles.get_mut(&commit.id) {
                Some(circle) => {
                    circle.commit = commit.clone();
                    circle.exiting = false;
                    circle.cx.retarget(cx, now, self.duration);
                    circle.cy.retarget(cy, now, self.duration);
                    circle.r.retarget(r, now, self.duration);
                }
                None => {
                    self.circles.insert(
                        commit.id.clone(),
                        Circle {
                            commit: commit.clone(),
                            cx: Tween::fixed(cx),
                            cy: Tween::fixed(cy),
                            r: Tween::new(0.0, r, now, self.duration),
                            exiting: false,
                            hovered: false,
                            selected: false,
                        },
                    );
                }
            }
        }

        // Exiting circles stay in the drawing order until their shrink ends.
        for id in &self.order {
            if seen.contains(id) {
                continue;
            }
            if let Some(circle) = self.circles.get_mut(id) {
                if !circle.exiting {
                    circle.exiting = true;
                    circle.r.retarget(0.0, now, self.duration);
                }
                next_order.push(id.clone());
            }
        }
        self.order = next_order;

        log::debug!(
            "Scatter plot updated: {} visible, {} circles bound",
            seen.len(),
            self.circles.len()
        );

        self.clear_brush();
    }

    /// Sample every circle at `now`, dropping exits that have finished.
    pub fn frame(&mut self, now: f64) -> Vec<CircleFrame> {
        let finished: Vec<String> = self
            .circles
            .iter()
            .filter(|(_, c)| c.exiting && c.r.is_finished(now))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &finished {
            self.circles.remove(id);
        }
        if !finished.is_empty() {
            self.order.retain(|id| !finished.contains(id));
        }

        self.order
            .iter()
            .filter_map(|id| self.circles.get(id))
            .map(|c| CircleFrame {
                id: c.commit.id.clone(),
                cx: c.cx.value_at(now),
                cy: c.cy.value_at(now),
                r: c.r.value_at(now),
                opacity: c.opacity(),
                selected: c.selected,
                hovered: c.hovered,
            })
            .collect()
    }

    /// Whether any transition is still running at `now`.
    pub fn is_animating(&self, now: f64) -> bool {
        self.circles
            .values()
            .any(|c| !c.cx.is_finished(now) || !c.cy.is_finished(now) || !c.r.is_finished(now))
    }

    /// Ids of circles bound to visible commits, excluding those leaving.
    pub fn rendered_ids(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|id| self.circles.get(*id).map_or(false, |c| !c.exiting))
            .map(String::as_str)
            .collect()
    }

    /// Topmost circle under `point` at `now`, if any.
    pub fn hit_test(&self, point: (f64, f64), now: f64) -> Option<&Commit> {
        self.order
            .iter()
            .rev()
            .filter_map(|id| self.circles.get(id))
            .filter(|c| !c.exiting)
            .find(|c| {
                let dx = c.cx.value_at(now) - point.0;
                let dy = c.cy.value_at(now) - point.1;
                let r = c.r.value_at(now);
                dx * dx + dy * dy <= r * r
            })
            .map(|c| &c.commit)
    }

    /// Pointer moved over the plot. Shows the tooltip of the circle under it.
    pub fn hover(&mut self, point: (f64, f64), now: f64) -> Option<&Tooltip> {
        let hit = self.hit_test(point, now).map(|c| c.id.clone());
        for (id, circle) in self.circles.iter_mut() {
            circle.hovered = hit.as_deref() == Some(id.as_str());
        }
        self.tooltip = hit
            .and_then(|id| self.circles.get(&id))
            .map(|c| Tooltip::for_commit(&c.commit, point));
        self.tooltip.as_ref()
    }

    /// Pointer left the plot. Selected circles keep full opacity.
    pub fn leave(&mut self) {
        for circle in self.circles.values_mut() {
            circle.hovered = false;
        }
        self.tooltip = None;
    }

    /// Select every rendered circle whose target position lies in `rect`.
    pub fn brush(&mut self, rect: BrushRect, history: &CommitHistory) -> &Selection {
        let ids: Vec<String> = self
            .order
            .iter()
            .filter_map(|id| self.circles.get(id))
            .filter(|c| !c.exiting && rect.contains(c.cx.target(), c.cy.target()))
            .map(|c| c.commit.id.clone())
            .collect();

        for circle in self.circles.values_mut() {
            circle.selected = ids.contains(&circle.commit.id);
        }

        let breakdown = if ids.is_empty() {
            LanguageBreakdown::default()
        } else {
            let selected: Vec<&Commit> = ids
                .iter()
                .filter_map(|id| self.circles.get(id).map(|c| &c.commit))
                .collect();
            language_breakdown(&history.lines_of_set(selected))
        };

        self.selection = Selection { ids, breakdown };
        &self.selection
    }

    /// Remove the brush and reset the selection display.
    pub fn clear_brush(&mut self) {
        for circle in self.circles.values_mut() {
            circle.selected = false;
        }
        self.selection = Selection::default();
    }

    /// The area a brush may cover.
    pub fn brush_extent(&self) -> BrushRect {
        let (x0, x1) = self.layout.x_range();
        let (y_bottom, y_top) = self.layout.y_range();
        BrushRect::new((x0, y_top), (x1, y_bottom))
    }

    /// Hour-axis ticks with their labels.
    pub fn hour_ticks(&self) -> Vec<(f64, String)> {
        self.global
            .y
            .ticks(10)
            .into_iter()
            .map(|h| (self.global.y.scale(h), format_hour(h)))
            .collect()
    }
}
