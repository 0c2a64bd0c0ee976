//! The per-file view: one entry per file, one dot per line, coloured by type.

use plotters::style::RGBColor;
use std::collections::{HashMap, HashSet};

use crate::analysis::{file_groups, language_breakdown, CommitHistory, LanguageBreakdown};
use crate::types::{Commit, LineKey, LineRecord};

use super::scale::CategoryColors;
use super::tween::Tween;

#[derive(Clone, Debug)]
struct Dot {
    record: LineRecord,
    opacity: Tween,
    exiting: bool,
}

#[derive(Clone, Debug)]
struct Entry {
    name: String,
    line_count: usize,
    dots: HashMap<LineKey, Dot>,
    order: Vec<LineKey>,
}

/// A line dot at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct DotFrame {
    pub key: LineKey,
    pub color: RGBColor,
    pub opacity: f64,
}

/// A file entry at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct FileFrame {
    pub name: String,
    /// `12 lines`
    pub caption: String,
    pub dots: Vec<DotFrame>,
}

/// Renderer context of the file view.
#[derive(Clone, Debug)]
pub struct FileView {
    colors: CategoryColors,
    duration: f64,
    entries: Vec<Entry>,
    info: String,
    breakdown: LanguageBreakdown,
}

impl FileView {
    pub fn new(colors: CategoryColors, duration_ms: f64) -> Self {
        Self {
            colors,
            duration: duration_ms,
            entries: Vec::new(),
            info: String::new(),
            breakdown: LanguageBreakdown::default(),
        }
    }

    /// `3 files shown, 42 total lines affected.` or an empty-state message.
    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn breakdown(&self) -> &LanguageBreakdown {
        &self.breakdown
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Rebind the view to the lines of `visible`.
    ///
    /// Entries are keyed by file name and dots by `(commit, file, line)`:
    /// new dots fade in, dots no longer present fade out and are dropped on a
    /// later [`FileView::frame`].
    pub fn update(&mut self, visible: &[&Commit], history: &CommitHistory, now: f64) {
        if visible.is_empty() {
            self.entries.clear();
            self.info = "No commits to display files for.".to_string();
            self.breakdown = LanguageBreakdown::default();
            return;
        }

        let lines = history.lines_of_set(visible.iter().copied());
        if lines.is_empty() {
            self.entries.clear();
            self.info = "No line data in selected commits.".to_string();
            self.breakdown = LanguageBreakdown::default();
            return;
        }

        let groups = file_groups(&lines);
        self.info = format!(
            "{} files shown, {} total lines affected.",
            groups.len(),
            lines.len()
        );
        self.breakdown = language_breakdown(&lines);

        let mut previous: HashMap<String, Entry> = self
            .entries
            .drain(..)
            .map(|e| (e.name.clone(), e))
            .collect();

        // Files that disappear entirely are removed at once.
        self.entries = groups
            .into_iter()
            .map(|group| {
                let mut entry = previous.remove(&group.name).unwrap_or_else(|| Entry {
                    name: group.name.clone(),
                    line_count: 0,
                    dots: HashMap::new(),
                    order: Vec::new(),
                });
                entry.line_count = group.lines.len();
                self.rebind_dots(&mut entry, group.lines, now);
                entry
            })
            .collect();
    }

    fn rebind_dots(&self, entry: &mut Entry, lines: Vec<LineRecord>, now: f64) {
        let mut order = Vec::with_capacity(lines.len());
        let mut seen = HashSet::new();

        for record in lines {
            let key = record.key();
            if !seen.insert(key.clone()) {
                continue;
            }
            match entry.dots.get_mut(&key) {
                Some(dot) => {
                    if dot.exiting {
                        dot.exiting = false;
                        dot.opacity.retarget(1.0, now, self.duration);
                    }
                    dot.record = record;
                }
                None => {
                    entry.dots.insert(
                        key.clone(),
                        Dot {
                            record,
                            opacity: Tween::new(0.0, 1.0, now, self.duration),
                            exiting: false,
                        },
                    );
                }
            }
            order.push(key);
        }

        for key in &entry.order {
            if seen.contains(key) {
                continue;
            }
            if let Some(dot) = entry.dots.get_mut(key) {
                if !dot.exiting {
                    dot.exiting = true;
                    dot.opacity.retarget(0.0, now, self.duration);
                }
                order.push(key.clone());
            }
        }
        entry.order = order;
    }

    /// Sample the view at `now`, dropping dots whose fade-out has ended.
    pub fn frame(&mut self, now: f64) -> Vec<FileFrame> {
        for entry in &mut self.entries {
            let finished: Vec<LineKey> = entry
                .dots
                .iter()
                .filter(|(_, d)| d.exiting && d.opacity.is_finished(now))
                .map(|(k, _)| k.clone())
                .collect();
            for key in &finished {
                entry.dots.remove(key);
            }
            if !finished.is_empty() {
                entry.order.retain(|k| entry.dots.contains_key(k));
            }
        }

        self.entries
            .iter()
            .map(|entry| FileFrame {
                name: entry.name.clone(),
                caption: format!("{} lines", entry.line_count),
                dots: entry
                    .order
                    .iter()
                    .filter_map(|k| entry.dots.get(k))
                    .map(|d| DotFrame {
                        key: d.record.key(),
                        color: self.colors.color(&d.record.file_type),
                        opacity: d.opacity.value_at(now),
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn is_animating(&self, now: f64) -> bool {
        self.entries
            .iter()
            .flat_map(|e| e.dots.values())
            .any(|d| !d.opacity.is_finished(now))
    }
}
