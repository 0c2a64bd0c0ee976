//! Pure builders for the views derived from a visible set of commits.
//!
//! Each builder takes the flattened line records (and, where needed, the
//! commits) of a visible set and returns a fresh structure. Nothing here is
//! cached between calls.

use std::fmt;

use crate::types::{Commit, LineRecord};
use crate::utils::{count_by, format_percent, group_by, max_present};

/// Dataset statistics shown in the summary panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SummaryStats {
    pub commits: usize,
    pub files: usize,
    pub total_lines: usize,
    pub max_depth: Option<u64>,
    pub longest_line: Option<u64>,
    pub max_lines_in_commit: Option<u64>,
}

impl SummaryStats {
    /// `(label, value)` rows in display order. Missing maxima read `N/A`.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Commits Processed", self.commits.to_string()),
            ("Files Touched", self.files.to_string()),
            ("Total LOC", self.total_lines.to_string()),
            ("Max Indent Depth", or_na(self.max_depth)),
            ("Longest Line Length", or_na(self.longest_line)),
            ("Max Lines in a Commit", or_na(self.max_lines_in_commit)),
        ]
    }
}

fn or_na(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

pub fn summary_stats(lines: &[&LineRecord], commits: &[&Commit]) -> SummaryStats {
    SummaryStats {
        commits: commits.len(),
        files: distinct_files(lines),
        total_lines: lines.len(),
        max_depth: max_present(lines.iter().map(|l| l.depth.map(u64::from))),
        longest_line: max_present(lines.iter().map(|l| l.length.map(u64::from))),
        max_lines_in_commit: max_present(commits.iter().map(|c| Some(c.total_lines as u64))),
    }
}

/// Number of distinct files among the lines.
pub fn distinct_files(lines: &[&LineRecord]) -> usize {
    group_by(lines.iter().copied(), |l| l.file.clone()).len()
}

/// Distinct file types among the lines, in order of first appearance.
pub fn distinct_types(lines: &[&LineRecord]) -> Vec<String> {
    count_by(lines.iter().copied(), |l| l.file_type.clone())
        .into_iter()
        .map(|(t, _)| t)
        .collect()
}

/// One category of a breakdown.
#[derive(Clone, Debug, PartialEq)]
pub struct BreakdownEntry {
    pub label: String,
    pub count: usize,
    /// Fraction of the total in `[0, 1]`
    pub fraction: f64,
}

impl BreakdownEntry {
    /// `40%`, `33.3%`
    pub fn percentage(&self) -> String {
        format_percent(self.fraction, 1, true)
    }
}

impl fmt::Display for BreakdownEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lines ({})", self.count, self.percentage())
    }
}

/// Lines grouped by file type, in order of first appearance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LanguageBreakdown {
    pub entries: Vec<BreakdownEntry>,
    pub total: usize,
}

impl LanguageBreakdown {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&BreakdownEntry> {
        self.entries.iter().find(|e| e.label == label)
    }
}

pub fn language_breakdown(lines: &[&LineRecord]) -> LanguageBreakdown {
    let total = lines.len();
    let entries = count_by(lines.iter().copied(), |l| l.file_type.clone())
        .into_iter()
        .map(|(label, count)| BreakdownEntry {
            label,
            count,
            fraction: count as f64 / total as f64,
        })
        .collect();

    LanguageBreakdown { entries, total }
}

/// The lines of one file within a visible set.
#[derive(Clone, Debug, PartialEq)]
pub struct FileGroup {
    pub name: String,
    pub lines: Vec<LineRecord>,
}

/// Group lines by file, largest file first. Ties keep first appearance.
pub fn file_groups(lines: &[&LineRecord]) -> Vec<FileGroup> {
    let mut groups: Vec<FileGroup> = group_by(lines.iter().copied(), |l| l.file.clone())
        .into_iter()
        .map(|(name, group)| FileGroup {
            name,
            lines: group.into_iter().cloned().collect(),
        })
        .collect();
    groups.sort_by(|a, b| b.lines.len().cmp(&a.lines.len()));
    groups
}
