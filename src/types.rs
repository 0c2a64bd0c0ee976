//! # Common Types
//!
//! This module contains the records shared by every part of the crate: the
//! parsed line-of-code rows, the commit summaries derived from them, project
//! catalog entries and the persisted colour scheme.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A timestamp that may have failed to parse.
///
/// `None` plays the role of an invalid date: it is carried through aggregation
/// and simply produces no point on the scatter plot.
pub type Timestamp = Option<DateTime<FixedOffset>>;

/// One row of the line table: a single line of code attributed to one commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    /// Full commit identifier
    pub commit: String,
    /// Path of the file relative to the repository root
    pub file: String,
    /// File type or language label (usually the extension)
    #[serde(rename = "type")]
    pub file_type: String,
    /// 1-based line number, `None` when the column was not numeric
    pub line: Option<u32>,
    /// Indentation depth
    pub depth: Option<u32>,
    /// Line length in characters
    pub length: Option<u32>,
    /// Author name of the commit
    pub author: String,
    /// Commit timestamp
    pub datetime: Timestamp,
    /// Commit date at local midnight
    pub date: Timestamp,
}

impl LineRecord {
    /// Identity of the line for keyed re-rendering.
    pub fn key(&self) -> LineKey {
        LineKey {
            commit: self.commit.clone(),
            file: self.file.clone(),
            line: self.line,
        }
    }
}

/// Identity key of a line: `(commit, file, line)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineKey {
    pub commit: String,
    pub file: String,
    pub line: Option<u32>,
}

/// Summary of every line record sharing one commit id.
///
/// The lines themselves live in [`crate::analysis::CommitHistory`], so
/// serializing a `Commit` never drags its line detail along.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Commit {
    pub id: String,
    pub url: String,
    pub author: String,
    pub datetime: Timestamp,
    /// `hour + minute / 60` of `datetime`, always in `[0, 24)`
    pub hour_frac: Option<f64>,
    /// Number of line records owned by this commit
    pub total_lines: usize,
}

impl Commit {
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(7)
            .map(|(idx, _)| idx)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }
}

/// Fractional hour of day of a timestamp, in its own UTC offset.
pub fn hour_fraction(datetime: &DateTime<FixedOffset>) -> f64 {
    datetime.hour() as f64 + datetime.minute() as f64 / 60.0
}

/// One entry of the project catalog.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ProjectEntry {
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "year_label")]
    pub year: String,
    /// Any further fields the catalog carries; they take part in search.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn year_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(i64),
        Text(String),
    }

    Ok(match Year::deserialize(deserializer)? {
        Year::Number(year) => year.to_string(),
        Year::Text(year) => year,
    })
}

/// The theme preference persisted between sessions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Follow the platform
    #[default]
    Automatic,
    Light,
    Dark,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 3] = [ColorScheme::Automatic, ColorScheme::Light, ColorScheme::Dark];

    /// Stored value of the preference.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Automatic => "light dark",
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light dark" => Some(ColorScheme::Automatic),
            "light" => Some(ColorScheme::Light),
            "dark" => Some(ColorScheme::Dark),
            _ => None,
        }
    }

    /// Label shown in the theme selector.
    pub fn label(&self) -> &'static str {
        match self {
            ColorScheme::Automatic => "Automatic",
            ColorScheme::Light => "Light",
            ColorScheme::Dark => "Dark",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
