//! # gitstory
//!
//! `gitstory` turns a repository's history into a scroll-driven story. A line
//! table (one row per line of code, attributed to the commit that last touched
//! it) is aggregated into commits, and a scatter plot, a language pie and a
//! file view advance one commit at a time as the reader scrolls.
//!
//! ## Features
//!
//! - Generate the line table from a git repository with `git blame`
//! - Scatter plot of commits by time of day with brushing and tooltips
//! - Language breakdown pie with click-to-isolate legend
//! - Per-file line view that fades between steps
//! - Project catalog with search and a year pie
//! - SVG export of any narrative step
//!
//! ## Example
//!
//! ```no_run
//! use gitstory::analysis::{aggregate_commits, parse_line_records};
//! use gitstory::plotting::{export_snapshot, ChartTheme};
//! use gitstory::settings::Settings;
//! use std::path::Path;
//!
//! let csv = std::fs::read("loc.csv")?;
//! let records = parse_line_records(csv.as_slice())?;
//! let history = aggregate_commits(records, "https://github.com/me/site");
//!
//! let snapshot = export_snapshot(
//!     &history,
//!     3,
//!     &Settings::default(),
//!     &ChartTheme::light(),
//!     Path::new("charts"),
//! )?;
//! println!("{}", snapshot.scatter.display());
//! # Ok::<(), gitstory::error::Error>(())
//! ```

pub mod analysis;
pub mod app;
pub mod cli;
pub mod error;
pub mod narrative;
pub mod plotting;
pub mod settings;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use analysis::CommitHistory;
pub use app::App as GitStoryApp;
pub use error::{Error, Result};
pub use settings::Settings;
pub use types::{Commit, LineRecord, ProjectEntry};
