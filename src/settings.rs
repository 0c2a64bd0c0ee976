//! # Settings
//!
//! Runtime configuration shared by the viewer, the exporter and the renderers.
//! Every value has a default; the command line overrides a subset of them.

use std::path::PathBuf;

use crate::plotting::styles::{PieStyle, PlotLayout};

/// Configuration for one session.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Line table produced by `gitstory generate`
    pub loc_path: PathBuf,
    /// Project catalog, optional
    pub projects_path: Option<PathBuf>,
    /// Base URL commit permalinks are built from
    pub repo_url: String,
    /// Fraction of the viewport height at which a narrative step becomes active
    pub trigger_offset: f32,
    /// Duration of scatter-plot transitions in milliseconds
    pub scatter_transition_ms: f64,
    /// Duration of file-view fades in milliseconds
    pub file_transition_ms: f64,
    pub layout: PlotLayout,
    pub pie: PieStyle,
}

pub fn commit_url(repo_url: &str, id: &str) -> String {
    format!("{}/commit/{}", repo_url.trim_end_matches('/'), id)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            loc_path: PathBuf::from("loc.csv"),
            projects_path: None,
            repo_url: "https://github.com/example/portfolio".to_string(),
            trigger_offset: 0.5,
            scatter_transition_ms: 500.0,
            file_transition_ms: 300.0,
            layout: PlotLayout::default(),
            pie: PieStyle::default(),
        }
    }
}
