use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::ProjectEntry;
use crate::utils::count_by;

/// Load the project catalog asynchronously.
pub async fn load_projects_async(path: impl AsRef<Path>) -> Result<Vec<ProjectEntry>> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let bytes = tokio::fs::read(&path).await?;
    let projects = parse_projects(&bytes)?;
    log::info!("Loaded {} projects from {}", projects.len(), path.display());
    Ok(projects)
}

pub fn parse_projects(bytes: &[u8]) -> Result<Vec<ProjectEntry>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// All field values of a project joined for free-text search.
fn search_text(project: &ProjectEntry) -> String {
    let mut parts = vec![
        project.title.clone(),
        project.image.clone(),
        project.description.clone(),
        project.year.clone(),
    ];
    parts.extend(project.extra.values().map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }));
    parts.join(" ").to_lowercase()
}

/// Projects whose fields contain `query`, case-insensitively.
pub fn search_projects<'a>(projects: &'a [ProjectEntry], query: &str) -> Vec<&'a ProjectEntry> {
    let query = query.to_lowercase();
    projects
        .iter()
        .filter(|p| search_text(p).contains(&query))
        .collect()
}

/// `(year, count)` pairs in order of first appearance.
pub fn year_counts(projects: &[&ProjectEntry]) -> Vec<(String, usize)> {
    count_by(projects.iter().copied(), |p| p.year.clone())
}

/// Search and year isolation over a static catalog.
#[derive(Clone, Debug, Default)]
pub struct ProjectBrowser {
    projects: Vec<ProjectEntry>,
    query: String,
    selected_year: Option<String>,
}

impl ProjectBrowser {
    pub fn new(projects: Vec<ProjectEntry>) -> Self {
        Self {
            projects,
            query: String::new(),
            selected_year: None,
        }
    }

    pub fn all(&self) -> &[ProjectEntry] {
        &self.projects
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn selected_year(&self) -> Option<&str> {
        self.selected_year.as_deref()
    }

    /// Isolate a year; choosing the isolated year again clears it.
    pub fn toggle_year(&mut self, year: &str) {
        if self.selected_year.as_deref() == Some(year) {
            self.selected_year = None;
        } else {
            self.selected_year = Some(year.to_string());
        }
    }

    /// Projects matching the search; these feed the year pie.
    pub fn search_results(&self) -> Vec<&ProjectEntry> {
        search_projects(&self.projects, &self.query)
    }

    /// Projects shown in the list: search results, narrowed to the isolated year.
    pub fn listed(&self) -> Vec<&ProjectEntry> {
        let results = self.search_results();
        match &self.selected_year {
            Some(year) => results.into_iter().filter(|p| &p.year == year).collect(),
            None => results,
        }
    }

    pub fn no_results(&self) -> bool {
        self.listed().is_empty()
    }

    /// Every year in the catalog, sorted; the fixed colour domain of the year pie.
    pub fn all_years(&self) -> Vec<String> {
        let mut years: Vec<String> = self.projects.iter().map(|p| p.year.clone()).collect();
        years.sort();
        years.dedup();
        years
    }
}
