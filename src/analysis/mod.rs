mod commits;
pub mod git;
pub mod loader;
pub mod projects;
pub mod views;

#[cfg(test)]
mod tests;

pub use commits::{aggregate_commits, CommitHistory};
pub use git::generate_line_table_async;
pub use loader::{load_line_records_async, parse_line_records, write_line_records};
pub use projects::{load_projects_async, ProjectBrowser};
pub use views::{
    file_groups, language_breakdown, summary_stats, BreakdownEntry, FileGroup, LanguageBreakdown,
    SummaryStats,
};
