use std::fmt;

use crate::analysis::views::{distinct_files, distinct_types};
use crate::types::{Commit, LineRecord};
use crate::utils::format::{format_long_date, format_medium};

/// A link to a commit's permalink, shown in place of its short id.
#[derive(Clone, Debug, PartialEq)]
pub struct CommitLink {
    pub label: String,
    pub url: String,
}

/// One line of a step: text, optionally followed by a commit link.
#[derive(Clone, Debug, PartialEq)]
pub struct StepLine {
    pub text: String,
    pub link: Option<CommitLink>,
}

impl StepLine {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
        }
    }
}

/// The content of one narrative step.
#[derive(Clone, Debug, PartialEq)]
pub struct StoryStep {
    pub lines: Vec<StepLine>,
}

impl fmt::Display for StoryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line.text)?;
            if let Some(link) = &line.link {
                write!(f, "{}", link.label)?;
            }
        }
        Ok(())
    }
}

/// Step of the scatter-plot story. The commit id links to its permalink.
pub fn scatter_step_text(index: usize, total: usize, commit: &Commit, lines: &[LineRecord]) -> StoryStep {
    let lines: Vec<&LineRecord> = lines.iter().collect();
    StoryStep {
        lines: vec![
            StepLine::plain(format!("Commit {}/{}", index + 1, total)),
            StepLine::plain(format!("Time: {}", format_medium(&commit.datetime))),
            StepLine {
                text: "Commit ID: ".to_string(),
                link: Some(CommitLink {
                    label: commit.short_id().to_string(),
                    url: commit.url.clone(),
                }),
            },
            StepLine::plain(format!("Lines changed: {}", commit.total_lines)),
            StepLine::plain(format!("Files affected: {}", distinct_files(&lines))),
        ],
    }
}

/// Step of the file-view story.
pub fn files_step_text(index: usize, commit: &Commit, lines: &[LineRecord]) -> StoryStep {
    let lines: Vec<&LineRecord> = lines.iter().collect();
    StoryStep {
        lines: vec![
            StepLine::plain(format!("Timeline: Commit {}", index + 1)),
            StepLine::plain(format!(
                "By {}, the following files had been modified up to this point in the project's history.",
                format_long_date(&commit.datetime)
            )),
            StepLine::plain(format!(
                "This specific commit ({}) involved changes to {} lines across {} files.",
                commit.short_id(),
                commit.total_lines,
                distinct_files(&lines)
            )),
            StepLine::plain(format!(
                "Key types of files in this commit: {}.",
                distinct_types(&lines).join(", ")
            )),
        ],
    }
}
