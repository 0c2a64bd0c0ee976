use std::collections::HashMap;

use crate::settings::commit_url;
use crate::types::{hour_fraction, Commit, LineRecord};
use crate::utils::group_by;

/// The aggregated commit history.
///
/// Commits are sorted ascending by timestamp and never change after
/// aggregation. The line records of each commit are kept in a side map rather
/// than on the commit itself, alongside the flat record sequence used for
/// dataset-wide statistics.
#[derive(Clone, Debug, Default)]
pub struct CommitHistory {
    records: Vec<LineRecord>,
    commits: Vec<Commit>,
    lines: HashMap<String, Vec<LineRecord>>,
}

/// Group line records by commit and sort the commits chronologically.
pub fn aggregate_commits(records: Vec<LineRecord>, repo_url: &str) -> CommitHistory {
    let mut commits = Vec::new();
    let mut lines: HashMap<String, Vec<LineRecord>> = HashMap::new();

    for (id, group) in group_by(&records, |r| r.commit.clone()) {
        let first = group[0];
        let datetime = first.datetime;

        commits.push(Commit {
            url: commit_url(repo_url, &id),
            author: first.author.clone(),
            datetime,
            hour_frac: datetime.as_ref().map(hour_fraction),
            total_lines: group.len(),
            id: id.clone(),
        });
        lines.insert(id, group.into_iter().cloned().collect());
    }

    // Stable: commits sharing a timestamp keep first-appearance order, and
    // commits without a valid timestamp go last.
    commits.sort_by_key(|c| (c.datetime.is_none(), c.datetime));

    log::debug!(
        "Aggregated {} line records into {} commits",
        records.len(),
        commits.len()
    );

    CommitHistory {
        records,
        commits,
        lines,
    }
}

impl CommitHistory {
    /// Every line record, in input order.
    pub fn records(&self) -> &[LineRecord] {
        &self.records
    }

    /// Commits in ascending timestamp order.
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// The line records owned by one commit.
    pub fn lines_of(&self, id: &str) -> &[LineRecord] {
        self.lines.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flattened lines of a set of commits, in commit order.
    pub fn lines_of_set<'a, I>(&'a self, commits: I) -> Vec<&'a LineRecord>
    where
        I: IntoIterator<Item = &'a Commit>,
    {
        commits
            .into_iter()
            .flat_map(move |c| self.lines_of(&c.id).iter())
            .collect()
    }

    /// Every commit at or before `cursor`.
    ///
    /// A cursor without a valid timestamp yields the empty set, and commits
    /// without a valid timestamp are never visible.
    pub fn visible_until(&self, cursor: &Commit) -> Vec<&Commit> {
        let Some(limit) = cursor.datetime else {
            return Vec::new();
        };
        self.commits
            .iter()
            .filter(|c| matches!(c.datetime, Some(dt) if dt <= limit))
            .collect()
    }

    /// The visible set at narrative step `step`.
    pub fn visible_at(&self, step: usize) -> Vec<&Commit> {
        self.commits
            .get(step)
            .map(|cursor| self.visible_until(cursor))
            .unwrap_or_default()
    }

    /// Distinct file types across the whole dataset, sorted.
    pub fn all_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.records.iter().map(|r| r.file_type.clone()).collect();
        types.sort();
        types.dedup();
        types
    }
}
