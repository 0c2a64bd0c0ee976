use chrono::{DateTime, FixedOffset, Utc};
use git2::{ObjectType, Oid, Repository, TreeWalkMode, TreeWalkResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::task::spawn_blocking;

use crate::error::Result;
use crate::types::LineRecord;

/// Author and timestamp of a commit, looked up once per commit.
#[derive(Clone)]
struct CommitMeta {
    author: String,
    datetime: Option<DateTime<FixedOffset>>,
}

/// Build the line table for `HEAD` of the repository at `path`.
pub async fn generate_line_table_async(path: impl AsRef<Path>) -> Result<Vec<LineRecord>> {
    let path: PathBuf = path.as_ref().to_path_buf();
    spawn_blocking(move || {
        let repo = Repository::open(&path)?;
        collect_line_records(&repo)
    })
    .await?
}

/// Blame every text file in the `HEAD` tree and emit one record per line.
pub fn collect_line_records(repo: &Repository) -> Result<Vec<LineRecord>> {
    let start_time = Instant::now();
    let head = repo.head()?.peel_to_commit()?;
    let tree = head.tree()?;

    let mut paths = Vec::new();
    tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        if entry.kind() == Some(ObjectType::Blob) {
            if let Some(name) = entry.name() {
                paths.push(format!("{}{}", root, name));
            }
        }
        TreeWalkResult::Ok
    })?;

    let mut commit_meta: HashMap<Oid, CommitMeta> = HashMap::new();
    let mut records = Vec::new();

    for path in &paths {
        let entry = tree.get_path(Path::new(path))?;
        let blob = repo.find_blob(entry.id())?;
        if blob.is_binary() {
            continue;
        }

        let blame = match repo.blame_file(Path::new(path), None) {
            Ok(blame) => blame,
            Err(e) => {
                log::warn!("Skipping {}: {}", path, e);
                continue;
            }
        };

        let content = String::from_utf8_lossy(blob.content());
        let lines: Vec<&str> = content.lines().collect();
        let unit = indent_unit(&lines);
        let file_type = file_type_of(path);

        for (idx, text) in lines.iter().enumerate() {
            let line_no = idx + 1;
            let Some(hunk) = blame.get_line(line_no) else {
                continue;
            };
            let oid = hunk.final_commit_id();
            let meta = match commit_meta.get(&oid) {
                Some(meta) => meta.clone(),
                None => {
                    let meta = lookup_commit(repo, oid);
                    commit_meta.insert(oid, meta.clone());
                    meta
                }
            };

            records.push(LineRecord {
                commit: oid.to_string(),
                file: path.clone(),
                file_type: file_type.clone(),
                line: Some(line_no as u32),
                depth: Some(indent_columns(text) / unit),
                length: Some(text.chars().count() as u32),
                author: meta.author,
                datetime: meta.datetime,
                date: meta.datetime.and_then(midnight_of),
            });
        }
    }

    log::info!(
        "Blamed {} files into {} line records from {} commits in {:.2}s",
        paths.len(),
        records.len(),
        commit_meta.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(records)
}

fn lookup_commit(repo: &Repository, oid: Oid) -> CommitMeta {
    match repo.find_commit(oid) {
        Ok(commit) => {
            let time = commit.time();
            let datetime = FixedOffset::east_opt(time.offset_minutes() * 60).and_then(|offset| {
                DateTime::<Utc>::from_timestamp(time.seconds(), 0).map(|dt| dt.with_timezone(&offset))
            });
            CommitMeta {
                author: commit.author().name().unwrap_or("Unknown").to_string(),
                datetime,
            }
        }
        Err(e) => {
            log::warn!("Commit {} not found: {}", oid, e);
            CommitMeta {
                author: "Unknown".to_string(),
                datetime: None,
            }
        }
    }
}

fn midnight_of(datetime: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    datetime
        .date_naive()
        .and_hms_opt(0, 0, 0)?
        .and_local_timezone(*datetime.offset())
        .single()
}

/// File type label: the extension, or the file name when there is none.
pub fn file_type_of(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_lowercase(),
        _ => name.to_string(),
    }
}

/// Leading whitespace width with tabs counted as four columns.
fn indent_columns(line: &str) -> u32 {
    line.chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// Width of one indentation level: the smallest non-zero indent in the file.
fn indent_unit(lines: &[&str]) -> u32 {
    lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| indent_columns(l))
        .filter(|cols| *cols > 0)
        .min()
        .unwrap_or(1)
}
