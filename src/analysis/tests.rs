#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::analysis::loader::{coerce_int, parse_midnight, parse_timestamp};
    use crate::analysis::projects::{parse_projects, search_projects, year_counts};
    use crate::types::{Commit, LineRecord};
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const REPO: &str = "https://github.com/me/site";

    const LOC_CSV: &str = "\
commit,file,type,line,depth,length,author,datetime,date,timezone
a1,src/app.js,js,1,0,12,Ada,2024-03-02T14:45:00-05:00,2024-03-02,-05:00
a1,src/app.js,js,2,1,20,Ada,2024-03-02T14:45:00-05:00,2024-03-02,-05:00
a1,src/util.js,js,1,2,31,Ada,2024-03-02T14:45:00-05:00,2024-03-02,-05:00
b2,main.py,py,1,0,8,Grace,2024-03-01T09:30:00-05:00,2024-03-01,-05:00
b2,main.py,py,2,1,16,Grace,2024-03-01T09:30:00-05:00,2024-03-01,-05:00
";

    fn setup_history() -> CommitHistory {
        let records = parse_line_records(LOC_CSV.as_bytes()).unwrap();
        aggregate_commits(records, REPO)
    }

    fn ids(commits: &[&Commit]) -> Vec<String> {
        commits.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn test_parse_rows() {
        let records = parse_line_records(LOC_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 5);

        let first = &records[0];
        assert_eq!(first.commit, "a1");
        assert_eq!(first.file_type, "js");
        assert_eq!(first.line, Some(1));
        assert_eq!(first.length, Some(12));
        assert_eq!(first.datetime, parse_timestamp("2024-03-02T14:45:00-05:00"));
        assert_eq!(first.date, parse_timestamp("2024-03-02T00:00:00-05:00"));
    }

    #[test]
    fn test_malformed_rows_are_kept() {
        let csv = "\
commit,file,type,line,depth,length,author,datetime,date,timezone
c1,a.rs,rs,abc,,7,Ada,not a date,,
c1,a.rs,rs,2,1,9,Ada,,2024-01-05,Z
";
        let records = parse_line_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].line, None);
        assert_eq!(records[0].depth, Some(0));
        assert_eq!(records[0].datetime, None);

        // An empty datetime falls back to midnight of the date column.
        assert_eq!(records[1].datetime, parse_timestamp("2024-01-05T00:00:00+00:00"));
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int("42"), Some(42));
        assert_eq!(coerce_int(" 7 "), Some(7));
        assert_eq!(coerce_int(""), Some(0));
        assert_eq!(coerce_int("3.0"), Some(3));
        assert_eq!(coerce_int("3.5"), None);
        assert_eq!(coerce_int("-1"), None);
        assert_eq!(coerce_int("NaN"), None);
    }

    #[test]
    fn test_parse_midnight() {
        assert_eq!(
            parse_midnight("2024-03-01", "+02:00"),
            parse_timestamp("2024-03-01T00:00:00+02:00")
        );
        assert_eq!(parse_midnight("", "+02:00"), None);
        assert_eq!(parse_midnight("yesterday", "Z"), None);
    }

    #[test]
    fn test_aggregate_commits() {
        let history = setup_history();
        let commits = history.commits();

        assert_eq!(
            commits.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            vec!["b2", "a1"]
        );
        assert_eq!(commits[0].total_lines, 2);
        assert_eq!(commits[1].total_lines, 3);
        assert_eq!(commits[0].author, "Grace");
        assert_eq!(commits[0].url, "https://github.com/me/site/commit/b2");
        assert_eq!(commits[0].hour_frac, Some(9.5));
        assert_eq!(commits[1].hour_frac, Some(14.75));

        let total: usize = commits.iter().map(|c| c.total_lines).sum();
        assert_eq!(total, history.records().len());
        assert!(commits.windows(2).all(|w| w[0].datetime <= w[1].datetime));
        assert_eq!(history.lines_of("a1").len(), 3);
        assert!(history.lines_of("zz").is_empty());
    }

    #[test]
    fn test_aggregation_ignores_row_order() {
        let mut records = parse_line_records(LOC_CSV.as_bytes()).unwrap();
        let mut late = records[0].clone();
        late.commit = "c3".to_string();
        late.datetime = parse_timestamp("2024-03-02T23:59:00-05:00");
        records.push(late);
        let mut early = records[3].clone();
        early.commit = "z0".to_string();
        early.datetime = parse_timestamp("2024-02-28T06:00:00+01:00");
        records.push(early);

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            records.shuffle(&mut rng);
            let history = aggregate_commits(records.clone(), REPO);
            let commits = history.commits();

            assert_eq!(
                commits.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
                vec!["z0", "b2", "a1", "c3"]
            );
            assert!(commits.windows(2).all(|w| w[0].datetime <= w[1].datetime));
            let total: usize = commits.iter().map(|c| c.total_lines).sum();
            assert_eq!(total, records.len());
        }
    }

    #[test]
    fn test_invalid_timestamp_sorts_last_and_stays_hidden() {
        let mut records = parse_line_records(LOC_CSV.as_bytes()).unwrap();
        let mut broken = records[0].clone();
        broken.commit = "x9".to_string();
        broken.datetime = None;
        records.insert(0, broken);

        let history = aggregate_commits(records, REPO);
        let last = history.commits().last().unwrap();
        assert_eq!(last.id, "x9");
        assert_eq!(last.hour_frac, None);

        assert!(history.visible_until(last).is_empty());
        assert_eq!(ids(&history.visible_at(1)), vec!["b2", "a1"]);
        assert!(history.visible_at(99).is_empty());
    }

    #[test]
    fn test_breakdown_per_step() {
        let history = setup_history();

        let visible = history.visible_at(0);
        assert_eq!(ids(&visible), vec!["b2"]);
        let breakdown = language_breakdown(&history.lines_of_set(visible));
        assert_eq!(breakdown.total, 2);
        assert_eq!(breakdown.entries.len(), 1);
        assert_eq!(breakdown.get("py").unwrap().percentage(), "100%");

        let visible = history.visible_at(1);
        let breakdown = language_breakdown(&history.lines_of_set(visible));
        assert_eq!(breakdown.get("py").unwrap().percentage(), "40%");
        assert_eq!(breakdown.get("js").unwrap().percentage(), "60%");
        assert_eq!(breakdown.get("js").unwrap().to_string(), "3 lines (60%)");

        let fractions: f64 = breakdown.entries.iter().map(|e| e.fraction).sum();
        assert!((fractions - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_breakdown() {
        let breakdown = language_breakdown(&[]);
        assert!(breakdown.is_empty());
        assert_eq!(breakdown.total, 0);
    }

    #[test]
    fn test_summary_stats() {
        let history = setup_history();
        let commits: Vec<&Commit> = history.commits().iter().collect();
        let lines: Vec<&LineRecord> = history.records().iter().collect();

        let stats = summary_stats(&lines, &commits);
        assert_eq!(
            stats,
            SummaryStats {
                commits: 2,
                files: 3,
                total_lines: 5,
                max_depth: Some(2),
                longest_line: Some(31),
                max_lines_in_commit: Some(3),
            }
        );
        assert_eq!(stats.rows()[0], ("Commits Processed", "2".to_string()));
    }

    #[test]
    fn test_summary_stats_empty() {
        let stats = summary_stats(&[], &[]);
        let rows = stats.rows();
        assert_eq!(rows[0].1, "0");
        assert_eq!(rows[3], ("Max Indent Depth", "N/A".to_string()));
        assert_eq!(rows[4], ("Longest Line Length", "N/A".to_string()));
        assert_eq!(rows[5], ("Max Lines in a Commit", "N/A".to_string()));
    }

    #[test]
    fn test_file_groups() {
        let history = setup_history();
        let lines = history.lines_of_set(history.commits());

        let groups = file_groups(&lines);
        let summary: Vec<(&str, usize)> = groups.iter().map(|g| (g.name.as_str(), g.lines.len())).collect();
        assert_eq!(summary, vec![("main.py", 2), ("src/app.js", 2), ("src/util.js", 1)]);
    }

    #[test]
    fn test_all_types() {
        let history = setup_history();
        assert_eq!(history.all_types(), vec!["js".to_string(), "py".to_string()]);
    }

    #[test]
    fn test_write_then_parse() {
        let history = setup_history();
        let mut buffer = Vec::new();
        write_line_records(history.records(), &mut buffer).unwrap();

        let reparsed = parse_line_records(buffer.as_slice()).unwrap();
        assert_eq!(reparsed, history.records().to_vec());
    }

    #[tokio::test]
    async fn test_load_line_records_async() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(LOC_CSV.as_bytes()).unwrap();

        let records = load_line_records_async(file.path()).await.unwrap();
        assert_eq!(records.len(), 5);

        let missing = load_line_records_async(file.path().with_extension("missing")).await;
        assert!(missing.is_err());
    }

    const PROJECTS_JSON: &str = r#"[
        {"title": "Lab Notebook", "image": "lab.png", "description": "Notes on chemistry", "year": 2023},
        {"title": "Pixel Garden", "image": "", "description": "A generative art toy", "year": "2024"},
        {"title": "Tide Tables", "description": "Charts of the harbour", "year": 2024, "tags": ["ocean"]}
    ]"#;

    #[test]
    fn test_parse_projects() {
        let projects = parse_projects(PROJECTS_JSON.as_bytes()).unwrap();
        assert_eq!(projects.len(), 3);
        assert_eq!(projects[0].year, "2023");
        assert_eq!(projects[1].year, "2024");
        assert_eq!(projects[2].image, "");
        assert!(projects[2].extra.contains_key("tags"));
    }

    #[test]
    fn test_search_projects() {
        let projects = parse_projects(PROJECTS_JSON.as_bytes()).unwrap();

        let hits = search_projects(&projects, "CHART");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Tide Tables");

        assert_eq!(search_projects(&projects, "ocean").len(), 1);
        assert_eq!(search_projects(&projects, "").len(), 3);
        assert_eq!(
            year_counts(&search_projects(&projects, "")),
            vec![("2023".to_string(), 1), ("2024".to_string(), 2)]
        );
    }

    #[test]
    fn test_project_browser_year_toggle() {
        let projects = parse_projects(PROJECTS_JSON.as_bytes()).unwrap();
        let mut browser = ProjectBrowser::new(projects);
        assert_eq!(browser.all_years(), vec!["2023".to_string(), "2024".to_string()]);

        browser.toggle_year("2024");
        assert_eq!(browser.selected_year(), Some("2024"));
        assert_eq!(browser.listed().len(), 2);
        // The year pie keeps showing every search result.
        assert_eq!(browser.search_results().len(), 3);

        browser.toggle_year("2024");
        assert_eq!(browser.selected_year(), None);
        assert_eq!(browser.listed().len(), 3);

        browser.set_query("zebra");
        assert!(browser.no_results());
    }
}
