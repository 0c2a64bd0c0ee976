use gitstory::analysis::{aggregate_commits, load_line_records_async, load_projects_async, CommitHistory};
use gitstory::app::{App, PreferenceStore};
use gitstory::narrative::{StepGeometry, Track, Viewport};
use gitstory::plotting::{export_snapshot, ChartTheme};
use gitstory::settings::Settings;
use gitstory::types::ColorScheme;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const REPO: &str = "https://github.com/me/site";

const LOC_CSV: &str = "\
commit,file,type,line,depth,length,author,datetime,date,timezone
a1,src/app.js,js,1,0,12,Ada,2024-03-02T14:45:00-05:00,2024-03-02,-05:00
a1,src/app.js,js,2,1,20,Ada,2024-03-02T14:45:00-05:00,2024-03-02,-05:00
a1,src/util.js,js,1,2,31,Ada,2024-03-02T14:45:00-05:00,2024-03-02,-05:00
b2,main.py,py,1,0,8,Grace,2024-03-01T09:30:00-05:00,2024-03-01,-05:00
b2,main.py,py,2,1,16,Grace,2024-03-01T09:30:00-05:00,2024-03-01,-05:00
c3,style.css,css,1,0,5,Ada,2024-03-04T22:10:00-05:00,2024-03-04,-05:00
";

const PROJECTS_JSON: &str = r#"[
    {"title": "Lab Notebook", "description": "Notes on chemistry", "year": 2023},
    {"title": "Pixel Garden", "description": "A generative art toy", "year": 2024}
]"#;

fn setup_sources() -> (TempDir, Settings) {
    let temp_dir = TempDir::new().unwrap();
    let loc_path = temp_dir.path().join("loc.csv");
    let projects_path = temp_dir.path().join("projects.json");
    fs::write(&loc_path, LOC_CSV).unwrap();
    fs::write(&projects_path, PROJECTS_JSON).unwrap();

    let settings = Settings {
        loc_path,
        projects_path: Some(projects_path),
        repo_url: REPO.to_string(),
        ..Settings::default()
    };
    (temp_dir, settings)
}

async fn load_history(settings: &Settings) -> CommitHistory {
    let records = load_line_records_async(&settings.loc_path).await.unwrap();
    aggregate_commits(records, &settings.repo_url)
}

/// Steps stacked 100 px apart starting at the top of the story.
fn stacked_steps(count: usize) -> Vec<StepGeometry> {
    (0..count)
        .map(|i| StepGeometry {
            top: i as f32 * 100.0,
            bottom: (i + 1) as f32 * 100.0,
        })
        .collect()
}

#[tokio::test]
async fn test_scrolling_advances_the_scatter_track() {
    let (_temp_dir, settings) = setup_sources();
    let history = load_history(&settings).await;
    assert_eq!(history.commits().len(), 3);

    let projects = load_projects_async(settings.projects_path.as_ref().unwrap()).await.unwrap();
    let mut app = App::new(settings, Some(history), Some(projects), None);
    app.start(0.0);

    let meta = app.meta.as_mut().unwrap();
    assert_eq!(meta.scatter.rendered_ids(), vec!["b2"]);

    // Scroll so the trigger line sits inside the third step.
    let steps = stacked_steps(3);
    meta.observe(Track::Scatter, Viewport { top: 160.0, height: 200.0 }, &steps, 0.0);

    assert_eq!(meta.narrative.track(Track::Scatter).active(), Some(2));
    assert_eq!(meta.stats.commits, 3);
    assert_eq!(meta.stats.files, 4);
    assert_eq!(meta.language_pie.total(), 6);
    // Files track has not moved.
    assert_eq!(meta.file_view.file_names(), vec!["main.py"]);

    // Once transitions settle, brushing everything picks up all three commits.
    meta.scatter.frame(10_000.0);
    let extent = meta.scatter.brush_extent();
    let selection = meta.scatter.brush(extent, &meta.history).clone();
    assert_eq!(selection.count_label(), "3 commits selected");
    assert_eq!(selection.breakdown.get("js").unwrap().percentage(), "50%");
}

#[tokio::test]
async fn test_scrolling_the_files_track() {
    let (_temp_dir, settings) = setup_sources();
    let history = load_history(&settings).await;
    let mut app = App::new(settings, Some(history), None, None);
    app.start(0.0);

    let meta = app.meta.as_mut().unwrap();
    let steps = stacked_steps(3);
    meta.observe(Track::Files, Viewport { top: 60.0, height: 200.0 }, &steps, 0.0);

    assert_eq!(meta.narrative.track(Track::Files).active(), Some(1));
    assert_eq!(meta.file_view.file_names(), vec!["main.py", "src/app.js", "src/util.js"]);
    assert_eq!(meta.scatter.rendered_ids(), vec!["b2"]);
}

#[test]
fn test_missing_line_table_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = tokio_test::block_on(load_line_records_async(temp_dir.path().join("absent.csv")));
    tokio_test::assert_err!(result);
}

#[tokio::test]
async fn test_export_every_step() {
    let (temp_dir, settings) = setup_sources();
    let history = load_history(&settings).await;
    let theme = ChartTheme::for_scheme(ColorScheme::Dark, false);

    for step in 0..history.commits().len() {
        let out_dir = temp_dir.path().join(format!("step-{}", step));
        let snapshot = export_snapshot(&history, step, &settings, &theme, &out_dir).unwrap();

        let scatter = fs::read_to_string(&snapshot.scatter).unwrap();
        assert_eq!(scatter.matches("<circle").count(), step + 1);
        assert!(fs::metadata(&snapshot.pie).unwrap().len() > 0);
    }
}

#[test]
fn test_theme_choice_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let prefs = temp_dir.path().join("prefs").join("preferences.json");

    let mut app = App::new(Settings::default(), None, None, Some(PreferenceStore::new(&prefs)));
    app.set_color_scheme(ColorScheme::Dark);
    assert!(app.error_message.is_none());

    let mut reopened = App::new(Settings::default(), None, None, Some(PreferenceStore::new(&prefs)));
    reopened.system_dark = false;
    assert_eq!(reopened.color_scheme, ColorScheme::Dark);
    assert!(reopened.dark_mode());
}
