use eframe::App as EApp;
use std::sync::{Arc, Mutex};

use crate::analysis::projects::year_counts;
use crate::analysis::{language_breakdown, summary_stats, CommitHistory, ProjectBrowser, SummaryStats};
use crate::narrative::{Narrative, NarrativeUpdate, StepGeometry, Track, Viewport};
use crate::plotting::files::FileView;
use crate::plotting::pie::{slices_from_breakdown, LegendFormat, PieChart, Slice};
use crate::plotting::scale::CategoryColors;
use crate::plotting::scatter::{GlobalDomain, ScatterPlot};
use crate::settings::Settings;
use crate::types::{ColorScheme, Commit, LineRecord, ProjectEntry};

use super::preferences::PreferenceStore;

/// Everything drawn from the commit history.
pub struct MetaView {
    pub history: CommitHistory,
    pub stats: SummaryStats,
    pub scatter: ScatterPlot,
    pub language_pie: PieChart,
    pub file_view: FileView,
    pub narrative: Narrative,
    /// Plot-space corner where the current brush drag began
    pub brush_anchor: Option<(f64, f64)>,
}

impl MetaView {
    pub fn new(history: CommitHistory, settings: &Settings) -> Self {
        let global = GlobalDomain::from_commits(history.commits(), &settings.layout);
        let colors = CategoryColors::new(history.all_types());
        let narrative = Narrative::new(&history, settings.trigger_offset);

        Self {
            stats: SummaryStats::default(),
            scatter: ScatterPlot::new(global, settings.layout, settings.scatter_transition_ms),
            language_pie: PieChart::new(colors.clone(), LegendFormat::Lines, settings.pie.dimmed_opacity),
            file_view: FileView::new(colors, settings.file_transition_ms),
            narrative,
            history,
            brush_anchor: None,
        }
    }

    /// Push a narrative step into the renderers of its track.
    pub fn apply_update(&mut self, update: &NarrativeUpdate, now: f64) {
        let visible: Vec<&Commit> = update
            .visible
            .iter()
            .filter_map(|id| self.history.commits().iter().find(|c| &c.id == id))
            .collect();

        match update.track {
            Track::Scatter => {
                let lines: Vec<&LineRecord> = self.history.lines_of_set(visible.iter().copied());
                self.stats = summary_stats(&lines, &visible);
                self.language_pie
                    .set_data(slices_from_breakdown(&language_breakdown(&lines)));
                self.scatter.update(&visible, now);
                self.brush_anchor = None;
            }
            Track::Files => self.file_view.update(&visible, &self.history, now),
        }
    }

    /// Activate the first step of both tracks.
    pub fn start(&mut self, now: f64) {
        let updates = self.narrative.start(&self.history);
        for update in &updates {
            self.apply_update(update, now);
        }
    }

    /// Feed one story's scroll geometry and apply whatever step it entered.
    pub fn observe(&mut self, track: Track, viewport: Viewport, steps: &[StepGeometry], now: f64) {
        let updates = self.narrative.observe(track, viewport, steps, &self.history);
        for update in &updates {
            self.apply_update(update, now);
        }
    }

    pub fn is_animating(&self, now: f64) -> bool {
        self.scatter.is_animating(now) || self.file_view.is_animating(now)
    }
}

/// The project catalog with its search box and year pie.
pub struct ProjectsView {
    pub browser: ProjectBrowser,
    pub year_pie: PieChart,
}

impl ProjectsView {
    pub fn new(projects: Vec<ProjectEntry>, dimmed_opacity: f64) -> Self {
        let browser = ProjectBrowser::new(projects);
        let colors = CategoryColors::new(browser.all_years());
        let mut view = Self {
            browser,
            year_pie: PieChart::new(colors, LegendFormat::Count, dimmed_opacity),
        };
        view.refresh_pie();
        view
    }

    /// Apply the search box contents.
    pub fn search(&mut self, query: &str) {
        self.browser.set_query(query);
        self.refresh_pie();
    }

    /// Isolate a year in both the pie and the list; a second click clears it.
    pub fn toggle_year(&mut self, year: &str) {
        self.browser.toggle_year(year);
        self.year_pie.toggle(year);
    }

    /// Heading counting the projects currently listed.
    pub fn heading(&self) -> String {
        format!("{} Projects", self.browser.listed().len())
    }

    fn refresh_pie(&mut self) {
        let slices = year_counts(&self.browser.search_results())
            .into_iter()
            .map(|(year, count)| Slice::new(year, count))
            .collect();
        self.year_pie.set_data(slices);

        // The list follows the pie when a search removes the isolated year.
        if self.year_pie.selected() != self.browser.selected_year() {
            if let Some(year) = self.browser.selected_year().map(str::to_string) {
                self.browser.toggle_year(&year);
            }
        }
    }
}

/// Main application state
pub struct App {
    pub settings: Settings,
    pub meta: Option<MetaView>,
    pub projects: Option<ProjectsView>,
    pub color_scheme: ColorScheme,
    /// Dark mode of the platform, what `Automatic` resolves to
    pub system_dark: bool,
    pub preferences: Option<PreferenceStore>,
    pub error_message: Option<String>,
}

impl App {
    /// Build the viewer from whatever loaded. A missing source disables its panel.
    pub fn new(
        settings: Settings,
        history: Option<CommitHistory>,
        projects: Option<Vec<ProjectEntry>>,
        preferences: Option<PreferenceStore>,
    ) -> Self {
        let color_scheme = preferences
            .as_ref()
            .and_then(|store| match store.load_color_scheme() {
                Ok(scheme) => scheme,
                Err(e) => {
                    log::warn!("Could not read preferences: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        let meta = history.map(|history| MetaView::new(history, &settings));
        let projects = projects.map(|projects| ProjectsView::new(projects, settings.pie.dimmed_opacity));

        Self {
            settings,
            meta,
            projects,
            color_scheme,
            system_dark: true,
            preferences,
            error_message: None,
        }
    }

    pub fn start(&mut self, now: f64) {
        if let Some(meta) = &mut self.meta {
            meta.start(now);
        }
    }

    /// Switch theme and remember the choice.
    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        if self.color_scheme == scheme {
            return;
        }
        self.color_scheme = scheme;
        if let Some(store) = &self.preferences {
            if let Err(e) = store.save_color_scheme(scheme) {
                log::error!("Failed to save colour scheme: {}", e);
                self.error_message = Some(format!("Could not save theme preference: {}", e));
            }
        }
    }

    /// Whether dark visuals are in effect.
    pub fn dark_mode(&self) -> bool {
        match self.color_scheme {
            ColorScheme::Light => false,
            ColorScheme::Dark => true,
            ColorScheme::Automatic => self.system_dark,
        }
    }

    pub fn is_animating(&self, now: f64) -> bool {
        self.meta.as_ref().map_or(false, |meta| meta.is_animating(now))
    }
}

/// Thread-safe wrapper around App for use with eframe
pub struct AppWrapper {
    pub app: Arc<Mutex<App>>,
}

impl EApp for AppWrapper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Ok(mut app) = self.app.lock() {
            super::ui::draw_ui(&mut app, ctx);
        } else {
            log::error!("Failed to acquire app lock in update");
        }
    }
}
