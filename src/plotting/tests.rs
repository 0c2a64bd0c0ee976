#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::analysis::{aggregate_commits, language_breakdown, parse_line_records, CommitHistory};
    use crate::plotting::scatter::NOTHING_SELECTED;
    use crate::settings::Settings;
    use crate::types::Commit;
    use pretty_assertions::assert_eq;
    use std::f64::consts::TAU;
    use tempfile::TempDir;

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
        aggregate_commits(records, "https://github.com/me/site")
    }

    fn setup_plot(history: &CommitHistory) -> ScatterPlot {
        let layout = PlotLayout::default();
        let global = GlobalDomain::from_commits(history.commits(), &layout);
        ScatterPlot::new(global, layout, 500.0)
    }

    fn colors(history: &CommitHistory) -> CategoryColors {
        CategoryColors::new(history.all_types())
    }

    #[test]
    fn test_global_domain_radii() {
        let history = setup_history();
        let global = GlobalDomain::from_commits(history.commits(), &PlotLayout::default());

        let (_, _, r_small) = global.place(&history.commits()[0]).unwrap();
        let (_, _, r_large) = global.place(&history.commits()[1]).unwrap();
        assert!((r_small - 5.0).abs() < 1e-9);
        assert!((r_large - 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_hour_axis_runs_bottom_to_top() {
        let history = setup_history();
        let global = GlobalDomain::from_commits(history.commits(), &PlotLayout::default());

        assert_eq!(global.y.scale(0.0), 570.0);
        assert_eq!(global.y.scale(24.0), 10.0);
        let (_, morning, _) = global.place(&history.commits()[0]).unwrap();
        let (_, afternoon, _) = global.place(&history.commits()[1]).unwrap();
        assert!(afternoon < morning);
    }

    #[test]
    fn test_scales_invert_placed_positions() {
        let history = setup_history();
        let global = GlobalDomain::from_commits(history.commits(), &PlotLayout::default());
        let commit = &history.commits()[0];

        let (x, y, _) = global.place(commit).unwrap();
        assert_eq!(global.x.invert(x), commit.datetime);
        assert!((global.y.invert(y) - 9.5).abs() < 1e-9);

        let (start, end) = global.x.bounds().unwrap();
        assert!(start <= commit.datetime.unwrap());
        assert!(end >= history.commits()[1].datetime.unwrap());
    }

    #[test]
    fn test_scatter_enter_grows_from_zero() {
        let history = setup_history();
        let mut plot = setup_plot(&history);

        plot.update(&history.visible_at(1), 0.0);
        let start = plot.frame(0.0);
        assert!(start.iter().all(|c| c.r == 0.0));
        assert!(plot.is_animating(250.0));

        let settled = plot.frame(500.0);
        assert_eq!(
            settled.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            vec!["a1", "b2"]
        );
        assert!((settled[0].r - 19.0).abs() < 1e-9);
        assert!(!plot.is_animating(500.0));
    }

    #[test]
    fn test_scatter_update_is_idempotent() {
        let history = setup_history();
        let mut plot = setup_plot(&history);

        plot.update(&history.visible_at(1), 0.0);
        let first = plot.frame(1000.0);
        plot.update(&history.visible_at(1), 1000.0);
        let second = plot.frame(2000.0);

        assert_eq!(first, second);
        assert_eq!(plot.rendered_ids(), vec!["a1", "b2"]);
    }

    #[test]
    fn test_scatter_exit_shrinks_then_removes() {
        let history = setup_history();
        let mut plot = setup_plot(&history);

        plot.update(&history.visible_at(1), 0.0);
        plot.update(&history.visible_at(0), 1000.0);
        assert_eq!(plot.rendered_ids(), vec!["b2"]);

        let leaving = plot.frame(1250.0);
        assert_eq!(leaving.len(), 2);
        let a1 = leaving.iter().find(|c| c.id == "a1").unwrap();
        assert!(a1.r > 0.0 && a1.r < 19.0);

        let after = plot.frame(1500.0);
        assert_eq!(after.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["b2"]);
    }

    #[test]
    fn test_scatter_brush_selects_commits() {
        let history = setup_history();
        let mut plot = setup_plot(&history);
        plot.update(&history.visible_at(1), 0.0);

        let extent = plot.brush_extent();
        let selection = plot.brush(extent, &history).clone();
        assert_eq!(selection.ids, vec!["a1".to_string(), "b2".to_string()]);
        assert_eq!(selection.count_label(), "2 commits selected");
        assert_eq!(selection.breakdown.get("py").unwrap().percentage(), "40%");

        let frames = plot.frame(500.0);
        assert!(frames.iter().all(|c| c.selected && c.opacity == 1.0));
    }

    #[test]
    fn test_scatter_brush_over_empty_area() {
        let history = setup_history();
        let mut plot = setup_plot(&history);
        plot.update(&history.visible_at(1), 0.0);

        let selection = plot.brush(BrushRect::new((0.0, 0.0), (1.0, 1.0)), &history);
        assert!(selection.ids.is_empty());
        assert_eq!(selection.count_label(), NOTHING_SELECTED);
        assert!(selection.breakdown.is_empty());
    }

    #[test]
    fn test_scatter_update_clears_brush() {
        let history = setup_history();
        let mut plot = setup_plot(&history);
        plot.update(&history.visible_at(1), 0.0);
        let extent = plot.brush_extent();
        plot.brush(extent, &history);

        plot.update(&history.visible_at(1), 100.0);
        assert!(plot.selection().ids.is_empty());
        assert!(plot.frame(600.0).iter().all(|c| !c.selected));
    }

    #[test]
    fn test_scatter_hover_and_leave() {
        let history = setup_history();
        let mut plot = setup_plot(&history);
        plot.update(&history.visible_at(0), 0.0);

        let circle = plot.frame(500.0).remove(0);
        let tooltip = plot.hover((circle.cx, circle.cy), 500.0).cloned().unwrap();
        assert_eq!(tooltip.short_id, "b2...");
        assert_eq!(tooltip.url, "https://github.com/me/site/commit/b2");
        assert_eq!(tooltip.date, "Friday, March 1, 2024 at 9:30 AM");
        assert_eq!(tooltip.position, (circle.cx + 10.0, circle.cy + 10.0));
        assert!(plot.frame(500.0)[0].hovered);

        plot.leave();
        assert!(plot.tooltip().is_none());
        assert_eq!(plot.frame(500.0)[0].opacity, 0.7);
    }

    #[test]
    fn test_scatter_skips_invalid_timestamps() {
        let history = setup_history();
        let mut plot = setup_plot(&history);
        let broken = Commit {
            datetime: None,
            hour_frac: None,
            ..history.commits()[0].clone()
        };

        plot.update(&[&broken], 0.0);
        assert!(plot.rendered_ids().is_empty());
    }

    #[test]
    fn test_category_colors_are_fixed() {
        let history = setup_history();
        let colors = colors(&history);

        let mut full = PieChart::new(colors.clone(), LegendFormat::Lines, 0.5);
        let lines = history.lines_of_set(history.commits());
        full.set_data(slices_from_breakdown(&language_breakdown(&lines)));

        let mut partial = PieChart::new(colors.clone(), LegendFormat::Lines, 0.5);
        let lines = history.lines_of_set(history.visible_at(0));
        partial.set_data(slices_from_breakdown(&language_breakdown(&lines)));

        let py_full = full.wedges().into_iter().find(|w| w.label == "py").unwrap();
        let py_partial = partial.wedges().into_iter().find(|w| w.label == "py").unwrap();
        assert_eq!(py_full.color, py_partial.color);
        assert_ne!(colors.color("py"), colors.color("js"));
    }

    #[test]
    fn test_pie_wedges_and_legend() {
        let history = setup_history();
        let mut pie = PieChart::new(colors(&history), LegendFormat::Lines, 0.5);
        pie.set_data(vec![Slice::new("py", 2), Slice::new("css", 0), Slice::new("js", 3)]);

        let wedges = pie.wedges();
        assert_eq!(wedges.iter().map(|w| w.label.as_str()).collect::<Vec<_>>(), vec!["js", "py"]);
        assert_eq!(wedges[0].start_angle, 0.0);
        assert!((wedges[1].end_angle - TAU).abs() < 1e-9);

        let legend = pie.legend();
        assert_eq!(legend[0].text, "js: 3 lines (60%)");
        assert_eq!(legend[1].text, "py: 2 lines (40%)");

        // Straight up from the centre lies in the first wedge.
        assert_eq!(pie.hit_test((100.0, 60.0), (100.0, 100.0), 80.0), Some("js".to_string()));
        assert_eq!(pie.hit_test((100.0, 0.0), (100.0, 100.0), 80.0), None);
    }

    #[test]
    fn test_pie_toggle_isolates_category() {
        let mut pie = PieChart::new(CategoryColors::default(), LegendFormat::Count, 0.5);
        pie.set_data(vec![Slice::new("2023", 1), Slice::new("2024", 2)]);

        pie.toggle("2023");
        assert_eq!(pie.selected(), Some("2023"));
        let legend = pie.legend();
        assert_eq!(legend[0].text, "2024 (2)");
        assert_eq!(legend[0].opacity, 0.5);
        assert_eq!(legend[1].opacity, 1.0);
        assert!(legend[1].selected);

        pie.toggle("2023");
        assert_eq!(pie.selected(), None);
        assert!(pie.wedges().iter().all(|w| w.opacity == 1.0));

        pie.toggle("2023");
        pie.set_data(vec![Slice::new("2024", 2)]);
        assert_eq!(pie.selected(), None);

        pie.set_data(Vec::new());
        assert!(pie.is_empty());
        assert!(pie.wedges().is_empty());
    }

    #[test]
    fn test_file_view_fades_dots_in() {
        let history = setup_history();
        let mut view = FileView::new(colors(&history), 300.0);

        view.update(&history.visible_at(0), &history, 0.0);
        view.frame(300.0);
        view.update(&history.visible_at(1), &history, 1000.0);
        assert_eq!(view.info(), "3 files shown, 5 total lines affected.");
        assert_eq!(view.file_names(), vec!["main.py", "src/app.js", "src/util.js"]);

        let frames = view.frame(1000.0);
        assert_eq!(frames[0].caption, "2 lines");
        assert!(frames[0].dots.iter().all(|d| d.opacity == 1.0));
        assert!(frames[1].dots.iter().all(|d| d.opacity == 0.0));

        let frames = view.frame(1300.0);
        assert!(frames.iter().flat_map(|f| &f.dots).all(|d| d.opacity == 1.0));
        assert_eq!(frames[1].dots[0].color, colors(&history).color("js"));
        assert!(!view.is_animating(1300.0));
    }

    #[test]
    fn test_file_view_empty_states() {
        let history = setup_history();
        let mut view = FileView::new(colors(&history), 300.0);

        view.update(&[], &history, 0.0);
        assert_eq!(view.info(), "No commits to display files for.");
        assert!(view.frame(0.0).is_empty());

        let orphan = Commit {
            id: "zz".to_string(),
            ..history.commits()[0].clone()
        };
        view.update(&[&orphan], &history, 0.0);
        assert_eq!(view.info(), "No line data in selected commits.");
        assert!(view.breakdown().is_empty());
    }

    #[test]
    fn test_export_snapshot() {
        let history = setup_history();
        let temp_dir = TempDir::new().unwrap();

        let snapshot = export_snapshot(
            &history,
            1,
            &Settings::default(),
            &ChartTheme::light(),
            temp_dir.path(),
        )
        .unwrap();

        let scatter = std::fs::read_to_string(&snapshot.scatter).unwrap();
        assert!(scatter.contains("<svg"));
        assert_eq!(scatter.matches("<circle").count(), 2);
        // Hour axis labels come from the mesh.
        assert!(scatter.contains("12:00"));
        let pie = std::fs::read_to_string(&snapshot.pie).unwrap();
        assert!(pie.contains("<polygon"));
        assert!(pie.contains("js: 3 lines (60%)"));
    }

    #[test]
    fn test_export_snapshot_rejects_unknown_step() {
        let history = setup_history();
        let temp_dir = TempDir::new().unwrap();

        let result = export_snapshot(
            &history,
            7,
            &Settings::default(),
            &ChartTheme::dark(),
            temp_dir.path(),
        );
        assert!(result.is_err());
    }
}
