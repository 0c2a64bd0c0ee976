use egui::{
    Align2, Color32, ComboBox, Context, FontId, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2,
};
use plotters::style::RGBColor;
use std::f64::consts::TAU;

use super::state::{MetaView, ProjectsView};
use super::App;
use crate::narrative::{StepGeometry, StoryLayout, StoryStep, Track, Viewport};
use crate::plotting::pie::PieChart;
use crate::plotting::scatter::{BrushRect, ScatterPlot};
use crate::plotting::styles::STEELBLUE;
use crate::types::ColorScheme;
use crate::utils::format::format_time_tick;

/// Smallest drag, in plot units, treated as a brush rather than a click.
const MIN_BRUSH: f64 = 3.0;

fn color32(color: RGBColor, opacity: f64) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.0, color.1, color.2, alpha)
}

/// Maps plot units to screen points and back.
#[derive(Clone, Copy)]
struct PlotTransform {
    origin: Pos2,
    scale: f32,
}

impl PlotTransform {
    fn to_screen(&self, x: f64, y: f64) -> Pos2 {
        self.origin + Vec2::new(x as f32, y as f32) * self.scale
    }

    fn to_plot(&self, pos: Pos2) -> (f64, f64) {
        let local = (pos - self.origin) / self.scale;
        (local.x as f64, local.y as f64)
    }
}

/// Draw the main application UI
pub fn draw_ui(app: &mut App, ctx: &Context) {
    let now = ctx.input(|i| i.time) * 1000.0;
    let pie_size = app.settings.pie.width as f32;
    ctx.set_visuals(if app.dark_mode() {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });

    egui::SidePanel::left("side_panel")
        .resizable(true)
        .default_width(300.0)
        .show(ctx, |ui| {
            ui.heading("Settings");
            ui.separator();

            ui.label("Theme:");
            let mut scheme = app.color_scheme;
            ComboBox::new("theme_selector", "")
                .selected_text(scheme.label())
                .show_ui(ui, |ui| {
                    for option in ColorScheme::ALL {
                        ui.selectable_value(&mut scheme, option, option.label());
                    }
                });
            app.set_color_scheme(scheme);

            if let Some(meta) = &mut app.meta {
                ui.separator();
                draw_summary(ui, meta);
                ui.separator();
                draw_selection(ui, meta);
                ui.separator();
                ui.label("Languages");
                if let Some(label) = draw_pie(ui, &meta.language_pie, pie_size) {
                    meta.language_pie.toggle(&label);
                }
                if let Some(label) = draw_legend(ui, &meta.language_pie) {
                    meta.language_pie.toggle(&label);
                }
            }
        });

    if let Some(projects) = &mut app.projects {
        egui::TopBottomPanel::bottom("projects_panel")
            .resizable(true)
            .default_height(260.0)
            .show(ctx, |ui| draw_projects(ui, projects, pie_size));
    }

    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(error) = &app.error_message {
            ui.colored_label(Color32::from_rgb(0xe1, 0x57, 0x59), error);
            ui.separator();
        }

        let Some(meta) = &mut app.meta else {
            ui.label("No commit data loaded.");
            return;
        };
        if meta.history.is_empty() {
            ui.label("The line table has no commits.");
            return;
        }

        let trigger_offset = app.settings.trigger_offset;
        ui.columns(2, |columns| {
            egui::ScrollArea::vertical()
                .id_salt("charts")
                .show(&mut columns[0], |ui| {
                    ui.heading("Commits by time of day");
                    draw_scatter(ui, meta, now);
                    ui.separator();
                    ui.heading("Files");
                    draw_files(ui, meta, now);
                });

            let half = columns[1].available_height() / 2.0 - 8.0;
            draw_story(&mut columns[1], meta, Track::Scatter, half, trigger_offset, now);
            columns[1].separator();
            draw_story(&mut columns[1], meta, Track::Files, half, trigger_offset, now);
        });
    });

    if app.is_animating(now) {
        ctx.request_repaint();
    }
}

fn draw_summary(ui: &mut Ui, meta: &MetaView) {
    ui.label("Summary");
    egui::Grid::new("summary_stats").striped(true).show(ui, |ui| {
        for (label, value) in meta.stats.rows() {
            ui.label(label);
            ui.strong(value);
            ui.end_row();
        }
    });
}

fn draw_selection(ui: &mut Ui, meta: &MetaView) {
    let selection = meta.scatter.selection();
    ui.label(selection.count_label());
    if selection.ids.is_empty() {
        return;
    }
    for entry in &selection.breakdown.entries {
        ui.horizontal(|ui| {
            ui.strong(&entry.label);
            ui.label(entry.to_string());
        });
    }
}

fn draw_scatter(ui: &mut Ui, meta: &mut MetaView, now: f64) {
    let layout = *meta.scatter.layout();
    let width = ui.available_width().max(200.0);
    let transform_scale = width / layout.width as f32;
    let size = Vec2::new(width, layout.height as f32 * transform_scale);
    let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
    let transform = PlotTransform {
        origin: response.rect.min,
        scale: transform_scale,
    };

    let text_color = ui.visuals().text_color();
    let grid_color = ui.visuals().weak_text_color().gamma_multiply(0.4);
    let font = FontId::proportional(layout.font_size as f32);
    let (x0, x1) = layout.x_range();
    let (y_bottom, y_top) = layout.y_range();

    for (y, label) in meta.scatter.hour_ticks() {
        painter.line_segment(
            [transform.to_screen(x0, y), transform.to_screen(x1, y)],
            Stroke::new(1.0, grid_color),
        );
        painter.text(
            transform.to_screen(x0 - 6.0, y),
            Align2::RIGHT_CENTER,
            label,
            font.clone(),
            text_color,
        );
    }

    let axis = Stroke::new(1.0, text_color);
    painter.line_segment(
        [transform.to_screen(x0, y_bottom), transform.to_screen(x1, y_bottom)],
        axis,
    );
    painter.line_segment(
        [transform.to_screen(x0, y_top), transform.to_screen(x0, y_bottom)],
        axis,
    );
    let global = *meta.scatter.global();
    let interval = global.x.interval.approx_secs();
    for tick in global.x.ticks() {
        let x = global.x.scale(&tick);
        painter.line_segment(
            [transform.to_screen(x, y_bottom), transform.to_screen(x, y_bottom + 6.0)],
            axis,
        );
        painter.text(
            transform.to_screen(x, y_bottom + 9.0),
            Align2::CENTER_TOP,
            format_time_tick(&tick, interval),
            font.clone(),
            text_color,
        );
    }

    for frame in meta.scatter.frame(now) {
        let center = transform.to_screen(frame.cx, frame.cy);
        let radius = frame.r as f32 * transform.scale;
        painter.circle_filled(center, radius, color32(STEELBLUE, frame.opacity));
        if frame.selected {
            painter.circle_stroke(center, radius, Stroke::new(2.0, Color32::from_rgb(0xff, 0x6b, 0x6b)));
        }
    }

    handle_scatter_pointer(ui, &response, meta, transform, now);
    draw_brush(&painter, &response, meta, transform);
    draw_tooltip(ui.ctx(), &meta.scatter, transform);
}

fn handle_scatter_pointer(
    ui: &Ui,
    response: &Response,
    meta: &mut MetaView,
    transform: PlotTransform,
    now: f64,
) {
    match response.hover_pos() {
        Some(pos) if meta.brush_anchor.is_none() => {
            meta.scatter.hover(transform.to_plot(pos), now);
        }
        _ => meta.scatter.leave(),
    }

    if response.drag_started() {
        meta.brush_anchor = response.interact_pointer_pos().map(|pos| transform.to_plot(pos));
    }
    if response.drag_stopped() {
        let end = ui
            .input(|i| i.pointer.interact_pos())
            .map(|pos| transform.to_plot(pos));
        if let (Some(start), Some(end)) = (meta.brush_anchor.take(), end) {
            let extent = meta.scatter.brush_extent();
            let clamp = |p: (f64, f64)| (p.0.clamp(extent.x0, extent.x1), p.1.clamp(extent.y0, extent.y1));
            let rect = BrushRect::new(clamp(start), clamp(end));
            if rect.x1 - rect.x0 < MIN_BRUSH && rect.y1 - rect.y0 < MIN_BRUSH {
                meta.scatter.clear_brush();
            } else {
                let selection = meta.scatter.brush(rect, &meta.history);
                log::debug!("Brushed {}", selection.count_label());
            }
        }
    } else if response.clicked() {
        meta.scatter.clear_brush();
    }
}

fn draw_brush(painter: &egui::Painter, response: &Response, meta: &MetaView, transform: PlotTransform) {
    let (Some(start), Some(pos)) = (meta.brush_anchor, response.interact_pointer_pos()) else {
        return;
    };
    if !response.dragged() {
        return;
    }
    let rect = Rect::from_two_pos(transform.to_screen(start.0, start.1), pos);
    painter.rect_filled(rect, 0.0, Color32::from_rgba_unmultiplied(119, 119, 119, 60));
    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::from_gray(160)));
}

fn draw_tooltip(ctx: &Context, scatter: &ScatterPlot, transform: PlotTransform) {
    let Some(tooltip) = scatter.tooltip() else {
        return;
    };
    egui::Area::new(egui::Id::new("commit_tooltip"))
        .order(egui::Order::Tooltip)
        .fixed_pos(transform.to_screen(tooltip.position.0, tooltip.position.1))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                egui::Grid::new("commit_tooltip_grid").show(ui, |ui| {
                    ui.label("Commit");
                    ui.hyperlink_to(&tooltip.short_id, &tooltip.url);
                    ui.end_row();
                    ui.label("Date");
                    ui.label(&tooltip.date);
                    ui.end_row();
                });
            });
        });
}

/// Paint a pie and return the label of a clicked wedge.
fn draw_pie(ui: &mut Ui, pie: &PieChart, size: f32) -> Option<String> {
    if pie.is_empty() {
        ui.label("No data to display.");
        return None;
    }

    let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::click());
    let center = response.rect.center();
    let radius = size / 2.0 - 10.0;

    for wedge in pie.wedges() {
        let fill = color32(wedge.color, wedge.opacity);
        if wedge.end_angle - wedge.start_angle >= TAU - 1e-9 {
            painter.circle_filled(center, radius, fill);
            continue;
        }
        // Triangle fan, since a wedge wider than a half turn is not convex.
        let outline = wedge.polygon((center.x as f64, center.y as f64), radius as f64);
        let apex = center;
        for pair in outline[1..].windows(2) {
            let points = vec![
                apex,
                Pos2::new(pair[0].0 as f32, pair[0].1 as f32),
                Pos2::new(pair[1].0 as f32, pair[1].1 as f32),
            ];
            painter.add(Shape::convex_polygon(points, fill, Stroke::NONE));
        }
    }

    if response.clicked() {
        let pos = response.interact_pointer_pos()?;
        return pie.hit_test(
            (pos.x as f64, pos.y as f64),
            (center.x as f64, center.y as f64),
            radius as f64,
        );
    }
    None
}

/// List the legend and return the label of a clicked entry.
fn draw_legend(ui: &mut Ui, pie: &PieChart) -> Option<String> {
    let mut clicked = None;
    for entry in pie.legend() {
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
            ui.painter()
                .rect_filled(rect, 2.0, color32(entry.swatch, entry.opacity));
            let text = egui::RichText::new(&entry.text)
                .color(ui.visuals().text_color().gamma_multiply(entry.opacity as f32));
            if ui.selectable_label(entry.selected, text).clicked() {
                clicked = Some(entry.label.clone());
            }
        });
    }
    clicked
}

fn draw_files(ui: &mut Ui, meta: &mut MetaView, now: f64) {
    ui.label(meta.file_view.info());
    let breakdown = meta.file_view.breakdown();
    if !breakdown.is_empty() {
        let summary = breakdown
            .entries
            .iter()
            .map(|e| format!("{} {}", e.label, e.percentage()))
            .collect::<Vec<_>>()
            .join(" · ");
        ui.small(summary);
    }

    egui::Grid::new("file_view").num_columns(2).show(ui, |ui| {
        for file in meta.file_view.frame(now) {
            ui.vertical(|ui| {
                ui.monospace(&file.name);
                ui.small(&file.caption);
            });
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing = Vec2::splat(1.0);
                for dot in &file.dots {
                    let (rect, _) = ui.allocate_exact_size(Vec2::splat(7.0), Sense::hover());
                    ui.painter()
                        .circle_filled(rect.center(), 3.0, color32(dot.color, dot.opacity));
                }
            });
            ui.end_row();
        }
    });
}

/// One scrolling story. Measures its steps and feeds them to the narrative.
fn draw_story(ui: &mut Ui, meta: &mut MetaView, track: Track, height: f32, trigger_offset: f32, now: f64) {
    let (salt, title) = match track {
        Track::Scatter => ("scatter_story", "The story of the commits"),
        Track::Files => ("files_story", "The story of the files"),
    };
    ui.strong(title);

    let story = meta.narrative.track(track);
    let active = story.active();
    let layout = StoryLayout::new(height.max(80.0), trigger_offset);
    let output = egui::ScrollArea::vertical()
        .id_salt(salt)
        .max_height(height.max(80.0))
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.add_space(layout.lead);
            let mut geometry = Vec::with_capacity(story.steps().len());
            for (i, step) in story.steps().iter().enumerate() {
                let frame = egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    draw_step(ui, step, Some(i) == active);
                });
                geometry.push(StepGeometry {
                    top: frame.response.rect.top(),
                    bottom: frame.response.rect.bottom(),
                });
                ui.add_space(layout.gap);
            }
            ui.add_space(layout.tail);
            geometry
        });

    let viewport = Viewport {
        top: output.inner_rect.top(),
        height: output.inner_rect.height(),
    };

    #[cfg(feature = "dev")]
    {
        let trigger = viewport.top + viewport.height * trigger_offset;
        ui.painter().hline(
            output.inner_rect.x_range(),
            trigger,
            Stroke::new(1.0, Color32::RED),
        );
    }

    meta.observe(track, viewport, &output.inner, now);
}

fn draw_step(ui: &mut Ui, step: &StoryStep, active: bool) {
    let styled = |text: &str| {
        let text = egui::RichText::new(text);
        if active {
            text.strong()
        } else {
            text
        }
    };
    for line in &step.lines {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            ui.label(styled(&line.text));
            if let Some(link) = &line.link {
                ui.hyperlink_to(styled(&link.label), &link.url);
            }
        });
    }
}

fn draw_projects(ui: &mut Ui, projects: &mut ProjectsView, pie_size: f32) {
    ui.heading(projects.heading());

    let mut query = projects.browser.query().to_string();
    let response = ui.add(egui::TextEdit::singleline(&mut query).hint_text("🔍 Search projects…"));
    if response.changed() {
        projects.search(&query);
    }

    ui.horizontal_top(|ui| {
        ui.vertical(|ui| {
            if let Some(year) = draw_pie(ui, &projects.year_pie, pie_size) {
                projects.toggle_year(&year);
            }
            if let Some(year) = draw_legend(ui, &projects.year_pie) {
                projects.toggle_year(&year);
            }
        });

        egui::ScrollArea::vertical().id_salt("project_list").show(ui, |ui| {
            if projects.browser.no_results() {
                ui.label("No projects found.");
                return;
            }
            for project in projects.browser.listed() {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.strong(&project.title);
                    if !project.description.is_empty() {
                        ui.label(&project.description);
                    }
                    ui.small(format!("c. {}", project.year));
                });
            }
        });
    });
}
