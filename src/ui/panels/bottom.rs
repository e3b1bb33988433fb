use crate::app::TextEditHubApp;
use eframe::egui;
use egui_phosphor::regular as Icon;

/// Render the bottom panel with paging, save and finish controls
pub fn render_bottom_panel(app: &mut TextEditHubApp, ctx: &egui::Context) {
    let Some(group) = app.session.group.as_ref() else {
        return;
    };
    let group_id = group.id;
    let row_count = group.rows.len();
    let dirty = group.dirty;
    let pages = app.session.paginator();
    let page = app.session.page;
    let is_last = app.session.is_last_page();

    egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.add_space(10.0);

            if ui
                .add_enabled(
                    pages.prev(page).is_some(),
                    egui::Button::new(format!("{} Previous", Icon::CARET_LEFT)),
                )
                .clicked()
            {
                app.prev_page();
            }

            ui.label(format!("Page {} of {}", page + 1, pages.page_count().max(1)));

            // Next saves the page before moving on
            if ui
                .add_enabled(
                    pages.next(page).is_some(),
                    egui::Button::new(format!("Next {}", Icon::CARET_RIGHT)),
                )
                .clicked()
            {
                app.next_page();
            }

            ui.add_space(20.0);

            if ui
                .add_enabled(
                    dirty,
                    egui::Button::new(format!("{} Save", Icon::FLOPPY_DISK)),
                )
                .clicked()
            {
                app.save();
            }

            ui.add_space(20.0);

            let finish = egui::Button::new(format!("{} Finish Group {}", Icon::FLAG, group_id))
                .fill(egui::Color32::from_rgb(100, 150, 100));
            if ui
                .add_enabled(is_last, finish)
                .on_disabled_hover_text("Review every page first")
                .clicked()
            {
                app.ui.show_finish_confirm = true;
            }

            ui.add_space(20.0);

            ui.label(format!("{} {} rows", Icon::FILE_CSV, row_count));
            if dirty {
                ui.label(
                    egui::RichText::new("Unsaved changes")
                        .color(egui::Color32::from_rgb(255, 150, 0)),
                );
            }
        });
        ui.add_space(10.0);
    });
}
