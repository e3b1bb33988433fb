// Modal windows for upload, finishing a group and background jobs

use crate::app::TextEditHubApp;
use eframe::egui;

/// Render the group size dialog shown after a folder was picked for upload
pub fn render_upload_dialog(app: &mut TextEditHubApp, ctx: &egui::Context) {
    let Some(folder) = app.ui.pending_upload.clone() else {
        return;
    };

    let mut confirmed = None;
    let mut cancelled = false;
    egui::Window::new("⬆ Upload Dataset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Folder: {}", folder.display()));
            ui.label("Expected content: train.csv, val.csv and the .wav clips.");
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.label("Rows per group:");
                ui.add(
                    egui::TextEdit::singleline(&mut app.ui.group_size_input).desired_width(60.0),
                );
            });

            let group_size = app.ui.parsed_group_size();
            if group_size.is_none() {
                ui.colored_label(
                    egui::Color32::from_rgb(255, 150, 0),
                    "Group size must be a whole number of at least 1",
                );
            }

            ui.add_space(10.0);
            ui.colored_label(
                egui::Color32::from_rgb(255, 150, 0),
                "⚠ Uploading again replaces the groups of a dataset with the same name.",
            );

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(group_size.is_some(), egui::Button::new("✓ Upload"))
                    .clicked()
                {
                    confirmed = group_size;
                }
                if ui.button("✗ Cancel").clicked() {
                    cancelled = true;
                }
            });
        });

    if let Some(group_size) = confirmed {
        app.ui.pending_upload = None;
        app.start_upload(folder, group_size);
    } else if cancelled {
        app.ui.pending_upload = None;
    }
}

/// Render the confirmation shown before a group is marked done
pub fn render_finish_confirmation(app: &mut TextEditHubApp, ctx: &egui::Context) {
    if !app.ui.show_finish_confirm {
        return;
    }
    let Some(group) = app.session.group.as_ref().map(|group| group.id) else {
        app.ui.show_finish_confirm = false;
        return;
    };

    let mut confirmed = false;
    egui::Window::new("✓ Finish Group")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(format!("Mark group {} as done?", group));
            ui.add_space(10.0);
            ui.colored_label(
                egui::Color32::from_rgb(255, 150, 0),
                "⚠ A finished group can no longer be edited.",
            );
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("✓ Yes, Finish").clicked() {
                    confirmed = true;
                    app.ui.show_finish_confirm = false;
                }
                if ui.button("✗ Cancel").clicked() {
                    app.ui.show_finish_confirm = false;
                }
            });
        });

    if confirmed {
        app.finish_group();
    }
}

/// Render the progress window of the running background job
pub fn render_task_progress(app: &mut TextEditHubApp, ctx: &egui::Context) {
    let Some(label) = &app.task.running else {
        return;
    };

    egui::Window::new("⏳ Working...")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(label.as_str());
            if let Some(progress) = &app.task.progress {
                ui.add_space(5.0);
                ui.label(progress.as_str());
            }
            ui.add_space(10.0);
            ui.spinner();
        });

    // Request repaint to pick up messages from the job
    ctx.request_repaint();
}
