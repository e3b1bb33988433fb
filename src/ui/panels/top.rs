use crate::app::TextEditHubApp;
use eframe::egui;
use egui_phosphor::regular as Icon;

/// Render the top panel with dataset selection, upload and export
pub fn render_top_panel(app: &mut TextEditHubApp, ctx: &egui::Context) {
    let mut chosen_dataset = None;
    let mut chosen_group = None;

    egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading(format!("{} CSV TextEdit Hub", Icon::NOTE_PENCIL));

            ui.add_space(20.0);

            let busy = app.task.is_running();
            if ui
                .add_enabled(
                    !busy,
                    egui::Button::new(format!("{} Upload Dataset Folder", Icon::UPLOAD_SIMPLE)),
                )
                .clicked()
            {
                if let Some(folder) = rfd::FileDialog::new().pick_folder() {
                    app.ui.request_upload(folder, app.settings.last_group_size);
                }
            }

            if ui
                .button(Icon::ARROWS_CLOCKWISE)
                .on_hover_text("Refresh datasets")
                .clicked()
            {
                app.refresh_datasets();
            }

            ui.add_space(20.0);

            ui.label("Dataset:");
            let selected = app
                .session
                .dataset
                .clone()
                .unwrap_or_else(|| "Select a dataset".to_string());
            egui::ComboBox::from_id_salt("dataset_picker")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for dataset in &app.datasets {
                        let is_current = app.session.dataset.as_deref() == Some(dataset.as_str());
                        if ui.selectable_label(is_current, dataset).clicked() && !is_current {
                            chosen_dataset = Some(dataset.clone());
                        }
                    }
                });

            if app.session.dataset.is_some() {
                ui.add_space(20.0);

                // Only open groups are offered; done groups are read-only
                ui.label("Group:");
                let selected = match &app.session.group {
                    Some(group) => format!("Group {}", group.id),
                    None => "Select a group".to_string(),
                };
                egui::ComboBox::from_id_salt("group_picker")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        let current = app.session.group.as_ref().map(|group| group.id);
                        for group in app.session.editable_groups() {
                            let label = format!("Group {}", group);
                            if ui.selectable_label(current == Some(group), label).clicked()
                                && current != Some(group)
                            {
                                chosen_group = Some(group);
                            }
                        }
                    });

                ui.add_space(20.0);

                if ui
                    .add_enabled(
                        !busy,
                        egui::Button::new(format!("{} Export CSV", Icon::DOWNLOAD_SIMPLE)),
                    )
                    .clicked()
                {
                    let mut dialog = rfd::FileDialog::new();
                    if let Some(dir) = &app.settings.last_export_dir {
                        dialog = dialog.set_directory(dir);
                    }
                    if let Some(destination) = dialog.pick_folder() {
                        app.start_export(destination);
                    }
                }
            }
        });
    });

    if let Some(dataset) = chosen_dataset {
        app.select_dataset(&dataset);
    }
    if let Some(group) = chosen_group {
        app.select_group(group);
    }
}
