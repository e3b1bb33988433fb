use crate::app::TextEditHubApp;
use crate::core::dataset::{AnnotationFlag, TranscriptRecord};
use eframe::egui;
use egui_phosphor::regular as Icon;

/// Change requested for one row during this frame
enum RowChange {
    Text(usize, String),
    Flag(usize, AnnotationFlag),
}

/// Render one transcript row. `row` is the index within the open group.
fn render_row(
    ui: &mut egui::Ui,
    row: usize,
    record: &TranscriptRecord,
    changes: &mut Vec<RowChange>,
) {
    let frame = egui::Frame::none()
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(70)))
        .rounding(6.0)
        .inner_margin(10.0);

    frame.show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format!("#{}", row + 1)).strong());
            match &record.audio_link {
                Some(link) => {
                    ui.hyperlink_to(format!("{} Play audio", Icon::SPEAKER_HIGH), link);
                }
                None => {
                    ui.label(
                        egui::RichText::new(format!("{} No audio", Icon::SPEAKER_SLASH))
                            .color(egui::Color32::GRAY),
                    );
                }
            }
            if let Some(name) = record.audio_file_name() {
                ui.label(egui::RichText::new(name).small().color(egui::Color32::GRAY));
            }
            if record.is_text_edited() {
                ui.label(
                    egui::RichText::new(format!("{} edited", Icon::PENCIL_SIMPLE))
                        .small()
                        .color(egui::Color32::from_rgb(100, 149, 237)),
                );
            }
        });

        ui.add_space(4.0);
        ui.label(
            egui::RichText::new(format!("Original: {}", record.raw_text))
                .color(egui::Color32::from_gray(160)),
        );

        let mut text = record.text.clone();
        let response = ui.add(
            egui::TextEdit::multiline(&mut text)
                .desired_rows(2)
                .desired_width(f32::INFINITY)
                .id_salt(("transcript", row)),
        );
        if response.changed() {
            changes.push(RowChange::Text(row, text));
        }

        ui.horizontal(|ui| {
            for flag in AnnotationFlag::all() {
                let mut checked = record.flags.get(flag);
                if ui.checkbox(&mut checked, flag.label()).changed() {
                    changes.push(RowChange::Flag(row, flag));
                }
            }
        });
    });
}

/// Render the central panel with the rows of the current page
pub fn render_central_panel(app: &mut TextEditHubApp, ctx: &egui::Context) {
    let mut changes = Vec::new();

    egui::CentralPanel::default().show(ctx, |ui| {
        if app.session.dataset.is_none() {
            ui.centered_and_justified(|ui| {
                ui.heading("No dataset selected. Pick one above or upload a dataset folder.");
            });
            return;
        }
        if app.session.group.is_none() {
            ui.centered_and_justified(|ui| {
                if app.session.editable_groups().is_empty() {
                    ui.heading(format!("{} Every group of this dataset is done.", Icon::CHECK));
                } else {
                    ui.heading("Select a group to start editing.");
                }
            });
            return;
        }

        let start = app.session.page_range().start;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (offset, record) in app.session.page_rows().iter().enumerate() {
                    render_row(ui, start + offset, record, &mut changes);
                    ui.add_space(8.0);
                }
            });
    });

    // Apply changes outside of the borrow
    for change in changes {
        match change {
            RowChange::Text(row, text) => app.edit_text(row, &text),
            RowChange::Flag(row, flag) => app.toggle_flag(row, flag),
        }
    }
}
