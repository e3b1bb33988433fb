use crate::app::TextEditHubApp;
use crate::core::grouping::GroupStatus;
use chrono::{DateTime, Utc};
use eframe::egui;
use egui_phosphor::regular as Icon;

/// Format a timestamp relative to `now` (e.g., "2 hours ago")
fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = now.signed_duration_since(timestamp).num_seconds();
    let plural = |n: i64| if n == 1 { "" } else { "s" };

    if seconds < 0 {
        "in the future".to_string()
    } else if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        let minutes = seconds / 60;
        format!("{} minute{} ago", minutes, plural(minutes))
    } else if seconds < 86400 {
        let hours = seconds / 3600;
        format!("{} hour{} ago", hours, plural(hours))
    } else {
        let days = seconds / 86400;
        format!("{} day{} ago", days, plural(days))
    }
}

/// Render the right side panel with the dataset layout and group progress
pub fn render_group_panel(app: &mut TextEditHubApp, ctx: &egui::Context) {
    if app.session.dataset.is_none() {
        return;
    }

    let mut open_group = None;
    egui::SidePanel::right("group_panel")
        .default_width(app.config.side_panel_width)
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading(format!("{} Groups", Icon::STACK));
            ui.add_space(10.0);
            ui.separator();
            ui.add_space(10.0);

            if let Some(manifest) = &app.manifest {
                ui.label(format!(
                    "{} train + {} val rows",
                    manifest.layout.train_len, manifest.layout.val_len
                ));
                ui.label(format!("Group size: {}", manifest.layout.group_size));
                ui.label(
                    egui::RichText::new(format!(
                        "{} Uploaded {}",
                        Icon::CLOCK,
                        format_relative_time(manifest.created_at, Utc::now())
                    ))
                    .small()
                    .color(egui::Color32::GRAY),
                );
                ui.add_space(10.0);
            }

            let board = &app.session.board;
            let done = board.done_groups().len();
            let total = board.len();
            let fraction = if total > 0 {
                done as f32 / total as f32
            } else {
                0.0
            };
            ui.add(egui::ProgressBar::new(fraction).text(format!("{} / {} done", done, total)));
            ui.add_space(10.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                let current = app.session.group.as_ref().map(|group| group.id);
                for group in board.editable_groups().into_iter().chain(board.done_groups()) {
                    let status = board.status(group).unwrap_or_default();
                    let text = match status {
                        GroupStatus::Done => format!("{} Group {}", Icon::CHECK, group),
                        GroupStatus::Open => format!("{} Group {}", Icon::PENCIL_SIMPLE, group),
                    };
                    let response = ui.add_enabled(
                        !status.is_done(),
                        egui::SelectableLabel::new(current == Some(group), text),
                    );
                    if response.clicked() && current != Some(group) {
                        open_group = Some(group);
                    }
                }
            });
        });

    if let Some(group) = open_group {
        app.select_group(group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_relative_time() {
        let now = Utc::now();
        assert_eq!(format_relative_time(now, now), "just now");
        assert_eq!(format_relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_relative_time(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(format_relative_time(now - Duration::days(3), now), "3 days ago");
        assert_eq!(format_relative_time(now + Duration::hours(1), now), "in the future");
    }
}
