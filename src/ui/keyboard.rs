use crate::app::TextEditHubApp;
use eframe::egui;
use tracing::debug;

/// Handle keyboard shortcuts for paging through the open group.
///
/// Arrow keys are ignored while a text field has focus so that the cursor
/// can still move inside the transcript being edited.
pub fn handle_keyboard_shortcuts(app: &mut TextEditHubApp, ctx: &egui::Context) {
    if app.session.group.is_none() {
        return;
    }
    if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
        debug!("[KEYBOARD] Save shortcut pressed");
        app.save();
    }
    if ctx.wants_keyboard_input() {
        return;
    }

    if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
        debug!("[KEYBOARD] Right arrow pressed");
        app.next_page();
    }
    if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
        debug!("[KEYBOARD] Left arrow pressed");
        app.prev_page();
    }
}
