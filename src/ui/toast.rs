use std::collections::VecDeque;
use std::time::{Duration, Instant};

use eframe::egui;
use egui_phosphor::regular as Icon;

use crate::app::TextEditHubApp;

/// Most toasts kept on screen at once
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    fn icon(&self) -> &'static str {
        match self {
            ToastKind::Info => Icon::INFO,
            ToastKind::Success => Icon::CHECK_CIRCLE,
            ToastKind::Error => Icon::WARNING,
        }
    }

    fn color(&self) -> egui::Color32 {
        match self {
            ToastKind::Info => egui::Color32::from_rgb(100, 149, 237),
            ToastKind::Success => egui::Color32::from_rgb(100, 180, 100),
            ToastKind::Error => egui::Color32::from_rgb(220, 80, 80),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created: Instant,
}

/// Queue of short notifications shown in the bottom-left corner
#[derive(Debug, Default)]
pub struct Toasts {
    queue: VecDeque<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        if self.queue.len() == MAX_TOASTS {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            kind,
            message: message.into(),
            created: Instant::now(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    /// Drop toasts older than `lifetime` at `now`. Errors stay twice as long.
    pub fn prune(&mut self, now: Instant, lifetime: Duration) {
        self.queue.retain(|toast| {
            let limit = match toast.kind {
                ToastKind::Error => lifetime * 2,
                _ => lifetime,
            };
            now.saturating_duration_since(toast.created) < limit
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Render queued toasts and expire old ones
pub fn render_toasts(app: &mut TextEditHubApp, ctx: &egui::Context) {
    app.toasts.prune(
        Instant::now(),
        Duration::from_secs_f32(app.config.toast_seconds),
    );
    if app.toasts.is_empty() {
        return;
    }

    let top = ctx.screen_rect().height() - 80.0 - 40.0 * app.toasts.len() as f32;
    egui::Window::new("toasts")
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .fixed_pos(egui::pos2(20.0, top))
        .show(ctx, |ui| {
            ui.set_min_width(300.0);
            for toast in app.toasts.iter() {
                let frame = egui::Frame::none()
                    .fill(egui::Color32::from_rgb(45, 45, 48))
                    .stroke(egui::Stroke::new(1.0, toast.kind.color()))
                    .rounding(6.0)
                    .inner_margin(8.0);

                frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(toast.kind.icon())
                                .size(18.0)
                                .color(toast.kind.color()),
                        );
                        ui.label(egui::RichText::new(&toast.message).color(egui::Color32::WHITE));
                    });
                });
                ui.add_space(4.0);
            }
        });

    // Keep repainting so toasts disappear on time
    ctx.request_repaint_after(Duration::from_millis(250));
}
