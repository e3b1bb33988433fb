pub mod dialogs;
pub mod keyboard;
pub mod panels;
pub mod toast;

// Re-export commonly used functions
pub use panels::{render_bottom_panel, render_central_panel, render_group_panel, render_top_panel};

pub use keyboard::handle_keyboard_shortcuts;

pub use dialogs::{render_finish_confirmation, render_task_progress, render_upload_dialog};

pub use toast::render_toasts;
