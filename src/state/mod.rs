mod app_state;
mod session;
mod settings;

pub use app_state::{TaskMessage, TaskState, UIState};
pub use session::{OpenGroup, ReviewSession};
pub use settings::Settings;
