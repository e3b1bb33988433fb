mod bottom;
mod central;
mod groups;
mod top;

pub use bottom::render_bottom_panel;
pub use central::render_central_panel;
pub use groups::render_group_panel;
pub use top::render_top_panel;
