pub mod help;
pub mod hud;
pub mod labels;
pub mod panel;
pub mod shortcuts;
pub mod tooltips;

pub use help::help_overlay;
pub use hud::hud_overlay;
pub use labels::labels_overlay;
pub use panel::ui_panel;
pub use shortcuts::handle_shortcuts;
pub use tooltips::tooltip_overlay;

pub const HUD_EDGE_PADDING: f32 = 8.0;
