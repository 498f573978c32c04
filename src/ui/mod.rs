pub mod alert_window;
pub mod main_panel;
pub mod notice_dialog;
pub mod settings_panel;

pub use alert_window::render_alert_window;
pub use main_panel::render_main_panel;
pub use notice_dialog::{render_notice_dialog, Notice};
pub use settings_panel::render_settings_panel;
