use crate::config::AlertSettings;
use crate::messages::AlarmId;
use egui::{Color32, RichText, Vec2};

const MESSAGE_SIZE: f32 = 80.0;
const BUTTON_TEXT_SIZE: f32 = 24.0;

/// Show the alert for one ringing alarm in its own topmost window.
/// Returns true once the user has dismissed it.
pub fn render_alert_window(
    ctx: &egui::Context,
    id: AlarmId,
    label: &str,
    settings: &AlertSettings,
    request_focus: bool,
) -> bool {
    let mut builder = egui::ViewportBuilder::default()
        .with_title(format!("Alarm: {}", label))
        .with_window_level(egui::WindowLevel::AlwaysOnTop)
        .with_active(true);
    builder = if settings.fullscreen {
        builder.with_fullscreen(true)
    } else {
        builder.with_inner_size([720.0, 420.0])
    };

    ctx.show_viewport_immediate(
        egui::ViewportId::from_hash_of(("alarm_alert", id)),
        builder,
        |ctx, class| {
            if matches!(class, egui::ViewportClass::Embedded) {
                // No native multi-window support: draw inside the main window
                let mut dismissed = false;
                egui::Window::new(format!("Alarm {}", id))
                    .collapsible(false)
                    .resizable(false)
                    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                    .frame(egui::Frame::window(&ctx.style()).fill(Color32::BLACK))
                    .show(ctx, |ui| {
                        dismissed = render_alert_content(ui, settings, MESSAGE_SIZE / 2.0);
                    });
                return dismissed;
            }

            if request_focus {
                ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
            }

            let mut dismissed = false;
            egui::CentralPanel::default()
                .frame(egui::Frame::new().fill(Color32::BLACK))
                .show(ctx, |ui| {
                    ui.add_space((ui.available_height() * 0.3).max(0.0));
                    dismissed = render_alert_content(ui, settings, MESSAGE_SIZE);
                });

            // Closing the window counts as dismissing it
            dismissed || ctx.input(|i| i.viewport().close_requested())
        },
    )
}

fn render_alert_content(ui: &mut egui::Ui, settings: &AlertSettings, message_size: f32) -> bool {
    let mut dismissed = false;
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(&settings.message)
                .size(message_size)
                .strong()
                .color(Color32::WHITE),
        );

        ui.add_space(50.0);

        let button = egui::Button::new(
            RichText::new(&settings.dismiss_label)
                .size(BUTTON_TEXT_SIZE)
                .strong()
                .color(Color32::WHITE),
        )
        .fill(Color32::RED)
        .min_size(Vec2::new(260.0, 64.0));

        if ui.add(button).clicked() {
            dismissed = true;
        }
    });
    dismissed
}
