use crate::alarm::AlarmMode;
use crate::config::{AppSettings, MAX_POLL_INTERVAL_MS, MIN_POLL_INTERVAL_MS};
use egui::RichText;

pub fn render_settings_panel(
    ui: &mut egui::Ui,
    settings: &mut AppSettings,
    settings_changed: &mut bool,
) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        // Window Settings
        egui::CollapsingHeader::new(RichText::new("Window Settings").strong())
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Font Size:");
                    if ui
                        .add(
                            egui::Slider::new(&mut settings.ui.font_size, 10.0..=24.0)
                                .fixed_decimals(0),
                        )
                        .changed()
                    {
                        *settings_changed = true;
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Default Alarm Type:");
                    egui::ComboBox::from_id_salt("default_mode")
                        .selected_text(settings.ui.default_mode.display_name())
                        .show_ui(ui, |ui| {
                            for mode in [AlarmMode::AbsoluteTime, AlarmMode::RelativeMinutes] {
                                if ui
                                    .selectable_value(
                                        &mut settings.ui.default_mode,
                                        mode,
                                        mode.display_name(),
                                    )
                                    .changed()
                                {
                                    *settings_changed = true;
                                }
                            }
                        });
                });
            });

        ui.add_space(8.0);

        // Alert Settings
        egui::CollapsingHeader::new(RichText::new("Alert Settings").strong())
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Alert Message:");
                    if ui
                        .text_edit_singleline(&mut settings.alert.message)
                        .changed()
                    {
                        *settings_changed = true;
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Dismiss Button:");
                    if ui
                        .text_edit_singleline(&mut settings.alert.dismiss_label)
                        .changed()
                    {
                        *settings_changed = true;
                    }
                });

                if ui
                    .checkbox(&mut settings.alert.fullscreen, "Fullscreen Alert")
                    .on_hover_text("When disabled, the alert opens as a topmost window instead")
                    .changed()
                {
                    *settings_changed = true;
                }
            });

        ui.add_space(8.0);

        // Timing Settings
        egui::CollapsingHeader::new(RichText::new("Timing Settings").strong())
            .default_open(false)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Clock Check Interval (ms):");
                    if ui
                        .add(egui::Slider::new(
                            &mut settings.timing.poll_interval_ms,
                            MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS,
                        ))
                        .on_hover_text("Applies to alarms set after the change")
                        .changed()
                    {
                        *settings_changed = true;
                    }
                });
            });
    });
}
