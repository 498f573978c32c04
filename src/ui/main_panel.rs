use crate::alarm::{Alarm, AlarmMode};
use crate::app::AlarmApp;
use crate::messages::AlarmId;
use crate::state::{AlarmPhase, StatusColor};
use egui::{Color32, RichText, Vec2};

const COUNTDOWN_COLOR: Color32 = Color32::from_rgb(90, 140, 255);

/// A button press in the alarm list
enum AlarmAction {
    Cancel(AlarmId),
    Dismiss(AlarmId),
}

pub fn render_main_panel(ui: &mut egui::Ui, app: &mut AlarmApp) {
    if let Some(notice) = app.settings_notice.clone() {
        ui.horizontal(|ui| {
            ui.label(RichText::new(notice).color(Color32::YELLOW));
            if ui.button("Dismiss").clicked() {
                app.settings_notice = None;
            }
        });
        ui.add_space(4.0);
    }

    ui.vertical_centered(|ui| {
        ui.add_space(6.0);
        ui.label(RichText::new("Select Alarm Type:").strong());
        ui.add_space(4.0);

        for mode in [AlarmMode::AbsoluteTime, AlarmMode::RelativeMinutes] {
            ui.radio_value(&mut app.mode, mode, mode.display_name());
        }

        ui.add_space(10.0);
        render_input(ui, app);

        ui.add_space(12.0);
        let set_button = egui::Button::new(RichText::new("Set Alarm").strong())
            .min_size(Vec2::new(110.0, 28.0));
        if ui.add(set_button).clicked() {
            app.set_alarm();
        }

        ui.add_space(8.0);
        render_countdown(ui, app);
    });

    ui.add_space(8.0);
    ui.separator();

    if let Some(action) = render_alarm_list(ui, app.manager.alarms()) {
        match action {
            AlarmAction::Cancel(id) => app.cancel_alarm(id),
            AlarmAction::Dismiss(id) => app.dismiss_alarm(id),
        }
    }
}

fn render_input(ui: &mut egui::Ui, app: &mut AlarmApp) {
    ui.label(app.mode.input_prompt());

    let (text, hint) = match app.mode {
        AlarmMode::AbsoluteTime => (&mut app.time_input, "07:30:00"),
        AlarmMode::RelativeMinutes => (&mut app.minutes_input, "0.5"),
    };

    let edit = egui::TextEdit::singleline(text)
        .hint_text(hint)
        .horizontal_align(egui::Align::Center)
        .desired_width(160.0);
    let response = ui.add(edit);

    // Keep typing focus on the entry unless some other widget has it
    if !app.show_settings && app.notice.is_none() && ui.memory(|m| m.focused().is_none()) {
        response.request_focus();
    }
}

fn render_countdown(ui: &mut egui::Ui, app: &AlarmApp) {
    let display = app
        .manager
        .soonest_pending()
        .map(|alarm| alarm.display.clone())
        .unwrap_or_else(|| app.last_countdown.clone());

    ui.label(
        RichText::new(display)
            .monospace()
            .strong()
            .size(app.settings.ui.font_size + 6.0)
            .color(COUNTDOWN_COLOR),
    );
}

fn render_alarm_list(ui: &mut egui::Ui, alarms: &[Alarm]) -> Option<AlarmAction> {
    if alarms.is_empty() {
        ui.label(RichText::new("No alarms set").weak());
        return None;
    }

    let mut action = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("alarm_list_grid")
            .num_columns(4)
            .spacing([16.0, 4.0])
            .show(ui, |ui| {
                for alarm in alarms {
                    let (status_text, status_color) = alarm.phase.status_text();

                    ui.label(alarm.label());
                    ui.label(RichText::new(&alarm.display).monospace());
                    ui.label(RichText::new(status_text).color(status_color_to_color32(status_color)));

                    if alarm.phase.can_advance_to(AlarmPhase::Cancelled) {
                        if ui.small_button("Cancel").clicked() {
                            action = Some(AlarmAction::Cancel(alarm.id));
                        }
                    } else if alarm.phase.can_advance_to(AlarmPhase::Dismissed) {
                        if ui.small_button("Dismiss").clicked() {
                            action = Some(AlarmAction::Dismiss(alarm.id));
                        }
                    } else {
                        ui.label("");
                    }
                    ui.end_row();
                }
            });
    });
    action
}

fn status_color_to_color32(color: StatusColor) -> Color32 {
    match color {
        StatusColor::Gray => Color32::GRAY,
        StatusColor::LightBlue => Color32::LIGHT_BLUE,
        StatusColor::Orange => Color32::from_rgb(255, 165, 0),
        StatusColor::Red => Color32::from_rgb(230, 60, 60),
    }
}
