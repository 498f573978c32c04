use egui::Key;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::alarm::{AlarmManager, AlarmMode, AlarmRequest, Clock, LocalClock, Waker};
use crate::config::{AppSettings, SettingsLoadResult};
use crate::messages::AlarmId;
use crate::ui::{
    render_alert_window, render_main_panel, render_notice_dialog, render_settings_panel, Notice,
};

/// Fallback repaint rate while alarms are pending, in case a wake-up is missed
const IDLE_REPAINT: Duration = Duration::from_secs(1);

pub struct AlarmApp {
    pub settings: AppSettings,
    pub mode: AlarmMode,
    pub time_input: String,
    pub minutes_input: String,
    pub manager: AlarmManager,
    /// Shown once no alarm is counting down
    pub last_countdown: String,

    // UI state
    pub notice: Option<Notice>,
    pub settings_notice: Option<String>,
    pub show_settings: bool,
    settings_changed: bool,

    /// Alerts that have already grabbed focus
    focused_alerts: HashSet<AlarmId>,
}

impl AlarmApp {
    pub fn new(cc: &eframe::CreationContext<'_>, loaded: SettingsLoadResult) -> Self {
        let repaint_ctx = cc.egui_ctx.clone();
        let waker: Waker = Arc::new(move || repaint_ctx.request_repaint());
        Self::with_clock(loaded, Arc::new(LocalClock), waker)
    }

    fn with_clock(loaded: SettingsLoadResult, clock: Arc<dyn Clock>, waker: Waker) -> Self {
        let settings = loaded.settings;
        let manager = AlarmManager::new(clock, settings.timing.poll_interval(), waker);

        Self {
            mode: settings.ui.default_mode,
            settings,
            time_input: String::new(),
            minutes_input: String::new(),
            manager,
            last_countdown: String::new(),
            notice: None,
            settings_notice: loaded.notice,
            show_settings: false,
            settings_changed: false,
            focused_alerts: HashSet::new(),
        }
    }

    fn current_input(&self) -> &str {
        match self.mode {
            AlarmMode::AbsoluteTime => &self.time_input,
            AlarmMode::RelativeMinutes => &self.minutes_input,
        }
    }

    /// Arm an alarm from the current mode and input, reporting the outcome
    pub fn set_alarm(&mut self) {
        self.last_countdown.clear();

        let result = AlarmRequest::parse(self.mode, self.current_input())
            .and_then(|request| self.manager.arm(request).map(|_| request));

        self.notice = Some(match result {
            Ok(request) => Notice::info(request.confirmation()),
            Err(e) => {
                log::warn!("Alarm not set: {:?}", e);
                Notice::warning(e.to_string())
            }
        });
    }

    pub fn cancel_alarm(&mut self, id: AlarmId) {
        self.manager.cancel(id);
    }

    pub fn dismiss_alarm(&mut self, id: AlarmId) {
        if self.manager.dismiss(id) {
            self.focused_alerts.remove(&id);
        }
    }

    fn process_alarm_events(&mut self) {
        let started = self.manager.process_events();
        if !started.is_empty() {
            self.last_countdown = crate::alarm::countdown::EXPIRED_DISPLAY.to_string();
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if self.show_settings {
            return;
        }

        // Enter - acknowledge an open notice, otherwise set the alarm
        if ctx.input(|i| i.key_pressed(Key::Enter)) {
            if self.notice.is_some() {
                self.notice = None;
            } else {
                self.set_alarm();
            }
        }
    }

    fn apply_settings_changes(&mut self) {
        if self.settings_changed {
            self.manager
                .set_poll_interval(self.settings.timing.poll_interval());

            if let Err(e) = self.settings.save() {
                log::error!("Failed to save settings: {}", e);
            }

            self.settings_changed = false;
        }
    }

    fn show_alerts(&mut self, ctx: &egui::Context) {
        let ringing: Vec<(AlarmId, String)> = self
            .manager
            .ringing()
            .map(|alarm| (alarm.id, alarm.label()))
            .collect();

        for (id, label) in ringing {
            // Grab focus on the first frame only
            let request_focus = self.focused_alerts.insert(id);
            if render_alert_window(ctx, id, &label, &self.settings.alert, request_focus) {
                self.dismiss_alarm(id);
            }
        }
    }
}

impl eframe::App for AlarmApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size
        ctx.style_mut(|style| {
            style.text_styles.iter_mut().for_each(|(_, font_id)| {
                font_id.size = self.settings.ui.font_size;
            });
        });

        // Pick up countdown and expiry updates from the timers
        self.process_alarm_events();

        // Handle keyboard input
        self.handle_keyboard(ctx);

        // Apply any settings changes
        self.apply_settings_changes();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings").clicked() {
                        self.show_settings = !self.show_settings;
                        ui.close();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Settings window (separate OS window)
        if self.show_settings {
            let settings = &mut self.settings;
            let settings_changed = &mut self.settings_changed;
            let show_settings = &mut self.show_settings;

            ctx.show_viewport_immediate(
                egui::ViewportId::from_hash_of("settings_viewport"),
                egui::ViewportBuilder::default()
                    .with_title("Settings")
                    .with_inner_size([420.0, 360.0]),
                |ctx, _class| {
                    egui::CentralPanel::default().show(ctx, |ui| {
                        render_settings_panel(ui, settings, settings_changed);
                    });

                    if ctx.input(|i| i.viewport().close_requested()) {
                        *show_settings = false;
                    }
                },
            );
        }

        // One alert window per ringing alarm
        self.show_alerts(ctx);

        render_notice_dialog(ctx, &mut self.notice);

        // Main content, inert while a notice is waiting for OK
        let panel_enabled = self.notice.is_none();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(panel_enabled, |ui| render_main_panel(ui, self));
        });

        // Timers wake us on every change; this only covers missed wake-ups
        if !self.manager.is_empty() {
            ctx.request_repaint_after(IDLE_REPAINT);
        }
    }
}
