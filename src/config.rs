use crate::alarm::AlarmMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MIN_POLL_INTERVAL_MS: u64 = 10;
pub const MAX_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub alert: AlertSettings,
    #[serde(default)]
    pub timing: TimingSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Mode selected when the app starts
    #[serde(default)]
    pub default_mode: AlarmMode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlertSettings {
    #[serde(default = "default_alert_message")]
    pub message: String,
    #[serde(default = "default_dismiss_label")]
    pub dismiss_label: String,
    #[serde(default = "default_true")]
    pub fullscreen: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Upper bound on how long a timer sleeps between clock checks
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_font_size() -> f32 {
    14.0
}

fn default_alert_message() -> String {
    "Timer Finished".to_string()
}

fn default_dismiss_label() -> String {
    "Dismiss Alarm".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            default_mode: AlarmMode::default(),
        }
    }
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            message: default_alert_message(),
            dismiss_label: default_dismiss_label(),
            fullscreen: true,
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl TimingSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(
            self.poll_interval_ms
                .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS),
        )
    }
}

pub struct SettingsLoadResult {
    pub settings: AppSettings,
    pub notice: Option<String>,
}

impl AppSettings {
    /// Get the default config file path
    pub fn config_path() -> std::path::PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("alarm_clock").join("settings.toml")
        } else {
            std::path::PathBuf::from("settings.toml")
        }
    }

    /// Load settings from the default config path, or return defaults if not found
    pub fn load_with_notice() -> SettingsLoadResult {
        Self::load_with_notice_from(&Self::config_path())
    }

    fn load_with_notice_from(path: &std::path::Path) -> SettingsLoadResult {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                SettingsLoadResult {
                    settings,
                    notice: None,
                }
            }
            Err(e) => {
                let mut notice = None;
                if path.exists() {
                    log::warn!("Unable to read settings at {}: {}", path.display(), e);
                    notice = Some(match backup_settings_file(path) {
                        Some(backup_path) => format!(
                            "Settings file was reset due to an incompatible format. Backup saved to {}",
                            backup_path.display()
                        ),
                        None => {
                            "Settings file was reset due to an incompatible format.".to_string()
                        }
                    });
                } else {
                    log::debug!("No settings at {}, using defaults", path.display());
                }

                SettingsLoadResult {
                    settings: Self::default(),
                    notice,
                }
            }
        }
    }

    pub fn load(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::config_path())
    }

    fn save_to(&self, path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }
}

fn backup_settings_file(path: &std::path::Path) -> Option<std::path::PathBuf> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())?;
    let file_name = path.file_name()?.to_string_lossy();
    let backup_name = format!("{}.bak.{}", file_name, timestamp);
    let backup_path = path.with_file_name(backup_name);
    match std::fs::rename(path, &backup_path) {
        Ok(()) => {
            log::info!("Backed up settings to {}", backup_path.display());
            Some(backup_path)
        }
        Err(e) => {
            log::warn!("Failed to back up settings: {}", e);
            None
        }
    }
}
