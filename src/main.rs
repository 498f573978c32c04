mod alarm;
mod app;
mod config;
mod messages;
mod state;
mod ui;

use anyhow::Context as _;
use app::AlarmApp;
use config::AppSettings;

#[cfg(debug_assertions)]
const LOG_LEVEL: log::LevelFilter = log::LevelFilter::Debug;
#[cfg(not(debug_assertions))]
const LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(LOG_LEVEL)
        .with_module_level("eframe", log::LevelFilter::Info)
        .with_module_level("egui_glow", log::LevelFilter::Info)
        .with_module_level("egui_winit", log::LevelFilter::Info)
        .env()
        .init()
        .context("failed to initialize logger")?;

    let loaded = AppSettings::load_with_notice();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Alarm Clock")
            .with_inner_size([380.0, 420.0])
            .with_min_inner_size([320.0, 330.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Alarm Clock",
        options,
        Box::new(|cc| Ok(Box::new(AlarmApp::new(cc, loaded)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to launch Alarm Clock window: {err}"))?;

    log::info!("Alarm Clock exited");
    Ok(())
}
