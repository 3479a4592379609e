#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::PathBuf;

use clap::Parser;
use eframe::NativeOptions;
use tokio::runtime::Runtime;

use series_sync::config::APP_STATE_PATH;
use series_sync::ui::config::UI_TEXT;
use series_sync::{Cli, fetch_initial_table, run_app};

fn main() -> eframe::Result {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Initial table (blocking). Without a runtime the app simply starts empty.
    let initial = match Runtime::new() {
        Ok(rt) => rt.block_on(fetch_initial_table(&args)),
        Err(e) => {
            log::error!("Failed to create Tokio runtime, skipping initial load: {}", e);
            None
        }
    };

    // D. Run Native App
    let options = NativeOptions {
        persistence_path: Some(PathBuf::from(APP_STATE_PATH)),
        ..Default::default()
    };

    eframe::run_native(
        UI_TEXT.window_title,
        options,
        Box::new(move |cc| Ok(run_app(cc, initial))),
    )
}
