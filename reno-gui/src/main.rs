#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use anyhow::{Context, Result};
use reno_core::{get_config_path, Config};

fn load_config() -> Result<Config> {
    let path = get_config_path()?;
    Config::load(&path).with_context(|| format!("Cannot start without configuration ({:?})", path))
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    // A missing or unreadable config is fatal: no partial UI is shown.
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("reno-gui: {:#}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Reno",
        options,
        Box::new(move |cc| Ok(Box::new(app::RenoApp::new(cc, config)))),
    )
}
