//! Rutile studio: a window with a docked egui layout whose central panel shows
//! an offscreen-rendered scene driven by a fly camera.

mod app;
mod camera_control;
mod config;
mod overlay;
mod scene;

use anyhow::Result;
use rutile_engine::logging::{init_logging, LoggingConfig};
use rutile_engine::window::Runtime;

use crate::app::StudioApp;
use crate::config::ShellConfig;

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(err) = run(ShellConfig::default()) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(config: ShellConfig) -> Result<()> {
    log::info!("starting {}", config.title);
    Runtime::run(config.runtime(), config.gpu_init(), StudioApp::new(config))
}
