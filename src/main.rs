//! Mesh Viewer: interactive Wavefront OBJ viewer
//!
//! Loads a model, normalizes it into view and renders it with a software
//! rasterizer:
//! - Fill, wireframe, point and normal display modes
//! - Click-to-pick sub-meshes with a color-ID pass
//! - Per-part color, offset and visibility edits
//! - Export of the edited model back to OBJ/MTL

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod config;
mod error;
mod import;
mod panel;
mod pick;
mod rasterizer;
mod scene;
mod ui;
mod viewer;

use std::path::PathBuf;

use clap::Parser;
use macroquad::prelude::*;

use config::ViewerConfig;
use viewer::ViewerController;

#[derive(Parser, Debug)]
#[command(name = "mesh-viewer")]
#[command(about = "Interactive OBJ viewer with sub-mesh picking and editing")]
struct Cli {
    /// OBJ file to open at startup (defaults to the configured model path)
    model: Option<PathBuf>,

    /// Settings file to read and write back on exit
    #[arg(long)]
    config: Option<PathBuf>,

    /// Framebuffer resolution relative to the window (0.1 - 1.0)
    #[arg(long)]
    render_scale: Option<f32>,
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(ViewerConfig::default_path)
    }

    /// Effective settings for this run: the file's values plus overrides
    fn apply_overrides(&self, mut config: ViewerConfig) -> ViewerConfig {
        if let Some(scale) = self.render_scale {
            config.render_scale = scale;
        }
        if let Some(model) = &self.model {
            config.model_path = model.clone();
        }
        config.sanitize();
        config
    }
}

fn window_conf() -> Conf {
    // Runs before logging is up, so read the settings quietly
    let cli = Cli::parse();
    let config = ViewerConfig::load(&cli.config_path()).unwrap_or_default();

    Conf {
        window_title: format!("Mesh Viewer v{}", VERSION),
        window_width: config.window_width as i32,
        window_height: config.window_height as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config_path = cli.config_path();
    let stored = ViewerConfig::load_or_default(&config_path);
    let config = cli.apply_overrides(stored.clone());
    log::info!("Settings from {}", config_path.display());

    let mut viewer = match ViewerController::new(&config) {
        Ok(viewer) => viewer,
        Err(e) => {
            log::error!("Failed to set up the viewer: {}", e);
            return;
        }
    };

    viewer.load_and_report(&config.model_path);

    app::run(&mut viewer).await;

    // Command-line overrides are not persisted
    let mut saved = stored;
    saved.view = viewer.settings.clone();
    saved.model_path = viewer.model_path.clone();
    saved.export_path = viewer.export_path.clone();
    if let Err(e) = saved.save(&config_path) {
        log::warn!("Could not save settings: {}", e);
    }

    viewer.shutdown();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_do_not_touch_other_fields() {
        let cli = Cli::parse_from(["mesh-viewer", "--render-scale", "0.25", "model.obj"]);
        let config = cli.apply_overrides(ViewerConfig::default());
        assert_eq!(config.render_scale, 0.25);
        assert_eq!(config.model_path, PathBuf::from("model.obj"));
        assert_eq!(config.export_path, ViewerConfig::default().export_path);
    }

    #[test]
    fn test_cli_render_scale_is_clamped() {
        let cli = Cli::parse_from(["mesh-viewer", "--render-scale", "4.0"]);
        let config = cli.apply_overrides(ViewerConfig::default());
        assert_eq!(config.render_scale, ViewerConfig::RENDER_SCALE_RANGE.1);
    }

    #[test]
    fn test_explicit_config_path() {
        let cli = Cli::parse_from(["mesh-viewer", "--config", "/tmp/v.ron"]);
        assert_eq!(cli.config_path(), PathBuf::from("/tmp/v.ron"));
    }
}
