//! Viewer configuration, persisted as RON
//!
//! Missing file means defaults. A file that doesn't parse is reported and
//! replaced by defaults for the session; it is overwritten on exit.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rasterizer::RasterSettings;

/// Camera and drag tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    /// Camera travel in units per second
    pub move_speed: f32,
    /// Arrow-key turn rate in degrees per second
    pub turn_speed: f32,
    /// Degrees of yaw/pitch per pixel of right-drag
    pub look_sensitivity: f32,
    /// Radians of object rotation per pixel of left-drag
    pub rotate_sensitivity: f32,
    /// Nominal seconds per update tick
    pub timestep: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            move_speed: 2.5,
            turn_speed: 100.0,
            look_sensitivity: 0.1,
            rotate_sensitivity: 0.005,
            timestep: 0.016,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_width: u32,
    pub window_height: u32,
    /// Framebuffer resolution relative to the window
    pub render_scale: f32,
    pub model_path: PathBuf,
    pub export_path: PathBuf,
    pub controls: ControlSettings,
    /// Render options from the panel, saved on exit
    pub view: RasterSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            render_scale: 0.5,
            model_path: PathBuf::from("pig.obj"),
            export_path: PathBuf::from("modelo_modificado.obj"),
            controls: ControlSettings::default(),
            view: RasterSettings::default(),
        }
    }
}

impl ViewerConfig {
    pub const RENDER_SCALE_RANGE: (f32, f32) = (0.1, 1.0);

    /// `<config dir>/mesh-viewer/viewer.ron`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mesh-viewer")
            .join("viewer.ron")
    }

    #[cfg(target_arch = "wasm32")]
    pub fn default_path() -> PathBuf {
        PathBuf::from("viewer.ron")
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let mut config: Self = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.sanitize();
        Ok(config)
    }

    /// Like `load`, but any failure is logged and replaced by defaults
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        let text = ron::ser::to_string_pretty(self, pretty)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pull hand-edited values back into the ranges the panel allows
    pub fn sanitize(&mut self) {
        let (lo, hi) = Self::RENDER_SCALE_RANGE;
        self.render_scale = if self.render_scale.is_finite() {
            self.render_scale.clamp(lo, hi)
        } else {
            ViewerConfig::default().render_scale
        };
        self.window_width = self.window_width.max(320);
        self.window_height = self.window_height.max(240);

        let (lo, hi) = RasterSettings::POINT_SIZE_RANGE;
        self.view.point_size = self.view.point_size.clamp(lo, hi);
        let (lo, hi) = RasterSettings::NORMAL_LENGTH_RANGE;
        self.view.normal_length_percent = self.view.normal_length_percent.clamp(lo, hi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::Color;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig::load(&dir.path().join("nope.ron")).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("viewer.ron");

        let mut config = ViewerConfig::default();
        config.view.show_wireframe = true;
        config.view.background = Color::new(0.2, 0.3, 0.4);
        config.controls.move_speed = 4.0;
        config.save(&path).unwrap();

        let loaded = ViewerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.ron");
        std::fs::write(&path, "(render_scale: 0.75, view: (show_points: true))").unwrap();

        let config = ViewerConfig::load(&path).unwrap();
        assert_eq!(config.render_scale, 0.75);
        assert!(config.view.show_points);
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.view.point_size, 3.0);
    }

    #[test]
    fn test_garbage_is_parse_error_and_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.ron");
        std::fs::write(&path, "not ron at all {").unwrap();

        assert!(matches!(ViewerConfig::load(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(ViewerConfig::load_or_default(&path), ViewerConfig::default());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.ron");
        std::fs::write(&path, "(render_scale: 9.0, view: (point_size: 99.0))").unwrap();

        let config = ViewerConfig::load(&path).unwrap();
        assert_eq!(config.render_scale, 1.0);
        assert_eq!(config.view.point_size, 20.0);
    }
}
