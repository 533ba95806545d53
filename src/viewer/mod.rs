//! Viewer controller
//!
//! Owns the geometry, transforms, renderer and picker, turns input events
//! into camera/selection/edit changes and drives update and render once
//! per frame. Everything runs on the frame loop thread.

mod export;
mod input;

pub use export::{export_obj, material_name, mtl_path_for, ExportSummary};
pub use input::{DragMode, HeldKeys, InputEvent, Key, MouseButton};

use std::path::{Path, PathBuf};

use crate::config::{ControlSettings, ViewerConfig};
use crate::error::{ExportError, LoadError, SetupError, StatusMessage};
use crate::import;
use crate::pick::PickEngine;
use crate::rasterizer::{Framebuffer, RasterSettings, Renderer};
use crate::scene::{GeometryStore, Motion, SubMesh, TransformModel};

/// Per-frame hook points driven by the frame loop
pub trait FrameHooks {
    fn handle_event(&mut self, event: InputEvent);
    /// One fixed-timestep simulation tick
    fn update(&mut self);
    /// Draw the frame into the surface
    fn render(&mut self);
}

pub struct ViewerController {
    store: GeometryStore,
    transforms: TransformModel,
    renderer: Renderer,
    picker: PickEngine,
    pub settings: RasterSettings,
    pub controls: ControlSettings,
    selected: Option<usize>,

    held: HeldKeys,
    drag: DragMode,
    look_held: bool,
    last_cursor: (f32, f32),
    window_size: (u32, u32),
    render_scale: f32,
    /// Set by the panel each frame while the cursor is over it
    pub pointer_captured: bool,

    pub model_path: PathBuf,
    pub export_path: PathBuf,
    status: Option<StatusMessage>,
    should_close: bool,
}

impl ViewerController {
    pub fn new(config: &ViewerConfig) -> Result<Self, SetupError> {
        let scale = config.render_scale;
        let (w, h) = surface_size(config.window_width, config.window_height, scale);
        let renderer = Renderer::new(w, h)?;

        Ok(Self {
            store: GeometryStore::default(),
            transforms: TransformModel::new(),
            renderer,
            picker: PickEngine::new(),
            settings: config.view.clone(),
            controls: config.controls.clone(),
            selected: None,
            held: HeldKeys::default(),
            drag: DragMode::None,
            look_held: false,
            last_cursor: (0.0, 0.0),
            window_size: (config.window_width, config.window_height),
            render_scale: scale,
            pointer_captured: false,
            model_path: config.model_path.clone(),
            export_path: config.export_path.clone(),
            status: None,
            should_close: false,
        })
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Replace the current model. On failure nothing changes.
    pub fn load_model(&mut self, path: &Path) -> Result<(), LoadError> {
        let imported = import::load_obj(path)?;
        let store = GeometryStore::load(&imported)?;

        self.transforms
            .set_model_frame(store.center(), store.normalization_scale());
        self.renderer.upload(&store, self.settings.normal_length_percent);
        self.store = store;
        self.selected = None;
        self.drag = DragMode::None;
        self.reset_view();

        let (lo, hi) = self.store.bounds();
        log::info!(
            "Loaded {}: {} parts, {} triangles, bounds {:?}..{:?}, normalization scale {:.4}",
            path.display(),
            self.store.submesh_count(),
            self.store.triangle_count(),
            lo.to_array(),
            hi.to_array(),
            self.store.normalization_scale()
        );
        Ok(())
    }

    /// Load and report the outcome in the status line
    pub fn load_and_report(&mut self, path: &Path) {
        match self.load_model(path) {
            Ok(()) => {
                self.model_path = path.to_path_buf();
                self.status = Some(StatusMessage::info(format!(
                    "Model loaded ({} parts)",
                    self.store.submesh_count()
                )));
            }
            Err(e) => {
                log::warn!("Load failed: {}", e);
                self.status = Some(StatusMessage::error(e.to_string()));
            }
        }
    }

    pub fn export(&self, path: &Path) -> Result<ExportSummary, ExportError> {
        export_obj(path, &self.store, &self.transforms)
    }

    /// Export and report the outcome in the status line
    pub fn export_and_report(&mut self) {
        let path = self.export_path.clone();
        match self.export(&path) {
            Ok(summary) => {
                self.status = Some(StatusMessage::info(format!(
                    "Exported {} parts to {}",
                    summary.groups,
                    path.display()
                )));
            }
            Err(e) => {
                log::warn!("Export failed: {}", e);
                self.status = Some(StatusMessage::warning(e.to_string()));
            }
        }
    }

    pub fn reset_view(&mut self) {
        self.transforms.reset_view();
        log::debug!("View and object reset");
    }

    pub fn center_object(&mut self) {
        self.transforms.center_object();
    }

    /// Soft delete: hide the selected sub-mesh and drop the selection
    pub fn delete_selected(&mut self) {
        if let Some(sub) = self.selected.and_then(|i| self.store.submesh_mut(i)) {
            sub.visible = false;
            log::info!("Hid sub-mesh '{}'", sub.name);
        }
        self.selected = None;
    }

    /// Change the normal length and rebuild the normal-line buffer if it moved
    pub fn set_normal_length_percent(&mut self, percent: f32) {
        let (lo, hi) = RasterSettings::NORMAL_LENGTH_RANGE;
        let percent = percent.clamp(lo, hi);
        if percent != self.settings.normal_length_percent {
            self.settings.normal_length_percent = percent;
            self.renderer.regenerate_normals(&self.store, percent);
        }
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.store.submesh_count());
        self.settings.show_bounding_box = self.selected.is_some();
    }

    // =========================================================================
    // Accessors for the panel and the presenter
    // =========================================================================

    pub fn store(&self) -> &GeometryStore {
        &self.store
    }

    pub fn transforms(&self) -> &TransformModel {
        &self.transforms
    }

    pub fn transforms_mut(&mut self) -> &mut TransformModel {
        &mut self.transforms
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_submesh_mut(&mut self) -> Option<&mut SubMesh> {
        self.selected.and_then(|i| self.store.submesh_mut(i))
    }

    pub fn surface(&self) -> &Framebuffer {
        self.renderer.surface()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn drag_mode(&self) -> DragMode {
        self.drag
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Leave the frame loop after the current frame
    pub fn request_close(&mut self) {
        if !self.should_close {
            log::info!("Close requested");
        }
        self.should_close = true;
    }

    /// Release renderer resources ahead of teardown
    pub fn shutdown(&mut self) {
        self.renderer.release();
    }

    // =========================================================================
    // Input handling
    // =========================================================================

    /// Window pixel to surface pixel (both top-down)
    fn to_surface(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        let fb = self.renderer.surface();
        let (ww, wh) = self.window_size;
        if x < 0.0 || y < 0.0 || ww == 0 || wh == 0 {
            return None;
        }
        let sx = (x * fb.width as f32 / ww as f32) as usize;
        let sy = (y * fb.height as f32 / wh as f32) as usize;
        Some((sx, sy))
    }

    fn on_mouse_button(&mut self, button: MouseButton, pressed: bool, x: f32, y: f32) {
        if !pressed {
            // Release always ends a rotation drag, even over the panel
            match button {
                MouseButton::Left => self.drag = DragMode::None,
                MouseButton::Right => self.look_held = false,
                MouseButton::Middle => {}
            }
            return;
        }

        if self.pointer_captured {
            return;
        }
        self.last_cursor = (x, y);

        match button {
            MouseButton::Left => {
                let hit = self.to_surface(x, y).and_then(|(sx, sy)| {
                    self.picker.pick(
                        &mut self.renderer,
                        &self.store,
                        &self.transforms,
                        &self.settings,
                        sx,
                        sy,
                    )
                });
                match hit {
                    Some(index) => {
                        self.select(Some(index));
                        self.drag = DragMode::None;
                        log::debug!("Selected sub-mesh {} '{}'", index, self.store.submeshes()[index].name);
                    }
                    None => {
                        self.select(None);
                        self.drag = DragMode::RotateObject;
                    }
                }
            }
            MouseButton::Right => self.look_held = true,
            MouseButton::Middle => {}
        }
    }

    fn on_cursor_moved(&mut self, x: f32, y: f32) {
        let dx = x - self.last_cursor.0;
        let dy = y - self.last_cursor.1;
        if self.drag == DragMode::RotateObject {
            self.transforms
                .rotate_object(dx, dy, self.controls.rotate_sensitivity);
        } else if self.look_held {
            self.transforms.look(dx, dy, self.controls.look_sensitivity);
        }
        self.last_cursor = (x, y);
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.window_size = (width, height);
        let (w, h) = surface_size(width, height, self.render_scale);
        self.renderer.resize(w, h);
    }
}

/// Framebuffer dimensions for a window size and render scale
fn surface_size(width: u32, height: u32, scale: f32) -> (usize, usize) {
    let w = ((width as f32 * scale) as usize).max(1);
    let h = ((height as f32 * scale) as usize).max(1);
    (w, h)
}

impl FrameHooks for ViewerController {
    fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key { key: Key::Escape, pressed: true } => self.request_close(),
            InputEvent::Key { key, pressed } => {
                self.held.set(key, pressed);
            }
            InputEvent::MouseButton { button, pressed, x, y } => self.on_mouse_button(button, pressed, x, y),
            InputEvent::CursorMoved { x, y } => self.on_cursor_moved(x, y),
            InputEvent::Resized { width, height } => self.on_resize(width, height),
            InputEvent::CloseRequested => self.request_close(),
        }
    }

    fn update(&mut self) {
        let motion = Motion {
            forward: self.held.up,
            back: self.held.down,
            turn_left: self.held.left,
            turn_right: self.held.right,
        };
        let c = &self.controls;
        self.transforms
            .update_camera(motion, c.move_speed, c.turn_speed, c.timestep);
    }

    fn render(&mut self) {
        self.renderer
            .render(&self.store, &self.transforms, &self.settings, self.selected);
    }
}

impl Drop for ViewerController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::{mat4_mul, mat4_transform_vec4};
    use crate::rasterizer::Color;

    const QUADS_OBJ: &str = "mtllib parts.mtl\n\
        v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
        v 1.5 0 0\nv 2.5 0 0\nv 2.5 1 0\nv 1.5 1 0\n\
        v 3 0 0\nv 4 0 0\nv 4 1 0\nv 3 1 0\n\
        g left\nusemtl Red\nf 1 2 3 4\n\
        g middle\nf 5 6 7 8\n\
        g right\nusemtl Blue\nf 9 10 11 12\n";

    const PARTS_MTL: &str = "newmtl Red\nKd 1 0 0\nnewmtl Blue\nKd 0 0 1\n";

    fn config() -> ViewerConfig {
        ViewerConfig {
            window_width: 320,
            window_height: 240,
            render_scale: 0.5,
            ..ViewerConfig::default()
        }
    }

    fn loaded_viewer(dir: &tempfile::TempDir) -> ViewerController {
        let obj = dir.path().join("parts.obj");
        std::fs::write(&obj, QUADS_OBJ).unwrap();
        std::fs::write(dir.path().join("parts.mtl"), PARTS_MTL).unwrap();
        let mut viewer = ViewerController::new(&config()).unwrap();
        viewer.load_model(&obj).unwrap();
        viewer
    }

    /// Window pixel over the center of sub-mesh `i`
    fn window_pos(v: &ViewerController, i: usize) -> (f32, f32) {
        let sub = &v.store().submeshes()[i];
        let t = v.transforms();
        let aspect = v.surface().aspect();
        let mvp = mat4_mul(
            &t.projection_matrix(aspect),
            &mat4_mul(&t.view_matrix(), &t.submesh_matrix(sub.local_position)),
        );
        let c = sub.center();
        let clip = mat4_transform_vec4(&mvp, [c.x, c.y, c.z, 1.0]);
        let x = (clip[0] / clip[3] + 1.0) * 0.5 * 320.0;
        let y = (1.0 - (clip[1] / clip[3] + 1.0) * 0.5) * 240.0;
        (x, y)
    }

    fn click(v: &mut ViewerController, x: f32, y: f32) {
        v.handle_event(InputEvent::MouseButton { button: MouseButton::Left, pressed: true, x, y });
    }

    #[test]
    fn test_load_resolves_materials() {
        let dir = tempfile::tempdir().unwrap();
        let v = loaded_viewer(&dir);
        let subs = v.store().submeshes();
        assert_eq!(subs.len(), 3);
        assert_eq!(subs[0].color, Color::RED);
        assert_eq!(subs[1].color, Color::DEFAULT_GRAY);
        assert_eq!(subs[2].color, Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_failed_load_keeps_previous_model() {
        let dir = tempfile::tempdir().unwrap();
        let mut v = loaded_viewer(&dir);
        v.select(Some(1));

        let bad = dir.path().join("bad.obj");
        std::fs::write(&bad, "v 0 0 0\nf 1 2 3\n").unwrap();
        assert!(matches!(v.load_model(&bad), Err(LoadError::MalformedGeometry { .. })));
        assert_eq!(v.store().submesh_count(), 3);
        assert_eq!(v.selected(), Some(1));

        v.load_and_report(&dir.path().join("missing.obj"));
        assert_eq!(v.status().map(|s| s.severity), Some(crate::error::Severity::Error));
        assert_eq!(v.store().submesh_count(), 3);
    }

    #[test]
    fn test_click_selects_and_miss_starts_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let mut v = loaded_viewer(&dir);

        let (x, y) = window_pos(&v, 2);
        click(&mut v, x, y);
        assert_eq!(v.selected(), Some(2));
        assert!(v.settings.show_bounding_box);
        assert_eq!(v.drag_mode(), DragMode::None);

        click(&mut v, 2.0, 2.0);
        assert_eq!(v.selected(), None);
        assert!(!v.settings.show_bounding_box);
        assert_eq!(v.drag_mode(), DragMode::RotateObject);

        let before = v.transforms().object.rotation;
        v.handle_event(InputEvent::CursorMoved { x: 40.0, y: 2.0 });
        assert_ne!(v.transforms().object.rotation, before);

        v.handle_event(InputEvent::MouseButton { button: MouseButton::Left, pressed: false, x: 40.0, y: 2.0 });
        assert_eq!(v.drag_mode(), DragMode::None);
    }

    #[test]
    fn test_captured_pointer_ignores_press() {
        let dir = tempfile::tempdir().unwrap();
        let mut v = loaded_viewer(&dir);
        v.pointer_captured = true;
        let (x, y) = window_pos(&v, 0);
        click(&mut v, x, y);
        assert_eq!(v.selected(), None);
        assert_eq!(v.drag_mode(), DragMode::None);
    }

    #[test]
    fn test_delete_hides_and_unpicks() {
        let dir = tempfile::tempdir().unwrap();
        let mut v = loaded_viewer(&dir);
        let (x, y) = window_pos(&v, 1);
        click(&mut v, x, y);
        assert_eq!(v.selected(), Some(1));

        v.delete_selected();
        assert_eq!(v.selected(), None);
        assert!(!v.store().submeshes()[1].visible);

        click(&mut v, x, y);
        assert_ne!(v.selected(), Some(1));
    }

    #[test]
    fn test_right_drag_looks_and_clamps() {
        let dir = tempfile::tempdir().unwrap();
        let mut v = loaded_viewer(&dir);
        v.handle_event(InputEvent::MouseButton { button: MouseButton::Right, pressed: true, x: 100.0, y: 100.0 });
        v.handle_event(InputEvent::CursorMoved { x: 100.0, y: -2000.0 });
        assert_eq!(v.transforms().camera.pitch, 89.0);
        v.handle_event(InputEvent::MouseButton { button: MouseButton::Right, pressed: false, x: 100.0, y: -2000.0 });
        v.handle_event(InputEvent::CursorMoved { x: 100.0, y: 500.0 });
        assert_eq!(v.transforms().camera.pitch, 89.0);
    }

    #[test]
    fn test_held_keys_drive_update() {
        let dir = tempfile::tempdir().unwrap();
        let mut v = loaded_viewer(&dir);
        v.handle_event(InputEvent::Key { key: Key::Up, pressed: true });
        v.update();
        v.update();
        assert!((v.transforms().camera.position.z + 0.08).abs() < 1e-5);

        v.handle_event(InputEvent::Key { key: Key::Up, pressed: false });
        v.update();
        assert!((v.transforms().camera.position.z + 0.08).abs() < 1e-5);
    }

    #[test]
    fn test_escape_and_close_request() {
        let mut v = ViewerController::new(&config()).unwrap();
        assert!(!v.should_close());
        v.handle_event(InputEvent::Key { key: Key::Escape, pressed: true });
        assert!(v.should_close());

        let mut v = ViewerController::new(&config()).unwrap();
        v.handle_event(InputEvent::CloseRequested);
        assert!(v.should_close());
    }

    #[test]
    fn test_resize_updates_surface() {
        let mut v = ViewerController::new(&config()).unwrap();
        v.handle_event(InputEvent::Resized { width: 800, height: 600 });
        assert_eq!((v.surface().width, v.surface().height), (400, 300));
    }

    #[test]
    fn test_normal_length_change_regenerates() {
        let dir = tempfile::tempdir().unwrap();
        let mut v = loaded_viewer(&dir);
        v.set_normal_length_percent(0.2);
        let expected = v.store().diagonal() * 0.2;
        assert!((v.renderer.buffers().normal_length() - expected).abs() < 1e-6);
        v.set_normal_length_percent(5.0);
        assert_eq!(v.settings.normal_length_percent, 0.5);
    }

    #[test]
    fn test_render_after_pick_shows_background() {
        let dir = tempfile::tempdir().unwrap();
        let mut v = loaded_viewer(&dir);
        click(&mut v, 1.0, 1.0);
        v.render();
        let bg = v.settings.background.to_bytes();
        assert_eq!(v.surface().read_pixel(0, v.surface().height - 1), Some(bg));
    }
}
