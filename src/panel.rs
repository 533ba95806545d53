//! Parameter panel
//!
//! Overlay drawn over the 3D view every frame. Edits flow straight into the
//! viewer's settings, transforms and selected sub-mesh.

use crate::error::Severity;
use crate::rasterizer::{RasterSettings, Vec3};
use crate::ui::*;
use crate::viewer::ViewerController;

const PANEL_WIDTH: f32 = 360.0;
const ROW_HEIGHT: f32 = 20.0;
const MARGIN: f32 = 8.0;

/// Global object scale bounds per axis
const SCALE_RANGE: (f32, f32) = (0.01, 100.0);
/// Position drags are effectively unbounded
const POSITION_LIMIT: f32 = 1.0e4;

pub struct ParameterPanel {
    /// Content height measured last frame, sizes the background
    height: f32,
}

impl ParameterPanel {
    pub fn new() -> Self {
        Self { height: 200.0 }
    }

    fn rect(&self) -> Rect {
        Rect::new(MARGIN, MARGIN, PANEL_WIDTH, self.height)
    }

    /// Claim the pointer for this frame when it is over the panel. Call
    /// before the viewer sees the frame's mouse events.
    pub fn capture_pointer(&self, ctx: &mut UiContext, viewer: &mut ViewerController) {
        ctx.claim_pointer(&self.rect());
        viewer.pointer_captured = ctx.pointer_claimed();
    }

    /// Draw the panel and apply its edits
    pub fn draw(&mut self, ctx: &mut UiContext, viewer: &mut ViewerController, fps: i32) {
        let panel_rect = self.rect();
        draw_panel(panel_rect, Some("Parameters"), BG_COLOR);
        let content = Rect::new(
            panel_rect.x,
            panel_rect.y + HEADER_HEIGHT,
            panel_rect.w,
            (panel_rect.h - HEADER_HEIGHT).max(0.0),
        )
        .pad(6.0);
        let mut col = Column::new(content, ROW_HEIGHT);

        self.status_rows(&mut col, viewer, fps);
        self.scene_rows(ctx, &mut col, viewer);
        self.display_rows(ctx, &mut col, viewer);
        self.selection_rows(ctx, &mut col, viewer);

        self.height = HEADER_HEIGHT + col.used() + 12.0;
    }

    fn status_rows(&self, col: &mut Column, viewer: &ViewerController, fps: i32) {
        label(col.row(), &format!("FPS: {}", fps), TEXT_DIM);

        let (text, color) = match viewer.status() {
            Some(msg) => {
                let color = match msg.severity {
                    Severity::Info => STATUS_OK,
                    Severity::Warning => STATUS_WARN,
                    Severity::Error => STATUS_ERROR,
                };
                (msg.text.clone(), color)
            }
            None if viewer.store().is_empty() => ("Waiting for a model to load".to_string(), TEXT_DIM),
            None => (format!("Model loaded ({} parts)", viewer.store().submesh_count()), STATUS_OK),
        };
        label(col.row(), &text, color);
    }

    fn scene_rows(&self, ctx: &mut UiContext, col: &mut Column, viewer: &mut ViewerController) {
        col.header("Scene");

        color_edit(ctx, col.row(), "Background", &mut viewer.settings.background);

        let object = &mut viewer.transforms_mut().object;
        let mut position = object.position.to_array();
        if drag_vec3(ctx, col.row(), "Position", &mut position, 0.01, -POSITION_LIMIT, POSITION_LIMIT) {
            object.position = Vec3::from(position);
        }
        let mut scale = object.scale.to_array();
        if drag_vec3(ctx, col.row(), "Scale", &mut scale, 0.01, SCALE_RANGE.0, SCALE_RANGE.1) {
            object.scale = Vec3::from(scale);
        }

        let buttons = col.row().columns(3, 4.0);
        if button(ctx, buttons[0], "Reset view") {
            viewer.reset_view();
        }
        if button(ctx, buttons[1], "Center object") {
            viewer.center_object();
        }
        if button(ctx, buttons[2], "Export") {
            viewer.export_and_report();
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let buttons = col.row().columns(2, 4.0);
            if button(ctx, buttons[0], "Open...") {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Wavefront OBJ", &["obj"])
                    .pick_file()
                {
                    viewer.load_and_report(&path);
                }
            }
            if button(ctx, buttons[1], "Export as...") {
                let name = viewer
                    .export_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "model.obj".to_string());
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Wavefront OBJ", &["obj"])
                    .set_file_name(&name)
                    .save_file()
                {
                    viewer.export_path = path;
                    viewer.export_and_report();
                }
            }
        }
    }

    fn display_rows(&self, ctx: &mut UiContext, col: &mut Column, viewer: &mut ViewerController) {
        col.header("Display");

        let settings = &mut viewer.settings;
        let toggles = col.row().columns(3, 4.0);
        checkbox(ctx, toggles[0], "Fill", &mut settings.show_fill);
        checkbox(ctx, toggles[1], "Depth test", &mut settings.depth_test);
        checkbox(ctx, toggles[2], "Cull back", &mut settings.backface_cull);

        checkbox(ctx, col.row(), "Wireframe", &mut settings.show_wireframe);
        if settings.show_wireframe {
            color_edit(ctx, col.row(), "  Line color", &mut settings.wireframe_color);
        }

        checkbox(ctx, col.row(), "Points", &mut settings.show_points);
        if settings.show_points {
            color_edit(ctx, col.row(), "  Point color", &mut settings.point_color);
            let (lo, hi) = RasterSettings::POINT_SIZE_RANGE;
            slider(ctx, col.row(), "  Point size", &mut settings.point_size, lo, hi);
        }

        checkbox(ctx, col.row(), "Normals", &mut settings.show_normals);
        if settings.show_normals {
            color_edit(ctx, col.row(), "  Normal color", &mut settings.normal_color);
            let (lo, hi) = RasterSettings::NORMAL_LENGTH_RANGE;
            let mut length = settings.normal_length_percent;
            if slider(ctx, col.row(), "  Normal length", &mut length, lo, hi) {
                viewer.set_normal_length_percent(length);
            }
        }
    }

    fn selection_rows(&self, ctx: &mut UiContext, col: &mut Column, viewer: &mut ViewerController) {
        let Some(index) = viewer.selected() else {
            return;
        };
        col.header("Selected part");

        let mut delete = false;
        let mut show_bbox = viewer.settings.show_bounding_box;
        let mut bbox_color = viewer.settings.bounding_box_color;

        if let Some(sub) = viewer.selected_submesh_mut() {
            label(
                col.row(),
                &format!("{} (ID {}, {} triangles)", sub.name, index, sub.triangle_count()),
                TEXT_COLOR,
            );
            color_edit(ctx, col.row(), "Color", &mut sub.color);

            let mut local = sub.local_position.to_array();
            if drag_vec3(ctx, col.row(), "Local position", &mut local, 0.01, -POSITION_LIMIT, POSITION_LIMIT) {
                sub.local_position = Vec3::from(local);
            }

            checkbox(ctx, col.row(), "Bounding box", &mut show_bbox);
            if show_bbox {
                color_edit(ctx, col.row(), "  Box color", &mut bbox_color);
            }
            delete = danger_button(ctx, col.row(), "Delete part");
        }

        viewer.settings.show_bounding_box = show_bbox;
        viewer.settings.bounding_box_color = bbox_color;
        if delete {
            viewer.delete_selected();
        }
    }
}

impl Default for ParameterPanel {
    fn default() -> Self {
        Self::new()
    }
}
