//! Per-frame draw pass
//!
//! `Renderer` owns the surface, the program and the mesh buffers, and turns a
//! geometry store plus transforms into primitives on the framebuffer.

use super::buffers::MeshBuffers;
use super::math::{mat4_mul, mat4_scale, mat4_translation, Mat4};
use super::program::{FragmentMode, Program, Uniforms};
use super::render::{draw_line, draw_point, draw_triangle, draw_triangle_edges, Framebuffer, RasterState};
use super::types::{Color, RasterSettings};
use crate::error::SetupError;
use crate::scene::{GeometryStore, TransformModel};

/// Window-depth bias for wireframe and points so they win against the fill
pub const LINE_DEPTH_OFFSET: f32 = 2e-4;

/// Bounding box padding so it doesn't z-fight with the mesh surface
const BBOX_PADDING: f32 = 1.005;

pub struct Renderer {
    buffers: MeshBuffers,
    program: Option<Program>,
    surface: Framebuffer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Result<Self, SetupError> {
        if width == 0 || height == 0 {
            return Err(SetupError::Surface(format!("invalid surface size {}x{}", width, height)));
        }
        let program = Program::new()?;
        Ok(Self {
            buffers: MeshBuffers::new(),
            program: Some(program),
            surface: Framebuffer::new(width, height),
        })
    }

    pub fn surface(&self) -> &Framebuffer {
        &self.surface
    }

    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.surface.resize(width.max(1), height.max(1));
    }

    /// New model loaded: replace buffer contents
    pub fn upload(&mut self, store: &GeometryStore, normal_length_percent: f32) {
        self.buffers.upload(store, normal_length_percent);
    }

    pub fn regenerate_normals(&mut self, store: &GeometryStore, normal_length_percent: f32) {
        self.buffers.regenerate_normals(store, normal_length_percent);
    }

    /// Release GPU-side state: buffers, then program, then surface.
    /// Idempotent; also runs on drop.
    pub fn release(&mut self) {
        if self.program.is_none() && !self.buffers.is_live() {
            return;
        }
        self.buffers.release();
        self.program = None;
        self.surface.release();
        log::debug!("Renderer resources released");
    }

    pub fn clear(&mut self, color: Color) {
        self.surface.clear(color);
    }

    /// Set frame-wide matrices for the given transforms and current aspect
    fn begin_pass(&mut self, transforms: &TransformModel) -> Option<(Mat4, Mat4)> {
        let aspect = self.surface.aspect();
        self.program.as_ref()?;
        Some((transforms.view_matrix(), transforms.projection_matrix(aspect)))
    }

    /// Filled triangles for vertices `start..start + count` in a single color
    pub fn draw_fill(
        &mut self,
        start: usize,
        count: usize,
        uniforms: Uniforms,
        state: &RasterState,
    ) {
        let Some(program) = self.program.as_mut() else {
            return;
        };
        program.set_uniforms(uniforms);
        let program = &*program;
        for tri in self.buffers.vertex_range(start, count).chunks_exact(3) {
            let clip = [
                program.vertex(tri[0].pos, tri[0].normal),
                program.vertex(tri[1].pos, tri[1].normal),
                program.vertex(tri[2].pos, tri[2].normal),
            ];
            draw_triangle(&mut self.surface, &clip, state, |n| program.fragment(n));
        }
    }

    /// Draw every visible sub-mesh with fill only, each in `color_of(index)`.
    /// Used by the pick pass.
    pub fn draw_flat_pass<F>(&mut self, store: &GeometryStore, transforms: &TransformModel, settings: &RasterSettings, color_of: F)
    where
        F: Fn(usize) -> Color,
    {
        let Some((view, projection)) = self.begin_pass(transforms) else {
            return;
        };
        let state = RasterState {
            depth_test: settings.depth_test,
            cull_back: settings.backface_cull,
            depth_offset: 0.0,
        };

        for (i, sub) in store.submeshes().iter().enumerate() {
            let Some((offset, count)) = store.range(i) else {
                continue;
            };
            if sub.visible {
                let uniforms = Uniforms {
                    model: transforms.submesh_matrix(sub.local_position),
                    view,
                    projection,
                    color: color_of(i),
                    mode: FragmentMode::Picking,
                };
                self.draw_fill(offset, count, uniforms, &state);
            }
        }
    }

    /// The normal frame: clear to the background, then every visible
    /// sub-mesh in load order with the enabled modes.
    pub fn render(
        &mut self,
        store: &GeometryStore,
        transforms: &TransformModel,
        settings: &RasterSettings,
        selected: Option<usize>,
    ) {
        self.surface.clear(settings.background);
        let Some((view, projection)) = self.begin_pass(transforms) else {
            return;
        };

        let fill_state = RasterState {
            depth_test: settings.depth_test,
            cull_back: settings.backface_cull,
            depth_offset: 0.0,
        };
        let overlay_state = RasterState {
            depth_offset: LINE_DEPTH_OFFSET,
            ..fill_state
        };
        let line_state = RasterState {
            cull_back: false,
            ..fill_state
        };

        for (i, sub) in store.submeshes().iter().enumerate() {
            // Ranges come from the store, so hidden sub-meshes never shift later ones
            let Some((offset, count)) = store.range(i) else {
                continue;
            };
            if !sub.visible {
                continue;
            }

            let model = transforms.submesh_matrix(sub.local_position);
            let uniforms = |color: Color, mode: FragmentMode| Uniforms { model, view, projection, color, mode };

            if settings.show_fill {
                self.draw_fill(offset, count, uniforms(sub.color, FragmentMode::Lit), &fill_state);
            }

            if let Some(program) = self.program.as_mut() {
                if settings.show_wireframe {
                    program.set_uniforms(uniforms(settings.wireframe_color, FragmentMode::Flat));
                    for tri in self.buffers.vertex_range(offset, count).chunks_exact(3) {
                        let clip = [
                            program.vertex(tri[0].pos, tri[0].normal),
                            program.vertex(tri[1].pos, tri[1].normal),
                            program.vertex(tri[2].pos, tri[2].normal),
                        ];
                        draw_triangle_edges(&mut self.surface, &clip, &overlay_state, settings.wireframe_color);
                    }
                }

                if settings.show_points {
                    program.set_uniforms(uniforms(settings.point_color, FragmentMode::Flat));
                    let point_state = RasterState { cull_back: false, ..overlay_state };
                    for v in self.buffers.vertex_range(offset, count) {
                        let p = program.project(v.pos);
                        draw_point(&mut self.surface, p, settings.point_size, &point_state, settings.point_color);
                    }
                }

                if settings.show_normals {
                    program.set_uniforms(uniforms(settings.normal_color, FragmentMode::Flat));
                    for seg in self.buffers.normal_range(offset, count).chunks_exact(2) {
                        let a = program.project(seg[0]);
                        let b = program.project(seg[1]);
                        draw_line(&mut self.surface, a, b, &line_state, settings.normal_color);
                    }
                }

                if settings.show_bounding_box && selected == Some(i) {
                    // Unit cube moved onto the sub-mesh box, slightly padded
                    let bbox_model = mat4_mul(
                        &model,
                        &mat4_mul(&mat4_translation(sub.center()), &mat4_scale(sub.size() * BBOX_PADDING)),
                    );
                    program.set_uniforms(Uniforms {
                        model: bbox_model,
                        ..uniforms(settings.bounding_box_color, FragmentMode::Flat)
                    });
                    for seg in self.buffers.bbox_lines().chunks_exact(2) {
                        let a = program.project(seg[0]);
                        let b = program.project(seg[1]);
                        draw_line(&mut self.surface, a, b, &line_state, settings.bounding_box_color);
                    }
                }
            }
        }
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::{mat4_transform_vec4, Vec3};
    use crate::scene::test_models;

    fn setup(model: crate::import::ImportedModel) -> (Renderer, GeometryStore, TransformModel) {
        let store = GeometryStore::load(&model).unwrap();
        let mut transforms = TransformModel::new();
        transforms.set_model_frame(store.center(), store.normalization_scale());
        let mut renderer = Renderer::new(64, 48).unwrap();
        renderer.upload(&store, 0.05);
        (renderer, store, transforms)
    }

    /// Bottom-up pixel where a model-space point lands
    fn project(renderer: &Renderer, t: &TransformModel, local: Vec3, p: Vec3) -> (usize, usize) {
        let fb = renderer.surface();
        let mvp = mat4_mul(
            &t.projection_matrix(fb.aspect()),
            &mat4_mul(&t.view_matrix(), &t.submesh_matrix(local)),
        );
        let c = mat4_transform_vec4(&mvp, [p.x, p.y, p.z, 1.0]);
        let x = (c[0] / c[3] + 1.0) * 0.5 * fb.width as f32;
        let y = (c[1] / c[3] + 1.0) * 0.5 * fb.height as f32;
        (x as usize, y as usize)
    }

    #[test]
    fn test_zero_size_surface_is_setup_error() {
        assert!(matches!(Renderer::new(0, 10), Err(SetupError::Surface(_))));
    }

    #[test]
    fn test_fill_is_lit_sub_mesh_color() {
        let (mut r, store, t) = setup(test_models::quad_row(1));
        let settings = RasterSettings::default();
        r.render(&store, &t, &settings, None);

        let sub = &store.submeshes()[0];
        let (x, y) = project(&r, &t, Vec3::ZERO, sub.center());
        let px = r.surface().read_pixel(x, y).unwrap();
        // Quad faces +Z, light z component gives dot = 0.8 / |(0.2, 0.5, 0.8)|
        let diff = 0.8 / (0.2f32 * 0.2 + 0.5 * 0.5 + 0.8 * 0.8).sqrt();
        let expected = Color::DEFAULT_GRAY.shade(diff).to_bytes();
        assert_eq!(px, expected);

        // Corner of the frame is background
        assert_eq!(r.surface().read_pixel(0, 0), Some(settings.background.to_bytes()));
    }

    #[test]
    fn test_hidden_sub_mesh_keeps_following_offsets() {
        let (mut r, mut store, t) = setup(test_models::quad_row(3));
        store.submesh_mut(0).unwrap().visible = false;
        store.submesh_mut(2).unwrap().color = Color::RED;
        let mut settings = RasterSettings::default();
        settings.background = Color::BLACK;
        r.render(&store, &t, &settings, None);

        let first = project(&r, &t, Vec3::ZERO, store.submeshes()[0].center());
        assert_eq!(r.surface().read_pixel(first.0, first.1), Some([0, 0, 0, 255]));

        let third = project(&r, &t, Vec3::ZERO, store.submeshes()[2].center());
        let px = r.surface().read_pixel(third.0, third.1).unwrap();
        assert!(px[0] > 0 && px[1] == 0 && px[2] == 0);
    }

    #[test]
    fn test_back_faces_culled_only_when_enabled() {
        let (mut r, store, mut t) = setup(test_models::quad_row(1));
        // Half a turn around Y shows the quad's back
        t.rotate_object(std::f32::consts::PI / 0.005, 0.0, 0.005);
        let mut settings = RasterSettings::default();
        settings.background = Color::BLACK;
        let (x, y) = project(&r, &t, Vec3::ZERO, store.submeshes()[0].center());

        r.render(&store, &t, &settings, None);
        assert_eq!(r.surface().read_pixel(x, y), Some([0, 0, 0, 255]));

        settings.backface_cull = false;
        r.render(&store, &t, &settings, None);
        assert_ne!(r.surface().read_pixel(x, y), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_bounding_box_drawn_only_for_selection() {
        let (mut r, store, t) = setup(test_models::quad_row(1));
        let mut settings = RasterSettings::default();
        settings.show_fill = false;
        settings.show_bounding_box = true;
        settings.background = Color::BLACK;
        let magenta = settings.bounding_box_color.to_bytes();
        let count = |r: &Renderer| r.surface().pixels.chunks_exact(4).filter(|p| *p == magenta).count();

        r.render(&store, &t, &settings, None);
        assert_eq!(count(&r), 0);
        r.render(&store, &t, &settings, Some(0));
        assert!(count(&r) > 0);
    }

    /// Cube turned so three faces face the camera
    fn turned_cube() -> (Renderer, GeometryStore, TransformModel) {
        let (r, store, mut t) = setup(test_models::cube(1.0));
        t.rotate_object(0.6, 0.5, 1.0);
        (r, store, t)
    }

    fn count_color(r: &Renderer, color: Color) -> usize {
        let bytes = color.to_bytes();
        r.surface().pixels.chunks_exact(4).filter(|p| *p == bytes).count()
    }

    #[test]
    fn test_wireframe_wins_over_coplanar_fill() {
        let (mut r, store, t) = turned_cube();
        let mut settings = RasterSettings::default();
        settings.show_wireframe = true;

        settings.show_fill = false;
        r.render(&store, &t, &settings, None);
        let lines_alone = count_color(&r, settings.wireframe_color);
        assert!(lines_alone > 0);

        // Same edges drawn on top of their own faces must mostly survive the depth test
        settings.show_fill = true;
        r.render(&store, &t, &settings, None);
        let over_fill = count_color(&r, settings.wireframe_color);
        assert!(over_fill * 2 >= lines_alone, "{} of {} edge pixels", over_fill, lines_alone);
        assert!(count_color(&r, settings.background) > 0);
    }

    #[test]
    fn test_points_drawn_over_fill_grow_with_size() {
        let (mut r, store, t) = turned_cube();
        let mut settings = RasterSettings::default();
        settings.show_points = true;

        settings.point_size = 1.0;
        r.render(&store, &t, &settings, None);
        let small = count_color(&r, settings.point_color);
        assert!(small > 0);

        settings.point_size = 5.0;
        r.render(&store, &t, &settings, None);
        let large = count_color(&r, settings.point_color);
        assert!(large > small);
    }

    #[test]
    fn test_normals_follow_length_percent() {
        let (mut r, store, t) = turned_cube();
        let mut settings = RasterSettings::default();
        settings.show_normals = true;

        settings.normal_length_percent = 0.05;
        r.regenerate_normals(&store, settings.normal_length_percent);
        r.render(&store, &t, &settings, None);
        let short = count_color(&r, settings.normal_color);

        settings.normal_length_percent = 0.3;
        r.regenerate_normals(&store, settings.normal_length_percent);
        r.render(&store, &t, &settings, None);
        let long = count_color(&r, settings.normal_color);

        assert!(long > short, "{} vs {}", long, short);
        assert!((r.buffers().normal_length() - store.diagonal() * 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_overlays_off_draw_no_overlay_colors() {
        let (mut r, store, t) = turned_cube();
        let settings = RasterSettings::default();
        r.render(&store, &t, &settings, None);
        assert_eq!(count_color(&r, settings.wireframe_color), 0);
        assert_eq!(count_color(&r, settings.point_color), 0);
        assert_eq!(count_color(&r, settings.normal_color), 0);
    }

    #[test]
    fn test_release_twice_then_render_is_noop() {
        let (mut r, store, t) = setup(test_models::quad_row(1));
        r.release();
        r.release();
        r.render(&store, &t, &RasterSettings::default(), None);
        assert_eq!(r.surface().width, 0);
    }
}
