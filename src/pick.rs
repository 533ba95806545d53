//! Color-coded object picking
//!
//! Renders every visible sub-mesh flat in a color that encodes its index,
//! then reads back the pixel under the cursor. The pass overwrites the
//! frame, so the caller renders normally afterwards.
//!
//! Known limitation: red 255 is the miss sentinel (white clear), so only
//! sub-meshes 0..=254 can be picked.

use crate::rasterizer::{Color, RasterSettings, Renderer};
use crate::scene::{GeometryStore, TransformModel};

/// Red value of the cleared background
pub const MISS_ID: u8 = 255;

#[derive(Debug, Default, Clone, Copy)]
pub struct PickEngine;

impl PickEngine {
    pub fn new() -> Self {
        Self
    }

    /// `(index / 255, 0, 0)`
    pub fn encode(index: usize) -> Color {
        Color::new(index as f32 / 255.0, 0.0, 0.0)
    }

    /// Red byte back to an index, `None` for the sentinel or stale ids
    pub fn decode(red: u8, submesh_count: usize) -> Option<usize> {
        let id = red as usize;
        if red == MISS_ID || id >= submesh_count {
            None
        } else {
            Some(id)
        }
    }

    /// Resolve a surface pixel (top-down, like window coordinates) to the
    /// sub-mesh drawn there. Culling and depth test follow `settings`.
    pub fn pick(
        &self,
        renderer: &mut Renderer,
        store: &GeometryStore,
        transforms: &TransformModel,
        settings: &RasterSettings,
        x: usize,
        y: usize,
    ) -> Option<usize> {
        renderer.clear(Color::WHITE);
        renderer.draw_flat_pass(store, transforms, settings, Self::encode);

        let fb = renderer.surface();
        if x >= fb.width || y >= fb.height {
            return None;
        }
        // Framebuffer rows run bottom-up
        let pixel = fb.read_pixel(x, fb.height - 1 - y)?;
        let hit = Self::decode(pixel[0], store.submesh_count());
        log::debug!("Pick at ({}, {}): red {} -> {:?}", x, y, pixel[0], hit);
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::{mat4_mul, mat4_transform_vec4};
    use crate::scene::test_models;

    struct Fixture {
        renderer: Renderer,
        store: GeometryStore,
        transforms: TransformModel,
        settings: RasterSettings,
    }

    fn fixture(quads: usize) -> Fixture {
        let store = GeometryStore::load(&test_models::quad_row(quads)).unwrap();
        let mut transforms = TransformModel::new();
        transforms.set_model_frame(store.center(), store.normalization_scale());
        let mut renderer = Renderer::new(160, 120).unwrap();
        renderer.upload(&store, 0.05);
        Fixture {
            renderer,
            store,
            transforms,
            settings: RasterSettings::default(),
        }
    }

    /// Top-down surface pixel over the center of sub-mesh `i`
    fn screen_pos(f: &Fixture, i: usize) -> (usize, usize) {
        let fb = f.renderer.surface();
        let sub = &f.store.submeshes()[i];
        let mvp = mat4_mul(
            &f.transforms.projection_matrix(fb.aspect()),
            &mat4_mul(&f.transforms.view_matrix(), &f.transforms.submesh_matrix(sub.local_position)),
        );
        let c = sub.center();
        let clip = mat4_transform_vec4(&mvp, [c.x, c.y, c.z, 1.0]);
        let x = (clip[0] / clip[3] + 1.0) * 0.5 * fb.width as f32;
        let y = (clip[1] / clip[3] + 1.0) * 0.5 * fb.height as f32;
        (x as usize, fb.height - 1 - y as usize)
    }

    fn pick(f: &mut Fixture, x: usize, y: usize) -> Option<usize> {
        PickEngine::new().pick(&mut f.renderer, &f.store, &f.transforms, &f.settings, x, y)
    }

    #[test]
    fn test_decode_sentinel_and_range() {
        assert_eq!(PickEngine::decode(255, 300), None);
        assert_eq!(PickEngine::decode(4, 4), None);
        assert_eq!(PickEngine::decode(3, 4), Some(3));
    }

    #[test]
    fn test_pick_hits_each_sub_mesh() {
        let mut f = fixture(5);
        for i in 0..5 {
            let (x, y) = screen_pos(&f, i);
            assert_eq!(pick(&mut f, x, y), Some(i));
        }
    }

    #[test]
    fn test_pick_off_geometry_is_none() {
        let mut f = fixture(5);
        assert_eq!(pick(&mut f, 0, 0), None);
        assert_eq!(pick(&mut f, 159, 119), None);
        // Outside the surface entirely
        assert_eq!(pick(&mut f, 500, 10), None);
    }

    #[test]
    fn test_repeated_pick_is_stable() {
        let mut f = fixture(5);
        let (x, y) = screen_pos(&f, 2);
        let first = pick(&mut f, x, y);
        for _ in 0..3 {
            assert_eq!(pick(&mut f, x, y), first);
        }
    }

    #[test]
    fn test_hidden_sub_mesh_is_not_picked() {
        let mut f = fixture(5);
        let (x, y) = screen_pos(&f, 3);
        assert_eq!(pick(&mut f, x, y), Some(3));

        f.store.submesh_mut(3).unwrap().visible = false;
        assert_ne!(pick(&mut f, x, y), Some(3));
    }

    #[test]
    fn test_pick_respects_local_offset() {
        let mut f = fixture(2);
        let before = screen_pos(&f, 1);
        f.store.submesh_mut(1).unwrap().local_position.y = 0.8;
        assert_ne!(pick(&mut f, before.0, before.1), Some(1));
        let after = screen_pos(&f, 1);
        assert_eq!(pick(&mut f, after.0, after.1), Some(1));
    }
}
