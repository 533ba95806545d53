//! Vertex, bounding-box and normal-line buffers
//!
//! The software pipeline's equivalent of GPU buffer objects. They are filled
//! from the geometry store on load and when the normal length changes, and
//! every fill replaces the previous contents.

use super::math::Vec3;
use super::types::Vertex;
use crate::scene::GeometryStore;

/// Edges of the unit cube centered on the origin, as 12 line segments
const UNIT_CUBE_LINES: [[f32; 3]; 24] = [
    // back face
    [-0.5, -0.5, -0.5], [0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5], [0.5, 0.5, -0.5],
    [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5], [-0.5, -0.5, -0.5],
    // front face
    [-0.5, -0.5, 0.5], [0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5], [0.5, 0.5, 0.5],
    [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5],
    [-0.5, 0.5, 0.5], [-0.5, -0.5, 0.5],
    // connecting edges
    [-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5],
    [0.5, -0.5, -0.5], [0.5, -0.5, 0.5],
    [0.5, 0.5, -0.5], [0.5, 0.5, 0.5],
    [-0.5, 0.5, -0.5], [-0.5, 0.5, 0.5],
];

#[derive(Debug)]
pub struct MeshBuffers {
    vertices: Vec<Vertex>,
    bbox_lines: Vec<Vec3>,
    /// Two endpoints per vertex, parallel to `vertices`
    normal_lines: Vec<Vec3>,
    normal_length: f32,
    live: bool,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            bbox_lines: UNIT_CUBE_LINES.iter().map(|&p| Vec3::from(p)).collect(),
            normal_lines: Vec::new(),
            normal_length: 0.0,
            live: true,
        }
    }

    /// Upload a freshly loaded store: vertex copy plus normal lines
    pub fn upload(&mut self, store: &GeometryStore, normal_length_percent: f32) {
        if !self.live {
            *self = Self::new();
        }
        self.vertices.clear();
        self.vertices.extend_from_slice(store.vertices());
        self.regenerate_normals(store, normal_length_percent);
    }

    /// Rebuild normal segments with length `diagonal * percent`
    pub fn regenerate_normals(&mut self, store: &GeometryStore, normal_length_percent: f32) {
        let len = store.diagonal() * normal_length_percent;
        self.normal_length = len;
        self.normal_lines.clear();
        self.normal_lines.reserve(store.vertex_count() * 2);
        for v in store.vertices() {
            self.normal_lines.push(v.pos);
            self.normal_lines.push(v.pos + v.normal * len);
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Vertices `start..start + count`, empty if out of range
    pub fn vertex_range(&self, start: usize, count: usize) -> &[Vertex] {
        self.vertices.get(start..start + count).unwrap_or(&[])
    }

    /// Normal segments belonging to vertices `start..start + count`
    pub fn normal_range(&self, start: usize, count: usize) -> &[Vec3] {
        self.normal_lines.get(start * 2..(start + count) * 2).unwrap_or(&[])
    }

    pub fn bbox_lines(&self) -> &[Vec3] {
        &self.bbox_lines
    }

    pub fn normal_length(&self) -> f32 {
        self.normal_length
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Drop all contents. Safe to call more than once.
    pub fn release(&mut self) {
        if !self.live {
            return;
        }
        self.vertices = Vec::new();
        self.bbox_lines = Vec::new();
        self.normal_lines = Vec::new();
        self.live = false;
    }
}

impl Default for MeshBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MeshBuffers {
    fn drop(&mut self) {
        self.release();
    }
}
