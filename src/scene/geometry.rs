//! Flattened vertex storage and named sub-meshes

use crate::error::LoadError;
use crate::import::ImportedModel;
use crate::rasterizer::{Color, Vec2, Vec3, Vertex};

/// Normals shorter than this count as missing and get the face-normal fallback
const MISSING_NORMAL_LEN: f32 = 0.01;

/// One shape of the source file: a contiguous run of the shared vertex list
#[derive(Debug, Clone, PartialEq)]
pub struct SubMesh {
    pub name: String,
    /// Indices into `GeometryStore::vertices`, consumed as a triangle list
    pub indices: Vec<u32>,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub color: Color,
    /// Offset applied before the global transform, in model units
    pub local_position: Vec3,
    pub visible: bool,
}

impl SubMesh {
    pub fn center(&self) -> Vec3 {
        (self.bounds_min + self.bounds_max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.bounds_max - self.bounds_min
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Owns the vertex list and the ordered sub-meshes laid over it.
///
/// Sub-mesh index ranges are contiguous and in load order, so together they
/// cover `vertices` exactly once.
#[derive(Debug, Clone, Default)]
pub struct GeometryStore {
    vertices: Vec<Vertex>,
    submeshes: Vec<SubMesh>,
    /// Start of each sub-mesh within `vertices`, parallel to `submeshes`
    offsets: Vec<usize>,
    bounds_min: Vec3,
    bounds_max: Vec3,
    center: Vec3,
    normalization_scale: f32,
    diagonal: f32,
}

impl GeometryStore {
    /// Flatten an imported model. All-or-nothing: any bad reference fails the
    /// whole load and the caller keeps its previous store.
    pub fn load(model: &ImportedModel) -> Result<Self, LoadError> {
        let mut vertices: Vec<Vertex> = Vec::new();
        let mut submeshes: Vec<SubMesh> = Vec::with_capacity(model.shapes.len());

        for (shape_idx, shape) in model.shapes.iter().enumerate() {
            let name = if shape.name.is_empty() {
                format!("shape_{}", shape_idx)
            } else {
                shape.name.clone()
            };

            if shape.corners.len() % 3 != 0 {
                return Err(LoadError::MalformedGeometry {
                    shape: name,
                    message: format!("{} corners is not a whole number of triangles", shape.corners.len()),
                });
            }

            let mut indices = Vec::with_capacity(shape.corners.len());
            let mut bounds: Option<(Vec3, Vec3)> = None;

            for corner in &shape.corners {
                let pos = *model.positions.get(corner.position).ok_or_else(|| LoadError::MalformedGeometry {
                    shape: name.clone(),
                    message: format!(
                        "position index {} out of range (have {})",
                        corner.position + 1,
                        model.positions.len()
                    ),
                })?;
                let normal = match corner.normal {
                    Some(n) => *model.normals.get(n).ok_or_else(|| LoadError::MalformedGeometry {
                        shape: name.clone(),
                        message: format!("normal index {} out of range (have {})", n + 1, model.normals.len()),
                    })?,
                    None => Vec3::ZERO,
                };
                let uv = match corner.texcoord {
                    Some(t) => *model.texcoords.get(t).ok_or_else(|| LoadError::MalformedGeometry {
                        shape: name.clone(),
                        message: format!("texcoord index {} out of range (have {})", t + 1, model.texcoords.len()),
                    })?,
                    None => Vec2::ZERO,
                };

                indices.push(vertices.len() as u32);
                vertices.push(Vertex::new(pos, normal, uv));
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(pos), hi.max(pos)),
                    None => (pos, pos),
                });
            }

            // Diffuse color comes from the first face's material
            let color = shape
                .material_ids
                .first()
                .copied()
                .flatten()
                .and_then(|id| model.materials.get(id))
                .map(|m| m.diffuse)
                .unwrap_or(Color::DEFAULT_GRAY);

            let (bounds_min, bounds_max) = bounds.unwrap_or((Vec3::ZERO, Vec3::ZERO));
            submeshes.push(SubMesh {
                name,
                indices,
                bounds_min,
                bounds_max,
                color,
                local_position: Vec3::ZERO,
                visible: true,
            });
        }

        if vertices.is_empty() {
            return Err(LoadError::Empty);
        }

        let offsets = submeshes
            .iter()
            .scan(0usize, |start, sub| {
                let offset = *start;
                *start += sub.indices.len();
                Some(offset)
            })
            .collect();

        let mut store = Self {
            vertices,
            submeshes,
            offsets,
            ..Self::default()
        };
        store.compute_bounds();
        store.fill_missing_normals();
        Ok(store)
    }

    /// Global bounds, center, normalization scale and diagonal
    fn compute_bounds(&mut self) {
        let first = self.vertices[0].pos;
        let (lo, hi) = self
            .vertices
            .iter()
            .fold((first, first), |(lo, hi), v| (lo.min(v.pos), hi.max(v.pos)));

        self.bounds_min = lo;
        self.bounds_max = hi;
        self.center = (lo + hi) * 0.5;

        let max_extent = (hi - lo).max_elem();
        self.normalization_scale = if max_extent > 0.0 { 2.0 / max_extent } else { 1.0 };

        let diagonal = (hi - lo).len();
        self.diagonal = if diagonal < 0.0001 { 1.0 } else { diagonal };
    }

    /// Flat-shading fallback: triangles whose first corner has no usable
    /// normal get the face normal `(v1 - v0) x (v2 - v0)` on all three corners.
    fn fill_missing_normals(&mut self) {
        for tri in self.vertices.chunks_exact_mut(3) {
            if tri[0].normal.len() >= MISSING_NORMAL_LEN {
                continue;
            }
            let e1 = tri[1].pos - tri[0].pos;
            let e2 = tri[2].pos - tri[0].pos;
            let n = e1.cross(e2).normalize();
            for v in tri.iter_mut() {
                v.normal = n;
            }
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn submeshes(&self) -> &[SubMesh] {
        &self.submeshes
    }

    pub fn submesh_mut(&mut self, index: usize) -> Option<&mut SubMesh> {
        self.submeshes.get_mut(index)
    }

    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// (start offset, vertex count) of a sub-mesh within the vertex list
    pub fn range(&self, index: usize) -> Option<(usize, usize)> {
        let sub = self.submeshes.get(index)?;
        Some((self.offsets[index], sub.indices.len()))
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.bounds_min, self.bounds_max)
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn normalization_scale(&self) -> f32 {
        self.normalization_scale
    }

    pub fn diagonal(&self) -> f32 {
        self.diagonal
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{Corner, Material, Shape};
    use crate::scene::test_models;

    #[test]
    fn test_ranges_partition_vertex_list() {
        let store = GeometryStore::load(&test_models::quad_row(5)).unwrap();
        let mut expected = 0usize;
        for (i, sub) in store.submeshes().iter().enumerate() {
            let (start, count) = store.range(i).unwrap();
            assert_eq!(start, expected);
            assert_eq!(count, sub.indices.len());
            for (k, &idx) in sub.indices.iter().enumerate() {
                assert_eq!(idx as usize, start + k);
                assert!((idx as usize) < store.vertex_count());
            }
            expected += count;
        }
        assert_eq!(expected, store.vertex_count());
    }

    #[test]
    fn test_cube_without_normals() {
        let store = GeometryStore::load(&test_models::cube(2.0)).unwrap();
        assert_eq!(store.vertex_count(), 36);
        assert_eq!(store.triangle_count(), 12);
        assert_eq!(store.submeshes()[0].triangle_count(), 12);
        assert_eq!(store.bounds(), (Vec3::splat(-2.0), Vec3::splat(2.0)));
        assert_eq!(store.range(1), None);

        // Side 4 -> max extent 4
        assert!((store.normalization_scale() - 0.5).abs() < 1e-6);
        assert!((store.diagonal() - 48f32.sqrt()).abs() < 1e-4);
        assert_eq!(store.center(), Vec3::ZERO);

        for tri in store.vertices().chunks_exact(3) {
            let e1 = tri[1].pos - tri[0].pos;
            let e2 = tri[2].pos - tri[0].pos;
            for v in tri {
                assert!((v.normal.len() - 1.0).abs() < 1e-5);
                assert!(v.normal.dot(e1).abs() < 1e-5);
                assert!(v.normal.dot(e2).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_fallback_normal_follows_edge_order() {
        let model = test_models::triangles(&[[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]]);
        let store = GeometryStore::load(&model).unwrap();
        for v in store.vertices() {
            assert_eq!(v.normal, Vec3::new(0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn test_supplied_normals_are_kept() {
        let mut model = test_models::triangles(&[[Vec3::ZERO, Vec3::X, Vec3::UP]]);
        model.normals.push(Vec3::new(0.0, 0.0, -1.0));
        for c in &mut model.shapes[0].corners {
            c.normal = Some(0);
        }
        let store = GeometryStore::load(&model).unwrap();
        assert_eq!(store.vertices()[1].normal, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_color_from_first_face_material() {
        let mut model = test_models::quad_row(2);
        model.materials.push(Material { name: "Red".into(), diffuse: Color::RED });
        model.shapes[0].material_ids = vec![Some(0), None];
        model.shapes[1].material_ids = vec![Some(7), Some(0)];
        let store = GeometryStore::load(&model).unwrap();
        assert_eq!(store.submeshes()[0].color, Color::RED);
        assert_eq!(store.submeshes()[1].color, Color::DEFAULT_GRAY);
    }

    #[test]
    fn test_bad_references_fail_whole_load() {
        let mut model = test_models::quad_row(2);
        model.shapes[1].corners[0] = Corner::new(999, None, None);
        assert!(matches!(
            GeometryStore::load(&model),
            Err(LoadError::MalformedGeometry { .. })
        ));

        let mut model = test_models::quad_row(1);
        model.shapes[0].corners[0].normal = Some(3);
        assert!(matches!(
            GeometryStore::load(&model),
            Err(LoadError::MalformedGeometry { .. })
        ));

        let mut model = test_models::quad_row(1);
        model.shapes[0].corners.pop();
        assert!(matches!(
            GeometryStore::load(&model),
            Err(LoadError::MalformedGeometry { .. })
        ));
    }

    #[test]
    fn test_empty_model() {
        assert!(matches!(GeometryStore::load(&ImportedModel::default()), Err(LoadError::Empty)));

        let mut model = ImportedModel::default();
        model.shapes.push(Shape { name: "nothing".into(), ..Shape::default() });
        assert!(matches!(GeometryStore::load(&model), Err(LoadError::Empty)));
    }

    #[test]
    fn test_degenerate_extent_uses_unit_scale() {
        let model = test_models::triangles(&[[Vec3::ZERO, Vec3::ZERO, Vec3::ZERO]]);
        let store = GeometryStore::load(&model).unwrap();
        assert_eq!(store.normalization_scale(), 1.0);
        assert_eq!(store.diagonal(), 1.0);
    }

    #[test]
    fn test_unnamed_shape_gets_a_name() {
        let store = GeometryStore::load(&test_models::triangles(&[[Vec3::ZERO, Vec3::X, Vec3::UP]])).unwrap();
        assert_eq!(store.submeshes()[0].name, "shape_0");
    }
}
