//! Scene state: the loaded geometry and the camera/object transforms

mod geometry;
mod transform;

pub use geometry::{GeometryStore, SubMesh};
pub use transform::{Motion, ObjectTransform, TransformModel};

/// Small hand-built models shared by tests across the crate
#[cfg(test)]
pub mod test_models {
    use crate::import::{Corner, ImportedModel, Shape};
    use crate::rasterizer::Vec3;

    /// One shape made of the given triangles, no normals
    pub fn triangles(tris: &[[Vec3; 3]]) -> ImportedModel {
        let mut model = ImportedModel::default();
        let mut shape = Shape::default();
        for tri in tris {
            for &p in tri {
                shape.corners.push(Corner::new(model.positions.len(), None, None));
                model.positions.push(p);
            }
            shape.material_ids.push(None);
        }
        model.shapes.push(shape);
        model
    }

    /// Axis-aligned cube of half-size `h` around the origin, 8 shared
    /// positions, 12 outward-facing triangles
    pub fn cube(h: f32) -> ImportedModel {
        let mut model = ImportedModel::default();
        for i in 0..8 {
            let bit = |b: usize| if i & (1 << b) != 0 { h } else { -h };
            model.positions.push(Vec3::new(bit(0), bit(1), bit(2)));
        }
        let quads = [
            [0, 2, 3, 1], // -z
            [4, 5, 7, 6], // +z
            [0, 1, 5, 4], // -y
            [2, 6, 7, 3], // +y
            [0, 4, 6, 2], // -x
            [1, 3, 7, 5], // +x
        ];
        let mut shape = Shape {
            name: "cube".into(),
            ..Shape::default()
        };
        for [a, b, c, d] in quads {
            for idx in [a, b, c, a, c, d] {
                shape.corners.push(Corner::new(idx, None, None));
            }
            shape.material_ids.extend([None, None]);
        }
        model.shapes.push(shape);
        model
    }

    /// `n` unit quads facing +Z, side by side along X with a gap, one shape each
    pub fn quad_row(n: usize) -> ImportedModel {
        let mut model = ImportedModel::default();
        for i in 0..n {
            let x0 = i as f32 * 1.5;
            let base = model.positions.len();
            model.positions.extend([
                Vec3::new(x0, 0.0, 0.0),
                Vec3::new(x0 + 1.0, 0.0, 0.0),
                Vec3::new(x0 + 1.0, 1.0, 0.0),
                Vec3::new(x0, 1.0, 0.0),
            ]);
            let mut shape = Shape {
                name: format!("part {}", i),
                ..Shape::default()
            };
            for k in [0, 1, 2, 0, 2, 3] {
                shape.corners.push(Corner::new(base + k, None, None));
            }
            shape.material_ids.extend([None, None]);
            model.shapes.push(shape);
        }
        model
    }
}
