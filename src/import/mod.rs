//! Geometry file import
//!
//! Turns Wavefront OBJ/MTL text into an `ImportedModel`: shared attribute
//! tables plus a list of shapes whose corners index into them. No validation
//! of index ranges happens here, `GeometryStore::load` owns that.

pub mod mtl;
pub mod obj;

use std::path::Path;

use crate::error::LoadError;
use crate::rasterizer::{Color, Vec2, Vec3};

/// One face corner. Indices are 0-based into the model's attribute tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub position: usize,
    pub normal: Option<usize>,
    pub texcoord: Option<usize>,
}

impl Corner {
    pub fn new(position: usize, normal: Option<usize>, texcoord: Option<usize>) -> Self {
        Self { position, normal, texcoord }
    }
}

/// A named group of triangles (three consecutive corners each)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub name: String,
    pub corners: Vec<Corner>,
    /// Material of each triangle, `None` when the face has no usable material
    pub material_ids: Vec<Option<usize>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse: Color,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedModel {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    pub shapes: Vec<Shape>,
    pub materials: Vec<Material>,
}

/// Read an OBJ file and any material libraries it references
pub fn load_obj(path: &Path) -> Result<ImportedModel, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let model = obj::parse(&contents, |lib| {
        let mtl_path = base_dir.join(lib);
        match mtl::load(&mtl_path) {
            Ok(materials) => {
                log::debug!("Loaded {} materials from {}", materials.len(), mtl_path.display());
                materials
            }
            Err(e) => {
                log::warn!("Ignoring material library: {}", e);
                Vec::new()
            }
        }
    })?;

    log::info!(
        "Imported {}: {} positions, {} shapes, {} materials",
        path.display(),
        model.positions.len(),
        model.shapes.len(),
        model.materials.len()
    );
    Ok(model)
}
