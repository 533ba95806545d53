//! OBJ + MTL export of the edited model
//!
//! Positions are baked through each sub-mesh's full world matrix and normals
//! through its inverse-transpose. Hidden sub-meshes are left out. Every
//! corner becomes its own `v`/`vn` pair, so face indices are consecutive and
//! continue across groups.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::rasterizer::math::{mat3_normal_matrix, mat3_transform, mat4_transform_point};
use crate::scene::{GeometryStore, TransformModel};

/// Counts of what was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub groups: usize,
    pub vertices: usize,
    pub faces: usize,
}

/// Material library path next to an OBJ path (`foo.obj` -> `foo.mtl`)
pub fn mtl_path_for(obj_path: &Path) -> PathBuf {
    obj_path.with_extension("mtl")
}

/// Material name used for a sub-mesh (spaces are not allowed in MTL names)
pub fn material_name(submesh_name: &str) -> String {
    format!("Mat_{}", submesh_name).replace(' ', "_")
}

pub fn export_obj(
    path: &Path,
    store: &GeometryStore,
    transforms: &TransformModel,
) -> Result<ExportSummary, ExportError> {
    let mtl_path = mtl_path_for(path);
    let io_err = |p: &Path| {
        let p = p.to_path_buf();
        move |source| ExportError::Io { path: p, source }
    };

    let mut obj = BufWriter::new(File::create(path).map_err(io_err(path))?);
    let mut mtl = BufWriter::new(File::create(&mtl_path).map_err(io_err(&mtl_path))?);

    let summary = write_model(&mut obj, &mut mtl, &mtl_path, store, transforms)
        .map_err(io_err(path))?;
    obj.flush().map_err(io_err(path))?;
    mtl.flush().map_err(io_err(&mtl_path))?;

    log::info!(
        "Exported {} groups ({} vertices, {} faces) to {}",
        summary.groups,
        summary.vertices,
        summary.faces,
        path.display()
    );
    Ok(summary)
}

fn write_model<O: Write, M: Write>(
    obj: &mut O,
    mtl: &mut M,
    mtl_path: &Path,
    store: &GeometryStore,
    transforms: &TransformModel,
) -> std::io::Result<ExportSummary> {
    let mtl_name = mtl_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    writeln!(obj, "# Exported by mesh-viewer")?;
    writeln!(obj, "mtllib {}", mtl_name)?;

    let mut summary = ExportSummary { groups: 0, vertices: 0, faces: 0 };
    let mut next_index = 1usize;
    let vertices = store.vertices();

    for sub in store.submeshes().iter().filter(|s| s.visible) {
        let mat_name = material_name(&sub.name);
        let c = sub.color;
        writeln!(mtl, "newmtl {}", mat_name)?;
        writeln!(mtl, "Kd {} {} {}", c.r, c.g, c.b)?;
        writeln!(mtl, "Ka 0.1 0.1 0.1\nKs 0.5 0.5 0.5\nNs 32\nd 1.0\nillum 2\n")?;

        writeln!(obj, "g {}", sub.name)?;
        writeln!(obj, "usemtl {}", mat_name)?;

        let world = transforms.submesh_matrix(sub.local_position);
        let normal_matrix = mat3_normal_matrix(&world);

        for &idx in &sub.indices {
            let v = &vertices[idx as usize];
            let p = mat4_transform_point(&world, v.pos);
            let n = mat3_transform(&normal_matrix, v.normal).normalize();
            writeln!(obj, "v {} {} {}", p.x, p.y, p.z)?;
            writeln!(obj, "vn {} {} {}", n.x, n.y, n.z)?;
        }

        let count = sub.indices.len();
        for i in (0..count - count % 3).step_by(3) {
            let (a, b, c) = (next_index + i, next_index + i + 1, next_index + i + 2);
            writeln!(obj, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }

        next_index += count;
        summary.groups += 1;
        summary.vertices += count;
        summary.faces += count / 3;
    }

    Ok(summary)
}
