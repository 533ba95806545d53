//! Wavefront OBJ parsing
//! Supports v, vt, vn, f (any polygon, fan-triangulated), o/g, usemtl and mtllib.

use super::{Corner, ImportedModel, Material, Shape};
use crate::error::LoadError;
use crate::rasterizer::{Vec2, Vec3};

/// Parse OBJ text. `load_mtl` is called with each `mtllib` argument and
/// returns the materials found there (empty on failure).
pub fn parse<F>(contents: &str, mut load_mtl: F) -> Result<ImportedModel, LoadError>
where
    F: FnMut(&str) -> Vec<Material>,
{
    let mut model = ImportedModel::default();
    let mut current = Shape::default();
    let mut current_material: Option<usize> = None;

    for (line_num, line) in contents.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let rest = || parts[1..].join(" ");

        match parts[0] {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&parts, line_num, "vertex position")?;
                model.positions.push(Vec3::new(x, y, z));
            }

            "vt" => {
                let [u, v] = parse_floats::<2>(&parts, line_num, "texture coordinate")?;
                model.texcoords.push(Vec2::new(u, v));
            }

            "vn" => {
                let [x, y, z] = parse_floats::<3>(&parts, line_num, "normal")?;
                model.normals.push(Vec3::new(x, y, z));
            }

            "f" => {
                if parts.len() < 4 {
                    return Err(parse_error(line_num, "Face must have at least 3 vertices"));
                }

                let mut face = Vec::with_capacity(parts.len() - 1);
                for token in &parts[1..] {
                    face.push(parse_corner(token, line_num, &model)?);
                }

                // Fan triangulation from the first corner, winding preserved
                for i in 1..face.len() - 1 {
                    current.corners.extend_from_slice(&[face[0], face[i], face[i + 1]]);
                    current.material_ids.push(current_material);
                }
            }

            "o" | "g" => {
                let name = rest();
                if current.corners.is_empty() {
                    // Nothing drawn yet under the old name, just rename
                    current.name = name;
                } else {
                    let done = std::mem::replace(&mut current, Shape { name, ..Shape::default() });
                    model.shapes.push(done);
                }
            }

            "usemtl" => {
                let name = rest();
                current_material = model.materials.iter().position(|m| m.name == name);
                if current_material.is_none() {
                    log::debug!("OBJ line {}: unknown material '{}'", line_num + 1, name);
                }
            }

            "mtllib" => {
                let lib = rest();
                let loaded = load_mtl(&lib);
                model.materials.extend(loaded);
            }

            other => {
                log::debug!("OBJ line {}: ignoring '{}'", line_num + 1, other);
            }
        }
    }

    if !current.corners.is_empty() {
        model.shapes.push(current);
    }

    Ok(model)
}

fn parse_error(line_num: usize, message: impl Into<String>) -> LoadError {
    LoadError::Parse {
        line: line_num + 1,
        message: message.into(),
    }
}

fn parse_floats<const N: usize>(parts: &[&str], line_num: usize, what: &str) -> Result<[f32; N], LoadError> {
    if parts.len() < N + 1 {
        return Err(parse_error(line_num, format!("Invalid {} (expected {} values)", what, N)));
    }
    let mut out = [0.0f32; N];
    for (v, s) in out.iter_mut().zip(&parts[1..]) {
        *v = s
            .parse()
            .map_err(|_| parse_error(line_num, format!("Invalid float value '{}'", s)))?;
    }
    Ok(out)
}

/// Parse a face corner like "1", "1/2", "1//3" or "1/2/3"
fn parse_corner(token: &str, line_num: usize, model: &ImportedModel) -> Result<Corner, LoadError> {
    let mut fields = token.split('/');

    let position = match fields.next() {
        Some(p) if !p.is_empty() => parse_index(p, model.positions.len(), line_num)?,
        _ => return Err(parse_error(line_num, "Missing position index in face")),
    };

    let texcoord = match fields.next() {
        Some(t) if !t.is_empty() => Some(parse_index(t, model.texcoords.len(), line_num)?),
        _ => None,
    };

    let normal = match fields.next() {
        Some(n) if !n.is_empty() => Some(parse_index(n, model.normals.len(), line_num)?),
        _ => None,
    };

    Ok(Corner::new(position, normal, texcoord))
}

/// Parse an index (handles negative indices for relative indexing).
/// Positive indices are not range-checked here.
fn parse_index(s: &str, count: usize, line_num: usize) -> Result<usize, LoadError> {
    let idx: i64 = s
        .parse()
        .map_err(|_| parse_error(line_num, format!("Invalid index '{}'", s)))?;

    if idx > 0 {
        Ok((idx - 1) as usize)
    } else if idx < 0 {
        let resolved = count as i64 + idx;
        if resolved < 0 {
            return Err(parse_error(
                line_num,
                format!("Relative index {} out of range (have {} elements)", idx, count),
            ));
        }
        Ok(resolved as usize)
    } else {
        Err(parse_error(line_num, "Index cannot be 0"))
    }
}
