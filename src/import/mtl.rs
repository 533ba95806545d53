//! MTL material library parsing (diffuse colors only)

use std::path::Path;

use super::Material;
use crate::error::LoadError;
use crate::rasterizer::Color;

pub fn load(path: &Path) -> Result<Vec<Material>, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents)
}

/// Parse `newmtl` / `Kd` pairs. Materials without `Kd` keep the default gray.
pub fn parse(contents: &str) -> Result<Vec<Material>, LoadError> {
    let mut materials: Vec<Material> = Vec::new();

    for (line_num, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword {
            "newmtl" => {
                let name = parts.collect::<Vec<_>>().join(" ");
                materials.push(Material {
                    name,
                    diffuse: Color::DEFAULT_GRAY,
                });
            }
            "Kd" => {
                let values: Vec<&str> = parts.collect();
                if values.len() < 3 {
                    return Err(LoadError::Parse {
                        line: line_num + 1,
                        message: "Kd expects 3 values".to_string(),
                    });
                }
                let mut rgb = [0.0f32; 3];
                for (c, s) in rgb.iter_mut().zip(&values) {
                    *c = s.parse().map_err(|_| LoadError::Parse {
                        line: line_num + 1,
                        message: format!("Invalid float value '{}'", s),
                    })?;
                }
                match materials.last_mut() {
                    Some(m) => m.diffuse = Color::from(rgb),
                    None => log::debug!("MTL line {}: Kd before newmtl", line_num + 1),
                }
            }
            _ => {}
        }
    }

    Ok(materials)
}
