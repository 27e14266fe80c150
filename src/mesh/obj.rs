//! Wavefront OBJ loading
//!
//! Supports `v`, `vn`, `vt` and `f` records. Faces with more than three
//! corners are fan-triangulated; faces without normals get a flat face
//! normal. Everything else (groups, materials, smoothing) is skipped.

use std::fs;
use std::path::Path;

use super::{Corner, Mesh};
use crate::rasterizer::{Vec2, Vec3};

/// Error type for mesh loading
#[derive(Debug)]
pub enum ObjError {
    IoError(std::io::Error),
    ParseError { line: usize, message: String },
    IndexOutOfRange { line: usize, index: i64 },
}

impl From<std::io::Error> for ObjError {
    fn from(e: std::io::Error) -> Self {
        ObjError::IoError(e)
    }
}

impl std::fmt::Display for ObjError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjError::IoError(e) => write!(f, "IO error: {}", e),
            ObjError::ParseError { line, message } => write!(f, "Parse error on line {}: {}", line, message),
            ObjError::IndexOutOfRange { line, index } => {
                write!(f, "Index {} out of range on line {}", index, line)
            }
        }
    }
}

impl std::error::Error for ObjError {}

/// Load a mesh from an OBJ file
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    load_obj_from_str(&contents, &name)
}

/// Index as written in the file, and its 0-based slot in the pool
#[derive(Clone, Copy)]
struct RawIndex {
    written: i64,
    slot: i64,
}

impl RawIndex {
    fn check(self, len: usize, line: usize) -> Result<usize, ObjError> {
        if self.slot < 0 || self.slot >= len as i64 {
            return Err(ObjError::IndexOutOfRange { line, index: self.written });
        }
        Ok(self.slot as usize)
    }
}

/// `v/t/n` corner as parsed, not yet range-checked
struct RawCorner {
    position: RawIndex,
    texcoord: Option<RawIndex>,
    normal: Option<RawIndex>,
}

/// Corner with indices checked against the final pools
struct FaceCorner {
    position: usize,
    texcoord: Option<usize>,
    normal: Option<usize>,
}

/// Load a mesh from OBJ source text.
///
/// Faces may reference records that appear later in the file, so indices
/// are range-checked once everything has been read.
pub fn load_obj_from_str(src: &str, name: &str) -> Result<Mesh, ObjError> {
    let mut mesh = Mesh::new(name);
    let mut faces = Vec::new();

    for (i, raw_line) in src.lines().enumerate() {
        let line_no = i + 1;
        let line = raw_line.split('#').next().unwrap_or("").trim();
        let mut fields = line.split_whitespace();
        let Some(tag) = fields.next() else {
            continue;
        };

        match tag {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&mut fields, line_no)?;
                mesh.positions.push(Vec3::new(x, y, z));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&mut fields, line_no)?;
                mesh.normals.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(&mut fields, line_no)?;
                mesh.texcoords.push(Vec2::new(u, v));
            }
            "f" => {
                let corners = fields
                    .map(|f| parse_corner(f, &mesh, line_no))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(ObjError::ParseError {
                        line: line_no,
                        message: format!("face has {} corners", corners.len()),
                    });
                }
                faces.push((line_no, corners));
            }
            _ => {}
        }
    }

    // Pool sizes before flat normals get appended
    let (positions, texcoords, normals) = (mesh.positions.len(), mesh.texcoords.len(), mesh.normals.len());
    for (line, raw) in faces {
        let corners = raw
            .iter()
            .map(|c| -> Result<FaceCorner, ObjError> {
                Ok(FaceCorner {
                    position: c.position.check(positions, line)?,
                    texcoord: c.texcoord.map(|t| t.check(texcoords, line)).transpose()?,
                    normal: c.normal.map(|n| n.check(normals, line)).transpose()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        push_face(&mut mesh, &corners);
    }

    Ok(mesh)
}

fn parse_floats<'a, const N: usize>(
    fields: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[f32; N], ObjError> {
    let mut out = [0.0; N];
    for slot in out.iter_mut() {
        let field = fields.next().ok_or_else(|| ObjError::ParseError {
            line,
            message: format!("expected {} numbers", N),
        })?;
        *slot = field.parse().map_err(|_| ObjError::ParseError {
            line,
            message: format!("invalid number '{}'", field),
        })?;
    }
    Ok(out)
}

/// Parse a 1-based or negative index; negative ones count back from the
/// `seen` records read so far
fn parse_index(field: &str, seen: usize, line: usize) -> Result<RawIndex, ObjError> {
    let written: i64 = field.parse().map_err(|_| ObjError::ParseError {
        line,
        message: format!("invalid index '{}'", field),
    })?;
    let slot = if written < 0 { seen as i64 + written } else { written - 1 };
    Ok(RawIndex { written, slot })
}

fn parse_corner(field: &str, mesh: &Mesh, line: usize) -> Result<RawCorner, ObjError> {
    let mut parts = field.split('/');
    let position = parse_index(parts.next().unwrap_or(""), mesh.positions.len(), line)?;
    let texcoord = match parts.next() {
        Some(t) if !t.is_empty() => Some(parse_index(t, mesh.texcoords.len(), line)?),
        _ => None,
    };
    let normal = match parts.next() {
        Some(n) if !n.is_empty() => Some(parse_index(n, mesh.normals.len(), line)?),
        _ => None,
    };
    Ok(RawCorner { position, texcoord, normal })
}

/// Fan-triangulate a polygon (0, i, i + 1) and append its corners
fn push_face(mesh: &mut Mesh, corners: &[FaceCorner]) {
    // Flat normal shared by corners that carry none
    let mut flat_normal = None;
    let mut normal_for = |mesh: &mut Mesh, c: &FaceCorner| -> usize {
        if let Some(n) = c.normal {
            return n;
        }
        *flat_normal.get_or_insert_with(|| {
            let p0 = mesh.positions[corners[0].position];
            let p1 = mesh.positions[corners[1].position];
            let p2 = mesh.positions[corners[2].position];
            mesh.normals.push((p1 - p0).cross(p2 - p0).normalize());
            mesh.normals.len() - 1
        })
    };

    for i in 1..corners.len() - 1 {
        for c in [&corners[0], &corners[i], &corners[i + 1]] {
            let normal = normal_for(mesh, c);
            mesh.corners.push(Corner {
                position: c.position,
                normal,
                texcoord: c.texcoord,
            });
        }
    }
}
