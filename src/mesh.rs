//! Immutable mesh data: the geometry the pipeline reads but never mutates.
//!
//! A [`Mesh`] holds per-vertex positions, optional normals, per-vertex base
//! colors and triangle index triples. All per-vertex sequences are validated
//! to the same length and every face index is checked at construction, so the
//! rest of the pipeline can index without re-checking.

use std::fmt;
use std::path::Path;

use crate::color::Rgb;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;

/// Errors produced while constructing or importing a mesh.
#[derive(Debug)]
pub enum LoadError {
    /// The OBJ file could not be read or parsed.
    Obj(tobj::LoadError),
    /// The file parsed but contained no mesh.
    NoMeshData,
    /// A face resolved to something other than exactly 3 indices.
    NonTriangleFace { face: usize, arity: usize },
    /// A face references a vertex that does not exist.
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
    /// A per-vertex attribute sequence does not match the position count.
    AttributeLengthMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Obj(e) => write!(f, "failed to load OBJ file: {e}"),
            LoadError::NoMeshData => write!(f, "OBJ file contains no mesh data"),
            LoadError::NonTriangleFace { face, arity } => {
                write!(f, "face {face} has {arity} indices, expected exactly 3")
            }
            LoadError::IndexOutOfRange {
                face,
                index,
                vertex_count,
            } => write!(
                f,
                "face {face} references vertex {index}, but the mesh has {vertex_count} vertices"
            ),
            LoadError::AttributeLengthMismatch {
                attribute,
                expected,
                actual,
            } => write!(
                f,
                "{attribute} count {actual} does not match vertex count {expected}"
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Obj(e) => Some(e),
            _ => None,
        }
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(e: tobj::LoadError) -> Self {
        LoadError::Obj(e)
    }
}

/// Immutable triangle mesh with per-vertex base colors.
#[derive(Debug)]
pub struct Mesh {
    positions: Vec<Vec4>,
    normals: Option<Vec<Vec4>>,
    faces: Vec<[u32; 3]>,
    colors: Vec<Rgb>,
}

impl Mesh {
    /// Builds a mesh from Y-up model-space data.
    ///
    /// The Y sign of every position is flipped on the way in so that screen Y
    /// grows downward. This flip and the clockwise front-face convention in
    /// the visibility filter are a matched pair; changing one without the
    /// other inverts visibility everywhere.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        faces: Vec<[u32; 3]>,
        colors: Vec<Rgb>,
    ) -> Result<Self, LoadError> {
        let vertex_count = positions.len();

        if let Some(ref n) = normals {
            if n.len() != vertex_count {
                return Err(LoadError::AttributeLengthMismatch {
                    attribute: "normal",
                    expected: vertex_count,
                    actual: n.len(),
                });
            }
        }
        if colors.len() != vertex_count {
            return Err(LoadError::AttributeLengthMismatch {
                attribute: "color",
                expected: vertex_count,
                actual: colors.len(),
            });
        }
        for (face, indices) in faces.iter().enumerate() {
            for &index in indices {
                if index as usize >= vertex_count {
                    return Err(LoadError::IndexOutOfRange {
                        face,
                        index,
                        vertex_count,
                    });
                }
            }
        }

        Ok(Self {
            positions: positions
                .into_iter()
                .map(|p| Vec4::point(p.x, -p.y, p.z))
                .collect(),
            normals: normals
                .map(|ns| ns.into_iter().map(|n| Vec4::direction(n.x, n.y, n.z)).collect()),
            faces,
            colors,
        })
    }

    /// Loads the first mesh of an OBJ file, painting every vertex `color`.
    ///
    /// Any face with other than exactly 3 indices is a fatal import error.
    pub fn from_obj<P: AsRef<Path>>(path: P, color: Rgb) -> Result<Self, LoadError> {
        let options = tobj::LoadOptions {
            single_index: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path.as_ref(), &options)?;
        let model = models.first().ok_or(LoadError::NoMeshData)?;
        let mesh = &model.mesh;

        // An empty arity table means every face is already a triangle.
        for (face, &arity) in mesh.face_arities.iter().enumerate() {
            if arity != 3 {
                return Err(LoadError::NonTriangleFace {
                    face,
                    arity: arity as usize,
                });
            }
        }

        let positions: Vec<Vec3> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();
        let normals = if mesh.normals.is_empty() {
            None
        } else {
            Some(
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| Vec3::new(n[0], n[1], n[2]))
                    .collect(),
            )
        };
        let faces: Vec<[u32; 3]> = mesh
            .indices
            .chunks_exact(3)
            .map(|i| [i[0], i[1], i[2]])
            .collect();
        let colors = vec![color; positions.len()];

        Mesh::new(positions, normals, faces, colors)
    }

    /// A unit cube centered on the origin, faces wound counter-clockwise when
    /// seen from outside (Y-up model space).
    pub fn cube(color: Rgb) -> Self {
        let positions = vec![
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
        ];
        let faces = vec![
            // near (+Z)
            [0, 1, 2],
            [0, 2, 3],
            // far (-Z)
            [4, 5, 6],
            [4, 6, 7],
            // right (+X)
            [1, 4, 7],
            [1, 7, 2],
            // left (-X)
            [5, 0, 3],
            [5, 3, 6],
            // top (+Y)
            [3, 2, 7],
            [3, 7, 6],
            // bottom (-Y)
            [5, 4, 1],
            [5, 1, 0],
        ];
        let colors = vec![color; positions.len()];

        // Static data is well formed; validation cannot fail here.
        Mesh::new(positions, None, faces, colors).expect("built-in cube mesh is valid")
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec4] {
        &self.positions
    }

    pub fn normals(&self) -> Option<&[Vec4]> {
        self.normals.as_deref()
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}
