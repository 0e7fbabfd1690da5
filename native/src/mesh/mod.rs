// Mesh identity, triangulation and the identity-keyed index cache.
//
// The GUI keeps its own copy of every mesh it has been sent, addressed by a
// small integer. Indices 0-3 are reserved for the primitive shapes built
// into the GUI; user meshes are numbered from 4 in the order they are first
// seen, and an identity keeps its index for the life of the link.

use std::collections::HashMap;
use uuid::Uuid;

use crate::error::LinkError;
use crate::protocol::command::{Command, MAX_MESH_TRIANGLES, MAX_MESH_VERTICES};

/// Opaque, process-lifetime-unique identity for a polygon mesh.
///
/// Compared by value, never by geometry: two meshes with bit-identical
/// vertex data still have distinct identities and distinct GUI-side indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(Uuid);

impl MeshId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MeshId {
    fn default() -> Self {
        Self::new()
    }
}

/// Primitive shapes understood natively by the GUI without a DefineMesh.
/// The discriminants are the GUI's hardcoded geometry table and must not
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinShape {
    Box = 0,
    Ellipsoid = 1,
    Cylinder = 2,
    Circle = 3,
}

impl BuiltinShape {
    pub fn mesh_index(self) -> u16 {
        self as u16
    }
}

/// Polygon mesh input: vertex positions plus per-face vertex index lists.
/// Faces may have any vertex count; triangulation happens on first send.
#[derive(Debug, Clone)]
pub struct PolygonMesh {
    id: MeshId,
    vertices: Vec<[f32; 3]>,
    faces: Vec<Vec<u32>>,
}

impl PolygonMesh {
    pub fn new(vertices: Vec<[f32; 3]>, faces: Vec<Vec<u32>>) -> Self {
        Self {
            id: MeshId::new(),
            vertices,
            faces,
        }
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }
}

/// Flattened, triangulated geometry ready for a DefineMesh message.
pub(crate) struct TriangulatedMesh {
    pub vertices: Vec<f32>,
    pub triangles: Vec<u16>,
}

/// Triangulation policy by face vertex count:
/// fewer than 3 is degenerate and silently dropped; 3 passes through;
/// 4 splits into (0,1,2) and (2,3,0) preserving winding; more than 4
/// appends one vertex at the face's arithmetic mean and fans around it,
/// one triangle per original edge.
pub(crate) fn triangulate(mesh: &PolygonMesh) -> Result<TriangulatedMesh, LinkError> {
    let mut vertices: Vec<f32> = Vec::with_capacity(mesh.vertices().len() * 3);
    for position in mesh.vertices() {
        vertices.extend_from_slice(position);
    }

    let mut triangles: Vec<u16> = Vec::new();
    for face in mesh.faces() {
        match face.len() {
            0..=2 => continue,
            3 => {
                for &v in face {
                    triangles.push(v as u16);
                }
            }
            4 => {
                triangles.push(face[0] as u16);
                triangles.push(face[1] as u16);
                triangles.push(face[2] as u16);
                triangles.push(face[2] as u16);
                triangles.push(face[3] as u16);
                triangles.push(face[0] as u16);
            }
            n => {
                let mut center = [0.0f32; 3];
                for &v in face {
                    let position = mesh.vertices()[v as usize];
                    center[0] += position[0];
                    center[1] += position[1];
                    center[2] += position[2];
                }
                for component in &mut center {
                    *component /= n as f32;
                }
                vertices.extend_from_slice(&center);
                let center_index = (vertices.len() / 3 - 1) as u16;
                for j in 0..n {
                    triangles.push(face[j] as u16);
                    triangles.push(face[(j + 1) % n] as u16);
                    triangles.push(center_index);
                }
            }
        }
    }

    let num_vertices = vertices.len() / 3;
    let num_triangles = triangles.len() / 3;
    if num_vertices > MAX_MESH_VERTICES {
        return Err(LinkError::TooManyVertices(num_vertices));
    }
    if num_triangles > MAX_MESH_TRIANGLES {
        return Err(LinkError::TooManyTriangles(num_triangles));
    }

    Ok(TriangulatedMesh {
        vertices,
        triangles,
    })
}

/// Identity-keyed map from mesh to its GUI-side index. Entries are created
/// on first sight and never evicted or reassigned.
pub(crate) struct MeshCache {
    indices: HashMap<MeshId, u16>,
}

impl MeshCache {
    /// Indices 0-3 belong to the built-in shapes.
    pub const FIRST_DYNAMIC_INDEX: u16 = 4;

    pub fn new() -> Self {
        Self {
            indices: HashMap::new(),
        }
    }

    /// The stable index for this mesh identity, plus the DefineMesh command
    /// to send first if the identity has never been seen.
    pub fn resolve(&mut self, mesh: &PolygonMesh) -> Result<(u16, Option<Command>), LinkError> {
        if let Some(&index) = self.indices.get(&mesh.id()) {
            return Ok((index, None));
        }

        let flattened = triangulate(mesh)?;
        let index = Self::FIRST_DYNAMIC_INDEX + self.indices.len() as u16;
        self.indices.insert(mesh.id(), index);
        Ok((
            index,
            Some(Command::DefineMesh {
                vertices: flattened.vertices,
                triangles: flattened.triangles,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_vertices() -> Vec<[f32; 3]> {
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ]
    }

    #[test]
    fn test_all_triangle_faces_pass_through() {
        let mesh = PolygonMesh::new(
            square_vertices(),
            vec![vec![0, 1, 2], vec![2, 3, 0]],
        );
        let flattened = triangulate(&mesh).unwrap();
        assert_eq!(flattened.vertices.len(), 4 * 3);
        assert_eq!(flattened.triangles, vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn test_quad_splits_into_two_triangles() {
        let mesh = PolygonMesh::new(square_vertices(), vec![vec![0, 1, 2, 3]]);
        let flattened = triangulate(&mesh).unwrap();
        // No new vertices; winding preserved across the diagonal.
        assert_eq!(flattened.vertices.len(), 4 * 3);
        assert_eq!(flattened.triangles, vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn test_pentagon_fans_around_one_centroid() {
        let vertices = vec![
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 0.5, 0.0],
            [-1.0, -0.5, 0.0],
            [0.0, -1.0, 0.0],
        ];
        let mut expected_center = [0.0f32; 3];
        for v in &vertices {
            for k in 0..3 {
                expected_center[k] += v[k] / 5.0;
            }
        }

        let mesh = PolygonMesh::new(vertices, vec![vec![0, 1, 2, 3, 4]]);
        let flattened = triangulate(&mesh).unwrap();

        // Exactly one appended vertex, at the arithmetic mean.
        assert_eq!(flattened.vertices.len(), 6 * 3);
        let center = &flattened.vertices[15..18];
        for k in 0..3 {
            assert!((center[k] - expected_center[k]).abs() < 1e-6);
        }

        // One triangle per original edge, all sharing the centroid.
        assert_eq!(flattened.triangles.len(), 5 * 3);
        for j in 0..5 {
            assert_eq!(
                &flattened.triangles[j * 3..j * 3 + 3],
                &[j as u16, ((j + 1) % 5) as u16, 5]
            );
        }
    }

    #[test]
    fn test_degenerate_faces_are_dropped() {
        let mesh = PolygonMesh::new(
            square_vertices(),
            vec![vec![], vec![0], vec![0, 1], vec![0, 1, 2]],
        );
        let flattened = triangulate(&mesh).unwrap();
        assert_eq!(flattened.triangles, vec![0, 1, 2]);
    }

    #[test]
    fn test_cache_deduplicates_by_identity() {
        let mut cache = MeshCache::new();
        let mesh = PolygonMesh::new(square_vertices(), vec![vec![0, 1, 2]]);

        let (first_index, define) = cache.resolve(&mesh).unwrap();
        assert_eq!(first_index, MeshCache::FIRST_DYNAMIC_INDEX);
        assert!(define.is_some());

        // Second encounter: same index, no second DefineMesh.
        let (second_index, define) = cache.resolve(&mesh).unwrap();
        assert_eq!(second_index, first_index);
        assert!(define.is_none());
    }

    #[test]
    fn test_identical_content_distinct_identities() {
        let mut cache = MeshCache::new();
        let a = PolygonMesh::new(square_vertices(), vec![vec![0, 1, 2]]);
        let b = PolygonMesh::new(square_vertices(), vec![vec![0, 1, 2]]);

        let (index_a, define_a) = cache.resolve(&a).unwrap();
        let (index_b, define_b) = cache.resolve(&b).unwrap();
        assert_ne!(index_a, index_b);
        assert!(define_a.is_some());
        assert!(define_b.is_some());
    }
}
