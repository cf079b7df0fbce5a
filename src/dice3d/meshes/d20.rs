use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

use crate::dice3d::types::{Face, GeometryError, FACE_COUNT};

const PHI: f32 = 1.618_034;

/// Faces smaller than this are treated as collapsed.
pub const MIN_FACE_AREA: f32 = 1e-6;

/// Wireframe shell radius, relative to the die radius.
const WIREFRAME_SCALE: f32 = 0.97;
const WIREFRAME_SHELL_OFFSETS: [f32; 7] = [-0.003, -0.002, -0.001, 0.0, 0.001, 0.002, 0.003];

/// Outline loops drawn per face; repeated slightly outward for thickness.
const OUTLINE_SCALES: [f32; 4] = [1.000, 1.002, 1.004, 1.006];

// Icosahedron has 12 vertices
const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = [
    [0.0, 1.0, PHI],
    [0.0, -1.0, PHI],
    [0.0, 1.0, -PHI],
    [0.0, -1.0, -PHI],
    [1.0, PHI, 0.0],
    [-1.0, PHI, 0.0],
    [1.0, -PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, 1.0],
    [PHI, 0.0, -1.0],
    [-PHI, 0.0, -1.0],
];

// 20 triangular faces; face i carries the number i + 1
const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 1, 8],
    [0, 8, 4],
    [0, 4, 5],
    [0, 5, 9],
    [0, 9, 1],
    [1, 6, 8],
    [8, 6, 10],
    [8, 10, 4],
    [4, 10, 2],
    [4, 2, 5],
    [5, 2, 11],
    [5, 11, 9],
    [9, 11, 7],
    [9, 7, 1],
    [1, 7, 6],
    [3, 6, 7],
    [3, 10, 6],
    [3, 2, 10],
    [3, 11, 2],
    [3, 7, 11],
];

/// Geometry and per-face data of a built d20.
///
/// Only [`build_die`] constructs one, so it always carries exactly
/// [`FACE_COUNT`] faces.
#[derive(Resource, Debug, Clone)]
pub struct D20Model {
    radius: f32,
    bevel: f32,
    vertices: Vec<Vec3>,
    triangles: Vec<[usize; 3]>,
    /// Indexed by `number - 1`.
    faces: Vec<Face>,
}

impl D20Model {
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn bevel(&self) -> f32 {
        self.bevel
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face(&self, number: u8) -> Option<&Face> {
        self.faces.get(usize::from(number).checked_sub(1)?)
    }

    /// The 30 distinct edges as vertex index pairs.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .triangles
            .iter()
            .flat_map(|t| [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])])
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }
}

/// Build a d20 whose corners sit at `radius - bevel` from the center.
pub fn build_die(radius: f32, bevel: f32) -> Result<D20Model, GeometryError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(GeometryError::NonPositiveRadius { radius });
    }
    if !(bevel.is_finite() && (0.0..radius).contains(&bevel)) {
        return Err(GeometryError::InvalidBevel { bevel, radius });
    }

    let corner_distance = radius - bevel;
    let vertices: Vec<Vec3> = ICOSAHEDRON_VERTICES
        .iter()
        .map(|&v| Vec3::from_array(v).normalize() * corner_distance)
        .collect();

    let mut triangles = Vec::with_capacity(ICOSAHEDRON_FACES.len());
    let mut faces = Vec::with_capacity(ICOSAHEDRON_FACES.len());
    for (i, tri) in ICOSAHEDRON_FACES.iter().enumerate() {
        let number = (i + 1) as u8;
        let mut tri = *tri;
        let [v0, v1, v2] = tri.map(|k| vertices[k]);

        let cross = (v1 - v0).cross(v2 - v0);
        let area = cross.length() * 0.5;
        if !(area > MIN_FACE_AREA) {
            return Err(GeometryError::DegenerateFace { number, area });
        }

        let center = (v0 + v1 + v2) / 3.0;
        let mut normal = cross.normalize();
        // Keep the winding outward so normals never point into the die.
        if normal.dot(center) < 0.0 {
            normal = -normal;
            tri.swap(1, 2);
        }

        triangles.push(tri);
        faces.push(Face {
            number,
            normal,
            center,
            corners: tri.map(|k| vertices[k]),
        });
    }
    debug_assert_eq!(faces.len(), usize::from(FACE_COUNT));

    Ok(D20Model {
        radius,
        bevel,
        vertices,
        triangles,
        faces,
    })
}

/// Flat-shaded body mesh. UVs wrap around the vertical axis so a tiling
/// texture covers every face.
pub fn create_d20_mesh(model: &D20Model) -> Mesh {
    let mut positions = Vec::with_capacity(model.faces.len() * 3);
    let mut normals = Vec::with_capacity(model.faces.len() * 3);
    let mut uvs = Vec::with_capacity(model.faces.len() * 3);
    let extent = model.radius - model.bevel;

    for face in &model.faces {
        let n = face.normal.to_array();
        for corner in face.corners {
            positions.push(corner.to_array());
            normals.push(n);
            uvs.push(wrap_uv(corner, extent));
        }
    }

    let indices: Vec<u32> = (0..positions.len() as u32).collect();

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}

fn wrap_uv(p: Vec3, extent: f32) -> [f32; 2] {
    let u = p.z.atan2(p.x) / std::f32::consts::TAU + 0.5;
    let v = 0.5 - p.y / (2.0 * extent);
    [u * 2.0, v * 2.0]
}

/// Black edge lines, drawn as a few concentric shells to read as a thick outline.
pub fn create_wireframe_mesh(model: &D20Model) -> Mesh {
    let edges = model.edges();
    let mut positions = Vec::with_capacity(edges.len() * 2 * WIREFRAME_SHELL_OFFSETS.len());

    for offset in WIREFRAME_SHELL_OFFSETS {
        let shell = model.radius * WIREFRAME_SCALE + offset;
        for &(a, b) in &edges {
            positions.push((model.vertices[a].normalize() * shell).to_array());
            positions.push((model.vertices[b].normalize() * shell).to_array());
        }
    }

    line_mesh(positions)
}

/// Closed outline around one face, used as its highlight overlay.
pub fn create_face_outline_mesh(face: &Face) -> Mesh {
    let mut positions = Vec::with_capacity(OUTLINE_SCALES.len() * 6);
    for scale in OUTLINE_SCALES {
        let [a, b, c] = face.corners.map(|v| v * scale);
        for (start, end) in [(a, b), (b, c), (c, a)] {
            positions.push(start.to_array());
            positions.push(end.to_array());
        }
    }
    line_mesh(positions)
}

fn line_mesh(positions: Vec<[f32; 3]>) -> Mesh {
    // Lines are drawn unlit; normals only point outward so the mesh layout
    // matches the lit body.
    let normals: Vec<[f32; 3]> = positions
        .iter()
        .map(|p| Vec3::from_array(*p).normalize_or_zero().to_array())
        .collect();

    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_die_has_twenty_numbered_faces() {
        let model = build_die(1.0, 0.03).unwrap();
        assert_eq!(model.faces.len(), 20);
        for (i, face) in model.faces.iter().enumerate() {
            assert_eq!(face.number as usize, i + 1);
            assert_eq!(model.face(face.number), Some(face));
        }
        assert!(model.face(0).is_none());
        assert!(model.face(21).is_none());
    }

    #[test]
    fn test_normals_are_unit_and_outward() {
        let model = build_die(1.0, 0.03).unwrap();
        for face in &model.faces {
            assert!((face.normal.length() - 1.0).abs() < 1e-5);
            assert!(face.normal.dot(face.center) > 0.0);
            let [a, b, c] = face.corners;
            let winding = (b - a).cross(c - a).normalize();
            assert!(winding.dot(face.normal) > 0.999);
        }
    }

    #[test]
    fn test_corners_sit_at_bevelled_radius() {
        let model = build_die(1.0, 0.03).unwrap();
        for v in &model.vertices {
            assert!((v.length() - 0.97).abs() < 1e-5);
        }
    }

    #[test]
    fn test_center_is_mean_of_corners() {
        let model = build_die(2.0, 0.1).unwrap();
        for face in &model.faces {
            let [a, b, c] = face.corners;
            assert!((face.center - (a + b + c) / 3.0).length() < 1e-6);
        }
    }

    #[test]
    fn test_icosahedron_has_thirty_edges() {
        let model = build_die(1.0, 0.0).unwrap();
        assert_eq!(model.edges().len(), 30);
    }

    #[test]
    fn test_normals_are_distinct() {
        let model = build_die(1.0, 0.03).unwrap();
        for (i, a) in model.faces.iter().enumerate() {
            for b in &model.faces[i + 1..] {
                assert!(a.normal.dot(b.normal) < 0.99);
            }
        }
    }

    #[test]
    fn test_invalid_radius_is_rejected() {
        assert!(matches!(
            build_die(0.0, 0.0),
            Err(GeometryError::NonPositiveRadius { .. })
        ));
        assert!(matches!(
            build_die(f32::NAN, 0.0),
            Err(GeometryError::NonPositiveRadius { .. })
        ));
    }

    #[test]
    fn test_invalid_bevel_is_rejected() {
        assert!(matches!(
            build_die(1.0, 1.0),
            Err(GeometryError::InvalidBevel { .. })
        ));
        assert!(matches!(
            build_die(1.0, -0.1),
            Err(GeometryError::InvalidBevel { .. })
        ));
    }

    #[test]
    fn test_collapsed_faces_are_rejected() {
        let result = build_die(1.0, 1.0 - 1e-5);
        assert!(matches!(
            result,
            Err(GeometryError::DegenerateFace { number: 1, .. })
        ));
    }

    #[test]
    fn test_outline_mesh_has_three_segments_per_scale() {
        let model = build_die(1.0, 0.03).unwrap();
        let mesh = create_face_outline_mesh(&model.faces[0]);
        assert_eq!(mesh.count_vertices(), OUTLINE_SCALES.len() * 6);
    }

    #[test]
    fn test_body_mesh_vertex_count() {
        let model = build_die(1.0, 0.03).unwrap();
        assert_eq!(create_d20_mesh(&model).count_vertices(), 60);
        assert_eq!(
            create_wireframe_mesh(&model).count_vertices(),
            30 * 2 * WIREFRAME_SHELL_OFFSETS.len()
        );
    }
}
