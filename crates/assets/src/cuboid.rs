use crate::store::{MeshId, content_hash};
use glam::Vec3;
use serde::Serialize;

/// Floats per vertex (x, y, z).
pub const FLOATS_PER_VERTEX: usize = 3;
/// Vertices per cuboid: 6 faces, 2 triangles each, 3 vertices per triangle.
pub const CUBOID_VERTEX_COUNT: usize = 36;
/// Length of a cuboid vertex buffer in floats.
pub const CUBOID_FLOAT_COUNT: usize = CUBOID_VERTEX_COUNT * FLOATS_PER_VERTEX;

/// One of the six cuboid faces, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Top,
    Bottom,
    Front,
    Back,
    Left,
    Right,
}

impl Face {
    /// Faces in the order they appear in the vertex buffer.
    pub const ORDER: [Face; 6] = [
        Face::Top,
        Face::Bottom,
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
    ];

    /// Unit normal pointing out of the cuboid through this face.
    pub fn outward_normal(self) -> Vec3 {
        match self {
            Face::Top => Vec3::Y,
            Face::Bottom => Vec3::NEG_Y,
            Face::Front => Vec3::Z,
            Face::Back => Vec3::NEG_Z,
            Face::Left => Vec3::NEG_X,
            Face::Right => Vec3::X,
        }
    }

    fn position(self) -> usize {
        self as usize
    }
}

/// Corner indices for each face, two counter-clockwise triangles sharing the
/// repeated diagonal. Changing this table flips faces under back-face culling.
#[rustfmt::skip]
const FACE_CORNERS: [[usize; 6]; 6] = [
    [1, 2, 3, 3, 0, 1], // top
    [4, 7, 6, 6, 5, 4], // bottom
    [0, 3, 7, 7, 4, 0], // front
    [1, 5, 6, 6, 2, 1], // back
    [2, 6, 7, 7, 3, 2], // left
    [0, 4, 5, 5, 1, 0], // right
];

/// The eight corners of a cube centered at `center` with edge length `size`.
///
/// p0..p3 form the top ring (+y) starting at +x+z and winding through -z,
/// p4..p7 repeat the same ring at -y.
pub fn corner_points(center: Vec3, size: f32) -> [Vec3; 8] {
    let h = size / 2.0;
    [
        center + Vec3::new(h, h, h),
        center + Vec3::new(h, h, -h),
        center + Vec3::new(-h, h, -h),
        center + Vec3::new(-h, h, h),
        center + Vec3::new(h, -h, h),
        center + Vec3::new(h, -h, -h),
        center + Vec3::new(-h, -h, -h),
        center + Vec3::new(-h, -h, h),
    ]
}

/// Flat triangle-list vertex buffer for a cube: 108 floats, faces ordered
/// top, bottom, front, back, left, right.
///
/// A zero `size` is not an error; every vertex collapses onto `center`.
pub fn cuboid_vertices(center: Vec3, size: f32) -> Vec<f32> {
    let corners = corner_points(center, size);
    let mut out = Vec::with_capacity(CUBOID_FLOAT_COUNT);
    for face in FACE_CORNERS {
        for idx in face {
            out.extend_from_slice(&corners[idx].to_array());
        }
    }
    out
}

/// Immutable cuboid geometry, shared by every block of the same shape.
///
/// The content id is hashed once at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuboidMesh {
    id: MeshId,
    center: Vec3,
    size: f32,
    vertices: Vec<f32>,
}

impl CuboidMesh {
    pub fn new(center: Vec3, size: f32) -> Self {
        let vertices = cuboid_vertices(center, size);
        Self {
            id: content_hash(&vertices),
            center,
            size,
            vertices,
        }
    }

    /// Unit cube at the origin.
    pub fn unit() -> Self {
        Self::new(Vec3::ZERO, 1.0)
    }

    /// Content id: equal geometry always yields the same id.
    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Raw float buffer, three floats per vertex.
    pub fn as_slice(&self) -> &[f32] {
        &self.vertices
    }

    /// Byte view for GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The buffer viewed as `[x, y, z]` positions.
    pub fn positions(&self) -> &[[f32; 3]] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    /// Triangles in emission order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.positions().chunks_exact(3).map(|tri| {
            [
                Vec3::from_array(tri[0]),
                Vec3::from_array(tri[1]),
                Vec3::from_array(tri[2]),
            ]
        })
    }

    /// The six vertices emitted for one face.
    pub fn face(&self, face: Face) -> [Vec3; 6] {
        let start = face.position() * 6;
        let p = &self.positions()[start..start + 6];
        std::array::from_fn(|i| Vec3::from_array(p[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_normal(tri: [Vec3; 3]) -> Vec3 {
        (tri[1] - tri[0]).cross(tri[2] - tri[0])
    }

    #[test]
    fn buffer_has_108_floats() {
        for size in [0.5, 1.0, 2.0, 17.25] {
            let v = cuboid_vertices(Vec3::new(1.0, -2.0, 3.0), size);
            assert_eq!(v.len(), CUBOID_FLOAT_COUNT);
            assert_eq!(v.len(), 108);
        }
    }

    #[test]
    fn zero_size_collapses_to_center() {
        let center = Vec3::new(4.0, 5.0, -6.0);
        let mesh = CuboidMesh::new(center, 0.0);
        assert_eq!(mesh.vertex_count(), 36);
        for p in mesh.positions() {
            assert_eq!(Vec3::from_array(*p), center);
        }
    }

    #[test]
    fn corners_follow_fixed_labeling() {
        let c = corner_points(Vec3::ZERO, 2.0);
        assert_eq!(c[0], Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(c[1], Vec3::new(1.0, 1.0, -1.0));
        assert_eq!(c[2], Vec3::new(-1.0, 1.0, -1.0));
        assert_eq!(c[3], Vec3::new(-1.0, 1.0, 1.0));
        assert_eq!(c[4], Vec3::new(1.0, -1.0, 1.0));
        assert_eq!(c[5], Vec3::new(1.0, -1.0, -1.0));
        assert_eq!(c[6], Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(c[7], Vec3::new(-1.0, -1.0, 1.0));
    }

    #[test]
    fn first_face_is_top_with_exact_corner_order() {
        let mesh = CuboidMesh::unit();
        let c = corner_points(Vec3::ZERO, 1.0);
        let top = mesh.face(Face::Top);
        assert_eq!(top, [c[1], c[2], c[3], c[3], c[0], c[1]]);
    }

    #[test]
    fn every_triangle_winds_counter_clockwise_from_outside() {
        let mesh = CuboidMesh::new(Vec3::new(0.3, -1.0, 2.0), 1.5);
        let tris: Vec<_> = mesh.triangles().collect();
        assert_eq!(tris.len(), 12);
        for (i, tri) in tris.iter().enumerate() {
            let face = Face::ORDER[i / 2];
            let n = triangle_normal(*tri).normalize();
            assert!(
                n.dot(face.outward_normal()) > 0.999,
                "triangle {i} on {face:?} faces {n:?}"
            );
        }
    }

    #[test]
    fn each_face_repeats_its_diagonal() {
        let mesh = CuboidMesh::unit();
        for face in Face::ORDER {
            let v = mesh.face(face);
            assert_eq!(v[2], v[3], "{face:?}");
            assert_eq!(v[0], v[5], "{face:?}");
        }
    }

    #[test]
    fn faces_lie_on_their_planes() {
        let mesh = CuboidMesh::unit();
        for face in Face::ORDER {
            let n = face.outward_normal();
            for v in mesh.face(face) {
                assert!((v.dot(n) - 0.5).abs() < 1e-6, "{face:?} {v:?}");
            }
        }
    }

    #[test]
    fn id_is_fixed_by_geometry() {
        let a = CuboidMesh::new(Vec3::new(1.0, 2.0, 3.0), 0.5);
        let b = CuboidMesh::new(Vec3::new(1.0, 2.0, 3.0), 0.5);
        let c = CuboidMesh::new(Vec3::new(1.0, 2.0, 3.0), 0.75);
        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
        assert_eq!(a.id(), content_hash(a.as_slice()));
    }

    #[test]
    fn byte_view_matches_float_count() {
        let mesh = CuboidMesh::unit();
        assert_eq!(mesh.as_bytes().len(), CUBOID_FLOAT_COUNT * 4);
    }
}
