//! Procedural geometry.
//!
//! Pure CPU-side builders that turn a handful of parameters into vertex and
//! index arrays. Nothing in here touches the GPU: the scenes upload the
//! results once through [`crate::data_structures::model::GpuMesh`].
//!
//! - `gear` builds toothed outlines and extrudes them into solids
//! - `primitives` contains boxes, faceted cylinders and tori
//! - `car` holds the hand-authored body panels and the wheel assembly
//! - `field` produces point clouds and the ground grid

use std::collections::HashMap;

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, Point3, SquareMatrix, Transform, Vector3};

pub mod car;
pub mod field;
pub mod gear;
pub mod primitives;

/// Indexed triangle geometry with per-vertex normals.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// Line segments, two indices per segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineSet {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// Unconnected points, rendered as small camera-facing quads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<[f32; 3]>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        self.positions.push(position);
        self.normals.push(normal);
        (self.positions.len() - 1) as u32
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Four vertices sharing one flat normal, split into two triangles.
    ///
    /// The corners must be given counter-clockwise as seen from the side the
    /// normal should face.
    pub fn push_quad(&mut self, a: [f32; 3], b: [f32; 3], c: [f32; 3], d: [f32; 3]) {
        let n = face_normal(a, b, c);
        let i0 = self.push_vertex(a, n);
        let i1 = self.push_vertex(b, n);
        let i2 = self.push_vertex(c, n);
        let i3 = self.push_vertex(d, n);
        self.push_triangle(i0, i1, i2);
        self.push_triangle(i0, i2, i3);
    }

    /// Appends `other`, re-basing its indices.
    pub fn append(&mut self, other: &Geometry) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Returns a copy with every vertex moved through `matrix`.
    ///
    /// Normals go through the inverse transpose so non-uniform scales keep
    /// them perpendicular to the surface.
    pub fn transformed(&self, matrix: Matrix4<f32>) -> Geometry {
        let linear = Matrix3::from_cols(
            matrix.x.truncate(),
            matrix.y.truncate(),
            matrix.z.truncate(),
        );
        let normal_matrix = linear
            .invert()
            .map(|inv| inv.transpose())
            .unwrap_or(linear);
        let positions = self
            .positions
            .iter()
            .map(|p| {
                let p: Point3<f32> = (*p).into();
                matrix.transform_point(p).into()
            })
            .collect();
        let normals = self
            .normals
            .iter()
            .map(|n| {
                let n = normal_matrix * Vector3::from(*n);
                if n.magnitude2() > 0.0 {
                    n.normalize().into()
                } else {
                    [0.0; 3]
                }
            })
            .collect();
        Geometry {
            positions,
            normals,
            indices: self.indices.clone(),
        }
    }

    /// Replaces the normals with area-weighted averages of the adjacent faces.
    pub fn with_smooth_normals(mut self) -> Self {
        let mut acc = vec![Vector3::new(0.0f32, 0.0, 0.0); self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let p0: Vector3<f32> = self.positions[tri[0] as usize].into();
            let p1: Vector3<f32> = self.positions[tri[1] as usize].into();
            let p2: Vector3<f32> = self.positions[tri[2] as usize].into();
            // unnormalized cross product weights by area
            let n = (p1 - p0).cross(p2 - p0);
            for &i in tri {
                acc[i as usize] += n;
            }
        }
        self.normals = acc
            .into_iter()
            .map(|n| {
                if n.magnitude2() > 0.0 {
                    n.normalize().into()
                } else {
                    [0.0, 1.0, 0.0]
                }
            })
            .collect();
        self
    }

    /// Every distinct triangle edge, for wireframe rendering.
    ///
    /// Vertices are welded by position first so seams between flat-shaded
    /// faces don't show up twice.
    pub fn wireframe(&self) -> LineSet {
        let (positions, remap) = weld(&self.positions);
        let mut seen = HashMap::new();
        let mut indices = Vec::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in triangle_edges(tri) {
                let (a, b) = (remap[a as usize], remap[b as usize]);
                if a == b {
                    continue;
                }
                let key = (a.min(b), a.max(b));
                if seen.insert(key, ()).is_none() {
                    indices.extend_from_slice(&[key.0, key.1]);
                }
            }
        }
        LineSet { positions, indices }
    }

    /// Boundary edges and edges whose adjacent faces meet at more than
    /// `threshold_deg` degrees, i.e. the silhouette lines of a hard-surface model.
    pub fn feature_edges(&self, threshold_deg: f32) -> LineSet {
        let (positions, remap) = weld(&self.positions);
        let cos_threshold = threshold_deg.to_radians().cos();

        // edge -> normals of the faces sharing it, in first-seen order
        let mut adjacency: HashMap<(u32, u32), Vec<Vector3<f32>>> = HashMap::new();
        let mut order = Vec::new();
        for tri in self.indices.chunks_exact(3) {
            let n: Vector3<f32> = face_normal(
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            )
            .into();
            for (a, b) in triangle_edges(tri) {
                let (a, b) = (remap[a as usize], remap[b as usize]);
                if a == b {
                    continue;
                }
                let key = (a.min(b), a.max(b));
                let faces = adjacency.entry(key).or_insert_with(|| {
                    order.push(key);
                    Vec::new()
                });
                faces.push(n);
            }
        }

        let mut indices = Vec::new();
        for key in order {
            let faces = &adjacency[&key];
            let is_feature = match faces.as_slice() {
                [_] => true,
                [n0, n1] => n0.dot(*n1) < cos_threshold,
                // non-manifold edges are always drawn
                _ => true,
            };
            if is_feature {
                indices.extend_from_slice(&[key.0, key.1]);
            }
        }
        LineSet { positions, indices }
    }
}

impl LineSet {
    pub fn segment_count(&self) -> usize {
        self.indices.len() / 2
    }

    pub fn push_segment(&mut self, a: [f32; 3], b: [f32; 3]) {
        let base = self.positions.len() as u32;
        self.positions.push(a);
        self.positions.push(b);
        self.indices.extend_from_slice(&[base, base + 1]);
    }

    /// Segment endpoints as position pairs, independent of index layout.
    pub fn segments(&self) -> impl Iterator<Item = ([f32; 3], [f32; 3])> + '_ {
        self.indices
            .chunks_exact(2)
            .map(|s| (self.positions[s[0] as usize], self.positions[s[1] as usize]))
    }
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

pub fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let a: Vector3<f32> = a.into();
    let b: Vector3<f32> = b.into();
    let c: Vector3<f32> = c.into();
    let n = (b - a).cross(c - a);
    if n.magnitude2() > 0.0 {
        n.normalize().into()
    } else {
        [0.0, 0.0, 0.0]
    }
}

fn triangle_edges(tri: &[u32]) -> [(u32, u32); 3] {
    [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])]
}

// Positions closer than this are treated as the same vertex.
const WELD_PRECISION: f32 = 1e-4;

fn weld(positions: &[[f32; 3]]) -> (Vec<[f32; 3]>, Vec<u32>) {
    let mut lookup: HashMap<[i64; 3], u32> = HashMap::new();
    let mut welded = Vec::new();
    let remap = positions
        .iter()
        .map(|p| {
            let key = p.map(|c| (c / WELD_PRECISION).round() as i64);
            *lookup.entry(key).or_insert_with(|| {
                welded.push(*p);
                (welded.len() - 1) as u32
            })
        })
        .collect();
    (welded, remap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> Geometry {
        let mut g = Geometry::new();
        g.push_quad(
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        );
        g
    }

    #[test]
    fn quad_normal_follows_winding() {
        let g = unit_quad();
        assert_eq!(g.triangle_count(), 2);
        for n in &g.normals {
            assert_eq!(*n, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn wireframe_dedups_shared_diagonal() {
        // 4 outer edges + 1 diagonal
        assert_eq!(unit_quad().wireframe().segment_count(), 5);
    }

    #[test]
    fn flat_quad_has_only_boundary_features() {
        // the diagonal joins two coplanar faces
        assert_eq!(unit_quad().feature_edges(15.0).segment_count(), 4);
    }

    #[test]
    fn folded_quads_keep_the_crease() {
        let mut g = unit_quad();
        // second quad folded 90 degrees along x = 1
        g.push_quad(
            [1.0, 0.0, 0.0],
            [1.0, 0.0, -1.0],
            [1.0, 1.0, -1.0],
            [1.0, 1.0, 0.0],
        );
        let edges = g.feature_edges(15.0);
        let crease = edges.segments().any(|(a, b)| {
            let pair = [a, b];
            pair.contains(&[1.0, 0.0, 0.0]) && pair.contains(&[1.0, 1.0, 0.0])
        });
        assert!(crease);
        // both diagonals are coplanar, the crease is shared, 6 boundary edges
        assert_eq!(edges.segment_count(), 7);
    }

    #[test]
    fn append_rebases_indices() {
        let mut g = unit_quad();
        g.append(&unit_quad());
        assert_eq!(g.vertex_count(), 8);
        assert_eq!(&g.indices[6..], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn transformed_rotates_normals() {
        let g = unit_quad().transformed(Matrix4::from_angle_x(cgmath::Deg(90.0)));
        for n in &g.normals {
            assert!((n[1] + 1.0).abs() < 1e-5, "{n:?}");
        }
    }

    #[test]
    fn smooth_normals_are_unit_length() {
        let g = primitives::cuboid([1.0, 2.0, 3.0]).with_smooth_normals();
        for n in &g.normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }
}
