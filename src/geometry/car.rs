//! The low-poly showroom car.
//!
//! The body is a fixed list of hand-placed vertices and triangles (chassis
//! sides, bumpers, hood, cabin, hatch and sills). It is shown three ways at
//! once: as a faint solid fill, as a wireframe and as bright feature edges.
//! Wheels are assembled from primitives.

use cgmath::{Deg, Matrix4, Vector3};

use crate::geometry::{primitives, Geometry, LineSet};

/// Faces meeting at a sharper angle than this get a highlighted edge.
pub const FEATURE_ANGLE_DEG: f32 = 18.0;
pub const SPOKE_COUNT: u32 = 6;
pub const WHEEL_RADIUS: f32 = 0.39;

const HALF_WIDTH: f32 = 0.85;
const CABIN_HALF_WIDTH: f32 = 0.7;
const ROOF_HALF_WIDTH: f32 = 0.65;
const SILL_HALF_LENGTH: f32 = 0.85;

// Side profile of the lower body, x along the car (front is -x), y up.
const PROFILE: [[f32; 2]; 7] = [
    [-2.0, 0.3],   // front bumper, bottom
    [-2.05, 0.6],  // front bumper, top
    [-1.9, 0.75],  // hood leading edge
    [-0.7, 0.9],   // cowl
    [1.7, 0.95],   // rear deck
    [2.0, 0.75],   // rear bumper, top
    [1.95, 0.3],   // rear bumper, bottom
];

const LEFT: u32 = 0;
const RIGHT: u32 = 7;
const COWL_L: u32 = 14;
const COWL_R: u32 = 15;
const SCREEN_TOP_L: u32 = 16;
const SCREEN_TOP_R: u32 = 17;
const ROOF_REAR_L: u32 = 18;
const ROOF_REAR_R: u32 = 19;
const HATCH_BASE_L: u32 = 20;
const HATCH_BASE_R: u32 = 21;
const SILL_L: u32 = 22;
const SILL_R: u32 = 26;

pub fn body_vertices() -> Vec<[f32; 3]> {
    let mut v = Vec::with_capacity(30);
    for z in [HALF_WIDTH, -HALF_WIDTH] {
        v.extend(PROFILE.iter().map(|p| [p[0], p[1], z]));
    }
    for z in [CABIN_HALF_WIDTH, -CABIN_HALF_WIDTH] {
        v.push([-0.7, 0.9, z]);
    }
    for z in [ROOF_HALF_WIDTH, -ROOF_HALF_WIDTH] {
        v.push([-0.1, 1.35, z]);
    }
    for z in [ROOF_HALF_WIDTH, -ROOF_HALF_WIDTH] {
        v.push([1.1, 1.3, z]);
    }
    for z in [CABIN_HALF_WIDTH, -CABIN_HALF_WIDTH] {
        v.push([1.7, 0.95, z]);
    }
    for side in [1.0, -1.0] {
        v.push([-SILL_HALF_LENGTH, 0.3, HALF_WIDTH * side]);
        v.push([SILL_HALF_LENGTH, 0.3, HALF_WIDTH * side]);
        v.push([SILL_HALF_LENGTH, 0.2, 0.92 * side]);
        v.push([-SILL_HALF_LENGTH, 0.2, 0.92 * side]);
    }
    v
}

pub fn body_triangles() -> Vec<u32> {
    let mut t: Vec<u32> = Vec::with_capacity(38 * 3);
    let l = |i: u32| LEFT + i;
    let r = |i: u32| RIGHT + i;
    let quad = |t: &mut Vec<u32>, a: u32, b: u32, c: u32, d: u32| {
        t.extend_from_slice(&[a, b, c, a, c, d]);
    };

    // chassis sides, fanned from the front bottom corner
    for k in (1..6).rev() {
        t.extend_from_slice(&[l(0), l(k + 1), l(k)]);
    }
    for k in 1..6 {
        t.extend_from_slice(&[r(0), r(k), r(k + 1)]);
    }
    // front face, bumper top, hood, rear deck, rear face
    for k in [0, 1, 2, 4, 5] {
        quad(&mut t, l(k), l(k + 1), r(k + 1), r(k));
    }
    // shoulders between the belt line and the cabin
    quad(&mut t, l(3), l(4), HATCH_BASE_L, COWL_L);
    quad(&mut t, r(3), COWL_R, HATCH_BASE_R, r(4));
    // windscreen, roof, hatch
    quad(&mut t, COWL_L, SCREEN_TOP_L, SCREEN_TOP_R, COWL_R);
    quad(&mut t, SCREEN_TOP_L, ROOF_REAR_L, ROOF_REAR_R, SCREEN_TOP_R);
    quad(&mut t, ROOF_REAR_L, HATCH_BASE_L, HATCH_BASE_R, ROOF_REAR_R);
    // side windows
    quad(&mut t, COWL_L, HATCH_BASE_L, ROOF_REAR_L, SCREEN_TOP_L);
    quad(&mut t, COWL_R, SCREEN_TOP_R, ROOF_REAR_R, HATCH_BASE_R);
    // sills
    quad(&mut t, SILL_L, SILL_L + 3, SILL_L + 2, SILL_L + 1);
    quad(&mut t, SILL_R, SILL_R + 1, SILL_R + 2, SILL_R + 3);
    t
}

/// The body panels with smooth normals.
pub fn body() -> Geometry {
    let positions = body_vertices();
    Geometry {
        normals: vec![[0.0; 3]; positions.len()],
        positions,
        indices: body_triangles(),
    }
    .with_smooth_normals()
}

/// The three renditions of the body that are drawn on top of each other.
pub struct BodyRenditions {
    pub fill: Geometry,
    pub wireframe: LineSet,
    pub edges: LineSet,
}

pub fn body_renditions() -> BodyRenditions {
    let fill = body();
    BodyRenditions {
        wireframe: fill.wireframe(),
        edges: fill.feature_edges(FEATURE_ANGLE_DEG),
        fill,
    }
}

/// Which material a wheel part is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelPartKind {
    Tire,
    Rim,
    Spokes,
    Hub,
    Caliper,
    Disc,
}

pub struct WheelPart {
    pub kind: WheelPartKind,
    pub geometry: Geometry,
}

/// Everything that spins with a wheel, in the wheel's local frame.
///
/// The axle runs along local z, so spinning the parent node about z turns the
/// wheel. Parts are baked into place; only the parent node moves.
pub fn wheel_assembly() -> Vec<WheelPart> {
    let along_axle = Matrix4::from_angle_x(Deg(90.0));

    let mut spokes = Geometry::new();
    let spoke = primitives::cuboid([0.04, 0.2, 0.03]);
    for i in 0..SPOKE_COUNT {
        let angle = Deg(360.0 / SPOKE_COUNT as f32 * i as f32);
        let placed = Matrix4::from_angle_z(angle) * Matrix4::from_translation(Vector3::new(0.0, 0.11, 0.0));
        spokes.append(&spoke.transformed(placed));
    }

    vec![
        WheelPart {
            kind: WheelPartKind::Tire,
            geometry: primitives::torus(0.3, 0.09, 12, 24),
        },
        WheelPart {
            kind: WheelPartKind::Rim,
            geometry: primitives::torus(0.22, 0.025, 8, 24),
        },
        WheelPart {
            kind: WheelPartKind::Spokes,
            geometry: spokes,
        },
        WheelPart {
            kind: WheelPartKind::Hub,
            geometry: primitives::cylinder(0.05, 0.05, 0.08, 12).transformed(along_axle),
        },
        WheelPart {
            kind: WheelPartKind::Caliper,
            geometry: primitives::cuboid([0.08, 0.14, 0.05])
                .transformed(Matrix4::from_translation(Vector3::new(0.0, 0.15, -0.06))),
        },
        WheelPart {
            kind: WheelPartKind::Disc,
            geometry: primitives::cylinder(0.18, 0.18, 0.015, 24)
                .transformed(Matrix4::from_translation(Vector3::new(0.0, 0.0, -0.04)) * along_axle),
        },
    ]
}

/// Hub positions of the four wheels relative to the car origin.
pub fn wheel_positions() -> [[f32; 3]; 4] {
    let (x, y, z) = (1.3, WHEEL_RADIUS, HALF_WIDTH);
    [[-x, y, z], [-x, y, -z], [x, y, z], [x, y, -z]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_indices_are_in_range() {
        let v = body_vertices();
        let t = body_triangles();
        assert_eq!(v.len(), 30);
        assert_eq!(t.len() % 3, 0);
        assert_eq!(t.len() / 3, 38);
        assert!(t.iter().all(|&i| (i as usize) < v.len()));
        // every vertex is used by some panel
        for i in 0..v.len() as u32 {
            assert!(t.contains(&i), "vertex {i} unused");
        }
    }

    #[test]
    fn body_is_mirror_symmetric() {
        let v = body_vertices();
        for p in &v {
            let mirrored = [p[0], p[1], -p[2]];
            assert!(v.contains(&mirrored), "{p:?} has no mirror");
        }
    }

    #[test]
    fn body_panels_face_outwards() {
        // the body is close enough to convex for a centre-based check
        let g = body();
        let center = [0.0, 0.7, 0.0];
        for tri in g.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| g.positions[i as usize]);
            let n = crate::geometry::face_normal(a, b, c);
            let centroid = [0, 1, 2].map(|k| (a[k] + b[k] + c[k]) / 3.0);
            let dir = [0, 1, 2].map(|k| centroid[k] - center[k]);
            let dot: f32 = (0..3).map(|k| n[k] * dir[k]).sum();
            assert!(dot > 0.0, "panel at {centroid:?} faces inwards");
        }
    }

    #[test]
    fn feature_edges_are_a_subset_of_the_wireframe() {
        let r = body_renditions();
        let wire: Vec<_> = r.wireframe.segments().collect();
        assert!(r.edges.segment_count() > 0);
        assert!(r.edges.segment_count() < r.wireframe.segment_count());
        for (a, b) in r.edges.segments() {
            assert!(
                wire.contains(&(a, b)) || wire.contains(&(b, a)),
                "edge {a:?}-{b:?} not in wireframe"
            );
        }
    }

    #[test]
    fn flat_side_panels_hide_their_fan_diagonals() {
        let r = body_renditions();
        // the diagonal from the front bottom corner to the rear deck lies
        // inside the flat left side panel
        let a = [PROFILE[0][0], PROFILE[0][1], HALF_WIDTH];
        let b = [PROFILE[4][0], PROFILE[4][1], HALF_WIDTH];
        assert!(!r.edges.segments().any(|s| s == (a, b) || s == (b, a)));
    }

    #[test]
    fn wheel_has_all_parts_and_six_spokes() {
        let parts = wheel_assembly();
        let kinds: Vec<_> = parts.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                WheelPartKind::Tire,
                WheelPartKind::Rim,
                WheelPartKind::Spokes,
                WheelPartKind::Hub,
                WheelPartKind::Caliper,
                WheelPartKind::Disc
            ]
        );
        let spokes = &parts[2].geometry;
        assert_eq!(spokes.vertex_count(), 24 * SPOKE_COUNT as usize);
        // everything fits inside the tire
        for part in &parts {
            for p in &part.geometry.positions {
                let r = (p[0] * p[0] + p[1] * p[1]).sqrt();
                assert!(r <= WHEEL_RADIUS + 1e-4, "{:?} sticks out", part.kind);
            }
        }
    }
}
