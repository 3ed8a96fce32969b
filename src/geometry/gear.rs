//! Gear outlines and the extruder that turns them into solids.

use std::f32::consts::TAU;

use anyhow::ensure;

use crate::geometry::Geometry;

/// Radial height of every tooth, added on top of the gear radius.
pub const TOOTH_HEIGHT: f32 = 0.15;
/// Thickness of the extruded gear along +z.
pub const GEAR_DEPTH: f32 = 0.1;
/// Number of points approximating the bore hole.
pub const BORE_SEGMENTS: usize = 32;

// Where the four points of a tooth sit inside its slice of the circle, and
// whether they are on the root or the tip radius.
const TOOTH_PROFILE: [(f32, bool); 4] = [(0.0, false), (0.3, true), (0.5, true), (0.8, false)];

/// Parameters of a single decorative gear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GearSpec {
    pub radius: f32,
    pub inner: f32,
    pub teeth: u32,
}

impl GearSpec {
    pub const fn new(radius: f32, inner: f32, teeth: u32) -> Self {
        Self {
            radius,
            inner,
            teeth,
        }
    }

    pub fn outline(&self) -> Outline {
        gear_outline(self.radius, self.inner, self.teeth)
    }

    pub fn build(&self) -> anyhow::Result<Geometry> {
        extrude(&self.outline(), GEAR_DEPTH)
    }
}

/// A closed 2D contour with one hole, both wound counter-clockwise.
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    pub contour: Vec<[f32; 2]>,
    pub hole: Vec<[f32; 2]>,
}

impl Outline {
    pub fn point_count(&self) -> usize {
        self.contour.len() + self.hole.len()
    }
}

/// Toothed gear contour around a circular bore.
///
/// Each of the `teeth` equal slices contributes four points forming a
/// trapezoidal tooth: root, rising flank, falling flank, root.
pub fn gear_outline(radius: f32, inner: f32, teeth: u32) -> Outline {
    let slice = TAU / teeth as f32;
    let tip = radius + TOOTH_HEIGHT;
    let contour = (0..teeth)
        .flat_map(|i| {
            TOOTH_PROFILE.iter().map(move |&(fraction, on_tip)| {
                let angle = (i as f32 + fraction) * slice;
                let r = if on_tip { tip } else { radius };
                [angle.cos() * r, angle.sin() * r]
            })
        })
        .collect();
    Outline {
        contour,
        hole: circle(inner, BORE_SEGMENTS),
    }
}

pub fn circle(radius: f32, segments: usize) -> Vec<[f32; 2]> {
    (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * TAU;
            [angle.cos() * radius, angle.sin() * radius]
        })
        .collect()
}

/// Extrudes an outline from z = 0 to z = `depth`.
///
/// Both caps are triangulated by zipping the contour and the hole together
/// by angle, which requires both loops to be star-shaped around the origin
/// with the hole fully inside the contour and both starting on the same ray.
/// The side walls get flat normals.
pub fn extrude(outline: &Outline, depth: f32) -> anyhow::Result<Geometry> {
    let contour = &outline.contour;
    let hole = &outline.hole;
    ensure!(
        contour.len() >= 3 && hole.len() >= 3,
        "outline needs at least three points per loop, got {} and {}",
        contour.len(),
        hole.len()
    );
    ensure!(depth > 0.0, "extrusion depth must be positive, got {}", depth);
    let contour_angles = loop_angles(contour)
        .ok_or_else(|| anyhow::anyhow!("contour is not angularly monotone around the origin"))?;
    let hole_angles = loop_angles(hole)
        .ok_or_else(|| anyhow::anyhow!("hole is not angularly monotone around the origin"))?;
    ensure!(
        (contour_angles[0] - hole_angles[0]).abs() < 1e-3,
        "contour and hole must both start on the same ray"
    );
    let min_contour = contour.iter().map(|p| len(*p)).fold(f32::MAX, f32::min);
    let max_hole = hole.iter().map(|p| len(*p)).fold(0.0, f32::max);
    ensure!(
        max_hole < min_contour,
        "hole (radius {}) must lie inside the contour (radius {})",
        max_hole,
        min_contour
    );

    let cap = zip_loops(&contour_angles, &hole_angles);
    let n = contour.len() as u32;
    let mut geometry = Geometry::new();

    // back cap faces -z, front cap faces +z
    for (z, normal, flip) in [(0.0, [0.0, 0.0, -1.0], true), (depth, [0.0, 0.0, 1.0], false)] {
        let base = geometry.vertex_count() as u32;
        for p in contour.iter().chain(hole.iter()) {
            geometry.push_vertex([p[0], p[1], z], normal);
        }
        for &[a, b, c] in &cap {
            let (a, b, c) = (base + a.index(n), base + b.index(n), base + c.index(n));
            if flip {
                geometry.push_triangle(a, c, b);
            } else {
                geometry.push_triangle(a, b, c);
            }
        }
    }

    push_walls(&mut geometry, contour, depth, false);
    push_walls(&mut geometry, hole, depth, true);

    Ok(geometry)
}

fn push_walls(geometry: &mut Geometry, ring: &[[f32; 2]], depth: f32, facing_in: bool) {
    for (k, p) in ring.iter().enumerate() {
        let q = ring[(k + 1) % ring.len()];
        let a0 = [p[0], p[1], 0.0];
        let b0 = [q[0], q[1], 0.0];
        let b1 = [q[0], q[1], depth];
        let a1 = [p[0], p[1], depth];
        if facing_in {
            geometry.push_quad(a0, a1, b1, b0);
        } else {
            geometry.push_quad(a0, b0, b1, a1);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Corner {
    Contour(u32),
    Hole(u32),
}

impl Corner {
    fn index(self, contour_len: u32) -> u32 {
        match self {
            Corner::Contour(i) => i,
            Corner::Hole(i) => contour_len + i,
        }
    }
}

/// Triangulates the ring between two angularly sorted loops.
///
/// Walks both loops in lock-step, always advancing the one whose next point
/// comes first. Produces exactly `contour.len() + hole.len()` triangles, all
/// counter-clockwise.
fn zip_loops(contour: &[f32], hole: &[f32]) -> Vec<[Corner; 3]> {
    let (n, m) = (contour.len(), hole.len());
    let next = |angles: &[f32], i: usize| {
        if i + 1 < angles.len() {
            angles[i + 1]
        } else {
            angles[0] + TAU
        }
    };
    let wrap = |i: usize, len: usize| (i % len) as u32;

    let mut triangles = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        let advance_contour = j >= m || (i < n && next(contour, i) <= next(hole, j));
        if advance_contour {
            triangles.push([
                Corner::Contour(wrap(i, n)),
                Corner::Contour(wrap(i + 1, n)),
                Corner::Hole(wrap(j, m)),
            ]);
            i += 1;
        } else {
            triangles.push([
                Corner::Contour(wrap(i, n)),
                Corner::Hole(wrap(j + 1, m)),
                Corner::Hole(wrap(j, m)),
            ]);
            j += 1;
        }
    }
    triangles
}

/// Angles of the loop's points unwrapped into `[a0, a0 + 2pi)`, or `None` if
/// they do not strictly increase.
fn loop_angles(points: &[[f32; 2]]) -> Option<Vec<f32>> {
    let mut angles = Vec::with_capacity(points.len());
    let mut offset = 0.0;
    let mut last = f32::MIN;
    for p in points {
        let mut a = p[1].atan2(p[0]) + offset;
        if a <= last {
            offset += TAU;
            a += TAU;
        }
        if a <= last {
            return None;
        }
        angles.push(a);
        last = a;
    }
    let first = angles[0];
    if last >= first + TAU {
        return None;
    }
    Some(angles)
}

fn len(p: [f32; 2]) -> f32 {
    (p[0] * p[0] + p[1] * p[1]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn outline_has_four_points_per_tooth_plus_bore() {
        for teeth in [8, 10, 12, 31] {
            let outline = gear_outline(0.5, 0.2, teeth);
            assert_eq!(outline.contour.len(), 4 * teeth as usize);
            assert_eq!(outline.hole.len(), BORE_SEGMENTS);
            assert_eq!(outline.point_count(), 4 * teeth as usize + BORE_SEGMENTS);
        }
    }

    #[test]
    fn outer_points_sit_on_root_or_tip_radius() {
        let (r, teeth) = (0.35, 8);
        let outline = gear_outline(r, 0.12, teeth);
        for (k, p) in outline.contour.iter().enumerate() {
            let d = len(*p);
            let on_tip = matches!(k % 4, 1 | 2);
            let expected = if on_tip { r + TOOTH_HEIGHT } else { r };
            assert!((d - expected).abs() < EPS, "point {k} at radius {d}");
        }
        for p in &outline.hole {
            assert!((len(*p) - 0.12).abs() < EPS);
        }
    }

    #[test]
    fn tooth_flanks_use_exact_slice_fractions() {
        let teeth = 12;
        let outline = gear_outline(0.5, 0.2, teeth);
        let slice = TAU / teeth as f32;
        for i in 0..teeth as usize {
            for (f, fraction) in [0.0f32, 0.3, 0.5, 0.8].iter().enumerate() {
                let p = outline.contour[i * 4 + f];
                let expected = (i as f32 + fraction) * slice;
                let actual = p[1].atan2(p[0]).rem_euclid(TAU);
                let diff = (actual - expected.rem_euclid(TAU)).abs();
                assert!(diff < 1e-4 || (TAU - diff) < 1e-4, "tooth {i} flank {f}");
            }
        }
    }

    #[test]
    fn extruded_gear_has_expected_topology() {
        let spec = GearSpec::new(0.5, 0.2, 12);
        let geometry = spec.build().unwrap();
        let loop_points = 48 + BORE_SEGMENTS;
        // two caps with one triangle per loop point, two per side quad
        assert_eq!(geometry.triangle_count(), 2 * loop_points + 2 * loop_points);
        assert_eq!(geometry.vertex_count(), 2 * loop_points + 4 * loop_points);
        assert!(geometry
            .indices
            .iter()
            .all(|&i| (i as usize) < geometry.vertex_count()));
        for p in &geometry.positions {
            assert!(p[2] == 0.0 || p[2] == GEAR_DEPTH);
        }
    }

    #[test]
    fn cap_triangles_face_their_cap() {
        let geometry = GearSpec::new(0.4, 0.15, 10).build().unwrap();
        let cap_tris = 2 * (40 + BORE_SEGMENTS);
        for tri in geometry.indices.chunks_exact(3).take(cap_tris) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| geometry.positions[i as usize]);
            let cross_z = (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]);
            if a[2] == 0.0 {
                assert!(cross_z < 0.0);
            } else {
                assert!(cross_z > 0.0);
            }
        }
    }

    #[test]
    fn cap_covers_the_ring_area() {
        let (r, inner, teeth) = (0.5, 0.2, 12);
        let outline = gear_outline(r, inner, teeth);
        let geometry = extrude(&outline, GEAR_DEPTH).unwrap();
        let loop_points = outline.point_count();
        let area: f32 = geometry
            .indices
            .chunks_exact(3)
            .take(loop_points)
            .map(|tri| {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| geometry.positions[i as usize]);
                ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.0
            })
            .sum();
        let expected = shoelace(&outline.contour) - shoelace(&outline.hole);
        assert!((area - expected).abs() < 1e-4, "{area} vs {expected}");
    }

    #[test]
    fn extrude_rejects_hole_outside_contour() {
        let outline = Outline {
            contour: circle(0.3, 16),
            hole: circle(0.5, 16),
        };
        assert!(extrude(&outline, 0.1).is_err());
    }

    #[test]
    fn extrude_rejects_clockwise_loops() {
        let mut contour = circle(1.0, 16);
        contour.reverse();
        let outline = Outline {
            contour,
            hole: circle(0.2, 8),
        };
        assert!(extrude(&outline, 0.1).is_err());
    }

    fn shoelace(points: &[[f32; 2]]) -> f32 {
        let n = points.len();
        (0..n)
            .map(|k| {
                let (p, q) = (points[k], points[(k + 1) % n]);
                p[0] * q[1] - q[0] * p[1]
            })
            .sum::<f32>()
            .abs()
            / 2.0
    }
}
