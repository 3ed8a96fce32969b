use std::f32::consts::TAU;

use crate::geometry::Geometry;

/// Axis-aligned box centred on the origin, flat shaded.
pub fn cuboid(size: [f32; 3]) -> Geometry {
    let [x, y, z] = size.map(|s| s / 2.0);
    let mut g = Geometry::new();
    // +z
    g.push_quad([-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z]);
    // -z
    g.push_quad([x, -y, -z], [-x, -y, -z], [-x, y, -z], [x, y, -z]);
    // +y
    g.push_quad([-x, y, z], [x, y, z], [x, y, -z], [-x, y, -z]);
    // -y
    g.push_quad([-x, -y, -z], [x, -y, -z], [x, -y, z], [-x, -y, z]);
    // +x
    g.push_quad([x, -y, z], [x, -y, -z], [x, y, -z], [x, y, z]);
    // -x
    g.push_quad([-x, -y, -z], [-x, -y, z], [-x, y, z], [-x, y, -z]);
    g
}

/// Faceted cylinder along the y axis with both caps closed.
///
/// Different top and bottom radii give a truncated cone. Every facet is flat
/// shaded so the low segment counts read as machined parts.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Geometry {
    let half = height / 2.0;
    let ring = |r: f32, y: f32| -> Vec<[f32; 3]> {
        (0..segments)
            .map(|i| {
                let a = i as f32 / segments as f32 * TAU;
                // counter-clockwise when looking down from +y
                [a.sin() * r, y, a.cos() * r]
            })
            .collect()
    };
    let top = ring(radius_top, half);
    let bottom = ring(radius_bottom, -half);
    let n = segments as usize;

    let mut g = Geometry::new();
    for i in 0..n {
        let j = (i + 1) % n;
        g.push_quad(bottom[i], bottom[j], top[j], top[i]);
    }

    let top_center = g.push_vertex([0.0, half, 0.0], [0.0, 1.0, 0.0]);
    let top_ring: Vec<u32> = top
        .iter()
        .map(|p| g.push_vertex(*p, [0.0, 1.0, 0.0]))
        .collect();
    for i in 0..n {
        g.push_triangle(top_center, top_ring[i], top_ring[(i + 1) % n]);
    }

    let bottom_center = g.push_vertex([0.0, -half, 0.0], [0.0, -1.0, 0.0]);
    let bottom_ring: Vec<u32> = bottom
        .iter()
        .map(|p| g.push_vertex(*p, [0.0, -1.0, 0.0]))
        .collect();
    for i in 0..n {
        g.push_triangle(bottom_center, bottom_ring[(i + 1) % n], bottom_ring[i]);
    }
    g
}

/// Torus in the xy plane, its axis along z, with smooth normals.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Geometry {
    let mut g = Geometry::new();
    for j in 0..=radial_segments {
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let v = j as f32 / radial_segments as f32 * TAU;
            let position = [
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            ];
            let center = [radius * u.cos(), radius * u.sin(), 0.0];
            let normal = [
                (position[0] - center[0]) / tube,
                (position[1] - center[1]) / tube,
                (position[2] - center[2]) / tube,
            ];
            g.push_vertex(position, normal);
        }
    }
    let stride = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            g.push_triangle(a, b, d);
            g.push_triangle(b, c, d);
        }
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::face_normal;

    fn outward(g: &Geometry, center: impl Fn([f32; 3]) -> [f32; 3]) {
        for tri in g.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| g.positions[i as usize]);
            let n = face_normal(a, b, c);
            let centroid = [
                (a[0] + b[0] + c[0]) / 3.0,
                (a[1] + b[1] + c[1]) / 3.0,
                (a[2] + b[2] + c[2]) / 3.0,
            ];
            let o = center(centroid);
            let dir = [centroid[0] - o[0], centroid[1] - o[1], centroid[2] - o[2]];
            let dot = n[0] * dir[0] + n[1] * dir[1] + n[2] * dir[2];
            assert!(dot > 0.0, "inward facing triangle at {centroid:?}");
        }
    }

    #[test]
    fn cuboid_faces_point_outwards() {
        let g = cuboid([0.04, 0.2, 0.03]);
        assert_eq!(g.vertex_count(), 24);
        assert_eq!(g.triangle_count(), 12);
        outward(&g, |_| [0.0; 3]);
    }

    #[test]
    fn cylinder_faces_point_outwards() {
        let g = cylinder(0.05, 0.05, 0.08, 12);
        assert_eq!(g.triangle_count(), 12 * 2 + 12 * 2);
        outward(&g, |_| [0.0; 3]);
    }

    #[test]
    fn torus_faces_point_away_from_the_tube_centre() {
        let (radius, tube) = (0.3, 0.09);
        let g = torus(radius, tube, 12, 24);
        assert_eq!(g.vertex_count(), 13 * 25);
        assert_eq!(g.triangle_count(), 12 * 24 * 2);
        outward(&g, |p| {
            let u = p[1].atan2(p[0]);
            [radius * u.cos(), radius * u.sin(), 0.0]
        });
    }
}
