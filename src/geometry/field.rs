//! Point clouds and the ground grid.

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::geometry::{LineSet, PointCloud};

/// Points scattered uniformly through an axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleField {
    pub count: usize,
    pub size: [f32; 3],
    pub center: [f32; 3],
    pub seed: u64,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self {
            count: 600,
            size: [20.0, 14.0, 14.0],
            center: [0.0, 0.0, -3.0],
            seed: 0xA9E3,
        }
    }
}

impl ParticleField {
    pub fn build(&self) -> PointCloud {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let positions = (0..self.count)
            .map(|_| {
                let mut p = [0.0; 3];
                for axis in 0..3 {
                    p[axis] = (rng.random::<f32>() - 0.5) * self.size[axis] + self.center[axis];
                }
                p
            })
            .collect();
        PointCloud { positions }
    }
}

/// A square grid of dots in the z = 0 plane, `grid_size` dots per side.
pub fn dot_grid(grid_size: i32, spacing: f32) -> PointCloud {
    let half = grid_size / 2;
    let positions = (-half..grid_size - half)
        .flat_map(|x| (-half..grid_size - half).map(move |y| [x as f32 * spacing, y as f32 * spacing, 0.0]))
        .collect();
    PointCloud { positions }
}

/// Floor grid lines in the y = 0 plane.
///
/// The two lines through the origin are returned separately so they can be
/// drawn in their own colour.
pub struct GroundGrid {
    pub center: LineSet,
    pub lines: LineSet,
}

pub fn ground_grid(size: f32, divisions: u32) -> GroundGrid {
    let half = size / 2.0;
    let step = size / divisions as f32;
    let mut center = LineSet::default();
    let mut lines = LineSet::default();
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let target = if i * 2 == divisions {
            &mut center
        } else {
            &mut lines
        };
        target.push_segment([-half, 0.0, k], [half, 0.0, k]);
        target.push_segment([k, 0.0, -half], [k, 0.0, half]);
    }
    GroundGrid { center, lines }
}
