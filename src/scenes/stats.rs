//! The dot grid behind the statistics section.

use std::rc::Rc;

use cgmath::Deg;

use crate::{
    camera::{Camera, Projection},
    colour::{tint, ACCENT},
    context::{Context, InitContext},
    data_structures::{
        instance::Instance,
        model::GpuMesh,
        scene_graph::{node_at_mut, ContainerNode, SceneNode},
    },
    flow::{FlowConstructor, GraphicsFlow, Out},
    geometry::field::dot_grid,
    input::FrameInput,
    render::Render,
    scenes::{commit, mesh_node},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsConfig {
    /// Dots per side.
    pub grid_size: i32,
    pub spacing: f32,
    pub colour: u32,
    pub opacity: f32,
    pub point_size: f32,
    pub camera_distance: f32,
    pub far: f32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            spacing: 0.6,
            colour: ACCENT,
            opacity: 0.4,
            point_size: 0.04,
            camera_distance: 5.0,
            far: 100.0,
        }
    }
}

/// Orientation of the dot grid: a slow wobble plus a small pointer tilt.
pub fn stats_pose(frame: &FrameInput) -> Instance {
    let t = frame.t();
    let pointer = frame.pointer;
    Instance::new().with_euler(
        (t * 0.1).sin() * 0.2 + pointer.ny * 0.1,
        (t * 0.15).cos() * 0.2 + pointer.nx * 0.1,
        0.0,
    )
}

pub struct StatsScene {
    config: StatsConfig,
    root: ContainerNode,
}

impl StatsScene {
    pub fn new(device: &wgpu::Device, config: StatsConfig) -> Self {
        let dots = dot_grid(config.grid_size, config.spacing);
        let mesh = Rc::new(GpuMesh::from_points(device, "stats dots", &dots, config.point_size));
        let mut root = ContainerNode::default();
        root.add_child(mesh_node(
            device,
            &mesh,
            tint(config.colour, config.opacity),
            Instance::new(),
        ));
        log::info!("stats scene assembled ({} dots)", dots.len());
        Self { config, root }
    }

    pub fn constructor(config: StatsConfig) -> FlowConstructor {
        Box::new(move |ctx: InitContext| {
            Box::pin(async move {
                anyhow::Ok(Box::new(StatsScene::new(&ctx.device, config)) as Box<dyn GraphicsFlow>)
            })
        })
    }
}

impl GraphicsFlow for StatsScene {
    fn on_init(&mut self, ctx: &mut Context) -> Out {
        let (width, height) = (ctx.config.width, ctx.config.height);
        ctx.set_camera(
            Camera::on_z_axis(self.config.camera_distance),
            Projection::new(width, height, Deg(60.0), 0.1, self.config.far),
        );
        commit(&mut self.root, &ctx.queue);
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, frame: &FrameInput) -> Out {
        if let Some(dots) = node_at_mut(&mut self.root, &[0]) {
            *dots.local_mut() = stats_pose(frame);
        }
        commit(&mut self.root, &ctx.queue);
        Out::Empty
    }

    fn on_render(&self) -> Render<'_> {
        Render::from(&self.root as &dyn SceneNode)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cgmath::{Euler, InnerSpace, Quaternion, Rad};

    use super::*;
    use crate::input::PointerState;

    fn expect_rotation(pose: Instance, x: f32, y: f32) {
        let expected = Quaternion::from(Euler::new(Rad(x), Rad(y), Rad(0.0)));
        assert!((pose.rotation.dot(expected).abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn grid_wobbles_over_time() {
        let frame = FrameInput {
            elapsed: Duration::from_secs(10),
            ..Default::default()
        };
        expect_rotation(stats_pose(&frame), 1f32.sin() * 0.2, 1.5f32.cos() * 0.2);
    }

    #[test]
    fn pointer_tilts_the_grid() {
        let frame = FrameInput {
            // top right corner: nx = 1, ny = 1
            pointer: PointerState::from_pixels(100.0, 0.0, 100.0, 100.0),
            ..Default::default()
        };
        expect_rotation(stats_pose(&frame), 0.1, 0.2 + 0.1);
    }

    #[test]
    fn pose_never_moves_the_grid() {
        let frame = FrameInput {
            elapsed: Duration::from_millis(12_345),
            scroll_y: 900.0,
            ..Default::default()
        };
        assert_eq!(stats_pose(&frame).position, Instance::new().position);
    }
}
