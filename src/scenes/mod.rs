//! The two decorative scenes of the landing page.
//!
//! Each scene is assembled once from procedural geometry, then animated by
//! moving node transforms only. Motion is computed by pure pose functions
//! ([`hero::HeroMotion`], [`stats::stats_pose`]) so it can be tested without a
//! GPU; the [`GraphicsFlow`](crate::flow::GraphicsFlow) impls just apply the
//! pose to the scene graph and upload it.

use std::rc::Rc;

use crate::data_structures::{
    instance::Instance,
    model::GpuMesh,
    scene_graph::{MeshNode, SceneNode},
};

pub mod hero;
pub mod stats;

pub use hero::{HeroConfig, HeroScene, HeroVariant};
pub use stats::{StatsConfig, StatsScene};

/// Wraps an uploaded mesh in a node of its own.
fn mesh_node(
    device: &wgpu::Device,
    mesh: &Rc<GpuMesh>,
    tint: [f32; 4],
    local: Instance,
) -> Box<dyn SceneNode> {
    Box::new(MeshNode::new(device, mesh.clone(), tint, local))
}

/// Recomputes world transforms below `root` and uploads them.
fn commit(root: &mut dyn SceneNode, queue: &wgpu::Queue) {
    root.update_world_transform(&Instance::new());
    root.write_to_buffers(queue);
}
