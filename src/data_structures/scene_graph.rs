//! Scene graph and hierarchical scene organization.
//!
//! Every node owns a local transform, the world transform derived from its
//! parent and its children. [`MeshNode`]s additionally reference one uploaded
//! [`GpuMesh`] and a tint, and keep a one-element instance buffer that holds
//! their world transform. Meshes are shared through `Rc` so a part that
//! appears several times (the four wheels) is uploaded once.

use std::rc::Rc;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        model::GpuMesh,
    },
    render::{Instanced, Render},
};

pub trait SceneNode {
    fn local(&self) -> &Instance;

    fn local_mut(&mut self) -> &mut Instance;

    fn world(&self) -> &Instance;

    fn children(&self) -> &[Box<dyn SceneNode>];

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    /// Appends a child and returns its index.
    fn add_child(&mut self, child: Box<dyn SceneNode>) -> usize {
        let children = self.children_mut();
        children.push(child);
        children.len() - 1
    }

    /// Recomputes the world transforms of this node and all its descendants.
    fn update_world_transform(&mut self, parent: &Instance);

    /// Uploads world transforms of this subtree to the instance buffers.
    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        self.children_mut()
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        self.children()
            .iter()
            .flat_map(|child| child.get_render())
            .collect()
    }
}

/// Looks up a descendant by the child indices leading to it.
pub fn node_at_mut<'a>(
    node: &'a mut (dyn SceneNode + 'static),
    path: &[usize],
) -> Option<&'a mut (dyn SceneNode + 'static)> {
    match path.split_first() {
        None => Some(node),
        Some((first, rest)) => {
            let child = node.children_mut().get_mut(*first)?;
            node_at_mut(child.as_mut(), rest)
        }
    }
}

/// A transform without geometry, used to group and move children together.
pub struct ContainerNode {
    pub children: Vec<Box<dyn SceneNode>>,
    local: Instance,
    world: Instance,
}

impl ContainerNode {
    pub fn new(local: Instance) -> Self {
        Self {
            children: Vec::new(),
            world: local,
            local,
        }
    }
}

impl Default for ContainerNode {
    fn default() -> Self {
        Self::new(Instance::default())
    }
}

impl SceneNode for ContainerNode {
    fn local(&self) -> &Instance {
        &self.local
    }

    fn local_mut(&mut self) -> &mut Instance {
        &mut self.local
    }

    fn world(&self) -> &Instance {
        &self.world
    }

    fn children(&self) -> &[Box<dyn SceneNode>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn update_world_transform(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        let world = self.world;
        for child in self.children.iter_mut() {
            child.update_world_transform(&world);
        }
    }
}

/// A node that draws one mesh with a tint (RGB colour, alpha as opacity).
pub struct MeshNode {
    children: Vec<Box<dyn SceneNode>>,
    mesh: Rc<GpuMesh>,
    tint: [f32; 4],
    local: Instance,
    world: Instance,
    instance_buffer: wgpu::Buffer,
}

impl MeshNode {
    pub fn new(device: &wgpu::Device, mesh: Rc<GpuMesh>, tint: [f32; 4], local: Instance) -> Self {
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Instance Buffer", mesh.name)),
            contents: bytemuck::cast_slice(&[local.to_raw(tint)]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            children: Vec::new(),
            mesh,
            tint,
            world: local,
            local,
            instance_buffer,
        }
    }
}

impl SceneNode for MeshNode {
    fn local(&self) -> &Instance {
        &self.local
    }

    fn local_mut(&mut self) -> &mut Instance {
        &mut self.local
    }

    fn world(&self) -> &Instance {
        &self.world
    }

    fn children(&self) -> &[Box<dyn SceneNode>] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn update_world_transform(&mut self, parent: &Instance) {
        self.world = parent * &self.local;
        let world = self.world;
        for child in self.children.iter_mut() {
            child.update_world_transform(&world);
        }
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        let raw: [InstanceRaw; 1] = [self.world.to_raw(self.tint)];
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&raw));
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .chain([Instanced {
                instance: &self.instance_buffer,
                mesh: &self.mesh,
                amount: 1,
            }])
            .collect()
    }
}

impl<'a> From<&'a dyn SceneNode> for Render<'a> {
    fn from(node: &'a dyn SceneNode) -> Self {
        Render::Defaults(node.get_render())
    }
}
