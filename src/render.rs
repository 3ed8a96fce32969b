//! Render composition and pipeline batching.
//!
//! Flows describe what they want drawn as a [`Render`] tree. The frame loop
//! flattens it into one batch per [`Primitive`] so each pipeline is bound once
//! per frame.
//!
//! # Key types
//!
//! - [`Render<'a>`] is the enum a flow returns from `on_render`
//! - [`Instanced<'a>`] pairs an uploaded mesh with its instance buffer

use crate::data_structures::model::{GpuMesh, Primitive};

/// A mesh plus the instance buffer holding its transforms and tint.
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub mesh: &'a GpuMesh,
    pub amount: usize,
}

/// Specifies how a flow should be rendered.
///
/// - `None` renders nothing
/// - `Default(Instanced)` renders a single mesh
/// - `Defaults(Vec<Instanced>)` renders a batch of meshes
/// - `Composed(Vec<Render>)` recursively renders a composition of renders
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    Composed(Vec<Render<'a>>),
}

/// The per-pipeline batches of one frame.
#[derive(Default)]
pub struct Batches<'a> {
    pub triangles: Vec<Instanced<'a>>,
    pub lines: Vec<Instanced<'a>>,
    pub points: Vec<Instanced<'a>>,
}

impl<'a> Batches<'a> {
    fn push(&mut self, instanced: Instanced<'a>) {
        match instanced.mesh.primitive {
            Primitive::Triangles => self.triangles.push(instanced),
            Primitive::Lines => self.lines.push(instanced),
            Primitive::Points => self.points.push(instanced),
        }
    }

    pub fn len(&self) -> usize {
        self.triangles.len() + self.lines.len() + self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> Render<'a> {
    /// Sorts everything in `self` into `batches`, keeping the order in which
    /// meshes were listed within each primitive kind.
    pub(crate) fn set_pipelines(self, batches: &mut Batches<'a>) {
        match self {
            Render::Default(instanced) => batches.push(instanced),
            Render::Defaults(vec) => vec.into_iter().for_each(|i| batches.push(i)),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(batches)),
            Render::None => (),
        }
    }
}
