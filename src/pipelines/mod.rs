//! Render pipelines, one per [`Primitive`](crate::data_structures::model::Primitive).
//!
//! All pipelines share the same two bind groups: the camera at group 0 and
//! the lights at group 1.

pub mod basic;
pub mod light;
pub mod line;
pub mod points;

#[derive(Debug)]
pub struct Pipelines {
    pub mesh: wgpu::RenderPipeline,
    pub line: wgpu::RenderPipeline,
    pub points: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        light_bind_group_layout: &wgpu::BindGroupLayout,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            mesh: basic::mk_basic_pipeline(device, config, light_bind_group_layout, camera_bind_group_layout),
            line: line::mk_line_pipeline(device, config, light_bind_group_layout, camera_bind_group_layout),
            points: points::mk_points_pipeline(device, config, light_bind_group_layout, camera_bind_group_layout),
        }
    }
}
