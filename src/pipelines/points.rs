use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{PointVertex, Vertex},
    },
    pipelines::basic::mk_render_pipeline,
};

/// Point clouds, drawn as quads that are expanded in view space so they
/// always face the camera.
pub fn mk_points_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    light_bind_group_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Points Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout, light_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Points Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("points.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Points Pipeline",
        &layout,
        config.format,
        wgpu::PrimitiveTopology::TriangleList,
        None,
        true,
        &[PointVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
