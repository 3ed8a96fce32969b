use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{LineVertex, Vertex},
    },
    pipelines::basic::mk_render_pipeline,
};

/// Unlit line segments: wireframes, feature edges and the ground grid.
pub fn mk_line_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    light_bind_group_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    // the light group is unused by the shader but keeps all pipelines
    // compatible with the same bind groups
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Line Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout, light_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Line Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("line.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        "Line Pipeline",
        &layout,
        config.format,
        wgpu::PrimitiveTopology::LineList,
        None,
        true,
        &[LineVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
