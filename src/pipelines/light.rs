use wgpu::util::DeviceExt;

use crate::colour::linear_rgb;

/// A light infinitely far away in the direction of `position`, shining
/// towards the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub colour: u32,
    pub intensity: f32,
    pub position: [f32; 3],
}

/// Ambient term plus a key and a fill light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub ambient_colour: u32,
    pub ambient_intensity: f32,
    pub key: DirectionalLight,
    pub fill: DirectionalLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient_colour: 0xFFFFFF,
            ambient_intensity: 0.4,
            key: DirectionalLight {
                colour: 0xE63946,
                intensity: 0.8,
                position: [5.0, 5.0, 5.0],
            },
            fill: DirectionalLight {
                colour: 0x4488FF,
                intensity: 0.3,
                position: [-5.0, 3.0, -5.0],
            },
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    // every field is a vec4 to satisfy uniform alignment; w is unused
    ambient: [f32; 4],
    key_direction: [f32; 4],
    key_colour: [f32; 4],
    fill_direction: [f32; 4],
    fill_colour: [f32; 4],
}

fn scaled(hex: u32, intensity: f32) -> [f32; 4] {
    let [r, g, b] = linear_rgb(hex);
    [r * intensity, g * intensity, b * intensity, 0.0]
}

fn direction(position: [f32; 3]) -> [f32; 4] {
    let len = position.iter().map(|c| c * c).sum::<f32>().sqrt();
    if len > 0.0 {
        [position[0] / len, position[1] / len, position[2] / len, 0.0]
    } else {
        [0.0, 1.0, 0.0, 0.0]
    }
}

impl From<&Lighting> for LightUniform {
    fn from(lighting: &Lighting) -> Self {
        Self {
            ambient: scaled(lighting.ambient_colour, lighting.ambient_intensity),
            key_direction: direction(lighting.key.position),
            key_colour: scaled(lighting.key.colour, lighting.key.intensity),
            fill_direction: direction(lighting.fill.position),
            fill_colour: scaled(lighting.fill.colour, lighting.fill.intensity),
        }
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub lighting: Lighting,
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, lighting: Lighting) -> Self {
        let uniform = LightUniform::from(&lighting);
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            lighting,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn set(&mut self, queue: &wgpu::Queue, lighting: Lighting) {
        self.lighting = lighting;
        self.uniform = LightUniform::from(&lighting);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Uniform Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_are_normalised() {
        let uniform = LightUniform::from(&Lighting::default());
        for d in [uniform.key_direction, uniform.fill_direction] {
            let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-6);
        }
        let k = 1.0 / 3f32.sqrt();
        assert!((uniform.key_direction[0] - k).abs() < 1e-6);
    }

    #[test]
    fn intensity_scales_colour() {
        let uniform = LightUniform::from(&Lighting::default());
        assert!(uniform.ambient[..3].iter().all(|c| (c - 0.4).abs() < 1e-6));
        let full = linear_rgb(0x4488FF);
        assert!((uniform.fill_colour[2] - full[2] * 0.3).abs() < 1e-6);
    }
}
