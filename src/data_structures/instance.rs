//! Node transforms and their GPU representation.
//!
//! Every scene node carries a local and a world [`Instance`]. The world
//! transform is packed together with the node's tint into an [`InstanceRaw`]
//! and read by the vertex shaders as a per-instance vertex buffer.

use std::ops::Mul;

use cgmath::{Euler, Matrix3, Matrix4, One, Quaternion, Rad, Vector3};

use crate::data_structures::model;

/// Position, rotation (as quaternion) and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Instance {
    /// The identity transform.
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Vector3::new(x, y, z).into()
    }

    /// Sets the rotation from Euler angles in radians, composed as `Rx * Ry * Rz`.
    pub fn set_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quaternion::from(Euler::new(Rad(x), Rad(y), Rad(z)));
    }

    pub fn with_euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.set_euler(x, y, z);
        self
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_raw(&self, tint: [f32; 4]) -> InstanceRaw {
        InstanceRaw {
            model: self.to_matrix().into(),
            normal: Matrix3::from(self.rotation).into(),
            tint,
        }
    }
}

impl<'a, 'b> Mul<&'b Instance> for &'a Instance {
    type Output = Instance;

    /// Composes a parent transform (`self`) with a child's local transform.
    fn mul(self, rhs: &'b Instance) -> Self::Output {
        let scaled_rhs_pos = Vector3::new(
            self.scale.x * rhs.position.x,
            self.scale.y * rhs.position.y,
            self.scale.z * rhs.position.z,
        );
        Instance {
            position: self.position + (self.rotation * scaled_rhs_pos),
            rotation: self.rotation * rhs.rotation,
            scale: Vector3::new(
                self.scale.x * rhs.scale.x,
                self.scale.y * rhs.scale.y,
                self.scale.z * rhs.scale.z,
            ),
        }
    }
}

impl Mul<Instance> for Instance {
    type Output = Self;

    fn mul(self, rhs: Instance) -> Self::Output {
        &self * &rhs
    }
}

impl From<Vector3<f32>> for Instance {
    fn from(position: Vector3<f32>) -> Self {
        Instance {
            position,
            ..Default::default()
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

/// The per-instance data as stored on the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
    tint: [f32; 4],
}

impl model::Vertex for InstanceRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            // advance once per instance, not per vertex
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // a mat4 occupies four vertex slots
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 25]>() as wgpu::BufferAddress,
                    shader_location: 12,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Rotation3};

    #[test]
    fn composition_applies_parent_rotation_to_child_offset() {
        let parent = Instance {
            rotation: Quaternion::from_angle_y(cgmath::Deg(90.0)),
            ..Instance::at(1.0, 0.0, 0.0)
        };
        let child = Instance::at(0.0, 0.0, -2.0);
        let world = &parent * &child;
        // -z rotated 90 degrees about y points along -x
        assert!((world.position - Vector3::new(-1.0, 0.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn identity_is_neutral() {
        let node = Instance::at(3.0, -1.0, 2.0).with_euler(0.2, 0.4, -0.1);
        let world = Instance::new() * node;
        assert!((world.position - node.position).magnitude() < 1e-6);
        assert!((world.rotation - node.rotation).magnitude() < 1e-6);
    }

    #[test]
    fn raw_layout_matches_attributes() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 29 * 4);
        let raw = Instance::new().to_raw([1.0, 0.0, 0.0, 0.5]);
        assert_eq!(raw.tint, [1.0, 0.0, 0.0, 0.5]);
    }
}
