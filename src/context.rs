//! GPU context of one rendering surface.
//!
//! Each canvas (or native window) gets its own [`Context`] owning the
//! surface, device, queue, pipelines, camera, lights and depth buffer.

use std::sync::Arc;

use cgmath::Deg;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, Projection},
    data_structures::texture,
    pipelines::{
        light::{LightResources, Lighting},
        Pipelines,
    },
    viewport::Viewport,
};

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub viewport: Viewport,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::debug!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::debug!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Shaders output linear colour and rely on an sRGB target.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no texture formats"))?;
        // The page shows through wherever nothing is drawn.
        let alpha_mode = [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]
        .into_iter()
        .find(|mode| surface_caps.alpha_modes.contains(mode))
        .or_else(|| surface_caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let present_mode = surface_caps
            .present_modes
            .first()
            .copied()
            .unwrap_or(wgpu::PresentMode::Fifo);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!(
            "surface {:?} {}x{} ({:?}, {:?})",
            window.id(),
            config.width,
            config.height,
            config.format,
            config.alpha_mode
        );

        let camera = CameraResources::new(
            &device,
            Camera::on_z_axis(6.0),
            Projection::new(config.width, config.height, Deg(60.0), 0.1, 1000.0),
        );
        let light = LightResources::new(&device, Lighting::default());
        let pipelines = Pipelines::new(
            &device,
            &config,
            &light.bind_group_layout,
            &camera.bind_group_layout,
        );
        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            light,
            pipelines,
            viewport: Viewport::default(),
            clear_colour: wgpu::Color::TRANSPARENT,
        })
    }

    /// Resizes surface, projection and depth buffer. Returns `false` when
    /// nothing changed, see [`Viewport::resize`].
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self
            .viewport
            .resize(width, height, &mut self.camera.projection)
        {
            return false;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            texture::Texture::create_depth_texture(&self.device, [width, height], "depth_texture");
        self.camera.write(&self.queue);
        log::debug!("surface {:?} resized to {}x{}", self.window.id(), width, height);
        true
    }

    /// Replaces the camera and uploads it.
    pub fn set_camera(&mut self, camera: Camera, projection: Projection) {
        self.camera.camera = camera;
        let (width, height) = self.viewport.size();
        self.camera.projection = projection;
        if !self.viewport.is_zero() {
            self.camera.projection.resize(width, height);
        }
        self.camera.write(&self.queue);
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

/// What flow constructors get to build their GPU resources with.
///
/// Cloning only clones the handles, the device and queue are shared.
#[derive(Clone, Debug)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
        }
    }
}
