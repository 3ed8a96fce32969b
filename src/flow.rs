//! Flow control and application event loop.
//!
//! A "flow" is a decorative scene bound to one rendering surface. It builds
//! its GPU resources once, updates node transforms every frame from a
//! [`FrameInput`] snapshot and says what to draw.
//!
//! # User-facing types
//!
//! - [`GraphicsFlow`] is the trait every scene implements
//! - [`Out`] lets a flow reconfigure its context from a lifecycle hook
//! - [`SurfaceSpec`] names a canvas (or native window) and the flows drawn on it
//!
//! # Lifecycle
//!
//! For every surface:
//! 1. Create the window (bind the canvas on the web). A missing canvas leaves
//!    the surface disabled.
//! 2. Create the [`Context`] and run the flow constructors. A failure is logged
//!    and leaves the surface disabled.
//! 3. Call `on_init` once, then start the surface's [`FrameScheduler`].
//! 4. On every redraw: take one tick, snapshot the input, call `on_update`,
//!    batch every flow's `on_render` by pipeline, draw, present and request
//!    the next redraw.

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    context::{Context, InitContext},
    data_structures::model::DrawMesh,
    input::{FrameInput, SharedInput},
    render::{Batches, Render},
    scheduler::FrameScheduler,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Output of a lifecycle hook.
///
/// `Out::Configure` can be used to modify the Context during runtime, for
/// instance to change the camera or the clear colour.
///
/// `Empty` is the default output.
pub enum Out {
    Configure(Box<dyn FnOnce(&mut Context)>),
    Empty,
}

impl Default for Out {
    fn default() -> Self {
        Self::Empty
    }
}

/// A decorative scene drawn on one surface.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once when the flow is created; configure context (camera, clear colour, etc.)
/// 2. `on_window_events()` is called for each winit event of the flow's window
/// 3. `on_update()` is called once per frame with the frame's input snapshot
/// 4. `on_render()` is called each frame and specifies how to render `self`
pub trait GraphicsFlow {
    /// This is the only place to modify the Context directly.
    fn on_init(&mut self, ctx: &mut Context) -> Out;

    /// Advances the scene to the state described by `frame`.
    ///
    /// Node transforms must be a function of `frame` (and, for integrated
    /// motion, of the previous frame's state) only.
    fn on_update(&mut self, ctx: &Context, frame: &FrameInput) -> Out;

    fn on_window_events(&mut self, _ctx: &Context, _event: &WindowEvent) -> Out {
        Out::Empty
    }

    fn on_render(&self) -> Render<'_>;
}

impl Debug for dyn GraphicsFlow + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// A flow constructor takes an `InitContext` and asynchronously returns a
/// boxed `GraphicsFlow`, or the reason it could not be built.
pub type FlowConstructor = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow>>>>>,
>;

/// How a surface derives its size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sizing {
    /// The whole browser window (or the native window).
    Window,
    /// The canvas' parent element.
    Container,
}

/// Size a surface should request, given the window's inner size and, when
/// the canvas has one, its parent element's size.
///
/// `None` means keep the current size: the source is missing or collapsed
/// to zero in either dimension.
pub fn target_size(
    sizing: Sizing,
    window: (u32, u32),
    container: Option<(u32, u32)>,
) -> Option<(u32, u32)> {
    let size = match sizing {
        Sizing::Window => window,
        Sizing::Container => container?,
    };
    (size.0 > 0 && size.1 > 0).then_some(size)
}

pub struct SurfaceSpec {
    /// Canvas element id on the web, window title natively.
    pub canvas_id: &'static str,
    pub sizing: Sizing,
    /// Initial inner size of the native window.
    pub native_size: (u32, u32),
    pub constructors: Vec<FlowConstructor>,
}

impl Debug for SurfaceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceSpec")
            .field("canvas_id", &self.canvas_id)
            .field("sizing", &self.sizing)
            .field("flows", &self.constructors.len())
            .finish()
    }
}

/// GPU context plus surface status.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    is_surface_configured: bool,
}

impl AppState {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        Ok(Self {
            ctx,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.resize(width, height);
            self.is_surface_configured = true;
        }
    }

    fn render(&mut self, graphics_flows: &[Box<dyn GraphicsFlow>]) -> Result<(), wgpu::SurfaceError> {
        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut batches = Batches::default();
            graphics_flows
                .iter()
                .for_each(|flow| flow.on_render().set_pipelines(&mut batches));

            // Lines and points write depth; translucent fills go last and only test it.
            let passes = [
                (&self.ctx.pipelines.line, &batches.lines),
                (&self.ctx.pipelines.points, &batches.points),
                (&self.ctx.pipelines.mesh, &batches.triangles),
            ];
            for (pipeline, batch) in passes {
                if batch.is_empty() {
                    continue;
                }
                render_pass.set_pipeline(pipeline);
                for instanced in batch {
                    if instanced.amount == 0 || instanced.instance.size() == 0 {
                        log::warn!("{} has no instances to render", instanced.mesh.name);
                        continue;
                    }
                    render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                    render_pass.draw_mesh_instanced(
                        instanced.mesh,
                        0..instanced.amount as u32,
                        &self.ctx.camera.bind_group,
                        &self.ctx.light.bind_group,
                    );
                }
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// One canvas or window with its flows and frame scheduler.
struct Surface {
    canvas_id: &'static str,
    sizing: Sizing,
    window: Arc<Window>,
    state: Option<AppState>,
    graphics_flows: Vec<Box<dyn GraphicsFlow>>,
    scheduler: FrameScheduler,
    #[cfg(target_arch = "wasm32")]
    requested_size: Option<(u32, u32)>,
}

impl Surface {
    fn init_flows(&mut self) {
        let Some(app_state) = self.state.as_mut() else {
            return;
        };
        self.graphics_flows.iter_mut().for_each(|flow| {
            let out = flow.on_init(&mut app_state.ctx);
            handle_flow_output(&mut app_state.ctx, out);
        });
        self.scheduler.start(Instant::now());
        log::info!(
            "{}: {} flow(s) running",
            self.canvas_id,
            self.graphics_flows.len()
        );
        self.window.request_redraw();
    }

    /// Keeps the canvas in step with the browser window or its parent
    /// element, in CSS pixels.
    #[cfg(target_arch = "wasm32")]
    fn sync_css_size(&mut self) {
        use winit::platform::web::WindowExtWebSys;

        let css_px = |v: Result<JsValue, JsValue>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32
        };
        let window = wgpu::web_sys::window()
            .map(|w| (css_px(w.inner_width()), css_px(w.inner_height())))
            .unwrap_or((0, 0));
        let container = self
            .window
            .canvas()
            .and_then(|c| c.parent_element())
            .map(|p| (p.client_width().max(0) as u32, p.client_height().max(0) as u32));
        let Some(size) = target_size(self.sizing, window, container) else {
            return;
        };
        if self.requested_size == Some(size) {
            return;
        }
        self.requested_size = Some(size);
        let _ = self
            .window
            .request_inner_size(winit::dpi::LogicalSize::new(size.0, size.1));
    }

    fn frame(&mut self, input: &SharedInput) {
        #[cfg(target_arch = "wasm32")]
        self.sync_css_size();

        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(tick) = self.scheduler.step(Instant::now()) else {
            return;
        };
        let frame = input.borrow().snapshot(&tick);

        self.graphics_flows.iter_mut().for_each(|f| {
            let out = f.on_update(&state.ctx, &frame);
            handle_flow_output(&mut state.ctx, out);
        });

        match state.render(&self.graphics_flows) {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = state.ctx.window.inner_size();
                state.ctx.viewport = Default::default();
                state.resize(size.width, size.height);
            }
            Err(e) => {
                log::error!("{}: unable to render {}", self.canvas_id, e);
            }
        }
        // one redraw per display refresh, never skipped
        self.window.request_redraw();
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    input: SharedInput,
    // taken on the first `resumed`
    specs: Option<Vec<SurfaceSpec>>,
    surfaces: Vec<Surface>,
}

impl App {
    fn new(
        event_loop: &EventLoop<FlowEvent>,
        specs: Vec<SurfaceSpec>,
        input: SharedInput,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy,
            input,
            specs: Some(specs),
            surfaces: Vec::new(),
        })
    }

    fn surface_mut(&mut self, id: WindowId) -> Option<&mut Surface> {
        self.surfaces.iter_mut().find(|s| s.window.id() == id)
    }
}

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized {
        window: WindowId,
        state: AppState,
        flows: Vec<Box<dyn GraphicsFlow>>,
    },
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { window, flows, .. } => f
                .debug_struct("Initialized")
                .field("window", window)
                .field("flows", flows)
                .finish(),
        }
    }
}

async fn init_surface(
    window: Arc<Window>,
    constructors: Vec<FlowConstructor>,
) -> anyhow::Result<(AppState, Vec<Box<dyn GraphicsFlow>>)> {
    let app_state = AppState::new(window).await?;
    let flow_futures: Vec<_> = constructors
        .into_iter()
        .map(|constructor| constructor((&app_state.ctx).into()))
        .collect();
    let flows = futures::future::join_all(flow_futures)
        .await
        .into_iter()
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok((app_state, flows))
}

fn create_window(
    event_loop: &ActiveEventLoop,
    spec: &SurfaceSpec,
) -> anyhow::Result<Option<Arc<Window>>> {
    let mut window_attributes = Window::default_attributes().with_title(spec.canvas_id);

    // on the web the canvas keeps its stylesheet size until the first frame syncs it
    #[cfg(not(target_arch = "wasm32"))]
    {
        window_attributes = window_attributes.with_inner_size(winit::dpi::PhysicalSize::new(
            spec.native_size.0,
            spec.native_size.1,
        ));
    }

    #[cfg(target_arch = "wasm32")]
    {
        use winit::platform::web::WindowAttributesExtWebSys;

        let Some(canvas) = wgpu::web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(spec.canvas_id))
        else {
            log::info!("no #{} canvas on this page, scene disabled", spec.canvas_id);
            return Ok(None);
        };
        let canvas: web_sys::HtmlCanvasElement = match canvas.dyn_into() {
            Ok(canvas) => canvas,
            Err(_) => {
                log::warn!("#{} is not a canvas, scene disabled", spec.canvas_id);
                return Ok(None);
            }
        };
        // a background canvas must not swallow scrolling or focus
        window_attributes = window_attributes
            .with_canvas(Some(canvas))
            .with_prevent_default(false)
            .with_focusable(false);
    }

    Ok(Some(Arc::new(event_loop.create_window(window_attributes)?)))
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(specs) = self.specs.take() else {
            return;
        };

        for spec in specs {
            let window = match create_window(event_loop, &spec) {
                Ok(Some(window)) => window,
                Ok(None) => continue,
                Err(e) => {
                    log::warn!("{}: cannot create window, scene disabled: {}", spec.canvas_id, e);
                    continue;
                }
            };
            let init_future = init_surface(window.clone(), spec.constructors);
            let mut surface = Surface {
                canvas_id: spec.canvas_id,
                sizing: spec.sizing,
                window,
                state: None,
                graphics_flows: Vec::new(),
                scheduler: FrameScheduler::new(),
                #[cfg(target_arch = "wasm32")]
                requested_size: None,
            };

            #[cfg(not(target_arch = "wasm32"))]
            {
                match self.async_runtime.block_on(init_future) {
                    Ok((mut app_state, flows)) => {
                        let size = surface.window.inner_size();
                        app_state.resize(size.width, size.height);
                        surface.state = Some(app_state);
                        surface.graphics_flows = flows;
                        surface.init_flows();
                    }
                    Err(e) => log::warn!("{}: GPU setup failed, scene disabled: {:#}", spec.canvas_id, e),
                }
            }

            #[cfg(target_arch = "wasm32")]
            {
                let proxy = self.proxy.clone();
                let window_id = surface.window.id();
                let canvas_id = spec.canvas_id;
                wasm_bindgen_futures::spawn_local(async move {
                    match init_future.await {
                        Ok((state, flows)) => {
                            if proxy
                                .send_event(FlowEvent::Initialized {
                                    window: window_id,
                                    state,
                                    flows,
                                })
                                .is_err()
                            {
                                log::warn!("{}: event loop closed before the scene was ready", canvas_id);
                            }
                        }
                        Err(e) => log::warn!("{}: GPU setup failed, scene disabled: {:#}", canvas_id, e),
                    }
                });
            }

            self.surfaces.push(surface);
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized {
                window,
                mut state,
                flows,
            } => {
                let Some(surface) = self.surface_mut(window) else {
                    return;
                };
                // trigger a resize now that we are initialized
                let size = surface.window.inner_size();
                state.resize(size.width, size.height);
                surface.state = Some(state);
                surface.graphics_flows = flows;
                surface.init_flows();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let input = self.input.clone();
        let Some(surface) = self.surface_mut(window_id) else {
            return;
        };

        if let Some(state) = surface.state.as_mut() {
            surface.graphics_flows.iter_mut().for_each(|f| {
                let out = f.on_window_events(&state.ctx, &event);
                handle_flow_output(&mut state.ctx, out);
            });
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(state) = surface.state.as_mut() {
                    state.resize(size.width, size.height);
                }
            }
            // on the web the page-wide listeners own pointer, scroll and window size
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::CursorMoved { position, .. } => {
                let size = surface.window.inner_size();
                input.borrow_mut().pointer_moved_within(
                    position.x as f32,
                    position.y as f32,
                    (size.width as f32, size.height as f32),
                );
            }
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::MouseWheel { delta, .. } => {
                use winit::event::MouseScrollDelta;

                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * 40.0,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                let current = input.borrow().scroll.get();
                input.borrow_mut().scrolled(current - dy);
            }
            WindowEvent::RedrawRequested => surface.frame(&input),
            _ => {}
        }
    }
}

fn handle_flow_output(ctx: &mut Context, out: Out) {
    match out {
        Out::Configure(f) => f(ctx),
        Out::Empty => (),
    }
}

/// Installs the logger once; later calls are no-ops.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            log::debug!("logger already initialised: {}", e);
        }
    }

    #[cfg(target_arch = "wasm32")]
    {
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::debug!("logger already initialised");
        }
    }
}

/// Runs the event loop until every window is closed (natively) or the page
/// unloads (web).
pub fn run(surfaces: Vec<SurfaceSpec>, input: SharedInput) -> anyhow::Result<()> {
    init_logging();

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, surfaces, input)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
