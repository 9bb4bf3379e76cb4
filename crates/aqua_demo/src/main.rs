//! Aquarelle -- a layered watercolor compositing demo.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! per-frame work runs inside `RedrawRequested`:
//!
//!   1. Advance the frame clock (elapsed-time hook + FPS smoothing)
//!   2. Poll the asset loader, swap decoded textures into the materials
//!   3. Apply the foreground motion driver (tween-sampled transform)
//!   4. Stream the two quads' world-space vertices, upload the camera uniform
//!   5. One render pass: opaque background, then alpha-blended foreground
//!
//! The scene is two textured planes: a 10x10 paper background at the origin
//! and a 1x1 watercolor foreground 0.1 units in front of it. Resize rebuilds
//! the camera aspect and the render target (pixel ratio clamped to 2), and a
//! double-click toggles borderless fullscreen. `PresentMode::Fifo` bounds the
//! loop to the display refresh.

mod loader;
mod motion;
mod scene;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use aqua_core::FrameClock;
use aqua_platform::window::PlatformConfig;
use aqua_platform::{fullscreen, DoubleClickDetector, FullscreenSupport, Viewport};
use aqua_render::{Camera3D, GpuContext, MaterialUniform, QuadPipeline, QuadVertex, Texture};

use loader::{AssetLoader, AssetRequest};
use motion::ForegroundMotion;
use scene::{build_scene, AssetSlot, DemoScene, SceneManifest, SceneNode};

const MANIFEST_PATH: &str = "assets/scenes/demo.json";
const FPS_LOG_INTERVAL_FRAMES: u64 = 300;

/// Two quads, four vertices each, both wound counter-clockwise toward +Z.
const QUAD_INDICES: [u16; 12] = [0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7];

/// GPU-side material state for one scene node. The uniform buffer is written
/// once (opacity and mask flag never change); the bind group is rebuilt
/// whenever a decoded texture replaces a placeholder.
struct NodeGpu {
    material_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// The three texture slots, each holding a placeholder until its asset
/// finishes decoding.
struct SlotTextures {
    paper: Texture,
    watercolor: Texture,
    alpha: Texture,
}

impl SlotTextures {
    fn get(&self, slot: AssetSlot) -> &Texture {
        match slot {
            AssetSlot::Paper => &self.paper,
            AssetSlot::Watercolor => &self.watercolor,
            AssetSlot::Alpha => &self.alpha,
        }
    }

    fn set(&mut self, slot: AssetSlot, texture: Texture) {
        match slot {
            AssetSlot::Paper => self.paper = texture,
            AssetSlot::Watercolor => self.watercolor = texture,
            AssetSlot::Alpha => self.alpha = texture,
        }
    }
}

/// All mutable demo state. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
///
/// Every mutable field has exactly one writer: the resize handler owns the
/// viewport and camera aspect, the motion driver owns the foreground
/// transform, the loader pump owns the slot textures. The render path only
/// reads.
struct DemoState {
    window: Arc<Window>,
    gpu: GpuContext,
    viewport: Viewport,
    camera: Camera3D,
    pipeline: QuadPipeline,
    clock: FrameClock,

    scene: DemoScene,
    motion: ForegroundMotion,
    loader: AssetLoader,
    slots: SlotTextures,
    white: Texture,

    fullscreen_support: FullscreenSupport,
    double_click: DoubleClickDetector,

    node_gpu: Vec<NodeGpu>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
}

impl DemoState {
    fn new(window: Arc<Window>) -> Self {
        let scale_factor = window.scale_factor();
        let logical: winit::dpi::LogicalSize<u32> = window.inner_size().to_logical(scale_factor);
        let viewport = Viewport::new(logical.width, logical.height, scale_factor);

        let gpu = GpuContext::new(window.clone(), viewport.render_size());
        let (logical_w, logical_h) = viewport.size();
        let camera = Camera3D::new(logical_w, logical_h);
        let pipeline = QuadPipeline::new(&gpu.device, gpu.surface_format);
        let clock = FrameClock::new();

        let manifest = SceneManifest::load_or_default(Path::new(MANIFEST_PATH));
        let scene = build_scene(&manifest);
        let motion = ForegroundMotion::new(&manifest.motion);
        let loader = AssetLoader::spawn(vec![
            AssetRequest {
                slot: AssetSlot::Paper,
                path: manifest.textures.paper.into(),
            },
            AssetRequest {
                slot: AssetSlot::Watercolor,
                path: manifest.textures.watercolor.into(),
            },
            AssetRequest {
                slot: AssetSlot::Alpha,
                path: manifest.textures.alpha.into(),
            },
        ]);

        let white = Texture::placeholder(&gpu.device, &gpu.queue, "white");
        let slots = SlotTextures {
            paper: Texture::placeholder(&gpu.device, &gpu.queue, "paper_placeholder"),
            watercolor: Texture::placeholder(&gpu.device, &gpu.queue, "watercolor_placeholder"),
            alpha: Texture::placeholder(&gpu.device, &gpu.queue, "alpha_placeholder"),
        };

        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);

        let node_gpu: Vec<NodeGpu> = scene
            .nodes
            .iter()
            .map(|node| {
                let uniform = MaterialUniform::new(
                    node.material.opacity,
                    node.material.alpha_mask.is_some(),
                );
                let material_buffer =
                    gpu.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some("Material Uniform Buffer"),
                            contents: bytemuck::cast_slice(&[uniform]),
                            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                        });
                let alpha = match node.material.alpha_mask {
                    Some(slot) => slots.get(slot),
                    None => &white,
                };
                let bind_group = pipeline.create_material_bind_group(
                    &gpu.device,
                    slots.get(node.material.color),
                    alpha,
                    &material_buffer,
                );
                NodeGpu {
                    material_buffer,
                    bind_group,
                }
            })
            .collect();

        let vertex_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Vertex Buffer"),
            size: (8 * std::mem::size_of::<QuadVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Scene Index Buffer"),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            });

        let fullscreen_support = fullscreen::probe(&window);
        log::info!("Fullscreen support: {:?}", fullscreen_support);

        Self {
            window,
            gpu,
            viewport,
            camera,
            pipeline,
            clock,
            scene,
            motion,
            loader,
            slots,
            white,
            fullscreen_support,
            double_click: DoubleClickDetector::default(),
            node_gpu,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
        }
    }

    /// Swap decoded textures into their slots and refresh the affected
    /// materials. Failed assets were already logged by the loader and keep
    /// their placeholder.
    fn pump_loader(&mut self) {
        let mut any_swapped = false;
        for decoded in self.loader.poll() {
            if let Ok(img) = decoded.result {
                let label = match decoded.slot {
                    AssetSlot::Paper => "paper",
                    AssetSlot::Watercolor => "watercolor",
                    AssetSlot::Alpha => "alpha",
                };
                let texture = Texture::from_image(&self.gpu.device, &self.gpu.queue, &img, label);
                self.slots.set(decoded.slot, texture);
                any_swapped = true;
            }
        }
        if any_swapped {
            self.rebuild_material_bind_groups();
        }
    }

    fn rebuild_material_bind_groups(&mut self) {
        for (node, gpu_node) in self.scene.nodes.iter().zip(self.node_gpu.iter_mut()) {
            let alpha = match node.material.alpha_mask {
                Some(slot) => self.slots.get(slot),
                None => &self.white,
            };
            gpu_node.bind_group = self.pipeline.create_material_bind_group(
                &self.gpu.device,
                self.slots.get(node.material.color),
                alpha,
                &gpu_node.material_buffer,
            );
        }
    }

    fn resize(&mut self, logical_width: u32, logical_height: u32) {
        if !self.viewport.set_size(logical_width, logical_height) {
            return;
        }
        let (w, h) = self.viewport.size();
        self.camera.set_aspect(w, h);
        let (rw, rh) = self.viewport.render_size();
        self.gpu.resize(rw, rh);
        log::info!("Resized to {w}x{h} (render target {rw}x{rh})");
    }

    fn render(&mut self) {
        let elapsed = self.clock.begin_frame();
        if self.clock.frame_count % FPS_LOG_INTERVAL_FRAMES == 0 {
            log::debug!("t={elapsed:.1}s, {:.1} fps", self.clock.smoothed_fps);
        }

        self.pump_loader();
        self.motion.apply(&mut self.scene.foreground_mut().transform);

        // Stream both quads' world-space vertices. The background never
        // changes, but at two quads total the upload is not worth splitting.
        let mut vertices = Vec::with_capacity(8);
        for node in &self.scene.nodes {
            vertices.extend_from_slice(&node_vertices(node));
        }
        self.gpu
            .queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));

        let camera_uniform = self.camera.build_uniform();
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            // Opaque nodes write depth first; transparent nodes are
            // depth-tested against them, so stacking holds regardless of
            // the order nodes appear in the scene.
            render_pass.set_pipeline(&self.pipeline.opaque);
            for (i, node) in self.scene.nodes.iter().enumerate() {
                if node.material.transparent {
                    continue;
                }
                render_pass.set_bind_group(1, &self.node_gpu[i].bind_group, &[]);
                render_pass.draw_indexed(quad_index_range(i), 0, 0..1);
            }

            render_pass.set_pipeline(&self.pipeline.transparent);
            for (i, node) in self.scene.nodes.iter().enumerate() {
                if !node.material.transparent {
                    continue;
                }
                render_pass.set_bind_group(1, &self.node_gpu[i].bind_group, &[]);
                render_pass.draw_indexed(quad_index_range(i), 0, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// Index range of the `i`-th quad in the shared index buffer.
fn quad_index_range(node_index: usize) -> std::ops::Range<u32> {
    let start = node_index as u32 * 6;
    start..start + 6
}

/// World-space corners of a node's quad: model transform applied on the CPU,
/// counter-clockwise when viewed from the camera side (+Z).
fn node_vertices(node: &SceneNode) -> [QuadVertex; 4] {
    let transform = &node.transform;
    let model = Mat4::from_translation(transform.position)
        * Mat4::from_euler(
            glam::EulerRot::XYZ,
            transform.rotation.x,
            transform.rotation.y,
            transform.rotation.z,
        )
        * Mat4::from_scale(transform.scale);

    let half_w = node.width * 0.5;
    let half_h = node.height * 0.5;
    let corners = [
        ([-half_w, -half_h], [0.0, 1.0]),
        ([half_w, -half_h], [1.0, 1.0]),
        ([half_w, half_h], [1.0, 0.0]),
        ([-half_w, half_h], [0.0, 0.0]),
    ];

    corners.map(|([x, y], uv)| {
        let world = model.transform_point3(glam::Vec3::new(x, y, 0.0));
        QuadVertex {
            position: world.to_array(),
            tex_coords: uv,
        }
    })
}

struct App {
    config: PlatformConfig,
    state: Option<DemoState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = aqua_platform::window::create_window(event_loop, &self.config);
        self.state = Some(DemoState::new(window));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let logical: winit::dpi::LogicalSize<u32> =
                    physical_size.to_logical(state.window.scale_factor());
                state.resize(logical.width, logical.height);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                state.viewport.set_scale_factor(scale_factor);
                let (rw, rh) = state.viewport.render_size();
                state.gpu.resize(rw, rh);
                log::info!("Scale factor changed to {scale_factor} (render target {rw}x{rh})");
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(KeyCode::Escape) = event.physical_key {
                    if event.state == ElementState::Pressed {
                        event_loop.exit();
                    }
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if state.double_click.register_click(Instant::now()) {
                    fullscreen::toggle(&state.window, state.fullscreen_support);
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }
                state.render();
            }

            _ => {}
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Aquarelle starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
