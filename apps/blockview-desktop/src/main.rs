use anyhow::{Context, Result};
use blockview_assets::MeshStore;
use blockview_input::{InputState, KeyBindings};
use blockview_kernel::{Scene, SceneConfig};
use blockview_render_wgpu::WgpuRenderer;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

/// Frames between scene summaries in the debug log.
const SUMMARY_INTERVAL: u64 = 300;

#[derive(Parser)]
#[command(name = "blockview-desktop", about = "Fly around a handful of blocks")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config (YAML). Defaults to the built-in four-block scene.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// What Escape does: the first press gives the cursor back, the next one
/// closes the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EscapeAction {
    ReleaseCursor,
    Exit,
}

fn escape_action(cursor_grabbed: bool) -> EscapeAction {
    if cursor_grabbed {
        EscapeAction::ReleaseCursor
    } else {
        EscapeAction::Exit
    }
}

/// Window, surface, and device. Created on the first `resumed`.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("blockview")
            .with_inner_size(PhysicalSize::new(800u32, 600));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("blockview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
        })
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }
}

struct App {
    scene_config: SceneConfig,
    meshes: MeshStore,
    input: InputState,
    scene: Option<Scene>,
    gpu: Option<Gpu>,
    cursor_grabbed: bool,
    last_frame: Instant,
}

impl App {
    fn new(scene_config: SceneConfig) -> Self {
        let bindings = KeyBindings::with_overrides(&scene_config.bindings);
        Self {
            scene_config,
            meshes: MeshStore::new(),
            input: InputState::new(bindings),
            scene: None,
            gpu: None,
            cursor_grabbed: false,
            last_frame: Instant::now(),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let mut gpu = Gpu::new(event_loop)?;
        let mut scene = Scene::from_config(&self.scene_config, gpu.aspect(), &mut self.meshes)
            .context("build scene")?;
        scene
            .init(&mut gpu.renderer.frame(&gpu.device, &gpu.queue))
            .context("initial upload")?;
        tracing::info!("{}", scene.summary());
        self.scene = Some(scene);
        self.gpu = Some(gpu);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn set_cursor_grab(&mut self, grab: bool) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let result = if grab {
            gpu.window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| gpu.window.set_cursor_grab(CursorGrabMode::Locked))
        } else {
            gpu.window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = result {
            tracing::warn!("cursor grab failed: {e}");
        }
        gpu.window.set_cursor_visible(!grab);
        self.cursor_grabbed = grab;
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode, pressed: bool) {
        if key == KeyCode::Escape && pressed {
            match escape_action(self.cursor_grabbed) {
                EscapeAction::ReleaseCursor => self.set_cursor_grab(false),
                EscapeAction::Exit => event_loop.exit(),
            }
            return;
        }
        let name = format!("{key:?}");
        if pressed {
            self.input.press(&name);
        } else {
            self.input.release(&name);
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let (Some(gpu), Some(scene)) = (&mut self.gpu, &mut self.scene) else {
            return;
        };
        gpu.config.width = size.width.max(1);
        gpu.config.height = size.height.max(1);
        gpu.surface.configure(&gpu.device, &gpu.config);
        gpu.renderer
            .resize(&gpu.device, gpu.config.width, gpu.config.height);
        scene.set_projection(self.scene_config.projection.matrix(gpu.aspect()));
    }

    /// Update, draw, and present one frame. Errors here are fatal.
    fn redraw(&mut self) -> Result<()> {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;

        let (Some(gpu), Some(scene)) = (&mut self.gpu, &mut self.scene) else {
            return Ok(());
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return Ok(());
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let input = self.input.take_frame();
        let mut frame = gpu.renderer.frame(&gpu.device, &gpu.queue);
        scene.update(dt, &input, &mut frame).context("scene update")?;
        scene.render(&mut frame).context("scene render")?;
        frame.submit(&view);
        output.present();

        if scene.frame() % SUMMARY_INTERVAL == 0 {
            tracing::debug!("{}", scene.summary());
        }
        gpu.window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            tracing::error!("startup failed: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => self.resize(new_size),
            WindowEvent::Focused(false) => {
                self.input.clear();
                self.set_cursor_grab(false);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.handle_key(event_loop, key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Right,
                state: ElementState::Pressed,
                ..
            } => {
                self.set_cursor_grab(true);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    tracing::error!("{e:#}");
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.cursor_grabbed {
                self.input.add_pointer_delta(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let scene_config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading scene config {}", path.display()))?,
        None => SceneConfig::default(),
    };

    tracing::info!(blocks = scene_config.blocks.len(), "blockview-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(scene_config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
