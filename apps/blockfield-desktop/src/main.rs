mod fps;

use anyhow::Result;
use blockfield_common::{EngineConfig, Viewport};
use blockfield_input::{InputState, Key};
use blockfield_render::{RenderSettings, Renderer};
use blockfield_render_wgpu::WgpuBackend;
use clap::Parser;
use fps::FpsCounter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "blockfield-desktop", about = "Fly over a procedurally generated voxel chunk")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::ArrowUp => Some(Key::ArrowUp),
        KeyCode::ArrowDown => Some(Key::ArrowDown),
        KeyCode::ArrowLeft => Some(Key::ArrowLeft),
        KeyCode::ArrowRight => Some(Key::ArrowRight),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        _ => None,
    }
}

struct App {
    config: EngineConfig,
    input: InputState,
    /// Unbounded cursor position built from raw mouse motion.
    mouse: (f64, f64),
    start: Instant,
    fps: FpsCounter,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer<WgpuBackend>>,
}

impl App {
    fn new(config: EngineConfig) -> Self {
        Self {
            config,
            input: InputState::new(),
            mouse: (0.0, 0.0),
            start: Instant::now(),
            fps: FpsCounter::new(0.0),
            window: None,
            renderer: None,
        }
    }

    fn create(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_cfg = &self.config.window;
        let attrs = Window::default_attributes()
            .with_title(window_cfg.title.clone())
            .with_inner_size(PhysicalSize::new(window_cfg.width, window_cfg.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        window.set_cursor_visible(false);
        if let Err(e) = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        {
            tracing::warn!("cursor grab unavailable: {e}");
        }

        let size = window.inner_size();
        let viewport = Viewport::new(size.width, size.height);
        let backend = WgpuBackend::new(window.clone(), viewport, window_cfg.vsync)?;
        let mut renderer = Renderer::init(backend, viewport, &RenderSettings::from(&self.config));
        renderer.sync_input(&self.input);

        self.start = Instant::now();
        self.fps = FpsCounter::new(0.0);
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn redraw(&mut self) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };
        let elapsed = self.start.elapsed().as_secs_f64();
        renderer.tick(&self.input, elapsed as f32);
        if let Some(frames) = self.fps.tick(elapsed) {
            tracing::info!("FPS: {frames}");
        }
    }

    fn shutdown(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            renderer.shutdown();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create(event_loop) {
            tracing::error!("failed to start renderer: {e:#}");
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
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.on_resize(Viewport::new(size.width, size.height));
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape && state == ElementState::Pressed {
                    self.shutdown();
                    event_loop.exit();
                } else if let Some(key) = map_key(code) {
                    self.input.set_key(key, state == ElementState::Pressed);
                }
            }
            WindowEvent::Focused(false) => {
                self.input.clear_keys();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse.0 += delta.0;
            self.mouse.1 += delta.1;
            self.input
                .set_mouse_position(self.mouse.0 as f32, self.mouse.1 as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = EngineConfig::load_or_default(cli.config.as_deref())?;
    tracing::info!("blockfield-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_are_mapped() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::W));
        assert_eq!(map_key(KeyCode::ArrowLeft), Some(Key::ArrowLeft));
        assert_eq!(map_key(KeyCode::Space), None);
    }

    #[test]
    fn cli_accepts_config_path() {
        let cli = Cli::parse_from(["blockfield-desktop", "--config", "world.yaml", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("world.yaml")));
    }
}
