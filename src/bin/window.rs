//! 带窗口的运行器 - winit 事件 + softbuffer 呈现

mod host;

use pick_render::runtime::{App, AppConfig};
use pick_render::scene::Scene;
use pick_render::{Canvas, Color};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

struct PickWindow {
    window: Option<Arc<Window>>,
    surface: Option<softbuffer::Surface<Arc<Window>, Arc<Window>>>,
    app: App,
    config: AppConfig,
    background: Color,
    frame_interval: Duration,
}

impl PickWindow {
    fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let mut scene = Scene::new();
        let root = host::sample_scene(&mut scene)?;
        let app = App::with_config(scene, root, &config);

        Ok(Self {
            window: None,
            surface: None,
            app,
            background: config.background_color(),
            frame_interval: Duration::from_millis(config.frame_interval.max(1)),
            config,
        })
    }

    /// 一帧：应用修改、必要时重绘、呈现
    fn frame(&mut self) {
        match self.app.tick() {
            Ok(true) => self.present(),
            Ok(false) => {}
            Err(e) => log::error!("render failed: {}", e),
        }
    }

    fn present(&mut self) {
        let (Some(window), Some(surface)) = (&self.window, &mut self.surface) else {
            return;
        };
        let size = window.inner_size();
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return;
        };
        if let Err(e) = surface.resize(width, height) {
            log::error!("surface resize failed: {}", e);
            return;
        }

        match surface.buffer_mut() {
            Ok(mut buffer) => {
                present_to_buffer(&mut buffer, size.width, size.height, self.app.surface().visible(), self.background);
                if let Err(e) = buffer.present() {
                    log::error!("present failed: {}", e);
                }
            }
            Err(e) => log::error!("buffer unavailable: {}", e),
        }
    }
}

/// 把可见画布叠加到背景色上写入窗口缓冲区 (0RGB)
fn present_to_buffer(buffer: &mut [u32], width: u32, height: u32, canvas: &Canvas, background: Color) {
    let bg = background.to_hex();
    buffer.fill(bg);

    for y in 0..height.min(canvas.height()) {
        for x in 0..width.min(canvas.width()) {
            let pixel = canvas.get_pixel(x, y);
            if pixel.a == 0 {
                continue;
            }
            let idx = y as usize * width as usize + x as usize;
            if let Some(dst) = buffer.get_mut(idx) {
                *dst = pixel.blend(&background).to_hex();
            }
        }
    }
}

impl ApplicationHandler for PickWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(self.config.resizable);

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        match surface {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => {
                log::error!("failed to create surface: {}", e);
                event_loop.exit();
                return;
            }
        }

        let size = window.inner_size();
        self.app.resize(size.width, size.height);
        self.window = Some(window);

        if let Err(e) = self.app.start() {
            log::error!("initial render failed: {}", e);
        }
        self.present();
        println!("🎮 Ready! 移动鼠标到矩形上");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                self.app.resize(size.width, size.height);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.app.pointer_move(position.x as f32, position.y as f32);
            }

            WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                self.app.click();
            }

            WindowEvent::RedrawRequested => self.frame(),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + self.frame_interval));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    host::init_logging();
    println!("🚀 Pick Render - window");

    let config = host::load_config();
    let event_loop = EventLoop::new()?;
    let mut app = PickWindow::new(config)?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
