//! Desktop host: a transparent winit window driving a [`GpuRenderer`].

use std::sync::Arc;

use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::animation::{SnowAnimation, StopHandle};
use crate::config::SnowConfig;
use crate::error::{RenderError, SetupError};
use crate::gpu::GpuRenderer;
use crate::viewport::Viewport;

const WINDOW_TITLE: &str = "Snowfall";

/// Open a window and let it snow until the window closes.
pub fn run(config: SnowConfig) -> Result<(), SetupError> {
    run_until(config, StopHandle::new())
}

/// Like [`run`], but also stops when `stop` is triggered.
pub fn run_until(config: SnowConfig, stop: StopHandle) -> Result<(), SetupError> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, stop);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    config: SnowConfig,
    stop: StopHandle,
    window: Option<Arc<Window>>,
    snow: Option<SnowAnimation<GpuRenderer>>,
    error: Option<SetupError>,
}

impl App {
    fn new(config: SnowConfig, stop: StopHandle) -> Self {
        Self {
            config,
            stop,
            window: None,
            snow: None,
            error: None,
        }
    }

    fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SetupError> {
        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .with_transparent(true);

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let viewport = Viewport::from_physical(window.inner_size(), window.scale_factor());

        let renderer = pollster::block_on(GpuRenderer::new(window.clone(), viewport))?;
        let snow = SnowAnimation::new(self.config.clone(), viewport, renderer)?
            .with_stop_handle(self.stop.clone());

        window.request_redraw();
        self.window = Some(window);
        self.snow = Some(snow);
        Ok(())
    }

    fn viewport(&self) -> Option<Viewport> {
        self.window
            .as_ref()
            .map(|w| Viewport::from_physical(w.inner_size(), w.scale_factor()))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }
        if let Err(e) = self.setup(event_loop) {
            error!("Snowfall setup failed: {}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window closed");
                self.stop.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let (Some(viewport), Some(snow)) = (self.viewport(), self.snow.as_mut()) {
                    snow.handle_resize(viewport);
                }
            }
            WindowEvent::RedrawRequested => {
                if self.stop.is_stopped() {
                    event_loop.exit();
                    return;
                }
                if let Some(snow) = &mut self.snow {
                    match snow.tick() {
                        Ok(()) => {}
                        Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                            error!("GPU out of memory, stopping");
                            self.stop.stop();
                            event_loop.exit();
                            return;
                        }
                        Err(e) => warn!("Frame skipped: {}", e),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Minimised or occluded windows may stop receiving redraws.
        if self.stop.is_stopped() {
            event_loop.exit();
        }
    }
}
