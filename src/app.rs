use crate::app_state::State;
use crate::config::ViewerConfig;
use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

#[cfg(target_os = "macos")]
use winit::platform::macos::WindowAttributesExtMacOS;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

struct App {
    state: Option<State>,
    config: ViewerConfig,
    startup_images: Vec<PathBuf>,
}

impl App {
    fn create_state(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<State> {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("wcanvas-viewer");

        #[cfg(target_os = "macos")]
        {
            window_attributes = window_attributes
                .with_titlebar_transparent(true)
                .with_title_hidden(false)
                .with_fullsize_content_view(true);
        }

        let window = Arc::new(event_loop.create_window(window_attributes)?);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowExtWebSys;

            let canvas = web_sys::Element::from(
                window
                    .canvas()
                    .ok_or_else(|| anyhow::anyhow!("window has no canvas"))?,
            );
            web_sys::window()
                .and_then(|win| win.document())
                .and_then(|doc| {
                    let dst = doc.get_element_by_id("wasm-example")?;
                    dst.append_child(&canvas).ok()?;
                    Some(())
                })
                .ok_or_else(|| anyhow::anyhow!("couldn't append canvas to document body"))?;

            if let Ok(canvas_html) = canvas.dyn_into::<web_sys::HtmlCanvasElement>() {
                let style = canvas_html.style();
                let _ = style.set_property("width", "100vw");
                let _ = style.set_property("height", "100vh");
                let _ = style.set_property("display", "block");
                // Touch gestures belong to the canvas, not to browser scrolling.
                let _ = style.set_property("touch-action", "none");
            }
        }

        pollster::block_on(State::new(window, &self.config, &self.startup_images))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            match self.create_state(event_loop) {
                Ok(state) => {
                    log::info!("canvas initialized");
                    self.state = Some(state);
                }
                Err(err) => {
                    log::error!("failed to initialize canvas: {err:#}");
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if window_id == state.window().id() {
                if !state.input(&event) {
                    match event {
                        WindowEvent::CloseRequested
                        | WindowEvent::KeyboardInput {
                            event:
                                KeyEvent {
                                    state: ElementState::Pressed,
                                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                                    ..
                                },
                            ..
                        } => event_loop.exit(),
                        WindowEvent::Resized(physical_size) => {
                            log::info!("WindowEvent::Resized: {}x{}", physical_size.width, physical_size.height);
                            state.resize(physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            state.update();
                            match state.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                                Err(e) => log::warn!("render failed: {e:?}"),
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window().request_redraw();
        }
    }
}

/// Sets up logging, reads the config and runs the viewer until the window closes.
///
/// Image paths on the command line are placed after the ones listed in the config.
pub fn run() -> anyhow::Result<()> {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Info)?;
        } else {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
        }
    }

    let config = ViewerConfig::load()?;
    let mut startup_images = config.images.clone();
    startup_images.extend(std::env::args_os().skip(1).map(PathBuf::from));

    let event_loop = EventLoop::new()?;
    let mut app = App {
        state: None,
        config,
        startup_images,
    };

    event_loop.run_app(&mut app)?;
    Ok(())
}
