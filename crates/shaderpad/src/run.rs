use std::fs;
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use engine::{
    Engine, FrameScheduler, GlContext, GlowContext, ImageData, SystemTimeSource, TimeSource,
};
use glutin::config::ConfigTemplateBuilder;
use glutin::context::ContextAttributesBuilder;
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use image::imageops::flip_vertical_in_place;
use raw_window_handle::HasRawWindowHandle;
use tracing_subscriber::EnvFilter;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::cli::Cli;
use crate::defaults;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Opens the playground window and drives the engine until close or Escape.
pub fn run(cli: Cli) -> Result<()> {
    let (width, height) = cli.size.unwrap_or((1280, 720));
    let fragment_source = match cli.shader.as_deref() {
        Some(path) => read_shader(path)?,
        None => {
            tracing::info!("no shader supplied; picking a bundled default");
            defaults::random_fragment().to_owned()
        }
    };

    let event_loop = EventLoop::new().context("failed to initialise event loop")?;
    let window_builder = WindowBuilder::new()
        .with_title("shaderpad")
        .with_inner_size(PhysicalSize::new(width, height));

    let template = ConfigTemplateBuilder::new();
    let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
    let (window, gl_config) = display_builder
        .build(&event_loop, template, |mut configs| {
            configs.next().expect("no compatible GL configs")
        })
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = window.ok_or_else(|| anyhow!("display builder returned no window"))?;

    let raw_window_handle = window.raw_window_handle();
    let gl_display = gl_config.display();
    let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
    let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
        .context("failed to create GL context")?;

    let attrs = window.build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new());
    let surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
        .context("failed to create window surface")?;
    let gl_context = not_current
        .make_current(&surface)
        .context("failed to make GL context current")?;

    let glow_context = unsafe {
        glow::Context::from_loader_function_cstr(|symbol| gl_display.get_proc_address(symbol))
    };

    let initial = window.inner_size();
    let mut engine = Engine::new(
        GlowContext::new(glow_context),
        initial.width,
        initial.height,
        defaults::VERTEX_SHADER,
        &fragment_source,
    )?;

    if let Some(path) = cli.texture.as_deref() {
        if let Err(error) = load_texture(&mut engine, path) {
            tracing::warn!(path = %path.display(), error = %error, "failed to load texture channel");
        }
    }

    let mut scheduler = FrameScheduler::new(cli.fps.filter(|fps| *fps > 0.0));
    let token = scheduler.token();
    let mut time = SystemTimeSource::new();
    let shader_path = cli.shader.clone();

    tracing::info!(
        width = initial.width,
        height = initial.height,
        fps = ?cli.fps,
        "shaderpad window ready"
    );

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    token.cancel();
                    elwt.exit();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    engine.pointer_moved(position.x as f32, position.y as f32);
                }
                WindowEvent::Resized(new_size) => {
                    engine.resize(new_size.width, new_size.height);
                    if new_size.width > 0 && new_size.height > 0 {
                        surface.resize(
                            &gl_context,
                            NonZeroU32::new(new_size.width).unwrap_or(NonZeroU32::MIN),
                            NonZeroU32::new(new_size.height).unwrap_or(NonZeroU32::MIN),
                        );
                    }
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                } => match logical_key.as_ref() {
                    Key::Named(NamedKey::Escape) => {
                        token.cancel();
                        elwt.exit();
                    }
                    Key::Character("r") | Key::Character("R") => {
                        reload_shader(&mut engine, shader_path.as_deref());
                    }
                    _ => {}
                },
                WindowEvent::RedrawRequested => {
                    if token.is_cancelled() {
                        return;
                    }
                    if scheduler.ready_for_frame(Instant::now()) {
                        engine.render_tick(time.sample());
                        if let Err(error) = surface.swap_buffers(&gl_context) {
                            tracing::warn!(error = %error, "failed to present frame");
                        }
                        scheduler.mark_rendered(Instant::now());
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                match scheduler.next_deadline() {
                    Some(deadline) => elwt.set_control_flow(ControlFlow::WaitUntil(deadline)),
                    None => elwt.set_control_flow(ControlFlow::Poll),
                }
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}

/// Re-reads the shader file and recompiles. Failures keep the previous
/// program on screen; the diagnostic goes to the log.
fn reload_shader<C: GlContext>(engine: &mut Engine<C>, path: Option<&Path>) {
    let Some(path) = path else {
        tracing::info!("no shader file to reload; rendering a bundled default");
        return;
    };
    match read_shader(path) {
        Ok(source) => match engine.recompile(&source) {
            Ok(()) => tracing::info!(path = %path.display(), "shader reloaded"),
            Err(error) => tracing::warn!(
                path = %path.display(),
                error = %error,
                "recompile failed; keeping previous shader"
            ),
        },
        Err(error) => {
            tracing::warn!(path = %path.display(), error = %error, "failed to re-read shader file");
        }
    }
}

fn read_shader(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read shader at {}", path.display()))
}

fn load_texture<C: GlContext>(engine: &mut Engine<C>, path: &Path) -> Result<()> {
    let image = image::open(path)
        .with_context(|| format!("failed to open texture at {}", path.display()))?;
    let mut rgba = image.to_rgba8();
    // GL samples with the origin at the bottom-left; flip before upload.
    flip_vertical_in_place(&mut rgba);
    let data = ImageData::new(rgba.width(), rgba.height(), rgba.as_raw())?;
    engine.load_texture(&data)?;
    tracing::info!(
        path = %path.display(),
        width = rgba.width(),
        height = rgba.height(),
        "texture channel loaded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_shader_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "void main() {{}}").unwrap();
        let source = read_shader(file.path()).unwrap();
        assert_eq!(source, "void main() {}");
    }

    #[test]
    fn missing_shader_file_is_an_error() {
        assert!(read_shader(Path::new("/nonexistent/shader.frag")).is_err());
    }
}
