use crate::config::SandboxConfig;
use crate::render::pipeline::RenderPipeline;
use crate::render::shaders::ShaderSource;
use crate::utils::error::SandboxError;
use gl::types::GLenum;
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{debug, error, info, warn};
use raw_window_handle::HasRawWindowHandle;
use std::{
    ffi::{c_char, CStr, CString},
    num::NonZeroU32,
    ptr,
};
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};

/// Lifecycle of a sandbox session. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    Uninitialized,
    WindowCreated,
    ContextBound,
    Running,
    Terminated,
}

impl SessionState {
    /// Each state may move to the one after it, and anything but
    /// `Terminated` may move to `Terminated`.
    pub fn can_advance_to(self, next: SessionState) -> bool {
        use SessionState::*;

        match (self, next) {
            (Terminated, _) => false,
            (_, Terminated) => true,
            (Uninitialized, WindowCreated)
            | (WindowCreated, ContextBound)
            | (ContextBound, Running) => true,
            _ => false,
        }
    }
}

fn advance(state: &mut SessionState, next: SessionState) -> Result<(), SandboxError> {
    if !state.can_advance_to(next) {
        return Err(SandboxError::InvalidTransition {
            from: *state,
            to: next,
        });
    }
    debug!("Session {:?} -> {:?}", state, next);
    *state = next;
    Ok(())
}

/// Escape requests the window to close.
pub fn is_close_key(key: PhysicalKey, state: ElementState) -> bool {
    state == ElementState::Pressed && key == PhysicalKey::Code(KeyCode::Escape)
}

/// One window, its GL context and everything drawn into it.
pub struct Sandbox {
    // Dropped before the context so GL objects are deleted while it is current
    pipeline: Option<RenderPipeline>,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
    state: SessionState,
    close_requested: bool,
}

impl Sandbox {
    /// Creates the window and context, loads GL and builds the pipeline.
    /// Any failure here is fatal; there is no fallback profile.
    pub fn new(
        event_loop: &EventLoopWindowTarget<()>,
        config: &SandboxConfig,
        source: &ShaderSource,
    ) -> Result<Self, SandboxError> {
        let mut state = SessionState::Uninitialized;

        let window_builder = WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
            .with_resizable(config.window.resizable);

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let display_builder =
            DisplayBuilder::new().with_window_builder(Some(window_builder.clone()));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display offered no GL configs")
            })
            .map_err(|e| SandboxError::Display(e.to_string()))?;

        let window = match window {
            Some(window) => window,
            None => glutin_winit::finalize_window(event_loop, window_builder, &gl_config)
                .map_err(|e| SandboxError::Window(e.to_string()))?,
        };
        advance(&mut state, SessionState::WindowCreated)?;

        let (major, minor) = config.context.version();
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(GlProfile::Core)
            .build(Some(window.raw_window_handle()));

        let gl_display = gl_config.display();
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes)? };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs)? };
        let gl_context = not_current.make_current(&gl_surface)?;

        if config.window.vsync {
            if let Err(e) =
                gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                warn!("Failed to enable vsync: {}", e);
            }
        }

        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()),
            Err(_) => ptr::null(),
        });
        if !gl::Clear::is_loaded() || !gl::DrawElements::is_loaded() {
            return Err(SandboxError::GlLoad);
        }
        advance(&mut state, SessionState::ContextBound)?;

        info!(
            "OpenGL version: {}",
            gl_string(gl::VERSION).unwrap_or_else(|| "unknown".to_string())
        );

        let pipeline = RenderPipeline::new(source, &config.shader, &config.animation)?;
        advance(&mut state, SessionState::Running)?;
        info!("Sandbox running");

        Ok(Self {
            pipeline: Some(pipeline),
            gl_surface,
            gl_context,
            window,
            state,
            close_requested: false,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn should_close(&self) -> bool {
        self.close_requested
    }

    pub fn request_close(&mut self) {
        if !self.close_requested {
            debug!("Close requested");
        }
        self.close_requested = true;
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Result<(), SandboxError> {
        match event {
            WindowEvent::CloseRequested => self.request_close(),
            WindowEvent::KeyboardInput { event, .. }
                if is_close_key(event.physical_key, event.state) =>
            {
                self.request_close()
            }
            WindowEvent::Resized(size) => {
                if let (Some(width), Some(height)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                {
                    self.gl_surface.resize(&self.gl_context, width, height);
                    unsafe {
                        gl::Viewport(0, 0, size.width as i32, size.height as i32);
                    }
                }
            }
            WindowEvent::RedrawRequested => self.render_frame()?,
            _ => {}
        }
        Ok(())
    }

    /// Draws one frame and presents it. Does nothing once a close was
    /// requested or the session has ended.
    pub fn render_frame(&mut self) -> Result<(), SandboxError> {
        if self.state != SessionState::Running || self.close_requested {
            return Ok(());
        }

        if let Some(pipeline) = &mut self.pipeline {
            pipeline.draw_frame()?;
        }
        self.gl_surface.swap_buffers(&self.gl_context)?;
        Ok(())
    }

    pub fn terminate(&mut self) {
        if self.state == SessionState::Terminated {
            return;
        }
        self.pipeline.take();
        self.state = SessionState::Terminated;
        info!("Sandbox terminated");
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Opens the sandbox window and renders until it is closed.
pub fn run(config: &SandboxConfig, source: &ShaderSource) -> Result<(), SandboxError> {
    let event_loop = EventLoopBuilder::new().build()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut sandbox = Sandbox::new(&event_loop, config, source)?;
    let mut failure = None;

    event_loop.run(|event, elwt| match event {
        Event::WindowEvent { event, window_id } if window_id == sandbox.window().id() => {
            if let Err(e) = sandbox.handle_window_event(&event) {
                error!("Frame failed: {}", e);
                failure = Some(e);
                sandbox.request_close();
            }
        }
        Event::AboutToWait => {
            if sandbox.should_close() {
                sandbox.terminate();
                elwt.exit();
            } else {
                sandbox.window().request_redraw();
            }
        }
        _ => {}
    })?;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn gl_string(name: GLenum) -> Option<String> {
    let value = unsafe { gl::GetString(name) };
    if value.is_null() {
        return None;
    }
    let value = unsafe { CStr::from_ptr(value as *const c_char) };
    Some(value.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_advance_in_order() {
        let mut state = SessionState::Uninitialized;
        for next in [
            SessionState::WindowCreated,
            SessionState::ContextBound,
            SessionState::Running,
            SessionState::Terminated,
        ] {
            advance(&mut state, next).unwrap();
        }
        assert_eq!(state, SessionState::Terminated);
    }

    #[test]
    fn test_states_cannot_skip_or_go_back() {
        use SessionState::*;

        assert!(!Uninitialized.can_advance_to(ContextBound));
        assert!(!WindowCreated.can_advance_to(Running));
        assert!(!Running.can_advance_to(WindowCreated));
        assert!(!Running.can_advance_to(Running));
        assert!(!Terminated.can_advance_to(Terminated));
        assert!(!Terminated.can_advance_to(Running));

        let mut state = ContextBound;
        let err = advance(&mut state, Uninitialized).unwrap_err();
        assert!(matches!(err, SandboxError::InvalidTransition { .. }));
        assert_eq!(state, ContextBound);
    }

    #[test]
    fn test_any_live_state_can_terminate() {
        use SessionState::*;

        for state in [Uninitialized, WindowCreated, ContextBound, Running] {
            assert!(state.can_advance_to(Terminated));
        }
    }

    #[test]
    fn test_escape_press_closes() {
        let escape = PhysicalKey::Code(KeyCode::Escape);

        assert!(is_close_key(escape, ElementState::Pressed));
        assert!(!is_close_key(escape, ElementState::Released));
        assert!(!is_close_key(
            PhysicalKey::Code(KeyCode::KeyQ),
            ElementState::Pressed
        ));
    }
}
