//! The windowed host: a glutin window with an OpenGL 3.3 core context, driven by a
//! [`FrameTicker`].
//!
//! The ticker thread only posts [`FrameTick`]s into the event loop. Drawing happens on the event
//! loop's thread, which owns the context, so ticks and window events are handled one at a time.

use std::ffi::c_void;
use std::io;
use std::time::Instant;

use glutin::dpi::{LogicalSize, PhysicalSize};
use glutin::event::{DeviceEvent, ElementState, Event, KeyboardInput, MouseButton, VirtualKeyCode, WindowEvent};
use glutin::event_loop::{ControlFlow, EventLoop};
use glutin::window::{Window, WindowBuilder};
use glutin::{Api, ContextBuilder, ContextWrapper, GlProfile, GlRequest, NotCurrent, PossiblyCurrent};
use log::{error, info, warn};
use thiserror::Error;

use crate::config::HostConfig;
use crate::context::RenderContext;
use crate::graphics::{GraphicsError, NativeGl, RenderError};
use crate::lessons::{Lesson, LessonConfig};
use crate::scene::{Direction, DrawTarget, InputEvent, SceneSource};
use crate::ticker::FrameTicker;

/// Radians of yaw/pitch per pixel of mouse drag.
const LOOK_SENSITIVITY: f32 = 0.004;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("could not create an OpenGL context: {0}")]
    ContextCreation(#[from] glutin::CreationError),

    #[error("could not use the OpenGL context: {0}")]
    Context(#[from] glutin::ContextError),

    #[error(transparent)]
    Graphics(#[from] GraphicsError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("could not start the frame ticker: {0}")]
    Ticker(#[from] io::Error),
}

/// Posted by the ticker thread once per frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameTick(pub u64);

type Windowed<T> = ContextWrapper<T, Window>;

/// Fields drop in declaration order, which is also the order things have to go away in.
struct Host {
    ticker: FrameTicker,
    render: Option<RenderContext<NativeGl>>,
    scene: Box<dyn SceneSource>,
    windowed: Windowed<PossiblyCurrent>,
    dragging: bool,
    started: Instant,
}

impl Host {
    fn frame(&mut self) -> Result<(), HostError> {
        let render = match self.render.as_mut() {
            Some(render) => render,
            None => return Ok(()),
        };

        let frame = self.scene.frame_at(self.started.elapsed(), render.aspect());
        render.draw(&frame)?;
        self.windowed.swap_buffers()?;

        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.windowed.resize(size);
        if let Some(render) = self.render.as_mut() {
            render.set_viewport(size.width, size.height);
        }
    }

    fn key(&mut self, key: VirtualKeyCode, state: ElementState) {
        if let Some(direction) = direction_for(key) {
            self.scene
                .handle_input(InputEvent::Direction(direction, state == ElementState::Pressed));
        }
    }

    fn look(&mut self, dx: f64, dy: f64) {
        if self.dragging {
            self.scene.handle_input(InputEvent::Look {
                yaw: dx as f32 * LOOK_SENSITIVITY,
                pitch: -dy as f32 * LOOK_SENSITIVITY,
            });
        }
    }

    /// Stops the ticker before anything it could draw into goes away.
    fn shutdown(&mut self) {
        let ticks = self.ticker.stop();
        self.render = None;
        info!("shut down after {} frames", ticks);
    }
}

fn direction_for(key: VirtualKeyCode) -> Option<Direction> {
    match key {
        VirtualKeyCode::W | VirtualKeyCode::Up => Some(Direction::Forward),
        VirtualKeyCode::S | VirtualKeyCode::Down => Some(Direction::Back),
        VirtualKeyCode::A | VirtualKeyCode::Left => Some(Direction::Left),
        VirtualKeyCode::D | VirtualKeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

fn create_context(
    window: &WindowBuilder,
    events: &EventLoop<FrameTick>,
    config: &HostConfig,
) -> Result<Windowed<NotCurrent>, HostError> {
    let builder = |samples: u16| {
        ContextBuilder::new()
            .with_gl(GlRequest::Specific(Api::OpenGl, (3, 3)))
            .with_gl_profile(GlProfile::Core)
            .with_vsync(config.vsync)
            .with_depth_buffer(24)
            .with_multisampling(samples)
    };

    match builder(config.samples).build_windowed(window.clone(), events) {
        Ok(context) => Ok(context),
        Err(e) if config.samples > 0 => {
            // Multisampling is the one optional request; drop it and try once more
            warn!("{}x multisampling unavailable ({}), retrying without it", config.samples, e);
            Ok(builder(0).build_windowed(window.clone(), events)?)
        }
        Err(e) => Err(e.into()),
    }
}

/// Opens a window and runs `lesson` until the window is closed. Only returns on a setup error.
pub fn run(lesson: Lesson, lesson_config: LessonConfig, config: &HostConfig) -> Result<(), HostError> {
    let events = EventLoop::<FrameTick>::with_user_event();
    let window = WindowBuilder::new()
        .with_title(format!("glprimer: {}", lesson))
        .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64));

    let windowed = create_context(&window, &events, config)?;
    let windowed = unsafe { windowed.make_current() }.map_err(|(_, e)| HostError::Context(e))?;

    let gl = NativeGl::load_with(|s| windowed.get_proc_address(s) as *const c_void)?;
    let mut render = RenderContext::build(gl, &lesson_config)?;
    let size = windowed.window().inner_size();
    render.set_viewport(size.width, size.height);

    let proxy = events.create_proxy();
    let ticker = FrameTicker::start(config.frame_interval(), move |index| {
        // The loop has gone away once sending fails
        proxy.send_event(FrameTick(index)).is_ok()
    })?;

    let mut host = Some(Host {
        ticker,
        render: Some(render),
        scene: lesson.scene(),
        windowed,
        dragging: false,
        started: Instant::now(),
    });

    info!("running lesson `{}`: {}", lesson, lesson.description());

    events.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        let mut close = false;
        if let Some(host) = host.as_mut() {
            match event {
                Event::UserEvent(FrameTick(_)) => {
                    if let Err(e) = host.frame() {
                        error!("frame failed: {}", e);
                        close = true;
                    }
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => close = true,
                    WindowEvent::Resized(size) => host.resize(size),
                    WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                state,
                                virtual_keycode: Some(key),
                                ..
                            },
                        ..
                    } => {
                        if key == VirtualKeyCode::Escape {
                            close = true;
                        } else {
                            host.key(key, state);
                        }
                    }
                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    } => host.dragging = state == ElementState::Pressed,
                    _ => {}
                },
                Event::DeviceEvent {
                    event: DeviceEvent::MouseMotion { delta: (dx, dy) },
                    ..
                } => host.look(dx, dy),
                _ => {}
            }
        }

        if close {
            if let Some(mut host) = host.take() {
                host.shutdown();
            }
            *control_flow = ControlFlow::Exit;
        }
    })
}
