//! Window management using GLFW
//!
//! Creates an OpenGL 3.3 core context and turns GLFW's event queue into
//! [`Broadcast`] lists. Game code subscribes to the lists on
//! [`WindowEvents`]; [`Window::poll_events`] dispatches whatever GLFW
//! queued since the last frame.

use std::cell::Cell;
use std::rc::Rc;

use glfw::Context;
use thiserror::Error;

use crate::events::Broadcast;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW itself could not start
    #[error("GLFW initialization failed: {0}")]
    InitializationFailed(String),

    /// The window or its context could not be created
    #[error("Window creation failed: {width}x{height} \"{title}\"")]
    CreationFailed {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Requested title
        title: String,
    },
}

/// Result alias for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Cursor moved, in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorPosEvent {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

/// Scroll wheel or touchpad offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    /// Horizontal offset
    pub x_offset: f64,
    /// Vertical offset
    pub y_offset: f64,
}

/// Keyboard key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key
    pub key: glfw::Key,
    /// Platform scancode
    pub scancode: glfw::Scancode,
    /// Press, release or repeat
    pub action: glfw::Action,
    /// Held modifier keys
    pub modifiers: glfw::Modifiers,
}

/// Mouse button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonEvent {
    /// Button
    pub button: glfw::MouseButton,
    /// Press or release
    pub action: glfw::Action,
    /// Held modifier keys
    pub modifiers: glfw::Modifiers,
}

/// Broadcast lists for every input callback the window forwards
#[derive(Debug, Default)]
pub struct WindowEvents {
    /// Cursor moved
    pub cursor_pos: Broadcast<CursorPosEvent>,
    /// Cursor entered (`true`) or left (`false`) the window
    pub cursor_enter: Broadcast<bool>,
    /// Scrolled
    pub scroll: Broadcast<ScrollEvent>,
    /// Framebuffer resized, in pixels
    pub framebuffer_size: Broadcast<(i32, i32)>,
    /// Key transition
    pub key: Broadcast<KeyEvent>,
    /// Mouse button transition
    pub mouse_button: Broadcast<MouseButtonEvent>,
}

impl WindowEvents {
    /// Create empty broadcast lists
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward one GLFW event to its broadcast
    ///
    /// Events without a broadcast are ignored.
    pub fn dispatch(&mut self, event: &glfw::WindowEvent) {
        match *event {
            glfw::WindowEvent::CursorPos(x, y) => self.cursor_pos.broadcast(&CursorPosEvent { x, y }),
            glfw::WindowEvent::CursorEnter(entered) => self.cursor_enter.broadcast(&entered),
            glfw::WindowEvent::Scroll(x_offset, y_offset) => {
                self.scroll.broadcast(&ScrollEvent { x_offset, y_offset });
            }
            glfw::WindowEvent::FramebufferSize(width, height) => self.framebuffer_size.broadcast(&(width, height)),
            glfw::WindowEvent::Key(key, scancode, action, modifiers) => self.key.broadcast(&KeyEvent {
                key,
                scancode,
                action,
                modifiers,
            }),
            glfw::WindowEvent::MouseButton(button, action, modifiers) => {
                self.mouse_button.broadcast(&MouseButtonEvent { button, action, modifiers });
            }
            _ => {}
        }
    }
}

fn to_dimensions(width: i32, height: i32) -> (u32, u32) {
    (u32::try_from(width).unwrap_or(0), u32::try_from(height).unwrap_or(0))
}

/// Keep `viewport` in sync with framebuffer resize broadcasts
pub fn track_viewport(events: &mut WindowEvents, viewport: &Rc<Cell<(u32, u32)>>) {
    let viewport = Rc::clone(viewport);
    events.framebuffer_size.subscribe(move |&(width, height)| {
        viewport.set(to_dimensions(width, height));
        log::debug!("Viewport resized to {}x{}", width, height);
    });
}

/// Width over height, 1.0 for a collapsed viewport
#[allow(clippy::cast_precision_loss)]
pub fn aspect_ratio((width, height): (u32, u32)) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

/// GLFW window wrapper with proper resource management
pub struct Window {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    receiver: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    events: WindowEvents,
    viewport: Rc<Cell<(u32, u32)>>,
}

impl Window {
    /// Open a window with a current OpenGL 3.3 core context
    ///
    /// Failure here is fatal for the game; there is nothing to draw into.
    pub fn new(width: u32, height: u32, title: &str) -> WindowResult<Self> {
        let mut glfw =
            glfw::init(glfw::fail_on_errors).map_err(|e| WindowError::InitializationFailed(format!("{e:?}")))?;

        glfw.window_hint(glfw::WindowHint::ContextVersion(3, 3));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, receiver) = glfw
            .create_window(width, height, title, glfw::WindowMode::Windowed)
            .ok_or_else(|| WindowError::CreationFailed {
                width,
                height,
                title: title.to_string(),
            })?;

        window.make_current();
        window.set_cursor_pos_polling(true);
        window.set_cursor_enter_polling(true);
        window.set_scroll_polling(true);
        window.set_framebuffer_size_polling(true);
        window.set_key_polling(true);
        window.set_mouse_button_polling(true);

        let (fb_width, fb_height) = window.get_framebuffer_size();
        let viewport = Rc::new(Cell::new(to_dimensions(fb_width, fb_height)));
        let mut events = WindowEvents::new();
        track_viewport(&mut events, &viewport);

        log::info!("Created {}x{} window \"{}\"", width, height, title);

        Ok(Self {
            glfw,
            window,
            receiver,
            events,
            viewport,
        })
    }

    /// Broadcast lists to subscribe to
    pub fn events_mut(&mut self) -> &mut WindowEvents {
        &mut self.events
    }

    /// Pump GLFW and dispatch queued events
    pub fn poll_events(&mut self) {
        self.glfw.poll_events();
        for (_, event) in glfw::flush_messages(&self.receiver) {
            self.events.dispatch(&event);
        }
    }

    /// Present the back buffer
    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    /// Whether the user asked to close the window
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Request the window to close at the end of the frame
    pub fn mark_for_close(&mut self) {
        self.window.set_should_close(true);
    }

    /// Current framebuffer size in pixels
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport.get()
    }

    /// Framebuffer aspect ratio
    pub fn aspect(&self) -> f32 {
        aspect_ratio(self.viewport())
    }
}
