//! Rendering seam
//!
//! Levels describe a frame as a [`RenderQueue`]; whatever owns the graphics
//! context implements [`SceneRenderer`] and consumes it. The engine ships a
//! [`HeadlessRenderer`] that only records what it was given.

pub mod render_queue;
pub mod window;

pub use render_queue::{CommandType, DirectionalLight, DrawCommand, RenderQueue, ShaderProgram, ShaderUniforms};
pub use window::{Window, WindowError, WindowEvents};

use crate::foundation::math::{utils, Mat4, Point3, Vec3};

/// Camera state for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    /// World to view transform
    pub view: Mat4,
    /// View to clip transform
    pub projection: Mat4,
    /// Camera position in world space
    pub camera_position: Vec3,
}

impl FrameView {
    /// Perspective camera at `eye` looking at `target`, Y up
    pub fn look_at(eye: Vec3, target: Vec3, aspect: f32, fov_y_deg: f32) -> Self {
        let view = Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &Vec3::y());
        let projection = Mat4::new_perspective(aspect.max(f32::EPSILON), utils::deg_to_rad(fov_y_deg), 0.1, 10_000.0);
        Self {
            view,
            projection,
            camera_position: eye,
        }
    }
}

/// Consumer of finished render queues
pub trait SceneRenderer {
    /// Draw one frame
    fn submit(&mut self, queue: &RenderQueue);
}

/// Renderer with no graphics context
///
/// Keeps counters about what was submitted; used by tests and by the game
/// when it runs without a window.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    frames: u64,
    total_draws: u64,
    last_draws: Vec<DrawCommand>,
}

impl HeadlessRenderer {
    /// Create a renderer with zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames submitted so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw commands submitted over all frames
    pub fn total_draws(&self) -> u64 {
        self.total_draws
    }

    /// Draw commands of the most recent frame, in submission order
    pub fn last_draws(&self) -> &[DrawCommand] {
        &self.last_draws
    }
}

impl SceneRenderer for HeadlessRenderer {
    fn submit(&mut self, queue: &RenderQueue) {
        self.frames += 1;
        self.total_draws += queue.command_count() as u64;
        self.last_draws = queue.commands().cloned().collect();
        log::trace!("Headless frame {} with {} draw(s)", self.frames, self.last_draws.len());
    }
}
