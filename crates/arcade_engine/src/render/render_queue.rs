//! # Render Queue System
//!
//! Collects the draw commands and shader uniforms a level produces for one
//! frame so the renderer can submit them in a single pass.
//!
//! - **RenderQueue**: Collects and organizes all render commands for a frame
//! - **DrawCommand**: One model draw with its shader and model matrix
//! - **CommandType**: Separates opaque and transparent objects for proper rendering order

use crate::foundation::math::{Mat4, Vec3};

/// Type of render command for sorting and batching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    /// Opaque objects rendered front-to-back for depth testing efficiency
    Opaque,
    /// Transparent objects rendered back-to-front for alpha blending
    Transparent,
}

/// Shader program description, resolved by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderProgram {
    /// Program name used as the cache key
    pub name: &'static str,
    /// Vertex stage source path
    pub vertex_path: &'static str,
    /// Fragment stage source path
    pub fragment_path: &'static str,
}

impl ShaderProgram {
    /// Forward-shaded lit model program
    pub const FORWARD_MODEL: Self = Self {
        name: "forward_model",
        vertex_path: "shaders/forward_model.vert",
        fragment_path: "shaders/forward_model.frag",
    };
}

/// Directional light fed to lit shaders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels
    pub direction: Vec3,
    /// Light colour, may exceed 1.0 for HDR
    pub color: Vec3,
}

/// Per-frame uniforms of one shader program
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderUniforms {
    /// Program the values belong to
    pub program: ShaderProgram,
    /// View matrix
    pub view: Mat4,
    /// Projection matrix
    pub projection: Mat4,
    /// Camera position in world space
    pub camera_position: Vec3,
    /// Fallback light direction (zero disables it)
    pub light_direction: Vec3,
    /// Scene directional lights
    pub directional_lights: Vec<DirectionalLight>,
    /// Specular exponent
    pub shininess: f32,
}

/// Individual render command containing all data needed to render an object
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Model file the mesh was loaded from
    pub model: String,

    /// Shader program to draw with
    pub program: ShaderProgram,

    /// World transform matrix
    pub transform: Mat4,

    /// Optional colour multiplier
    pub tint: Option<Vec3>,

    /// Type of command for sorting
    pub command_type: CommandType,

    /// Distance from camera for depth sorting
    pub depth_key: f32,
}

impl DrawCommand {
    /// Create a new opaque render command
    pub fn opaque(model: impl Into<String>, program: ShaderProgram, transform: Mat4, depth_key: f32) -> Self {
        Self {
            model: model.into(),
            program,
            transform,
            tint: None,
            command_type: CommandType::Opaque,
            depth_key,
        }
    }

    /// Create a new transparent render command
    pub fn transparent(model: impl Into<String>, program: ShaderProgram, transform: Mat4, depth_key: f32) -> Self {
        Self {
            command_type: CommandType::Transparent,
            ..Self::opaque(model, program, transform, depth_key)
        }
    }

    /// Builder: colour multiplier
    pub fn with_tint(mut self, tint: Vec3) -> Self {
        self.tint = Some(tint);
        self
    }
}

/// Collection of render commands organized for efficient GPU submission
#[derive(Debug, Default)]
pub struct RenderQueue {
    uniforms: Vec<ShaderUniforms>,

    /// Opaque objects sorted front-to-back (near to far)
    opaque_commands: Vec<DrawCommand>,

    /// Transparent objects sorted back-to-front (far to near)
    transparent_commands: Vec<DrawCommand>,
}

impl RenderQueue {
    /// Create a new empty render queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the uniforms of a program, replacing earlier values for it
    pub fn set_uniforms(&mut self, uniforms: ShaderUniforms) {
        self.uniforms.retain(|u| u.program != uniforms.program);
        self.uniforms.push(uniforms);
    }

    /// Uniforms recorded for `program`
    pub fn uniforms(&self, program: &ShaderProgram) -> Option<&ShaderUniforms> {
        self.uniforms.iter().find(|u| &u.program == program)
    }

    /// Add a render command to the queue
    pub fn add_command(&mut self, command: DrawCommand) {
        match command.command_type {
            CommandType::Opaque => self.opaque_commands.push(command),
            CommandType::Transparent => self.transparent_commands.push(command),
        }
    }

    /// Sort commands for optimal rendering order
    pub fn sort_commands(&mut self) {
        self.opaque_commands.sort_by(|a, b| a.depth_key.total_cmp(&b.depth_key));
        self.transparent_commands.sort_by(|a, b| b.depth_key.total_cmp(&a.depth_key));
    }

    /// Get all opaque commands in sorted order
    pub fn opaque_commands(&self) -> &[DrawCommand] {
        &self.opaque_commands
    }

    /// Get all transparent commands in sorted order
    pub fn transparent_commands(&self) -> &[DrawCommand] {
        &self.transparent_commands
    }

    /// Opaque then transparent commands
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.opaque_commands.iter().chain(self.transparent_commands.iter())
    }

    /// Get total number of commands
    pub fn command_count(&self) -> usize {
        self.opaque_commands.len() + self.transparent_commands.len()
    }

    /// Clear all commands and uniforms for next frame
    pub fn clear(&mut self) {
        self.uniforms.clear();
        self.opaque_commands.clear();
        self.transparent_commands.clear();
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.opaque_commands.is_empty() && self.transparent_commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(depth: f32, kind: CommandType) -> DrawCommand {
        let cmd = DrawCommand::opaque("m.obj", ShaderProgram::FORWARD_MODEL, Mat4::identity(), depth);
        DrawCommand { command_type: kind, ..cmd }
    }

    #[test]
    fn test_render_queue_creation() {
        let queue = RenderQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.command_count(), 0);
    }

    #[test]
    fn test_sorting_orders_by_pass() {
        let mut queue = RenderQueue::new();
        queue.add_command(command(5.0, CommandType::Opaque));
        queue.add_command(command(1.0, CommandType::Opaque));
        queue.add_command(command(2.0, CommandType::Transparent));
        queue.add_command(command(8.0, CommandType::Transparent));
        queue.sort_commands();

        let opaque: Vec<f32> = queue.opaque_commands().iter().map(|c| c.depth_key).collect();
        let transparent: Vec<f32> = queue.transparent_commands().iter().map(|c| c.depth_key).collect();
        assert_eq!(opaque, vec![1.0, 5.0]);
        assert_eq!(transparent, vec![8.0, 2.0]);
        assert_eq!(queue.commands().count(), 4);
    }

    #[test]
    fn test_uniforms_are_replaced_per_program() {
        let mut queue = RenderQueue::new();
        let mut uniforms = ShaderUniforms {
            program: ShaderProgram::FORWARD_MODEL,
            view: Mat4::identity(),
            projection: Mat4::identity(),
            camera_position: Vec3::zeros(),
            light_direction: Vec3::zeros(),
            directional_lights: Vec::new(),
            shininess: 32.0,
        };
        queue.set_uniforms(uniforms.clone());
        uniforms.shininess = 8.0;
        queue.set_uniforms(uniforms);

        assert_eq!(queue.uniforms(&ShaderProgram::FORWARD_MODEL).map(|u| u.shininess), Some(8.0));
        queue.clear();
        assert!(queue.uniforms(&ShaderProgram::FORWARD_MODEL).is_none());
    }
}
