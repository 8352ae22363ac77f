//! Level with a model shader and a flat list of drawables

use std::any::Any;

use arcade_engine::foundation::math::{Mat4, Transform, Vec3};
use arcade_engine::prelude::*;
use arcade_engine::render::{DirectionalLight, DrawCommand, ShaderProgram, ShaderUniforms};

/// Specular exponent of the model shader
pub const MODEL_SHININESS: f32 = 32.0;

/// A model placed directly in a level
#[derive(Debug, Clone, PartialEq)]
pub struct RenderEntity {
    /// Model file
    pub model: String,
    /// Placement in the world
    pub transform: Transform,
    /// Optional colour multiplier
    pub tint: Option<Vec3>,
}

impl RenderEntity {
    /// Untinted model at `transform`
    pub fn new(model: impl Into<String>, transform: Transform) -> Self {
        Self {
            model: model.into(),
            transform,
            tint: None,
        }
    }
}

/// Shared level behaviour: owns the model shader for the level's lifetime
/// and draws its render entities for a player camera.
#[derive(Debug)]
pub struct BaseLevel {
    name: String,
    render_entities: Vec<RenderEntity>,
    model_shader: Option<ShaderProgram>,
}

impl BaseLevel {
    /// Empty level called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            render_entities: Vec::new(),
            model_shader: None,
        }
    }

    /// Level name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shader in use, only while the level is started
    pub fn model_shader(&self) -> Option<ShaderProgram> {
        self.model_shader
    }

    /// Add a drawable
    pub fn add_render_entity(&mut self, entity: RenderEntity) {
        self.render_entities.push(entity);
    }

    /// Drawables of this level
    pub fn render_entities(&self) -> &[RenderEntity] {
        &self.render_entities
    }

    /// Remove every drawable
    pub fn clear_render_entities(&mut self) {
        self.render_entities.clear();
    }

    /// Create the model shader
    pub fn start(&mut self) {
        self.model_shader = Some(ShaderProgram::FORWARD_MODEL);
        log::debug!("Level '{}' created shader '{}'", self.name, ShaderProgram::FORWARD_MODEL.name);
    }

    /// Release the model shader
    pub fn end(&mut self) {
        self.model_shader = None;
    }

    /// Write the frame uniforms for the model shader
    ///
    /// Returns the program draws should use, or `None` when there is nothing
    /// to draw with (no camera, or the level is not started).
    pub fn begin_frame(
        &self,
        camera: Option<&FrameView>,
        lights: Vec<DirectionalLight>,
        queue: &mut RenderQueue,
    ) -> Option<ShaderProgram> {
        let camera = camera?;
        let program = self.model_shader?;
        queue.set_uniforms(ShaderUniforms {
            program,
            view: camera.view,
            projection: camera.projection,
            camera_position: camera.camera_position,
            light_direction: Vec3::zeros(),
            directional_lights: lights,
            shininess: MODEL_SHININESS,
        });
        Some(program)
    }

    /// Queue one draw per render entity
    pub fn draw_render_entities(&self, program: ShaderProgram, camera: &FrameView, queue: &mut RenderQueue) {
        for entity in &self.render_entities {
            queue.add_command(model_draw(
                &entity.model,
                program,
                entity.transform.to_matrix(),
                entity.tint,
                camera,
            ));
        }
    }
}

/// Opaque draw of `model` keyed by its distance to the camera
pub(crate) fn model_draw(
    model: &str,
    program: ShaderProgram,
    transform: Mat4,
    tint: Option<Vec3>,
    camera: &FrameView,
) -> DrawCommand {
    let position = Vec3::new(transform[(0, 3)], transform[(1, 3)], transform[(2, 3)]);
    let depth = (position - camera.camera_position).norm();
    let command = DrawCommand::opaque(model, program, transform, depth);
    match tint {
        Some(tint) => command.with_tint(tint),
        None => command,
    }
}

impl Level for BaseLevel {
    fn name(&self) -> &str {
        &self.name
    }

    fn start_level(&mut self) {
        self.start();
    }

    fn end_level(&mut self) {
        self.end();
    }

    fn render(&self, camera: Option<&FrameView>, queue: &mut RenderQueue) {
        let Some(program) = self.begin_frame(camera, Vec::new(), queue) else {
            return;
        };
        if let Some(camera) = camera {
            self.draw_render_entities(program, camera, queue);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
