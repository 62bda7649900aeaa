//! Sprite batch interface

use crate::assets::ShaderHandle;
use crate::ecs::Entity;
use crate::foundation::math::{Mat4, Rect};

/// Editor icon kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    /// Sound effect entity
    Sound,
    /// Music entity
    Music,
}

/// What a draw call draws
#[derive(Debug, Clone, PartialEq)]
pub enum DrawKind {
    /// Texture region
    Sprite {
        /// Region path
        region: String,
    },
    /// Text block
    Text {
        /// Displayed text
        text: String,
    },
    /// Particle effect
    Particle {
        /// Effect file path
        effect: String,
    },
    /// Editor icon
    Icon(IconKind),
}

/// One draw call
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// Entity being drawn
    pub entity: Entity,
    /// What is drawn
    pub kind: DrawKind,
    /// Destination rectangle in the active coordinate space
    pub bounds: Rect,
}

/// Batched 2D renderer
///
/// Changing the shader or the projection while drawing flushes the draw
/// calls collected so far.
pub trait Batch {
    /// Start collecting draw calls
    fn begin(&mut self);

    /// Flush collected draw calls
    fn end(&mut self);

    /// Replace the projection matrix
    fn set_projection_matrix(&mut self, matrix: &Mat4);

    /// Replace the shader, `None` restores the default one
    fn set_shader(&mut self, shader: Option<&ShaderHandle>);

    /// Queue a draw call
    fn draw(&mut self, item: DrawItem);
}

/// Call recorded by [`RecordingBatch`]
#[derive(Debug, Clone, PartialEq)]
pub enum BatchCall {
    /// `begin`
    Begin,
    /// `end`
    End,
    /// `set_projection_matrix`
    Projection(Mat4),
    /// `set_shader`, with the shader name
    Shader(Option<String>),
    /// `draw`
    Draw(DrawItem),
}

/// Batch that records every call, used by headless hosts and tests
#[derive(Debug, Default)]
pub struct RecordingBatch {
    calls: Vec<BatchCall>,
    drawing: bool,
}

impl RecordingBatch {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call in order
    pub fn calls(&self) -> &[BatchCall] {
        &self.calls
    }

    /// Entities drawn, in draw order
    pub fn drawn_entities(&self) -> Vec<Entity> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BatchCall::Draw(item) => Some(item.entity),
                _ => None,
            })
            .collect()
    }

    /// Check whether the batch is between `begin` and `end`
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Forget recorded calls
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Batch for RecordingBatch {
    fn begin(&mut self) {
        if self.drawing {
            log::warn!("Batch begin called while already drawing");
        }
        self.drawing = true;
        self.calls.push(BatchCall::Begin);
    }

    fn end(&mut self) {
        if !self.drawing {
            log::warn!("Batch end called while not drawing");
        }
        self.drawing = false;
        self.calls.push(BatchCall::End);
    }

    fn set_projection_matrix(&mut self, matrix: &Mat4) {
        self.calls.push(BatchCall::Projection(*matrix));
    }

    fn set_shader(&mut self, shader: Option<&ShaderHandle>) {
        self.calls.push(BatchCall::Shader(shader.map(|shader| shader.name.clone())));
    }

    fn draw(&mut self, item: DrawItem) {
        self.calls.push(BatchCall::Draw(item));
    }
}
