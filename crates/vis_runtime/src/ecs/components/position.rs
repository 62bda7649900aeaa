//! Position component

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::Vec2;

/// Position of the bottom left corner of an entity, in world units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionComponent {
    /// Horizontal position
    pub x: f32,
    /// Vertical position
    pub y: f32,
}

impl PositionComponent {
    /// Create a new position
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Position as a vector
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Move by a delta
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }
}

impl Component for PositionComponent {}
