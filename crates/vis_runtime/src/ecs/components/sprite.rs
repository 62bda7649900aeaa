//! Sprite and text components

use crate::assets::{FontHandle, TextureRegion};
use crate::ecs::Component;

/// Textured quad
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteComponent {
    /// Resolved texture region
    pub region: TextureRegion,
    /// Width in world units
    pub width: f32,
    /// Height in world units
    pub height: f32,
}

impl SpriteComponent {
    /// Create a sprite sized from the region and the scene scale
    pub fn new(region: TextureRegion, pixels_per_unit: f32) -> Self {
        let width = region.width / pixels_per_unit;
        let height = region.height / pixels_per_unit;
        Self { region, width, height }
    }

    /// Swap the region after a reload, keeping the current size
    pub fn set_region(&mut self, region: TextureRegion) {
        self.region = region;
    }
}

impl Component for SpriteComponent {}

/// Text drawn with a bitmap or TrueType font
#[derive(Debug, Clone, PartialEq)]
pub struct TextComponent {
    /// Resolved font
    pub font: FontHandle,
    /// Displayed text
    pub text: String,
}

impl TextComponent {
    /// Create a text component
    pub fn new(font: FontHandle, text: impl Into<String>) -> Self {
        Self { font, text: text.into() }
    }

    /// Size of the text block in world units
    pub fn size(&self) -> (f32, f32) {
        self.font.measure(&self.text)
    }
}

impl Component for TextComponent {}
