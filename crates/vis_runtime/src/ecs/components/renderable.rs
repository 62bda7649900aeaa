//! Render ordering components

use serde::{Deserialize, Serialize};

use crate::ecs::Component;

/// Marks an entity as drawable and carries its order inside its layer
///
/// Entities are drawn by ascending layer id, then ascending `z_index`. After
/// changing `z_index` the render batching system must be marked dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderableComponent {
    /// Draw order inside the layer; higher is drawn later
    pub z_index: i32,
}

impl RenderableComponent {
    /// Create a renderable with the given z-index
    pub const fn new(z_index: i32) -> Self {
        Self { z_index }
    }
}

impl Component for RenderableComponent {}

/// Layer an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayerComponent {
    /// Id of the layer, see [`crate::scene::LayerManager`]
    pub layer_id: u32,
}

impl LayerComponent {
    /// Create a layer reference
    pub const fn new(layer_id: u32) -> Self {
        Self { layer_id }
    }
}

impl Component for LayerComponent {}

/// Entity is skipped by rendering agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvisibleComponent;

impl Component for InvisibleComponent {}
