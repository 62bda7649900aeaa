//! Scene layers
//!
//! Every entity references one layer through its `LayerComponent`. Layers
//! decide the draw order before z-index does, which coordinate space their
//! entities use, and whether the editor may touch them.

use serde::{Deserialize, Serialize};

/// Coordinate space a layer is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinateSpace {
    /// World units, drawn with the world camera
    #[default]
    World,
    /// Pixels, drawn with the UI camera
    Screen,
}

/// Layer of a scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Id referenced by `LayerComponent`
    pub id: u32,
    /// Display name
    pub name: String,
    /// Whether entities of the layer are shown in the editor
    pub visible: bool,
    /// Whether entities of the layer may be edited
    pub locked: bool,
    /// Coordinate space
    pub coordinate_space: CoordinateSpace,
}

impl Layer {
    /// Create a visible, unlocked world space layer
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            locked: false,
            coordinate_space: CoordinateSpace::World,
        }
    }
}

/// Read access to layers by id
pub trait LayerLookup {
    /// Layer with the given id
    fn layer(&self, id: u32) -> Option<&Layer>;
}

/// Ordered layer list of a scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerManager {
    layers: Vec<Layer>,
}

impl LayerManager {
    /// Create an empty layer list
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer with the next free id and return the id
    pub fn add_layer(&mut self, name: impl Into<String>) -> u32 {
        let id = self.layers.iter().map(|layer| layer.id + 1).max().unwrap_or(0);
        self.layers.push(Layer::new(id, name));
        id
    }

    /// Insert a fully described layer, replacing one with the same id
    pub fn insert(&mut self, layer: Layer) {
        match self.layers.iter_mut().find(|existing| existing.id == layer.id) {
            Some(existing) => *existing = layer,
            None => self.layers.push(layer),
        }
    }

    /// Remove a layer
    pub fn remove(&mut self, id: u32) -> Option<Layer> {
        let index = self.layers.iter().position(|layer| layer.id == id)?;
        Some(self.layers.remove(index))
    }

    /// Layer by id, mutable
    pub fn layer_mut(&mut self, id: u32) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    /// Check whether the layer exists and is locked
    pub fn is_locked(&self, id: u32) -> bool {
        self.layer(id).is_some_and(|layer| layer.locked)
    }

    /// All layers in insertion order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

impl LayerLookup for LayerManager {
    fn layer(&self, id: u32) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id == id)
    }
}
