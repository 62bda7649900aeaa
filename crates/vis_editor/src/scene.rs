//! Scene being edited

use vis_runtime::prelude::{Layer, LayerLookup, LayerManager};

use crate::error::{EditorError, EditorResult};

/// Layers, active layer and save state of the scene open in the editor
#[derive(Debug, Clone)]
pub struct EditorScene {
    /// Scene layers
    pub layers: LayerManager,
    /// Pixels of source art per world unit
    pub pixels_per_unit: f32,
    active_layer_id: u32,
    dirty: bool,
}

impl EditorScene {
    /// Create a scene with one layer per name, the first one active
    ///
    /// A scene always has at least one layer; an empty name list creates a
    /// layer called "Default".
    pub fn new<S: AsRef<str>>(pixels_per_unit: f32, layer_names: &[S]) -> Self {
        let mut layers = LayerManager::new();
        for name in layer_names {
            layers.add_layer(name.as_ref());
        }
        if layers.layers().is_empty() {
            layers.add_layer("Default");
        }
        let active_layer_id = layers.layers()[0].id;

        Self { layers, pixels_per_unit, active_layer_id, dirty: false }
    }

    /// Id of the layer new entities are placed on
    pub fn active_layer_id(&self) -> u32 {
        self.active_layer_id
    }

    /// The active layer
    pub fn active_layer(&self) -> EditorResult<&Layer> {
        self.layer(self.active_layer_id)
    }

    /// Layer by id
    pub fn layer(&self, id: u32) -> EditorResult<&Layer> {
        self.layers.layer(id).ok_or(EditorError::UnknownLayer(id))
    }

    /// Make another layer active
    pub fn set_active_layer(&mut self, id: u32) -> EditorResult<()> {
        self.layer(id)?;
        if self.active_layer_id != id {
            log::debug!("Active layer changed to {id}");
            self.active_layer_id = id;
        }
        Ok(())
    }

    /// Check whether a layer is locked
    pub fn is_layer_locked(&self, id: u32) -> EditorResult<bool> {
        Ok(self.layer(id)?.locked)
    }

    /// Flag unsaved changes
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check for unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forget unsaved changes, after saving
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
