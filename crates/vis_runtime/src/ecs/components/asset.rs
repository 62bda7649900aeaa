//! Asset reference and string id components

use serde::{Deserialize, Serialize};

use crate::assets::AssetDescriptor;
use crate::ecs::Component;

/// Asset the entity was created from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetComponent {
    /// Asset descriptor
    pub asset: AssetDescriptor,
}

impl AssetComponent {
    /// Create an asset reference
    pub fn new(asset: AssetDescriptor) -> Self {
        Self { asset }
    }
}

impl Component for AssetComponent {}

/// User assigned string id, looked up through the id manager
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdComponent {
    /// The id; several entities may share one
    pub id: String,
}

impl IdComponent {
    /// Create an id component
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Component for IdComponent {}
