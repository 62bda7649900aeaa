//! Shader components

use crate::assets::{AssetDescriptor, ShaderHandle};
use crate::ecs::Component;

/// Custom shader used when drawing the entity
///
/// The render batching system suspends the batch around every entity that
/// has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderComponent {
    /// Shader asset
    pub asset: AssetDescriptor,
    /// Resolved program, `None` while it failed to resolve
    pub shader: Option<ShaderHandle>,
}

impl Component for ShaderComponent {}

/// Serializable stand-in for [`ShaderComponent`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShaderProtoComponent {
    /// Shader asset, `None` for the default shader
    pub asset: Option<AssetDescriptor>,
}

impl Component for ShaderProtoComponent {}
