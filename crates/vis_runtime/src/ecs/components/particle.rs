//! Particle effect components

use crate::assets::ParticleEffectHandle;
use crate::ecs::Component;

/// Live particle effect
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleComponent {
    /// Resolved effect
    pub effect: ParticleEffectHandle,
    /// Whether the effect starts emitting when the scene starts
    pub active_on_start: bool,
}

impl Component for ParticleComponent {}

/// Serializable stand-in for [`ParticleComponent`]
///
/// Replaced by a live component by the particle inflater once the entity
/// is added to the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParticleProtoComponent {
    /// Whether the effect starts emitting when the scene starts
    pub active_on_start: bool,
}

impl ParticleProtoComponent {
    /// Create a particle prototype
    pub const fn new(active_on_start: bool) -> Self {
        Self { active_on_start }
    }
}

impl Component for ParticleProtoComponent {}
