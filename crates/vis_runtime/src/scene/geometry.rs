//! Entity bounds

use crate::ecs::components::{
    MusicComponent, ParticleComponent, PositionComponent, SoundComponent, SpriteComponent, TextComponent,
    ICON_SIZE,
};
use crate::ecs::{EcsError, Entity, World};
use crate::foundation::math::Rect;

/// Bounding rectangle of an entity in world units
///
/// The size comes from the first visual component found; entities with none
/// of them are a point at their position.
pub fn entity_bounds(world: &World, entity: Entity) -> Result<Rect, EcsError> {
    let position = world.require_component::<PositionComponent>(entity)?;
    let (x, y) = (position.x, position.y);

    if let Some(sprite) = world.get_component::<SpriteComponent>(entity) {
        return Ok(Rect::new(x, y, sprite.width, sprite.height));
    }
    if let Some(text) = world.get_component::<TextComponent>(entity) {
        let (width, height) = text.size();
        return Ok(Rect::new(x, y, width, height));
    }
    if let Some(particle) = world.get_component::<ParticleComponent>(entity) {
        let bounds = particle.effect.bounds;
        return Ok(Rect::new(x + bounds.x, y + bounds.y, bounds.width, bounds.height));
    }
    if world.has_component::<SoundComponent>(entity) || world.has_component::<MusicComponent>(entity) {
        return Ok(Rect::new(x, y, ICON_SIZE, ICON_SIZE));
    }
    Ok(Rect::new(x, y, 0.0, 0.0))
}
