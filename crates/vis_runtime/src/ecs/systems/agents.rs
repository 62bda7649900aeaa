//! Rendering agents for sprites, text, particle effects and editor icons

use crate::ecs::components::{
    InvisibleComponent, MusicComponent, ParticleComponent, SoundComponent, SpriteComponent, TextComponent,
};
use crate::ecs::{Entity, World};
use crate::render::{Batch, DrawItem, DrawKind, IconKind};
use crate::scene::entity_bounds;

use super::RenderAgent;

fn draw_bounds(world: &World, batch: &mut dyn Batch, entity: Entity, kind: DrawKind) {
    match entity_bounds(world, entity) {
        Ok(bounds) => batch.draw(DrawItem { entity, kind, bounds }),
        Err(error) => log::warn!("Skipping draw of {entity:?}: {error}"),
    }
}

/// Draws [`SpriteComponent`] entities
#[derive(Debug, Default)]
pub struct SpriteRenderAgent;

impl SpriteRenderAgent {
    /// Create a sprite agent
    pub fn new() -> Self {
        Self
    }
}

impl RenderAgent for SpriteRenderAgent {
    fn name(&self) -> &'static str {
        "sprites"
    }

    fn accepts(&self, world: &World, entity: Entity) -> bool {
        world.has_component::<SpriteComponent>(entity)
    }

    fn process(&mut self, world: &World, batch: &mut dyn Batch, entity: Entity) {
        if world.has_component::<InvisibleComponent>(entity) {
            return;
        }
        if let Some(sprite) = world.get_component::<SpriteComponent>(entity) {
            let kind = DrawKind::Sprite { region: sprite.region.path.clone() };
            draw_bounds(world, batch, entity, kind);
        }
    }
}

/// Draws [`TextComponent`] entities
#[derive(Debug, Default)]
pub struct TextRenderAgent;

impl TextRenderAgent {
    /// Create a text agent
    pub fn new() -> Self {
        Self
    }
}

impl RenderAgent for TextRenderAgent {
    fn name(&self) -> &'static str {
        "text"
    }

    fn accepts(&self, world: &World, entity: Entity) -> bool {
        world.has_component::<TextComponent>(entity)
    }

    fn process(&mut self, world: &World, batch: &mut dyn Batch, entity: Entity) {
        if world.has_component::<InvisibleComponent>(entity) {
            return;
        }
        if let Some(text) = world.get_component::<TextComponent>(entity) {
            let kind = DrawKind::Text { text: text.text.clone() };
            draw_bounds(world, batch, entity, kind);
        }
    }
}

/// Draws [`ParticleComponent`] entities
///
/// Effects flagged inactive on start are still drawn; the editor shows
/// every effect.
#[derive(Debug, Default)]
pub struct ParticleRenderAgent;

impl ParticleRenderAgent {
    /// Create a particle agent
    pub fn new() -> Self {
        Self
    }
}

impl RenderAgent for ParticleRenderAgent {
    fn name(&self) -> &'static str {
        "particles"
    }

    fn accepts(&self, world: &World, entity: Entity) -> bool {
        world.has_component::<ParticleComponent>(entity)
    }

    fn process(&mut self, world: &World, batch: &mut dyn Batch, entity: Entity) {
        if world.has_component::<InvisibleComponent>(entity) {
            return;
        }
        if let Some(particle) = world.get_component::<ParticleComponent>(entity) {
            let kind = DrawKind::Particle { effect: particle.effect.path.clone() };
            draw_bounds(world, batch, entity, kind);
        }
    }
}

/// Draws sound and music entities as icons
///
/// Audio has no visual of its own; the editor shows a fixed size icon so the
/// entity can be picked and moved. Invisible audio entities are still drawn.
#[derive(Debug, Default)]
pub struct IconRenderAgent;

impl IconRenderAgent {
    /// Create an icon agent
    pub fn new() -> Self {
        Self
    }
}

impl RenderAgent for IconRenderAgent {
    fn name(&self) -> &'static str {
        "icons"
    }

    fn accepts(&self, world: &World, entity: Entity) -> bool {
        world.has_component::<SoundComponent>(entity) || world.has_component::<MusicComponent>(entity)
    }

    fn process(&mut self, world: &World, batch: &mut dyn Batch, entity: Entity) {
        let icon = if world.has_component::<MusicComponent>(entity) { IconKind::Music } else { IconKind::Sound };
        draw_bounds(world, batch, entity, DrawKind::Icon(icon));
    }
}
