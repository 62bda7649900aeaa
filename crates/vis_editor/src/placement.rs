//! Creating entities from assets dropped on the scene

use vis_runtime::prelude::{
    entity_bounds, AssetComponent, AssetDescriptor, Entity, EntityPrototype, FontCache, GroupComponent,
    InvisibleComponent, LayerComponent, MusicComponent, ParticleCache, ParticleComponent, PositionComponent,
    RenderableComponent, SoundComponent, SpriteComponent, TextComponent, TextureCache,
};

use crate::context::{EditContext, EditorAssets};
use crate::error::EditorResult;
use crate::selection::{SelectionManager, LAYER_LOCKED};
use crate::undo::EntitiesAddedAction;

/// Text shown by newly dropped text entities
pub const DEFAULT_TEXT: &str = "Text";

/// Kind of entity an asset turns into when dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    /// Texture region
    Sprite,
    /// Bitmap or TrueType font
    Text,
    /// File under `sound/`
    Sound,
    /// File under `music/`
    Music,
    /// File under `particle/`
    Particle,
}

impl DropKind {
    /// Entity kind for `asset`, `None` when it cannot be dropped
    pub fn of(asset: &AssetDescriptor) -> Option<Self> {
        match asset {
            AssetDescriptor::Texture { .. } => Some(Self::Sprite),
            AssetDescriptor::BmpFont { .. } | AssetDescriptor::TtfFont { .. } => Some(Self::Text),
            AssetDescriptor::Path(path) if path.starts_with("sound/") => Some(Self::Sound),
            AssetDescriptor::Path(path) if path.starts_with("music/") => Some(Self::Music),
            AssetDescriptor::Path(path) if path.starts_with("particle/") => Some(Self::Particle),
            AssetDescriptor::Path(_) | AssetDescriptor::Shader { .. } => None,
        }
    }
}

fn drop_prototype(
    kind: DropKind,
    asset: &AssetDescriptor,
    assets: &dyn EditorAssets,
    pixels_per_unit: f32,
) -> EditorResult<EntityPrototype> {
    let prototype = EntityPrototype::new().with(AssetComponent::new(asset.clone()));
    Ok(match kind {
        DropKind::Sprite => prototype.with(SpriteComponent::new(assets.region(asset)?, pixels_per_unit)),
        DropKind::Text => prototype.with(TextComponent::new(assets.font(asset, pixels_per_unit)?, DEFAULT_TEXT)),
        DropKind::Sound => prototype.with(SoundComponent::default()),
        DropKind::Music => prototype.with(MusicComponent::default()),
        DropKind::Particle => prototype.with(ParticleComponent {
            effect: assets.effect(asset, 1.0 / pixels_per_unit)?,
            active_on_start: true,
        }),
    })
}

impl SelectionManager {
    /// Create an entity for an asset dropped at `(x, y)`
    ///
    /// The entity lands on the active layer inside the current group context,
    /// centred on the cursor. Returns `None` when nothing was created.
    pub fn process_drop(
        &mut self,
        ctx: &mut EditContext<'_>,
        assets: &dyn EditorAssets,
        asset: &AssetDescriptor,
        x: f32,
        y: f32,
    ) -> EditorResult<Option<Entity>> {
        let layer = ctx.scene.active_layer()?;
        if layer.locked {
            ctx.status.set_text(LAYER_LOCKED);
            return Ok(None);
        }
        let (layer_id, visible) = (layer.id, layer.visible);

        let Some(kind) = DropKind::of(asset) else {
            log::debug!("Ignoring drop of {asset}");
            return Ok(None);
        };

        let mut prototype = drop_prototype(kind, asset, assets, ctx.scene.pixels_per_unit)?
            .with(PositionComponent::default())
            .with(RenderableComponent::new(0))
            .with(LayerComponent::new(layer_id));
        if !visible {
            prototype.insert(InvisibleComponent);
        }

        let chain: Vec<_> = self.breadcrumb.hierarchy().iter().rev().copied().collect();
        if !chain.is_empty() {
            prototype.insert(GroupComponent::from_ids(chain));
        }

        let entity = prototype.build(ctx.world)?;
        let bounds = entity_bounds(ctx.world, entity)?;
        ctx.world
            .add_component(entity, PositionComponent::new(x - bounds.width / 2.0, y - bounds.height / 2.0))?;

        log::info!("Dropped {asset} at ({x}, {y})");
        ctx.undo.add(ctx.world, Box::new(EntitiesAddedAction::new(vec![entity])));
        ctx.scene.mark_dirty();
        Ok(Some(entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SceneContext;
    use approx::assert_relative_eq;
    use vis_runtime::prelude::{GroupId, Rect};

    #[test]
    fn test_drop_kinds() {
        assert_eq!(DropKind::of(&AssetDescriptor::texture("gfx/tree")), Some(DropKind::Sprite));
        assert_eq!(DropKind::of(&AssetDescriptor::path("sound/jump.wav")), Some(DropKind::Sound));
        assert_eq!(DropKind::of(&AssetDescriptor::path("music/theme.ogg")), Some(DropKind::Music));
        assert_eq!(DropKind::of(&AssetDescriptor::path("particle/fire.p")), Some(DropKind::Particle));
        assert_eq!(DropKind::of(&AssetDescriptor::path("scene/level.json")), None);
    }

    #[test]
    fn test_drop_sprite_centred() {
        let mut scene = SceneContext::headless(&["Default"]);
        let tree = scene.assets.add_texture("gfx/tree", 200.0, 100.0);

        let entity = scene.process_drop(&tree, 5.0, 5.0).unwrap().unwrap();
        let position = scene.world.get_component::<PositionComponent>(entity).unwrap();
        // 100 pixels per unit
        assert_relative_eq!(position.x, 4.0);
        assert_relative_eq!(position.y, 4.5);
        assert_eq!(scene.world.get_component::<LayerComponent>(entity), Some(&LayerComponent::new(0)));
        assert!(scene.undo.can_undo());
    }

    #[test]
    fn test_drop_inside_entered_group() {
        let mut scene = SceneContext::headless(&["Default"]);
        let sound = AssetDescriptor::path("sound/jump.wav");
        let first = scene.process_drop(&sound, 0.0, 0.0).unwrap().unwrap();
        let second = scene.process_drop(&sound, 1.0, 0.0).unwrap().unwrap();

        scene.select(crate::proxy::EntityProxy::Single(first)).unwrap();
        scene.select_append(crate::proxy::EntityProxy::Single(second)).unwrap();
        scene.group_selection().unwrap();
        scene.enter_group().unwrap();

        let particle = scene.assets.add_particle("particle/fire.p", Rect::new(-50.0, 0.0, 100.0, 100.0));
        let fire = scene.process_drop(&particle, 0.0, 0.0).unwrap().unwrap();
        let groups: &[GroupId] = &scene.world.get_component::<GroupComponent>(fire).unwrap().group_ids;
        assert_eq!(groups, &[0]);
        assert!(scene.world.has_component::<ParticleComponent>(fire));
    }

    #[test]
    fn test_drop_on_locked_layer() {
        let mut scene = SceneContext::headless(&["Default"]);
        scene.scene.layers.layer_mut(0).unwrap().locked = true;

        let dropped = scene.process_drop(&AssetDescriptor::path("music/theme.ogg"), 0.0, 0.0).unwrap();
        assert_eq!(dropped, None);
        assert_eq!(scene.status.text(), Some("Layer is locked!"));
        assert_eq!(scene.world.entity_count(), 0);
    }

    #[test]
    fn test_drop_missing_texture_fails() {
        let mut scene = SceneContext::headless(&["Default"]);
        let result = scene.process_drop(&AssetDescriptor::texture("gfx/missing"), 0.0, 0.0);
        assert!(result.is_err());
        assert_eq!(scene.world.entity_count(), 0);
    }
}
