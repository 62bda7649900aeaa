//! Prototype inflaters
//!
//! Scenes store serializable prototype components. When an entity is added to
//! the world the inflaters resolve the referenced asset and swap the prototype
//! for its live counterpart. Inflaters borrow their cache, so they are built
//! for the duration of one change notification.

use crate::assets::{AssetError, ParticleCache, ShaderCache};
use crate::ecs::components::{
    AssetComponent, ParticleComponent, ParticleProtoComponent, ShaderComponent, ShaderProtoComponent,
};
use crate::ecs::{Entity, World, WorldObserver};

/// Inflates [`ShaderProtoComponent`] into [`ShaderComponent`]
pub struct ShaderInflater<'a> {
    cache: &'a dyn ShaderCache,
}

impl<'a> ShaderInflater<'a> {
    /// Create an inflater resolving through `cache`
    pub fn new(cache: &'a dyn ShaderCache) -> Self {
        Self { cache }
    }
}

impl WorldObserver for ShaderInflater<'_> {
    type Error = AssetError;

    fn entities_added(&mut self, world: &mut World, entities: &[Entity]) -> Result<(), AssetError> {
        for &entity in entities {
            let Some(proto) = world.get_component::<ShaderProtoComponent>(entity).cloned() else {
                continue;
            };
            // a prototype without asset stands for the default shader
            let live = match proto.asset {
                Some(asset) => {
                    let shader = self.cache.shader(&asset)?;
                    Some(ShaderComponent { asset, shader: Some(shader) })
                }
                None => None,
            };

            world.remove_component::<ShaderProtoComponent>(entity);
            if let Some(live) = live {
                world.add_component(entity, live)?;
            }
        }
        Ok(())
    }
}

/// Inflates [`ParticleProtoComponent`] into [`ParticleComponent`]
pub struct ParticleInflater<'a> {
    cache: &'a dyn ParticleCache,
    pixels_per_unit: f32,
    remove_asset_component: bool,
}

impl<'a> ParticleInflater<'a> {
    /// Create an inflater resolving through `cache`
    pub fn new(cache: &'a dyn ParticleCache, pixels_per_unit: f32) -> Self {
        Self { cache, pixels_per_unit, remove_asset_component: false }
    }

    /// Drop the asset component once inflated, for scenes that are not edited
    #[must_use]
    pub fn removing_asset_component(mut self) -> Self {
        self.remove_asset_component = true;
        self
    }
}

impl WorldObserver for ParticleInflater<'_> {
    type Error = AssetError;

    fn entities_added(&mut self, world: &mut World, entities: &[Entity]) -> Result<(), AssetError> {
        for &entity in entities {
            let Some(proto) = world.get_component::<ParticleProtoComponent>(entity).copied() else {
                continue;
            };
            let asset = world
                .get_component::<AssetComponent>(entity)
                .map(|component| component.asset.clone())
                .ok_or(AssetError::MissingAsset)?;

            let effect = self.cache.effect(&asset, 1.0 / self.pixels_per_unit)?;

            world.remove_component::<ParticleProtoComponent>(entity);
            if self.remove_asset_component {
                world.remove_component::<AssetComponent>(entity);
            }
            world.add_component(entity, ParticleComponent { effect, active_on_start: proto.active_on_start })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetDescriptor, MemoryAssets};
    use crate::foundation::math::Rect;
    use approx::assert_relative_eq;

    #[test]
    fn test_shader_inflation() {
        let mut assets = MemoryAssets::new();
        let outline = assets.add_shader("outline.vert", "outline.frag");

        let mut world = World::new();
        let custom = world.create_entity();
        world.add_component(custom, ShaderProtoComponent { asset: Some(outline.clone()) }).unwrap();
        let default = world.create_entity();
        world.add_component(default, ShaderProtoComponent { asset: None }).unwrap();

        let changes = world.flush_changes();
        ShaderInflater::new(&assets).entities_added(&mut world, &changes.added).unwrap();

        let shader = world.get_component::<ShaderComponent>(custom).unwrap();
        assert_eq!(shader.asset, outline);
        assert_eq!(shader.shader.as_ref().unwrap().name, "outline.frag");
        assert!(!world.has_component::<ShaderProtoComponent>(custom));
        assert!(!world.has_component::<ShaderComponent>(default));
        assert!(!world.has_component::<ShaderProtoComponent>(default));
    }

    #[test]
    fn test_particle_inflation_scales_effect() {
        let mut assets = MemoryAssets::new();
        let fire = assets.add_particle("particle/fire.p", Rect::new(-50.0, 0.0, 100.0, 200.0));

        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, AssetComponent::new(fire)).unwrap();
        world.add_component(entity, ParticleProtoComponent::new(true)).unwrap();

        let changes = world.flush_changes();
        ParticleInflater::new(&assets, 100.0)
            .removing_asset_component()
            .entities_added(&mut world, &changes.added)
            .unwrap();

        let particle = world.get_component::<ParticleComponent>(entity).unwrap();
        assert!(particle.active_on_start);
        assert_relative_eq!(particle.effect.bounds.width, 1.0);
        assert_relative_eq!(particle.effect.bounds.x, -0.5);
        assert!(!world.has_component::<AssetComponent>(entity));
    }

    #[test]
    fn test_missing_particle_asset_keeps_prototype() {
        let assets = MemoryAssets::new();
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, AssetComponent::new(AssetDescriptor::path("particle/none.p"))).unwrap();
        world.add_component(entity, ParticleProtoComponent::default()).unwrap();

        let changes = world.flush_changes();
        let result = ParticleInflater::new(&assets, 100.0).entities_added(&mut world, &changes.added);
        assert!(matches!(result, Err(AssetError::NotFound(_))));
        assert!(world.has_component::<ParticleProtoComponent>(entity));
    }
}
