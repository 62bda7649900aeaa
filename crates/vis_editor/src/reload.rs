//! Asset reloading
//!
//! When asset files change on disk the host refreshes its caches and sends a
//! reload event. The sweeps below then re-resolve every reference held by the
//! scene's components. A reference that fails to resolve is logged and
//! counted; the sweep carries on with the next entity.

use bitflags::bitflags;
use vis_runtime::prelude::{
    AssetComponent, AssetDescriptor, AssetError, Entity, FontCache, ParticleCache, ParticleComponent,
    ShaderCache, ShaderComponent, SpriteComponent, TextComponent, TextureCache, World,
};

bitflags! {
    /// Font families affected by a font reload
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FontKinds: u8 {
        /// Bitmap fonts
        const BITMAP = 1 << 0;
        /// TrueType fonts
        const TTF = 1 << 1;
    }
}

impl FontKinds {
    /// Check whether `asset` is a font of one of the selected families
    pub fn matches(self, asset: &AssetDescriptor) -> bool {
        match asset {
            AssetDescriptor::BmpFont { .. } => self.contains(Self::BITMAP),
            AssetDescriptor::TtfFont { .. } => self.contains(Self::TTF),
            _ => false,
        }
    }
}

/// Outcome of one reload sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// References resolved again
    pub reloaded: usize,
    /// References that failed to resolve
    pub failed: usize,
}

impl ReloadReport {
    fn record<T>(&mut self, what: &str, entity: Entity, result: Result<T, AssetError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.reloaded += 1;
                Some(value)
            }
            Err(error) => {
                log::warn!("Failed to reload {what} of {entity:?}: {error}");
                self.failed += 1;
                None
            }
        }
    }

    fn log(self, what: &str) -> Self {
        log::info!("Reloaded {} {what}, {} failed", self.reloaded, self.failed);
        self
    }
}

/// Re-resolve the texture region of every sprite
pub fn reload_textures(world: &mut World, cache: &dyn TextureCache) -> ReloadReport {
    let mut report = ReloadReport::default();
    for entity in world.entities_with::<SpriteComponent>() {
        let result = world
            .get_component::<AssetComponent>(entity)
            .ok_or(AssetError::MissingAsset)
            .and_then(|component| cache.region(&component.asset));

        if let Some(region) = report.record("texture", entity, result) {
            if let Some(sprite) = world.get_component_mut::<SpriteComponent>(entity) {
                sprite.set_region(region);
            }
        }
    }
    report.log("textures")
}

/// Re-resolve the effect of every particle entity
pub fn reload_particles(world: &mut World, cache: &dyn ParticleCache, pixels_per_unit: f32) -> ReloadReport {
    let mut report = ReloadReport::default();
    for entity in world.entities_with::<ParticleComponent>() {
        let result = world
            .get_component::<AssetComponent>(entity)
            .ok_or(AssetError::MissingAsset)
            .and_then(|component| cache.effect(&component.asset, 1.0 / pixels_per_unit));

        if let Some(effect) = report.record("particle effect", entity, result) {
            if let Some(particle) = world.get_component_mut::<ParticleComponent>(entity) {
                particle.effect = effect;
            }
        }
    }
    report.log("particle effects")
}

/// Re-resolve the font of every text entity using one of `kinds`
pub fn reload_fonts(
    world: &mut World,
    cache: &dyn FontCache,
    pixels_per_unit: f32,
    kinds: FontKinds,
) -> ReloadReport {
    let mut report = ReloadReport::default();
    let affected: Vec<(Entity, AssetDescriptor)> = world
        .iter::<TextComponent>()
        .filter(|(_, text)| kinds.matches(&text.font.asset))
        .map(|(entity, text)| (entity, text.font.asset.clone()))
        .collect();

    for (entity, asset) in affected {
        if let Some(font) = report.record("font", entity, cache.font(&asset, pixels_per_unit)) {
            if let Some(text) = world.get_component_mut::<TextComponent>(entity) {
                text.font = font;
            }
        }
    }
    report.log("fonts")
}

/// Recompile every shader attached to an entity
pub fn reload_shaders(world: &mut World, cache: &dyn ShaderCache) -> ReloadReport {
    let mut report = ReloadReport::default();
    let affected: Vec<(Entity, AssetDescriptor)> = world
        .iter::<ShaderComponent>()
        .map(|(entity, shader)| (entity, shader.asset.clone()))
        .collect();

    for (entity, asset) in affected {
        if let Some(handle) = report.record("shader", entity, cache.shader(&asset)) {
            if let Some(shader) = world.get_component_mut::<ShaderComponent>(entity) {
                shader.shader = Some(handle);
            }
        }
    }
    report.log("shaders")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vis_runtime::prelude::{MemoryAssets, PositionComponent};

    fn sprite(world: &mut World, assets: &MemoryAssets, asset: &AssetDescriptor) -> Entity {
        let entity = world.create_entity();
        world.add_component(entity, PositionComponent::default()).unwrap();
        world.add_component(entity, AssetComponent::new(asset.clone())).unwrap();
        world.add_component(entity, SpriteComponent::new(assets.region(asset).unwrap(), 100.0)).unwrap();
        entity
    }

    #[test]
    fn test_texture_reload_counts_failures() {
        let mut assets = MemoryAssets::new();
        let tree = assets.add_texture("gfx/tree", 10.0, 10.0);
        let rock = assets.add_texture("gfx/rock", 10.0, 10.0);

        let mut world = World::new();
        let tree_entity = sprite(&mut world, &assets, &tree);
        let rock_entity = sprite(&mut world, &assets, &rock);
        world.remove_component::<AssetComponent>(rock_entity);

        assets.reload(&tree);
        let report = reload_textures(&mut world, &assets);
        assert_eq!(report, ReloadReport { reloaded: 1, failed: 1 });
        assert_eq!(world.get_component::<SpriteComponent>(tree_entity).unwrap().region.generation, 1);
    }

    #[test]
    fn test_font_reload_filters_kinds() {
        let mut assets = MemoryAssets::new();
        let bitmap = assets.add_font(AssetDescriptor::BmpFont { path: "font/pixel.fnt".into() }, 8.0);
        let ttf = assets.add_font(AssetDescriptor::TtfFont { path: "font/sans.ttf".into(), size: 16 }, 16.0);

        let mut world = World::new();
        let a = world.create_entity();
        world.add_component(a, TextComponent::new(assets.font(&bitmap, 100.0).unwrap(), "a")).unwrap();
        let b = world.create_entity();
        world.add_component(b, TextComponent::new(assets.font(&ttf, 100.0).unwrap(), "b")).unwrap();

        assets.reload(&bitmap);
        assets.reload(&ttf);
        let report = reload_fonts(&mut world, &assets, 100.0, FontKinds::TTF);
        assert_eq!(report.reloaded, 1);
        assert_eq!(world.get_component::<TextComponent>(a).unwrap().font.generation, 0);
        assert_eq!(world.get_component::<TextComponent>(b).unwrap().font.generation, 1);

        assert!(FontKinds::all().matches(&bitmap));
        assert!(!FontKinds::BITMAP.matches(&ttf));
    }

    #[test]
    fn test_shader_reload() {
        let mut assets = MemoryAssets::new();
        let outline = assets.add_shader("outline.vert", "outline.frag");

        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, ShaderComponent { asset: outline.clone(), shader: None }).unwrap();
        let missing = world.create_entity();
        let gone = AssetDescriptor::Shader { vertex: "a.vert".into(), fragment: "a.frag".into() };
        world.add_component(missing, ShaderComponent { asset: gone, shader: None }).unwrap();

        assets.reload(&outline);
        let report = reload_shaders(&mut world, &assets);
        assert_eq!(report, ReloadReport { reloaded: 1, failed: 1 });
        let shader = world.get_component::<ShaderComponent>(entity).unwrap();
        assert_eq!(shader.shader.as_ref().map(|handle| handle.generation), Some(1));
    }
}
