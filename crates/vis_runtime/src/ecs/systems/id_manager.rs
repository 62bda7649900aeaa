//! String id lookup
//!
//! Entities can be given a string id in the editor. The id manager keeps an
//! index from id to entities, maintained from world change notifications.

use std::collections::HashMap;

use thiserror::Error;

use crate::ecs::components::IdComponent;
use crate::ecs::{Entity, World, WorldObserver};

/// Errors raised by id lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// No live entity carries the id
    #[error("Could not find any entity with id '{0}'")]
    UnknownId(String),
}

/// Index of entities by [`IdComponent`]
#[derive(Debug, Default)]
pub struct IdManager {
    by_id: HashMap<String, Vec<Entity>>,
    by_entity: HashMap<Entity, String>,
}

impl IdManager {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// First entity registered with `id`
    pub fn get(&self, id: &str) -> Result<Entity, IdError> {
        Ok(self.get_multiple(id)?[0])
    }

    /// Every entity registered with `id`, in registration order
    pub fn get_multiple(&self, id: &str) -> Result<&[Entity], IdError> {
        self.by_id
            .get(id)
            .map(Vec::as_slice)
            .ok_or_else(|| IdError::UnknownId(id.to_owned()))
    }

    /// Re-read the id of an entity after its component was edited
    pub fn refresh(&mut self, world: &World, entity: Entity) {
        self.forget(entity);
        self.index(world, entity);
    }

    fn index(&mut self, world: &World, entity: Entity) {
        if let Some(component) = world.get_component::<IdComponent>(entity) {
            self.by_id.entry(component.id.clone()).or_default().push(entity);
            self.by_entity.insert(entity, component.id.clone());
        }
    }

    fn forget(&mut self, entity: Entity) {
        let Some(id) = self.by_entity.remove(&entity) else {
            return;
        };
        if let Some(entities) = self.by_id.get_mut(&id) {
            entities.retain(|other| *other != entity);
            if entities.is_empty() {
                self.by_id.remove(&id);
            }
        }
    }
}

impl WorldObserver for IdManager {
    type Error = IdError;

    fn entities_added(&mut self, world: &mut World, entities: &[Entity]) -> Result<(), IdError> {
        for &entity in entities {
            self.index(world, entity);
        }
        Ok(())
    }

    fn entities_removed(&mut self, _world: &mut World, entities: &[Entity]) -> Result<(), IdError> {
        for &entity in entities {
            self.forget(entity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(world: &mut World, id: &str) -> Entity {
        let entity = world.create_entity();
        world.add_component(entity, IdComponent::new(id)).unwrap();
        entity
    }

    #[test]
    fn test_lookup_by_id() {
        let mut world = World::new();
        let player = tagged(&mut world, "player");
        let coin_a = tagged(&mut world, "coin");
        let coin_b = tagged(&mut world, "coin");
        world.create_entity();

        let mut ids = IdManager::new();
        let changes = world.flush_changes();
        ids.entities_added(&mut world, &changes.added).unwrap();

        assert_eq!(ids.get("player"), Ok(player));
        assert_eq!(ids.get_multiple("coin").unwrap(), &[coin_a, coin_b]);
        assert_eq!(ids.get("enemy"), Err(IdError::UnknownId("enemy".into())));
    }

    #[test]
    fn test_removed_entities_are_forgotten() {
        let mut world = World::new();
        let player = tagged(&mut world, "player");
        let mut ids = IdManager::new();
        let changes = world.flush_changes();
        ids.entities_added(&mut world, &changes.added).unwrap();

        world.destroy_entity(player).unwrap();
        let changes = world.flush_changes();
        ids.entities_removed(&mut world, &changes.removed).unwrap();
        assert!(ids.get("player").is_err());
    }

    #[test]
    fn test_refresh_after_rename() {
        let mut world = World::new();
        let entity = tagged(&mut world, "old");
        let mut ids = IdManager::new();
        ids.refresh(&world, entity);

        world.get_component_mut::<IdComponent>(entity).unwrap().id = "new".into();
        ids.refresh(&world, entity);
        assert!(ids.get("old").is_err());
        assert_eq!(ids.get("new"), Ok(entity));
    }
}
