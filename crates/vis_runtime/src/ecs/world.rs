//! ECS World implementation

use std::any::TypeId;
use std::collections::HashMap;

use slotmap::SlotMap;

use super::prototype::EntityPrototype;
use super::storage::{ComponentStorage, ErasedStorage};
use super::{Component, ComponentSet, EcsError, Entity};

/// Lifecycle state of an allocated entity slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityState {
    /// Visible to queries
    Alive,
    /// Components moved out, handle kept reserved so it can be re-attached
    Detached,
}

/// Entities added and removed since the last [`World::flush_changes`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Entities that became alive (created or re-attached)
    pub added: Vec<Entity>,
    /// Entities that stopped being alive (destroyed or detached)
    pub removed: Vec<Entity>,
}

impl ChangeSet {
    /// Check if nothing changed
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Subscriber to entity insertion and removal
///
/// Observers are driven by whoever owns the world, with the entities of a
/// [`ChangeSet`]. Removed entities are no longer alive when delivered.
pub trait WorldObserver {
    /// Error raised while reacting to a change
    type Error;

    /// Entities became alive
    fn entities_added(&mut self, world: &mut World, entities: &[Entity]) -> Result<(), Self::Error> {
        let _ = (world, entities);
        Ok(())
    }

    /// Entities stopped being alive
    fn entities_removed(&mut self, world: &mut World, entities: &[Entity]) -> Result<(), Self::Error> {
        let _ = (world, entities);
        Ok(())
    }
}

/// ECS World containing all entities and components
pub struct World {
    entities: SlotMap<Entity, EntityState>,
    component_storages: HashMap<TypeId, Box<dyn ErasedStorage>>,
    pending: ChangeSet,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            component_storages: HashMap::new(),
            pending: ChangeSet::default(),
        }
    }

    /// Create a new entity
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.insert(EntityState::Alive);
        self.pending.added.push(entity);
        entity
    }

    /// Destroy an entity and all of its components
    ///
    /// Detached entities can be destroyed as well, which releases their slot.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        let state = self.entities.remove(entity).ok_or(EcsError::StaleEntity(entity))?;
        if state == EntityState::Alive {
            for storage in self.component_storages.values_mut() {
                storage.remove_entity(entity);
            }
            self.record_removed(entity);
        }
        Ok(())
    }

    /// Move every component of an entity out into a prototype
    ///
    /// The handle stays reserved: [`World::attach_entity`] brings the entity back
    /// under the same handle. Used by undoable removal.
    pub fn detach_entity(&mut self, entity: Entity) -> Result<EntityPrototype, EcsError> {
        self.ensure_alive(entity)?;

        let components = self
            .component_storages
            .values_mut()
            .filter_map(|storage| storage.take_boxed(entity))
            .collect();

        self.entities[entity] = EntityState::Detached;
        self.record_removed(entity);
        Ok(EntityPrototype::from_components(components))
    }

    /// Bring a detached entity back with the components of `prototype`
    pub fn attach_entity(&mut self, entity: Entity, prototype: &EntityPrototype) -> Result<(), EcsError> {
        match self.entities.get(entity) {
            Some(EntityState::Detached) => {}
            Some(EntityState::Alive) => return Err(EcsError::NotDetached(entity)),
            None => return Err(EcsError::StaleEntity(entity)),
        }

        self.entities[entity] = EntityState::Alive;
        prototype.apply_to(self, entity)?;
        self.pending.added.push(entity);
        Ok(())
    }

    /// Check whether the handle refers to a live entity
    pub fn is_alive(&self, entity: Entity) -> bool {
        matches!(self.entities.get(entity), Some(EntityState::Alive))
    }

    /// Return an error for handles that are not alive
    pub fn ensure_alive(&self, entity: Entity) -> Result<(), EcsError> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::StaleEntity(entity))
        }
    }

    /// Add a component to an entity, replacing any previous one of the same type
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        self.storage_mut::<T>().insert(entity, component);
        Ok(())
    }

    /// Remove a component from an entity
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()?
            .remove(entity)
    }

    /// Get a component from an entity
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Get a mutable component from an entity
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()?
            .get_mut(entity)
    }

    /// Get a component, or an error naming the missing component type
    pub fn require_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.ensure_alive(entity)?;
        self.get_component::<T>(entity).ok_or(EcsError::MissingComponent {
            entity,
            component: short_type_name::<T>(),
        })
    }

    /// Check whether an entity has a component of type `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.component_storages
            .get(&TypeId::of::<T>())
            .is_some_and(|storage| storage.contains(entity))
    }

    /// Get an iterator over all live entities, in slot order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities
            .iter()
            .filter(|(_, state)| **state == EntityState::Alive)
            .map(|(entity, _)| entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities().count()
    }

    /// All live entities carrying a component of type `T`
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.entities().filter(|entity| self.has_component::<T>(*entity)).collect()
    }

    /// All live entities carrying every component of the set `S`
    pub fn query<S: ComponentSet>(&self) -> Vec<Entity> {
        self.entities().filter(|entity| S::matches(self, *entity)).collect()
    }

    /// Iterate over every live entity with a component of type `T`
    pub fn iter<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        let storage = self.storage::<T>();
        self.entities()
            .filter_map(move |entity| storage.and_then(|s| s.get(entity)).map(|component| (entity, component)))
    }

    /// Take the entities added and removed since the previous flush
    pub fn flush_changes(&mut self) -> ChangeSet {
        let mut changes = std::mem::take(&mut self.pending);
        changes.added.retain(|entity| self.is_alive(*entity));
        changes
    }

    /// Clone every component of a live entity into a prototype
    pub(crate) fn boxed_components(
        &self,
        entity: Entity,
    ) -> Result<Vec<Box<dyn super::storage::ErasedComponent>>, EcsError> {
        self.ensure_alive(entity)?;
        Ok(self
            .component_storages
            .values()
            .filter_map(|storage| storage.clone_boxed(entity))
            .collect())
    }

    fn record_removed(&mut self, entity: Entity) {
        // an entity that was created and removed between two flushes was never observed
        if let Some(index) = self.pending.added.iter().position(|added| *added == entity) {
            self.pending.added.remove(index);
        } else {
            self.pending.removed.push(entity);
        }
    }

    fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.component_storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<ComponentStorage<T>>()
    }

    fn storage_mut<T: Component>(&mut self) -> &mut ComponentStorage<T> {
        self.component_storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()))
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
            .unwrap_or_else(|| unreachable!("component table registered under a foreign TypeId"))
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Type name without its module path, for error messages
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
