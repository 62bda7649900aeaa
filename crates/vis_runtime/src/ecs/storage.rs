//! Typed component storage
//!
//! Each component type gets one sparse table keyed by entity handle. The world
//! keeps the tables behind [`ErasedStorage`] so it can remove, clone and move
//! components without knowing their concrete types.

use std::any::{Any, TypeId};

use slotmap::SecondaryMap;

use super::{Component, EcsError, Entity, World};

/// Sparse table holding every component of type `T`
pub struct ComponentStorage<T: Component> {
    components: SecondaryMap<Entity, T>,
}

impl<T: Component> ComponentStorage<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self { components: SecondaryMap::new() }
    }

    /// Insert or replace the component of `entity`
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        self.components.insert(entity, component)
    }

    /// Remove the component of `entity`
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.components.remove(entity)
    }

    /// Get the component of `entity`
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.components.get(entity)
    }

    /// Get the component of `entity` mutably
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.components.get_mut(entity)
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentStorage`]
pub trait ErasedStorage: Send + Sync {
    /// Drop the component of `entity`, if any
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Check whether `entity` has a component in this table
    fn contains(&self, entity: Entity) -> bool;

    /// Clone the component of `entity` into a box
    fn clone_boxed(&self, entity: Entity) -> Option<Box<dyn ErasedComponent>>;

    /// Move the component of `entity` out into a box
    fn take_boxed(&mut self, entity: Entity) -> Option<Box<dyn ErasedComponent>>;

    /// Downcast support
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStorage for ComponentStorage<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.components.remove(entity).is_some()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.components.contains_key(entity)
    }

    fn clone_boxed(&self, entity: Entity) -> Option<Box<dyn ErasedComponent>> {
        self.components
            .get(entity)
            .map(|component| Box::new(component.clone()) as Box<dyn ErasedComponent>)
    }

    fn take_boxed(&mut self, entity: Entity) -> Option<Box<dyn ErasedComponent>> {
        self.components
            .remove(entity)
            .map(|component| Box::new(component) as Box<dyn ErasedComponent>)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A single boxed component of unknown type
pub trait ErasedComponent: Send + Sync {
    /// Clone into a new box
    fn clone_boxed(&self) -> Box<dyn ErasedComponent>;

    /// Attach a clone of this component to `entity`
    fn insert_clone_into(&self, world: &mut World, entity: Entity) -> Result<(), EcsError>;

    /// Attach this component to `entity`, consuming the box
    fn insert_into(self: Box<Self>, world: &mut World, entity: Entity) -> Result<(), EcsError>;

    /// Type id of the concrete component
    fn component_type(&self) -> TypeId;

    /// Downcast support
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedComponent for T {
    fn clone_boxed(&self) -> Box<dyn ErasedComponent> {
        Box::new(self.clone())
    }

    fn insert_clone_into(&self, world: &mut World, entity: Entity) -> Result<(), EcsError> {
        world.add_component(entity, self.clone())
    }

    fn insert_into(self: Box<Self>, world: &mut World, entity: Entity) -> Result<(), EcsError> {
        world.add_component(entity, *self)
    }

    fn component_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::PositionComponent;

    #[test]
    fn test_insert_and_remove() {
        let mut world = World::new();
        let entity = world.create_entity();

        let mut storage = ComponentStorage::<PositionComponent>::new();
        assert!(storage.is_empty());

        storage.insert(entity, PositionComponent::new(1.0, 2.0));
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get(entity), Some(&PositionComponent::new(1.0, 2.0)));

        assert!(storage.remove_entity(entity));
        assert!(!storage.contains(entity));
    }

    #[test]
    fn test_boxed_component_round_trip() {
        let mut world = World::new();
        let source = world.create_entity();
        let target = world.create_entity();

        let mut storage = ComponentStorage::<PositionComponent>::new();
        storage.insert(source, PositionComponent::new(3.0, 4.0));

        let boxed = storage.clone_boxed(source).unwrap();
        assert_eq!(boxed.component_type(), TypeId::of::<PositionComponent>());

        boxed.insert_into(&mut world, target).unwrap();
        assert_eq!(
            world.get_component::<PositionComponent>(target),
            Some(&PositionComponent::new(3.0, 4.0))
        );
    }
}
