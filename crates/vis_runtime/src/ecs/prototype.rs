//! Entity prototypes
//!
//! A prototype is a detached bag of components. It is how the clipboard holds
//! copied entities and how undoable removal keeps a removed entity around.

use std::any::TypeId;

use super::storage::ErasedComponent;
use super::{Component, EcsError, Entity, World};

/// Detached component set that can be instantiated into a world
#[derive(Default)]
pub struct EntityPrototype {
    components: Vec<Box<dyn ErasedComponent>>,
}

impl EntityPrototype {
    /// Create an empty prototype
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_components(components: Vec<Box<dyn ErasedComponent>>) -> Self {
        Self { components }
    }

    /// Clone every component of a live entity
    pub fn capture(world: &World, entity: Entity) -> Result<Self, EcsError> {
        Ok(Self::from_components(world.boxed_components(entity)?))
    }

    /// Builder-style insertion
    #[must_use]
    pub fn with<T: Component>(mut self, component: T) -> Self {
        self.insert(component);
        self
    }

    /// Insert or replace a component
    pub fn insert<T: Component>(&mut self, component: T) {
        self.remove::<T>();
        self.components.push(Box::new(component));
    }

    /// Remove a component
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        let index = self.position::<T>()?;
        let mut boxed = self.components.swap_remove(index);
        boxed.as_any_mut().downcast_mut::<T>().map(|component| component.clone())
    }

    /// Get a component
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components.iter().find_map(|component| component.as_any().downcast_ref::<T>())
    }

    /// Get a component mutably
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find_map(|component| component.as_any_mut().downcast_mut::<T>())
    }

    /// Check for a component of type `T`
    pub fn has<T: Component>(&self) -> bool {
        self.position::<T>().is_some()
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if the prototype has no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Create a new entity carrying clones of every component
    pub fn build(&self, world: &mut World) -> Result<Entity, EcsError> {
        let entity = world.create_entity();
        self.apply_to(world, entity)?;
        Ok(entity)
    }

    /// Attach clones of every component to an existing entity
    pub fn apply_to(&self, world: &mut World, entity: Entity) -> Result<(), EcsError> {
        for component in &self.components {
            component.insert_clone_into(world, entity)?;
        }
        Ok(())
    }

    fn position<T: Component>(&self) -> Option<usize> {
        self.components
            .iter()
            .position(|component| component.component_type() == TypeId::of::<T>())
    }
}

impl Clone for EntityPrototype {
    fn clone(&self) -> Self {
        Self {
            components: self.components.iter().map(|component| component.clone_boxed()).collect(),
        }
    }
}

impl std::fmt::Debug for EntityPrototype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityPrototype").field("components", &self.components.len()).finish()
    }
}
