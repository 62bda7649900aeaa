//! Entity-Component-System implementation
//!
//! Entities are versioned handles allocated from an arena; components live in
//! typed sparse tables keyed by those handles.

pub mod entity;
pub mod component;
pub mod storage;
pub mod prototype;
pub mod world;
pub mod components;
pub mod systems;

pub use entity::Entity;
pub use component::{Component, ComponentSet};
pub use prototype::EntityPrototype;
pub use world::{ChangeSet, World, WorldObserver};

/// Errors raised by the component store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// The handle refers to an entity that was destroyed or detached
    #[error("Entity {0:?} is not alive")]
    StaleEntity(Entity),

    /// The entity is missing a component an operation depends on
    #[error("Entity {entity:?} has no {component}")]
    MissingComponent {
        /// Entity that was inspected
        entity: Entity,
        /// Name of the missing component type
        component: &'static str,
    },

    /// Attempted to re-attach an entity that is not detached
    #[error("Entity {0:?} is not detached")]
    NotDetached(Entity),
}
