//! Component trait and component set queries

use super::{Entity, World};

/// Marker trait for components
///
/// Components are cloneable so entities can be captured as prototypes for
/// the clipboard and for undoable removal.
pub trait Component: Clone + Send + Sync + 'static {}

/// A set of component types an entity must carry to match a query
///
/// Implemented for tuples of up to four components:
/// `world.query::<(SpriteComponent, AssetComponent)>()`.
pub trait ComponentSet {
    /// Check whether `entity` carries every component of the set
    fn matches(world: &World, entity: Entity) -> bool;
}

macro_rules! impl_component_set {
    ($($component:ident),+) => {
        impl<$($component: Component),+> ComponentSet for ($($component,)+) {
            fn matches(world: &World, entity: Entity) -> bool {
                true $(&& world.has_component::<$component>(entity))+
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
