//! Entity proxies
//!
//! A proxy is the unit of selection: either one entity or one group. Group
//! proxies hold only the group id and find their members in the world on
//! every access, so a proxy never goes out of sync with the store. Geometry
//! and group queries on a group proxy are answered for the group as a whole.

use vis_runtime::prelude::{
    entity_bounds, EcsError, Entity, GroupComponent, GroupId, LayerComponent, PositionComponent, Rect, World,
};

use crate::error::{EditorError, EditorResult};

/// Selection unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityProxy {
    /// A single entity
    Single(Entity),
    /// Every entity whose group stack contains the id
    Group(GroupId),
}

impl EntityProxy {
    /// Check whether this is a group proxy
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Group id of a group proxy
    pub fn group_id(&self) -> Option<GroupId> {
        match self {
            Self::Single(_) => None,
            Self::Group(gid) => Some(*gid),
        }
    }

    /// Live entities represented by the proxy, in slot order
    pub fn entities(&self, world: &World) -> Vec<Entity> {
        match *self {
            Self::Single(entity) if world.is_alive(entity) => vec![entity],
            Self::Single(_) => Vec::new(),
            Self::Group(gid) => world
                .iter::<GroupComponent>()
                .filter(|(_, groups)| groups.contains(gid))
                .map(|(entity, _)| entity)
                .collect(),
        }
    }

    /// Check whether the proxy still represents at least one entity
    pub fn is_alive(&self, world: &World) -> bool {
        match *self {
            Self::Single(entity) => world.is_alive(entity),
            Self::Group(gid) => world.iter::<GroupComponent>().any(|(_, groups)| groups.contains(gid)),
        }
    }

    /// Entity whose components answer queries for the whole proxy
    fn representative(&self, world: &World) -> EditorResult<Entity> {
        match *self {
            Self::Single(entity) => {
                world.ensure_alive(entity)?;
                Ok(entity)
            }
            Self::Group(gid) => self.entities(world).first().copied().ok_or(EditorError::EmptyGroup(gid)),
        }
    }

    /// Layer of the proxy
    pub fn layer_id(&self, world: &World) -> EditorResult<u32> {
        let entity = self.representative(world)?;
        Ok(world.require_component::<LayerComponent>(entity)?.layer_id)
    }

    /// Group stack of the proxy, innermost first
    ///
    /// For a group proxy this is the part of its members' stack from the
    /// group outwards.
    pub fn group_ids(&self, world: &World) -> EditorResult<Vec<GroupId>> {
        let entity = self.representative(world)?;
        let Some(groups) = world.get_component::<GroupComponent>(entity) else {
            return Ok(Vec::new());
        };
        Ok(match *self {
            Self::Single(_) => groups.group_ids.clone(),
            Self::Group(gid) => groups.ids_from(gid).to_vec(),
        })
    }

    /// Outermost group of the proxy
    pub fn last_group_id(&self, world: &World) -> EditorResult<Option<GroupId>> {
        Ok(self.group_ids(world)?.last().copied())
    }

    /// Group of the proxy nested directly inside `gid`
    pub fn group_id_before(&self, world: &World, gid: GroupId) -> EditorResult<Option<GroupId>> {
        let ids = self.group_ids(world)?;
        Ok(ids
            .iter()
            .position(|id| *id == gid)
            .and_then(|index| index.checked_sub(1))
            .map(|index| ids[index]))
    }

    /// Check whether the proxy lies inside group `gid`
    pub fn groups_contains(&self, world: &World, gid: GroupId) -> EditorResult<bool> {
        Ok(self.group_ids(world)?.contains(&gid))
    }

    /// Bounding rectangle of every represented entity
    pub fn bounds(&self, world: &World) -> EditorResult<Rect> {
        let mut entities = self.entities(world).into_iter();
        let first = entities.next().ok_or_else(|| self.empty_error())?;

        let mut bounds = entity_bounds(world, first)?;
        for entity in entities {
            bounds = bounds.merge(&entity_bounds(world, entity)?);
        }
        Ok(bounds)
    }

    /// Move every represented entity by a delta
    pub fn translate(&self, world: &mut World, dx: f32, dy: f32) {
        for entity in self.entities(world) {
            if let Some(position) = world.get_component_mut::<PositionComponent>(entity) {
                position.translate(dx, dy);
            }
        }
    }

    /// Move the proxy so its bounds start at `(x, y)`
    pub fn set_position(&self, world: &mut World, x: f32, y: f32) -> EditorResult<()> {
        let bounds = self.bounds(world)?;
        self.translate(world, x - bounds.x, y - bounds.y);
        Ok(())
    }

    /// Move every represented entity to another layer
    pub fn set_layer_id(&self, world: &mut World, layer_id: u32) -> EditorResult<()> {
        for entity in self.entities(world) {
            world.add_component(entity, LayerComponent::new(layer_id))?;
        }
        Ok(())
    }

    fn empty_error(&self) -> EditorError {
        match *self {
            Self::Single(entity) => EditorError::Ecs(EcsError::StaleEntity(entity)),
            Self::Group(gid) => EditorError::EmptyGroup(gid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vis_runtime::prelude::SoundComponent;

    fn spawn(world: &mut World, x: f32, y: f32, groups: Vec<GroupId>) -> Entity {
        let entity = world.create_entity();
        world.add_component(entity, PositionComponent::new(x, y)).unwrap();
        world.add_component(entity, LayerComponent::new(0)).unwrap();
        world.add_component(entity, GroupComponent::from_ids(groups)).unwrap();
        entity
    }

    #[test]
    fn test_group_members() {
        let mut world = World::new();
        let a = spawn(&mut world, 0.0, 0.0, vec![0]);
        let b = spawn(&mut world, 1.0, 0.0, vec![1, 0]);
        spawn(&mut world, 2.0, 0.0, vec![]);

        assert_eq!(EntityProxy::Group(0).entities(&world), vec![a, b]);
        assert_eq!(EntityProxy::Group(1).entities(&world), vec![b]);
        assert!(!EntityProxy::Group(7).is_alive(&world));
    }

    #[test]
    fn test_group_ids_of_nested_group() {
        let mut world = World::new();
        let entity = spawn(&mut world, 0.0, 0.0, vec![4, 2, 0]);

        let single = EntityProxy::Single(entity);
        assert_eq!(single.last_group_id(&world).unwrap(), Some(0));
        assert_eq!(single.group_id_before(&world, 0).unwrap(), Some(2));

        let inner = EntityProxy::Group(2);
        assert_eq!(inner.group_ids(&world).unwrap(), vec![2, 0]);
        // the group itself has nothing inside it from its own point of view
        assert_eq!(inner.group_id_before(&world, 2).unwrap(), None);
        assert!(inner.groups_contains(&world, 0).unwrap());
        assert!(!inner.groups_contains(&world, 4).unwrap());
    }

    #[test]
    fn test_group_bounds_and_move() {
        let mut world = World::new();
        let a = spawn(&mut world, 0.0, 0.0, vec![3]);
        let b = spawn(&mut world, 2.0, 1.0, vec![3]);
        world.add_component(b, SoundComponent::default()).unwrap();

        let group = EntityProxy::Group(3);
        let bounds = group.bounds(&world).unwrap();
        assert_relative_eq!(bounds.x, 0.0);
        assert_relative_eq!(bounds.right(), 2.0 + vis_runtime::ecs::components::ICON_SIZE);

        group.set_position(&mut world, 5.0, 5.0).unwrap();
        assert_eq!(world.get_component::<PositionComponent>(a), Some(&PositionComponent::new(5.0, 5.0)));
        assert_eq!(world.get_component::<PositionComponent>(b), Some(&PositionComponent::new(7.0, 6.0)));
    }

    #[test]
    fn test_stale_and_empty_proxies() {
        let mut world = World::new();
        let entity = spawn(&mut world, 0.0, 0.0, vec![]);
        world.destroy_entity(entity).unwrap();

        assert!(EntityProxy::Single(entity).entities(&world).is_empty());
        assert!(matches!(EntityProxy::Single(entity).layer_id(&world), Err(EditorError::Ecs(_))));
        assert!(matches!(EntityProxy::Group(1).bounds(&world), Err(EditorError::EmptyGroup(1))));
    }
}
