//! Undoable actions over the world

use vis_runtime::prelude::{
    Entity, EntityPrototype, GroupComponent, GroupId, PositionComponent, RenderableComponent, World,
};

use super::UndoableAction;
use crate::error::EditorResult;

/// Adds a group id to, or removes it from, the stacks of a set of entities
pub struct GroupAction {
    gid: GroupId,
    entities: Vec<Entity>,
    nest_in: Option<GroupId>,
    grouping: bool,
    created: Vec<Entity>,
    removed_at: Vec<(Entity, usize)>,
}

impl GroupAction {
    /// Put `entities` into a new group `gid`
    ///
    /// With `nest_in` set the group is created inside that group rather than
    /// around everything the entities already belong to.
    pub fn group(entities: Vec<Entity>, gid: GroupId, nest_in: Option<GroupId>) -> Self {
        Self { gid, entities, nest_in, grouping: true, created: Vec::new(), removed_at: Vec::new() }
    }

    /// Take `entities` out of group `gid`
    pub fn ungroup(entities: Vec<Entity>, gid: GroupId) -> Self {
        Self { gid, entities, nest_in: None, grouping: false, created: Vec::new(), removed_at: Vec::new() }
    }

    /// Group id the action works on
    pub fn group_id(&self) -> GroupId {
        self.gid
    }

    fn add_to_group(&mut self, world: &mut World) -> EditorResult<()> {
        self.created.clear();
        for &entity in &self.entities {
            world.ensure_alive(entity)?;
            if !world.has_component::<GroupComponent>(entity) {
                world.add_component(entity, GroupComponent::new())?;
                self.created.push(entity);
            }
            if let Some(groups) = world.get_component_mut::<GroupComponent>(entity) {
                groups.add_group(self.gid, self.nest_in);
            }
        }
        Ok(())
    }

    fn strip_group(&self, world: &mut World) {
        for &entity in &self.entities {
            if self.created.contains(&entity) {
                world.remove_component::<GroupComponent>(entity);
            } else if let Some(groups) = world.get_component_mut::<GroupComponent>(entity) {
                groups.remove_group(self.gid);
            }
        }
    }

    fn remove_from_group(&mut self, world: &mut World) {
        self.removed_at.clear();
        for &entity in &self.entities {
            if let Some(groups) = world.get_component_mut::<GroupComponent>(entity) {
                if let Some(index) = groups.remove_group(self.gid) {
                    self.removed_at.push((entity, index));
                }
            }
        }
    }

    fn restore_group(&self, world: &mut World) {
        for &(entity, index) in &self.removed_at {
            if let Some(groups) = world.get_component_mut::<GroupComponent>(entity) {
                groups.restore_group(self.gid, index);
            }
        }
    }
}

impl UndoableAction for GroupAction {
    fn apply(&mut self, world: &mut World) -> EditorResult<()> {
        if self.grouping {
            self.add_to_group(world)?;
        } else {
            self.remove_from_group(world);
        }
        Ok(())
    }

    fn revert(&mut self, world: &mut World) -> EditorResult<()> {
        if self.grouping {
            self.strip_group(world);
        } else {
            self.restore_group(world);
        }
        Ok(())
    }

    fn name(&self) -> String {
        if self.grouping { "Group" } else { "Ungroup" }.to_owned()
    }
}

/// Records entities that were already created
///
/// Undo detaches them, keeping their handles reserved so redo brings back the
/// very same entities.
pub struct EntitiesAddedAction {
    entities: Vec<Entity>,
    detached: Vec<EntityPrototype>,
}

impl EntitiesAddedAction {
    /// Record entities that are alive in the world
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities, detached: Vec::new() }
    }

    /// Entities of the action
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }
}

impl UndoableAction for EntitiesAddedAction {
    fn apply(&mut self, world: &mut World) -> EditorResult<()> {
        for (entity, prototype) in self.entities.iter().zip(self.detached.drain(..)) {
            world.attach_entity(*entity, &prototype)?;
        }
        Ok(())
    }

    fn revert(&mut self, world: &mut World) -> EditorResult<()> {
        self.detached.clear();
        for &entity in &self.entities {
            self.detached.push(world.detach_entity(entity)?);
        }
        Ok(())
    }

    fn name(&self) -> String {
        plural("Add Entity", "Add Entities", self.entities.len())
    }

    fn discard(&mut self, world: &mut World) {
        if self.detached.is_empty() {
            return;
        }
        for &entity in &self.entities {
            if let Err(error) = world.destroy_entity(entity) {
                log::warn!("Failed to release discarded entity: {error}");
            }
        }
        self.detached.clear();
    }
}

/// Removes entities, keeping their handles reserved until discarded
pub struct EntitiesRemovedAction {
    entities: Vec<Entity>,
    detached: Vec<EntityPrototype>,
}

impl EntitiesRemovedAction {
    /// Prepare the removal of `entities`
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities, detached: Vec::new() }
    }
}

impl UndoableAction for EntitiesRemovedAction {
    fn apply(&mut self, world: &mut World) -> EditorResult<()> {
        self.detached.clear();
        for &entity in &self.entities {
            self.detached.push(world.detach_entity(entity)?);
        }
        Ok(())
    }

    fn revert(&mut self, world: &mut World) -> EditorResult<()> {
        for (entity, prototype) in self.entities.iter().zip(self.detached.drain(..)) {
            world.attach_entity(*entity, &prototype)?;
        }
        Ok(())
    }

    fn name(&self) -> String {
        plural("Remove Entity", "Remove Entities", self.entities.len())
    }

    fn discard(&mut self, world: &mut World) {
        if self.detached.is_empty() {
            return;
        }
        for &entity in &self.entities {
            if let Err(error) = world.destroy_entity(entity) {
                log::warn!("Failed to release removed entity: {error}");
            }
        }
        self.detached.clear();
    }
}

/// Position change of a set of entities
pub struct MoveEntitiesAction {
    moves: Vec<(Entity, PositionComponent, PositionComponent)>,
}

impl MoveEntitiesAction {
    /// Remember the current position of every entity
    pub fn capture(world: &World, entities: &[Entity]) -> Self {
        let moves = entities
            .iter()
            .filter_map(|&entity| {
                world.get_component::<PositionComponent>(entity).map(|position| (entity, *position, *position))
            })
            .collect();
        Self { moves }
    }

    /// Remember the positions after the move
    pub fn finish(&mut self, world: &World) {
        for (entity, _, after) in &mut self.moves {
            if let Some(position) = world.get_component::<PositionComponent>(*entity) {
                *after = *position;
            }
        }
    }

    /// Check whether anything moved
    pub fn has_changes(&self) -> bool {
        self.moves.iter().any(|(_, before, after)| before != after)
    }

    fn set(world: &mut World, entity: Entity, position: PositionComponent) -> EditorResult<()> {
        world.add_component(entity, position)?;
        Ok(())
    }
}

impl UndoableAction for MoveEntitiesAction {
    fn apply(&mut self, world: &mut World) -> EditorResult<()> {
        for &(entity, _, after) in &self.moves {
            Self::set(world, entity, after)?;
        }
        Ok(())
    }

    fn revert(&mut self, world: &mut World) -> EditorResult<()> {
        for &(entity, before, _) in &self.moves {
            Self::set(world, entity, before)?;
        }
        Ok(())
    }

    fn name(&self) -> String {
        plural("Move Entity", "Move Entities", self.moves.len())
    }
}

/// Z-index change of a set of entities
pub struct ZIndexAction {
    changes: Vec<(Entity, i32, i32)>,
}

impl ZIndexAction {
    /// Shift the z-index of every entity by `delta`
    pub fn shift(world: &World, entities: &[Entity], delta: i32) -> Self {
        let changes = entities
            .iter()
            .filter_map(|&entity| {
                world
                    .get_component::<RenderableComponent>(entity)
                    .map(|renderable| (entity, renderable.z_index, renderable.z_index.saturating_add(delta)))
            })
            .collect();
        Self { changes }
    }

    /// Check if no entity is affected
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn set(world: &mut World, entity: Entity, z_index: i32) -> EditorResult<()> {
        world.add_component(entity, RenderableComponent::new(z_index))?;
        Ok(())
    }
}

impl UndoableAction for ZIndexAction {
    fn apply(&mut self, world: &mut World) -> EditorResult<()> {
        for &(entity, _, after) in &self.changes {
            Self::set(world, entity, after)?;
        }
        Ok(())
    }

    fn revert(&mut self, world: &mut World) -> EditorResult<()> {
        for &(entity, before, _) in &self.changes {
            Self::set(world, entity, before)?;
        }
        Ok(())
    }

    fn name(&self) -> String {
        "Change Z-Index".to_owned()
    }
}

fn plural(one: &str, many: &str, count: usize) -> String {
    if count == 1 { one } else { many }.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_action_round_trip() {
        let mut world = World::new();
        let grouped = world.create_entity();
        world.add_component(grouped, GroupComponent::from_ids(vec![0])).unwrap();
        let loose = world.create_entity();

        let mut action = GroupAction::group(vec![grouped, loose], 1, None);
        action.apply(&mut world).unwrap();
        assert_eq!(world.get_component::<GroupComponent>(grouped).unwrap().group_ids, vec![0, 1]);
        assert_eq!(world.get_component::<GroupComponent>(loose).unwrap().group_ids, vec![1]);

        action.revert(&mut world).unwrap();
        assert_eq!(world.get_component::<GroupComponent>(grouped).unwrap().group_ids, vec![0]);
        assert!(!world.has_component::<GroupComponent>(loose));
    }

    #[test]
    fn test_ungroup_restores_position_in_stack() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, GroupComponent::from_ids(vec![2, 5, 9])).unwrap();

        let mut action = GroupAction::ungroup(vec![entity], 5);
        action.apply(&mut world).unwrap();
        assert_eq!(world.get_component::<GroupComponent>(entity).unwrap().group_ids, vec![2, 9]);

        action.revert(&mut world).unwrap();
        assert_eq!(world.get_component::<GroupComponent>(entity).unwrap().group_ids, vec![2, 5, 9]);
        assert_eq!(action.name(), "Ungroup");
    }

    #[test]
    fn test_added_entities_come_back_with_same_handle() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, PositionComponent::new(1.0, 1.0)).unwrap();

        let mut action = EntitiesAddedAction::new(vec![entity]);
        action.revert(&mut world).unwrap();
        assert!(!world.is_alive(entity));

        action.apply(&mut world).unwrap();
        assert!(world.is_alive(entity));
        assert_eq!(world.get_component::<PositionComponent>(entity), Some(&PositionComponent::new(1.0, 1.0)));
    }

    #[test]
    fn test_discarding_reverted_add_releases_entities() {
        let mut world = World::new();
        let entity = world.create_entity();
        let mut action = EntitiesAddedAction::new(vec![entity]);
        action.revert(&mut world).unwrap();

        action.discard(&mut world);
        let prototype = EntityPrototype::new();
        assert!(world.attach_entity(entity, &prototype).is_err());
    }

    #[test]
    fn test_removed_entities_restore() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        world.add_component(b, RenderableComponent::new(4)).unwrap();

        let mut action = EntitiesRemovedAction::new(vec![a, b]);
        action.apply(&mut world).unwrap();
        assert_eq!(world.entity_count(), 0);
        assert_eq!(action.name(), "Remove Entities");

        action.revert(&mut world).unwrap();
        assert_eq!(world.get_component::<RenderableComponent>(b), Some(&RenderableComponent::new(4)));
    }

    #[test]
    fn test_move_and_z_index() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, PositionComponent::new(0.0, 0.0)).unwrap();
        world.add_component(entity, RenderableComponent::new(0)).unwrap();

        let mut moved = MoveEntitiesAction::capture(&world, &[entity]);
        world.get_component_mut::<PositionComponent>(entity).unwrap().translate(1.0, 2.0);
        moved.finish(&world);
        assert!(moved.has_changes());
        moved.revert(&mut world).unwrap();
        assert_eq!(world.get_component::<PositionComponent>(entity), Some(&PositionComponent::new(0.0, 0.0)));
        moved.apply(&mut world).unwrap();
        assert_eq!(world.get_component::<PositionComponent>(entity), Some(&PositionComponent::new(1.0, 2.0)));

        let mut z = ZIndexAction::shift(&world, &[entity], 1);
        z.apply(&mut world).unwrap();
        assert_eq!(world.get_component::<RenderableComponent>(entity).unwrap().z_index, 1);
        z.revert(&mut world).unwrap();
        assert_eq!(world.get_component::<RenderableComponent>(entity).unwrap().z_index, 0);
    }
}
