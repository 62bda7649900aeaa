//! Group membership component
//!
//! Groups have no entity of their own. An entity belongs to a group when the
//! group id appears in its group stack; nesting is expressed by the order of
//! the stack. The last element is the outermost group the entity was placed
//! into, the element before it is the group directly inside that one, and so
//! on down to the first element.

use serde::{Deserialize, Serialize};

use crate::ecs::Component;

/// Identifier of a group, unique among live groups
pub type GroupId = u32;

/// Ordered group stack of an entity
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupComponent {
    /// Group ids, innermost first
    pub group_ids: Vec<GroupId>,
}

impl GroupComponent {
    /// Create an empty group stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stack from ids ordered innermost first
    pub fn from_ids(group_ids: Vec<GroupId>) -> Self {
        Self { group_ids }
    }

    /// Check if the entity belongs to no group
    pub fn is_empty(&self) -> bool {
        self.group_ids.is_empty()
    }

    /// Outermost group of the entity
    pub fn last(&self) -> Option<GroupId> {
        self.group_ids.last().copied()
    }

    /// Check whether the entity is a member of `gid` at any depth
    pub fn contains(&self, gid: GroupId) -> bool {
        self.group_ids.contains(&gid)
    }

    /// Group nested directly inside `gid`, if the entity is in one
    pub fn id_before(&self, gid: GroupId) -> Option<GroupId> {
        let index = self.group_ids.iter().position(|id| *id == gid)?;
        index.checked_sub(1).map(|before| self.group_ids[before])
    }

    /// The part of the stack from `gid` outwards
    pub fn ids_from(&self, gid: GroupId) -> &[GroupId] {
        self.group_ids
            .iter()
            .position(|id| *id == gid)
            .map_or(&[], |index| &self.group_ids[index..])
    }

    /// Place the entity into a new group
    ///
    /// With `nest_in` naming a group the entity already belongs to, the new
    /// group becomes the group directly inside it. Otherwise it becomes the
    /// new outermost group.
    pub fn add_group(&mut self, gid: GroupId, nest_in: Option<GroupId>) {
        match nest_in.and_then(|context| self.group_ids.iter().position(|id| *id == context)) {
            Some(index) => self.group_ids.insert(index, gid),
            None => self.group_ids.push(gid),
        }
    }

    /// Remove `gid` from the stack, returning its former position
    pub fn remove_group(&mut self, gid: GroupId) -> Option<usize> {
        let index = self.group_ids.iter().position(|id| *id == gid)?;
        self.group_ids.remove(index);
        Some(index)
    }

    /// Put `gid` back at a position returned by [`Self::remove_group`]
    pub fn restore_group(&mut self, gid: GroupId, index: usize) {
        let index = index.min(self.group_ids.len());
        self.group_ids.insert(index, gid);
    }
}

impl Component for GroupComponent {}
