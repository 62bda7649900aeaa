//! Group id allocation and group proxies
//!
//! Groups are derived from the group stacks of their members; there is no
//! registry to keep in sync. Every query scans the store.

use vis_runtime::prelude::{Entity, GroupComponent, GroupId, World};

use crate::error::{EditorError, EditorResult};
use crate::proxy::EntityProxy;

/// Group lookups over a world
#[derive(Clone, Copy)]
pub struct GroupProvider<'w> {
    world: &'w World,
}

impl<'w> GroupProvider<'w> {
    /// Create a provider reading `world`
    pub fn new(world: &'w World) -> Self {
        Self { world }
    }

    /// One more than the largest group id in use, 0 when there are no groups
    ///
    /// Every id of every stack is considered, so ids of groups nested inside
    /// an entered group are never handed out twice.
    pub fn free_group_id(&self) -> GroupId {
        self.world
            .iter::<GroupComponent>()
            .flat_map(|(_, groups)| groups.group_ids.iter().copied())
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Entities whose stack contains `gid`
    pub fn member_entities(&self, gid: GroupId) -> Vec<Entity> {
        EntityProxy::Group(gid).entities(self.world)
    }

    /// Group proxy for `gid` with its current members
    pub fn group_entity_proxy(&self, gid: GroupId) -> EditorResult<GroupEntityProxy> {
        let mut members = Vec::new();
        for (entity, groups) in self.world.iter::<GroupComponent>() {
            if !groups.contains(gid) {
                continue;
            }
            let member = groups.id_before(gid).map_or(EntityProxy::Single(entity), EntityProxy::Group);
            if !members.contains(&member) {
                members.push(member);
            }
        }

        if members.is_empty() {
            return Err(EditorError::EmptyGroup(gid));
        }
        Ok(GroupEntityProxy { gid, members })
    }
}

/// Snapshot of a group and its direct members
///
/// Members nested one level deeper are represented by their own group proxy,
/// which can in turn be expanded with [`GroupProvider::group_entity_proxy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntityProxy {
    gid: GroupId,
    members: Vec<EntityProxy>,
}

impl GroupEntityProxy {
    /// Group id
    pub fn group_id(&self) -> GroupId {
        self.gid
    }

    /// Direct members
    pub fn members(&self) -> &[EntityProxy] {
        &self.members
    }

    /// The group as a selectable proxy
    pub fn proxy(&self) -> EntityProxy {
        EntityProxy::Group(self.gid)
    }
}
