//! Group breadcrumb
//!
//! The chain of groups the user entered, outermost first. The last element is
//! the current group context.

use vis_runtime::prelude::GroupId;

/// Entered group chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupBreadcrumb {
    hierarchy: Vec<GroupId>,
}

impl GroupBreadcrumb {
    /// Create an empty breadcrumb, at the scene root
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a group nested in the current one
    pub fn add_group(&mut self, gid: GroupId) {
        self.hierarchy.push(gid);
    }

    /// Leave every group entered after `gid`
    pub fn trim_to_gid(&mut self, gid: GroupId) {
        if let Some(index) = self.hierarchy.iter().position(|id| *id == gid) {
            self.hierarchy.truncate(index + 1);
        }
    }

    /// Check whether `gid` is part of the chain
    pub fn is_in_hierarchy(&self, gid: GroupId) -> bool {
        self.hierarchy.contains(&gid)
    }

    /// Go back to the scene root
    pub fn reset(&mut self) {
        self.hierarchy.clear();
    }

    /// Current group context
    pub fn current(&self) -> Option<GroupId> {
        self.hierarchy.last().copied()
    }

    /// The chain, outermost first
    pub fn hierarchy(&self) -> &[GroupId] {
        &self.hierarchy
    }
}
