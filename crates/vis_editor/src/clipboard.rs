//! Clipboard holding copied entities

use std::collections::HashMap;

use vis_runtime::prelude::{EntityPrototype, GroupComponent, GroupId, PositionComponent, Vec2};

/// Copied entities plus the geometry needed to paste them at the cursor
///
/// Group stacks are stored relative to the group context the copy was made
/// in: ids of the context and its parents are stripped, so a paste can nest
/// the copies inside whatever context is current then.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    entries: Vec<EntityPrototype>,
    attach: Vec2,
    base: Vec2,
}

impl Clipboard {
    /// Create an empty clipboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content
    ///
    /// `base` is the origin of the reference proxy and `attach` the point of
    /// it that ends up under the cursor, relative to that origin.
    pub fn store(&mut self, entries: Vec<EntityPrototype>, base: Vec2, attach: Vec2, context: Option<GroupId>) {
        self.entries = entries;
        self.base = base;
        self.attach = attach;

        if let Some(context) = context {
            for entry in &mut self.entries {
                strip_context(entry, context);
            }
        }
    }

    /// Check if nothing was copied
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of copied entities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Copied prototypes
    pub fn entries(&self) -> &[EntityPrototype] {
        &self.entries
    }

    /// Prototypes ready to be built at `(x, y)`
    ///
    /// Copied group ids are renumbered from `first_free_gid` and the stacks
    /// are nested inside `context_chain`, given innermost first.
    pub fn instantiate(&self, x: f32, y: f32, first_free_gid: GroupId, context_chain: &[GroupId]) -> Vec<EntityPrototype> {
        let mut remap: HashMap<GroupId, GroupId> = HashMap::new();
        let mut next_gid = first_free_gid;
        let origin = Vec2::new(x, y) - self.attach;

        self.entries
            .iter()
            .map(|entry| {
                let mut prototype = entry.clone();

                if let Some(position) = prototype.get_mut::<PositionComponent>() {
                    let target = origin + (position.to_vec2() - self.base);
                    *position = PositionComponent::new(target.x, target.y);
                }

                let mut ids: Vec<GroupId> = prototype
                    .get::<GroupComponent>()
                    .map(|groups| {
                        groups
                            .group_ids
                            .iter()
                            .map(|gid| {
                                *remap.entry(*gid).or_insert_with(|| {
                                    let fresh = next_gid;
                                    next_gid += 1;
                                    fresh
                                })
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                ids.extend_from_slice(context_chain);

                if ids.is_empty() {
                    prototype.remove::<GroupComponent>();
                } else {
                    prototype.insert(GroupComponent::from_ids(ids));
                }
                prototype
            })
            .collect()
    }
}

fn strip_context(entry: &mut EntityPrototype, context: GroupId) {
    let Some(groups) = entry.get_mut::<GroupComponent>() else {
        return;
    };
    if let Some(index) = groups.group_ids.iter().position(|gid| *gid == context) {
        groups.group_ids.truncate(index);
    }
    if groups.is_empty() {
        entry.remove::<GroupComponent>();
    }
}
