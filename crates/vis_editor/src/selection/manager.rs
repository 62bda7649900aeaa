//! Selection manager
//!
//! Keeps the selected proxies and the group context the user is working in.
//! The selection always lives on a single layer, the active one. Selecting
//! something on another layer makes that layer active and drops the previous
//! selection.
//!
//! What gets selected depends on the group context. At the scene root a click
//! on a grouped entity selects its outermost group; inside an entered group
//! it selects the group nested directly inside the context, or the entity
//! itself when it is a direct member.

use vis_runtime::prelude::{Entity, GroupId, LayerComponent};

use super::breadcrumb::GroupBreadcrumb;
use crate::clipboard::Clipboard;
use crate::context::EditContext;
use crate::error::EditorResult;
use crate::events::EditorEvent;
use crate::group::GroupProvider;
use crate::proxy::EntityProxy;
use crate::undo::{GroupAction, UndoableActionGroup};

pub(crate) const LAYER_LOCKED: &str = "Layer is locked!";

/// Listener notified after every selection change
pub trait SelectionObserver {
    /// The selection changed; `selection` is the new selection in order
    fn selection_changed(&mut self, selection: &[EntityProxy]);
}

/// Selected proxies and group context of the edited scene
#[derive(Default)]
pub struct SelectionManager {
    pub(crate) selection: Vec<EntityProxy>,
    pub(crate) breadcrumb: GroupBreadcrumb,
    pub(crate) clipboard: Clipboard,
    observers: Vec<Box<dyn SelectionObserver>>,
}

impl SelectionManager {
    /// Create an empty selection at the scene root
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add_observer(&mut self, observer: Box<dyn SelectionObserver>) {
        self.observers.push(observer);
    }

    /// Selected proxies in selection order
    pub fn selection(&self) -> &[EntityProxy] {
        &self.selection
    }

    /// Group the user entered, `None` at the scene root
    pub fn current_gid(&self) -> Option<GroupId> {
        self.breadcrumb.current()
    }

    /// Entered group chain
    pub fn breadcrumb(&self) -> &GroupBreadcrumb {
        &self.breadcrumb
    }

    /// Copied entities
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Check whether `proxy` is selected
    pub fn is_selected(&self, proxy: &EntityProxy) -> bool {
        self.selection.contains(proxy)
    }

    /// Check whether the group proxy of `gid` is selected
    pub fn is_group_id_selected(&self, gid: GroupId) -> bool {
        self.selection.contains(&EntityProxy::Group(gid))
    }

    /// Every live entity of the selection, without duplicates
    pub fn selected_entities(&self, ctx: &EditContext<'_>) -> Vec<Entity> {
        let mut entities = Vec::new();
        for proxy in &self.selection {
            for entity in proxy.entities(ctx.world) {
                if !entities.contains(&entity) {
                    entities.push(entity);
                }
            }
        }
        entities
    }

    /// Replace the selection with `proxy`
    pub fn select(&mut self, ctx: &mut EditContext<'_>, proxy: EntityProxy) -> EditorResult<()> {
        let layer_id = proxy.layer_id(ctx.world)?;
        if ctx.scene.is_layer_locked(layer_id)? {
            ctx.status.set_text(LAYER_LOCKED);
            return Ok(());
        }
        self.activate_layer(ctx, layer_id)?;

        self.selection.clear();
        self.check_proxy_gid(ctx, proxy)?;
        self.add_to_list(ctx, proxy)?;
        self.notify(ctx);
        Ok(())
    }

    /// Add `proxy` to the selection
    ///
    /// When the proxy is on another layer than the active one, that layer
    /// becomes active and the previous selection is dropped.
    pub fn select_append(&mut self, ctx: &mut EditContext<'_>, proxy: EntityProxy) -> EditorResult<()> {
        let layer_id = proxy.layer_id(ctx.world)?;
        if ctx.scene.is_layer_locked(layer_id)? {
            ctx.status.set_text(LAYER_LOCKED);
            return Ok(());
        }
        if ctx.scene.active_layer_id() != layer_id {
            self.activate_layer(ctx, layer_id)?;
            self.selection.clear();
        }

        self.check_proxy_gid(ctx, proxy)?;
        self.add_to_list(ctx, proxy)?;
        self.notify(ctx);
        Ok(())
    }

    /// Select everything on the active layer, or every member of the entered group
    pub fn select_all(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<()> {
        if ctx.scene.active_layer()?.locked {
            ctx.status.set_text(LAYER_LOCKED);
            return Ok(());
        }

        self.selection.clear();
        match self.current_gid() {
            None => {
                let layer_id = ctx.scene.active_layer_id();
                let on_layer: Vec<Entity> = ctx
                    .world
                    .iter::<LayerComponent>()
                    .filter(|(_, layer)| layer.layer_id == layer_id)
                    .map(|(entity, _)| entity)
                    .collect();
                for entity in on_layer {
                    self.add_to_list(ctx, EntityProxy::Single(entity))?;
                }
            }
            Some(gid) => {
                let group = GroupProvider::new(ctx.world).group_entity_proxy(gid)?;
                for member in group.members() {
                    self.add_to_list(ctx, *member)?;
                }
            }
        }

        self.notify(ctx);
        Ok(())
    }

    /// Remove `proxy` from the selection
    pub fn deselect(&mut self, ctx: &mut EditContext<'_>, proxy: EntityProxy) {
        self.selection.retain(|selected| *selected != proxy);
        self.notify(ctx);
    }

    /// Clear the selection
    pub fn reset_selection(&mut self, ctx: &mut EditContext<'_>) {
        self.selection.clear();
        self.notify(ctx);
    }

    /// Put the selected proxies into a new group and select it
    pub fn group_selection(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<()> {
        if self.selection.len() <= 1 {
            ctx.status.set_text("Nothing to group!");
            return Ok(());
        }
        if ctx.scene.active_layer()?.locked {
            ctx.status.set_text(LAYER_LOCKED);
            return Ok(());
        }

        let gid = GroupProvider::new(ctx.world).free_group_id();
        let entities = self.selected_entities(ctx);
        let count = entities.len();

        ctx.undo.execute(ctx.world, Box::new(GroupAction::group(entities, gid, self.current_gid())))?;
        log::info!("Grouped {count} entities into group {gid}");

        self.select(ctx, EntityProxy::Group(gid))
    }

    /// Dissolve every selected group and select their former members
    ///
    /// The context goes back to the scene root; the members are then
    /// appended the same way clicks would append them.
    pub fn ungroup_selection(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<()> {
        if self.selection.is_empty() {
            ctx.status.set_text("Nothing to ungroup!");
            return Ok(());
        }
        if ctx.scene.active_layer()?.locked {
            ctx.status.set_text(LAYER_LOCKED);
            return Ok(());
        }

        let mut actions = UndoableActionGroup::new("Ungroup");
        let mut members = Vec::new();
        for proxy in &self.selection {
            let EntityProxy::Group(gid) = *proxy else {
                continue;
            };
            let group = GroupProvider::new(ctx.world).group_entity_proxy(gid)?;
            members.extend_from_slice(group.members());
            actions.add(Box::new(GroupAction::ungroup(proxy.entities(ctx.world), gid)));
        }

        if actions.is_empty() {
            ctx.status.set_text("No group selected!");
            return Ok(());
        }

        log::info!("Ungrouping {} groups", actions.len());
        ctx.undo.execute(ctx.world, Box::new(actions))?;

        self.breadcrumb.reset();
        self.selection.clear();
        for member in members {
            self.check_proxy_gid(ctx, member)?;
            self.add_to_list(ctx, member)?;
        }
        self.notify(ctx);
        Ok(())
    }

    /// Enter the single selected group and select its members
    pub fn enter_group(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<()> {
        let [EntityProxy::Group(gid)] = self.selection.as_slice() else {
            ctx.status.set_text("No group selected!");
            return Ok(());
        };
        let gid = *gid;

        self.breadcrumb.add_group(gid);
        self.select_all(ctx)
    }

    /// Go back to an entered group from the breadcrumb and select its members
    pub fn breadcrumb_clicked(&mut self, ctx: &mut EditContext<'_>, gid: GroupId) -> EditorResult<()> {
        if !self.breadcrumb.is_in_hierarchy(gid) {
            log::warn!("Group {gid} is not part of the breadcrumb");
            return Ok(());
        }
        self.breadcrumb.trim_to_gid(gid);
        self.select_all(ctx)
    }

    /// Go back to the scene root and clear the selection
    pub fn breadcrumb_root_clicked(&mut self, ctx: &mut EditContext<'_>) {
        self.breadcrumb.reset();
        self.reset_selection(ctx);
    }

    /// Enter every group around `proxy` and select it
    ///
    /// Used when a proxy is picked from the scene outline. A group proxy ends
    /// up as the entered group with all its members selected.
    pub fn find_entity_base_group_and_select(
        &mut self,
        ctx: &mut EditContext<'_>,
        proxy: EntityProxy,
    ) -> EditorResult<()> {
        self.breadcrumb.reset();
        for gid in proxy.group_ids(ctx.world)?.into_iter().rev() {
            self.breadcrumb.add_group(gid);
        }

        if proxy.is_group() {
            self.activate_layer(ctx, proxy.layer_id(ctx.world)?)?;
            self.select_all(ctx)
        } else {
            self.select(ctx, proxy)
        }
    }

    /// Drop proxies whose entities are gone, leaving a dead group context
    ///
    /// Returns true when anything changed; listeners are notified then.
    pub fn prune_dead(&mut self, ctx: &mut EditContext<'_>) -> bool {
        let before = self.selection.len();
        self.selection.retain(|proxy| proxy.is_alive(ctx.world));
        let changed = self.leave_dead_context(ctx) || before != self.selection.len();

        if changed {
            self.notify(ctx);
        }
        changed
    }

    /// Reset the breadcrumb when the entered group has no members left
    pub(crate) fn leave_dead_context(&mut self, ctx: &EditContext<'_>) -> bool {
        match self.current_gid() {
            Some(gid) if !EntityProxy::Group(gid).is_alive(ctx.world) => {
                log::debug!("Entered group {gid} is gone, back to scene root");
                self.breadcrumb.reset();
                true
            }
            _ => false,
        }
    }

    /// Keep the group context consistent with a proxy about to be selected
    ///
    /// When the proxy lies outside the context, the context falls back to the
    /// proxy's outermost group if that one was entered before, or to the root.
    pub(crate) fn check_proxy_gid(&mut self, ctx: &EditContext<'_>, proxy: EntityProxy) -> EditorResult<()> {
        let in_context = match self.current_gid() {
            Some(current) => proxy.groups_contains(ctx.world, current)?,
            None => false,
        };
        if in_context {
            return Ok(());
        }

        match proxy.last_group_id(ctx.world)? {
            Some(gid) if self.breadcrumb.is_in_hierarchy(gid) => self.breadcrumb.trim_to_gid(gid),
            _ => self.breadcrumb.reset(),
        }
        Ok(())
    }

    /// Add a proxy, resolved against the group context
    pub(crate) fn add_to_list(&mut self, ctx: &EditContext<'_>, proxy: EntityProxy) -> EditorResult<()> {
        let resolved = match self.current_gid() {
            None => proxy.last_group_id(ctx.world)?,
            Some(current) => proxy.group_id_before(ctx.world, current)?,
        };

        let selected = match resolved {
            Some(gid) if !proxy.is_group() => EntityProxy::Group(gid),
            _ => proxy,
        };
        if !self.selection.contains(&selected) {
            self.selection.push(selected);
        }
        Ok(())
    }

    pub(crate) fn notify(&mut self, ctx: &mut EditContext<'_>) {
        for observer in &mut self.observers {
            observer.selection_changed(&self.selection);
        }
        ctx.scene.mark_dirty();
    }

    fn activate_layer(&mut self, ctx: &mut EditContext<'_>, layer_id: u32) -> EditorResult<()> {
        if ctx.scene.active_layer_id() != layer_id {
            ctx.scene.set_active_layer(layer_id)?;
            ctx.events.send(EditorEvent::ActiveLayerChanged { layer_id });
        }
        Ok(())
    }
}
