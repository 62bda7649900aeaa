//! Clipboard and transform operations on the selection

use vis_runtime::prelude::{EntityPrototype, InvisibleComponent, LayerComponent, Vec2};

use super::manager::{SelectionManager, LAYER_LOCKED};
use crate::context::EditContext;
use crate::error::EditorResult;
use crate::events::EditorEvent;
use crate::group::GroupProvider;
use crate::proxy::EntityProxy;
use crate::undo::{EntitiesAddedAction, EntitiesRemovedAction, MoveEntitiesAction, ZIndexAction};

impl SelectionManager {
    /// Snapshot every selected entity into the clipboard
    ///
    /// The last selected proxy is the paste reference: its center ends up
    /// under the cursor.
    pub fn copy(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<()> {
        let Some(reference) = self.selection.last().copied() else {
            ctx.status.set_text("Nothing to copy!");
            return Ok(());
        };

        let bounds = reference.bounds(ctx.world)?;
        let mut entries = Vec::new();
        for entity in self.selected_entities(ctx) {
            entries.push(EntityPrototype::capture(ctx.world, entity)?);
        }

        let count = entries.len();
        self.clipboard.store(
            entries,
            Vec2::new(bounds.x, bounds.y),
            Vec2::new(bounds.width / 2.0, bounds.height / 2.0),
            self.current_gid(),
        );
        log::debug!("Copied {count} entities");
        Ok(())
    }

    /// Build the clipboard content on the active layer around `(x, y)`
    ///
    /// Pasted groups get fresh ids and are nested inside the current group
    /// context. The pasted entities become the selection.
    pub fn paste(&mut self, ctx: &mut EditContext<'_>, x: f32, y: f32) -> EditorResult<()> {
        if self.clipboard.is_empty() {
            ctx.status.set_text("Nothing to paste!");
            return Ok(());
        }
        let layer = ctx.scene.active_layer()?;
        if layer.locked {
            ctx.status.set_text(LAYER_LOCKED);
            return Ok(());
        }
        let (layer_id, visible) = (layer.id, layer.visible);

        let free_gid = GroupProvider::new(ctx.world).free_group_id();
        let chain: Vec<_> = self.breadcrumb.hierarchy().iter().rev().copied().collect();

        let mut pasted = Vec::new();
        for mut prototype in self.clipboard.instantiate(x, y, free_gid, &chain) {
            prototype.insert(LayerComponent::new(layer_id));
            if visible {
                prototype.remove::<InvisibleComponent>();
            } else {
                prototype.insert(InvisibleComponent);
            }
            pasted.push(prototype.build(ctx.world)?);
        }
        log::info!("Pasted {} entities on layer {layer_id}", pasted.len());

        self.selection.clear();
        for entity in &pasted {
            self.add_to_list(ctx, EntityProxy::Single(*entity))?;
        }
        ctx.undo.add(ctx.world, Box::new(EntitiesAddedAction::new(pasted)));
        self.notify(ctx);
        Ok(())
    }

    /// Copy the selection, then delete it
    pub fn cut(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<()> {
        if self.selection.is_empty() {
            ctx.status.set_text("Nothing to cut!");
            return Ok(());
        }
        self.copy(ctx)?;
        self.delete_selected(ctx)
    }

    /// Remove every selected entity through an undoable removal
    pub fn delete_selected(&mut self, ctx: &mut EditContext<'_>) -> EditorResult<()> {
        if self.selection.is_empty() {
            return Ok(());
        }
        if ctx.scene.active_layer()?.locked {
            ctx.status.set_text(LAYER_LOCKED);
            return Ok(());
        }

        let entities = self.selected_entities(ctx);
        ctx.undo.execute(ctx.world, Box::new(EntitiesRemovedAction::new(entities)))?;

        self.selection.clear();
        self.leave_dead_context(ctx);
        self.notify(ctx);
        Ok(())
    }

    /// Move the selection by a delta as one undoable step
    pub fn move_selected(&mut self, ctx: &mut EditContext<'_>, dx: f32, dy: f32) -> EditorResult<()> {
        if self.selection.is_empty() {
            return Ok(());
        }
        if ctx.scene.active_layer()?.locked {
            ctx.status.set_text(LAYER_LOCKED);
            return Ok(());
        }

        let entities = self.selected_entities(ctx);
        let mut action = MoveEntitiesAction::capture(ctx.world, &entities);
        for proxy in &self.selection {
            proxy.translate(ctx.world, dx, dy);
        }
        action.finish(ctx.world);

        if action.has_changes() {
            ctx.undo.add(ctx.world, Box::new(action));
            ctx.scene.mark_dirty();
        }
        Ok(())
    }

    /// Raise or lower the selection by one z-index step
    pub fn move_selected_z(&mut self, ctx: &mut EditContext<'_>, up: bool) -> EditorResult<()> {
        if self.selection.is_empty() {
            return Ok(());
        }
        if ctx.scene.active_layer()?.locked {
            ctx.status.set_text(LAYER_LOCKED);
            return Ok(());
        }

        let entities = self.selected_entities(ctx);
        let action = ZIndexAction::shift(ctx.world, &entities, if up { 1 } else { -1 });
        if action.is_empty() {
            return Ok(());
        }

        ctx.undo.execute(ctx.world, Box::new(action))?;
        ctx.events.send(EditorEvent::RenderOrderChanged);
        ctx.scene.mark_dirty();
        Ok(())
    }
}
