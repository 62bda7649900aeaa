//! Undo and redo
//!
//! Every mutation of the world made by a user action goes through an
//! [`UndoableAction`]. The module keeps the applied actions on the undo stack
//! and the reverted ones on the redo stack. Recording a new action clears the
//! redo stack.

pub mod actions;

pub use actions::{EntitiesAddedAction, EntitiesRemovedAction, GroupAction, MoveEntitiesAction, ZIndexAction};

use vis_runtime::prelude::World;

use crate::error::EditorResult;
use crate::events::{EditorEvent, EventBus};

/// Reversible change to the world
pub trait UndoableAction {
    /// Apply the change; also used for redo
    fn apply(&mut self, world: &mut World) -> EditorResult<()>;

    /// Revert the change
    fn revert(&mut self, world: &mut World) -> EditorResult<()>;

    /// Name shown in the edit menu
    fn name(&self) -> String;

    /// The action leaves the history for good
    ///
    /// Actions that keep detached entities alive release them here.
    fn discard(&mut self, world: &mut World) {
        let _ = world;
    }
}

/// Several actions applied and reverted as one
///
/// Reverting runs the actions in reverse order.
pub struct UndoableActionGroup {
    name: String,
    actions: Vec<Box<dyn UndoableAction>>,
}

impl UndoableActionGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), actions: Vec::new() }
    }

    /// Append an action
    pub fn add(&mut self, action: Box<dyn UndoableAction>) {
        self.actions.push(action);
    }

    /// Check if the group holds no action
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

impl UndoableAction for UndoableActionGroup {
    fn apply(&mut self, world: &mut World) -> EditorResult<()> {
        for action in &mut self.actions {
            action.apply(world)?;
        }
        Ok(())
    }

    fn revert(&mut self, world: &mut World) -> EditorResult<()> {
        for action in self.actions.iter_mut().rev() {
            action.revert(world)?;
        }
        Ok(())
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn discard(&mut self, world: &mut World) {
        for action in &mut self.actions {
            action.discard(world);
        }
    }
}

/// Undo and redo stacks of a scene
pub struct UndoModule {
    undo_stack: Vec<Box<dyn UndoableAction>>,
    redo_stack: Vec<Box<dyn UndoableAction>>,
    limit: usize,
}

impl UndoModule {
    /// Create a module keeping at most `limit` actions
    pub fn new(limit: usize) -> Self {
        Self { undo_stack: Vec::new(), redo_stack: Vec::new(), limit: limit.max(1) }
    }

    /// Apply an action and record it
    pub fn execute(&mut self, world: &mut World, mut action: Box<dyn UndoableAction>) -> EditorResult<()> {
        action.apply(world)?;
        self.add(world, action);
        Ok(())
    }

    /// Record an action that was already applied
    pub fn add(&mut self, world: &mut World, action: Box<dyn UndoableAction>) {
        log::debug!("Recorded action '{}'", action.name());
        for mut reverted in self.redo_stack.drain(..) {
            reverted.discard(world);
        }

        self.undo_stack.push(action);
        if self.undo_stack.len() > self.limit {
            let mut oldest = self.undo_stack.remove(0);
            oldest.discard(world);
        }
    }

    /// Revert the last applied action; returns false when there is none
    pub fn undo(&mut self, world: &mut World, events: &mut EventBus) -> EditorResult<bool> {
        let Some(mut action) = self.undo_stack.pop() else {
            return Ok(false);
        };
        let name = action.name();
        if let Err(error) = action.revert(world) {
            self.undo_stack.push(action);
            return Err(error);
        }

        log::info!("Undo '{name}'");
        self.redo_stack.push(action);
        events.send(EditorEvent::Undo { action: name });
        Ok(true)
    }

    /// Apply the last reverted action again; returns false when there is none
    pub fn redo(&mut self, world: &mut World, events: &mut EventBus) -> EditorResult<bool> {
        let Some(mut action) = self.redo_stack.pop() else {
            return Ok(false);
        };
        let name = action.name();
        if let Err(error) = action.apply(world) {
            self.redo_stack.push(action);
            return Err(error);
        }

        log::info!("Redo '{name}'");
        self.undo_stack.push(action);
        events.send(EditorEvent::Redo { action: name });
        Ok(true)
    }

    /// Name of the action [`Self::undo`] would revert
    pub fn undo_name(&self) -> Option<String> {
        self.undo_stack.last().map(|action| action.name())
    }

    /// Name of the action [`Self::redo`] would apply
    pub fn redo_name(&self) -> Option<String> {
        self.redo_stack.last().map(|action| action.name())
    }

    /// Check whether there is something to undo
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check whether there is something to redo
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

impl Default for UndoModule {
    fn default() -> Self {
        Self::new(100)
    }
}
