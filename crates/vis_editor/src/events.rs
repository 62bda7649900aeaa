//! Editor event bus
//!
//! Events are queued while a model mutation runs and delivered afterwards in
//! the order they were sent. The scene context reacts to them first (render
//! order, selection pruning, asset reload); registered handlers are notified
//! next, in registration order, until one consumes the event.

use std::collections::HashMap;

use crate::reload::FontKinds;

/// Something that happened to the edited scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// An action was reverted
    Undo {
        /// Name of the action
        action: String,
    },
    /// A reverted action was applied again
    Redo {
        /// Name of the action
        action: String,
    },
    /// A layer id or z-index changed
    RenderOrderChanged,
    /// The active layer changed
    ActiveLayerChanged {
        /// New active layer
        layer_id: u32,
    },
    /// Texture files changed on disk
    TexturesReloaded,
    /// Particle effect files changed on disk
    ParticlesReloaded,
    /// Font files changed on disk
    FontsReloaded(FontKinds),
    /// Shader files changed on disk
    ShadersReloaded,
}

/// Event discriminant used for handler registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`EditorEvent::Undo`]
    Undo,
    /// [`EditorEvent::Redo`]
    Redo,
    /// [`EditorEvent::RenderOrderChanged`]
    RenderOrderChanged,
    /// [`EditorEvent::ActiveLayerChanged`]
    ActiveLayerChanged,
    /// [`EditorEvent::TexturesReloaded`]
    TexturesReloaded,
    /// [`EditorEvent::ParticlesReloaded`]
    ParticlesReloaded,
    /// [`EditorEvent::FontsReloaded`]
    FontsReloaded,
    /// [`EditorEvent::ShadersReloaded`]
    ShadersReloaded,
}

impl EditorEvent {
    /// Discriminant of the event
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Undo { .. } => EventKind::Undo,
            Self::Redo { .. } => EventKind::Redo,
            Self::RenderOrderChanged => EventKind::RenderOrderChanged,
            Self::ActiveLayerChanged { .. } => EventKind::ActiveLayerChanged,
            Self::TexturesReloaded => EventKind::TexturesReloaded,
            Self::ParticlesReloaded => EventKind::ParticlesReloaded,
            Self::FontsReloaded(_) => EventKind::FontsReloaded,
            Self::ShadersReloaded => EventKind::ShadersReloaded,
        }
    }
}

/// Event handler
///
/// Returns true if the event was consumed, which stops forwarding to handlers
/// registered after this one.
pub trait EventHandler {
    /// Handle an event
    fn on_event(&mut self, event: &EditorEvent) -> bool;
}

/// Queue of pending events plus the handlers interested in them
#[derive(Default)]
pub struct EventBus {
    queue: Vec<EditorEvent>,
    handlers: HashMap<EventKind, Vec<Box<dyn EventHandler>>>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one kind of event
    pub fn register_handler(&mut self, kind: EventKind, handler: Box<dyn EventHandler>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Queue an event
    pub fn send(&mut self, event: EditorEvent) {
        log::trace!("Event queued: {event:?}");
        self.queue.push(event);
    }

    /// Take every queued event, oldest first
    pub fn drain(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.queue)
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deliver one event to the registered handlers
    pub fn notify_handlers(&mut self, event: &EditorEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for handler in handlers.iter_mut() {
                if handler.on_event(event) {
                    break;
                }
            }
        }
    }

    /// Deliver every queued event to the registered handlers
    pub fn dispatch(&mut self) {
        for event in self.drain() {
            self.notify_handlers(&event);
        }
    }
}
