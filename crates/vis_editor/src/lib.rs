//! # Vis Editor
//!
//! Editing core of the Vis 2D scene editor, built on [`vis_runtime`].
//!
//! ## Features
//!
//! - **Entity Proxies**: Single entities and nested groups selected as one unit
//! - **Selection**: Single-layer selection with an enterable group context and breadcrumb
//! - **Editing**: Group, ungroup, copy, paste, delete, move and drop placement
//! - **Undo**: Every user mutation recorded as a reversible action
//! - **Asset Reload**: Cached asset references re-resolved on reload events
//! - **Background Tasks**: Worker threads polled from the frame loop
//!
//! ## Quick Start
//!
//! ```rust
//! use vis_editor::prelude::*;
//!
//! let mut scene = SceneContext::headless(&["Background", "Foreground"]);
//! let a = scene.process_drop(&AssetDescriptor::path("sound/wind.wav"), 0.0, 0.0).unwrap().unwrap();
//! let b = scene.process_drop(&AssetDescriptor::path("sound/rain.wav"), 2.0, 0.0).unwrap().unwrap();
//!
//! scene.select(EntityProxy::Single(a)).unwrap();
//! scene.select_append(EntityProxy::Single(b)).unwrap();
//! scene.group_selection().unwrap();
//! assert_eq!(scene.selection.selection(), &[EntityProxy::Group(0)]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod clipboard;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod group;
pub mod placement;
pub mod proxy;
pub mod reload;
pub mod scene;
pub mod selection;
pub mod settings;
pub mod status;
pub mod tasks;
pub mod undo;

/// Common imports for editor users
pub mod prelude {
    pub use crate::{
        clipboard::Clipboard,
        config::{EditorConfig, Viewport},
        context::{EditContext, EditorAssets, SceneContext},
        error::{EditorError, EditorResult},
        events::{EditorEvent, EventBus, EventHandler, EventKind},
        group::{GroupEntityProxy, GroupProvider},
        placement::DropKind,
        proxy::EntityProxy,
        reload::{FontKinds, ReloadReport},
        scene::EditorScene,
        selection::{GroupBreadcrumb, SelectionManager, SelectionObserver},
        settings::SettingsIo,
        status::{StatusBar, StatusSink},
        tasks::{AsyncTask, TaskReporter, TaskUpdate},
        undo::{UndoModule, UndoableAction, UndoableActionGroup},
    };
    pub use vis_runtime::prelude::*;
}
