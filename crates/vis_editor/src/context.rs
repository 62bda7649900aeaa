//! Scene context
//!
//! [`SceneContext`] owns everything belonging to one open scene: the world,
//! its layers, the selection, undo history, event queue and the runtime
//! systems observing the world. Every editing entry point runs the same way:
//!
//! 1. the operation mutates the model through an [`EditContext`],
//! 2. world changes are flushed to the inflaters, the render system and the
//!    id manager,
//! 3. queued events are handled by the context, then by registered handlers.

use vis_runtime::prelude::{
    AssetDescriptor, Batch, CameraManager, Entity, EntityPrototype, FontCache, IconRenderAgent, IdManager,
    MemoryAssets, ParticleCache, ParticleInflater, ParticleRenderAgent, RenderBatchingSystem, ShaderCache,
    ShaderInflater, SpriteRenderAgent, TextRenderAgent, TextureCache, World, WorldObserver,
};

use crate::config::EditorConfig;
use crate::error::EditorResult;
use crate::events::{EditorEvent, EventBus};
use crate::proxy::EntityProxy;
use crate::reload::{reload_fonts, reload_particles, reload_shaders, reload_textures};
use crate::scene::EditorScene;
use crate::selection::SelectionManager;
use crate::status::{StatusBar, StatusSink};
use crate::undo::UndoModule;

/// Every asset cache the editor resolves through
pub trait EditorAssets: TextureCache + FontCache + ParticleCache + ShaderCache {}

impl<T: TextureCache + FontCache + ParticleCache + ShaderCache> EditorAssets for T {}

/// Mutable view of the model handed to editing operations
pub struct EditContext<'a> {
    /// Edited world
    pub world: &'a mut World,
    /// Layers and active layer
    pub scene: &'a mut EditorScene,
    /// Undo history
    pub undo: &'a mut UndoModule,
    /// Event queue
    pub events: &'a mut EventBus,
    /// User facing messages
    pub status: &'a mut dyn StatusSink,
}

/// One open scene with its editing state and runtime systems
pub struct SceneContext {
    /// Edited world
    pub world: World,
    /// Layers and active layer
    pub scene: EditorScene,
    /// Selection and group context
    pub selection: SelectionManager,
    /// Undo history
    pub undo: UndoModule,
    /// Event queue and handlers
    pub events: EventBus,
    /// Status bar
    pub status: StatusBar,
    /// Render job list
    pub render: RenderBatchingSystem,
    /// String id lookup
    pub ids: IdManager,
    /// Scene and UI cameras
    pub cameras: CameraManager,
    /// Asset caches
    pub assets: MemoryAssets,
}

impl SceneContext {
    /// Create an empty scene from the editor configuration
    pub fn new(config: &EditorConfig) -> Self {
        let mut render = RenderBatchingSystem::new(true);
        render.add_agent(Box::new(SpriteRenderAgent::new()));
        render.add_agent(Box::new(TextRenderAgent::new()));
        render.add_agent(Box::new(ParticleRenderAgent::new()));
        render.add_agent(Box::new(IconRenderAgent::new()));

        Self {
            world: World::new(),
            scene: EditorScene::new(config.pixels_per_unit, &config.layer_names),
            selection: SelectionManager::new(),
            undo: UndoModule::new(config.undo_limit),
            events: EventBus::new(),
            status: StatusBar::new(),
            render,
            ids: IdManager::new(),
            cameras: CameraManager::new(config.viewport.width, config.viewport.height, config.pixels_per_unit),
            assets: MemoryAssets::new(),
        }
    }

    /// Create an empty scene with the given layers and default settings
    pub fn headless<S: AsRef<str>>(layer_names: &[S]) -> Self {
        let config = EditorConfig {
            layer_names: layer_names.iter().map(|name| name.as_ref().to_owned()).collect(),
            ..EditorConfig::default()
        };
        Self::new(&config)
    }

    fn parts(&mut self) -> (&mut SelectionManager, EditContext<'_>, &MemoryAssets) {
        let ctx = EditContext {
            world: &mut self.world,
            scene: &mut self.scene,
            undo: &mut self.undo,
            events: &mut self.events,
            status: &mut self.status,
        };
        (&mut self.selection, ctx, &self.assets)
    }

    fn run<T>(
        &mut self,
        operation: impl FnOnce(&mut SelectionManager, &mut EditContext<'_>) -> EditorResult<T>,
    ) -> EditorResult<T> {
        let (selection, mut ctx, _) = self.parts();
        let result = operation(selection, &mut ctx);
        let settled = self.settle();
        let value = result?;
        settled?;
        Ok(value)
    }

    fn settle(&mut self) -> EditorResult<()> {
        self.sync()?;
        self.dispatch_events()
    }

    /// Deliver pending world changes to the runtime systems
    ///
    /// Removals are handled before additions so an entity that left and came
    /// back within one flush keeps its render jobs.
    pub fn sync(&mut self) -> EditorResult<()> {
        let changes = self.world.flush_changes();
        if changes.is_empty() {
            return Ok(());
        }

        self.render.entities_removed(&mut self.world, &changes.removed)?;
        self.ids.entities_removed(&mut self.world, &changes.removed)?;

        ShaderInflater::new(&self.assets).entities_added(&mut self.world, &changes.added)?;
        ParticleInflater::new(&self.assets, self.scene.pixels_per_unit)
            .entities_added(&mut self.world, &changes.added)?;
        self.render.entities_added(&mut self.world, &changes.added)?;
        self.ids.entities_added(&mut self.world, &changes.added)?;
        Ok(())
    }

    /// Handle queued events, then forward them to the registered handlers
    pub fn dispatch_events(&mut self) -> EditorResult<()> {
        while self.events.pending() > 0 {
            for event in self.events.drain() {
                self.handle_event(&event);
                self.events.notify_handlers(&event);
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &EditorEvent) {
        let pixels_per_unit = self.scene.pixels_per_unit;
        match event {
            EditorEvent::Undo { .. } | EditorEvent::Redo { .. } => {
                self.render.mark_dirty();
                let (selection, mut ctx, _) = self.parts();
                selection.prune_dead(&mut ctx);
            }
            EditorEvent::RenderOrderChanged => self.render.mark_dirty(),
            EditorEvent::ActiveLayerChanged { layer_id } => log::debug!("Active layer is now {layer_id}"),
            EditorEvent::TexturesReloaded => {
                reload_textures(&mut self.world, &self.assets);
            }
            EditorEvent::ParticlesReloaded => {
                reload_particles(&mut self.world, &self.assets, pixels_per_unit);
            }
            EditorEvent::FontsReloaded(kinds) => {
                reload_fonts(&mut self.world, &self.assets, pixels_per_unit, *kinds);
            }
            EditorEvent::ShadersReloaded => {
                reload_shaders(&mut self.world, &self.assets);
            }
        }
    }

    /// Queue an event and handle it right away
    pub fn send_event(&mut self, event: EditorEvent) -> EditorResult<()> {
        self.events.send(event);
        self.dispatch_events()
    }

    /// Add an entity outside of the undo history, e.g. while loading a scene
    pub fn spawn(&mut self, prototype: &EntityPrototype) -> EditorResult<Entity> {
        let entity = prototype.build(&mut self.world)?;
        self.sync()?;
        Ok(entity)
    }

    /// Look up an entity by its string id
    pub fn entity_by_id(&self, id: &str) -> EditorResult<Entity> {
        Ok(self.ids.get(id)?)
    }

    /// Draw the scene through `batch`
    pub fn render_frame(&mut self, batch: &mut dyn Batch) -> EditorResult<()> {
        self.cameras.update();
        self.render.process(&self.world, &self.scene.layers, &mut self.cameras, batch)?;
        Ok(())
    }

    /// Revert the last action
    pub fn undo(&mut self) -> EditorResult<bool> {
        let undone = self.undo.undo(&mut self.world, &mut self.events);
        self.settle()?;
        undone
    }

    /// Apply the last reverted action again
    pub fn redo(&mut self) -> EditorResult<bool> {
        let redone = self.undo.redo(&mut self.world, &mut self.events);
        self.settle()?;
        redone
    }

    /// See [`SelectionManager::select`]
    pub fn select(&mut self, proxy: EntityProxy) -> EditorResult<()> {
        self.run(|selection, ctx| selection.select(ctx, proxy))
    }

    /// See [`SelectionManager::select_append`]
    pub fn select_append(&mut self, proxy: EntityProxy) -> EditorResult<()> {
        self.run(|selection, ctx| selection.select_append(ctx, proxy))
    }

    /// See [`SelectionManager::select_all`]
    pub fn select_all(&mut self) -> EditorResult<()> {
        self.run(SelectionManager::select_all)
    }

    /// See [`SelectionManager::deselect`]
    pub fn deselect(&mut self, proxy: EntityProxy) {
        let (selection, mut ctx, _) = self.parts();
        selection.deselect(&mut ctx, proxy);
    }

    /// See [`SelectionManager::reset_selection`]
    pub fn reset_selection(&mut self) {
        let (selection, mut ctx, _) = self.parts();
        selection.reset_selection(&mut ctx);
    }

    /// See [`SelectionManager::group_selection`]
    pub fn group_selection(&mut self) -> EditorResult<()> {
        self.run(SelectionManager::group_selection)
    }

    /// See [`SelectionManager::ungroup_selection`]
    pub fn ungroup_selection(&mut self) -> EditorResult<()> {
        self.run(SelectionManager::ungroup_selection)
    }

    /// See [`SelectionManager::enter_group`]
    pub fn enter_group(&mut self) -> EditorResult<()> {
        self.run(SelectionManager::enter_group)
    }

    /// See [`SelectionManager::breadcrumb_clicked`]
    pub fn breadcrumb_clicked(&mut self, gid: vis_runtime::prelude::GroupId) -> EditorResult<()> {
        self.run(|selection, ctx| selection.breadcrumb_clicked(ctx, gid))
    }

    /// See [`SelectionManager::breadcrumb_root_clicked`]
    pub fn breadcrumb_root_clicked(&mut self) {
        let (selection, mut ctx, _) = self.parts();
        selection.breadcrumb_root_clicked(&mut ctx);
    }

    /// See [`SelectionManager::find_entity_base_group_and_select`]
    pub fn find_entity_base_group_and_select(&mut self, proxy: EntityProxy) -> EditorResult<()> {
        self.run(|selection, ctx| selection.find_entity_base_group_and_select(ctx, proxy))
    }

    /// See [`SelectionManager::copy`]
    pub fn copy(&mut self) -> EditorResult<()> {
        self.run(SelectionManager::copy)
    }

    /// See [`SelectionManager::paste`]
    pub fn paste(&mut self, x: f32, y: f32) -> EditorResult<()> {
        self.run(|selection, ctx| selection.paste(ctx, x, y))
    }

    /// See [`SelectionManager::cut`]
    pub fn cut(&mut self) -> EditorResult<()> {
        self.run(SelectionManager::cut)
    }

    /// See [`SelectionManager::delete_selected`]
    pub fn delete_selected(&mut self) -> EditorResult<()> {
        self.run(SelectionManager::delete_selected)
    }

    /// See [`SelectionManager::move_selected`]
    pub fn move_selected(&mut self, dx: f32, dy: f32) -> EditorResult<()> {
        self.run(|selection, ctx| selection.move_selected(ctx, dx, dy))
    }

    /// See [`SelectionManager::move_selected_z`]
    pub fn move_selected_z(&mut self, up: bool) -> EditorResult<()> {
        self.run(|selection, ctx| selection.move_selected_z(ctx, up))
    }

    /// See [`SelectionManager::process_drop`]
    pub fn process_drop(&mut self, asset: &AssetDescriptor, x: f32, y: f32) -> EditorResult<Option<Entity>> {
        let (selection, mut ctx, assets) = self.parts();
        let result = selection.process_drop(&mut ctx, assets, asset, x, y);
        let settled = self.settle();
        let entity = result?;
        settled?;
        Ok(entity)
    }
}
