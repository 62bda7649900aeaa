//! # Render Batching System
//!
//! Draws entities through pluggable rendering agents, sorted by layer and then
//! z-index. Each (entity, agent) pair is a render job. The job list is only
//! resorted when it is dirty: after a registration, an unregistration or an
//! explicit [`RenderBatchingSystem::mark_dirty`], which callers must issue
//! whenever they change a layer id or a z-index.
//!
//! While walking the jobs the system keeps track of the active agent, the
//! active coordinate space and the shader state:
//! - when the agent changes the previous agent is ended and the next one begun
//! - an entity with a shader suspends the batch, swaps the shader in and
//!   clears it again after drawing
//! - outside the editor a change of coordinate space swaps the projection
//!   between the world and the UI camera
//!
//! Inside the editor the host owns the batch: the system neither begins nor
//! ends it and always draws in world space.

use thiserror::Error;

use crate::ecs::components::{LayerComponent, RenderableComponent, ShaderComponent};
use crate::ecs::{Entity, World, WorldObserver};
use crate::render::{Batch, CameraManager};
use crate::scene::{CoordinateSpace, LayerLookup};

/// Errors raised by the render batching system
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Jobs need both a renderable and a layer component
    #[error("Entity {entity:?} cannot be rendered by {agent}: it has no {component}")]
    MissingComponent {
        /// Entity being registered
        entity: Entity,
        /// Agent the job was registered for
        agent: &'static str,
        /// Missing component type
        component: &'static str,
    },

    /// No agent was added under this id
    #[error("Unknown render agent {0:?}")]
    UnknownAgent(AgentId),

    /// A job references a layer the scene does not have
    #[error("Layer {layer_id} of entity {entity:?} does not exist")]
    UnknownLayer {
        /// Entity being drawn
        entity: Entity,
        /// Layer id it references
        layer_id: u32,
    },
}

/// Handle of an agent added to a [`RenderBatchingSystem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(usize);

/// Draws one kind of entity
pub trait RenderAgent {
    /// Name used in logs and errors
    fn name(&self) -> &'static str;

    /// Check whether this agent draws `entity`
    fn accepts(&self, world: &World, entity: Entity) -> bool;

    /// Called before the first job of a run of jobs using this agent
    fn begin(&mut self, batch: &mut dyn Batch) {
        let _ = batch;
    }

    /// Called after the last job of a run of jobs using this agent
    fn end(&mut self, batch: &mut dyn Batch) {
        let _ = batch;
    }

    /// Draw one entity
    fn process(&mut self, world: &World, batch: &mut dyn Batch, entity: Entity);
}

/// Registered (entity, agent) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderJob {
    /// Entity to draw
    pub entity: Entity,
    /// Agent drawing it
    pub agent: AgentId,
    sequence: u64,
    layer_id: u32,
    z_index: i32,
}

impl RenderJob {
    /// Layer id as of the last sort
    pub fn layer_id(&self) -> u32 {
        self.layer_id
    }

    /// Z-index as of the last sort
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    fn sort_key(&self) -> (u32, i32, u64) {
        (self.layer_id, self.z_index, self.sequence)
    }
}

/// Counters of the last processed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Jobs walked
    pub jobs: usize,
    /// Agent begin/end transitions
    pub agent_switches: usize,
    /// Jobs drawn with a custom shader
    pub shader_swaps: usize,
    /// Projection changes caused by coordinate space changes
    pub projection_swaps: usize,
    /// Whether the frame resorted the jobs
    pub resorted: bool,
}

/// Sorted job list dispatching entities to rendering agents
pub struct RenderBatchingSystem {
    agents: Vec<Box<dyn RenderAgent>>,
    jobs: Vec<RenderJob>,
    next_sequence: u64,
    dirty: bool,
    editor_mode: bool,
    stats: RenderStats,
}

impl RenderBatchingSystem {
    /// Create a new system; `editor_mode` leaves batch begin/end to the host
    pub fn new(editor_mode: bool) -> Self {
        Self {
            agents: Vec::new(),
            jobs: Vec::new(),
            next_sequence: 0,
            dirty: false,
            editor_mode,
            stats: RenderStats::default(),
        }
    }

    /// Add a rendering agent
    pub fn add_agent(&mut self, agent: Box<dyn RenderAgent>) -> AgentId {
        log::debug!("Render agent '{}' added", agent.name());
        self.agents.push(agent);
        AgentId(self.agents.len() - 1)
    }

    /// Agent by id
    pub fn agent(&self, id: AgentId) -> Option<&dyn RenderAgent> {
        self.agents.get(id.0).map(|agent| &**agent)
    }

    /// Declare `entity` relevant for `agent`
    ///
    /// The entity must carry a renderable and a layer component. Registering
    /// the same pair twice has no effect.
    pub fn register(&mut self, world: &World, entity: Entity, agent: AgentId) -> Result<(), RenderError> {
        let name = self.agent(agent).ok_or(RenderError::UnknownAgent(agent))?.name();
        let missing = |component| RenderError::MissingComponent { entity, agent: name, component };

        let renderable = world
            .get_component::<RenderableComponent>(entity)
            .ok_or_else(|| missing("RenderableComponent"))?;
        let layer = world
            .get_component::<LayerComponent>(entity)
            .ok_or_else(|| missing("LayerComponent"))?;

        if self.jobs.iter().any(|job| job.entity == entity && job.agent == agent) {
            return Ok(());
        }

        self.jobs.push(RenderJob {
            entity,
            agent,
            sequence: self.next_sequence,
            layer_id: layer.layer_id,
            z_index: renderable.z_index,
        });
        self.next_sequence += 1;
        self.dirty = true;
        Ok(())
    }

    /// Revoke relevancy of `entity` for `agent`
    pub fn unregister(&mut self, entity: Entity, agent: AgentId) -> bool {
        let Some(index) = self.jobs.iter().position(|job| job.entity == entity && job.agent == agent) else {
            return false;
        };
        self.jobs.remove(index);
        self.dirty = true;
        true
    }

    /// Drop every job of `entity`, returning how many were removed
    pub fn unregister_entity(&mut self, entity: Entity) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|job| job.entity != entity);
        let removed = before - self.jobs.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Request a resort before the next frame
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check whether the next frame resorts
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the system runs inside the editor
    pub fn editor_mode(&self) -> bool {
        self.editor_mode
    }

    /// Jobs in their current order
    pub fn jobs(&self) -> &[RenderJob] {
        &self.jobs
    }

    /// Counters of the last frame
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Refresh sort keys from the world and sort the jobs
    ///
    /// Jobs of entities that are no longer alive are dropped. A job whose
    /// entity lost its layer or renderable keeps its previous key.
    pub fn resort(&mut self, world: &World) {
        let before = self.jobs.len();
        self.jobs.retain(|job| world.is_alive(job.entity));
        if self.jobs.len() != before {
            log::warn!("Dropped {} render jobs of dead entities", before - self.jobs.len());
        }

        for job in &mut self.jobs {
            match world.get_component::<LayerComponent>(job.entity) {
                Some(layer) => job.layer_id = layer.layer_id,
                None => log::warn!(
                    "Render job {:?} lost its LayerComponent, keeping layer {}",
                    job.entity,
                    job.layer_id
                ),
            }
            match world.get_component::<RenderableComponent>(job.entity) {
                Some(renderable) => job.z_index = renderable.z_index,
                None => log::warn!(
                    "Render job {:?} lost its RenderableComponent, keeping z-index {}",
                    job.entity,
                    job.z_index
                ),
            }
        }

        self.jobs.sort_by_key(RenderJob::sort_key);
        self.dirty = false;
        log::debug!("Resorted {} render jobs", self.jobs.len());
    }

    /// Draw one frame
    pub fn process(
        &mut self,
        world: &World,
        layers: &dyn LayerLookup,
        cameras: &mut CameraManager,
        batch: &mut dyn Batch,
    ) -> Result<(), RenderError> {
        cameras.update();

        let mut stats = RenderStats::default();
        if self.dirty {
            self.resort(world);
            stats.resorted = true;
        }

        // resolve coordinate spaces up front so a missing layer leaves the batch untouched
        let spaces = if self.editor_mode {
            Vec::new()
        } else {
            self.jobs
                .iter()
                .map(|job| {
                    layers
                        .layer(job.layer_id)
                        .map(|layer| layer.coordinate_space)
                        .ok_or(RenderError::UnknownLayer { entity: job.entity, layer_id: job.layer_id })
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut active_space = CoordinateSpace::World;
        batch.set_projection_matrix(cameras.combined());
        if !self.editor_mode {
            batch.begin();
        }

        let Self { agents, jobs, .. } = &mut *self;
        let mut active_agent: Option<AgentId> = None;

        for (index, job) in jobs.iter().enumerate() {
            if active_agent != Some(job.agent) {
                if let Some(previous) = active_agent {
                    agents[previous.0].end(batch);
                }
                agents[job.agent.0].begin(batch);
                active_agent = Some(job.agent);
                stats.agent_switches += 1;
            }

            let shader = world.get_component::<ShaderComponent>(job.entity);
            if let Some(shader) = shader {
                batch.end();
                batch.set_shader(shader.shader.as_ref());
                stats.shader_swaps += 1;
            }

            if let Some(space) = spaces.get(index).copied() {
                if space != active_space {
                    active_space = space;
                    match space {
                        CoordinateSpace::World => batch.set_projection_matrix(cameras.combined()),
                        CoordinateSpace::Screen => batch.set_projection_matrix(cameras.ui_combined()),
                    }
                    stats.projection_swaps += 1;
                }
            }

            if shader.is_some() {
                batch.begin();
            }

            agents[job.agent.0].process(world, batch, job.entity);

            if shader.is_some() {
                batch.set_shader(None);
            }
        }

        if let Some(last) = active_agent {
            agents[last.0].end(batch);
        }

        if !self.editor_mode {
            batch.end();
        }

        stats.jobs = self.jobs.len();
        self.stats = stats;
        Ok(())
    }
}

impl WorldObserver for RenderBatchingSystem {
    type Error = RenderError;

    fn entities_added(&mut self, world: &mut World, entities: &[Entity]) -> Result<(), RenderError> {
        for &entity in entities {
            let accepting: Vec<AgentId> = self
                .agents
                .iter()
                .enumerate()
                .filter(|(_, agent)| agent.accepts(world, entity))
                .map(|(index, _)| AgentId(index))
                .collect();

            for agent in accepting {
                self.register(world, entity, agent)?;
            }
        }
        Ok(())
    }

    fn entities_removed(&mut self, _world: &mut World, entities: &[Entity]) -> Result<(), RenderError> {
        for &entity in entities {
            self.unregister_entity(entity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetDescriptor, ShaderHandle};
    use crate::ecs::components::PositionComponent;
    use crate::foundation::math::Rect;
    use crate::render::{BatchCall, DrawItem, DrawKind, RecordingBatch};
    use crate::scene::{Layer, LayerManager};

    struct MarkerAgent {
        name: &'static str,
    }

    impl RenderAgent for MarkerAgent {
        fn name(&self) -> &'static str {
            self.name
        }

        fn accepts(&self, world: &World, entity: Entity) -> bool {
            world.has_component::<PositionComponent>(entity)
        }

        fn process(&mut self, _world: &World, batch: &mut dyn Batch, entity: Entity) {
            batch.draw(DrawItem {
                entity,
                kind: DrawKind::Sprite { region: self.name.to_owned() },
                bounds: Rect::default(),
            });
        }
    }

    fn marker(name: &'static str) -> Box<dyn RenderAgent> {
        Box::new(MarkerAgent { name })
    }

    fn spawn(world: &mut World, layer_id: u32, z_index: i32) -> Entity {
        let entity = world.create_entity();
        world.add_component(entity, PositionComponent::default()).unwrap();
        world.add_component(entity, RenderableComponent::new(z_index)).unwrap();
        world.add_component(entity, LayerComponent::new(layer_id)).unwrap();
        entity
    }

    fn two_layers() -> LayerManager {
        let mut layers = LayerManager::new();
        layers.add_layer("Background");
        layers.add_layer("Foreground");
        layers
    }

    fn frame(system: &mut RenderBatchingSystem, world: &World, layers: &LayerManager) -> RecordingBatch {
        let mut cameras = CameraManager::new(800.0, 600.0, 100.0);
        let mut batch = RecordingBatch::new();
        system.process(world, layers, &mut cameras, &mut batch).unwrap();
        batch
    }

    #[test]
    fn test_sorts_by_layer_then_z_index() {
        let mut world = World::new();
        let a = spawn(&mut world, 0, 0);
        let b = spawn(&mut world, 0, 5);
        let c = spawn(&mut world, 1, -1);

        let mut system = RenderBatchingSystem::new(false);
        let agent = system.add_agent(marker("sprites"));
        system.register(&world, a, agent).unwrap();
        system.register(&world, c, agent).unwrap();
        system.register(&world, b, agent).unwrap();
        assert!(system.is_dirty());

        let batch = frame(&mut system, &world, &two_layers());
        assert_eq!(batch.drawn_entities(), vec![a, b, c]);
        assert!(!system.is_dirty());
        assert!(system.stats().resorted);
    }

    #[test]
    fn test_equal_keys_keep_registration_order() {
        let mut world = World::new();
        let entities: Vec<Entity> = (0..4).map(|_| spawn(&mut world, 0, 1)).collect();

        let mut system = RenderBatchingSystem::new(false);
        let agent = system.add_agent(marker("sprites"));
        for entity in entities.iter().rev() {
            system.register(&world, *entity, agent).unwrap();
        }

        system.resort(&world);
        let order: Vec<Entity> = system.jobs().iter().map(|job| job.entity).collect();
        assert_eq!(order, entities.iter().rev().copied().collect::<Vec<_>>());
    }

    #[test]
    fn test_resort_picks_up_z_index_changes() {
        let mut world = World::new();
        let a = spawn(&mut world, 0, 0);
        let b = spawn(&mut world, 0, 1);

        let mut system = RenderBatchingSystem::new(false);
        let agent = system.add_agent(marker("sprites"));
        system.register(&world, a, agent).unwrap();
        system.register(&world, b, agent).unwrap();
        system.resort(&world);

        world.get_component_mut::<RenderableComponent>(a).unwrap().z_index = 10;
        // without mark_dirty the cached order is kept
        assert_eq!(frame(&mut system, &world, &two_layers()).drawn_entities(), vec![a, b]);

        system.mark_dirty();
        assert_eq!(frame(&mut system, &world, &two_layers()).drawn_entities(), vec![b, a]);
    }

    #[test]
    fn test_resort_keeps_key_of_stripped_entity() {
        let mut world = World::new();
        let a = spawn(&mut world, 1, 3);
        let b = spawn(&mut world, 0, 0);

        let mut system = RenderBatchingSystem::new(false);
        let agent = system.add_agent(marker("sprites"));
        system.register(&world, a, agent).unwrap();
        system.register(&world, b, agent).unwrap();

        world.remove_component::<LayerComponent>(a);
        world.remove_component::<RenderableComponent>(a);
        system.resort(&world);

        let keys: Vec<(Entity, u32, i32)> =
            system.jobs().iter().map(|job| (job.entity, job.layer_id(), job.z_index())).collect();
        assert_eq!(keys, vec![(b, 0, 0), (a, 1, 3)]);
    }

    #[test]
    fn test_register_requires_renderable_and_layer() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, LayerComponent::new(0)).unwrap();

        let mut system = RenderBatchingSystem::new(false);
        let agent = system.add_agent(marker("sprites"));
        assert_eq!(
            system.register(&world, entity, agent),
            Err(RenderError::MissingComponent { entity, agent: "sprites", component: "RenderableComponent" })
        );

        world.remove_component::<LayerComponent>(entity);
        world.add_component(entity, RenderableComponent::new(0)).unwrap();
        assert!(matches!(
            system.register(&world, entity, agent),
            Err(RenderError::MissingComponent { component: "LayerComponent", .. })
        ));
        assert!(system.jobs().is_empty());
        assert!(!system.is_dirty());
    }

    #[test]
    fn test_unregister_marks_dirty() {
        let mut world = World::new();
        let entity = spawn(&mut world, 0, 0);

        let mut system = RenderBatchingSystem::new(false);
        let agent = system.add_agent(marker("sprites"));
        system.register(&world, entity, agent).unwrap();
        system.register(&world, entity, agent).unwrap();
        assert_eq!(system.jobs().len(), 1);
        system.resort(&world);

        assert!(system.unregister(entity, agent));
        assert!(system.is_dirty());
        assert!(!system.unregister(entity, agent));
    }

    #[test]
    fn test_agent_transitions() {
        let mut world = World::new();
        let a = spawn(&mut world, 0, 0);
        let b = spawn(&mut world, 0, 1);

        let mut system = RenderBatchingSystem::new(false);
        let sprites = system.add_agent(marker("sprites"));
        let text = system.add_agent(marker("text"));
        system.register(&world, a, sprites).unwrap();
        system.register(&world, b, text).unwrap();

        frame(&mut system, &world, &two_layers());
        assert_eq!(system.stats().agent_switches, 2);
        assert_eq!(system.stats().jobs, 2);
    }

    #[test]
    fn test_shader_suspends_batch() {
        let mut world = World::new();
        let entity = spawn(&mut world, 0, 0);
        let shader = ShaderHandle { name: "outline".into(), generation: 0 };
        world
            .add_component(
                entity,
                ShaderComponent {
                    asset: AssetDescriptor::Shader { vertex: "a.vert".into(), fragment: "a.frag".into() },
                    shader: Some(shader),
                },
            )
            .unwrap();

        let mut system = RenderBatchingSystem::new(false);
        let agent = system.add_agent(marker("sprites"));
        system.register(&world, entity, agent).unwrap();

        let batch = frame(&mut system, &world, &two_layers());
        let calls: Vec<&BatchCall> = batch
            .calls()
            .iter()
            .filter(|call| !matches!(call, BatchCall::Projection(_)))
            .collect();
        assert!(matches!(
            calls.as_slice(),
            [
                BatchCall::Begin,
                BatchCall::End,
                BatchCall::Shader(Some(name)),
                BatchCall::Begin,
                BatchCall::Draw(_),
                BatchCall::Shader(None),
                BatchCall::End,
            ] if name == "outline"
        ));
    }

    #[test]
    fn test_screen_layer_swaps_projection() {
        let mut world = World::new();
        let world_entity = spawn(&mut world, 0, 0);
        let hud_entity = spawn(&mut world, 1, 0);

        let mut layers = LayerManager::new();
        layers.insert(Layer::new(0, "World"));
        let mut hud = Layer::new(1, "HUD");
        hud.coordinate_space = CoordinateSpace::Screen;
        layers.insert(hud);

        let mut system = RenderBatchingSystem::new(false);
        let agent = system.add_agent(marker("sprites"));
        system.register(&world, world_entity, agent).unwrap();
        system.register(&world, hud_entity, agent).unwrap();

        let mut cameras = CameraManager::new(800.0, 600.0, 100.0);
        let mut batch = RecordingBatch::new();
        system.process(&world, &layers, &mut cameras, &mut batch).unwrap();

        assert_eq!(system.stats().projection_swaps, 1);
        let projections: Vec<&BatchCall> =
            batch.calls().iter().filter(|call| matches!(call, BatchCall::Projection(_))).collect();
        assert_eq!(projections.len(), 2);
        assert_eq!(projections[1], &BatchCall::Projection(*cameras.ui_combined()));
    }

    #[test]
    fn test_editor_mode_leaves_batch_to_host() {
        let mut world = World::new();
        let entity = spawn(&mut world, 5, 0);

        let mut system = RenderBatchingSystem::new(true);
        let agent = system.add_agent(marker("sprites"));
        system.register(&world, entity, agent).unwrap();

        // layer 5 does not exist, which only matters outside the editor
        let mut batch = RecordingBatch::new();
        batch.begin();
        let mut cameras = CameraManager::new(800.0, 600.0, 100.0);
        system.process(&world, &LayerManager::new(), &mut cameras, &mut batch).unwrap();

        assert!(batch.is_drawing());
        assert_eq!(system.stats().projection_swaps, 0);
        assert_eq!(batch.drawn_entities(), vec![entity]);
    }

    #[test]
    fn test_unknown_layer_outside_editor() {
        let mut world = World::new();
        let entity = spawn(&mut world, 9, 0);

        let mut system = RenderBatchingSystem::new(false);
        let agent = system.add_agent(marker("sprites"));
        system.register(&world, entity, agent).unwrap();

        let mut cameras = CameraManager::new(800.0, 600.0, 100.0);
        let mut batch = RecordingBatch::new();
        let result = system.process(&world, &two_layers(), &mut cameras, &mut batch);
        assert_eq!(result, Err(RenderError::UnknownLayer { entity, layer_id: 9 }));
        assert!(batch.calls().is_empty());
    }

    #[test]
    fn test_observer_tracks_world_changes() {
        let mut world = World::new();
        let entity = spawn(&mut world, 0, 0);
        let bare = world.create_entity();

        let mut system = RenderBatchingSystem::new(false);
        system.add_agent(marker("sprites"));

        let changes = world.flush_changes();
        system.entities_added(&mut world, &changes.added).unwrap();
        assert_eq!(system.jobs().len(), 1);
        assert_eq!(system.jobs()[0].entity, entity);

        world.destroy_entity(entity).unwrap();
        world.destroy_entity(bare).unwrap();
        let changes = world.flush_changes();
        system.entities_removed(&mut world, &changes.removed).unwrap();
        assert!(system.jobs().is_empty());
    }
}
