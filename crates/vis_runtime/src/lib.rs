//! # Vis Runtime
//!
//! Entity-component runtime backing 2D scenes built with the Vis editor.
//!
//! ## Features
//!
//! - **ECS Store**: Versioned entity handles with typed sparse component tables
//! - **Render Batching**: Pluggable rendering agents dispatched in layer/z-index order
//! - **Asset Inflating**: Prototype components resolved into live assets on insertion
//! - **Configuration**: TOML and RON backed config files
//!
//! ## Quick Start
//!
//! ```rust
//! use vis_runtime::prelude::*;
//!
//! let mut world = World::new();
//! let entity = world.create_entity();
//! world.add_component(entity, PositionComponent::new(1.0, 2.0)).unwrap();
//! world.add_component(entity, RenderableComponent::new(0)).unwrap();
//! world.add_component(entity, LayerComponent::new(0)).unwrap();
//!
//! let mut render = RenderBatchingSystem::new(false);
//! let sprites = render.add_agent(Box::new(SpriteRenderAgent::new()));
//! render.register(&world, entity, sprites).unwrap();
//! assert!(render.is_dirty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod assets;
pub mod render;
pub mod scene;

/// Common imports for runtime users
pub mod prelude {
    pub use crate::{
        assets::{
            AssetDescriptor, AssetError, FontCache, FontHandle, MemoryAssets, ParticleCache, ParticleEffectHandle,
            ShaderCache, ShaderHandle, TextureCache, TextureRegion,
        },
        config::{Config, ConfigError},
        ecs::{
            components::{
                AssetComponent, GroupComponent, GroupId, IdComponent, InvisibleComponent, LayerComponent,
                MusicComponent, ParticleComponent, ParticleProtoComponent, PositionComponent,
                RenderableComponent, ShaderComponent, ShaderProtoComponent, SoundComponent, SpriteComponent,
                TextComponent,
            },
            systems::{
                AgentId, IconRenderAgent, IdError, IdManager, ParticleInflater, ParticleRenderAgent, RenderAgent,
                RenderBatchingSystem, RenderError, RenderJob, ShaderInflater, SpriteRenderAgent, TextRenderAgent,
            },
            ChangeSet, Component, EcsError, Entity, EntityPrototype, World, WorldObserver,
        },
        foundation::math::{Mat4, Rect, Vec2},
        render::{Batch, BatchCall, CameraManager, DrawItem, DrawKind, IconKind, RecordingBatch},
        scene::{entity_bounds, CoordinateSpace, Layer, LayerLookup, LayerManager},
    };
}
