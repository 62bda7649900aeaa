//! ECS Systems module

pub mod render_batching;
pub mod agents;
pub mod id_manager;
pub mod inflater;

pub use render_batching::{AgentId, RenderAgent, RenderBatchingSystem, RenderError, RenderJob, RenderStats};
pub use agents::{IconRenderAgent, ParticleRenderAgent, SpriteRenderAgent, TextRenderAgent};
pub use id_manager::{IdError, IdManager};
pub use inflater::{ParticleInflater, ShaderInflater};
