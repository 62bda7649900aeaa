//! Runtime components
//!
//! Plain data attached to scene entities. Editor-only state (selection, group
//! context) lives in the editor crate; everything here is also used when a
//! scene runs outside the editor.

pub mod position;
pub mod renderable;
pub mod group;
pub mod sprite;
pub mod particle;
pub mod audio;
pub mod shader;
pub mod asset;

pub use position::PositionComponent;
pub use renderable::{InvisibleComponent, LayerComponent, RenderableComponent};
pub use group::{GroupComponent, GroupId};
pub use sprite::{SpriteComponent, TextComponent};
pub use particle::{ParticleComponent, ParticleProtoComponent};
pub use audio::{MusicComponent, SoundComponent};
pub use shader::{ShaderComponent, ShaderProtoComponent};
pub use asset::{AssetComponent, IdComponent};

/// Side of the square icon drawn for sound and music entities, in world units
pub const ICON_SIZE: f32 = 0.76;
