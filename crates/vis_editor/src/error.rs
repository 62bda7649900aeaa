//! Editor error type

use thiserror::Error;
use vis_runtime::prelude::{AssetError, ConfigError, EcsError, GroupId, IdError, RenderError};

/// Errors raised by editing operations
///
/// User mistakes such as grouping an empty selection are not errors; they are
/// reported on the status bar and the operation returns `Ok`.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Component store failure, usually a stale entity handle
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// Render job registration failure
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Asset lookup failure
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// Config or settings file failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// String id lookup failure
    #[error(transparent)]
    Id(#[from] IdError),

    /// A group was looked up that has no live members
    #[error("Group {0} has no members")]
    EmptyGroup(GroupId),

    /// A layer id that the scene does not have
    #[error("Layer {0} does not exist")]
    UnknownLayer(u32),
}

/// Result alias for editing operations
pub type EditorResult<T> = Result<T, EditorError>;
