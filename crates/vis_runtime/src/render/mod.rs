//! Rendering seam
//!
//! The runtime never talks to a GPU. Draw calls go through the [`Batch`]
//! trait, implemented by the host renderer, and projection matrices come from
//! the [`CameraManager`].

pub mod batch;
pub mod camera;

pub use batch::{Batch, BatchCall, DrawItem, DrawKind, IconKind, RecordingBatch};
pub use camera::{CameraManager, OrthographicCamera};
