//! Selection, group context and the operations applied to the selection

pub mod breadcrumb;
pub mod manager;
mod editing;

pub use breadcrumb::GroupBreadcrumb;
pub use manager::{SelectionManager, SelectionObserver};
pub(crate) use manager::LAYER_LOCKED;
