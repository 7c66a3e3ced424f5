//! Layer descriptors, lifecycle management and filter dispatch.
//!
//! The rendering library sits behind the `MapBackend` trait; everything
//! in this crate manipulates descriptors and backend handles, never
//! rendering objects directly.

pub mod backend;
pub mod descriptor;
pub mod filter;
pub mod headless;
pub mod manager;
pub mod parametrized;
pub mod style;

pub use backend::{BackendError, LayerHandle, LayerSource, MapBackend, WfsUrlTemplate};
pub use descriptor::{LayerDescriptor, LayerKind};
pub use filter::FilterState;
pub use manager::{ActiveLayer, Generation, LayerManager};
pub use style::StyleRule;
