pub mod extent;
pub mod screen;
pub mod text;

// Foundation crate: small, well-tested primitives only.
pub use extent::*;
pub use screen::*;
