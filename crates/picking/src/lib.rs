//! Click-to-feature resolution and popup formatting.

pub mod popup;
pub mod resolver;

pub use popup::format;
pub use resolver::{BoxFuture, ClickEvent, FeatureInfoProber, ProbeError, resolve};
