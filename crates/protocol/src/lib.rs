//! OGC request plumbing for the viewer core.
//!
//! This crate owns the query-parameter model, the `viewparams` encoding,
//! WFS/WMS URL construction, and the GeoJSON response types. Everything
//! here is pure string/value manipulation; the network lives elsewhere.

pub mod feature;
pub mod params;
pub mod urls;
pub mod viewparams;

pub use feature::{Feature, FeatureCollection};
pub use params::{ParamValue, QueryParams};
pub use urls::{ProbeWindow, ServerEndpoint};
