//! Seam between the viewer core and the rendering library.
//!
//! The backend owns the map canvas, layer rendering and the popup
//! overlay. The core only drives it through handles; no descriptor
//! state is stashed on rendering objects.

use foundation::extent::MapExtent;
use foundation::screen::{Coordinate, Pixel};
use protocol::{Feature, QueryParams, ServerEndpoint};

use crate::descriptor::LayerKind;
use crate::style::StyleRule;

/// Opaque handle to a layer instantiated by the backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerHandle(pub u64);

/// URL factory for a bbox-strategy WFS source; the backend calls
/// `url_for` each time it loads features for an extent.
#[derive(Debug, Clone, PartialEq)]
pub struct WfsUrlTemplate {
    endpoint: ServerEndpoint,
    layer: String,
    params: QueryParams,
}

impl WfsUrlTemplate {
    pub fn new(endpoint: ServerEndpoint, layer: impl Into<String>, params: QueryParams) -> Self {
        Self {
            endpoint,
            layer: layer.into(),
            params,
        }
    }

    pub fn url_for(&self, extent: MapExtent) -> String {
        self.endpoint
            .wfs_get_feature_url(&self.layer, &self.params, extent)
    }
}

/// What a layer renders from.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSource {
    /// The base street-map tiles; always index 0 of the stack.
    BaseTiles,
    /// WMS tile source: base URL plus GetMap query parameters.
    WmsTile {
        url: String,
        params: Vec<(String, String)>,
    },
    /// WFS vector source loaded with the bbox strategy.
    WfsBbox(WfsUrlTemplate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    UnknownLayer(String),
    DuplicateLayer(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::UnknownLayer(name) => write!(f, "no layer named {name:?}"),
            BackendError::DuplicateLayer(name) => {
                write!(f, "layer named {name:?} already on the map")
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// Rendering-library primitives the core calls.
pub trait MapBackend {
    fn create_layer(
        &mut self,
        kind: LayerKind,
        name: &str,
        source: LayerSource,
        style: Option<&StyleRule>,
    ) -> LayerHandle;

    fn remove_layer(&mut self, handle: LayerHandle);

    fn set_visible(&mut self, handle: LayerHandle, visible: bool);

    fn replace_source(&mut self, handle: LayerHandle, source: LayerSource);

    fn replace_style(&mut self, handle: LayerHandle, style: &StyleRule);

    /// Drop loaded data and re-fetch from the current source.
    fn refresh(&mut self, handle: LayerHandle);

    /// First rendered feature whose geometry covers the pixel, topmost
    /// first. Synchronous: the renderer already has the data.
    fn feature_at_pixel(&self, pixel: Pixel) -> Option<Feature>;

    /// Current view resolution in map units per pixel.
    fn view_resolution(&self) -> f64;

    fn show_popup(&mut self, at: Coordinate, content: &str);

    /// Clear the popup position; a no-op when none is open.
    fn dismiss_popup(&mut self);
}
