//! Record-keeping backend with no renderer attached.
//!
//! Used by tests and by the headless viewer binary. Layers, sources,
//! styles and the popup are tracked faithfully; `feature_at_pixel`
//! answers from planted features since there is no rasterized geometry
//! to hit-test against.

use std::collections::BTreeMap;

use foundation::screen::{Coordinate, Pixel};
use protocol::Feature;

use crate::backend::{LayerHandle, LayerSource, MapBackend};
use crate::descriptor::LayerKind;
use crate::style::StyleRule;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Create(LayerHandle),
    Remove(LayerHandle),
    SetVisible(LayerHandle, bool),
    ReplaceSource(LayerHandle),
    ReplaceStyle(LayerHandle),
    Refresh(LayerHandle),
    ShowPopup,
    DismissPopup,
}

#[derive(Debug, Clone)]
pub struct HeadlessLayer {
    pub kind: LayerKind,
    pub name: String,
    pub source: LayerSource,
    pub style: Option<StyleRule>,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct HeadlessBackend {
    layers: BTreeMap<u64, HeadlessLayer>,
    next_handle: u64,
    resolution: f64,
    popup: Option<(Coordinate, String)>,
    planted: Vec<Feature>,
    calls: Vec<BackendCall>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            resolution: 1.0,
            ..Self::default()
        }
    }

    pub fn with_resolution(resolution: f64) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    pub fn layer(&self, handle: LayerHandle) -> Option<&HeadlessLayer> {
        self.layers.get(&handle.0)
    }

    pub fn source(&self, handle: LayerHandle) -> Option<&LayerSource> {
        self.layers.get(&handle.0).map(|l| &l.source)
    }

    pub fn popup(&self) -> Option<&(Coordinate, String)> {
        self.popup.as_ref()
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Queue a feature that `feature_at_pixel` will report, front first.
    pub fn plant_feature(&mut self, feature: Feature) {
        self.planted.push(feature);
    }

    pub fn show_popup_for_test(&mut self, at: Coordinate, content: &str) {
        self.show_popup(at, content);
    }
}

impl MapBackend for HeadlessBackend {
    fn create_layer(
        &mut self,
        kind: LayerKind,
        name: &str,
        source: LayerSource,
        style: Option<&StyleRule>,
    ) -> LayerHandle {
        let handle = LayerHandle(self.next_handle);
        self.next_handle += 1;
        self.layers.insert(
            handle.0,
            HeadlessLayer {
                kind,
                name: name.to_string(),
                source,
                style: style.cloned(),
                visible: false,
            },
        );
        self.calls.push(BackendCall::Create(handle));
        handle
    }

    fn remove_layer(&mut self, handle: LayerHandle) {
        self.layers.remove(&handle.0);
        self.calls.push(BackendCall::Remove(handle));
    }

    fn set_visible(&mut self, handle: LayerHandle, visible: bool) {
        if let Some(layer) = self.layers.get_mut(&handle.0) {
            layer.visible = visible;
        }
        self.calls.push(BackendCall::SetVisible(handle, visible));
    }

    fn replace_source(&mut self, handle: LayerHandle, source: LayerSource) {
        if let Some(layer) = self.layers.get_mut(&handle.0) {
            layer.source = source;
        }
        self.calls.push(BackendCall::ReplaceSource(handle));
    }

    fn replace_style(&mut self, handle: LayerHandle, style: &StyleRule) {
        if let Some(layer) = self.layers.get_mut(&handle.0) {
            layer.style = Some(style.clone());
        }
        self.calls.push(BackendCall::ReplaceStyle(handle));
    }

    fn refresh(&mut self, handle: LayerHandle) {
        self.calls.push(BackendCall::Refresh(handle));
    }

    fn feature_at_pixel(&self, _pixel: Pixel) -> Option<Feature> {
        self.planted.first().cloned()
    }

    fn view_resolution(&self) -> f64 {
        self.resolution
    }

    fn show_popup(&mut self, at: Coordinate, content: &str) {
        self.popup = Some((at, content.to_string()));
        self.calls.push(BackendCall::ShowPopup);
    }

    fn dismiss_popup(&mut self) {
        self.popup = None;
        self.calls.push(BackendCall::DismissPopup);
    }
}
