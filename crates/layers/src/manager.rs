//! Layer lifecycle: creation, parameter updates, visibility.
//!
//! The stack mirrors the backend's z-order. Index 0 is the base tile
//! layer; it never takes part in hit-testing and never changes.

use protocol::{QueryParams, ServerEndpoint};
use tracing::{info, warn};

use crate::backend::{BackendError, LayerHandle, LayerSource, MapBackend, WfsUrlTemplate};
use crate::descriptor::{LayerDescriptor, LayerKind};
use crate::style::StyleRule;

pub const BASE_LAYER_NAME: &str = "base";

/// Monotonically increasing filter-update counter. Responses tagged
/// with an older generation than the manager's current one are stale
/// and must be discarded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

/// One layer attached to the map.
#[derive(Debug, Clone)]
pub struct ActiveLayer {
    pub descriptor: LayerDescriptor,
    pub handle: LayerHandle,
    pub visible: bool,
}

pub struct LayerManager<B: MapBackend> {
    backend: B,
    endpoint: ServerEndpoint,
    stack: Vec<ActiveLayer>,
    generation: u64,
}

impl<B: MapBackend> LayerManager<B> {
    pub fn new(mut backend: B, endpoint: ServerEndpoint) -> Self {
        let base = LayerDescriptor::tile(BASE_LAYER_NAME, "Base map");
        let handle = backend.create_layer(LayerKind::Tile, BASE_LAYER_NAME, LayerSource::BaseTiles, None);
        backend.set_visible(handle, true);
        Self {
            backend,
            endpoint,
            stack: vec![ActiveLayer {
                descriptor: base,
                handle,
                visible: true,
            }],
            generation: 0,
        }
    }

    pub fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn layer(&self, name: &str) -> Option<&ActiveLayer> {
        self.stack.iter().find(|l| l.descriptor.name == name)
    }

    /// Active layers in z-order, base layer first.
    pub fn stack(&self) -> &[ActiveLayer] {
        &self.stack
    }

    /// Visible non-base layers in reverse stacking order: the topmost
    /// rendered layer comes first, which is the hit-test precedence.
    pub fn probe_order(&self) -> Vec<&ActiveLayer> {
        self.stack
            .iter()
            .skip(1)
            .filter(|l| l.visible)
            .rev()
            .collect()
    }

    /// Attaches a layer to the map, initially hidden.
    pub fn add_layer(&mut self, descriptor: LayerDescriptor) -> Result<LayerHandle, BackendError> {
        if self.layer(&descriptor.name).is_some() {
            return Err(BackendError::DuplicateLayer(descriptor.name));
        }
        warn_on_corrupt_params(&descriptor.name, &descriptor.params);

        let source = source_for(&self.endpoint, &descriptor);
        let handle = self.backend.create_layer(
            descriptor.kind,
            &descriptor.name,
            source,
            descriptor.style.as_ref(),
        );
        self.backend.set_visible(handle, false);
        info!(layer = %descriptor.name, kind = ?descriptor.kind, "layer added");

        self.stack.push(ActiveLayer {
            descriptor,
            handle,
            visible: false,
        });
        Ok(handle)
    }

    /// Merges `new_params` into the layer's stored parameters, rebuilds
    /// its source URL and forces a re-fetch.
    ///
    /// Vector layers keep their rendering object and only swap the
    /// source URL; tile and heat-map layers are removed and re-created
    /// (tile sources cache by URL template), preserving visibility and
    /// stack position.
    pub fn update_layer(
        &mut self,
        name: &str,
        new_params: &QueryParams,
        new_style: Option<StyleRule>,
    ) -> Result<(), BackendError> {
        let idx = self
            .stack
            .iter()
            .position(|l| l.descriptor.name == name)
            .ok_or_else(|| BackendError::UnknownLayer(name.to_string()))?;
        if idx == 0 {
            return Err(BackendError::UnknownLayer(name.to_string()));
        }

        {
            let d = &mut self.stack[idx].descriptor;
            d.params.merge(new_params);
            if let Some(style) = new_style {
                d.style = Some(style);
            }
        }

        let descriptor = self.stack[idx].descriptor.clone();
        warn_on_corrupt_params(&descriptor.name, &descriptor.params);
        let source = source_for(&self.endpoint, &descriptor);

        match descriptor.kind {
            LayerKind::Vector => {
                let handle = self.stack[idx].handle;
                self.backend.replace_source(handle, source);
                if let Some(style) = descriptor.style.as_ref() {
                    self.backend.replace_style(handle, style);
                }
                self.backend.refresh(handle);
            }
            LayerKind::Tile | LayerKind::Heatmap => {
                let visible = self.stack[idx].visible;
                self.backend.remove_layer(self.stack[idx].handle);
                let handle = self.backend.create_layer(
                    descriptor.kind,
                    &descriptor.name,
                    source,
                    descriptor.style.as_ref(),
                );
                self.backend.set_visible(handle, visible);
                self.stack[idx].handle = handle;
            }
        }

        info!(layer = %name, "layer source updated");
        Ok(())
    }

    /// Toggles display. Any open popup is dismissed synchronously:
    /// whatever it showed may refer to a feature that is no longer
    /// visible.
    pub fn set_visible(&mut self, name: &str, visible: bool) -> Result<(), BackendError> {
        let layer = self
            .stack
            .iter_mut()
            .find(|l| l.descriptor.name == name)
            .ok_or_else(|| BackendError::UnknownLayer(name.to_string()))?;

        layer.visible = visible;
        let handle = layer.handle;
        self.backend.set_visible(handle, visible);
        self.backend.dismiss_popup();
        Ok(())
    }

    /// Starts a new filter update and invalidates all in-flight
    /// responses from earlier ones.
    pub fn begin_filter_update(&mut self) -> Generation {
        self.generation += 1;
        Generation(self.generation)
    }

    pub fn current_generation(&self) -> Generation {
        Generation(self.generation)
    }

    /// True when a response tagged with `generation` is still current.
    pub fn accept(&self, generation: Generation) -> bool {
        let current = generation.0 == self.generation;
        if !current {
            warn!(
                stale = generation.0,
                current = self.generation,
                "discarding response from superseded filter state"
            );
        }
        current
    }
}

fn source_for(endpoint: &ServerEndpoint, descriptor: &LayerDescriptor) -> LayerSource {
    match descriptor.kind {
        LayerKind::Tile => LayerSource::WmsTile {
            url: endpoint.wms_base_url(),
            params: endpoint.wms_tile_params(&descriptor.name, &descriptor.params),
        },
        LayerKind::Vector | LayerKind::Heatmap => LayerSource::WfsBbox(WfsUrlTemplate::new(
            endpoint.clone(),
            descriptor.name.clone(),
            descriptor.params.clone(),
        )),
    }
}

fn warn_on_corrupt_params(layer: &str, params: &QueryParams) {
    for (key, value) in params.iter() {
        if value.corrupts_viewparams() {
            warn!(
                layer = %layer,
                param = %key,
                "parameter value contains a viewparams delimiter; the encoded query will be corrupt"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BASE_LAYER_NAME, LayerManager};
    use crate::backend::{BackendError, LayerSource};
    use crate::descriptor::LayerDescriptor;
    use crate::headless::{BackendCall, HeadlessBackend};
    use foundation::extent::MapExtent;
    use foundation::screen::Coordinate;
    use protocol::{QueryParams, ServerEndpoint};

    fn manager() -> LayerManager<HeadlessBackend> {
        LayerManager::new(
            HeadlessBackend::new(),
            ServerEndpoint::new("http://localhost:8080/geoserver", "workspace"),
        )
    }

    #[test]
    fn base_layer_occupies_index_zero() {
        let m = manager();
        assert_eq!(m.stack().len(), 1);
        assert_eq!(m.stack()[0].descriptor.name, BASE_LAYER_NAME);
        assert!(m.probe_order().is_empty());
    }

    #[test]
    fn added_layers_start_hidden_and_duplicates_are_rejected() {
        let mut m = manager();
        m.add_layer(LayerDescriptor::vector("bike_lanes", "Bike lanes"))
            .unwrap();
        assert!(!m.layer("bike_lanes").unwrap().visible);

        let err = m
            .add_layer(LayerDescriptor::vector("bike_lanes", "Bike lanes"))
            .unwrap_err();
        assert_eq!(err, BackendError::DuplicateLayer("bike_lanes".to_string()));
    }

    #[test]
    fn probe_order_is_reverse_stacking_of_visible_layers() {
        let mut m = manager();
        m.add_layer(LayerDescriptor::vector("a", "A")).unwrap();
        m.add_layer(LayerDescriptor::tile("b", "B")).unwrap();
        m.add_layer(LayerDescriptor::vector("c", "C")).unwrap();
        m.set_visible("a", true).unwrap();
        m.set_visible("c", true).unwrap();

        let order: Vec<&str> = m
            .probe_order()
            .iter()
            .map(|l| l.descriptor.name.as_str())
            .collect();
        assert_eq!(order, vec!["c", "a"]);
    }

    #[test]
    fn vector_update_swaps_source_in_place() {
        let mut m = manager();
        let handle = m
            .add_layer(
                LayerDescriptor::vector("bike_lanes", "Bike lanes")
                    .with_params(QueryParams::new().with("surface", "asphalt")),
            )
            .unwrap();

        m.update_layer(
            "bike_lanes",
            &QueryParams::new().with("surface", "dirt"),
            None,
        )
        .unwrap();

        // Same handle, new URL, refreshed.
        let layer = m.layer("bike_lanes").unwrap();
        assert_eq!(layer.handle, handle);
        let LayerSource::WfsBbox(template) = m.backend().source(handle).unwrap() else {
            panic!("expected wfs source");
        };
        let url = template.url_for(MapExtent::new(0.0, 0.0, 1.0, 1.0));
        assert!(url.contains("viewparams=surface:dirt"));
        assert!(m.backend().calls().contains(&BackendCall::Refresh(handle)));
    }

    #[test]
    fn tile_update_recreates_the_layer_preserving_visibility() {
        let mut m = manager();
        let old_handle = m
            .add_layer(
                LayerDescriptor::tile("traffic", "Traffic")
                    .with_params(QueryParams::new().with("cnt", "1")),
            )
            .unwrap();
        m.set_visible("traffic", true).unwrap();

        m.update_layer("traffic", &QueryParams::new().with("cnt", "5"), None)
            .unwrap();

        let layer = m.layer("traffic").unwrap();
        assert_ne!(layer.handle, old_handle);
        assert!(layer.visible);
        assert!(m.backend().source(old_handle).is_none());
        let LayerSource::WmsTile { params, .. } = m.backend().source(layer.handle).unwrap() else {
            panic!("expected wms source");
        };
        assert!(params.contains(&("VIEWPARAMS".to_string(), "cnt:5".to_string())));
    }

    #[test]
    fn visibility_toggle_always_dismisses_the_popup() {
        let mut m = manager();
        m.add_layer(LayerDescriptor::vector("a", "A")).unwrap();

        m.backend_mut()
            .show_popup_for_test(Coordinate::new(1.0, 2.0), "Name: Main st");
        m.set_visible("a", true).unwrap();
        assert!(m.backend().popup().is_none());

        // Also cleared when nothing is currently displayed.
        m.set_visible("a", false).unwrap();
        assert!(m.backend().popup().is_none());
    }

    #[test]
    fn unknown_layer_is_an_error() {
        let mut m = manager();
        let err = m.set_visible("nope", true).unwrap_err();
        assert_eq!(err, BackendError::UnknownLayer("nope".to_string()));
    }

    #[test]
    fn generations_invalidate_older_responses() {
        let mut m = manager();
        let first = m.begin_filter_update();
        assert!(m.accept(first));

        let second = m.begin_filter_update();
        assert!(!m.accept(first));
        assert!(m.accept(second));
    }
}
