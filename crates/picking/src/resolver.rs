//! Walks visible layers top-to-bottom and finds the clicked feature.
//!
//! Vector and heat-map layers answer synchronously from the renderer;
//! tile layers need a `GetFeatureInfo` round trip. All probes are
//! dispatched up front and awaited together; precedence is decided by
//! stacking order alone, never by response arrival order.

use std::future::Future;
use std::pin::Pin;

use foundation::screen::{Coordinate, Pixel};
use futures_util::future;
use layers::{LayerKind, LayerManager, MapBackend};
use protocol::{Feature, ProbeWindow};
use tracing::warn;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    Http(String),
    Malformed(String),
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::Http(msg) => write!(f, "feature info request failed: {msg}"),
            ProbeError::Malformed(msg) => write!(f, "feature info response malformed: {msg}"),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Network seam for WMS `GetFeatureInfo` probes.
pub trait FeatureInfoProber: Send + Sync {
    /// Fetch the URL and return the first feature of the response, if
    /// any.
    fn fetch_feature_info(&self, url: String) -> BoxFuture<'_, Result<Option<Feature>, ProbeError>>;
}

/// A map click in both spaces the probes need.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClickEvent {
    pub pixel: Pixel,
    pub coordinate: Coordinate,
}

/// Resolves a click against the visible layer stack.
///
/// Returns the topmost layer's feature; `None` means no visible layer
/// has anything under the click and the caller hides the popup. Probe
/// failures count as misses for that layer only.
pub async fn resolve<B: MapBackend>(
    manager: &LayerManager<B>,
    prober: &dyn FeatureInfoProber,
    click: ClickEvent,
) -> Option<Feature> {
    let window = ProbeWindow::around(click.coordinate, manager.backend().view_resolution());

    let mut probes: Vec<BoxFuture<'_, Option<Feature>>> = Vec::new();
    for layer in manager.probe_order() {
        match layer.descriptor.kind {
            LayerKind::Vector | LayerKind::Heatmap => {
                // The renderer answers immediately from loaded data.
                let hit = manager.backend().feature_at_pixel(click.pixel);
                probes.push(Box::pin(std::future::ready(hit)));
            }
            LayerKind::Tile => {
                let url = manager.endpoint().wms_feature_info_url(
                    &layer.descriptor.name,
                    &layer.descriptor.params,
                    window,
                );
                probes.push(Box::pin(async move {
                    match prober.fetch_feature_info(url).await {
                        Ok(hit) => hit,
                        Err(err) => {
                            warn!("feature info probe failed: {err}");
                            None
                        }
                    }
                }));
            }
        }
    }

    let results = future::join_all(probes).await;
    results.into_iter().flatten().next()
}
