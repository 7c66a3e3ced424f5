//! Headless viewer session against a live feature server.
//!
//! Loads the catalog, attaches every layer the way the interactive
//! frontends do, applies the default filter state and resolves one
//! demonstration click. Useful as a smoke check that a server instance
//! speaks the expected protocol.

mod client;
mod trajectory;

use std::env;

use catalog::LayerEntry;
use foundation::extent::MapExtent;
use foundation::screen::{Coordinate, Pixel};
use layers::headless::HeadlessBackend;
use layers::parametrized::{apply_filter, is_parametrized, register_all};
use layers::{FilterState, LayerDescriptor, LayerKind, LayerManager, MapBackend, style};
use picking::{ClickEvent, resolve};
use protocol::ServerEndpoint;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Builds the generic catalog layer list. WMS entries render as tile
/// layers; entries advertised only by the WFS document render as
/// vector layers. Hand-authored styles apply either way, and hidden or
/// table-managed layers stay out.
fn catalog_descriptors(
    endpoint: &ServerEndpoint,
    wms_entries: Vec<LayerEntry>,
    wfs_entries: Vec<LayerEntry>,
) -> Vec<LayerDescriptor> {
    let mut wms = catalog::without_hidden(wms_entries);
    wms.retain(|e| !is_parametrized(&e.name));
    let mut wfs = catalog::without_hidden(wfs_entries);
    wfs.retain(|e| !is_parametrized(&e.name));
    wfs.retain(|e| wms.iter().all(|w| w.name != e.name));

    let mut descriptors = Vec::new();
    for (entries, kind) in [(wms, LayerKind::Tile), (wfs, LayerKind::Vector)] {
        for entry in entries {
            let descriptor = match style::predefined(&endpoint.qualified_layer(&entry.name)) {
                Some(rule) => {
                    LayerDescriptor::from_entry(entry, LayerKind::Vector).with_style(rule)
                }
                None => LayerDescriptor::from_entry(entry, kind),
            };
            descriptors.push(descriptor);
        }
    }
    descriptors.sort_by(|a, b| a.title.cmp(&b.title));
    descriptors
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let base_uri = env::var("GEOSERVER_URI")
        .unwrap_or_else(|_| "http://localhost:8080/geoserver".to_string());
    let workspace = env::var("GEOSERVER_WORKSPACE").unwrap_or_else(|_| "workspace".to_string());

    let endpoint = ServerEndpoint::new(base_uri, workspace);
    let client = client::GeoClient::new(endpoint.clone());

    let (wms_entries, wfs_entries) = catalog::load_full_catalog(&client).await;
    info!(
        wms = wms_entries.len(),
        wfs = wfs_entries.len(),
        "capability documents loaded"
    );

    let mut manager = LayerManager::new(HeadlessBackend::new(), endpoint.clone());
    for descriptor in catalog_descriptors(&endpoint, wms_entries, wfs_entries) {
        if let Err(err) = manager.add_layer(descriptor) {
            warn!("catalog layer skipped: {err}");
        }
    }

    let state = FilterState::default();
    register_all(&mut manager, &state);

    for layer in manager.stack().iter().skip(1) {
        info!(
            name = %layer.descriptor.name,
            title = %layer.descriptor.title,
            kind = ?layer.descriptor.kind,
            "layer attached"
        );
    }

    let generation = apply_filter(&mut manager, &state);

    for name in ["bike_lanes", "traffic_light_jams"] {
        if manager.layer(name).is_some() {
            if let Err(err) = manager.set_visible(name, true) {
                warn!("cannot show {name}: {err}");
            }
        }
    }

    let click = ClickEvent {
        pixel: Pixel::new(50.0, 50.0),
        coordinate: Coordinate::new(0.0, 0.0),
    };
    let hit = resolve(&manager, &client, click).await;
    // A filter change while the probes were in flight would supersede
    // this resolution; its feature belongs to the old parameters.
    if !manager.accept(generation) {
        return;
    }
    match hit {
        Some(feature) => {
            let text = picking::format(&feature.properties);
            info!(id = %feature.id, "clicked feature:\n{text}");
            manager.backend_mut().show_popup(click.coordinate, &text);

            let extent =
                MapExtent::around(click.coordinate, 50.0 * manager.backend().view_resolution());
            if let Some(url) = trajectory::trajectory_url(&endpoint, &feature, extent) {
                match client.fetch_features(&url).await {
                    Ok(collection) => {
                        let points = trajectory::trajectory_points(collection);
                        info!(points = points.len(), "trajectory loaded");
                    }
                    Err(err) => warn!("trajectory fetch failed: {err}"),
                }
            }
        }
        None => info!("nothing under the demonstration click"),
    }
}
