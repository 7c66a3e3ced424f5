//! Trajectory follow-up for clicked street objects.
//!
//! Features flagged with `osm_obj` have recorded vehicle paths in the
//! `object_trajectory` view, keyed by the feature's `osm_id`. The
//! query reuses the bbox fetch so only the visible portion of the path
//! comes back.

use foundation::extent::MapExtent;
use protocol::{Feature, FeatureCollection, QueryParams, ServerEndpoint};
use serde_json::Value;

pub const TRAJECTORY_LAYER: &str = "object_trajectory";

/// Builds the trajectory query URL for a clicked feature, or `None`
/// when the feature is not a street object or lacks an identifier.
pub fn trajectory_url(
    endpoint: &ServerEndpoint,
    feature: &Feature,
    extent: MapExtent,
) -> Option<String> {
    if !feature.property_is_truthy("osm_obj") {
        return None;
    }
    let osm_id = match feature.property("osm_id")? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let params = QueryParams::new().with("osm_id", osm_id);
    Some(endpoint.wfs_get_feature_url(TRAJECTORY_LAYER, &params, extent))
}

/// Point coordinates of the trajectory, in returned order.
pub fn trajectory_points(collection: FeatureCollection) -> Vec<(f64, f64)> {
    collection
        .features
        .iter()
        .filter_map(Feature::point_coordinates)
        .collect()
}
