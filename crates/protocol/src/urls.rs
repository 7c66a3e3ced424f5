use foundation::extent::MapExtent;
use foundation::screen::Coordinate;

use crate::params::QueryParams;
use crate::viewparams;

/// Probe window for a WMS `GetFeatureInfo` request: a small image
/// request centered on the clicked coordinate, with the query pixel in
/// the middle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProbeWindow {
    pub bbox: MapExtent,
    pub width: u32,
    pub height: u32,
    pub i: u32,
    pub j: u32,
}

impl ProbeWindow {
    /// 101x101 px window centered on `coordinate` at the view's current
    /// `resolution` (map units per pixel).
    pub fn around(coordinate: Coordinate, resolution: f64) -> Self {
        let half = 50.0 * resolution;
        Self {
            bbox: MapExtent::around(coordinate, half),
            width: 101,
            height: 101,
            i: 50,
            j: 50,
        }
    }
}

/// Fixed base path and workspace of the upstream feature server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    base_uri: String,
    workspace: String,
}

impl ServerEndpoint {
    pub fn new(base_uri: impl Into<String>, workspace: impl Into<String>) -> Self {
        let mut base_uri = base_uri.into();
        while base_uri.ends_with('/') {
            base_uri.pop();
        }
        Self {
            base_uri,
            workspace: workspace.into(),
        }
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// `<workspace>:<layer>` as WMS requests address layers.
    pub fn qualified_layer(&self, layer: &str) -> String {
        format!("{}:{layer}", self.workspace)
    }

    pub fn wfs_capabilities_url(&self) -> String {
        format!(
            "{}/{}/wfs?request=GetCapabilities&service=WFS",
            self.base_uri, self.workspace
        )
    }

    pub fn wms_capabilities_url(&self) -> String {
        format!(
            "{}/{}/wms?request=GetCapabilities&service=WMS",
            self.base_uri, self.workspace
        )
    }

    /// Base WMS path used by tile sources; the renderer appends the
    /// standard `GetMap` query itself.
    pub fn wms_base_url(&self) -> String {
        format!("{}/{}/wms?", self.base_uri, self.workspace)
    }

    /// Source parameters for a WMS tile layer. `VIEWPARAMS` is present
    /// even when empty so re-created sources stay cache-distinct from
    /// unparametrized ones only through their values.
    pub fn wms_tile_params(&self, layer: &str, params: &QueryParams) -> Vec<(String, String)> {
        vec![
            ("LAYERS".to_string(), self.qualified_layer(layer)),
            ("TILED".to_string(), "true".to_string()),
            ("VIEWPARAMS".to_string(), viewparams::encode(params)),
        ]
    }

    /// Full WFS `GetFeature` URL for a bbox-strategy fetch.
    ///
    /// Byte-for-byte identical to what the reference server receives:
    /// the `viewparams` key is omitted entirely for an empty mapping, and
    /// the bbox carries the CRS suffix.
    pub fn wfs_get_feature_url(
        &self,
        layer: &str,
        params: &QueryParams,
        extent: MapExtent,
    ) -> String {
        let view_params = if params.is_empty() {
            String::new()
        } else {
            format!("&viewparams={}", viewparams::encode(params))
        };

        format!(
            "{}/{}/wfs?service=WFS&request=GetFeature&typename={layer}{view_params}\
             &outputFormat=application/json&srsname=EPSG:3857&bbox={},EPSG:3857",
            self.base_uri,
            self.workspace,
            extent.to_bbox_value(),
        )
    }

    /// WMS 1.3.0 `GetFeatureInfo` URL probing a single point.
    pub fn wms_feature_info_url(
        &self,
        layer: &str,
        params: &QueryParams,
        window: ProbeWindow,
    ) -> String {
        let qualified = self.qualified_layer(layer);
        let view_params = if params.is_empty() {
            String::new()
        } else {
            format!("&VIEWPARAMS={}", viewparams::encode(params))
        };

        format!(
            "{}/{}/wms?SERVICE=WMS&VERSION=1.3.0&REQUEST=GetFeatureInfo\
             &LAYERS={qualified}&QUERY_LAYERS={qualified}{view_params}\
             &INFO_FORMAT=application/json&FEATURE_COUNT=1&CRS=EPSG:3857\
             &WIDTH={}&HEIGHT={}&I={}&J={}&BBOX={}",
            self.base_uri,
            self.workspace,
            window.width,
            window.height,
            window.i,
            window.j,
            window.bbox.to_bbox_value(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{ProbeWindow, ServerEndpoint};
    use foundation::extent::MapExtent;
    use foundation::screen::Coordinate;
    use pretty_assertions::assert_eq;

    use crate::params::QueryParams;

    fn endpoint() -> ServerEndpoint {
        ServerEndpoint::new("http://localhost:8080/geoserver", "workspace")
    }

    #[test]
    fn wfs_get_feature_url_matches_reference_server() {
        let params = QueryParams::new()
            .with("timestamp", "2024-07-04 09:11:12")
            .with("veh_type", "veh_passenger")
            .with("cnt", "1");
        let url = endpoint().wfs_get_feature_url(
            "most_busy_street",
            &params,
            MapExtent::new(100.0, 200.0, 300.0, 400.0),
        );

        assert_eq!(
            url,
            "http://localhost:8080/geoserver/workspace/wfs?service=WFS&request=GetFeature\
             &typename=most_busy_street\
             &viewparams=timestamp:2024-07-04 09:11:12;veh_type:veh_passenger;cnt:1\
             &outputFormat=application/json&srsname=EPSG:3857&bbox=100,200,300,400,EPSG:3857"
        );
    }

    #[test]
    fn empty_params_omit_the_viewparams_key() {
        let url = endpoint().wfs_get_feature_url(
            "bike_lanes",
            &QueryParams::new(),
            MapExtent::new(0.0, 0.0, 1.0, 1.0),
        );
        assert!(!url.contains("viewparams"));
    }

    #[test]
    fn tile_params_qualify_the_layer_name() {
        let params = QueryParams::new().with("surface", "asphalt");
        let pairs = endpoint().wms_tile_params("bike_lanes", &params);
        assert_eq!(
            pairs,
            vec![
                ("LAYERS".to_string(), "workspace:bike_lanes".to_string()),
                ("TILED".to_string(), "true".to_string()),
                ("VIEWPARAMS".to_string(), "surface:asphalt".to_string()),
            ]
        );
    }

    #[test]
    fn probe_window_centers_the_query_pixel() {
        let w = ProbeWindow::around(Coordinate::new(1000.0, 2000.0), 2.0);
        assert_eq!(w.bbox, MapExtent::new(900.0, 1900.0, 1100.0, 2100.0));
        assert_eq!((w.width, w.height, w.i, w.j), (101, 101, 50, 50));
    }

    #[test]
    fn feature_info_url_requests_json_for_one_feature() {
        let url = endpoint().wms_feature_info_url(
            "traffic_light_jams",
            &QueryParams::new(),
            ProbeWindow::around(Coordinate::new(0.0, 0.0), 1.0),
        );
        assert!(url.contains("REQUEST=GetFeatureInfo"));
        assert!(url.contains("INFO_FORMAT=application/json"));
        assert!(url.contains("FEATURE_COUNT=1"));
        assert!(url.contains("QUERY_LAYERS=workspace:traffic_light_jams"));
        assert!(url.contains("CRS=EPSG:3857"));
    }
}
