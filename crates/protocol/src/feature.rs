use serde::Deserialize;
use serde_json::Value;

/// GeoJSON feature collection as returned by `GetFeature` and
/// `GetFeatureInfo` with `outputFormat`/`INFO_FORMAT` set to
/// `application/json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default, rename = "numberReturned")]
    pub number_returned: Option<u64>,
}

impl FeatureCollection {
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    /// First returned feature, which is the one the viewer displays.
    pub fn into_first(self) -> Option<Feature> {
        self.features.into_iter().next()
    }
}

/// A single feature: identifier, attribute mapping, geometry.
///
/// The identifier is formatted `<layername>.<id>` by the server. The
/// geometry is carried for trajectory extraction but ignored by the
/// popup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, Value>,
    #[serde(default)]
    pub geometry: Option<Value>,
}

impl Feature {
    /// Layer part of the `<layername>.<id>` identifier.
    pub fn layer_name(&self) -> Option<&str> {
        self.id.rsplit_once('.').map(|(layer, _)| layer)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Truthiness check for flag-like attributes (e.g. `osm_obj`).
    pub fn property_is_truthy(&self, key: &str) -> bool {
        match self.properties.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    /// Point coordinates, when the geometry is a GeoJSON `Point`.
    pub fn point_coordinates(&self) -> Option<(f64, f64)> {
        let geometry = self.geometry.as_ref()?;
        if geometry.get("type")?.as_str()? != "Point" {
            return None;
        }
        let coords = geometry.get("coordinates")?.as_array()?;
        Some((coords.first()?.as_f64()?, coords.get(1)?.as_f64()?))
    }
}

#[cfg(test)]
mod tests {
    use super::FeatureCollection;

    #[test]
    fn parses_a_geoserver_response() {
        let body = r#"{
            "type": "FeatureCollection",
            "numberReturned": 1,
            "features": [{
                "type": "Feature",
                "id": "most_busy_street.42",
                "geometry": {"type": "Point", "coordinates": [20.4, 44.8]},
                "properties": {"name": "Main St", "speed": 10, "osm_obj": 1}
            }]
        }"#;

        let fc = FeatureCollection::parse(body).unwrap();
        assert_eq!(fc.number_returned, Some(1));

        let feature = fc.into_first().unwrap();
        assert_eq!(feature.layer_name(), Some("most_busy_street"));
        assert!(feature.property_is_truthy("osm_obj"));
        assert_eq!(feature.point_coordinates(), Some((20.4, 44.8)));
    }

    #[test]
    fn empty_collection_yields_no_feature() {
        let fc = FeatureCollection::parse(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(fc.into_first().is_none());
    }

    #[test]
    fn missing_fields_default() {
        let fc = FeatureCollection::parse(r#"{"features":[{"id":"x.1"}]}"#).unwrap();
        let feature = fc.into_first().unwrap();
        assert!(feature.properties.is_empty());
        assert!(feature.point_coordinates().is_none());
        assert!(!feature.property_is_truthy("osm_obj"));
    }
}
