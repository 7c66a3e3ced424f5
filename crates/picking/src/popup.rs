//! Turns a feature's raw attribute mapping into popup text.
//!
//! Attribute names hint at their unit: areas come back in square
//! meters, elevations in meters, speeds in meters per second and
//! angles in degrees. Values are rescaled to what a person expects to
//! read on a map popup.

use serde_json::Value;

use foundation::text::sanitize_label;

/// Square-meter threshold above which areas read better in km².
const KM2_THRESHOLD: f64 = 1_000_000.0;

/// One line per displayable attribute, `Label: value`, sorted by
/// attribute name. Geometry blobs, nulls and the raw `way` column are
/// skipped.
pub fn format(properties: &serde_json::Map<String, Value>) -> String {
    let mut lines = Vec::new();
    for (key, value) in properties {
        if key == "way" {
            continue;
        }
        let Some(rendered) = render_value(key, value) else {
            continue;
        };
        lines.push(format!("{}: {rendered}", sanitize_label(key)));
    }
    lines.join("\n")
}

fn render_value(key: &str, value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(sanitize_label(s)),
        Value::Number(n) => Some(render_number(key, n)),
        _ => None,
    }
}

fn render_number(key: &str, n: &serde_json::Number) -> String {
    let v = n.as_f64().unwrap_or(0.0);
    if key.contains("area") {
        if v >= KM2_THRESHOLD {
            return format!("{:.2} km²", v / KM2_THRESHOLD);
        }
        return format!("{n} m²");
    }
    if key.contains("ele") {
        return format!("{n} m");
    }
    if key == "speed" {
        // Server reports m/s.
        return format!("{} km/h", (v * 3.6).round());
    }
    if key == "angle" {
        return format!("{n} deg");
    }
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::format;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn props(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn unit_heuristics_and_skips() {
        let text = format(&props(json!({
            "way": "010300002031BF0D00",
            "area": 2_500_000,
            "speed": 10,
            "name": "Main St"
        })));

        assert_eq!(text, "Area: 2.50 km²\nName: Main st\nSpeed: 36 km/h");
    }

    #[test]
    fn small_areas_stay_in_square_meters() {
        let text = format(&props(json!({"area": 250})));
        assert_eq!(text, "Area: 250 m²");
    }

    #[test]
    fn elevation_and_angle_carry_their_units() {
        let text = format(&props(json!({"ele": 195, "angle": 45.5})));
        assert_eq!(text, "Angle: 45.5 deg\nEle: 195 m");
    }

    #[test]
    fn underscored_keys_become_readable_labels() {
        let text = format(&props(json!({"veh_type": "veh_passenger"})));
        assert_eq!(text, "Veh type: Veh passenger");
    }

    #[test]
    fn nulls_and_structured_values_are_dropped() {
        let text = format(&props(json!({
            "name": null,
            "tags": {"highway": "primary"},
            "ids": [1, 2]
        })));
        assert_eq!(text, "");
    }
}
