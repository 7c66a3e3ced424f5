//! Declarative rendering rules.
//!
//! The backend interprets these; the core only decides which rule a
//! layer carries. Icon rotation follows the feature's `angle` attribute.

use std::f64::consts::PI;

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

/// Label rendered next to an icon or geometry, sourced from a feature
/// attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub property: String,
    pub color: String,
    pub offset: (f64, f64),
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StyleRule {
    Stroke(Stroke),
    /// Icon from the asset directory, rotated by the feature's `angle`.
    Icon {
        asset: String,
        scale: f64,
        label: Option<Label>,
    },
    /// Text-only style, optionally with a stroke for line geometries.
    Text {
        label: Label,
        stroke: Option<Stroke>,
    },
    /// Heat-map rendering weighted by a feature attribute.
    Heatmap { weight_property: String },
}

/// Standard icon style: centered anchor, quarter scale.
pub fn icon(asset: impl Into<String>) -> StyleRule {
    StyleRule::Icon {
        asset: asset.into(),
        scale: 0.25,
        label: None,
    }
}

/// Icon rotation in radians; the assets point up, the data's zero angle
/// points east, hence the 90 degree correction.
pub fn icon_rotation_rad(angle_deg: Option<f64>) -> f64 {
    match angle_deg {
        Some(angle) => (angle + 90.0) * PI / 180.0,
        None => 0.0,
    }
}

/// Bike-lane stroke color keyed by surface type.
pub fn bike_lane(surface: &str) -> StyleRule {
    let color = match surface {
        "asphalt" => "#db9d00",
        "dirt" => "#993000",
        "concrete" => "#4f7b7d",
        "gravel" => "#7c8e8f",
        "grass" => "#13ab48",
        _ => "#db9d00",
    };
    StyleRule::Stroke(Stroke::new(color, 5.0))
}

/// Hand-authored styles for specific catalog layers, looked up by the
/// workspace-qualified layer name.
pub fn predefined(qualified_name: &str) -> Option<StyleRule> {
    let (_, name) = qualified_name.split_once(':')?;
    match name {
        "objekti hitne pomoci" => Some(StyleRule::Icon {
            asset: "hospital".to_string(),
            scale: 0.25,
            label: Some(Label {
                property: "name".to_string(),
                color: "#FF0000".to_string(),
                offset: (0.0, -25.0),
                scale: 1.5,
            }),
        }),
        "autobuske nis" | "autobuske beograd" => Some(icon("bus-stop")),
        "Reke koje protiču kroz gradove (> 10km)" => Some(StyleRule::Text {
            label: Label {
                property: "name".to_string(),
                color: "#0000FF".to_string(),
                offset: (25.0, -25.0),
                scale: 1.5,
            },
            stroke: Some(Stroke::new("#0000FF", 3.0)),
        }),
        _ => None,
    }
}
