//! The declarative list of parametrized layers.
//!
//! One table replaces the hand-maintained viewer variants: each entry
//! names the server view, how its parameters derive from the filter
//! state, and how its style follows the controls. Registration and
//! filter dispatch both walk this table.

use tracing::warn;

use crate::backend::MapBackend;
use crate::descriptor::{LayerDescriptor, LayerKind};
use crate::filter::FilterState;
use crate::manager::{Generation, LayerManager};
use crate::style::{self, Stroke, StyleRule};

/// How a layer's query parameters derive from the filter state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParamRecipe {
    /// `timestamp`, `veh_type`.
    Fcd,
    /// `timestamp`, `veh_type`, `cnt`.
    FcdWithCount,
    /// `veh_type`, `time_from`, `time_to` (one-second window).
    FcdWindow,
    /// `time_from`, `time_to`, `veh_type`, `emission_col`.
    EmissionWindow,
    /// `surface`.
    Surface,
}

impl ParamRecipe {
    pub fn params(&self, state: &FilterState) -> protocol::QueryParams {
        match self {
            ParamRecipe::Fcd => state.fcd_params(false),
            ParamRecipe::FcdWithCount => state.fcd_params(true),
            ParamRecipe::FcdWindow => state.fcd_window_params(),
            ParamRecipe::EmissionWindow => state.emission_window_params(),
            ParamRecipe::Surface => state.surface_params(),
        }
    }
}

/// How a layer's style follows the filter state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum StyleRecipe {
    /// Style never changes after creation (heat maps keep their weight).
    Keep,
    /// Fixed stroke.
    Stroke { color: &'static str, width: f64 },
    /// Icon named after the selected vehicle type.
    VehicleIcon,
    /// Fixed icon asset.
    FixedIcon(&'static str),
    /// Stroke colored by the selected surface.
    BikeLane,
}

impl StyleRecipe {
    pub fn style(&self, state: &FilterState) -> Option<StyleRule> {
        match self {
            StyleRecipe::Keep => None,
            StyleRecipe::Stroke { color, width } => {
                Some(StyleRule::Stroke(Stroke::new(*color, *width)))
            }
            StyleRecipe::VehicleIcon => Some(style::icon(state.veh_type.as_str())),
            StyleRecipe::FixedIcon(asset) => Some(style::icon(*asset)),
            StyleRecipe::BikeLane => Some(style::bike_lane(&state.surface)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParametrizedLayer {
    pub name: &'static str,
    pub title: &'static str,
    pub kind: LayerKind,
    pub recipe: ParamRecipe,
    pub style: StyleRecipe,
    /// Heat-map weight attribute, fixed at creation.
    pub weight: Option<&'static str>,
}

impl ParametrizedLayer {
    /// Initial descriptor for the current filter state.
    pub fn descriptor(&self, state: &FilterState) -> LayerDescriptor {
        let mut descriptor = LayerDescriptor::new(self.kind, self.name, self.title)
            .with_params(self.recipe.params(state));
        if let Some(weight) = self.weight {
            descriptor = descriptor.with_style(StyleRule::Heatmap {
                weight_property: weight.to_string(),
            });
        } else if let Some(style) = self.style.style(state) {
            descriptor = descriptor.with_style(style);
        }
        descriptor
    }
}

pub const PARAMETRIZED_LAYERS: &[ParametrizedLayer] = &[
    ParametrizedLayer {
        name: "most_busy_street",
        title: "Busiest street",
        kind: LayerKind::Vector,
        recipe: ParamRecipe::FcdWithCount,
        style: StyleRecipe::Stroke {
            color: "#cc1836",
            width: 15.0,
        },
        weight: None,
    },
    ParametrizedLayer {
        name: "cars_on_most_busy_street",
        title: "Vehicles on the busiest street",
        kind: LayerKind::Vector,
        recipe: ParamRecipe::FcdWithCount,
        style: StyleRecipe::VehicleIcon,
        weight: None,
    },
    ParametrizedLayer {
        name: "traffic_light_jams",
        title: "Traffic lights with queued vehicles",
        kind: LayerKind::Vector,
        recipe: ParamRecipe::FcdWithCount,
        style: StyleRecipe::FixedIcon("traffic-light"),
        weight: None,
    },
    ParametrizedLayer {
        name: "cars_on_traffic_light_jams",
        title: "Vehicle queues at traffic lights",
        kind: LayerKind::Vector,
        recipe: ParamRecipe::FcdWithCount,
        style: StyleRecipe::VehicleIcon,
        weight: None,
    },
    ParametrizedLayer {
        name: "fastest_vehicles_at_timestamp",
        title: "Fastest vehicles at the selected time",
        kind: LayerKind::Vector,
        recipe: ParamRecipe::Fcd,
        style: StyleRecipe::VehicleIcon,
        weight: None,
    },
    ParametrizedLayer {
        name: "bike_lanes",
        title: "Bike lanes",
        kind: LayerKind::Vector,
        recipe: ParamRecipe::Surface,
        style: StyleRecipe::BikeLane,
        weight: None,
    },
    ParametrizedLayer {
        name: "speed_heatmap",
        title: "Vehicle speed heat map",
        kind: LayerKind::Heatmap,
        recipe: ParamRecipe::FcdWindow,
        style: StyleRecipe::Keep,
        weight: Some("avg_speed"),
    },
    ParametrizedLayer {
        name: "traffic_heatmap",
        title: "Traffic density heat map",
        kind: LayerKind::Heatmap,
        recipe: ParamRecipe::FcdWindow,
        style: StyleRecipe::Keep,
        weight: Some("traffic_density"),
    },
    ParametrizedLayer {
        name: "emission_heatmap",
        title: "Vehicle emission heat map",
        kind: LayerKind::Heatmap,
        recipe: ParamRecipe::EmissionWindow,
        style: StyleRecipe::Keep,
        weight: Some("avg_emission"),
    },
];

/// True for layers the table manages; the generic catalog list must
/// exclude these.
pub fn is_parametrized(name: &str) -> bool {
    PARAMETRIZED_LAYERS.iter().any(|l| l.name == name)
}

/// Attaches every parametrized layer, initially hidden.
pub fn register_all<B: MapBackend>(manager: &mut LayerManager<B>, state: &FilterState) {
    for def in PARAMETRIZED_LAYERS {
        if let Err(err) = manager.add_layer(def.descriptor(state)) {
            warn!(layer = def.name, "skipping registration: {err}");
        }
    }
}

/// Recomputes every filter-dependent layer from the new state.
///
/// The whole batch shares one generation so in-flight responses from
/// the previous state are discarded together. Layers absent from the
/// map (viewer variants register subsets) are skipped.
pub fn apply_filter<B: MapBackend>(
    manager: &mut LayerManager<B>,
    state: &FilterState,
) -> Generation {
    let generation = manager.begin_filter_update();
    for def in PARAMETRIZED_LAYERS {
        if manager.layer(def.name).is_none() {
            continue;
        }
        if let Err(err) = manager.update_layer(def.name, &def.recipe.params(state), def.style.style(state)) {
            warn!(layer = def.name, "filter update failed: {err}");
        }
    }
    generation
}
