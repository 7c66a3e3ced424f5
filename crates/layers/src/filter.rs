//! The viewer's single source of truth for filter controls.
//!
//! All filter-dependent layer parameters are derived from this struct;
//! the UI hands over one value per control and dispatch recomputes every
//! dependent layer atomically.

use chrono::{Duration, NaiveDateTime};
use protocol::QueryParams;
use tracing::warn;

/// Start of the recorded floating-car-data window.
pub const FCD_TIME_BASE: &str = "2024-07-04 09:11:12";
/// Start of the recorded emission window.
pub const EMISSION_TIME_BASE: &str = "2024-07-06 15:20:39";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Slider position: minutes past the recorded time bases.
    pub minute_offset: i64,
    pub veh_type: String,
    /// Minimum vehicle count for the congestion layers.
    pub min_count: u32,
    /// Bike-lane surface type.
    pub surface: String,
    /// Emission substance column for the emission heat map.
    pub emission_substance: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            minute_offset: 0,
            veh_type: "veh_passenger".to_string(),
            min_count: 1,
            surface: "asphalt".to_string(),
            emission_substance: "co2".to_string(),
        }
    }
}

impl FilterState {
    /// FCD base time shifted by the slider offset.
    pub fn fcd_timestamp(&self) -> String {
        shift(FCD_TIME_BASE, Duration::minutes(self.minute_offset))
    }

    /// Emission base time shifted by the slider offset.
    pub fn emission_timestamp(&self) -> String {
        shift(EMISSION_TIME_BASE, Duration::minutes(self.minute_offset))
    }

    /// `timestamp`/`veh_type` pair shared by the FCD vector layers,
    /// optionally with the minimum-count threshold.
    pub fn fcd_params(&self, with_count: bool) -> QueryParams {
        let mut params = QueryParams::new()
            .with("timestamp", self.fcd_timestamp())
            .with("veh_type", self.veh_type.as_str());
        if with_count {
            params.set("cnt", self.min_count.to_string());
        }
        params
    }

    /// One-second aggregation window for the FCD heat maps.
    pub fn fcd_window_params(&self) -> QueryParams {
        let from = self.fcd_timestamp();
        let to = shift(&from, Duration::seconds(1));
        QueryParams::new()
            .with("veh_type", self.veh_type.as_str())
            .with("time_from", from)
            .with("time_to", to)
    }

    /// One-second window plus substance column for the emission heat map.
    pub fn emission_window_params(&self) -> QueryParams {
        let from = self.emission_timestamp();
        let to = shift(&from, Duration::seconds(1));
        QueryParams::new()
            .with("time_from", from)
            .with("time_to", to)
            .with("veh_type", self.veh_type.as_str())
            .with("emission_col", self.emission_substance.as_str())
    }

    pub fn surface_params(&self) -> QueryParams {
        QueryParams::new().with("surface", self.surface.as_str())
    }
}

/// Shifts a `YYYY-MM-DD HH:MM:SS` timestamp, returning it unchanged
/// (with a warning) when it does not parse.
fn shift(timestamp: &str, delta: Duration) -> String {
    match NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT) {
        Ok(parsed) => (parsed + delta).format(TIMESTAMP_FORMAT).to_string(),
        Err(err) => {
            warn!("unparseable timestamp {timestamp:?}: {err}");
            timestamp.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FilterState;
    use protocol::viewparams;

    #[test]
    fn slider_offset_shifts_both_time_bases() {
        let state = FilterState {
            minute_offset: 10,
            ..FilterState::default()
        };
        assert_eq!(state.fcd_timestamp(), "2024-07-04 09:21:12");
        assert_eq!(state.emission_timestamp(), "2024-07-06 15:30:39");
    }

    #[test]
    fn zero_offset_reproduces_the_bases() {
        let state = FilterState::default();
        assert_eq!(state.fcd_timestamp(), super::FCD_TIME_BASE);
    }

    #[test]
    fn fcd_params_encode_in_declared_order() {
        let state = FilterState::default();
        assert_eq!(
            viewparams::encode(&state.fcd_params(true)),
            "timestamp:2024-07-04 09:11:12;veh_type:veh_passenger;cnt:1"
        );
        assert!(state.fcd_params(false).get("cnt").is_none());
    }

    #[test]
    fn heatmap_window_is_one_second_wide() {
        let state = FilterState::default();
        let params = state.fcd_window_params();
        assert_eq!(
            params.get("time_from").unwrap().to_string(),
            "2024-07-04 09:11:12"
        );
        assert_eq!(
            params.get("time_to").unwrap().to_string(),
            "2024-07-04 09:11:13"
        );
    }

    #[test]
    fn emission_window_carries_the_substance_column() {
        let state = FilterState {
            emission_substance: "nox".to_string(),
            ..FilterState::default()
        };
        let params = state.emission_window_params();
        assert_eq!(params.get("emission_col").unwrap().to_string(), "nox");
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["time_from", "time_to", "veh_type", "emission_col"]);
    }
}
