use crate::params::QueryParams;

/// Encodes a parameter mapping as `key1:value1;key2:value2`.
///
/// An empty mapping encodes to the empty string, and callers must then
/// omit the `viewparams` query key entirely. Values are coerced to their
/// display form with no escaping; see `ParamValue::corrupts_viewparams`.
pub fn encode(params: &QueryParams) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::encode;
    use crate::params::QueryParams;

    #[test]
    fn empty_mapping_encodes_to_empty_string() {
        assert_eq!(encode(&QueryParams::new()), "");
    }

    #[test]
    fn one_group_per_entry_in_insertion_order() {
        let p = QueryParams::new()
            .with("timestamp", "2024-07-04 09:11:12")
            .with("veh_type", "veh_passenger")
            .with("cnt", 1i64);
        let encoded = encode(&p);
        assert_eq!(
            encoded,
            "timestamp:2024-07-04 09:11:12;veh_type:veh_passenger;cnt:1"
        );
        assert_eq!(encoded.split(';').count(), p.len());
    }

    #[test]
    fn single_entry_has_no_trailing_delimiter() {
        let p = QueryParams::new().with("surface", "asphalt");
        assert_eq!(encode(&p), "surface:asphalt");
    }
}
