/// Turns a raw attribute key or value into display text.
///
/// Separators (`_`, `:`) become spaces, everything is lowercased, and the
/// first character is capitalized: `veh_type` -> `Veh type`,
/// `Main St` -> `Main st`.
pub fn sanitize_label(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if c == '_' || c == ':' { ' ' } else { c })
        .collect();
    let lower = spaced.to_lowercase();

    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
