/// Long-form team names mapped to the short form stored in the database.
const CANONICAL_NAMES: &[(&str, &str)] = &[
    ("Greater Western Sydney", "GWS"),
    ("Greater Western Sydney Giants", "GWS"),
];

/// Canonical short form of a team name. Names not in the table pass through unchanged.
pub fn canonical_team_name(name: &str) -> String {
    CANONICAL_NAMES
        .iter()
        .find(|(long, _)| *long == name)
        .map(|(_, short)| (*short).to_string())
        .unwrap_or_else(|| name.to_string())
}
