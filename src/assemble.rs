use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::normalize::canonical_team_name;
use crate::types::{ExtractedFixture, FixtureKey, FixtureRecord};

/// Host part of the document URL, recorded as the observation source.
pub fn source_from_url(url: &str) -> Result<String> {
    let parsed = url::Url::parse(url)
        .map_err(|e| AppError::Config(format!("SOURCE_URL {url:?} is not a valid URL: {e}")))?;
    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::Config(format!("SOURCE_URL {url:?} has no host")))
}

/// Canonicalise team names and stamp run metadata onto an extracted fixture.
pub fn assemble(fixture: ExtractedFixture, source: &str, captured_at: DateTime<Utc>) -> FixtureRecord {
    FixtureRecord {
        key: FixtureKey {
            round: fixture.round.unwrap_or_default(),
            home_team: canonical_team_name(&fixture.home),
            away_team: canonical_team_name(&fixture.away),
        },
        start_time: fixture.start_time,
        market: fixture.market,
        home_price: fixture.home_price,
        away_price: fixture.away_price,
        source: source.to_string(),
        captured_at,
    }
}

pub fn assemble_all(
    fixtures: Vec<ExtractedFixture>,
    source: &str,
    captured_at: DateTime<Utc>,
) -> Vec<FixtureRecord> {
    fixtures
        .into_iter()
        .map(|f| assemble(f, source, captured_at))
        .collect()
}
