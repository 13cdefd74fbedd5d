use chrono::{DateTime, NaiveDateTime, Utc};

// ---------------------------------------------------------------------------
// Extraction output
// ---------------------------------------------------------------------------

/// One fixture section as read from the document, before any validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFixture {
    pub time_text: String,
    pub market_labels: Vec<String>,
    pub price_texts: Vec<String>,
    /// Names as printed on the page, home first.
    pub home: String,
    pub away: String,
}

/// A validated fixture with its head to head prices selected and parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFixture {
    /// Unset when the page carries no round label.
    pub round: Option<String>,
    pub start_time: NaiveDateTime,
    pub home: String,
    pub away: String,
    pub market: String,
    pub home_price: f64,
    pub away_price: f64,
}

/// `Home v Away`, as used in logs and error messages.
pub fn describe(home: &str, away: &str) -> String {
    format!("{home} v {away}")
}

/// A fixture left out of the batch under the skip policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFixture {
    pub fixture: String,
    pub reason: String,
}

/// Everything one document yields.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub round: Option<String>,
    pub sections: usize,
    pub fixtures: Vec<ExtractedFixture>,
    pub skipped: Vec<SkippedFixture>,
}

// ---------------------------------------------------------------------------
// Persistence input
// ---------------------------------------------------------------------------

/// Natural key of a fixture. An absent round is keyed as the empty string so that
/// SQLite's UNIQUE constraint (which treats NULLs as distinct) still holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixtureKey {
    pub round: String,
    pub home_team: String,
    pub away_team: String,
}

/// Persistence-ready record: canonical team names plus run metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRecord {
    pub key: FixtureKey,
    pub start_time: NaiveDateTime,
    pub market: String,
    pub home_price: f64,
    pub away_price: f64,
    /// Origin host of the document, e.g. `www.sportsbet.com.au`.
    pub source: String,
    pub captured_at: DateTime<Utc>,
}

/// Outcome of one committed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub fixtures_created: u64,
    pub observations_written: u64,
}

/// Outcome of one pipeline pass.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub round: Option<String>,
    pub sections: usize,
    pub batch: BatchOutcome,
    pub skipped: Vec<SkippedFixture>,
}
