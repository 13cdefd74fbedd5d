//! Document tree → validated per-fixture records.
//!
//! Each fixture section is walked once and its own children build its record, so one
//! fixture's prices can never be paired with another fixture's teams. Extraction either
//! returns every record for the document or fails before anything reaches the database.

pub mod market;
pub mod section;
pub mod time;

use scraper::Html;
use tracing::{debug, warn};

use crate::config::{Config, MissingMarketPolicy};
use crate::error::{AppError, Result};
use crate::types::{describe, ExtractedFixture, Extraction, RawFixture, SkippedFixture};

use self::section::{clean_text, read_section, SectionParts, Selectors};

#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub reference_year: i32,
    pub missing_market: MissingMarketPolicy,
}

impl From<&Config> for ExtractOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            reference_year: cfg.reference_year,
            missing_market: cfg.missing_market,
        }
    }
}

/// Parse `html` and extract one record per fixture section.
pub fn extract_fixtures(html: &str, opts: &ExtractOptions) -> Result<Extraction> {
    let doc = Html::parse_document(html);
    let sel = Selectors::new()?;

    let round = doc
        .select(&sel.round_label)
        .next()
        .map(clean_text)
        .and_then(|text| round_from_label(&text));

    let parts: Vec<SectionParts> = doc
        .select(&sel.div)
        .filter(|el| sel.is_event_card(el))
        .map(|el| read_section(el, &sel))
        .collect();
    let sections = parts.len();
    debug!(sections, round = ?round, "located fixture sections");

    let raws = check_structure(parts)?;

    let mut fixtures = Vec::with_capacity(raws.len());
    let mut skipped = Vec::new();
    for raw in &raws {
        match build_fixture(raw, round.as_deref(), opts.reference_year) {
            Ok(fixture) => fixtures.push(fixture),
            Err(AppError::MarketNotFound { fixture, labels })
                if opts.missing_market == MissingMarketPolicy::Skip =>
            {
                warn!(%fixture, ?labels, "no head to head market; fixture skipped");
                skipped.push(SkippedFixture {
                    fixture,
                    reason: format!("no head to head market among {labels:?}"),
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(Extraction {
        round,
        sections,
        fixtures,
        skipped,
    })
}

/// Every section must yield a time node and a home/away pair; any section missing one
/// rejects the whole document. Label and price lists always exist per section (possibly
/// empty); an empty one is left to market selection and surfaces as `MarketNotFound`.
pub fn check_structure(parts: Vec<SectionParts>) -> Result<Vec<RawFixture>> {
    let sections = parts.len();
    let times = parts.iter().filter(|p| p.time_text.is_some()).count();
    let labels = parts.len();
    let prices = parts.len();
    let participants = parts.iter().filter(|p| p.participants.is_some()).count();

    let mismatch = || AppError::StructuralMismatch {
        sections,
        times,
        labels,
        prices,
        participants,
    };
    if times != sections || participants != sections {
        return Err(mismatch());
    }

    parts
        .into_iter()
        .map(|p| match (p.time_text, p.participants) {
            (Some(time_text), Some((home, away))) => Ok(RawFixture {
                time_text,
                market_labels: p.labels,
                price_texts: p.prices,
                home,
                away,
            }),
            _ => Err(mismatch()),
        })
        .collect()
}

fn build_fixture(raw: &RawFixture, round: Option<&str>, year: i32) -> Result<ExtractedFixture> {
    let (market, home_price, away_price) = market::select_head_to_head(raw)?;
    let start_time = time::parse_event_time(&raw.time_text, year)?;
    debug!(
        fixture = %describe(&raw.home, &raw.away),
        %start_time,
        home_price,
        away_price,
        "extracted fixture"
    );
    Ok(ExtractedFixture {
        round: round.map(str::to_string),
        start_time,
        home: raw.home.clone(),
        away: raw.away.clone(),
        market,
        home_price,
        away_price,
    })
}

/// `Round 5` → `5`. Other labels (e.g. `Finals Week 1`) are kept as printed.
pub fn round_from_label(text: &str) -> Option<String> {
    let text = text.trim();
    let round = match (text.get(..5), text.get(5..)) {
        (Some(prefix), Some(rest))
            if prefix.eq_ignore_ascii_case("round")
                && rest.chars().next().map_or(true, char::is_whitespace) =>
        {
            rest.trim()
        }
        _ => text,
    };
    (!round.is_empty()).then(|| round.to_string())
}
