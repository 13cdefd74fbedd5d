use chrono::Datelike;

use crate::error::{AppError, Result};

pub const SOURCE_URL: &str = "https://www.sportsbet.com.au/betting/australian-rules/afl";
pub const DB_PATH: &str = "afl_odds.db";

/// Market whose prices are recorded. Compared case-insensitively against coupon labels.
pub const HEAD_TO_HEAD: &str = "head to head";

/// HTTP timeout for the document fetch (seconds).
pub const FETCH_TIMEOUT_SECS: u64 = 30;

/// Rows shown by the recent-prices listing.
pub const REPORT_LIMIT: i64 = 20;

/// `data-automation-id` values the extractor keys on.
pub mod automation_ids {
    pub const EVENT_CARD_PATTERN: &str = r"^\d+-competition-event-card$";
    pub const EVENT_TIME: &str = "competition-event-card-time";
    pub const PRICE_TEXT: &str = "price-text";
    pub const MARKET_LABEL: &str = "market-coupon-label";
    pub const PARTICIPANT_PATTERN: &str = r"participant-(one|two)";
    pub const ROUND_LABEL: &str = "competition-round-label";
}

/// What to do with a fixture that has no head to head market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingMarketPolicy {
    /// Fail the whole run; nothing is persisted.
    Abort,
    /// Drop the fixture, report it, persist the rest.
    Skip,
}

impl std::str::FromStr for MissingMarketPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(MissingMarketPolicy::Abort),
            "skip" => Ok(MissingMarketPolicy::Skip),
            other => Err(AppError::Config(format!(
                "MISSING_MARKET_POLICY must be 'abort' or 'skip', got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Table,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            other => Err(AppError::Config(format!(
                "REPORT_FORMAT must be 'table' or 'json', got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source_url: String,
    pub db_path: String,
    pub log_level: String,
    /// Year combined with scraped "Friday, 12 May 19:30" text (REFERENCE_YEAR).
    /// Fixtures across a new-year boundary get the wrong year; nothing here infers rollover.
    pub reference_year: i32,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub missing_market: MissingMarketPolicy,
    pub report_limit: i64,
    pub report_format: ReportFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            source_url: std::env::var("SOURCE_URL").unwrap_or_else(|_| SOURCE_URL.to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| DB_PATH.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            reference_year: match std::env::var("REFERENCE_YEAR") {
                Ok(v) => v.trim().parse::<i32>().map_err(|_| {
                    AppError::Config("REFERENCE_YEAR must be a four digit year".to_string())
                })?,
                Err(_) => chrono::Local::now().year(),
            },
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| FETCH_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .map_err(|_| {
                    AppError::Config("FETCH_TIMEOUT_SECS must be a whole number".to_string())
                })?,
            user_agent: std::env::var("USER_AGENT").unwrap_or_else(|_| {
                format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            }),
            missing_market: std::env::var("MISSING_MARKET_POLICY")
                .unwrap_or_else(|_| "abort".to_string())
                .parse()?,
            report_limit: std::env::var("REPORT_LIMIT")
                .unwrap_or_else(|_| REPORT_LIMIT.to_string())
                .parse::<i64>()
                .map_err(|_| AppError::Config("REPORT_LIMIT must be a whole number".to_string()))?,
            report_format: std::env::var("REPORT_FORMAT")
                .unwrap_or_else(|_| "table".to_string())
                .parse()?,
        })
    }

    /// Defaults with an in-memory store and a fixed reference year.
    pub fn in_memory(reference_year: i32) -> Self {
        Self {
            source_url: SOURCE_URL.to_string(),
            db_path: ":memory:".to_string(),
            log_level: "info".to_string(),
            reference_year,
            fetch_timeout_secs: FETCH_TIMEOUT_SECS,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            missing_market: MissingMarketPolicy::Abort,
            report_limit: REPORT_LIMIT,
            report_format: ReportFormat::Table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Skip".parse::<MissingMarketPolicy>().unwrap(), MissingMarketPolicy::Skip);
        assert_eq!(" abort ".parse::<MissingMarketPolicy>().unwrap(), MissingMarketPolicy::Abort);
        assert!(matches!(
            "retry".parse::<MissingMarketPolicy>(),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn report_format_rejects_unknown() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("csv".parse::<ReportFormat>().is_err());
    }
}
