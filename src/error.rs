use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Per-section component counts disagree; nothing from the document is usable.
    #[error(
        "Structural mismatch: sections={sections} times={times} labels={labels} \
         prices={prices} participants={participants}"
    )]
    StructuralMismatch {
        sections: usize,
        times: usize,
        labels: usize,
        prices: usize,
        participants: usize,
    },

    #[error("No head to head market for {fixture} (labels: {labels:?})")]
    MarketNotFound { fixture: String, labels: Vec<String> },

    #[error("Market {market_index} of {fixture} has no price pair ({found} prices listed)")]
    MissingPrices {
        fixture: String,
        market_index: usize,
        found: usize,
    },

    #[error("Time parse error: {text:?}")]
    TimeParse { text: String },

    #[error("Price parse error: {text:?}")]
    PriceParse { text: String },

    #[error("Selector error: {0}")]
    Selector(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Consistency error: {0}")]
    Consistency(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
