use serde::Serialize;

/// Row types read back through sqlx. Timestamps stay as the stored text.

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FixtureRow {
    pub id: i64,
    pub start_time: String,
    pub round: String,
    pub home_team: String,
    pub away_team: String,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct PriceObservationRow {
    pub id: i64,
    pub fixture_id: i64,
    pub market: String,
    pub home_price: f64,
    pub away_price: f64,
    pub source: String,
    pub captured_at: String,
}

/// One row of the `latest_prices` view.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct LatestPriceRow {
    pub fixture_id: i64,
    pub round: String,
    pub start_time: String,
    pub home_team: String,
    pub home_price: f64,
    pub away_team: String,
    pub away_price: f64,
    pub market: String,
    pub source: String,
    pub captured_at: String,
}
