use sqlx::SqlitePool;
use tracing::debug;

use crate::error::Result;

/// Natural key is (round, home_team, away_team). Observations are append-only, fixtures
/// are immutable; both are enforced with triggers.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS fixtures (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        start_time  TEXT NOT NULL,
        round       TEXT NOT NULL DEFAULT '',
        home_team   TEXT NOT NULL,
        away_team   TEXT NOT NULL,
        UNIQUE (round, home_team, away_team)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS price_observations (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        fixture_id  INTEGER NOT NULL REFERENCES fixtures (id),
        market      TEXT NOT NULL,
        home_price  REAL NOT NULL CHECK (home_price >= 1.0),
        away_price  REAL NOT NULL CHECK (away_price >= 1.0),
        source      TEXT NOT NULL,
        captured_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_price_observations_fixture
        ON price_observations (fixture_id, id)
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS price_observations_no_update
    BEFORE UPDATE ON price_observations
    BEGIN
        SELECT RAISE(ABORT, 'price_observations is append-only');
    END
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS price_observations_no_delete
    BEFORE DELETE ON price_observations
    BEGIN
        SELECT RAISE(ABORT, 'price_observations is append-only');
    END
    "#,
    r#"
    CREATE TRIGGER IF NOT EXISTS fixtures_no_update
    BEFORE UPDATE ON fixtures
    BEGIN
        SELECT RAISE(ABORT, 'fixtures are immutable');
    END
    "#,
    r#"
    CREATE VIEW IF NOT EXISTS latest_prices AS
    SELECT
        f.id          AS fixture_id,
        f.round       AS round,
        f.start_time  AS start_time,
        f.home_team   AS home_team,
        o.home_price  AS home_price,
        f.away_team   AS away_team,
        o.away_price  AS away_price,
        o.market      AS market,
        o.source      AS source,
        o.captured_at AS captured_at
    FROM fixtures f
    JOIN price_observations o ON o.fixture_id = f.id
    WHERE o.id = (
        SELECT MAX(id) FROM price_observations WHERE fixture_id = f.id
    )
    "#,
];

/// Create tables, triggers and the view if missing. Safe to call on every run.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    for &statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    debug!("schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect;

    #[tokio::test]
    async fn provisioning_is_idempotent() {
        let pool = connect(":memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();
        ensure_schema(&pool).await.unwrap();

        let objects: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type IN ('table', 'view') \
             AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        let names: Vec<&str> = objects.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(names, vec!["fixtures", "latest_prices", "price_observations"]);
    }

    #[tokio::test]
    async fn observations_reject_orphans() {
        let pool = connect(":memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();

        let res = sqlx::query(
            "INSERT INTO price_observations \
             (fixture_id, market, home_price, away_price, source, captured_at) \
             VALUES (999, 'Head To Head', 1.5, 2.5, 'example.com', '2023-05-10T00:00:00+00:00')",
        )
        .execute(&pool)
        .await;
        assert!(res.is_err());
    }
}
