use sqlx::SqliteConnection;
use tracing::{debug, error, info};

use crate::error::{AppError, Result};
use crate::types::{BatchOutcome, FixtureKey, FixtureRecord};

/// Writes one run's records: insert-if-absent on the fixture, then append an observation.
/// The whole batch is a single transaction.
pub struct FixtureWriter {
    pool: sqlx::SqlitePool,
}

impl FixtureWriter {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn persist_batch(&self, records: &[FixtureRecord]) -> Result<BatchOutcome> {
        let mut tx = self.pool.begin().await?;
        let mut outcome = BatchOutcome::default();

        for (i, record) in records.iter().enumerate() {
            match write_record(&mut *tx, record).await {
                Ok(created) => {
                    outcome.fixtures_created += u64::from(created);
                    outcome.observations_written += 1;
                }
                Err(e) => {
                    error!(
                        index = i,
                        round = %record.key.round,
                        home = %record.key.home_team,
                        away = %record.key.away_team,
                        "batch write failed, rolling back: {e}"
                    );
                    if let Err(rb) = tx.rollback().await {
                        error!("rollback failed: {rb}");
                    }
                    return Err(e);
                }
            }
        }

        tx.commit().await?;
        info!(
            fixtures_created = outcome.fixtures_created,
            observations = outcome.observations_written,
            "batch committed"
        );
        Ok(outcome)
    }
}

/// Returns true when the fixture row was created by this call.
async fn write_record(conn: &mut SqliteConnection, record: &FixtureRecord) -> Result<bool> {
    let created = insert_fixture_if_absent(conn, record).await?;
    let fixture_id = fixture_id(conn, &record.key).await?.ok_or_else(|| {
        AppError::Consistency(format!(
            "fixture ({:?}, {}, {}) missing after insert",
            record.key.round, record.key.home_team, record.key.away_team
        ))
    })?;

    sqlx::query(
        r#"
        INSERT INTO price_observations (
            fixture_id, market, home_price, away_price, source, captured_at
        ) VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(fixture_id)
    .bind(&record.market)
    .bind(record.home_price)
    .bind(record.away_price)
    .bind(&record.source)
    .bind(record.captured_at)
    .execute(&mut *conn)
    .await?;

    debug!(fixture_id, created, "observation appended");
    Ok(created)
}

async fn insert_fixture_if_absent(conn: &mut SqliteConnection, record: &FixtureRecord) -> Result<bool> {
    let res = sqlx::query(
        r#"
        INSERT INTO fixtures (start_time, round, home_team, away_team)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (round, home_team, away_team) DO NOTHING
        "#,
    )
    .bind(record.start_time)
    .bind(&record.key.round)
    .bind(&record.key.home_team)
    .bind(&record.key.away_team)
    .execute(&mut *conn)
    .await?;
    Ok(res.rows_affected() == 1)
}

pub async fn fixture_id(conn: &mut SqliteConnection, key: &FixtureKey) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM fixtures WHERE round = ? AND home_team = ? AND away_team = ?",
    )
    .bind(&key.round)
    .bind(&key.home_team)
    .bind(&key.away_team)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    use crate::db::{connect, schema::ensure_schema};

    async fn pool() -> sqlx::SqlitePool {
        let pool = connect(":memory:").await.unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    fn captured(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 5, 10, hour, 0, 0).unwrap()
    }

    fn record(round: &str, home: &str, away: &str, prices: (f64, f64), at: DateTime<Utc>) -> FixtureRecord {
        FixtureRecord {
            key: FixtureKey {
                round: round.to_string(),
                home_team: home.to_string(),
                away_team: away.to_string(),
            },
            start_time: NaiveDate::from_ymd_opt(2023, 5, 12)
                .unwrap()
                .and_hms_opt(19, 30, 0)
                .unwrap(),
            market: "Head To Head".to_string(),
            home_price: prices.0,
            away_price: prices.1,
            source: "www.sportsbet.com.au".to_string(),
            captured_at: at,
        }
    }

    async fn count(pool: &sqlx::SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn repeated_fixture_keeps_one_identity() {
        let pool = pool().await;
        let writer = FixtureWriter::new(pool.clone());

        let first = writer
            .persist_batch(&[record("5", "GWS", "Carlton", (1.80, 2.05), captured(1))])
            .await
            .unwrap();
        let second = writer
            .persist_batch(&[record("5", "GWS", "Carlton", (1.75, 2.10), captured(2))])
            .await
            .unwrap();

        assert_eq!(first, BatchOutcome { fixtures_created: 1, observations_written: 1 });
        assert_eq!(second, BatchOutcome { fixtures_created: 0, observations_written: 1 });
        assert_eq!(count(&pool, "fixtures").await, 1);
        assert_eq!(count(&pool, "price_observations").await, 2);
    }

    #[tokio::test]
    async fn failed_record_rolls_back_whole_batch() {
        let pool = pool().await;
        let writer = FixtureWriter::new(pool.clone());

        let batch = vec![
            record("5", "GWS", "Carlton", (1.80, 2.05), captured(1)),
            record("5", "Richmond", "Essendon", (1.45, 2.75), captured(1)),
            // Fails the price CHECK constraint.
            record("5", "Geelong", "Hawthorn", (0.0, 3.60), captured(1)),
            record("5", "Sydney", "Collingwood", (2.10, 1.74), captured(1)),
            record("5", "Adelaide", "Fremantle", (1.55, 2.45), captured(1)),
        ];
        let err = writer.persist_batch(&batch).await.unwrap_err();

        // The caller sees the failing write, not anything from the rollback.
        assert!(matches!(err, AppError::Storage(_)));
        assert!(err.to_string().contains("CHECK constraint failed"), "{err}");
        assert_eq!(count(&pool, "fixtures").await, 0);
        assert_eq!(count(&pool, "price_observations").await, 0);
    }

    #[tokio::test]
    async fn rollback_keeps_earlier_runs() {
        let pool = pool().await;
        let writer = FixtureWriter::new(pool.clone());

        writer
            .persist_batch(&[record("5", "GWS", "Carlton", (1.80, 2.05), captured(1))])
            .await
            .unwrap();
        let res = writer
            .persist_batch(&[
                record("5", "GWS", "Carlton", (1.70, 2.20), captured(2)),
                record("5", "Richmond", "Essendon", (1.45, 0.5), captured(2)),
            ])
            .await;

        assert!(res.is_err());
        assert_eq!(count(&pool, "fixtures").await, 1);
        assert_eq!(count(&pool, "price_observations").await, 1);
    }

    #[tokio::test]
    async fn observations_are_append_only() {
        let pool = pool().await;
        FixtureWriter::new(pool.clone())
            .persist_batch(&[record("5", "GWS", "Carlton", (1.80, 2.05), captured(1))])
            .await
            .unwrap();

        let update = sqlx::query("UPDATE price_observations SET home_price = 9.0")
            .execute(&pool)
            .await;
        let delete = sqlx::query("DELETE FROM price_observations").execute(&pool).await;
        let rename = sqlx::query("UPDATE fixtures SET home_team = 'Giants'")
            .execute(&pool)
            .await;

        assert!(update.is_err());
        assert!(delete.is_err());
        assert!(rename.is_err());
        assert_eq!(count(&pool, "price_observations").await, 1);
    }

    #[tokio::test]
    async fn first_sighting_start_time_is_kept() {
        let pool = pool().await;
        let writer = FixtureWriter::new(pool.clone());

        let mut moved = record("5", "GWS", "Carlton", (1.80, 2.05), captured(2));
        moved.start_time = NaiveDate::from_ymd_opt(2023, 5, 13)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap();
        writer
            .persist_batch(&[record("5", "GWS", "Carlton", (1.80, 2.05), captured(1))])
            .await
            .unwrap();
        writer.persist_batch(&[moved]).await.unwrap();

        let start: String = sqlx::query_scalar("SELECT start_time FROM fixtures")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(start.starts_with("2023-05-12 19:30"));
    }

    #[tokio::test]
    async fn empty_batch_commits_nothing() {
        let pool = pool().await;
        let outcome = FixtureWriter::new(pool.clone()).persist_batch(&[]).await.unwrap();
        assert_eq!(outcome, BatchOutcome::default());
        assert_eq!(count(&pool, "fixtures").await, 0);
    }
}
