use sqlx::SqlitePool;

use crate::db::models::{LatestPriceRow, PriceObservationRow};
use crate::error::Result;
use crate::types::FixtureKey;

/// Latest observation per fixture, newest capture first.
pub async fn recent_prices(pool: &SqlitePool, limit: i64) -> Result<Vec<LatestPriceRow>> {
    let rows = sqlx::query_as::<_, LatestPriceRow>(
        r#"
        SELECT fixture_id, round, start_time, home_team, home_price,
               away_team, away_price, market, source, captured_at
        FROM latest_prices
        ORDER BY captured_at DESC, start_time ASC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every observation recorded for one fixture, oldest first.
pub async fn history(pool: &SqlitePool, key: &FixtureKey) -> Result<Vec<PriceObservationRow>> {
    let rows = sqlx::query_as::<_, PriceObservationRow>(
        r#"
        SELECT o.id, o.fixture_id, o.market, o.home_price, o.away_price, o.source, o.captured_at
        FROM price_observations o
        JOIN fixtures f ON f.id = o.fixture_id
        WHERE f.round = ? AND f.home_team = ? AND f.away_team = ?
        ORDER BY o.id ASC
        "#,
    )
    .bind(&key.round)
    .bind(&key.home_team)
    .bind(&key.away_team)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

const HEADERS: [&str; 7] = [
    "round",
    "start_time",
    "home_team",
    "home_price",
    "away_team",
    "away_price",
    "captured_at",
];

/// Fixed-width text table of the view rows.
pub fn render_table(rows: &[LatestPriceRow]) -> String {
    let cells: Vec<[String; 7]> = rows
        .iter()
        .map(|r| {
            [
                r.round.clone(),
                r.start_time.clone(),
                r.home_team.clone(),
                format!("{:.2}", r.home_price),
                r.away_team.clone(),
                format!("{:.2}", r.away_price),
                r.captured_at.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, HEADERS.iter().copied(), &widths);
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize; 7]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

pub fn render_json(rows: &[LatestPriceRow]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}
