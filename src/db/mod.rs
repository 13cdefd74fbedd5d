pub mod models;
pub mod report;
pub mod schema;
pub mod writer;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;

/// Open the store at `db_path`, creating the file if needed. `:memory:` opens a private
/// in-memory database on a single long-lived connection.
pub async fn connect(db_path: &str) -> Result<SqlitePool> {
    if db_path == ":memory:" {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;
        return Ok(pool);
    }

    let opts = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);
    Ok(SqlitePool::connect_with(opts).await?)
}
