use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::assemble::{assemble_all, source_from_url};
use crate::config::Config;
use crate::db::{self, schema::ensure_schema, writer::FixtureWriter};
use crate::error::Result;
use crate::extract::{extract_fixtures, ExtractOptions};
use crate::fetcher::fetch_document;
use crate::types::RunSummary;

/// fetch → extract → assemble → persist, once per call.
pub struct Pipeline {
    cfg: Config,
    source: String,
    pool: sqlx::SqlitePool,
}

impl Pipeline {
    /// Open the store named in `cfg` and make sure the schema exists.
    pub async fn connect(cfg: Config) -> Result<Self> {
        let pool = db::connect(&cfg.db_path).await?;
        Self::with_pool(cfg, pool).await
    }

    pub async fn with_pool(cfg: Config, pool: sqlx::SqlitePool) -> Result<Self> {
        let source = source_from_url(&cfg.source_url)?;
        ensure_schema(&pool).await?;
        info!(db = %cfg.db_path, %source, "store ready");
        Ok(Self { cfg, source, pool })
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// One full pass against the live page.
    pub async fn run(&self) -> Result<RunSummary> {
        let html = fetch_document(&self.cfg).await?;
        self.ingest(&html, Utc::now()).await
    }

    /// Extract everything from `html` before touching the store, then persist it as one batch.
    pub async fn ingest(&self, html: &str, captured_at: DateTime<Utc>) -> Result<RunSummary> {
        let extraction = extract_fixtures(html, &ExtractOptions::from(&self.cfg))?;
        if extraction.sections == 0 {
            warn!(url = %self.cfg.source_url, "no fixture sections found");
        }

        let records = assemble_all(extraction.fixtures, &self.source, captured_at);

        ensure_schema(&self.pool).await?;
        let batch = FixtureWriter::new(self.pool.clone())
            .persist_batch(&records)
            .await?;

        let summary = RunSummary {
            round: extraction.round,
            sections: extraction.sections,
            batch,
            skipped: extraction.skipped,
        };
        info!(
            round = summary.round.as_deref().unwrap_or("-"),
            sections = summary.sections,
            fixtures_created = summary.batch.fixtures_created,
            observations = summary.batch.observations_written,
            skipped = summary.skipped.len(),
            "run complete"
        );
        Ok(summary)
    }
}
