use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, Result};

/// GET the fixtures page and return its body. No retries; a failed fetch ends the run.
pub async fn fetch_document(cfg: &Config) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.fetch_timeout_secs))
        .user_agent(cfg.user_agent.as_str())
        .build()?;

    debug!(url = %cfg.source_url, "fetching document");
    let resp = client.get(&cfg.source_url).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(AppError::HttpStatus {
            status: status.as_u16(),
            url: cfg.source_url.clone(),
        });
    }

    let body = resp.text().await?;
    info!(url = %cfg.source_url, bytes = body.len(), "document fetched");
    Ok(body)
}
