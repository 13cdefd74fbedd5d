use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use afl_odds_tracker::config::{Config, ReportFormat};
use afl_odds_tracker::db::report::{recent_prices, render_json, render_table};
use afl_odds_tracker::error::Result;
use afl_odds_tracker::pipeline::Pipeline;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    info!(
        url = %cfg.source_url,
        year = cfg.reference_year,
        policy = ?cfg.missing_market,
        "starting scrape"
    );

    let pipeline = Pipeline::connect(cfg).await?;
    let summary = pipeline.run().await?;

    for skipped in &summary.skipped {
        warn!(fixture = %skipped.fixture, reason = %skipped.reason, "fixture not recorded");
    }

    let cfg = pipeline.config();
    let rows = recent_prices(pipeline.pool(), cfg.report_limit).await?;
    match cfg.report_format {
        ReportFormat::Table => println!("\n{}", render_table(&rows)),
        ReportFormat::Json => println!("{}", render_json(&rows)?),
    }

    Ok(())
}
