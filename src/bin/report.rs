//! Read-only listing of stored prices.
//!
//! `report` prints the latest price per fixture.
//! `report history <round> <home> <away>` prints every observation of one fixture.

use tracing::error;
use tracing_subscriber::EnvFilter;

use afl_odds_tracker::config::{Config, ReportFormat};
use afl_odds_tracker::db::{self, report, schema::ensure_schema};
use afl_odds_tracker::error::{AppError, Result};
use afl_odds_tracker::normalize::canonical_team_name;
use afl_odds_tracker::types::FixtureKey;

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
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(cfg, &args).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config, args: &[String]) -> Result<()> {
    let pool = db::connect(&cfg.db_path).await?;
    ensure_schema(&pool).await?;

    match args {
        [] => {
            let rows = report::recent_prices(&pool, cfg.report_limit).await?;
            match cfg.report_format {
                ReportFormat::Table => print!("{}", report::render_table(&rows)),
                ReportFormat::Json => println!("{}", report::render_json(&rows)?),
            }
        }
        [cmd, round, home, away] if cmd == "history" => {
            let key = FixtureKey {
                round: round.clone(),
                home_team: canonical_team_name(home),
                away_team: canonical_team_name(away),
            };
            let rows = report::history(&pool, &key).await?;
            match cfg.report_format {
                ReportFormat::Table => {
                    for o in &rows {
                        println!(
                            "{}  {:.2}  {:.2}  {}  {}",
                            o.captured_at, o.home_price, o.away_price, o.market, o.source
                        );
                    }
                }
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
            }
        }
        _ => {
            return Err(AppError::Config(
                "usage: report [history <round> <home> <away>]".to_string(),
            ))
        }
    }

    Ok(())
}
