//! PhishLens CLI - check URLs against the phishing classification service.
//!
//! Usage:
//!   phishlens scan http://paypal.com.security-checkupdate.com/login
//!   phishlens history
//!   phishlens replay 0 --json
//!   phishlens clear
//!   phishlens health --service-url http://127.0.0.1:5000

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use phishlens_core::api::{Command, CommandOutcome, ScanSession};
use phishlens_core::constants::{APP_NAME, APP_VERSION};
use phishlens_core::logic::explain::Contributions;
use phishlens_core::{HistoryRecord, HistoryStore, HttpClassifier, ScanConfig, ScanPhase};

#[derive(Parser)]
#[command(name = "phishlens")]
#[command(about = "Explainable phishing checks for URLs", long_about = None)]
struct Cli {
    /// Classification service base URL (overrides PHISHLENS_SERVICE_URL)
    #[arg(long, global = true)]
    service_url: Option<String>,

    /// Service API key (overrides PHISHLENS_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Directory holding the scan history (overrides PHISHLENS_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a URL and record it in history
    Scan { url: String },
    /// Show past scans, newest first
    History,
    /// Re-run a past scan without recording it again
    Replay { index: usize },
    /// Delete all scan history
    Clear,
    /// Check that the classification service is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = ScanConfig::from_env();
    if let Some(url) = cli.service_url {
        config = config.with_service_url(url);
    }
    if cli.api_key.is_some() {
        config = config.with_api_key(cli.api_key);
    }
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    log::info!("{} v{} (service: {})", APP_NAME, APP_VERSION, config.service_url);

    let client = HttpClassifier::new(&config)?;

    let history = Arc::new(HistoryStore::from_config(&config));
    log::debug!("History file: {}", history.path().display());

    let command = match cli.command {
        Commands::Scan { url } => Command::Submit { url },
        Commands::Replay { index } => Command::Replay { index },
        Commands::Clear => Command::Clear,
        Commands::History => {
            print_history(&history.load(), cli.json)?;
            return Ok(());
        }
        Commands::Health => {
            let banner = client.health_check().await?;
            println!("{}", banner);
            return Ok(());
        }
    };

    let session = ScanSession::new(client, history);
    let outcome = session.execute(command).await?;
    print_outcome(&outcome, cli.json)?;

    if let Some(err) = outcome.state.error() {
        bail!("scan failed ({})", err.kind());
    }
    Ok(())
}

fn print_outcome(outcome: &CommandOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    match &outcome.state.phase {
        ScanPhase::Success { url, is_replay, result } => {
            println!("\n{}", "=".repeat(70));
            println!("URL:        {}", url);
            println!("VERDICT:    {}", result.prediction);
            match result.confidence_percent() {
                Some(p) => println!("CONFIDENCE: {}%", p),
                None => println!("CONFIDENCE: unknown"),
            }
            if *is_replay {
                println!("(replayed from history)");
            }
            println!("{}", "=".repeat(70));

            match &result.contributions {
                Contributions::Unavailable => println!("No feature explanation available."),
                Contributions::Ranked(items) => {
                    println!("WHY:");
                    for c in items {
                        println!("  [{:>9}] {}", c.display_value, c.feature_id);
                        println!("              {}", c.explanation);
                    }
                }
            }
        }
        ScanPhase::Error { url, error } => {
            eprintln!("[!] {}: {}", url, error);
        }
        ScanPhase::Idle | ScanPhase::Pending { .. } => {}
    }

    if let phishlens_core::Effect::HistoryCleared = outcome.effect {
        println!("History cleared.");
    }
    Ok(())
}

fn print_history(records: &[HistoryRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No scans yet.");
        return Ok(());
    }

    for (i, r) in records.iter().enumerate() {
        let when = chrono::DateTime::from_timestamp_millis(r.timestamp)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| r.timestamp.to_string());
        let confidence = r
            .confidence
            .map(|c| format!("{:.0}%", c * 100.0))
            .unwrap_or_else(|| "?".to_string());
        println!("{:>3}  {}  {:<10} {:>4}  {}", i, when, r.prediction.as_str(), confidence, r.url);
    }
    Ok(())
}
