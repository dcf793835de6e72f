//! # News Digest
//!
//! A personal news monitor: it scrapes a list of news pages for articles
//! published today, summarizes them, drops the ones already delivered in
//! earlier runs and emails the rest as an HTML digest.
//!
//! ## Usage
//!
//! ```sh
//! SMTP_USERNAME=me@gmail.com SMTP_PASSWORD=... DIGEST_RECIPIENT=me@work.eu \
//!     news_digest -l ~/Desktop/links.docx
//! ```
//!
//! ## Architecture
//!
//! The application is a strictly sequential pipeline:
//! 1. **Loading**: read the monitored URLs from a `.docx` (or text) document
//! 2. **Extracting**: per URL, find same-day article blocks, fetch each
//!    article and keep a five-sentence extract
//! 3. **Filtering**: drop articles whose id is in the history file
//! 4. **Delivering**: mail the digest over SMTP/TLS
//! 5. **Remembering**: append the delivered ids to the history (last 1000 kept)
//!
//! A failing page, article or mail server is logged and never stops the run;
//! the process always exits successfully once its arguments parse.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod dates;
mod history;
mod links;
mod mailer;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod summarize;
mod utils;

use cli::Cli;
use config::{load_file_config, AppConfig, FileConfig};
use mailer::{Mailer, SmtpTransport};
use outputs::{DigestFormatter, DigestHeader};
use pipeline::Orchestrator;
use scrapers::HttpFetcher;
use utils::local_today;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_digest starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.links, ?args.config, ?args.reference_date, "Parsed CLI arguments");

    // ---- Configuration ----
    let file_config = match &args.config {
        Some(path) => match load_file_config(path).await {
            Ok(file_config) => file_config,
            Err(e) => {
                error!(path = %path, error = %e, "Failed to load configuration file; using defaults");
                FileConfig::default()
            }
        },
        None => FileConfig::default(),
    };
    let config = AppConfig::resolve(&args, file_config, local_today());
    info!(
        links = %config.links_path.display(),
        history = %config.history_path.display(),
        reference_date = %config.reference_date,
        sites = config.sites.len(),
        dry_run = config.dry_run,
        "Configuration resolved"
    );

    // ---- Collaborators ----
    let fetcher = match HttpFetcher::new(&config.user_agent, config.request_timeout) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return Ok(());
        }
    };
    let formatter = DigestFormatter::new(DigestHeader::new(&config.digest_title, config.reference_date));
    let mailer = Mailer::new(
        SmtpTransport::new(config.smtp.clone(), config.request_timeout),
        formatter,
        config.smtp.sender().map(str::to_string),
        config.smtp.recipient.clone(),
    );

    // ---- Run ----
    match Orchestrator::new(&config, &fetcher, &mailer).run().await {
        Ok(summary) => info!(
            urls = summary.urls,
            found = summary.found,
            new = summary.new,
            delivery = %summary.delivery,
            "Run summary"
        ),
        Err(e) => error!(path = %config.links_path.display(), error = %e, "Cannot read links document; nothing to do"),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
