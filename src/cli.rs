//! Command-line interface definitions for News Digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Most options can also be provided via environment variables, and all of
//! them override the values of the optional YAML configuration file.

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the News Digest application.
///
/// # Examples
///
/// ```sh
/// # Read ~/Desktop/links.docx and mail today's digest
/// news_digest
///
/// # Explicit link list, config file and reference day, without mailing
/// news_digest -l ./links.txt -c ./news_digest.yaml --reference-date 2024-11-14 --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Document listing the pages to monitor (.docx, or plain text with one URL per line)
    #[arg(short, long, env = "NEWS_DIGEST_LINKS")]
    pub links: Option<PathBuf>,

    /// JSON file holding the ids of already delivered articles
    #[arg(long, env = "NEWS_DIGEST_HISTORY")]
    pub history_file: Option<PathBuf>,

    /// Optional path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Day whose articles are collected (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub reference_date: Option<NaiveDate>,

    /// Log the digest instead of mailing it; history is left untouched
    #[arg(long)]
    pub dry_run: bool,

    /// SMTP server (implicit TLS)
    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    /// SMTP port
    #[arg(long, env = "SMTP_PORT")]
    pub smtp_port: Option<u16>,

    /// SMTP login, also used as the sender address
    #[arg(long, env = "SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    /// SMTP password
    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,

    /// Address receiving the digest
    #[arg(long, env = "DIGEST_RECIPIENT")]
    pub recipient: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "news_digest",
            "--links",
            "./links.docx",
            "--history-file",
            "/tmp/history.json",
            "--reference-date",
            "2024-11-14",
            "--dry-run",
        ]);

        assert_eq!(cli.links, Some(PathBuf::from("./links.docx")));
        assert_eq!(cli.history_file, Some(PathBuf::from("/tmp/history.json")));
        assert_eq!(cli.reference_date, NaiveDate::from_ymd_opt(2024, 11, 14));
        assert!(cli.dry_run);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["news_digest", "-l", "links.txt", "-c", "digest.yaml"]);

        assert_eq!(cli.links, Some(PathBuf::from("links.txt")));
        assert_eq!(cli.config.as_deref(), Some("digest.yaml"));
    }

    #[test]
    fn test_cli_rejects_bad_reference_date() {
        let result = Cli::try_parse_from(["news_digest", "--reference-date", "14/11/2024"]);
        assert!(result.is_err());
    }
}
