//! Runtime configuration.
//!
//! Values come from three layers, highest priority first:
//!
//! 1. command-line flags and their environment variables ([`crate::cli::Cli`])
//! 2. the optional YAML file given with `--config` ([`FileConfig`])
//! 3. built-in defaults
//!
//! The result is an [`AppConfig`], passed explicitly to the pipeline.
//!
//! ```yaml
//! digest_title: Monitoraggio Europeo
//! history_file: /var/lib/news_digest/history.json
//! request_timeout_secs: 15
//! smtp:
//!   host: smtp.gmail.com
//!   port: 465
//!   username: sender@example.com
//!   recipient: me@example.com
//! sites:
//!   - pattern: https://ec.europa.eu/commission/presscorner/home/en
//!     article_selector: section.latest-news li
//!     date_selector: span.date
//! ```

use crate::cli::Cli;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::scrapers::fetch::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::scrapers::strategy::{default_site_rules, SiteRule};
use chrono::NaiveDate;
use directories::UserDirs;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};

pub const DEFAULT_DIGEST_TITLE: &str = "Monitoraggio Europeo";
pub const DEFAULT_HISTORY_FILE: &str = "news_history.json";
pub const DEFAULT_LINKS_FILE: &str = "links.docx";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Contents of the YAML configuration file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub links: Option<PathBuf>,
    pub history_file: Option<PathBuf>,
    pub history_limit: Option<usize>,
    pub digest_title: Option<String>,
    pub user_agent: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub smtp: SmtpFileConfig,
    /// Replaces the built-in site rules when present.
    pub sites: Option<Vec<SiteRule>>,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct SmtpFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
    pub recipient: Option<String>,
}

impl fmt::Debug for SmtpFileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpFileConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("from", &self.from)
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Mail transport settings.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender address; the username when unset.
    pub from: Option<String>,
    pub recipient: Option<String>,
}

impl SmtpConfig {
    /// Address the digest is sent from.
    pub fn sender(&self) -> Option<&str> {
        self.from.as_deref().or(self.username.as_deref())
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("from", &self.from)
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Fully resolved configuration of one run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub links_path: PathBuf,
    pub history_path: PathBuf,
    pub history_limit: usize,
    pub reference_date: NaiveDate,
    pub digest_title: String,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub smtp: SmtpConfig,
    pub sites: Vec<SiteRule>,
    pub dry_run: bool,
}

impl AppConfig {
    /// Merge CLI arguments over file values over defaults.
    ///
    /// `today` is used when no reference date was given.
    pub fn resolve(cli: &Cli, file: FileConfig, today: NaiveDate) -> Self {
        let smtp = SmtpConfig {
            host: cli
                .smtp_host
                .clone()
                .or(file.smtp.host)
                .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port: cli.smtp_port.or(file.smtp.port).unwrap_or(DEFAULT_SMTP_PORT),
            username: cli.smtp_username.clone().or(file.smtp.username),
            password: cli.smtp_password.clone().or(file.smtp.password),
            from: file.smtp.from,
            recipient: cli.recipient.clone().or(file.smtp.recipient),
        };

        Self {
            links_path: cli
                .links
                .clone()
                .or(file.links)
                .unwrap_or_else(default_links_path),
            history_path: cli
                .history_file
                .clone()
                .or(file.history_file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE)),
            history_limit: file.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
            reference_date: cli.reference_date.unwrap_or(today),
            digest_title: file
                .digest_title
                .unwrap_or_else(|| DEFAULT_DIGEST_TITLE.to_string()),
            user_agent: file
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            request_timeout: file
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            smtp,
            sites: file.sites.unwrap_or_else(default_site_rules),
            dry_run: cli.dry_run,
        }
    }
}

/// `links.docx` on the user's desktop, falling back to the current directory.
pub fn default_links_path() -> PathBuf {
    UserDirs::new()
        .map(|dirs| {
            dirs.desktop_dir()
                .map(|desktop| desktop.to_path_buf())
                .unwrap_or_else(|| dirs.home_dir().join("Desktop"))
        })
        .map(|desktop| desktop.join(DEFAULT_LINKS_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LINKS_FILE))
}

/// Read and parse the YAML configuration file at `path`.
#[instrument(level = "info")]
pub async fn load_file_config(path: &str) -> Result<FileConfig, Box<dyn Error>> {
    let raw = fs::read_to_string(path).await?;
    let config: FileConfig = serde_yaml::from_str(&raw)?;
    info!(sites = config.sites.as_ref().map(Vec::len), "Loaded configuration file");
    Ok(config)
}
