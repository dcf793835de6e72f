//! Digest delivery over SMTP.
//!
//! The [`Mailer`] builds a `multipart/alternative` message (plain text +
//! HTML) and hands it to a [`MailTransport`]. In production that is
//! [`SmtpTransport`]: SMTP over implicit TLS with username/password
//! authentication.
//!
//! Delivery never fails the run. Every problem (missing credentials, bad
//! addresses, transport errors) is logged and reported as
//! [`DeliveryOutcome::Failed`].

use crate::config::SmtpConfig;
use crate::models::Article;
use crate::outputs::DigestFormatter;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tracing::{error, info, instrument};

/// What happened to a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Nothing to send.
    Skipped,
    /// Rendered and logged only (dry run).
    Previewed,
    /// Accepted by the mail server.
    Sent,
    /// Could not be sent; details were logged.
    Failed,
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeliveryOutcome::Skipped => "skipped",
            DeliveryOutcome::Previewed => "previewed",
            DeliveryOutcome::Sent => "sent",
            DeliveryOutcome::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Something able to deliver a finished message.
pub trait MailTransport {
    async fn deliver(&self, message: Message) -> Result<(), Box<dyn Error>>;
}

/// [`MailTransport`] speaking SMTP over TLS to the configured server.
pub struct SmtpTransport {
    config: SmtpConfig,
    timeout: Duration,
}

impl SmtpTransport {
    pub fn new(config: SmtpConfig, timeout: Duration) -> Self {
        Self { config, timeout }
    }
}

impl fmt::Debug for SmtpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpTransport")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl MailTransport for SmtpTransport {
    #[instrument(level = "info", skip_all, fields(host = %self.config.host, port = self.config.port))]
    async fn deliver(&self, message: Message) -> Result<(), Box<dyn Error>> {
        let (Some(username), Some(password)) = (&self.config.username, &self.config.password) else {
            return Err("SMTP username and password are required".into());
        };
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)?
            .port(self.config.port)
            .credentials(Credentials::new(username.clone(), password.clone()))
            .timeout(Some(self.timeout))
            .build();

        let response = transport.send(message).await?;
        info!(code = %response.code(), "SMTP server accepted message");
        Ok(())
    }
}

/// Sends digests to a single recipient.
#[derive(Debug)]
pub struct Mailer<T> {
    transport: T,
    formatter: DigestFormatter,
    sender: Option<String>,
    recipient: Option<String>,
}

impl<T: MailTransport> Mailer<T> {
    pub fn new(transport: T, formatter: DigestFormatter, sender: Option<String>, recipient: Option<String>) -> Self {
        Self {
            transport,
            formatter,
            sender,
            recipient,
        }
    }

    pub fn formatter(&self) -> &DigestFormatter {
        &self.formatter
    }

    /// Build the digest message for `articles`.
    pub fn build_message(&self, articles: &[Article]) -> Result<Message, Box<dyn Error>> {
        let sender = self.sender.as_deref().ok_or("no sender address configured")?;
        let recipient = self.recipient.as_deref().ok_or("no recipient address configured")?;

        let message = Message::builder()
            .from(sender.parse::<Mailbox>()?)
            .to(recipient.parse::<Mailbox>()?)
            .subject(self.formatter.subject())
            .multipart(MultiPart::alternative_plain_html(
                self.formatter.format_text(articles),
                self.formatter.format(articles),
            ))?;
        Ok(message)
    }

    /// Mail the digest of `articles`.
    ///
    /// An empty list sends nothing.
    #[instrument(level = "info", skip_all, fields(articles = articles.len()))]
    pub async fn send(&self, articles: &[Article]) -> DeliveryOutcome {
        if articles.is_empty() {
            info!("No new articles to send");
            return DeliveryOutcome::Skipped;
        }

        let message = match self.build_message(articles) {
            Ok(message) => message,
            Err(e) => {
                error!(error = %e, "Failed to build digest email");
                return DeliveryOutcome::Failed;
            }
        };

        match self.transport.deliver(message).await {
            Ok(()) => {
                info!("Digest email sent");
                DeliveryOutcome::Sent
            }
            Err(e) => {
                error!(error = %e, "Failed to send digest email");
                DeliveryOutcome::Failed
            }
        }
    }
}
