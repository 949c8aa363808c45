// # SMTP Sync Notifier
//
// This crate provides an SMTP-backed SyncNotifier implementation for
// the usync system.
//
// ## Behavior
//
// Sends one plain-text email per completed run, carrying the four
// outcome counters. The engine owns the best-effort semantics: this
// notifier reports delivery failures as errors and the engine swallows
// them; there is no retry here and none upstream.
//
// ## Security
//
// - SMTP credentials NEVER appear in logs
// - The Debug implementation redacts the password

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use lettre::message::Mailbox;
use tracing::debug;

use usync_core::config::NotifierConfig;
use usync_core::traits::SyncNotifier;
use usync_core::{Error, Result, SyncSummary};

/// Subject line for completion emails
const SUBJECT: &str = "User sync completed";

/// Connection settings for the SMTP notifier
#[derive(Clone)]
pub struct SmtpSettings {
    /// SMTP host
    pub host: String,
    /// SMTP port
    pub port: u16,
    /// Username for SMTP authentication (empty = unauthenticated)
    pub username: String,
    /// Password for SMTP authentication
    /// ⚠️ NEVER log this value
    pub password: String,
    /// Sender address
    pub from: String,
    /// Recipient address
    pub to: String,
    /// Whether to negotiate STARTTLS (plain connection otherwise)
    pub starttls: bool,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("starttls", &self.starttls)
            .finish()
    }
}

/// SMTP-backed completion notifier
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    /// Create a notifier from connection settings
    pub fn new(settings: SmtpSettings) -> Result<Self> {
        if settings.host.is_empty() {
            return Err(Error::config("SMTP host cannot be empty"));
        }

        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|e| Error::config(format!("invalid SMTP from address: {e}")))?;
        let to: Mailbox = settings
            .to
            .parse()
            .map_err(|e| Error::config(format!("invalid SMTP to address: {e}")))?;

        let mut builder = if settings.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
                .map_err(|e| Error::config(format!("invalid SMTP relay host: {e}")))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };
        builder = builder.port(settings.port);

        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }

    /// Create a notifier from its config section
    ///
    /// Fails on non-SMTP notifier configs; the caller picks the
    /// implementation matching the config variant.
    pub fn from_config(config: &NotifierConfig) -> Result<Self> {
        config.validate()?;
        match config {
            NotifierConfig::Smtp {
                host,
                port,
                username,
                password,
                from,
                to,
                starttls,
            } => Self::new(SmtpSettings {
                host: host.clone(),
                port: *port,
                username: username.clone(),
                password: password.clone(),
                from: from.clone(),
                to: to.clone(),
                starttls: *starttls,
            }),
            NotifierConfig::Log => Err(Error::config(
                "notifier config is not SMTP; use LogNotifier instead",
            )),
        }
    }

    /// Render the plain-text body for a summary
    fn body(summary: &SyncSummary) -> String {
        format!(
            "User sync completed.\n\n\
             Users created: {}\n\
             Users updated: {}\n\
             Users skipped: {}\n\
             Errors:        {}\n",
            summary.created, summary.updated, summary.skipped, summary.errors
        )
    }

    fn message(&self, summary: &SyncSummary) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(Self::body(summary))
            .map_err(|e| Error::notify(format!("failed to build email: {e}")))
    }
}

#[async_trait]
impl SyncNotifier for SmtpNotifier {
    async fn sync_completed(&self, summary: &SyncSummary) -> Result<()> {
        let message = self.message(summary)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| Error::notify(format!("SMTP delivery failed: {e}")))?;

        debug!(%summary, "completion email sent");
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "smtp"
    }
}
