use async_trait::async_trait;
use eventboard_core::{env_non_empty, env_or, env_parse_with_default};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::MailError;

/// Default relay, matching a local mail catcher.
pub const DEFAULT_SMTP_HOST: &str = "localhost";
pub const DEFAULT_SMTP_PORT: u16 = 1025;
pub const DEFAULT_EMAIL_FROM: &str = "noreply@wargameevents.local";

/// Sends a single HTML message.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError>;
}

/// SMTP connection settings.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: String,
    pub from: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("from", &self.from)
            .finish()
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_owned(),
            port: DEFAULT_SMTP_PORT,
            username: None,
            password: String::new(),
            from: DEFAULT_EMAIL_FROM.to_owned(),
        }
    }
}

impl SmtpConfig {
    /// Read `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASS` and `EMAIL_FROM`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            host: env_or("SMTP_HOST", DEFAULT_SMTP_HOST),
            port: env_parse_with_default("SMTP_PORT", DEFAULT_SMTP_PORT),
            username: env_non_empty("SMTP_USER"),
            password: std::env::var("SMTP_PASS").unwrap_or_default(),
            from: env_or("EMAIL_FROM", DEFAULT_EMAIL_FROM),
        }
    }
}

/// Plain SMTP sender. Authenticates only when a username is configured.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer").field("from", &self.from.to_string()).finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// # Errors
    /// Returns an error if the sender address does not parse.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let from = parse_mailbox(&config.from)?;
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port);
        if let Some(user) = &config.username {
            builder = builder.credentials(Credentials::new(user.clone(), config.password.clone()));
        }
        tracing::debug!(host = %config.host, port = config.port, "SMTP mailer configured");
        Ok(Self { transport: builder.build(), from })
    }

    pub fn from_env() -> Result<Self, MailError> {
        Self::new(&SmtpConfig::from_env())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailError::InvalidAddress {
        address: address.to_owned(),
        reason: e.to_string(),
    })
}

/// Build the HTML message sent by `SmtpMailer`.
fn build_message(from: &Mailbox, to: &str, subject: &str, html: &str) -> Result<Message, MailError> {
    Ok(Message::builder()
        .from(from.clone())
        .to(parse_mailbox(to)?)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html.to_owned())?)
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        let message = build_message(&self.from, to, subject, html)?;
        self.transport.send(message).await?;
        tracing::debug!(to, subject, "mail sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_debug_hides_password() {
        let config = SmtpConfig { password: "hunter2".to_owned(), ..SmtpConfig::default() };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("localhost"));
    }

    #[test]
    fn rejects_bad_sender() {
        let config = SmtpConfig { from: "not an address".to_owned(), ..SmtpConfig::default() };
        assert!(matches!(SmtpMailer::new(&config), Err(MailError::InvalidAddress { .. })));
    }

    #[test]
    fn message_carries_html_body_and_subject() {
        let from = parse_mailbox(DEFAULT_EMAIL_FROM).unwrap();
        let message =
            build_message(&from, "player@example.com", "Your Monthly Wargame Events", "<p>hi</p>")
                .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Your Monthly Wargame Events"));
        assert!(raw.contains("To: player@example.com"));
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[test]
    fn bad_recipient_is_reported() {
        let from = parse_mailbox(DEFAULT_EMAIL_FROM).unwrap();
        let err = build_message(&from, "nope", "s", "b").unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress { .. }));
    }
}
