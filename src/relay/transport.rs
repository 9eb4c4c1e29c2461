//! Outbound mail capability: trait + SMTP implementation via lettre.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;

use super::message::ContactEmail;
use crate::config::{MailAccount, SmtpSettings, TransportSecurity};
use crate::error::{TransportError, TransportFailureKind};

/// Reply codes meaning the server refused the credentials.
const AUTH_REPLY_CODES: &[&str] = &["530", "534", "535", "538"];

/// Reply codes meaning the server is dropping the session.
const CONNECTION_REPLY_CODES: &[&str] = &["421"];

/// Something that can deliver a [`ContactEmail`] for an account.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Open (and authenticate) a session without sending anything.
    async fn verify_connection(&self, account: &MailAccount) -> Result<(), TransportError>;

    /// Deliver one message. Called at most once per submission.
    async fn send(&self, account: &MailAccount, email: &ContactEmail)
    -> Result<(), TransportError>;
}

/// SMTP transport for the fixed submission endpoint.
///
/// lettre's transport is blocking, so each operation runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn transport(&self, account: &MailAccount) -> Result<SmtpTransport, TransportError> {
        let creds = Credentials::new(
            account.username.clone(),
            account.password.expose_secret().to_string(),
        );

        let builder = match self.settings.security {
            TransportSecurity::StartTls => SmtpTransport::starttls_relay(&self.settings.host)
                .map_err(|e| classify_smtp_error(&e))?,
            TransportSecurity::Tls => {
                SmtpTransport::relay(&self.settings.host).map_err(|e| classify_smtp_error(&e))?
            }
            TransportSecurity::Plain => SmtpTransport::builder_dangerous(&self.settings.host),
        };

        Ok(builder
            .port(self.settings.port)
            .credentials(creds)
            .timeout(Some(self.settings.timeout))
            .build())
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn verify_connection(&self, account: &MailAccount) -> Result<(), TransportError> {
        let transport = self.transport(account)?;

        let connected = tokio::task::spawn_blocking(move || transport.test_connection())
            .await
            .map_err(|e| TransportError::other(format!("SMTP verify task failed: {e}")))?
            .map_err(|e| classify_smtp_error(&e))?;

        if connected {
            Ok(())
        } else {
            Err(TransportError::connection(format!(
                "SMTP server {}:{} did not accept the session",
                self.settings.host, self.settings.port
            )))
        }
    }

    async fn send(
        &self,
        account: &MailAccount,
        email: &ContactEmail,
    ) -> Result<(), TransportError> {
        let message = build_message(email)?;
        let transport = self.transport(account)?;

        let response = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| TransportError::other(format!("SMTP send task failed: {e}")))?
            .map_err(|e| classify_smtp_error(&e))?;

        tracing::debug!(code = %response.code(), "SMTP server accepted message");
        Ok(())
    }
}

/// Convert a [`ContactEmail`] into a multipart/alternative lettre message.
pub fn build_message(email: &ContactEmail) -> Result<Message, TransportError> {
    let mailbox = |field: &str, value: &str| -> Result<Mailbox, TransportError> {
        value
            .parse()
            .map_err(|e| TransportError::other(format!("Invalid {field} address: {e}")))
    };

    Message::builder()
        .from(mailbox("from", &email.from)?)
        .to(mailbox("to", &email.to)?)
        .reply_to(mailbox("reply-to", &email.reply_to)?)
        .subject(email.subject.as_str())
        .multipart(MultiPart::alternative_plain_html(
            email.text_body.clone(),
            email.html_body.clone(),
        ))
        .map_err(|e| TransportError::other(format!("Failed to build email: {e}")))
}

/// Map a lettre SMTP error onto a [`TransportError`].
pub fn classify_smtp_error(err: &lettre::transport::smtp::Error) -> TransportError {
    let code = err.status().map(|c| c.to_string());
    let message = err.to_string();
    let no_reply = code.is_none() && !err.is_response() && !err.is_client();

    let kind = failure_kind(
        code.as_deref(),
        err.is_timeout() || no_reply,
        err.is_client() && message.to_ascii_lowercase().contains("authentication"),
    );

    let classified = TransportError::new(kind, message);
    match code {
        Some(code) => classified.with_code(code),
        None => classified,
    }
}

/// Classification rules, independent of lettre's error type.
///
/// `connection_level` is set when no SMTP reply was involved (socket, TLS,
/// timeout); `auth_mechanism` when the client gave up negotiating auth.
pub fn failure_kind(
    reply_code: Option<&str>,
    connection_level: bool,
    auth_mechanism: bool,
) -> TransportFailureKind {
    match reply_code {
        Some(code) if AUTH_REPLY_CODES.contains(&code) => TransportFailureKind::Authentication,
        Some(code) if CONNECTION_REPLY_CODES.contains(&code) => TransportFailureKind::Connection,
        Some(_) => TransportFailureKind::Other,
        None if auth_mechanism => TransportFailureKind::Authentication,
        None if connection_level => TransportFailureKind::Connection,
        None => TransportFailureKind::Other,
    }
}
