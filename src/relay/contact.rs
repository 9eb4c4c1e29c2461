//! The contact relay: validate → check config → verify → compose → send.

use std::sync::Arc;
use std::time::Duration;

use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use super::message::ContactEmail;
use super::outcome::Outcome;
use super::submission::Submission;
use super::transport::MailTransport;
use crate::config::RelayConfig;
use crate::error::{TransportError, TransportFailureKind};

/// Relays contact-form submissions to the configured inbox.
///
/// Holds no mutable state; share it behind an `Arc` across requests.
pub struct ContactRelay {
    config: RelayConfig,
    transport: Arc<dyn MailTransport>,
}

impl ContactRelay {
    pub fn new(config: RelayConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self { config, transport }
    }

    /// Process one submission. Every failure is logged and classified;
    /// nothing is retried.
    pub async fn relay(&self, submission: &Submission) -> Outcome {
        let submission_id = Uuid::new_v4();
        self.process(submission)
            .instrument(info_span!("contact_relay", %submission_id))
            .await
    }

    async fn process(&self, submission: &Submission) -> Outcome {
        let valid = match submission.validate() {
            Ok(valid) => valid,
            Err(reason) => {
                warn!(%reason, "Rejected contact submission");
                return Outcome::ValidationFailed(reason);
            }
        };

        let Some(account) = self.config.account() else {
            error!("Missing email configuration: EMAIL_USER and EMAIL_PASS must both be set");
            return Outcome::ConfigurationMissing;
        };

        let timeout = self.config.smtp.timeout;

        match with_timeout(timeout, self.transport.verify_connection(account)).await {
            Ok(()) => {}
            Err(e) => {
                error!(
                    kind = %e.kind,
                    code = e.code.as_deref().unwrap_or("-"),
                    error = %e.message,
                    "SMTP verification failed"
                );
                return Outcome::ServiceUnavailable;
            }
        }

        let email = ContactEmail::compose(&account.username, &valid);

        match with_timeout(timeout, self.transport.send(account, &email)).await {
            Ok(()) => {
                info!(reply_to = %email.reply_to, "Contact email sent");
                Outcome::Sent
            }
            Err(e) => {
                error!(
                    kind = %e.kind,
                    code = e.code.as_deref().unwrap_or("-"),
                    error = %e.message,
                    "Error sending email"
                );
                match e.kind {
                    TransportFailureKind::Authentication => Outcome::AuthenticationFailed,
                    TransportFailureKind::Connection => Outcome::ConnectionFailed,
                    TransportFailureKind::Other => Outcome::UnknownFailure,
                }
            }
        }
    }
}

/// Bound a transport step; expiry counts as a connection failure.
async fn with_timeout<F>(limit: Duration, step: F) -> Result<(), TransportError>
where
    F: Future<Output = Result<(), TransportError>>,
{
    tokio::time::timeout(limit, step).await.unwrap_or_else(|_| {
        Err(TransportError::connection(format!(
            "timed out after {}s",
            limit.as_secs_f32()
        )))
    })
}
