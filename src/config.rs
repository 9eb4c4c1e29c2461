//! Configuration types.
//!
//! Everything is read from the environment once at startup. Missing mail
//! credentials are not a startup error: the relay reports them per request.

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{ConfigError, Result};

/// How the SMTP session is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportSecurity {
    /// Plain connection upgraded with STARTTLS (submission port 587).
    #[default]
    StartTls,
    /// Implicit TLS from the first byte (port 465).
    Tls,
    /// No encryption. Only for local capture servers.
    Plain,
}

impl FromStr for TransportSecurity {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(Self::StartTls),
            "tls" | "ssl" => Ok(Self::Tls),
            "plain" | "none" => Ok(Self::Plain),
            other => Err(ConfigError::InvalidValue {
                key: "CONTACT_RELAY_SMTP_SECURITY".to_string(),
                message: format!("expected starttls, tls or plain, got {other:?}"),
            }),
        }
    }
}

/// Fixed mail-submission endpoint.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub security: TransportSecurity,
    /// Upper bound for the verify step and for the send step.
    pub timeout: Duration,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            security: TransportSecurity::StartTls,
            timeout: Duration::from_secs(10),
        }
    }
}

impl SmtpSettings {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            host: env_var("CONTACT_RELAY_SMTP_HOST").unwrap_or(defaults.host),
            port: parse_env("CONTACT_RELAY_SMTP_PORT")?.unwrap_or(defaults.port),
            security: parse_env("CONTACT_RELAY_SMTP_SECURITY")?.unwrap_or(defaults.security),
            timeout: parse_env::<u64>("CONTACT_RELAY_SMTP_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        })
    }
}

/// Outbound account: the identity mail is sent from and delivered to.
#[derive(Debug, Clone)]
pub struct MailAccount {
    pub username: String,
    /// Application-scoped password, not the primary account password.
    pub password: SecretString,
}

impl MailAccount {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Relay configuration, injected into [`crate::relay::ContactRelay`].
#[derive(Debug, Clone, Default)]
pub struct RelayConfig {
    pub smtp: SmtpSettings,
    pub account: Option<MailAccount>,
}

impl RelayConfig {
    /// Build config from environment variables.
    ///
    /// `EMAIL_USER` / `EMAIL_PASS` may be absent; see [`RelayConfig::account`].
    pub fn from_env() -> Result<Self> {
        let account = match (env_var("EMAIL_USER"), env_var("EMAIL_PASS")) {
            (Some(user), Some(pass)) => Some(MailAccount::new(user, pass)),
            _ => None,
        };

        Ok(Self {
            smtp: SmtpSettings::from_env()?,
            account,
        })
    }

    /// The configured account, if both identity and secret are non-empty.
    pub fn account(&self) -> Option<&MailAccount> {
        self.account.as_ref().filter(|a| {
            !a.username.trim().is_empty() && !a.password.expose_secret().trim().is_empty()
        })
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// CORS origins. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let allowed_origins = env_var("CONTACT_RELAY_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            port: parse_env("CONTACT_RELAY_PORT")?.unwrap_or(Self::default().port),
            allowed_origins,
        })
    }
}

/// Non-empty environment variable.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key).map(|raw| parse_value(key, &raw)).transpose()
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
