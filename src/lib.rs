//! Contact relay — forwards portfolio contact-form submissions over SMTP.

pub mod config;
pub mod error;
pub mod relay;
pub mod routes;
