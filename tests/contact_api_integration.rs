//! Integration tests for the contact REST endpoint.
//!
//! Each test spins up an Axum server on a random port with a stub mail
//! transport, posts JSON with reqwest, and checks the status/message contract.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use contact_relay::config::{MailAccount, RelayConfig, ServerConfig, SmtpSettings};
use contact_relay::error::TransportError;
use contact_relay::relay::{ContactEmail, ContactRelay, MailTransport};
use contact_relay::routes::contact_routes;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Stub transport: records sent mail, optionally fails sends.
#[derive(Default)]
struct StubMailer {
    send_error: Option<TransportError>,
    sent: Mutex<Vec<ContactEmail>>,
}

#[async_trait]
impl MailTransport for StubMailer {
    async fn verify_connection(&self, _account: &MailAccount) -> Result<(), TransportError> {
        Ok(())
    }

    async fn send(&self, _account: &MailAccount, email: &ContactEmail) -> Result<(), TransportError> {
        self.sent.lock().unwrap().push(email.clone());
        match &self.send_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

fn configured() -> RelayConfig {
    RelayConfig {
        smtp: SmtpSettings::default(),
        account: Some(MailAccount::new("owner@example.com", "app-password")),
    }
}

/// Start an Axum server on a random port, return (base url, stub).
async fn start_server(config: RelayConfig, stub: StubMailer) -> (String, Arc<StubMailer>) {
    let stub = Arc::new(stub);
    let relay = Arc::new(ContactRelay::new(
        config,
        Arc::clone(&stub) as Arc<dyn MailTransport>,
    ));
    let app = contact_routes(relay, &ServerConfig::default());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://127.0.0.1:{port}"), stub)
}

/// POST a JSON body to /api/contact, return (status, parsed body).
async fn post_contact(base: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/contact"))
        .json(&body)
        .send()
        .await
        .expect("request failed");
    let status = resp.status().as_u16();
    let json = resp.json::<Value>().await.expect("invalid JSON from server");
    (status, json)
}

#[tokio::test]
async fn healthy_transport_sends() {
    timeout(TEST_TIMEOUT, async {
        let (base, stub) = start_server(configured(), StubMailer::default()).await;

        let (status, body) = post_contact(
            &base,
            json!({"name": "Jo", "email": "jo@x.com", "message": "Hi"}),
        )
        .await;

        assert_eq!(status, 200);
        assert_eq!(body, json!({"message": "Email sent successfully"}));

        let sent = stub.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to, "jo@x.com");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn empty_name_is_400() {
    timeout(TEST_TIMEOUT, async {
        let (base, stub) = start_server(configured(), StubMailer::default()).await;

        let (status, body) = post_contact(
            &base,
            json!({"name": "", "email": "jo@x.com", "message": "Hi"}),
        )
        .await;

        assert_eq!(status, 400);
        assert_eq!(body["message"], "Missing required fields");
        assert!(stub.sent.lock().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn absent_keys_are_400() {
    timeout(TEST_TIMEOUT, async {
        let (base, _stub) = start_server(configured(), StubMailer::default()).await;

        let (status, body) = post_contact(&base, json!({"name": "Jo"})).await;

        assert_eq!(status, 400);
        assert_eq!(body["message"], "Missing required fields");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn null_field_is_missing_not_unreadable() {
    timeout(TEST_TIMEOUT, async {
        let (base, stub) = start_server(configured(), StubMailer::default()).await;

        let (status, body) = post_contact(
            &base,
            json!({"name": null, "email": "jo@x.com", "message": "Hi"}),
        )
        .await;

        assert_eq!(status, 400);
        assert_eq!(body["message"], "Missing required fields");
        assert!(stub.sent.lock().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn malformed_email_is_400() {
    timeout(TEST_TIMEOUT, async {
        let (base, _stub) = start_server(configured(), StubMailer::default()).await;

        let (status, body) = post_contact(
            &base,
            json!({"name": "Jo", "email": "jo-at-x", "message": "Hi"}),
        )
        .await;

        assert_eq!(status, 400);
        assert_eq!(body["message"], "Invalid email address");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn missing_secret_is_server_configuration_error() {
    timeout(TEST_TIMEOUT, async {
        let config = RelayConfig {
            account: Some(MailAccount::new("owner@example.com", "")),
            ..configured()
        };
        let (base, stub) = start_server(config, StubMailer::default()).await;

        let (status, body) = post_contact(
            &base,
            json!({"name": "Jo", "email": "jo@x.com", "message": "Hi"}),
        )
        .await;

        assert_eq!(status, 500);
        assert_eq!(body["message"], "Server configuration error");
        assert!(stub.sent.lock().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn authentication_failure_is_500_with_generic_message() {
    timeout(TEST_TIMEOUT, async {
        let stub = StubMailer {
            send_error: Some(
                TransportError::authentication("5.7.8 Username and Password not accepted")
                    .with_code("535"),
            ),
            ..Default::default()
        };
        let (base, _stub) = start_server(configured(), stub).await;

        let (status, body) = post_contact(
            &base,
            json!({"name": "Jo", "email": "jo@x.com", "message": "Hi"}),
        )
        .await;

        assert_eq!(status, 500);
        assert_eq!(
            body["message"],
            "Email authentication failed. Please check credentials."
        );
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn non_json_body_is_400() {
    timeout(TEST_TIMEOUT, async {
        let (base, stub) = start_server(configured(), StubMailer::default()).await;

        let resp = reqwest::Client::new()
            .post(format!("{base}/api/contact"))
            .header("content-type", "application/json")
            .body("name=Jo")
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Invalid request body");
        assert!(stub.sent.lock().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn health_endpoint() {
    timeout(TEST_TIMEOUT, async {
        let (base, _stub) = start_server(configured(), StubMailer::default()).await;

        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "contact-relay");
    })
    .await
    .expect("test timed out");
}
