//! Integration tests for the SendGrid transport using WireMock
//!
//! These tests mock the v3 mail send API to verify the request contract and
//! the delivery result without making actual API calls.

use std::sync::Arc;
use std::time::Duration;

use outreach::delivery::{
    DeliveryAction, EmailTransport, OutboundEmail, SendGridConfig, SendGridTransport,
    TransportError,
};
use outreach::domain::DeliveryStatus;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn transport(server: &MockServer, api_key: Option<&str>) -> SendGridTransport {
    let config = SendGridConfig {
        api_key_env: "SENDGRID_API_KEY".to_string(),
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    };
    SendGridTransport::with_api_key(api_key.map(str::to_string), config)
        .expect("Failed to create transport")
}

fn email() -> OutboundEmail {
    OutboundEmail {
        from: "sales@complai.example".to_string(),
        to: "ceo@fintech.example".to_string(),
        subject: "SOC 2 without the busywork".to_string(),
        html_body: "<p>Dear CEO,</p>".to_string(),
    }
}

fn expected_body() -> serde_json::Value {
    serde_json::json!({
        "personalizations": [{ "to": [{ "email": "ceo@fintech.example" }] }],
        "from": { "email": "sales@complai.example" },
        "subject": "SOC 2 without the busywork",
        "content": [{ "type": "text/html", "value": "<p>Dear CEO,</p>" }]
    })
}

// =============================================================================
// Transport Tests
// =============================================================================

#[tokio::test]
async fn test_send_posts_expected_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(header("authorization", "Bearer SG.test-key"))
        .and(body_json(expected_body()))
        .respond_with(ResponseTemplate::new(202).insert_header("X-Message-Id", "abc123"))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = transport(&server, Some("SG.test-key")).send(&email()).await.unwrap();

    assert_eq!(receipt.status_code, 202);
    assert_eq!(receipt.message_id.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_non_success_status_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "errors": [{
                "message": "The from address does not match a verified Sender Identity"
            }]
        })))
        .mount(&server)
        .await;

    let err = transport(&server, Some("SG.test-key")).send(&email()).await.unwrap_err();

    match err {
        TransportError::Rejected { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("verified Sender Identity"));
        }
        other => panic!("Expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let err = transport(&server, None).send(&email()).await.unwrap_err();
    assert!(matches!(err, TransportError::MissingApiKey { .. }));
}

// =============================================================================
// Delivery Action Tests
// =============================================================================

#[tokio::test]
async fn test_delivery_action_reports_success_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let action = DeliveryAction::new(
        "sales@complai.example",
        "ceo@fintech.example",
        Arc::new(transport(&server, Some("SG.test-key"))),
    );
    let result = action.send("Hello", "<p>Hi</p>").await;

    assert_eq!(result.status, DeliveryStatus::Success);
    assert_eq!(result.detail, "Email sent successfully. Status code: 202");
}

#[tokio::test]
async fn test_delivery_action_reports_server_error_as_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;

    let action = DeliveryAction::new(
        "sales@complai.example",
        "ceo@fintech.example",
        Arc::new(transport(&server, Some("SG.test-key"))),
    );
    let result = action.send("Hello", "<p>Hi</p>").await;

    assert_eq!(result.status, DeliveryStatus::Failure);
    assert!(result.detail.starts_with("Failed to send email: "));
    assert!(result.detail.contains("500"));
}
